use anyhow::{Context, Result};
use chrono::Local;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

pub const METADATA_FILENAME: &str = "metadata.json";

/// Stored summary of one fetched page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PageRecord {
    pub links: u64,
    pub site: String,
    pub last_fetch: String,
}

/// One JSON file mapping page identifier to its record. Every upsert is a
/// full read-merge-write of the file with no locking, so concurrent
/// processes can silently drop each other's updates. The file is always a
/// complete, parseable JSON object.
pub struct MetadataStore {
    path: PathBuf,
}

impl MetadataStore {
    pub fn new(dir: &Path) -> Self {
        Self {
            path: dir.join(METADATA_FILENAME),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// The full mapping, creating an empty store file if none exists.
    pub fn read_all(&self) -> Result<BTreeMap<String, PageRecord>> {
        if !self.path.exists() {
            fs::write(&self.path, "{}")
                .with_context(|| format!("Failed to create metadata file: {:?}", self.path))?;
        }

        self.load()
    }

    /// The full mapping, or an empty one if no store file exists. Never
    /// creates or modifies the file; used by display mode.
    pub fn read_existing(&self) -> Result<BTreeMap<String, PageRecord>> {
        if !self.path.exists() {
            return Ok(BTreeMap::new());
        }

        self.load()
    }

    /// Insert or overwrite the record for one page identifier and write the
    /// whole store back, pretty-printed.
    pub fn upsert(&self, page_id: &str, links: u64) -> Result<PageRecord> {
        let mut records = self.read_all()?;

        let record = PageRecord {
            links,
            site: page_id.to_string(),
            last_fetch: Local::now().format("%Y-%m-%d %H:%M:%S%.6f").to_string(),
        };
        records.insert(page_id.to_string(), record.clone());

        let contents = serde_json::to_string_pretty(&records)?;
        fs::write(&self.path, contents)
            .with_context(|| format!("Failed to write metadata file: {:?}", self.path))?;

        Ok(record)
    }

    fn load(&self) -> Result<BTreeMap<String, PageRecord>> {
        let contents = fs::read_to_string(&self.path)
            .with_context(|| format!("Failed to read metadata file: {:?}", self.path))?;

        serde_json::from_str(&contents)
            .with_context(|| format!("Invalid metadata file: {:?}", self.path))
    }
}
