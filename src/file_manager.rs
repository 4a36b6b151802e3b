use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};

/// Owns all per-page filesystem output: the rewritten HTML file and the
/// asset directory named after the page identifier. Writes overwrite any
/// prior file of the same name.
#[derive(Clone)]
pub struct FileManager {
    base_dir: PathBuf,
}

impl FileManager {
    pub fn new(base_dir: &Path) -> Result<Self> {
        fs::create_dir_all(base_dir)
            .with_context(|| format!("Failed to create output directory: {:?}", base_dir))?;

        Ok(Self {
            base_dir: base_dir.to_path_buf(),
        })
    }

    /// Write the rewritten document to `<page_id>.html` as UTF-8.
    pub fn save_page(&self, page_id: &str, html: &str) -> Result<PathBuf> {
        let path = self.base_dir.join(format!("{}.html", page_id));
        fs::write(&path, html.as_bytes())
            .with_context(|| format!("Failed to write page file: {:?}", path))?;

        Ok(path)
    }

    /// Write raw asset bytes to `<page_id>/<file_name>`, creating the
    /// per-page directory the first time an asset needs it.
    pub fn save_asset(&self, page_id: &str, file_name: &str, content: &[u8]) -> Result<PathBuf> {
        let dir = self.base_dir.join(page_id);
        fs::create_dir_all(&dir)
            .with_context(|| format!("Failed to create asset directory: {:?}", dir))?;

        let path = dir.join(file_name);
        fs::write(&path, content)
            .with_context(|| format!("Failed to write asset file: {:?}", path))?;

        Ok(path)
    }

    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }
}
