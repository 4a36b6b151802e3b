use anyhow::Result;
use colored::*;
use indicatif::ProgressBar;
use std::collections::HashSet;
use std::path::Path;
use std::time::Duration;
use url::Url;

use crate::fetcher::{Fetcher, HttpFetcher};
use crate::file_manager::FileManager;
use crate::html_parser;
use crate::metadata::MetadataStore;

/// Resolved asset filenames must end in one of these suffixes to be
/// downloaded. Matching is case-sensitive.
pub const ASSET_EXTENSIONS: &[&str] = &[
    ".jpg", ".jpeg", ".png", ".gif", ".bmp", ".svg", ".webp", ".mp4", ".avi", ".mkv", ".mov",
    ".wmv", ".flv", ".webm", ".js", ".css",
];

pub fn is_valid_url(url: &str) -> bool {
    parse_url(url).is_some()
}

fn parse_url(url: &str) -> Option<Url> {
    Url::parse(url).ok().filter(|parsed| parsed.has_host())
}

/// The last non-empty path segment of a URL, falling back to the host for
/// site roots. Distinct URLs sharing a final segment collide; last write
/// wins for both output files and metadata records.
pub fn page_identifier(url: &Url) -> String {
    url.path_segments()
        .and_then(|segments| segments.rev().find(|segment| !segment.is_empty()))
        .map(str::to_string)
        .unwrap_or_else(|| url.host_str().unwrap_or("").to_string())
}

/// Candidate filename for a resolved asset URL: the final path segment with
/// everything from the first `?` stripped. None if the URL has no filename.
pub fn asset_filename(url: &Url) -> Option<String> {
    let segment = url.path_segments().and_then(|segments| segments.last())?;
    let name = match segment.find('?') {
        Some(index) => &segment[..index],
        None => segment,
    };

    if name.is_empty() {
        None
    } else {
        Some(name.to_string())
    }
}

pub fn has_asset_extension(file_name: &str) -> bool {
    ASSET_EXTENSIONS.iter().any(|ext| file_name.ends_with(ext))
}

#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub struct RunSummary {
    pub saved: usize,
    pub skipped: usize,
}

/// Single-pass batch downloader: each URL is validated, fetched, scanned,
/// its assets downloaded and rewritten, persisted, and recorded in the
/// metadata store before the next URL begins.
pub struct PageGrabber {
    fetcher: Box<dyn Fetcher>,
    files: FileManager,
    store: MetadataStore,
}

impl PageGrabber {
    pub fn new(output_dir: &Path) -> Result<Self> {
        Self::with_fetcher(Box::new(HttpFetcher::new()?), output_dir)
    }

    pub fn with_fetcher(fetcher: Box<dyn Fetcher>, output_dir: &Path) -> Result<Self> {
        Ok(Self {
            fetcher,
            files: FileManager::new(output_dir)?,
            store: MetadataStore::new(output_dir),
        })
    }

    /// Download mode. Invalid URLs and failed page fetches are reported and
    /// skipped; filesystem and store failures are fatal.
    pub fn download(&self, urls: &[String]) -> Result<RunSummary> {
        let mut summary = RunSummary::default();
        let spinner = ProgressBar::new_spinner();
        spinner.enable_steady_tick(Duration::from_millis(100));

        for url in urls {
            spinner.set_message(format!("Downloading {}", url));

            let Some(parsed) = parse_url(url) else {
                spinner.suspend(|| println!("{}", format!("Invalid url: {}", url).red()));
                summary.skipped += 1;
                continue;
            };

            let response = match self.fetcher.fetch_page(&parsed) {
                Ok(response) if response.is_success() => response,
                Ok(response) => {
                    spinner.suspend(|| {
                        println!(
                            "{}",
                            format!(
                                "Failed to download url: {}; Status code: {}",
                                url, response.status
                            )
                            .yellow()
                        )
                    });
                    summary.skipped += 1;
                    continue;
                }
                Err(e) => {
                    spinner.suspend(|| {
                        println!("{}", format!("Failed to download url: {}; {}", url, e).yellow())
                    });
                    summary.skipped += 1;
                    continue;
                }
            };

            let html = String::from_utf8_lossy(&response.body).into_owned();
            let page_id = page_identifier(&parsed);
            let link_count = html_parser::count_links(&html);

            let (rewritten, assets) = self.download_assets(&parsed, &page_id, &html)?;
            let path = self.files.save_page(&page_id, &rewritten)?;
            self.store.upsert(&page_id, link_count as u64)?;

            spinner.suspend(|| {
                println!(
                    "{} {} ({} assets)",
                    "Saved".green(),
                    path.display(),
                    assets
                )
            });
            summary.saved += 1;
        }

        spinner.finish_and_clear();
        println!("{} pages saved, {} skipped", summary.saved, summary.skipped);

        Ok(summary)
    }

    /// Download every eligible asset and return the document text with the
    /// eligible references rewritten to local paths, plus the download count.
    /// Asset-level failures are skipped silently, leaving the original
    /// reference untouched.
    fn download_assets(
        &self,
        page_url: &Url,
        page_id: &str,
        html: &str,
    ) -> Result<(String, usize)> {
        let base_url = match html_parser::base_href(html) {
            Some(href) => page_url.join(&href).unwrap_or_else(|e| {
                log::warn!("unusable <base href=\"{}\">: {}", href, e);
                page_url.clone()
            }),
            None => page_url.clone(),
        };

        let mut rewritten = html.to_string();
        let mut downloaded = 0;
        let mut seen = HashSet::new();

        for asset in html_parser::asset_refs(html) {
            // Tags sharing a reference value are all covered by one fetch
            // and one rewrite.
            if !seen.insert(asset.value.clone()) {
                log::debug!("skipping asset {}: already handled", asset.value);
                continue;
            }

            let resolved = match base_url.join(&asset.value) {
                Ok(resolved) => resolved,
                Err(e) => {
                    log::debug!("skipping asset {}: {}", asset.value, e);
                    continue;
                }
            };

            let Some(file_name) = asset_filename(&resolved) else {
                log::debug!("skipping asset {}: no filename", resolved);
                continue;
            };

            if !has_asset_extension(&file_name) {
                log::debug!("skipping asset {}: extension not recognized", resolved);
                continue;
            }

            let response = match self.fetcher.fetch_asset(&resolved) {
                Ok(response) if response.is_success() => response,
                Ok(response) => {
                    log::debug!("skipping asset {}: status {}", resolved, response.status);
                    continue;
                }
                Err(e) => {
                    log::debug!("skipping asset {}: {}", resolved, e);
                    continue;
                }
            };

            self.files.save_asset(page_id, &file_name, &response.body)?;
            let local_path = format!("{}/{}", page_id, file_name);
            rewritten = html_parser::rewrite_attribute(&rewritten, asset.attribute, &asset.value, &local_path);
            downloaded += 1;
        }

        Ok((rewritten, downloaded))
    }

    /// Display mode: look up each URL's stored record and print it as
    /// one-line JSON. Never creates or modifies the store file.
    pub fn fetch_metadata(&self, urls: &[String]) -> Result<()> {
        let records = self.store.read_existing()?;

        for url in urls {
            let page_id = parse_url(url).map(|parsed| page_identifier(&parsed));
            match page_id.as_deref().and_then(|id| records.get(id)) {
                Some(record) => println!("{}", serde_json::to_string(record)?),
                None => println!("{}", format!("Data not found for url: {}", url).yellow()),
            }
        }

        Ok(())
    }
}
