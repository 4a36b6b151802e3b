pub mod cli;
pub mod downloader;
pub mod fetcher;
pub mod file_manager;
pub mod html_parser;
pub mod metadata;

// Re-export main types for convenience
pub use cli::GrabCommand;
pub use downloader::{
    asset_filename, has_asset_extension, is_valid_url, page_identifier, PageGrabber, RunSummary,
};
pub use fetcher::{FetchResponse, Fetcher, HttpFetcher};
pub use file_manager::FileManager;
pub use html_parser::AssetRef;
pub use metadata::{MetadataStore, PageRecord, METADATA_FILENAME};
