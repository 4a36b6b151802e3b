use clap::Parser;

#[derive(Parser, Debug)]
#[command(
    name = "webgrab",
    about = "Download static copies of web pages and their assets",
    version,
    long_about = "Fetches each given URL, downloads its images, scripts, and stylesheets into a per-page directory, rewrites the page to reference the local copies, and records link counts and fetch times in metadata.json."
)]
pub struct GrabCommand {
    /// URLs to download (or to look up with --metadata)
    #[arg(required = true)]
    pub urls: Vec<String>,

    /// Show stored metadata for the given URLs instead of downloading
    #[arg(long)]
    pub metadata: bool,
}
