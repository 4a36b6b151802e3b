use anyhow::Result;
use clap::Parser;

use webgrab::cli::GrabCommand;
use webgrab::downloader::PageGrabber;

fn main() -> Result<()> {
    env_logger::init();
    let args = GrabCommand::parse();

    let output_dir = std::env::current_dir()?;
    let grabber = PageGrabber::new(&output_dir)?;

    if args.metadata {
        grabber.fetch_metadata(&args.urls)?;
    } else {
        grabber.download(&args.urls)?;
    }

    Ok(())
}
