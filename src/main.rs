//! CLI entry point for the GTFS feed metadata summarizer.
//!
//! Provides subcommands for deriving the full JSON report from an extracted
//! feed directory and for listing which optional features a feed uses.

use std::path::PathBuf;
use std::time::Instant;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::EnvFilter;

use gtfs_feed_metadata::loader::load_feed;
use gtfs_feed_metadata::metadata::feed::FeedMetadata;
use gtfs_feed_metadata::output::{format_features, print_json, print_pretty, write_json};
use gtfs_feed_metadata::tables::files;

#[derive(Parser)]
#[command(name = "gtfs_feed_metadata")]
#[command(about = "Summarize a GTFS feed into a metadata report", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Derive the metadata report for a feed directory
    Summarize {
        /// Directory containing the extracted GTFS .txt files
        #[arg(value_name = "FEED_DIR")]
        feed_dir: PathBuf,

        /// Write the JSON report here instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// List which optional GTFS features the feed uses
    Features {
        /// Directory containing the extracted GTFS .txt files
        #[arg(value_name = "FEED_DIR")]
        feed_dir: PathBuf,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Summarize { feed_dir, output } => {
            let started = Instant::now();
            let feed = load_feed(&feed_dir)?;
            let mut metadata = FeedMetadata::from(&feed, files::ALL);
            metadata.validation_time_seconds = started.elapsed().as_secs_f64();

            info!(
                found_files = metadata.found_files().len(),
                seconds = metadata.validation_time_seconds,
                "Feed summarized"
            );
            print_pretty(&metadata);

            match output {
                Some(path) => {
                    write_json(&path, &metadata)?;
                    info!(path = %path.display(), "Report written");
                }
                None => print_json(&metadata)?,
            }
        }
        Commands::Features { feed_dir } => {
            let feed = load_feed(&feed_dir)?;
            let metadata = FeedMetadata::from(&feed, files::ALL);
            print!("{}", format_features(&metadata));
        }
    }

    Ok(())
}
