//! Output formatting and persistence for the metadata report.

use std::fs;
use std::path::Path;

use anyhow::Result;
use tracing::debug;

use crate::metadata::feed::FeedMetadata;

/// Logs the report using Rust's debug pretty-print format.
pub fn print_pretty(metadata: &FeedMetadata) {
    debug!("{:#?}", metadata);
}

/// Prints the report as pretty JSON to stdout.
pub fn print_json(metadata: &FeedMetadata) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(metadata)?);
    Ok(())
}

/// Writes the report as pretty JSON to `path`.
pub fn write_json(path: &Path, metadata: &FeedMetadata) -> Result<()> {
    fs::write(path, serde_json::to_string_pretty(metadata)?)?;
    Ok(())
}

/// Renders the feature catalog as aligned text, one flag per line.
pub fn format_features(metadata: &FeedMetadata) -> String {
    let width = metadata
        .spec_features
        .iter()
        .map(|(name, _)| name.len())
        .max()
        .unwrap_or(0);

    let mut out = String::new();
    for (name, enabled) in metadata.spec_features.iter() {
        let flag = if enabled { "yes" } else { "no" };
        out.push_str(&format!("{name:<width$}  {flag}\n"));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tables::{FeedContainer, files};

    fn empty_metadata() -> FeedMetadata {
        FeedMetadata::from(&FeedContainer::empty(), files::ALL)
    }

    #[test]
    fn test_print_pretty_does_not_panic() {
        print_pretty(&empty_metadata());
    }

    #[test]
    fn test_write_json_round_trips_keys() {
        let path = std::env::temp_dir().join("gtfs_feed_metadata_test_report.json");
        let _ = fs::remove_file(&path);

        write_json(&path, &empty_metadata()).unwrap();
        let content = fs::read_to_string(&path).unwrap();
        let json: serde_json::Value = serde_json::from_str(&content).unwrap();
        assert!(json["counts"].is_object());
        assert!(json["specFeatures"].is_object());

        fs::remove_file(&path).unwrap();
    }

    #[test]
    fn test_format_features_lists_every_flag() {
        let metadata = empty_metadata();
        let text = format_features(&metadata);
        assert_eq!(text.lines().count(), metadata.spec_features.len());
        assert!(text.contains("Shapes"));
        assert!(text.lines().all(|line| line.ends_with("no")));
    }
}
