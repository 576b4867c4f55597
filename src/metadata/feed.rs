//! Assembly of the feed-wide summary report.

use std::collections::{BTreeMap, BTreeSet};

use serde::Serialize;
use tracing::error;

use crate::dates;
use crate::metadata::agency::AgencyMetadata;
use crate::metadata::counts;
use crate::metadata::features::{self, SpecFeatures};
use crate::metadata::window::{self, WindowResolution};
use crate::model::FeedInfo;
use crate::tables::{FeedContainer, Table, TableStatus, files};

const NA: &str = "N/A";

/// Column names consulted before rendering the feed-info date fields.
const FEED_START_DATE_COLUMN: &str = "feed_start_date";
const FEED_END_DATE_COLUMN: &str = "feed_end_date";

/// Load summary of one table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TableMetadata {
    pub file_name: String,
    pub status: TableStatus,
    pub row_count: usize,
}

/// Fixed descriptive fields of the report, serialized under the stable
/// renderer keys in declaration order. Display fields read `"N/A"` until a
/// value is known; the two raw window fields stay empty instead, since they
/// feed machines rather than readers.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FeedInfoSummary {
    #[serde(rename = "Publisher Name")]
    pub publisher_name: String,
    #[serde(rename = "Publisher URL")]
    pub publisher_url: String,
    #[serde(rename = "Feed Email")]
    pub contact_email: String,
    #[serde(rename = "Feed Language")]
    pub language: String,
    #[serde(rename = "Feed Start Date")]
    pub start_date: String,
    #[serde(rename = "Feed End Date")]
    pub end_date: String,
    #[serde(rename = "Service Window")]
    pub service_window: String,
    #[serde(rename = "Service Window Start")]
    pub service_window_start: String,
    #[serde(rename = "Service Window End")]
    pub service_window_end: String,
}

impl Default for FeedInfoSummary {
    fn default() -> Self {
        Self {
            publisher_name: NA.to_string(),
            publisher_url: NA.to_string(),
            contact_email: NA.to_string(),
            language: NA.to_string(),
            start_date: NA.to_string(),
            end_date: NA.to_string(),
            service_window: NA.to_string(),
            service_window_start: String::new(),
            service_window_end: String::new(),
        }
    }
}

/// The feed metadata report.
///
/// Built once per feed by [`FeedMetadata::from`] and handed read-only to a
/// renderer; only [`validation_time_seconds`](Self::validation_time_seconds)
/// is assigned afterwards, by whoever measured the run.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FeedMetadata {
    pub counts: BTreeMap<&'static str, usize>,
    pub feed_info: FeedInfoSummary,
    pub spec_features: SpecFeatures,
    pub agencies: Vec<AgencyMetadata>,
    pub tables: BTreeMap<String, TableMetadata>,
    pub filenames: BTreeSet<String>,
    pub validation_time_seconds: f64,
}

impl FeedMetadata {
    /// Derives the complete report from a fully loaded feed.
    ///
    /// `filenames` is the set of files the surrounding system expects for
    /// this feed type. The derivation is a pure function of the container:
    /// absent tables surface as zeros, false flags and `"N/A"` fields,
    /// never as errors, and an entirely empty feed yields the all-default
    /// report.
    pub fn from(feed: &FeedContainer, filenames: &[&str]) -> Self {
        let mut feed_info = FeedInfoSummary::default();
        if feed.feed_info.is_present() {
            load_feed_info(&mut feed_info, &feed.feed_info);
        }

        if feed.trips.is_present()
            && (feed.calendars.is_present() || feed.calendar_dates.is_present())
        {
            let resolution = window::resolve(
                feed.trips.rows(),
                feed.calendars.is_present().then(|| feed.calendars.rows()),
                feed.calendar_dates
                    .is_present()
                    .then(|| feed.calendar_dates.rows()),
            );
            if let WindowResolution::Failed { error, .. } = &resolution {
                error!(%error, "Service window resolution stopped early");
            }
            let window = resolution.window();
            feed_info.service_window = window.display();
            feed_info.service_window_start = window.start_iso();
            feed_info.service_window_end = window.end_iso();
        }

        Self {
            counts: counts::entity_counts(feed),
            feed_info,
            spec_features: features::detect_features(feed),
            agencies: feed
                .agencies
                .rows()
                .iter()
                .map(AgencyMetadata::from_row)
                .collect(),
            tables: table_summaries(feed),
            filenames: filenames.iter().map(|f| f.to_string()).collect(),
            validation_time_seconds: 0.0,
        }
    }

    /// Known tables whose file was actually part of the feed, in file-name
    /// order. Present-but-empty files count as found.
    pub fn found_files(&self) -> Vec<String> {
        self.tables
            .values()
            .filter(|t| t.status != TableStatus::MissingFile)
            .map(|t| t.file_name.clone())
            .collect()
    }
}

fn table_summaries(feed: &FeedContainer) -> BTreeMap<String, TableMetadata> {
    files::ALL
        .iter()
        .map(|file| {
            (
                file.to_string(),
                TableMetadata {
                    file_name: file.to_string(),
                    status: feed.status(file),
                    row_count: feed.row_count(file),
                },
            )
        })
        .collect()
}

fn load_feed_info(out: &mut FeedInfoSummary, table: &Table<FeedInfo>) {
    // A present file with no rows leaves every field at its default.
    let Some(info) = table.first() else { return };

    out.publisher_name = info.feed_publisher_name.clone();
    out.publisher_url = info.feed_publisher_url.clone();
    out.contact_email = info
        .feed_contact_email
        .clone()
        .unwrap_or_else(|| NA.to_string());
    out.language = info.feed_lang.clone();
    if table.has_column(FEED_START_DATE_COLUMN) {
        out.start_date = dates::display_or_na(info.feed_start_date);
    }
    if table.has_column(FEED_END_DATE_COLUMN) {
        out.end_date = dates::display_or_na(info.feed_end_date);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Agency, Calendar, CalendarDate, ExceptionType, FeedInfo, Trip};
    use chrono::NaiveDate;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_empty_feed_yields_all_defaults() {
        let metadata = FeedMetadata::from(&FeedContainer::empty(), files::ALL);

        assert!(metadata.counts.values().all(|count| *count == 0));
        assert!(metadata.spec_features.iter().all(|(_, enabled)| !enabled));
        assert!(metadata.agencies.is_empty());
        assert_eq!(metadata.feed_info.publisher_name, "N/A");
        assert_eq!(metadata.feed_info.language, "N/A");
        assert_eq!(metadata.feed_info.service_window, "N/A");
        assert_eq!(metadata.feed_info.service_window_start, "");
        assert_eq!(metadata.feed_info.service_window_end, "");
        assert!(metadata.found_files().is_empty());
        assert_eq!(metadata.filenames.len(), files::ALL.len());
    }

    #[test]
    fn test_idempotent_derivation() {
        let mut feed = FeedContainer::empty();
        feed.agencies = Table::new(
            files::AGENCY,
            vec!["agency_id".to_string(), "agency_name".to_string()],
            vec![Agency {
                agency_id: Some("a1".to_string()),
                agency_name: "Metro".to_string(),
                agency_url: "https://metro.example".to_string(),
                ..Agency::default()
            }],
        );
        feed.trips = Table::new(
            files::TRIPS,
            vec!["trip_id".to_string()],
            vec![Trip {
                trip_id: "t1".to_string(),
                service_id: "wk".to_string(),
                ..Trip::default()
            }],
        );
        feed.calendars = Table::new(
            files::CALENDAR,
            vec!["service_id".to_string()],
            vec![Calendar {
                service_id: "wk".to_string(),
                start_date: Some(date(2020, 1, 1)),
                end_date: Some(date(2020, 1, 31)),
                ..Calendar::default()
            }],
        );

        let first = FeedMetadata::from(&feed, files::ALL);
        let second = FeedMetadata::from(&feed, files::ALL);
        assert_eq!(first, second);
    }

    #[test]
    fn test_service_window_rendered_into_feed_info() {
        let mut feed = FeedContainer::empty();
        feed.trips = Table::new(
            files::TRIPS,
            vec!["trip_id".to_string()],
            vec![Trip {
                trip_id: "t1".to_string(),
                service_id: "wk".to_string(),
                ..Trip::default()
            }],
        );
        feed.calendars = Table::new(
            files::CALENDAR,
            vec!["service_id".to_string()],
            vec![Calendar {
                service_id: "wk".to_string(),
                start_date: Some(date(2020, 1, 1)),
                end_date: Some(date(2020, 1, 31)),
                ..Calendar::default()
            }],
        );

        let metadata = FeedMetadata::from(&feed, files::ALL);
        assert_eq!(
            metadata.feed_info.service_window,
            "January 1, 2020 to January 31, 2020"
        );
        assert_eq!(metadata.feed_info.service_window_start, "2020-01-01");
        assert_eq!(metadata.feed_info.service_window_end, "2020-01-31");
    }

    #[test]
    fn test_failed_resolution_degrades_to_partial_window() {
        let mut feed = FeedContainer::empty();
        feed.trips = Table::new(
            files::TRIPS,
            vec!["trip_id".to_string()],
            vec![
                Trip {
                    trip_id: "t1".to_string(),
                    service_id: "wk".to_string(),
                    ..Trip::default()
                },
                Trip {
                    trip_id: "t2".to_string(),
                    service_id: "ghost".to_string(),
                    ..Trip::default()
                },
            ],
        );
        feed.calendars = Table::new(
            files::CALENDAR,
            vec!["service_id".to_string()],
            vec![Calendar {
                service_id: "wk".to_string(),
                start_date: Some(date(2020, 1, 1)),
                end_date: Some(date(2020, 1, 31)),
                ..Calendar::default()
            }],
        );
        feed.calendar_dates = Table::new(
            files::CALENDAR_DATES,
            vec!["service_id".to_string()],
            vec![CalendarDate {
                service_id: "wk".to_string(),
                date: Some(date(2020, 1, 15)),
                exception_type: ExceptionType::Removed,
            }],
        );

        let metadata = FeedMetadata::from(&feed, files::ALL);
        // The window accumulated before the dangling reference still shows.
        assert_eq!(
            metadata.feed_info.service_window,
            "January 1, 2020 to January 31, 2020"
        );
    }

    #[test]
    fn test_feed_info_dates_need_their_columns() {
        let mut feed = FeedContainer::empty();
        feed.feed_info = Table::new(
            files::FEED_INFO,
            vec![
                "feed_publisher_name".to_string(),
                "feed_publisher_url".to_string(),
                "feed_lang".to_string(),
            ],
            vec![FeedInfo {
                feed_publisher_name: "Example Transit".to_string(),
                feed_publisher_url: "https://transit.example".to_string(),
                feed_lang: "en".to_string(),
                feed_start_date: Some(date(2020, 1, 1)),
                ..FeedInfo::default()
            }],
        );

        let metadata = FeedMetadata::from(&feed, files::ALL);
        assert_eq!(metadata.feed_info.publisher_name, "Example Transit");
        assert_eq!(metadata.feed_info.language, "en");
        assert_eq!(metadata.feed_info.contact_email, "N/A");
        // No feed_start_date column in the header, so the value stays unset
        // even though the row carries a date.
        assert_eq!(metadata.feed_info.start_date, "N/A");
    }

    #[test]
    fn test_feed_info_sentinel_dates_render_na() {
        let mut feed = FeedContainer::empty();
        feed.feed_info = Table::new(
            files::FEED_INFO,
            vec![
                "feed_publisher_name".to_string(),
                "feed_publisher_url".to_string(),
                "feed_lang".to_string(),
                "feed_start_date".to_string(),
                "feed_end_date".to_string(),
            ],
            vec![FeedInfo {
                feed_publisher_name: "Example Transit".to_string(),
                feed_publisher_url: "https://transit.example".to_string(),
                feed_lang: "en".to_string(),
                feed_start_date: Some(NaiveDate::default()),
                feed_end_date: Some(date(2020, 12, 31)),
                ..FeedInfo::default()
            }],
        );

        let metadata = FeedMetadata::from(&feed, files::ALL);
        assert_eq!(metadata.feed_info.start_date, "N/A");
        assert_eq!(metadata.feed_info.end_date, "2020-12-31");
    }

    #[test]
    fn test_found_files_includes_empty_tables() {
        let mut feed = FeedContainer::empty();
        feed.shapes = Table::new(files::SHAPES, vec!["shape_id".to_string()], vec![]);
        let metadata = FeedMetadata::from(&feed, files::ALL);
        assert_eq!(metadata.found_files(), vec![files::SHAPES.to_string()]);
    }

    #[test]
    fn test_report_keys_are_stable() {
        let metadata = FeedMetadata::from(&FeedContainer::empty(), files::ALL);
        let json = serde_json::to_value(&metadata).unwrap();

        let feed_info = json["feedInfo"].as_object().unwrap();
        for key in [
            "Publisher Name",
            "Publisher URL",
            "Feed Email",
            "Feed Language",
            "Feed Start Date",
            "Feed End Date",
            "Service Window",
            "Service Window Start",
            "Service Window End",
        ] {
            assert!(feed_info.contains_key(key), "missing feed info key {key}");
        }

        let counts = json["counts"].as_object().unwrap();
        for key in ["Agencies", "Blocks", "Routes", "Shapes", "Stops", "Trips"] {
            assert!(counts.contains_key(key), "missing count key {key}");
        }

        assert!(json["specFeatures"].is_object());
        assert!(json["validationTimeSeconds"].is_number());
    }
}
