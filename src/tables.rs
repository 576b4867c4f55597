//! Per-file table containers and the feed-wide lookup facade.
//!
//! Each GTFS file gets its own strongly typed [`Table`]; the
//! [`FeedContainer`] holds all of them, fully materialized and read-only.
//! Every derivation in [`crate::metadata`] is a pure function of one
//! container.

use serde::Serialize;

use crate::model::*;

/// Canonical GTFS file names, as they appear inside a feed archive.
pub mod files {
    pub const AGENCY: &str = "agency.txt";
    pub const AREAS: &str = "areas.txt";
    pub const ATTRIBUTIONS: &str = "attributions.txt";
    pub const BOOKING_RULES: &str = "booking_rules.txt";
    pub const CALENDAR: &str = "calendar.txt";
    pub const CALENDAR_DATES: &str = "calendar_dates.txt";
    pub const FARE_ATTRIBUTES: &str = "fare_attributes.txt";
    pub const FARE_MEDIA: &str = "fare_media.txt";
    pub const FARE_PRODUCTS: &str = "fare_products.txt";
    pub const FARE_TRANSFER_RULES: &str = "fare_transfer_rules.txt";
    pub const FEED_INFO: &str = "feed_info.txt";
    pub const FREQUENCIES: &str = "frequencies.txt";
    pub const LEVELS: &str = "levels.txt";
    pub const LOCATION_GROUPS: &str = "location_groups.txt";
    pub const NETWORKS: &str = "networks.txt";
    pub const PATHWAYS: &str = "pathways.txt";
    pub const ROUTES: &str = "routes.txt";
    pub const SHAPES: &str = "shapes.txt";
    pub const STOPS: &str = "stops.txt";
    pub const STOP_TIMES: &str = "stop_times.txt";
    pub const TIMEFRAMES: &str = "timeframes.txt";
    pub const TRANSFERS: &str = "transfers.txt";
    pub const TRANSLATIONS: &str = "translations.txt";
    pub const TRIPS: &str = "trips.txt";

    /// Every file the summary knows about, sorted by name.
    pub const ALL: &[&str] = &[
        AGENCY,
        AREAS,
        ATTRIBUTIONS,
        BOOKING_RULES,
        CALENDAR,
        CALENDAR_DATES,
        FARE_ATTRIBUTES,
        FARE_MEDIA,
        FARE_PRODUCTS,
        FARE_TRANSFER_RULES,
        FEED_INFO,
        FREQUENCIES,
        LEVELS,
        LOCATION_GROUPS,
        NETWORKS,
        PATHWAYS,
        ROUTES,
        SHAPES,
        STOP_TIMES,
        STOPS,
        TIMEFRAMES,
        TRANSFERS,
        TRANSLATIONS,
        TRIPS,
    ];
}

/// Load outcome of a single file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TableStatus {
    /// File present with at least one parsed row.
    Found,
    /// File present but without rows.
    EmptyFile,
    /// File not part of the feed.
    MissingFile,
}

/// A homogeneous, strongly typed container for one GTFS file.
#[derive(Debug, Clone)]
pub struct Table<R> {
    file_name: &'static str,
    status: TableStatus,
    columns: Vec<String>,
    rows: Vec<R>,
}

impl<R> Table<R> {
    /// A table for a file that was not part of the feed.
    pub fn missing(file_name: &'static str) -> Self {
        Self {
            file_name,
            status: TableStatus::MissingFile,
            columns: Vec::new(),
            rows: Vec::new(),
        }
    }

    /// A table loaded from a present file; status follows the row count.
    pub fn new(file_name: &'static str, columns: Vec<String>, rows: Vec<R>) -> Self {
        let status = if rows.is_empty() {
            TableStatus::EmptyFile
        } else {
            TableStatus::Found
        };
        Self {
            file_name,
            status,
            columns,
            rows,
        }
    }

    pub fn file_name(&self) -> &'static str {
        self.file_name
    }

    pub fn status(&self) -> TableStatus {
        self.status
    }

    /// Whether the file existed at all, rows or not.
    pub fn is_present(&self) -> bool {
        self.status != TableStatus::MissingFile
    }

    /// Whether the named column appeared in the file's header line.
    pub fn has_column(&self, name: &str) -> bool {
        self.columns.iter().any(|c| c == name)
    }

    pub fn rows(&self) -> &[R] {
        &self.rows
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn first(&self) -> Option<&R> {
        self.rows.first()
    }
}

/// All tables of one feed.
#[derive(Debug, Clone)]
pub struct FeedContainer {
    pub agencies: Table<Agency>,
    pub stops: Table<Stop>,
    pub routes: Table<Route>,
    pub trips: Table<Trip>,
    pub stop_times: Table<StopTime>,
    pub calendars: Table<Calendar>,
    pub calendar_dates: Table<CalendarDate>,
    pub feed_info: Table<FeedInfo>,
    pub shapes: Table<Shape>,
    pub frequencies: Table<Frequency>,
    pub pathways: Table<Pathway>,
    pub transfers: Table<Transfer>,
    pub fare_attributes: Table<FareAttribute>,
    pub fare_products: Table<FareProduct>,
    pub fare_media: Table<FareMedia>,
    pub fare_transfer_rules: Table<FareTransferRule>,
    pub areas: Table<Area>,
    pub timeframes: Table<Timeframe>,
    pub networks: Table<Network>,
    pub levels: Table<Level>,
    pub booking_rules: Table<BookingRule>,
    pub location_groups: Table<LocationGroup>,
    pub attributions: Table<Attribution>,
    pub translations: Table<Translation>,
}

impl FeedContainer {
    /// A container with every table missing, as for a feed with no files.
    pub fn empty() -> Self {
        Self {
            agencies: Table::missing(files::AGENCY),
            stops: Table::missing(files::STOPS),
            routes: Table::missing(files::ROUTES),
            trips: Table::missing(files::TRIPS),
            stop_times: Table::missing(files::STOP_TIMES),
            calendars: Table::missing(files::CALENDAR),
            calendar_dates: Table::missing(files::CALENDAR_DATES),
            feed_info: Table::missing(files::FEED_INFO),
            shapes: Table::missing(files::SHAPES),
            frequencies: Table::missing(files::FREQUENCIES),
            pathways: Table::missing(files::PATHWAYS),
            transfers: Table::missing(files::TRANSFERS),
            fare_attributes: Table::missing(files::FARE_ATTRIBUTES),
            fare_products: Table::missing(files::FARE_PRODUCTS),
            fare_media: Table::missing(files::FARE_MEDIA),
            fare_transfer_rules: Table::missing(files::FARE_TRANSFER_RULES),
            areas: Table::missing(files::AREAS),
            timeframes: Table::missing(files::TIMEFRAMES),
            networks: Table::missing(files::NETWORKS),
            levels: Table::missing(files::LEVELS),
            booking_rules: Table::missing(files::BOOKING_RULES),
            location_groups: Table::missing(files::LOCATION_GROUPS),
            attributions: Table::missing(files::ATTRIBUTIONS),
            translations: Table::missing(files::TRANSLATIONS),
        }
    }

    fn lookup(&self, file_name: &str) -> Option<(TableStatus, usize)> {
        let entry = match file_name {
            files::AGENCY => (self.agencies.status(), self.agencies.row_count()),
            files::STOPS => (self.stops.status(), self.stops.row_count()),
            files::ROUTES => (self.routes.status(), self.routes.row_count()),
            files::TRIPS => (self.trips.status(), self.trips.row_count()),
            files::STOP_TIMES => (self.stop_times.status(), self.stop_times.row_count()),
            files::CALENDAR => (self.calendars.status(), self.calendars.row_count()),
            files::CALENDAR_DATES => (
                self.calendar_dates.status(),
                self.calendar_dates.row_count(),
            ),
            files::FEED_INFO => (self.feed_info.status(), self.feed_info.row_count()),
            files::SHAPES => (self.shapes.status(), self.shapes.row_count()),
            files::FREQUENCIES => (self.frequencies.status(), self.frequencies.row_count()),
            files::PATHWAYS => (self.pathways.status(), self.pathways.row_count()),
            files::TRANSFERS => (self.transfers.status(), self.transfers.row_count()),
            files::FARE_ATTRIBUTES => (
                self.fare_attributes.status(),
                self.fare_attributes.row_count(),
            ),
            files::FARE_PRODUCTS => (self.fare_products.status(), self.fare_products.row_count()),
            files::FARE_MEDIA => (self.fare_media.status(), self.fare_media.row_count()),
            files::FARE_TRANSFER_RULES => (
                self.fare_transfer_rules.status(),
                self.fare_transfer_rules.row_count(),
            ),
            files::AREAS => (self.areas.status(), self.areas.row_count()),
            files::TIMEFRAMES => (self.timeframes.status(), self.timeframes.row_count()),
            files::NETWORKS => (self.networks.status(), self.networks.row_count()),
            files::LEVELS => (self.levels.status(), self.levels.row_count()),
            files::BOOKING_RULES => (self.booking_rules.status(), self.booking_rules.row_count()),
            files::LOCATION_GROUPS => (
                self.location_groups.status(),
                self.location_groups.row_count(),
            ),
            files::ATTRIBUTIONS => (self.attributions.status(), self.attributions.row_count()),
            files::TRANSLATIONS => (self.translations.status(), self.translations.row_count()),
            _ => return None,
        };
        Some(entry)
    }

    /// Status for a file name; unknown names read as missing.
    pub fn status(&self, file_name: &str) -> TableStatus {
        self.lookup(file_name)
            .map(|(status, _)| status)
            .unwrap_or(TableStatus::MissingFile)
    }

    /// Whether the named file was present in the feed.
    pub fn has_table(&self, file_name: &str) -> bool {
        self.status(file_name) != TableStatus::MissingFile
    }

    /// Parsed row count for a file name; missing or unknown files have none.
    pub fn row_count(&self, file_name: &str) -> usize {
        self.lookup(file_name).map(|(_, count)| count).unwrap_or(0)
    }
}

impl Default for FeedContainer {
    fn default() -> Self {
        Self::empty()
    }
}
