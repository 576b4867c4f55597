//! Loads a directory of GTFS `.txt` files into a typed [`FeedContainer`].

use std::path::Path;

use anyhow::{Context, Result};
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use crate::tables::{FeedContainer, Table, files};

/// Reads every known GTFS file under `dir`.
///
/// A file that is not there becomes a `MissingFile` table; a row that fails
/// to deserialize is logged and skipped so one bad line cannot sink the
/// whole summary.
pub fn load_feed(dir: &Path) -> Result<FeedContainer> {
    debug!(dir = %dir.display(), "Loading GTFS feed");
    Ok(FeedContainer {
        agencies: load_table(dir, files::AGENCY)?,
        stops: load_table(dir, files::STOPS)?,
        routes: load_table(dir, files::ROUTES)?,
        trips: load_table(dir, files::TRIPS)?,
        stop_times: load_table(dir, files::STOP_TIMES)?,
        calendars: load_table(dir, files::CALENDAR)?,
        calendar_dates: load_table(dir, files::CALENDAR_DATES)?,
        feed_info: load_table(dir, files::FEED_INFO)?,
        shapes: load_table(dir, files::SHAPES)?,
        frequencies: load_table(dir, files::FREQUENCIES)?,
        pathways: load_table(dir, files::PATHWAYS)?,
        transfers: load_table(dir, files::TRANSFERS)?,
        fare_attributes: load_table(dir, files::FARE_ATTRIBUTES)?,
        fare_products: load_table(dir, files::FARE_PRODUCTS)?,
        fare_media: load_table(dir, files::FARE_MEDIA)?,
        fare_transfer_rules: load_table(dir, files::FARE_TRANSFER_RULES)?,
        areas: load_table(dir, files::AREAS)?,
        timeframes: load_table(dir, files::TIMEFRAMES)?,
        networks: load_table(dir, files::NETWORKS)?,
        levels: load_table(dir, files::LEVELS)?,
        booking_rules: load_table(dir, files::BOOKING_RULES)?,
        location_groups: load_table(dir, files::LOCATION_GROUPS)?,
        attributions: load_table(dir, files::ATTRIBUTIONS)?,
        translations: load_table(dir, files::TRANSLATIONS)?,
    })
}

fn load_table<R: DeserializeOwned>(dir: &Path, file_name: &'static str) -> Result<Table<R>> {
    let path = dir.join(file_name);
    if !path.exists() {
        return Ok(Table::missing(file_name));
    }

    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .flexible(true)
        .from_path(&path)
        .with_context(|| format!("opening {}", path.display()))?;

    let columns: Vec<String> = reader
        .headers()
        .with_context(|| format!("reading headers of {}", path.display()))?
        .iter()
        .map(str::to_string)
        .collect();

    let mut rows = Vec::new();
    for (index, record) in reader.deserialize().enumerate() {
        match record {
            Ok(row) => rows.push(row),
            // Header line is 1, so the first record sits on line 2.
            Err(err) => warn!(file = file_name, line = index + 2, %err, "Skipping unparsable row"),
        }
    }

    debug!(file = file_name, rows = rows.len(), "Loaded table");
    Ok(Table::new(file_name, columns, rows))
}
