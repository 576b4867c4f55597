//! Unique-entity counts for the report's fixed metrics.

use std::collections::{BTreeMap, HashSet};

use crate::tables::{FeedContainer, Table};

pub const COUNT_SHAPES: &str = "Shapes";
pub const COUNT_STOPS: &str = "Stops";
pub const COUNT_ROUTES: &str = "Routes";
pub const COUNT_TRIPS: &str = "Trips";
pub const COUNT_AGENCIES: &str = "Agencies";
pub const COUNT_BLOCKS: &str = "Blocks";

/// Counts distinct non-empty identifiers produced by `id` over the table.
///
/// A missing or empty table yields 0; rows without an identifier are ignored
/// rather than treated as an error.
pub fn unique_count<R, F>(table: &Table<R>, id: F) -> usize
where
    F: Fn(&R) -> Option<&str>,
{
    let mut seen = HashSet::new();
    for row in table.rows() {
        if let Some(id) = id(row) {
            if !id.is_empty() {
                seen.insert(id);
            }
        }
    }
    seen.len()
}

/// The six fixed metrics, keyed by report name. `BTreeMap` keeps iteration
/// lexicographic, which is the order the renderer expects.
pub fn entity_counts(feed: &FeedContainer) -> BTreeMap<&'static str, usize> {
    let mut counts = BTreeMap::new();
    counts.insert(
        COUNT_SHAPES,
        unique_count(&feed.shapes, |s| Some(s.shape_id.as_str())),
    );
    counts.insert(
        COUNT_STOPS,
        unique_count(&feed.stops, |s| Some(s.stop_id.as_str())),
    );
    counts.insert(
        COUNT_ROUTES,
        unique_count(&feed.routes, |r| Some(r.route_id.as_str())),
    );
    counts.insert(
        COUNT_TRIPS,
        unique_count(&feed.trips, |t| Some(t.trip_id.as_str())),
    );
    counts.insert(
        COUNT_AGENCIES,
        unique_count(&feed.agencies, |a| a.agency_id.as_deref()),
    );
    counts.insert(
        COUNT_BLOCKS,
        unique_count(&feed.trips, |t| t.block_id.as_deref()),
    );
    counts
}
