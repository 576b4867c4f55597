//! The catalog of optional GTFS capabilities a feed exercises.
//!
//! Detectors come in two shapes: file-presence (the named file exists with
//! at least one row) and field-presence (at least one row where a set of
//! fields is populated together on that same row). The registry order below
//! is the report order, and every registered name always appears in the
//! outcome, `false` included. A detector looking at a missing file reads it
//! as having no rows.

use serde::ser::{Serialize, SerializeMap, Serializer};

use crate::model::{Pathway, Route, Stop, StopTime, Trip};
use crate::tables::{FeedContainer, Table, files};

/// File-presence features, in report order.
const FILE_FEATURES: &[(&str, &str)] = &[
    ("Pathways (basic)", files::PATHWAYS),
    ("Transfers", files::TRANSFERS),
    ("Fares V1", files::FARE_ATTRIBUTES),
    ("Fare Products", files::FARE_PRODUCTS),
    ("Shapes", files::SHAPES),
    ("Frequencies", files::FREQUENCIES),
    ("Feed Information", files::FEED_INFO),
    ("Attributions", files::ATTRIBUTIONS),
    ("Translations", files::TRANSLATIONS),
    ("Fare Media", files::FARE_MEDIA),
    ("Zone-Based Fares", files::AREAS),
    ("Transfer Fares", files::FARE_TRANSFER_RULES),
    ("Time-Based Fares", files::TIMEFRAMES),
    ("Levels", files::LEVELS),
    ("Booking Rules", files::BOOKING_RULES),
    ("Fixed-Stops Demand Responsive Transit", files::LOCATION_GROUPS),
];

/// Field-presence features, evaluated after the file-based ones.
const FIELD_FEATURES: &[(&str, fn(&FeedContainer) -> bool)] = &[
    ("Route Colors", route_colors),
    ("Headsigns", headsigns),
    ("Wheelchair Accessibility", wheelchair_accessibility),
    ("Text-To-Speech", text_to_speech),
    ("Bikes Allowance", bikes_allowance),
    ("Location Types", location_types),
    ("Traversal Time", traversal_time),
    ("Pathways Directions", pathway_directions),
    ("Pathways (extra)", pathway_details),
    ("Route-Based Fares", route_based_fares),
    ("Continuous Stops", continuous_stops),
    (
        "Zone-Based Demand Responsive Transit",
        zone_based_demand_responsive,
    ),
    ("Deviated Fixed Route", deviated_fixed_route),
];

/// Ordered feature outcomes; serializes as a map in evaluation order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpecFeatures(Vec<(&'static str, bool)>);

impl SpecFeatures {
    pub fn get(&self, name: &str) -> Option<bool> {
        self.0
            .iter()
            .find(|(feature, _)| *feature == name)
            .map(|(_, enabled)| *enabled)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&'static str, bool)> + '_ {
        self.0.iter().copied()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl Serialize for SpecFeatures {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (name, enabled) in &self.0 {
            map.serialize_entry(name, enabled)?;
        }
        map.end()
    }
}

/// Evaluates every registered feature against the feed.
pub fn detect_features(feed: &FeedContainer) -> SpecFeatures {
    let mut outcomes = Vec::with_capacity(FILE_FEATURES.len() + FIELD_FEATURES.len());
    for (name, file) in FILE_FEATURES {
        outcomes.push((*name, feed.row_count(file) > 0));
    }
    for (name, detect) in FIELD_FEATURES {
        outcomes.push((*name, detect(feed)));
    }
    SpecFeatures(outcomes)
}

/// True when at least one row satisfies `condition`.
fn any_row<R>(table: &Table<R>, condition: impl Fn(&R) -> bool) -> bool {
    table.rows().iter().any(|row| condition(row))
}

fn route_colors(feed: &FeedContainer) -> bool {
    any_row(&feed.routes, |r: &Route| r.route_color.is_some())
        || any_row(&feed.routes, |r: &Route| r.route_text_color.is_some())
}

fn headsigns(feed: &FeedContainer) -> bool {
    any_row(&feed.trips, |t: &Trip| t.trip_headsign.is_some())
        || any_row(&feed.stop_times, |s: &StopTime| s.stop_headsign.is_some())
}

fn wheelchair_accessibility(feed: &FeedContainer) -> bool {
    any_row(&feed.trips, |t: &Trip| t.wheelchair_accessible.is_some())
        || any_row(&feed.stops, |s: &Stop| s.wheelchair_boarding.is_some())
}

fn text_to_speech(feed: &FeedContainer) -> bool {
    any_row(&feed.stops, |s: &Stop| s.tts_stop_name.is_some())
}

fn bikes_allowance(feed: &FeedContainer) -> bool {
    any_row(&feed.trips, |t: &Trip| t.bikes_allowed.is_some())
}

fn location_types(feed: &FeedContainer) -> bool {
    any_row(&feed.stops, |s: &Stop| s.location_type.is_some())
}

fn traversal_time(feed: &FeedContainer) -> bool {
    any_row(&feed.pathways, |p: &Pathway| p.traversal_time.is_some())
}

/// Both signs must be populated on the same row; one of each across two
/// rows does not count.
fn pathway_directions(feed: &FeedContainer) -> bool {
    any_row(&feed.pathways, |p: &Pathway| {
        p.signposted_as.is_some() && p.reversed_signposted_as.is_some()
    })
}

fn pathway_details(feed: &FeedContainer) -> bool {
    any_row(&feed.pathways, |p: &Pathway| p.max_slope.is_some())
        || any_row(&feed.pathways, |p: &Pathway| p.min_width.is_some())
        || any_row(&feed.pathways, |p: &Pathway| p.length.is_some())
        || any_row(&feed.pathways, |p: &Pathway| p.stair_count.is_some())
}

fn route_based_fares(feed: &FeedContainer) -> bool {
    any_row(&feed.routes, |r: &Route| r.network_id.is_some())
        || feed.row_count(files::NETWORKS) > 0
}

fn continuous_stops(feed: &FeedContainer) -> bool {
    any_row(&feed.routes, |r: &Route| r.continuous_drop_off.is_some())
        || any_row(&feed.routes, |r: &Route| r.continuous_pickup.is_some())
        || any_row(&feed.stop_times, |s: &StopTime| {
            s.continuous_drop_off.is_some()
        })
        || any_row(&feed.stop_times, |s: &StopTime| {
            s.continuous_pickup.is_some()
        })
}

/// Any stop-time row that names a location instead of a stop.
fn zone_based_demand_responsive(feed: &FeedContainer) -> bool {
    any_row(&feed.stop_times, |s: &StopTime| {
        s.trip_id.is_some() && s.location_id.is_some() && s.stop_id.is_none()
    })
}

/// Looks at the first stop-time row only: the feed qualifies when that row
/// carries a trip id, a location id, a stop id and both times together.
/// Later rows are deliberately not scanned; widening this to an any-row
/// check would change which feeds report the capability.
fn deviated_fixed_route(feed: &FeedContainer) -> bool {
    feed.stop_times.first().is_some_and(|s| {
        s.trip_id.is_some()
            && s.location_id.is_some()
            && s.stop_id.is_some()
            && s.arrival_time.is_some()
            && s.departure_time.is_some()
    })
}
