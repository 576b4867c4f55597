//! Typed rows for the GTFS files the summary inspects.
//!
//! Optional columns are `Option<T>`: a `None` means the field was absent on
//! that row (or the column was missing entirely), which is exactly the
//! presence test the feature detectors need. GTFS times may run past
//! 24:00:00, so they stay raw strings; only their presence is read here.

use chrono::NaiveDate;
use serde::{Deserialize, Deserializer};

use crate::dates::de_service_date;

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Agency {
    #[serde(default)]
    pub agency_id: Option<String>,
    pub agency_name: String,
    pub agency_url: String,
    #[serde(default)]
    pub agency_timezone: Option<String>,
    #[serde(default)]
    pub agency_phone: Option<String>,
    #[serde(default)]
    pub agency_email: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Stop {
    pub stop_id: String,
    #[serde(default)]
    pub stop_name: Option<String>,
    #[serde(default)]
    pub tts_stop_name: Option<String>,
    #[serde(default)]
    pub location_type: Option<u8>,
    #[serde(default)]
    pub wheelchair_boarding: Option<u8>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Route {
    pub route_id: String,
    #[serde(default)]
    pub agency_id: Option<String>,
    #[serde(default)]
    pub route_short_name: Option<String>,
    #[serde(default)]
    pub route_long_name: Option<String>,
    #[serde(default)]
    pub route_type: Option<u16>,
    #[serde(default)]
    pub route_color: Option<String>,
    #[serde(default)]
    pub route_text_color: Option<String>,
    #[serde(default)]
    pub network_id: Option<String>,
    #[serde(default)]
    pub continuous_pickup: Option<u8>,
    #[serde(default)]
    pub continuous_drop_off: Option<u8>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Trip {
    pub route_id: String,
    pub service_id: String,
    pub trip_id: String,
    #[serde(default)]
    pub trip_headsign: Option<String>,
    #[serde(default)]
    pub block_id: Option<String>,
    #[serde(default)]
    pub shape_id: Option<String>,
    #[serde(default)]
    pub wheelchair_accessible: Option<u8>,
    #[serde(default)]
    pub bikes_allowed: Option<u8>,
}

/// One scheduled (or demand-responsive) stop visit. `stop_id` and
/// `location_id` are mutually exclusive in well-formed feeds, which is what
/// the demand-responsive feature detectors key off.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct StopTime {
    #[serde(default)]
    pub trip_id: Option<String>,
    #[serde(default)]
    pub arrival_time: Option<String>,
    #[serde(default)]
    pub departure_time: Option<String>,
    #[serde(default)]
    pub stop_id: Option<String>,
    #[serde(default)]
    pub location_id: Option<String>,
    #[serde(default)]
    pub stop_sequence: Option<u32>,
    #[serde(default)]
    pub stop_headsign: Option<String>,
    #[serde(default)]
    pub continuous_pickup: Option<u8>,
    #[serde(default)]
    pub continuous_drop_off: Option<u8>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Calendar {
    pub service_id: String,
    #[serde(default)]
    pub monday: u8,
    #[serde(default)]
    pub tuesday: u8,
    #[serde(default)]
    pub wednesday: u8,
    #[serde(default)]
    pub thursday: u8,
    #[serde(default)]
    pub friday: u8,
    #[serde(default)]
    pub saturday: u8,
    #[serde(default)]
    pub sunday: u8,
    #[serde(default, deserialize_with = "de_service_date")]
    pub start_date: Option<NaiveDate>,
    #[serde(default, deserialize_with = "de_service_date")]
    pub end_date: Option<NaiveDate>,
}

/// Whether a calendar exception adds or removes service on its date.
/// GTFS encodes this as 1 (added) or 2 (removed); anything else leaves
/// service in place.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ExceptionType {
    #[default]
    Added,
    Removed,
}

impl<'de> Deserialize<'de> for ExceptionType {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = u8::deserialize(deserializer)?;
        Ok(match raw {
            2 => ExceptionType::Removed,
            _ => ExceptionType::Added,
        })
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CalendarDate {
    pub service_id: String,
    #[serde(default, deserialize_with = "de_service_date")]
    pub date: Option<NaiveDate>,
    #[serde(default)]
    pub exception_type: ExceptionType,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct FeedInfo {
    pub feed_publisher_name: String,
    pub feed_publisher_url: String,
    pub feed_lang: String,
    #[serde(default)]
    pub feed_contact_email: Option<String>,
    #[serde(default)]
    pub feed_contact_url: Option<String>,
    #[serde(default, deserialize_with = "de_service_date")]
    pub feed_start_date: Option<NaiveDate>,
    #[serde(default, deserialize_with = "de_service_date")]
    pub feed_end_date: Option<NaiveDate>,
    #[serde(default)]
    pub feed_version: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Shape {
    pub shape_id: String,
    #[serde(default)]
    pub shape_pt_lat: f64,
    #[serde(default)]
    pub shape_pt_lon: f64,
    #[serde(default)]
    pub shape_pt_sequence: u32,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Frequency {
    pub trip_id: String,
    #[serde(default)]
    pub start_time: Option<String>,
    #[serde(default)]
    pub end_time: Option<String>,
    #[serde(default)]
    pub headway_secs: Option<u32>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Pathway {
    pub pathway_id: String,
    #[serde(default)]
    pub from_stop_id: Option<String>,
    #[serde(default)]
    pub to_stop_id: Option<String>,
    #[serde(default)]
    pub pathway_mode: Option<u8>,
    #[serde(default)]
    pub is_bidirectional: Option<u8>,
    #[serde(default)]
    pub length: Option<f64>,
    #[serde(default)]
    pub traversal_time: Option<u32>,
    #[serde(default)]
    pub stair_count: Option<i32>,
    #[serde(default)]
    pub max_slope: Option<f64>,
    #[serde(default)]
    pub min_width: Option<f64>,
    #[serde(default)]
    pub signposted_as: Option<String>,
    #[serde(default)]
    pub reversed_signposted_as: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Transfer {
    #[serde(default)]
    pub from_stop_id: Option<String>,
    #[serde(default)]
    pub to_stop_id: Option<String>,
    #[serde(default)]
    pub transfer_type: Option<u8>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct FareAttribute {
    pub fare_id: String,
    #[serde(default)]
    pub price: Option<f64>,
    #[serde(default)]
    pub currency_type: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct FareProduct {
    pub fare_product_id: String,
    #[serde(default)]
    pub fare_product_name: Option<String>,
    #[serde(default)]
    pub amount: Option<f64>,
    #[serde(default)]
    pub currency: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct FareMedia {
    pub fare_media_id: String,
    #[serde(default)]
    pub fare_media_type: Option<u8>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct FareTransferRule {
    #[serde(default)]
    pub from_leg_group_id: Option<String>,
    #[serde(default)]
    pub to_leg_group_id: Option<String>,
    #[serde(default)]
    pub fare_product_id: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Area {
    pub area_id: String,
    #[serde(default)]
    pub area_name: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Timeframe {
    pub timeframe_group_id: String,
    #[serde(default)]
    pub start_time: Option<String>,
    #[serde(default)]
    pub end_time: Option<String>,
    #[serde(default)]
    pub service_id: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Network {
    pub network_id: String,
    #[serde(default)]
    pub network_name: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Level {
    pub level_id: String,
    #[serde(default)]
    pub level_index: Option<f64>,
    #[serde(default)]
    pub level_name: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct BookingRule {
    pub booking_rule_id: String,
    #[serde(default)]
    pub booking_type: Option<u8>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct LocationGroup {
    pub location_group_id: String,
    #[serde(default)]
    pub location_group_name: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Attribution {
    #[serde(default)]
    pub attribution_id: Option<String>,
    pub organization_name: String,
    #[serde(default)]
    pub is_producer: Option<u8>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Translation {
    pub table_name: String,
    pub field_name: String,
    pub language: String,
    pub translation: String,
}
