//! Derivation of the feed summary report.
//!
//! This module walks a loaded [`crate::tables::FeedContainer`] once and
//! produces the [`feed::FeedMetadata`] aggregate: unique-entity counts, the
//! optional-feature catalog, per-agency records, feed-info fields, and the
//! reconciled service date window.

pub mod agency;
pub mod counts;
pub mod features;
pub mod feed;
pub mod window;
