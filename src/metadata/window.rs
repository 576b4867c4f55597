//! Service date window resolution.
//!
//! A feed defines when services run through `calendar.txt` weekday ranges,
//! `calendar_dates.txt` exception lists, or both at once. This module folds
//! the services referenced by the feed's trips into one earliest-start /
//! latest-end window, excluding sentinel dates and nudging boundaries off
//! explicitly cancelled days.

use std::collections::{BTreeSet, HashMap};

use chrono::{Days, NaiveDate};
use thiserror::Error;

use crate::dates;
use crate::model::{Calendar, CalendarDate, ExceptionType, Trip};

/// The resolved date range during which any referenced service runs.
/// Either bound may be undefined when the feed gives no usable dates.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ServiceWindow {
    pub start: Option<NaiveDate>,
    pub end: Option<NaiveDate>,
}

impl ServiceWindow {
    fn widen(&mut self, start: NaiveDate, end: NaiveDate) {
        if self.start.is_none_or(|s| start < s) {
            self.start = Some(start);
        }
        if self.end.is_none_or(|e| end > e) {
            self.end = Some(end);
        }
    }

    /// Human-readable rendering for the report.
    ///
    /// An inverted range reads as undefined rather than backwards.
    pub fn display(&self) -> String {
        match (self.start, self.end) {
            (None, None) => "N/A".to_string(),
            (None, Some(end)) => dates::format_long(end),
            (Some(start), None) => dates::format_long(start),
            (Some(start), Some(end)) if start > end => "N/A".to_string(),
            (Some(start), Some(end)) => {
                format!("{} to {}", dates::format_long(start), dates::format_long(end))
            }
        }
    }

    /// ISO start date for machine use; empty when undefined.
    pub fn start_iso(&self) -> String {
        self.start.map(|d| d.to_string()).unwrap_or_default()
    }

    /// ISO end date for machine use; empty when undefined.
    pub fn end_iso(&self) -> String {
        self.end.map(|d| d.to_string()).unwrap_or_default()
    }
}

/// Why resolution stopped early.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum WindowError {
    #[error("trip {trip_id} references service id {service_id} with no calendar or exception rows")]
    UnknownServiceId { trip_id: String, service_id: String },
}

/// Outcome of [`resolve`]: a clean window, or the partial window accumulated
/// before resolution had to stop.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WindowResolution {
    Resolved(ServiceWindow),
    Failed {
        partial: ServiceWindow,
        error: WindowError,
    },
}

impl WindowResolution {
    /// The usable window either way; a failed resolution still reports what
    /// it had accumulated.
    pub fn window(&self) -> ServiceWindow {
        match self {
            WindowResolution::Resolved(window) => *window,
            WindowResolution::Failed { partial, .. } => *partial,
        }
    }
}

/// Combined view of one service id when both definition mechanisms coexist:
/// the weekday range plus the days explicitly removed from it.
#[derive(Debug, Clone, Default)]
struct ServicePeriod {
    start: Option<NaiveDate>,
    end: Option<NaiveDate>,
    removed_days: BTreeSet<NaiveDate>,
}

/// Resolves the service window across every service referenced by `trips`.
///
/// `calendars` / `calendar_dates` are `None` when the corresponding file is
/// absent from the feed; callers invoke this only when at least one is
/// present.
pub fn resolve(
    trips: &[Trip],
    calendars: Option<&[Calendar]>,
    calendar_dates: Option<&[CalendarDate]>,
) -> WindowResolution {
    match (calendars, calendar_dates) {
        (Some(calendars), None) => WindowResolution::Resolved(from_calendars(trips, calendars)),
        (None, Some(exceptions)) => {
            WindowResolution::Resolved(from_calendar_dates(trips, exceptions))
        }
        (Some(calendars), Some(exceptions)) => from_both(trips, calendars, exceptions),
        (None, None) => WindowResolution::Resolved(ServiceWindow::default()),
    }
}

fn from_calendars(trips: &[Trip], calendars: &[Calendar]) -> ServiceWindow {
    let mut window = ServiceWindow::default();
    for trip in trips {
        for calendar in calendars.iter().filter(|c| c.service_id == trip.service_id) {
            // A row missing either bound is skipped whole so it cannot
            // establish only one side of the range.
            let (Some(start), Some(end)) = (
                dates::real_date(calendar.start_date),
                dates::real_date(calendar.end_date),
            ) else {
                continue;
            };
            window.widen(start, end);
        }
    }
    window
}

fn from_calendar_dates(trips: &[Trip], exceptions: &[CalendarDate]) -> ServiceWindow {
    let mut window = ServiceWindow::default();
    for trip in trips {
        for exception in exceptions
            .iter()
            .filter(|e| e.service_id == trip.service_id)
        {
            if let Some(date) = dates::real_date(exception.date) {
                // A single exception day is a window of exactly that day.
                window.widen(date, date);
            }
        }
    }
    window
}

fn from_both(
    trips: &[Trip],
    calendars: &[Calendar],
    exceptions: &[CalendarDate],
) -> WindowResolution {
    let periods = build_service_periods(calendars, exceptions);

    let mut window = ServiceWindow::default();
    let mut removed_days: BTreeSet<NaiveDate> = BTreeSet::new();
    for trip in trips {
        let Some(period) = periods.get(&trip.service_id) else {
            return WindowResolution::Failed {
                partial: window,
                error: WindowError::UnknownServiceId {
                    trip_id: trip.trip_id.clone(),
                    service_id: trip.service_id.clone(),
                },
            };
        };
        if let (Some(start), Some(end)) = (period.start, period.end) {
            window.widen(start, end);
        }
        removed_days.extend(period.removed_days.iter().copied());
    }

    // When coverage begins or ends on an explicitly cancelled day the real
    // boundary is the neighbouring day. One step per removed day; a run of
    // consecutive cancelled days at the end is not scanned through.
    for day in &removed_days {
        if window.start == Some(*day) {
            window.start = day.checked_add_days(Days::new(1));
        }
        if window.end == Some(*day) {
            window.end = day.checked_sub_days(Days::new(1));
        }
    }

    WindowResolution::Resolved(window)
}

/// One combined period per service id. A service appearing only in the
/// exception table gets an unset range but still carries its removed days.
fn build_service_periods(
    calendars: &[Calendar],
    exceptions: &[CalendarDate],
) -> HashMap<String, ServicePeriod> {
    let mut periods: HashMap<String, ServicePeriod> = HashMap::new();
    for calendar in calendars {
        let period = periods.entry(calendar.service_id.clone()).or_default();
        period.start = dates::real_date(calendar.start_date);
        period.end = dates::real_date(calendar.end_date);
    }
    for exception in exceptions {
        let period = periods.entry(exception.service_id.clone()).or_default();
        if exception.exception_type == ExceptionType::Removed {
            if let Some(date) = dates::real_date(exception.date) {
                period.removed_days.insert(date);
            }
        }
    }
    periods
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn trip(id: &str, service_id: &str) -> Trip {
        Trip {
            trip_id: id.to_string(),
            service_id: service_id.to_string(),
            ..Trip::default()
        }
    }

    fn calendar(service_id: &str, start: Option<NaiveDate>, end: Option<NaiveDate>) -> Calendar {
        Calendar {
            service_id: service_id.to_string(),
            start_date: start,
            end_date: end,
            ..Calendar::default()
        }
    }

    fn exception(service_id: &str, date: NaiveDate, exception_type: ExceptionType) -> CalendarDate {
        CalendarDate {
            service_id: service_id.to_string(),
            date: Some(date),
            exception_type,
        }
    }

    #[test]
    fn test_calendar_only_window() {
        let trips = vec![trip("t1", "wk")];
        let calendars = vec![calendar(
            "wk",
            Some(date(2020, 1, 1)),
            Some(date(2020, 1, 31)),
        )];
        let resolution = resolve(&trips, Some(&calendars), None);
        let window = resolution.window();
        assert_eq!(window.start, Some(date(2020, 1, 1)));
        assert_eq!(window.end, Some(date(2020, 1, 31)));
        assert_eq!(window.display(), "January 1, 2020 to January 31, 2020");
    }

    #[test]
    fn test_calendar_with_sentinel_bound_is_skipped_whole() {
        let trips = vec![trip("t1", "wk")];
        let calendars = vec![
            calendar("wk", Some(NaiveDate::default()), Some(date(2020, 1, 31))),
            calendar("wk", Some(date(2020, 2, 1)), Some(date(2020, 2, 28))),
        ];
        let window = resolve(&trips, Some(&calendars), None).window();
        // The half-valid row contributes neither bound.
        assert_eq!(window.start, Some(date(2020, 2, 1)));
        assert_eq!(window.end, Some(date(2020, 2, 28)));
    }

    #[test]
    fn test_exception_only_single_day() {
        let trips = vec![trip("t1", "ex")];
        let exceptions = vec![exception("ex", date(2020, 6, 15), ExceptionType::Added)];
        let window = resolve(&trips, None, Some(&exceptions)).window();
        assert_eq!(window.start, Some(date(2020, 6, 15)));
        assert_eq!(window.end, Some(date(2020, 6, 15)));
        assert_eq!(window.display(), "June 15, 2020");
    }

    #[test]
    fn test_exception_only_spans_min_to_max() {
        let trips = vec![trip("t1", "ex")];
        let exceptions = vec![
            exception("ex", date(2020, 6, 15), ExceptionType::Added),
            exception("ex", date(2020, 3, 2), ExceptionType::Added),
            exception("ex", date(2020, 9, 20), ExceptionType::Removed),
        ];
        let window = resolve(&trips, None, Some(&exceptions)).window();
        assert_eq!(window.start, Some(date(2020, 3, 2)));
        assert_eq!(window.end, Some(date(2020, 9, 20)));
    }

    #[test]
    fn test_combined_removed_first_day_advances_start() {
        let trips = vec![trip("t1", "wk")];
        let calendars = vec![calendar(
            "wk",
            Some(date(2020, 1, 1)),
            Some(date(2020, 1, 31)),
        )];
        let exceptions = vec![exception("wk", date(2020, 1, 1), ExceptionType::Removed)];
        let window = resolve(&trips, Some(&calendars), Some(&exceptions)).window();
        assert_eq!(window.start, Some(date(2020, 1, 2)));
        assert_eq!(window.end, Some(date(2020, 1, 31)));
    }

    #[test]
    fn test_combined_removed_last_day_retreats_end() {
        let trips = vec![trip("t1", "wk")];
        let calendars = vec![calendar(
            "wk",
            Some(date(2020, 1, 1)),
            Some(date(2020, 1, 31)),
        )];
        let exceptions = vec![exception("wk", date(2020, 1, 31), ExceptionType::Removed)];
        let window = resolve(&trips, Some(&calendars), Some(&exceptions)).window();
        assert_eq!(window.start, Some(date(2020, 1, 1)));
        assert_eq!(window.end, Some(date(2020, 1, 30)));
    }

    #[test]
    fn test_combined_interior_removed_day_leaves_bounds() {
        let trips = vec![trip("t1", "wk")];
        let calendars = vec![calendar(
            "wk",
            Some(date(2020, 1, 1)),
            Some(date(2020, 1, 31)),
        )];
        let exceptions = vec![exception("wk", date(2020, 1, 15), ExceptionType::Removed)];
        let window = resolve(&trips, Some(&calendars), Some(&exceptions)).window();
        assert_eq!(window.start, Some(date(2020, 1, 1)));
        assert_eq!(window.end, Some(date(2020, 1, 31)));
    }

    #[test]
    fn test_combined_exception_only_service_contributes_removed_days() {
        // "wk" has the range; "ex" exists only in calendar_dates, so it has
        // no bounds of its own but still cancels the range's first day.
        let trips = vec![trip("t1", "wk"), trip("t2", "ex")];
        let calendars = vec![calendar(
            "wk",
            Some(date(2020, 1, 1)),
            Some(date(2020, 1, 31)),
        )];
        let exceptions = vec![exception("ex", date(2020, 1, 1), ExceptionType::Removed)];
        let window = resolve(&trips, Some(&calendars), Some(&exceptions)).window();
        assert_eq!(window.start, Some(date(2020, 1, 2)));
        assert_eq!(window.end, Some(date(2020, 1, 31)));
    }

    #[test]
    fn test_combined_dangling_service_id_keeps_partial() {
        let trips = vec![trip("t1", "wk"), trip("t2", "ghost"), trip("t3", "wk2")];
        let calendars = vec![
            calendar("wk", Some(date(2020, 1, 1)), Some(date(2020, 1, 31))),
            calendar("wk2", Some(date(2019, 1, 1)), Some(date(2021, 1, 1))),
        ];
        let exceptions = vec![exception("wk", date(2020, 6, 1), ExceptionType::Removed)];
        let resolution = resolve(&trips, Some(&calendars), Some(&exceptions));
        match &resolution {
            WindowResolution::Failed { partial, error } => {
                // Only the trips seen before the dangling reference count.
                assert_eq!(partial.start, Some(date(2020, 1, 1)));
                assert_eq!(partial.end, Some(date(2020, 1, 31)));
                assert_eq!(
                    *error,
                    WindowError::UnknownServiceId {
                        trip_id: "t2".to_string(),
                        service_id: "ghost".to_string(),
                    }
                );
            }
            WindowResolution::Resolved(_) => panic!("expected failed resolution"),
        }
        assert_eq!(resolution.window().start, Some(date(2020, 1, 1)));
    }

    #[test]
    fn test_dangling_service_id_harmless_in_single_table_modes() {
        let trips = vec![trip("t1", "ghost"), trip("t2", "wk")];
        let calendars = vec![calendar(
            "wk",
            Some(date(2020, 1, 1)),
            Some(date(2020, 1, 31)),
        )];
        let window = resolve(&trips, Some(&calendars), None).window();
        assert_eq!(window.start, Some(date(2020, 1, 1)));
        assert_eq!(window.end, Some(date(2020, 1, 31)));
    }

    #[test]
    fn test_display_undefined_window() {
        assert_eq!(ServiceWindow::default().display(), "N/A");
    }

    #[test]
    fn test_display_single_bounds() {
        let start_only = ServiceWindow {
            start: Some(date(2020, 5, 4)),
            end: None,
        };
        assert_eq!(start_only.display(), "May 4, 2020");
        let end_only = ServiceWindow {
            start: None,
            end: Some(date(2020, 5, 4)),
        };
        assert_eq!(end_only.display(), "May 4, 2020");
    }

    #[test]
    fn test_display_inverted_window_is_undefined() {
        let inverted = ServiceWindow {
            start: Some(date(2020, 5, 4)),
            end: Some(date(2020, 5, 1)),
        };
        assert_eq!(inverted.display(), "N/A");
    }

    #[test]
    fn test_iso_accessors() {
        let window = ServiceWindow {
            start: Some(date(2020, 1, 2)),
            end: None,
        };
        assert_eq!(window.start_iso(), "2020-01-02");
        assert_eq!(window.end_iso(), "");
    }
}
