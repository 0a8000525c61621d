//! Point-in-time availability classification.
//!
//! Answers whether a single requested interval is AVAILABLE, BLOCKED, or
//! OUTSIDE_WORKING_HOURS. Precedence is fixed: a BLOCKED exception overlap
//! wins over containment in an open window. Committed bookings are not
//! consulted here; double-booking is the timeline's concern.

use chrono::NaiveDate;

use crate::interval::TimeInterval;
use crate::resolver::resolve_open_windows;
use crate::types::{AvailabilityStatus, DateException, ExceptionKind, RecurringRule};

/// Classify a requested interval against a provider's day.
///
/// A request not contained in any open window is `OutsideWorkingHours` even
/// when no exception applies; an unavailable day and a missing rule look the
/// same to the caller.
pub fn classify_status(
    date: NaiveDate,
    service_id: Option<&str>,
    rules: &[RecurringRule],
    exceptions: &[DateException],
    requested: TimeInterval,
) -> AvailabilityStatus {
    let blocked = exceptions
        .iter()
        .filter(|e| e.applies_on(date, service_id) && e.kind == ExceptionKind::Blocked)
        .any(|e| match e.interval {
            // A whole-day closure blocks every request.
            None => true,
            Some(interval) => interval.overlaps(&requested),
        });
    if blocked {
        return AvailabilityStatus::Blocked;
    }

    let windows = resolve_open_windows(date, service_id, rules, exceptions);
    if windows.iter().any(|w| w.contains(&requested)) {
        AvailabilityStatus::Available
    } else {
        AvailabilityStatus::OutsideWorkingHours
    }
}
