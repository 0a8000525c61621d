//! Free-slot computation.
//!
//! Subtracts committed bookings from the day's open windows. Booked intervals
//! are unioned into maximal occupied ranges first, then removed from each
//! window; fragments shorter than the minimum slot duration are discarded.

use chrono::Duration;
use serde::{Deserialize, Serialize};

use crate::interval::{coalesce, TimeInterval};
use crate::types::BookedInterval;

/// Default minimum bookable slot length.
pub const DEFAULT_MIN_SLOT_MINUTES: i64 = 10;

/// The available-slots result for one provider-date.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AvailableSlots {
    /// Surviving free intervals, sorted by start time.
    pub slots: Vec<TimeInterval>,
    /// True when at least one slot survived the minimum-duration filter.
    pub is_day_available: bool,
}

/// Compute the bookable slots left after subtracting `booked` from
/// `open_windows`.
///
/// Booked intervals may arrive unsorted and may overlap each other; they are
/// treated as already valid and simply unioned. A booking that exactly abuts
/// a window boundary does not shrink the window (closed-open semantics).
/// Output is fully determined by the input multiset regardless of ordering.
pub fn compute_available_slots(
    open_windows: &[TimeInterval],
    booked: &[BookedInterval],
    min_duration: Duration,
) -> AvailableSlots {
    let occupied = coalesce(booked.iter().map(|b| b.interval).collect());

    let mut slots: Vec<TimeInterval> = Vec::new();
    for window in open_windows {
        let mut fragments = vec![*window];
        for range in occupied.iter().filter(|r| r.overlaps(window)) {
            fragments = fragments
                .into_iter()
                .flat_map(|f| f.subtract(range))
                .collect();
        }
        slots.extend(fragments.into_iter().filter(|f| f.duration() >= min_duration));
    }
    slots.sort();

    let is_day_available = !slots.is_empty();
    AvailableSlots {
        slots,
        is_day_available,
    }
}

/// Find the first free slot of at least `min_duration`.
///
/// Delegates to [`compute_available_slots`] and returns the earliest
/// surviving slot, if any.
pub fn find_first_available_slot(
    open_windows: &[TimeInterval],
    booked: &[BookedInterval],
    min_duration: Duration,
) -> Option<TimeInterval> {
    compute_available_slots(open_windows, booked, min_duration)
        .slots
        .into_iter()
        .next()
}
