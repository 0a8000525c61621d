//! The half-open `[start, end)` time-of-day interval primitive.
//!
//! Every other module builds on this type. Closed-open semantics mean an
//! interval ending at `T` and one starting at `T` are adjacent, not
//! overlapping, so back-to-back bookings are legal.

use std::fmt;

use chrono::{Duration, NaiveTime};
use serde::{Deserialize, Serialize};

use crate::error::{Result, SlotError};

/// A half-open `[start, end)` range within a single day.
///
/// Invariants: `start < end` (never zero-length). Ordering is by `start`,
/// then `end`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "IntervalRepr")]
pub struct TimeInterval {
    start: NaiveTime,
    end: NaiveTime,
}

/// Raw wire shape; validated into a [`TimeInterval`] on deserialization.
#[derive(Deserialize)]
struct IntervalRepr {
    start: NaiveTime,
    end: NaiveTime,
}

impl TryFrom<IntervalRepr> for TimeInterval {
    type Error = SlotError;

    fn try_from(raw: IntervalRepr) -> Result<Self> {
        TimeInterval::new(raw.start, raw.end)
    }
}

impl TimeInterval {
    /// Create a new interval.
    ///
    /// # Errors
    /// Returns [`SlotError::InvalidInterval`] unless `start < end`.
    pub fn new(start: NaiveTime, end: NaiveTime) -> Result<Self> {
        if start < end {
            Ok(Self { start, end })
        } else {
            Err(SlotError::InvalidInterval { start, end })
        }
    }

    pub fn start(&self) -> NaiveTime {
        self.start
    }

    pub fn end(&self) -> NaiveTime {
        self.end
    }

    pub fn duration(&self) -> Duration {
        self.end - self.start
    }

    pub fn duration_minutes(&self) -> i64 {
        self.duration().num_minutes()
    }

    /// True when the two intervals share a sub-range of positive length.
    ///
    /// `a.overlaps(b)` iff `a.start < b.end && b.start < a.end`. The adjacent
    /// case where `a.end == b.start` is NOT an overlap.
    pub fn overlaps(&self, other: &TimeInterval) -> bool {
        self.start < other.end && other.start < self.end
    }

    /// True when the two intervals share exactly one boundary point and
    /// nothing else.
    pub fn touches(&self, other: &TimeInterval) -> bool {
        self.end == other.start || other.end == self.start
    }

    /// True when `other` lies entirely within `self` (boundaries may
    /// coincide).
    pub fn contains(&self, other: &TimeInterval) -> bool {
        self.start <= other.start && other.end <= self.end
    }

    /// Remove `other` from `self`, yielding the 0, 1, or 2 remaining pieces.
    ///
    /// Subtracting a non-overlapping interval returns `self` unchanged;
    /// subtracting a covering interval returns nothing; carving out the
    /// middle returns both remainders.
    pub fn subtract(&self, other: &TimeInterval) -> Vec<TimeInterval> {
        if !self.overlaps(other) {
            return vec![*self];
        }
        let mut pieces = Vec::with_capacity(2);
        if self.start < other.start {
            pieces.push(Self {
                start: self.start,
                end: other.start,
            });
        }
        if other.end < self.end {
            pieces.push(Self {
                start: other.end,
                end: self.end,
            });
        }
        pieces
    }

    /// Merge two touching or overlapping intervals into their union.
    ///
    /// Returns `None` when the intervals are disjoint with a gap between
    /// them, since the union would not be a single interval.
    pub fn merge(&self, other: &TimeInterval) -> Option<TimeInterval> {
        if self.overlaps(other) || self.touches(other) {
            Some(Self {
                start: self.start.min(other.start),
                end: self.end.max(other.end),
            })
        } else {
            None
        }
    }
}

impl fmt::Display for TimeInterval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}-{}",
            self.start.format("%H:%M"),
            self.end.format("%H:%M")
        )
    }
}

/// Coalesce intervals into maximal contiguous ranges.
///
/// Sorts by `(start, end)` and merges any touching or overlapping neighbors.
/// The result is sorted and pairwise disjoint (no touching entries remain).
pub fn coalesce(mut intervals: Vec<TimeInterval>) -> Vec<TimeInterval> {
    if intervals.is_empty() {
        return intervals;
    }
    intervals.sort();

    let mut merged: Vec<TimeInterval> = Vec::with_capacity(intervals.len());
    for interval in intervals {
        if let Some(last) = merged.last_mut() {
            if let Some(union) = last.merge(&interval) {
                *last = union;
                continue;
            }
        }
        merged.push(interval);
    }
    merged
}
