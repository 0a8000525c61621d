//! Domain value types shared across the engine.
//!
//! `RecurringRule`, `DateException`, and `BookedInterval` are externally
//! managed inputs; `WorkingSlot` is the only core-owned mutable state (see
//! [`crate::timeline`]).

use chrono::{Datelike, NaiveDate, Weekday};
use serde::{Deserialize, Serialize};

use crate::interval::TimeInterval;
use crate::store::SlotId;

/// A standing weekly availability window for a provider.
///
/// Multiple rules may apply to the same day; they are independent and may be
/// non-contiguous.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecurringRule {
    pub provider_id: String,
    /// `None` means the rule applies to every service the provider offers.
    #[serde(default)]
    pub service_id: Option<String>,
    pub days_of_week: Vec<Weekday>,
    pub interval: TimeInterval,
}

impl RecurringRule {
    /// Whether this rule contributes windows on the given date for the given
    /// service.
    pub fn applies_on(&self, date: NaiveDate, service_id: Option<&str>) -> bool {
        self.days_of_week.contains(&date.weekday()) && matches_service(&self.service_id, service_id)
    }
}

/// How a date-specific exception modifies the day's availability.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ExceptionKind {
    /// Removes availability for the exception interval on the date.
    Blocked,
    /// Replaces the day's rule-derived windows with the exception interval.
    Override,
}

/// A date-specific override or removal of availability.
///
/// `interval: None` means the exception covers the whole day (used by
/// full-day closures). Multiple exceptions per date are allowed and are
/// applied in start-time order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateException {
    pub provider_id: String,
    #[serde(default)]
    pub service_id: Option<String>,
    pub date: NaiveDate,
    #[serde(default)]
    pub interval: Option<TimeInterval>,
    pub kind: ExceptionKind,
    #[serde(default)]
    pub reason: Option<String>,
}

impl DateException {
    /// Whether this exception applies on the given date for the given service.
    pub fn applies_on(&self, date: NaiveDate, service_id: Option<&str>) -> bool {
        self.date == date && matches_service(&self.service_id, service_id)
    }
}

/// A committed booking, sourced from the booking subsystem.
///
/// Read-only input to slot computation; not owned by this engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookedInterval {
    pub provider_id: String,
    #[serde(default)]
    pub service_id: Option<String>,
    pub interval: TimeInterval,
}

/// Status of a persisted working slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum SlotStatus {
    Active,
    Booked,
}

/// Where a working slot's interval originally came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum SlotSource {
    Recurring,
    Exception,
}

/// A persisted, status-tagged segment of a provider's day timeline.
///
/// For a given `(provider_id, date)` the set of slot intervals is pairwise
/// non-overlapping; splits and merges never introduce or lose time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkingSlot {
    pub id: SlotId,
    pub provider_id: String,
    pub date: NaiveDate,
    pub interval: TimeInterval,
    pub status: SlotStatus,
    pub source: SlotSource,
}

/// Classification of a single requested interval against a provider's day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AvailabilityStatus {
    Available,
    Blocked,
    OutsideWorkingHours,
}

/// A provider-wide rule (`None`) matches any requested service; a
/// service-specific rule matches only its own service.
fn matches_service(owner: &Option<String>, requested: Option<&str>) -> bool {
    match (owner.as_deref(), requested) {
        (None, _) => true,
        (Some(s), Some(r)) => s == r,
        (Some(_), None) => false,
    }
}
