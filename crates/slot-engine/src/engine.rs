//! The engine façade: the call contracts exposed to a host service.
//!
//! Wires the pure resolution functions and the slot timeline over three
//! read-only lookup traits and a [`SlotStore`]. The host's transport layer
//! deserializes requests into domain values before calling in; nothing here
//! knows about JSON or HTTP.

use chrono::{Datelike, Duration, NaiveDate, Weekday};

use crate::error::Result;
use crate::interval::TimeInterval;
use crate::resolver::resolve_open_windows;
use crate::slots::{compute_available_slots, AvailableSlots, DEFAULT_MIN_SLOT_MINUTES};
use crate::status::classify_status;
use crate::store::SlotStore;
use crate::timeline::{EffectiveSlot, SlotTimeline};
use crate::types::{
    AvailabilityStatus, BookedInterval, DateException, RecurringRule, WorkingSlot,
};

/// Recurring-rule lookup keyed by provider, service, and weekday.
pub trait RuleLookup {
    fn rules_for(
        &self,
        provider_id: &str,
        service_id: Option<&str>,
        weekday: Weekday,
    ) -> Result<Vec<RecurringRule>>;
}

/// Date-exception lookup keyed by provider, service, and date.
pub trait ExceptionLookup {
    fn exceptions_for(
        &self,
        provider_id: &str,
        service_id: Option<&str>,
        date: NaiveDate,
    ) -> Result<Vec<DateException>>;
}

/// Committed-booking lookup, served by the booking subsystem.
pub trait BookingLookup {
    fn booked_for(
        &self,
        provider_id: &str,
        service_id: Option<&str>,
        date: NaiveDate,
    ) -> Result<Vec<BookedInterval>>;
}

/// The availability engine for one deployment's schedule sources.
pub struct AvailabilityEngine<R, E, B, S> {
    rules: R,
    exceptions: E,
    bookings: B,
    timeline: SlotTimeline<S>,
}

impl<R, E, B, S> AvailabilityEngine<R, E, B, S>
where
    R: RuleLookup,
    E: ExceptionLookup,
    B: BookingLookup,
    S: SlotStore,
{
    pub fn new(rules: R, exceptions: E, bookings: B, store: S) -> Self {
        Self {
            rules,
            exceptions,
            bookings,
            timeline: SlotTimeline::new(store),
        }
    }

    /// Direct access to the underlying timeline.
    pub fn timeline(&self) -> &SlotTimeline<S> {
        &self.timeline
    }

    /// The day's open windows: recurring rules plus date exceptions, before
    /// considering bookings.
    pub fn resolve_open_windows(
        &self,
        provider_id: &str,
        service_id: Option<&str>,
        date: NaiveDate,
    ) -> Result<Vec<TimeInterval>> {
        let rules = self.rules.rules_for(provider_id, service_id, date.weekday())?;
        let exceptions = self.exceptions.exceptions_for(provider_id, service_id, date)?;
        Ok(resolve_open_windows(date, service_id, &rules, &exceptions))
    }

    /// Bookable slots for the date after subtracting committed bookings.
    ///
    /// `min_duration` defaults to [`DEFAULT_MIN_SLOT_MINUTES`] when `None`.
    pub fn compute_available_slots(
        &self,
        provider_id: &str,
        service_id: Option<&str>,
        date: NaiveDate,
        min_duration: Option<Duration>,
    ) -> Result<AvailableSlots> {
        let windows = self.resolve_open_windows(provider_id, service_id, date)?;
        let booked = self.bookings.booked_for(provider_id, service_id, date)?;
        let min = min_duration.unwrap_or_else(|| Duration::minutes(DEFAULT_MIN_SLOT_MINUTES));
        Ok(compute_available_slots(&windows, &booked, min))
    }

    /// Classify a single requested interval against the provider's day.
    pub fn classify_status(
        &self,
        provider_id: &str,
        service_id: Option<&str>,
        requested: TimeInterval,
        date: NaiveDate,
    ) -> Result<AvailabilityStatus> {
        let rules = self.rules.rules_for(provider_id, service_id, date.weekday())?;
        let exceptions = self.exceptions.exceptions_for(provider_id, service_id, date)?;
        Ok(classify_status(
            date,
            service_id,
            &rules,
            &exceptions,
            requested,
        ))
    }

    /// Book an interval out of the provider's timeline for the date.
    pub fn apply_booking(
        &self,
        provider_id: &str,
        date: NaiveDate,
        interval: TimeInterval,
    ) -> Result<Vec<WorkingSlot>> {
        self.timeline.apply_booking(provider_id, date, interval)
    }

    /// Cancel a previously booked interval, merging freed time back.
    pub fn cancel_booking(
        &self,
        provider_id: &str,
        date: NaiveDate,
        interval: TimeInterval,
    ) -> Result<WorkingSlot> {
        self.timeline.cancel_booking(provider_id, date, interval)
    }

    /// The effective timeline entries for a date (override exception, then
    /// concrete slots, then recurring fallback).
    pub fn effective_slots_for_date(
        &self,
        provider_id: &str,
        service_id: Option<&str>,
        date: NaiveDate,
    ) -> Result<Vec<EffectiveSlot>> {
        let rules = self.rules.rules_for(provider_id, service_id, date.weekday())?;
        let exceptions = self.exceptions.exceptions_for(provider_id, service_id, date)?;
        self.timeline
            .effective_slots_for_date(provider_id, service_id, date, &rules, &exceptions)
    }
}

// Plain vectors serve as lookups for in-memory hosts and tests; a real
// deployment implements the traits over its own storage or RPC clients.

impl RuleLookup for Vec<RecurringRule> {
    fn rules_for(
        &self,
        provider_id: &str,
        service_id: Option<&str>,
        weekday: Weekday,
    ) -> Result<Vec<RecurringRule>> {
        Ok(self
            .iter()
            .filter(|r| {
                r.provider_id == provider_id
                    && r.days_of_week.contains(&weekday)
                    && service_matches(r.service_id.as_deref(), service_id)
            })
            .cloned()
            .collect())
    }
}

impl ExceptionLookup for Vec<DateException> {
    fn exceptions_for(
        &self,
        provider_id: &str,
        service_id: Option<&str>,
        date: NaiveDate,
    ) -> Result<Vec<DateException>> {
        Ok(self
            .iter()
            .filter(|e| {
                e.provider_id == provider_id
                    && e.date == date
                    && service_matches(e.service_id.as_deref(), service_id)
            })
            .cloned()
            .collect())
    }
}

impl BookingLookup for Vec<BookedInterval> {
    fn booked_for(
        &self,
        provider_id: &str,
        service_id: Option<&str>,
        _date: NaiveDate,
    ) -> Result<Vec<BookedInterval>> {
        Ok(self
            .iter()
            .filter(|b| {
                b.provider_id == provider_id && service_matches(b.service_id.as_deref(), service_id)
            })
            .cloned()
            .collect())
    }
}

fn service_matches(owner: Option<&str>, requested: Option<&str>) -> bool {
    match (owner, requested) {
        (None, _) => true,
        (Some(s), Some(r)) => s == r,
        (Some(_), None) => false,
    }
}
