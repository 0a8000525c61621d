//! The stateful slot timeline.
//!
//! Maintains the persisted partition of a provider-date into ACTIVE/BOOKED
//! working slots: a booking splits the covering ACTIVE slot, a cancellation
//! merges the freed slot back with its contiguous ACTIVE neighbors. Every
//! mutation validates first and writes last, so a failed operation leaves no
//! partial state.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::{Result, SlotError};
use crate::interval::TimeInterval;
use crate::store::SlotStore;
use crate::types::{
    DateException, ExceptionKind, RecurringRule, SlotSource, SlotStatus, WorkingSlot,
};

/// A resolved timeline entry, independent of whether it is backed by a
/// persisted row or derived from rules on the fly.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EffectiveSlot {
    pub interval: TimeInterval,
    pub status: SlotStatus,
    pub source: SlotSource,
}

/// Split/merge operations over a [`SlotStore`].
///
/// Mutations are serialized per `(provider_id, date)`: two concurrent
/// bookings against the same key cannot both observe the same ACTIVE slot
/// and double-split it. No cross-key locking. Lock entries live only while
/// a mutation for their key is in flight; the last releaser prunes them.
pub struct SlotTimeline<S> {
    store: S,
    day_locks: Mutex<HashMap<(String, NaiveDate), Arc<Mutex<()>>>>,
}

impl<S: SlotStore> SlotTimeline<S> {
    pub fn new(store: S) -> Self {
        Self {
            store,
            day_locks: Mutex::new(HashMap::new()),
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    fn day_lock(&self, provider_id: &str, date: NaiveDate) -> Arc<Mutex<()>> {
        let mut locks = self
            .day_locks
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        locks
            .entry((provider_id.to_string(), date))
            .or_default()
            .clone()
    }

    fn release_day_lock(&self, provider_id: &str, date: NaiveDate, handle: Arc<Mutex<()>>) {
        let mut locks = self
            .day_locks
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        drop(handle);
        // Outstanding clones are only handed out under the map lock, so a
        // strong count of 1 means no other mutation holds or awaits this key.
        let key = (provider_id.to_string(), date);
        if locks.get(&key).is_some_and(|entry| Arc::strong_count(entry) == 1) {
            locks.remove(&key);
        }
    }

    /// Run `op` while holding this key's mutation lock.
    fn with_day_lock<T>(&self, provider_id: &str, date: NaiveDate, op: impl FnOnce() -> T) -> T {
        let lock = self.day_lock(provider_id, date);
        let result = {
            let _guard = lock.lock().unwrap_or_else(PoisonError::into_inner);
            op()
        };
        self.release_day_lock(provider_id, date, lock);
        result
    }

    /// Book `requested` out of the single ACTIVE slot that fully contains it.
    ///
    /// The covering slot is replaced by up to three slots preserving its
    /// `source`: a left ACTIVE remainder, the new BOOKED slot equal to
    /// `requested`, and a right ACTIVE remainder. The union of the results
    /// always equals the original slot's interval.
    ///
    /// # Errors
    /// [`SlotError::SlotAlreadyBooked`] when `requested` overlaps an existing
    /// BOOKED slot; [`SlotError::NoCoveringSlot`] when no single ACTIVE slot
    /// contains it. Neither writes anything.
    pub fn apply_booking(
        &self,
        provider_id: &str,
        date: NaiveDate,
        requested: TimeInterval,
    ) -> Result<Vec<WorkingSlot>> {
        self.with_day_lock(provider_id, date, || {
            self.apply_booking_locked(provider_id, date, requested)
        })
    }

    fn apply_booking_locked(
        &self,
        provider_id: &str,
        date: NaiveDate,
        requested: TimeInterval,
    ) -> Result<Vec<WorkingSlot>> {
        let slots = self.store.find_by_provider_and_date(provider_id, date)?;

        if slots
            .iter()
            .any(|s| s.status == SlotStatus::Booked && s.interval.overlaps(&requested))
        {
            return Err(SlotError::SlotAlreadyBooked(requested));
        }

        let covering = slots
            .iter()
            .find(|s| s.status == SlotStatus::Active && s.interval.contains(&requested))
            .ok_or(SlotError::NoCoveringSlot(requested))?;

        let mut replacements = Vec::with_capacity(3);
        if covering.interval.start() < requested.start() {
            replacements.push(WorkingSlot {
                id: self.store.next_id(),
                provider_id: provider_id.to_string(),
                date,
                interval: TimeInterval::new(covering.interval.start(), requested.start())?,
                status: SlotStatus::Active,
                source: covering.source,
            });
        }
        replacements.push(WorkingSlot {
            id: self.store.next_id(),
            provider_id: provider_id.to_string(),
            date,
            interval: requested,
            status: SlotStatus::Booked,
            source: covering.source,
        });
        if requested.end() < covering.interval.end() {
            replacements.push(WorkingSlot {
                id: self.store.next_id(),
                provider_id: provider_id.to_string(),
                date,
                interval: TimeInterval::new(requested.end(), covering.interval.end())?,
                status: SlotStatus::Active,
                source: covering.source,
            });
        }

        self.store.delete(covering.id)?;
        self.store.save_all(replacements.clone())?;
        Ok(replacements)
    }

    /// Free the BOOKED slot exactly matching `booked`, merging it with any
    /// immediately adjacent ACTIVE neighbors.
    ///
    /// Always yields exactly one ACTIVE slot spanning the union of the freed
    /// booking and whichever neighbors existed; with no neighbors the slot is
    /// simply restored to ACTIVE in place.
    ///
    /// # Errors
    /// [`SlotError::BookedSlotNotFound`] when no BOOKED slot matches exactly.
    pub fn cancel_booking(
        &self,
        provider_id: &str,
        date: NaiveDate,
        booked: TimeInterval,
    ) -> Result<WorkingSlot> {
        self.with_day_lock(provider_id, date, || {
            self.cancel_booking_locked(provider_id, date, booked)
        })
    }

    fn cancel_booking_locked(
        &self,
        provider_id: &str,
        date: NaiveDate,
        booked: TimeInterval,
    ) -> Result<WorkingSlot> {
        let slots = self.store.find_by_provider_and_date(provider_id, date)?;

        let freed = slots
            .iter()
            .find(|s| s.status == SlotStatus::Booked && s.interval == booked)
            .ok_or(SlotError::BookedSlotNotFound(booked))?;

        let left = slots
            .iter()
            .find(|s| s.status == SlotStatus::Active && s.interval.end() == booked.start());
        let right = slots
            .iter()
            .find(|s| s.status == SlotStatus::Active && s.interval.start() == booked.end());

        let start = left.map_or(booked.start(), |s| s.interval.start());
        let end = right.map_or(booked.end(), |s| s.interval.end());

        let restored = WorkingSlot {
            id: self.store.next_id(),
            provider_id: provider_id.to_string(),
            date,
            interval: TimeInterval::new(start, end)?,
            status: SlotStatus::Active,
            source: freed.source,
        };

        self.store.delete(freed.id)?;
        if let Some(neighbor) = left {
            self.store.delete(neighbor.id)?;
        }
        if let Some(neighbor) = right {
            self.store.delete(neighbor.id)?;
        }
        self.store.save(restored.clone())?;
        Ok(restored)
    }

    /// Materialize a new ACTIVE slot for a date.
    ///
    /// # Errors
    /// [`SlotError::OverlappingSlot`] when the interval overlaps any existing
    /// slot for that date. Touching an existing slot is permitted.
    pub fn create_working_slot(
        &self,
        provider_id: &str,
        date: NaiveDate,
        interval: TimeInterval,
    ) -> Result<WorkingSlot> {
        self.with_day_lock(provider_id, date, || {
            let slots = self.store.find_by_provider_and_date(provider_id, date)?;
            if slots.iter().any(|s| s.interval.overlaps(&interval)) {
                return Err(SlotError::OverlappingSlot(interval));
            }

            let slot = WorkingSlot {
                id: self.store.next_id(),
                provider_id: provider_id.to_string(),
                date,
                interval,
                status: SlotStatus::Active,
                source: SlotSource::Recurring,
            };
            self.store.save(slot.clone())?;
            Ok(slot)
        })
    }

    /// The effective timeline for a date, in priority order: a single
    /// OVERRIDE exception's interval → empty when a whole-day BLOCKED
    /// exception exists → the coalesced concrete working slots → the
    /// coalesced recurring-rule windows.
    pub fn effective_slots_for_date(
        &self,
        provider_id: &str,
        service_id: Option<&str>,
        date: NaiveDate,
        rules: &[RecurringRule],
        exceptions: &[DateException],
    ) -> Result<Vec<EffectiveSlot>> {
        let day_exceptions: Vec<&DateException> = exceptions
            .iter()
            .filter(|e| e.applies_on(date, service_id))
            .collect();

        if let Some(over) = day_exceptions
            .iter()
            .find(|e| e.kind == ExceptionKind::Override)
        {
            // An override with no time bound closes the day entirely.
            return Ok(over
                .interval
                .map(|interval| EffectiveSlot {
                    interval,
                    status: SlotStatus::Active,
                    source: SlotSource::Exception,
                })
                .into_iter()
                .collect());
        }

        if day_exceptions
            .iter()
            .any(|e| e.kind == ExceptionKind::Blocked && e.interval.is_none())
        {
            return Ok(Vec::new());
        }

        let concrete = self.store.find_by_provider_and_date(provider_id, date)?;
        if !concrete.is_empty() {
            return Ok(coalesce_slots(concrete));
        }

        let windows = crate::interval::coalesce(
            rules
                .iter()
                .filter(|r| r.applies_on(date, service_id))
                .map(|r| r.interval)
                .collect(),
        );
        Ok(windows
            .into_iter()
            .map(|interval| EffectiveSlot {
                interval,
                status: SlotStatus::Active,
                source: SlotSource::Recurring,
            })
            .collect())
    }
}

/// Coalesce persisted slots into effective entries, merging contiguous runs
/// of the same status. Gaps between distinct rule-derived windows survive.
fn coalesce_slots(mut slots: Vec<WorkingSlot>) -> Vec<EffectiveSlot> {
    slots.sort_by_key(|s| s.interval);

    let mut merged: Vec<EffectiveSlot> = Vec::with_capacity(slots.len());
    for slot in slots {
        if let Some(last) = merged.last_mut() {
            if last.status == slot.status {
                if let Some(union) = last.interval.merge(&slot.interval) {
                    last.interval = union;
                    continue;
                }
            }
        }
        merged.push(EffectiveSlot {
            interval: slot.interval,
            status: slot.status,
            source: slot.source,
        });
    }
    merged
}
