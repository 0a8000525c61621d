//! Working-slot persistence boundary.
//!
//! The timeline talks to storage only through [`SlotStore`]. The trait is
//! synchronous; callers embedding a database put the transaction boundary
//! around the timeline operation, not inside these methods.
//! [`MemorySlotStore`] is the in-memory reference implementation used by the
//! CLI and the test suites.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

use chrono::NaiveDate;

use crate::error::Result;
use crate::types::WorkingSlot;

/// Opaque identifier for a persisted working slot.
pub type SlotId = u64;

/// Storage operations the slot timeline requires.
pub trait SlotStore {
    /// All slots for a provider-date, in no particular order.
    fn find_by_provider_and_date(
        &self,
        provider_id: &str,
        date: NaiveDate,
    ) -> Result<Vec<WorkingSlot>>;

    /// Persist one slot (insert or replace by id).
    fn save(&self, slot: WorkingSlot) -> Result<()>;

    /// Persist several slots (insert or replace by id).
    fn save_all(&self, slots: Vec<WorkingSlot>) -> Result<()>;

    /// Remove a slot by id. Removing an absent id is not an error.
    fn delete(&self, id: SlotId) -> Result<()>;

    /// Mint a fresh slot id (the database-sequence analogue).
    fn next_id(&self) -> SlotId;
}

/// In-memory slot store keyed by `(provider_id, date)`.
///
/// Cloning yields a handle to the same underlying map, so a test can keep a
/// handle for inspection while the timeline owns another.
#[derive(Debug, Clone, Default)]
pub struct MemorySlotStore {
    inner: Arc<MemoryInner>,
}

#[derive(Debug, Default)]
struct MemoryInner {
    slots: Mutex<HashMap<(String, NaiveDate), Vec<WorkingSlot>>>,
    next_id: AtomicU64,
}

impl MemorySlotStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SlotStore for MemorySlotStore {
    fn find_by_provider_and_date(
        &self,
        provider_id: &str,
        date: NaiveDate,
    ) -> Result<Vec<WorkingSlot>> {
        let slots = self
            .inner
            .slots
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        Ok(slots
            .get(&(provider_id.to_string(), date))
            .cloned()
            .unwrap_or_default())
    }

    fn save(&self, slot: WorkingSlot) -> Result<()> {
        self.save_all(vec![slot])
    }

    fn save_all(&self, new_slots: Vec<WorkingSlot>) -> Result<()> {
        let mut slots = self
            .inner
            .slots
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        for slot in new_slots {
            let key = (slot.provider_id.clone(), slot.date);
            let day = slots.entry(key).or_default();
            match day.iter_mut().find(|s| s.id == slot.id) {
                Some(existing) => *existing = slot,
                None => day.push(slot),
            }
        }
        Ok(())
    }

    fn delete(&self, id: SlotId) -> Result<()> {
        let mut slots = self
            .inner
            .slots
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        for day in slots.values_mut() {
            day.retain(|s| s.id != id);
        }
        Ok(())
    }

    fn next_id(&self) -> SlotId {
        self.inner.next_id.fetch_add(1, Ordering::Relaxed) + 1
    }
}
