//! # slot-engine
//!
//! Availability resolution and bookable-slot timeline engine for service
//! providers.
//!
//! Derives, for any calendar date, a provider's open time windows from
//! layered schedule sources (weekly recurring rules, date-specific
//! exceptions, committed bookings) and maintains a consistent, gap-free
//! timeline of interval segments as bookings are placed and cancelled.
//! All time math uses half-open `[start, end)` intervals over a single day.
//!
//! ## Modules
//!
//! - [`interval`] — the half-open time interval primitive
//! - [`resolver`] — recurring rules + exceptions → daily open windows
//! - [`slots`] — free-slot computation with a minimum-duration filter
//! - [`status`] — AVAILABLE / BLOCKED / OUTSIDE_WORKING_HOURS classification
//! - [`timeline`] — stateful split/merge of persisted working slots
//! - [`store`] — the slot persistence boundary
//! - [`engine`] — the façade wiring lookups, resolution, and the timeline
//! - [`error`] — error types

pub mod engine;
pub mod error;
pub mod interval;
pub mod resolver;
pub mod slots;
pub mod status;
pub mod store;
pub mod timeline;
pub mod types;

pub use engine::{AvailabilityEngine, BookingLookup, ExceptionLookup, RuleLookup};
pub use error::{Result, SlotError};
pub use interval::{coalesce, TimeInterval};
pub use resolver::resolve_open_windows;
pub use slots::{
    compute_available_slots, find_first_available_slot, AvailableSlots, DEFAULT_MIN_SLOT_MINUTES,
};
pub use status::classify_status;
pub use store::{MemorySlotStore, SlotId, SlotStore};
pub use timeline::{EffectiveSlot, SlotTimeline};
pub use types::{
    AvailabilityStatus, BookedInterval, DateException, ExceptionKind, RecurringRule, SlotSource,
    SlotStatus, WorkingSlot,
};
