//! Error types for slot-engine operations.

use chrono::NaiveTime;
use thiserror::Error;

use crate::interval::TimeInterval;

#[derive(Error, Debug)]
pub enum SlotError {
    /// An interval whose start is not strictly before its end. Rejected at the
    /// boundary; never produced by the engine itself.
    #[error("Invalid interval: start {start} is not before end {end}")]
    InvalidInterval { start: NaiveTime, end: NaiveTime },

    /// No single ACTIVE slot fully contains the requested interval. Covers
    /// both "outside every slot" and "spans multiple slots".
    #[error("No active slot covers {0}")]
    NoCoveringSlot(TimeInterval),

    /// The requested interval overlaps an existing BOOKED slot.
    #[error("Slot already booked: {0} overlaps an existing booking")]
    SlotAlreadyBooked(TimeInterval),

    /// No BOOKED slot exactly matches the interval being cancelled.
    #[error("No booked slot matches {0}")]
    BookedSlotNotFound(TimeInterval),

    /// A new working slot would overlap an existing slot for the same date.
    #[error("Slot overlaps an existing slot for this date: {0}")]
    OverlappingSlot(TimeInterval),

    /// A lookup or persistence failure from an external collaborator,
    /// propagated as-is.
    #[error("Store error: {0}")]
    Store(String),
}

/// Convenience alias used throughout slot-engine.
pub type Result<T> = std::result::Result<T, SlotError>;
