//! Daily effective-window resolution.
//!
//! Turns a provider's recurring weekly rules plus that date's exceptions into
//! the day's open windows, before considering bookings. OVERRIDE exceptions
//! replace the rule-derived windows for the portion they cover; BLOCKED
//! intervals are recorded during the pass and subtracted last.

use chrono::NaiveDate;

use crate::interval::{coalesce, TimeInterval};
use crate::types::{DateException, ExceptionKind, RecurringRule};

/// Resolve the ordered, non-overlapping open windows for a date.
///
/// Rules that do not match the date's weekday or the requested service are
/// ignored, as are exceptions for other dates. An empty rule set with no
/// override yields an empty result (day unavailable); a BLOCKED exception
/// with no matching open window is a no-op.
pub fn resolve_open_windows(
    date: NaiveDate,
    service_id: Option<&str>,
    rules: &[RecurringRule],
    exceptions: &[DateException],
) -> Vec<TimeInterval> {
    let mut day_exceptions: Vec<&DateException> = exceptions
        .iter()
        .filter(|e| e.applies_on(date, service_id))
        .collect();
    day_exceptions.sort_by_key(|e| e.interval.map(|i| i.start()));

    let blockers: Vec<Option<TimeInterval>> = day_exceptions
        .iter()
        .filter(|e| e.kind == ExceptionKind::Blocked)
        .map(|e| e.interval)
        .collect();

    let overrides: Vec<Option<TimeInterval>> = day_exceptions
        .iter()
        .filter(|e| e.kind == ExceptionKind::Override)
        .map(|e| e.interval)
        .collect();

    let rule_windows: Vec<TimeInterval> = rules
        .iter()
        .filter(|r| r.applies_on(date, service_id))
        .map(|r| r.interval)
        .collect();

    // Overrides replace the rule-derived windows for the portion they cover:
    // carve each override's range out of the rule windows, then add the
    // override intervals themselves. An override with no time bound replaces
    // the whole day with nothing.
    let mut base = rule_windows;
    for over in &overrides {
        match over {
            None => base.clear(),
            Some(replaced) => {
                base = base.into_iter().flat_map(|w| w.subtract(replaced)).collect();
            }
        }
    }
    base.extend(overrides.iter().flatten());

    let mut windows = coalesce(base);

    for blocker in blockers {
        match blocker {
            // A whole-day closure removes everything.
            None => return Vec::new(),
            Some(blocked) => {
                windows = windows
                    .into_iter()
                    .flat_map(|w| w.subtract(&blocked))
                    .collect();
            }
        }
    }

    windows
}
