//! Tests for availability-status classification and its precedence rules.

use chrono::{NaiveDate, NaiveTime, Weekday};
use slot_engine::{
    classify_status, AvailabilityStatus, DateException, ExceptionKind, RecurringRule, TimeInterval,
};

// ── Helpers ─────────────────────────────────────────────────────────────────

// 2026-03-16 is a Monday.
fn monday() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 3, 16).unwrap()
}

fn iv(sh: u32, sm: u32, eh: u32, em: u32) -> TimeInterval {
    TimeInterval::new(
        NaiveTime::from_hms_opt(sh, sm, 0).unwrap(),
        NaiveTime::from_hms_opt(eh, em, 0).unwrap(),
    )
    .unwrap()
}

fn rule(interval: TimeInterval) -> RecurringRule {
    RecurringRule {
        provider_id: "p1".to_string(),
        service_id: None,
        days_of_week: vec![Weekday::Mon],
        interval,
    }
}

fn blocked(interval: Option<TimeInterval>) -> DateException {
    DateException {
        provider_id: "p1".to_string(),
        service_id: None,
        date: monday(),
        interval,
        kind: ExceptionKind::Blocked,
        reason: None,
    }
}

// ── Classification ──────────────────────────────────────────────────────────

#[test]
fn request_inside_a_window_is_available() {
    let rules = vec![rule(iv(9, 0, 17, 0))];

    let status = classify_status(monday(), None, &rules, &[], iv(14, 0, 15, 0));

    assert_eq!(status, AvailabilityStatus::Available);
}

#[test]
fn request_filling_a_window_exactly_is_available() {
    let rules = vec![rule(iv(9, 0, 17, 0))];

    let status = classify_status(monday(), None, &rules, &[], iv(9, 0, 17, 0));

    assert_eq!(status, AvailabilityStatus::Available);
}

#[test]
fn request_outside_every_window_is_outside_working_hours() {
    let rules = vec![rule(iv(9, 0, 12, 0))];

    let status = classify_status(monday(), None, &rules, &[], iv(14, 0, 15, 0));

    assert_eq!(status, AvailabilityStatus::OutsideWorkingHours);
}

#[test]
fn request_straddling_a_window_edge_is_outside_working_hours() {
    let rules = vec![rule(iv(9, 0, 12, 0))];

    let status = classify_status(monday(), None, &rules, &[], iv(11, 0, 13, 0));

    assert_eq!(status, AvailabilityStatus::OutsideWorkingHours);
}

#[test]
fn day_without_rules_is_outside_working_hours() {
    let status = classify_status(monday(), None, &[], &[], iv(10, 0, 11, 0));

    assert_eq!(status, AvailabilityStatus::OutsideWorkingHours);
}

// ── Precedence ──────────────────────────────────────────────────────────────

#[test]
fn blocked_wins_over_containment() {
    // Nominally inside working hours, but inside a blocked sub-range.
    let rules = vec![rule(iv(9, 0, 17, 0))];
    let exceptions = vec![blocked(Some(iv(12, 0, 13, 0)))];

    let status = classify_status(monday(), None, &rules, &exceptions, iv(12, 15, 12, 45));

    assert_eq!(status, AvailabilityStatus::Blocked);
}

#[test]
fn partial_overlap_with_a_block_is_blocked() {
    let rules = vec![rule(iv(9, 0, 17, 0))];
    let exceptions = vec![blocked(Some(iv(12, 0, 13, 0)))];

    let status = classify_status(monday(), None, &rules, &exceptions, iv(11, 0, 12, 30));

    assert_eq!(status, AvailabilityStatus::Blocked);
}

#[test]
fn request_abutting_a_block_is_available() {
    // Closed-open semantics: ending exactly where the block starts is fine.
    let rules = vec![rule(iv(9, 0, 17, 0))];
    let exceptions = vec![blocked(Some(iv(12, 0, 13, 0)))];

    let status = classify_status(monday(), None, &rules, &exceptions, iv(11, 0, 12, 0));

    assert_eq!(status, AvailabilityStatus::Available);
}

#[test]
fn whole_day_block_blocks_every_request() {
    let rules = vec![rule(iv(9, 0, 17, 0))];
    let exceptions = vec![blocked(None)];

    let status = classify_status(monday(), None, &rules, &exceptions, iv(10, 0, 11, 0));

    assert_eq!(status, AvailabilityStatus::Blocked);
}

#[test]
fn block_outside_working_hours_still_wins() {
    // BLOCKED is evaluated before containment, so a request overlapping a
    // block that sits outside every window reports Blocked, not
    // OutsideWorkingHours.
    let rules = vec![rule(iv(9, 0, 12, 0))];
    let exceptions = vec![blocked(Some(iv(14, 0, 15, 0)))];

    let status = classify_status(monday(), None, &rules, &exceptions, iv(14, 0, 14, 30));

    assert_eq!(status, AvailabilityStatus::Blocked);
}

#[test]
fn override_defines_the_windows_seen_by_classification() {
    let rules = vec![rule(iv(9, 0, 12, 0))];
    let exceptions = vec![DateException {
        provider_id: "p1".to_string(),
        service_id: None,
        date: monday(),
        interval: Some(iv(14, 0, 18, 0)),
        kind: ExceptionKind::Override,
        reason: None,
    }];

    let status = classify_status(monday(), None, &rules, &exceptions, iv(15, 0, 16, 0));

    assert_eq!(status, AvailabilityStatus::Available);
}
