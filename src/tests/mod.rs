//! # Test Suite for the WH1080 Logger Binary
//!
//! End-to-end decode scenarios against a scripted in-memory transport,
//! plus scheduling helpers. Module-level unit tests live next to the code
//! they cover in the library.


use crate::next_aligned_tick;
use chrono::{Local, TimeZone, Timelike};

#[test]
fn tick_lands_on_the_next_whole_minute() {
    let now = Local.with_ymd_and_hms(2024, 6, 16, 8, 30, 42).unwrap();
    let tick = next_aligned_tick(now, 1);
    assert_eq!(tick, Local.with_ymd_and_hms(2024, 6, 16, 8, 31, 0).unwrap());
    assert_eq!(tick.second(), 0);
}

#[test]
fn tick_respects_the_configured_period() {
    let now = Local.with_ymd_and_hms(2024, 6, 16, 8, 30, 42).unwrap();
    let tick = next_aligned_tick(now, 5);
    assert_eq!(tick, Local.with_ymd_and_hms(2024, 6, 16, 8, 35, 0).unwrap());
}

#[test]
fn tick_is_strictly_in_the_future_from_a_round_minute() {
    let now = Local.with_ymd_and_hms(2024, 6, 16, 8, 30, 0).unwrap();
    let tick = next_aligned_tick(now, 1);
    assert!(tick > now);
    assert_eq!(tick, Local.with_ymd_and_hms(2024, 6, 16, 8, 31, 0).unwrap());
}

#[test]
fn zero_period_is_clamped_to_one_minute() {
    let now = Local.with_ymd_and_hms(2024, 6, 16, 8, 30, 42).unwrap();
    let tick = next_aligned_tick(now, 0);
    assert_eq!(tick, Local.with_ymd_and_hms(2024, 6, 16, 8, 31, 0).unwrap());
}
