use chrono::{DateTime, Duration, TimeZone, Utc};

use doctor_cell::services::availability::free_slots;

fn at(hour: u32, min: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 3, 2, hour, min, 0).unwrap()
}

fn slot_len() -> Duration {
    Duration::minutes(30)
}

#[test]
fn test_empty_schedule_when_busy_covers_everything() {
    let slots = free_slots(at(9, 0), at(12, 0), &[(at(9, 0), at(12, 0))], slot_len());
    assert!(slots.is_empty());
}

#[test]
fn test_full_schedule_when_nothing_is_booked() {
    let slots = free_slots(at(9, 0), at(11, 0), &[], slot_len());
    assert_eq!(
        slots,
        vec![
            (at(9, 0), at(9, 30)),
            (at(9, 30), at(10, 0)),
            (at(10, 0), at(10, 30)),
            (at(10, 30), at(11, 0)),
        ]
    );
}

#[test]
fn test_free_slots_are_exact_complement_of_aligned_bookings() {
    let busy = vec![(at(9, 30), at(10, 0)), (at(10, 30), at(11, 30))];
    let slots = free_slots(at(9, 0), at(12, 0), &busy, slot_len());

    assert_eq!(
        slots,
        vec![
            (at(9, 0), at(9, 30)),
            (at(10, 0), at(10, 30)),
            (at(11, 30), at(12, 0)),
        ]
    );

    // Free and busy together tile the whole window
    let covered: i64 = slots
        .iter()
        .chain(busy.iter())
        .map(|(s, e)| (*e - *s).num_minutes())
        .sum();
    assert_eq!(covered, (at(12, 0) - at(9, 0)).num_minutes());
}

#[test]
fn test_booking_touching_slot_boundary_does_not_block_it() {
    // Busy ends exactly where the 9:30 slot starts and another begins
    // exactly where the 10:00 slot ends
    let busy = vec![(at(9, 0), at(9, 30)), (at(10, 30), at(11, 0))];
    let slots = free_slots(at(9, 30), at(10, 30), &busy, slot_len());

    assert_eq!(slots, vec![(at(9, 30), at(10, 0)), (at(10, 0), at(10, 30))]);
}

#[test]
fn test_partial_overlap_blocks_both_touched_slots() {
    // 9:45-10:15 straddles two slots; both are lost
    let busy = vec![(at(9, 45), at(10, 15))];
    let slots = free_slots(at(9, 30), at(11, 0), &busy, slot_len());

    assert_eq!(slots, vec![(at(10, 30), at(11, 0))]);
}

#[test]
fn test_trailing_remainder_shorter_than_slot_is_dropped() {
    // 9:00-10:20 holds two full slots and a 20 minute tail
    let slots = free_slots(at(9, 0), at(10, 20), &[], slot_len());
    assert_eq!(slots, vec![(at(9, 0), at(9, 30)), (at(9, 30), at(10, 0))]);
}

#[test]
fn test_window_shorter_than_slot_yields_nothing() {
    let slots = free_slots(at(9, 0), at(9, 20), &[], slot_len());
    assert!(slots.is_empty());
}

#[test]
fn test_busy_interval_outside_window_is_ignored() {
    let busy = vec![(at(7, 0), at(8, 0)), (at(13, 0), at(14, 0))];
    let slots = free_slots(at(9, 0), at(10, 0), &busy, slot_len());
    assert_eq!(slots, vec![(at(9, 0), at(9, 30)), (at(9, 30), at(10, 0))]);
}

#[test]
fn test_full_working_day_produces_fifteen_slots() {
    // 09:00-17:00 with a fixed lunch booking 12:00-12:30
    let busy = vec![(at(12, 0), at(12, 30))];
    let slots = free_slots(at(9, 0), at(17, 0), &busy, slot_len());

    assert_eq!(slots.len(), 15);
    assert_eq!(slots.first().unwrap().0, at(9, 0));
    assert_eq!(slots.last().unwrap().1, at(17, 0));
    assert!(slots.iter().all(|(s, e)| *e - *s == slot_len()));
    assert!(!slots.contains(&(at(12, 0), at(12, 30))));
}
