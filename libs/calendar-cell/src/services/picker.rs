// libs/calendar-cell/src/services/picker.rs
//
// Conflict-avoiding slot picker for bulk-generated bookings: samples weekday
// business-hour slots around "now" and retries until the slot key is unused.
// The conflict set is an explicit parameter so independent generation runs
// (and tests) cannot leak slots into each other.

use chrono::{DateTime, Datelike, Duration, Utc, Weekday};
use rand::Rng;
use std::collections::HashSet;
use tracing::warn;

use crate::models::{CalendarConfig, TimeSlot};
use crate::services::week::build_slots;

/// Sampling window around `now`, in days each direction.
const WINDOW_DAYS: i64 = 30;

/// Outer retry budget before uniqueness is abandoned for termination.
const MAX_SLOT_ATTEMPTS: u32 = 1000;

/// Inner retry budget for landing on a weekday.
const MAX_WEEKDAY_ATTEMPTS: u32 = 100;

/// Identity of a slot at minute granularity.
pub fn slot_key(at: &DateTime<Utc>) -> String {
    at.format("%Y-%m-%dT%H:%MZ").to_string()
}

/// Pick a start time within ±30 days of `now`, on a weekday, on one of the
/// work window's bookable slots, whose key is absent from `existing`. After
/// the retry budget runs out the last candidate is returned even if it
/// conflicts; termination wins over uniqueness at saturation. The chosen key
/// is added to `existing` either way.
pub fn pick_slot<R: Rng>(
    rng: &mut R,
    existing: &mut HashSet<String>,
    now: DateTime<Utc>,
    config: &CalendarConfig,
) -> DateTime<Utc> {
    // Sampling from the grid's own slot list keeps the picker and the grid in
    // agreement on what is bookable, including a window of a single hour.
    let slots = build_slots(config);
    let mut candidate = sample_candidate(rng, now, &slots);

    for _ in 0..MAX_SLOT_ATTEMPTS {
        let key = slot_key(&candidate);
        if !existing.contains(&key) {
            existing.insert(key);
            return candidate;
        }
        candidate = sample_candidate(rng, now, &slots);
    }

    warn!(
        "no free slot found after {} attempts, using a possibly conflicting time",
        MAX_SLOT_ATTEMPTS
    );
    existing.insert(slot_key(&candidate));
    candidate
}

fn sample_candidate<R: Rng>(rng: &mut R, now: DateTime<Utc>, slots: &[TimeSlot]) -> DateTime<Utc> {
    let window_minutes = WINDOW_DAYS * 24 * 60;

    // Resample until the date lands on a weekday; after the bounded retry the
    // last sample is kept regardless, to rule out an unbounded loop.
    let mut day = now;
    for _ in 0..MAX_WEEKDAY_ATTEMPTS {
        day = now + Duration::minutes(rng.gen_range(-window_minutes..=window_minutes));
        if !is_weekend(&day) {
            break;
        }
    }

    // A validated config always yields at least the closing-hour slot.
    let slot = &slots[rng.gen_range(0..slots.len())];

    day.date_naive()
        .and_hms_opt(slot.hour, slot.minute, 0)
        .unwrap()
        .and_utc()
}

fn is_weekend(at: &DateTime<Utc>) -> bool {
    matches!(at.weekday(), Weekday::Sat | Weekday::Sun)
}
