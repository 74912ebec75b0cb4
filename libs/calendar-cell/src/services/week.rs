// libs/calendar-cell/src/services/week.rs
//
// Week grid builder: the seven days of the containing Sunday-start week and
// the fixed sequence of bookable slots within the work window. Pure functions,
// rebuilt on every reference-date change.

use chrono::{DateTime, Datelike, Duration, NaiveTime, TimeZone};

use crate::models::{CalendarConfig, TimeSlot, WeekDay};

const DAY_NAMES: [&str; 7] = ["Sun", "Mon", "Tue", "Wed", "Thu", "Fri", "Sat"];

/// The seven calendar days of the week containing `reference`, starting at
/// the Sunday on or before it. `today` may carry any time-of-day; the today
/// flag compares calendar dates only.
pub fn build_week<Tz: TimeZone>(reference: &DateTime<Tz>, today: &DateTime<Tz>) -> Vec<WeekDay> {
    let reference_date = reference.date_naive();
    let today_date = today.date_naive();

    let days_from_sunday = reference_date.weekday().num_days_from_sunday() as i64;
    let start_of_week = reference_date - Duration::days(days_from_sunday);

    (0..7)
        .map(|offset| {
            let date = start_of_week + Duration::days(offset);
            WeekDay {
                date,
                day_name: DAY_NAMES[date.weekday().num_days_from_sunday() as usize],
                date_label: date.format("%b %-d").to_string(),
                is_today: date == today_date,
            }
        })
        .collect()
}

/// All bookable slots of one day: every cadence step from the opening hour
/// through the closing hour, where only the on-the-hour slot exists at the
/// closing hour (nothing starts after the window closes).
pub fn build_slots(config: &CalendarConfig) -> Vec<TimeSlot> {
    let mut slots = Vec::new();

    for hour in config.work_start_hour()..=config.work_end_hour() {
        let mut minute = 0;
        while minute < 60 {
            if hour == config.work_end_hour() && minute > 0 {
                break;
            }
            slots.push(TimeSlot {
                hour,
                minute,
                label: format_slot_label(hour, minute),
            });
            minute += config.slot_minutes();
        }
    }

    slots
}

pub(crate) fn format_slot_label(hour: u32, minute: u32) -> String {
    NaiveTime::from_hms_opt(hour, minute, 0)
        .map(|time| time.format("%-I:%M %p").to_string())
        .unwrap_or_default()
}
