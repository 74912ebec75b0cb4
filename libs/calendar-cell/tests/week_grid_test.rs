use assert_matches::assert_matches;
use chrono::{Datelike, NaiveDate, TimeZone, Utc, Weekday};

use calendar_cell::models::{CalendarConfig, CalendarError};
use calendar_cell::services::week::{build_slots, build_week};

fn at(date: NaiveDate, hour: u32, minute: u32) -> chrono::DateTime<Utc> {
    Utc.from_utc_datetime(&date.and_hms_opt(hour, minute, 0).unwrap())
}

#[test]
fn week_starts_on_sunday_and_has_seven_days() {
    // 2025-06-18 is a Wednesday.
    let reference = at(NaiveDate::from_ymd_opt(2025, 6, 18).unwrap(), 10, 0);
    let days = build_week(&reference, &reference);

    assert_eq!(days.len(), 7);
    assert_eq!(days[0].date, NaiveDate::from_ymd_opt(2025, 6, 15).unwrap());
    assert_eq!(days[0].day_name, "Sun");
    assert_eq!(days[6].date, NaiveDate::from_ymd_opt(2025, 6, 21).unwrap());
    assert_eq!(days[6].day_name, "Sat");

    for (offset, day) in days.iter().enumerate() {
        assert_eq!(day.date, days[0].date + chrono::Duration::days(offset as i64));
    }
}

#[test]
fn sunday_reference_is_its_own_week_start() {
    let sunday = NaiveDate::from_ymd_opt(2025, 6, 15).unwrap();
    assert_eq!(sunday.weekday(), Weekday::Sun);

    let days = build_week(&at(sunday, 0, 0), &at(sunday, 0, 0));
    assert_eq!(days[0].date, sunday);
}

#[test]
fn week_crosses_month_and_year_boundaries() {
    // 2025-12-31 is a Wednesday; its week runs Dec 28 through Jan 3.
    let reference = at(NaiveDate::from_ymd_opt(2025, 12, 31).unwrap(), 12, 0);
    let days = build_week(&reference, &reference);

    assert_eq!(days[0].date, NaiveDate::from_ymd_opt(2025, 12, 28).unwrap());
    assert_eq!(days[6].date, NaiveDate::from_ymd_opt(2026, 1, 3).unwrap());
    assert_eq!(days[0].date_label, "Dec 28");
    assert_eq!(days[6].date_label, "Jan 3");
}

#[test]
fn today_flag_ignores_time_of_day() {
    let date = NaiveDate::from_ymd_opt(2025, 6, 18).unwrap();
    let reference = at(date, 0, 0);
    let late_today = at(date, 23, 59);

    let days = build_week(&reference, &late_today);
    let flagged: Vec<_> = days.iter().filter(|d| d.is_today).collect();

    assert_eq!(flagged.len(), 1);
    assert_eq!(flagged[0].date, date);
}

#[test]
fn no_today_flag_outside_displayed_week() {
    let reference = at(NaiveDate::from_ymd_opt(2025, 6, 18).unwrap(), 9, 0);
    let next_month = at(NaiveDate::from_ymd_opt(2025, 7, 18).unwrap(), 9, 0);

    let days = build_week(&reference, &next_month);
    assert!(days.iter().all(|d| !d.is_today));
}

#[test]
fn default_window_yields_twenty_one_slots() {
    let slots = build_slots(&CalendarConfig::default());

    // 8:00 through 18:00 at 30 minutes: two per hour plus the closing slot.
    assert_eq!(slots.len(), 21);
    assert_eq!((slots[0].hour, slots[0].minute), (8, 0));
    assert_eq!(slots[0].label, "8:00 AM");
    assert_eq!((slots[1].hour, slots[1].minute), (8, 30));
    assert_eq!(slots[1].label, "8:30 AM");
    assert_eq!((slots[20].hour, slots[20].minute), (18, 0));
    assert_eq!(slots[20].label, "6:00 PM");
}

#[test]
fn closing_hour_gets_only_the_on_the_hour_slot() {
    let slots = build_slots(&CalendarConfig::default());
    let closing: Vec<_> = slots.iter().filter(|s| s.hour == 18).collect();

    assert_eq!(closing.len(), 1);
    assert_eq!(closing[0].minute, 0);
}

#[test]
fn slots_follow_a_custom_cadence() {
    let config = CalendarConfig::new(9, 12, 15).unwrap();
    let slots = build_slots(&config);

    // 9:00 through 12:00 at 15 minutes: 3 * 4 + 1.
    assert_eq!(slots.len(), 13);
    assert_eq!((slots[3].hour, slots[3].minute), (9, 45));
    assert_eq!(slots[12].label, "12:00 PM");
}

#[test]
fn labels_use_twelve_hour_clock() {
    let slots = build_slots(&CalendarConfig::default());

    let noon = slots.iter().find(|s| s.hour == 12 && s.minute == 0).unwrap();
    assert_eq!(noon.label, "12:00 PM");
    let afternoon = slots.iter().find(|s| s.hour == 13 && s.minute == 30).unwrap();
    assert_eq!(afternoon.label, "1:30 PM");
}

#[test]
fn config_rejects_bad_windows() {
    assert_matches!(
        CalendarConfig::new(18, 8, 30),
        Err(CalendarError::WindowInverted { start: 18, end: 8 })
    );
    assert_matches!(
        CalendarConfig::new(8, 24, 30),
        Err(CalendarError::HourOutOfRange(24))
    );
    assert_matches!(
        CalendarConfig::new(8, 18, 0),
        Err(CalendarError::InvalidCadence(0))
    );
    assert_matches!(
        CalendarConfig::new(8, 18, 60),
        Err(CalendarError::InvalidCadence(60))
    );
}
