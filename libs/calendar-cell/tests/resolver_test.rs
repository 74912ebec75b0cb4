use chrono::{DateTime, FixedOffset, NaiveDate, TimeZone, Utc};

use calendar_cell::models::{CalendarConfig, Color, EncounterBadge};
use calendar_cell::services::resolver::{
    appointment_status_color, appointment_type_color, encounter_badge, resolve,
};
use calendar_cell::services::week::{build_slots, build_week};
use shared_models::fhir::{
    Appointment, AppointmentStatus, CodeableConcept, Coding, Encounter, EncounterStatus,
    Participant, Reference, V2_0276_SYSTEM,
};

fn week_inputs() -> (Vec<calendar_cell::models::WeekDay>, Vec<calendar_cell::models::TimeSlot>) {
    // Week of Sun 2025-06-15 .. Sat 2025-06-21.
    let reference = Utc
        .from_utc_datetime(
            &NaiveDate::from_ymd_opt(2025, 6, 18)
                .unwrap()
                .and_hms_opt(9, 0, 0)
                .unwrap(),
        );
    (
        build_week(&reference, &reference),
        build_slots(&CalendarConfig::default()),
    )
}

fn appointment(id: &str, start: Option<DateTime<Utc>>) -> Appointment {
    Appointment {
        resource_type: "Appointment".to_string(),
        id: Some(id.to_string()),
        status: AppointmentStatus::Booked,
        appointment_type: None,
        description: None,
        start,
        end: start.map(|s| s + chrono::Duration::minutes(30)),
        minutes_duration: Some(30),
        participant: vec![Participant {
            actor: Some(Reference {
                reference: Some("Patient/pat-1".to_string()),
                display: Some("Ada Lovelace".to_string()),
            }),
            status: Some("accepted".to_string()),
        }],
    }
}

fn typed(mut apt: Appointment, code: Option<&str>, display: Option<&str>) -> Appointment {
    apt.appointment_type = Some(CodeableConcept {
        coding: vec![Coding {
            system: Some(V2_0276_SYSTEM.to_string()),
            code: code.map(str::to_string),
            display: display.map(str::to_string),
        }],
        text: display.map(str::to_string),
    });
    apt
}

fn encounter(id: &str, appointment_id: &str, status: EncounterStatus) -> Encounter {
    Encounter {
        resource_type: "Encounter".to_string(),
        id: Some(id.to_string()),
        status,
        class: None,
        subject: None,
        appointment: vec![Reference {
            reference: Some(format!("Appointment/{}", appointment_id)),
            display: None,
        }],
        period: None,
    }
}

fn utc_at(y: i32, m: u32, d: u32, hour: u32, minute: u32) -> DateTime<Utc> {
    Utc.from_utc_datetime(
        &NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(hour, minute, 0)
            .unwrap(),
    )
}

#[test]
fn appointment_lands_in_its_day_and_slot() {
    let (days, slots) = week_inputs();
    // Wednesday 10:30.
    let apt = appointment("apt-1", Some(utc_at(2025, 6, 18, 10, 30)));

    let grid = resolve(&days, &slots, &[apt], &[], &Utc);

    assert_eq!(grid.occupied_count(), 1);
    let cell = grid.cell(3, 5).expect("Wednesday 10:30 should be occupied");
    assert_eq!(cell.appointment.id.as_deref(), Some("apt-1"));
    assert_eq!(cell.patient_name, "Ada Lovelace");
    assert!(!grid.is_free(3, 5));
    assert!(grid.is_free(3, 6));
}

#[test]
fn appointments_off_the_grid_are_dropped() {
    let (days, slots) = week_inputs();
    let off_cadence = appointment("apt-1", Some(utc_at(2025, 6, 18, 10, 15)));
    let before_hours = appointment("apt-2", Some(utc_at(2025, 6, 18, 7, 30)));
    let other_week = appointment("apt-3", Some(utc_at(2025, 7, 18, 10, 30)));
    let no_start = appointment("apt-4", None);

    let grid = resolve(
        &days,
        &slots,
        &[off_cadence, before_hours, other_week, no_start],
        &[],
        &Utc,
    );

    assert_eq!(grid.occupied_count(), 0);
}

#[test]
fn contested_cell_keeps_the_first_appointment() {
    let (days, slots) = week_inputs();
    let first = appointment("apt-1", Some(utc_at(2025, 6, 18, 10, 30)));
    let second = appointment("apt-2", Some(utc_at(2025, 6, 18, 10, 30)));

    let grid = resolve(&days, &slots, &[first, second], &[], &Utc);

    assert_eq!(grid.occupied_count(), 1);
    assert_eq!(
        grid.cell(3, 5).unwrap().appointment.id.as_deref(),
        Some("apt-1")
    );
}

#[test]
fn placement_follows_the_viewer_timezone() {
    let (days, slots) = week_inputs();
    // 14:30 UTC is 10:30 at UTC-4.
    let apt = appointment("apt-1", Some(utc_at(2025, 6, 18, 14, 30)));
    let eastern = FixedOffset::west_opt(4 * 3600).unwrap();

    let grid = resolve(&days, &slots, &[apt], &[], &eastern);

    assert!(grid.cell(3, 5).is_some());
    assert!(grid.cell(3, 13).is_none());
}

#[test]
fn midnight_utc_can_shift_a_day_west() {
    let (days, slots) = week_inputs();
    // Thursday 00:30 UTC is Wednesday 19:30 at UTC-5: outside the work window.
    let apt = appointment("apt-1", Some(utc_at(2025, 6, 19, 0, 30)));
    let central = FixedOffset::west_opt(5 * 3600).unwrap();

    let grid = resolve(&days, &slots, &[apt], &[], &central);
    assert_eq!(grid.occupied_count(), 0);

    // At UTC-5, Thursday 13:30 UTC is Thursday 8:30 local.
    let apt = appointment("apt-2", Some(utc_at(2025, 6, 19, 13, 30)));
    let grid = resolve(&days, &slots, &[apt], &[], &central);
    assert!(grid.cell(4, 1).is_some());
}

#[test]
fn type_code_outranks_display_text() {
    let apt = typed(
        appointment("apt-1", None),
        Some("EMERGENCY"),
        Some("a routine check-up, such as an annual physical"),
    );
    assert_eq!(appointment_type_color(&apt), Color::Red);
}

#[test]
fn type_colors_cover_the_v2_0276_table() {
    let cases = [
        ("ROUTINE", Color::Blue),
        ("CHECKUP", Color::Blue),
        ("FOLLOWUP", Color::Green),
        ("WALKIN", Color::Yellow),
        ("EMERGENCY", Color::Red),
    ];
    for (code, expected) in cases {
        let apt = typed(appointment("apt-1", None), Some(code), None);
        assert_eq!(appointment_type_color(&apt), expected, "code {}", code);
    }

    // Codes are matched case-insensitively.
    let apt = typed(appointment("apt-1", None), Some("followup"), None);
    assert_eq!(appointment_type_color(&apt), Color::Green);
}

#[test]
fn display_text_is_the_fallback_classifier() {
    let cases = [
        ("Consultation", Color::Purple),
        ("Surgery", Color::Orange),
        ("Therapy", Color::Teal),
        ("A previously unscheduled walk-in visit", Color::Yellow),
        ("something nobody coded for", Color::Gray),
    ];
    for (display, expected) in cases {
        let apt = typed(appointment("apt-1", None), None, Some(display));
        assert_eq!(appointment_type_color(&apt), expected, "display {}", display);
    }

    let untyped = appointment("apt-1", None);
    assert_eq!(appointment_type_color(&untyped), Color::Gray);
}

#[test]
fn status_colors_are_total() {
    let cases = [
        (AppointmentStatus::Proposed, Color::Gray),
        (AppointmentStatus::Pending, Color::Yellow),
        (AppointmentStatus::Booked, Color::Blue),
        (AppointmentStatus::Arrived, Color::Green),
        (AppointmentStatus::Fulfilled, Color::Purple),
        (AppointmentStatus::Cancelled, Color::Red),
        (AppointmentStatus::Noshow, Color::Orange),
        (
            AppointmentStatus::Other("entered-in-error".to_string()),
            Color::Gray,
        ),
    ];
    for (status, expected) in cases {
        let mut apt = appointment("apt-1", None);
        apt.status = status.clone();
        assert_eq!(appointment_status_color(&apt), expected, "status {}", status);
    }
}

#[test]
fn status_label_spells_out_no_show() {
    let mut apt = appointment("apt-1", Some(utc_at(2025, 6, 18, 10, 30)));
    apt.status = AppointmentStatus::Noshow;
    let (days, slots) = week_inputs();

    let grid = resolve(&days, &slots, &[apt], &[], &Utc);
    assert_eq!(grid.cell(3, 5).unwrap().status_label, "No Show");
}

#[test]
fn encounter_badge_tracks_visit_lifecycle() {
    let active = encounter("enc-1", "apt-1", EncounterStatus::InProgress);
    let done = encounter("enc-2", "apt-2", EncounterStatus::Finished);
    let planned = encounter("enc-3", "apt-3", EncounterStatus::Other("planned".to_string()));
    let encounters = [active, done, planned];

    assert_eq!(encounter_badge("apt-1", &encounters), Some(EncounterBadge::Active));
    assert_eq!(encounter_badge("apt-2", &encounters), Some(EncounterBadge::Completed));
    assert_eq!(encounter_badge("apt-3", &encounters), None);
    assert_eq!(encounter_badge("apt-9", &encounters), None);
}

#[test]
fn first_matching_encounter_wins() {
    let encounters = [
        encounter("enc-1", "apt-1", EncounterStatus::Finished),
        encounter("enc-2", "apt-1", EncounterStatus::InProgress),
    ];
    assert_eq!(
        encounter_badge("apt-1", &encounters),
        Some(EncounterBadge::Completed)
    );
}

#[test]
fn resolved_cell_carries_the_badge() {
    let (days, slots) = week_inputs();
    let apt = appointment("apt-1", Some(utc_at(2025, 6, 18, 10, 30)));
    let encounters = [encounter("enc-1", "apt-1", EncounterStatus::InProgress)];

    let grid = resolve(&days, &slots, &[apt], &encounters, &Utc);
    assert_eq!(grid.cell(3, 5).unwrap().badge, Some(EncounterBadge::Active));
}

#[test]
fn missing_participant_falls_back_to_unknown_patient() {
    let (days, slots) = week_inputs();
    let mut apt = appointment("apt-1", Some(utc_at(2025, 6, 18, 10, 30)));
    apt.participant.clear();

    let grid = resolve(&days, &slots, &[apt], &[], &Utc);
    assert_eq!(grid.cell(3, 5).unwrap().patient_name, "Unknown Patient");
}

#[test]
fn today_index_matches_the_flagged_day() {
    let (days, slots) = week_inputs();
    let grid = resolve(&days, &slots, &[], &[], &Utc);
    assert_eq!(grid.today_index(), Some(3));
}
