// libs/calendar-cell/src/services/resolver.rs
//
// Slot resolver: places a week's appointments onto the (day, slot) grid and
// derives everything the renderer needs per occupied cell. Appointments that
// miss the grid (no start, off-cadence start, outside the displayed week or
// the work window) are dropped silently; a list view elsewhere owns full
// visibility.

use chrono::{TimeZone, Timelike};
use tracing::debug;

use shared_models::fhir::{Appointment, Encounter, EncounterStatus};

use crate::models::{Color, EncounterBadge, GridCell, TimeSlot, WeekDay, WeekGrid};

/// Build the renderable snapshot for one week. First match wins both for a
/// contested cell and for multiple encounters referencing one appointment.
pub fn resolve<Tz: TimeZone>(
    days: &[WeekDay],
    slots: &[TimeSlot],
    appointments: &[Appointment],
    encounters: &[Encounter],
    tz: &Tz,
) -> WeekGrid {
    let mut cells: Vec<Vec<Option<GridCell>>> = vec![vec![None; slots.len()]; days.len()];

    for appointment in appointments {
        let Some(start) = &appointment.start else {
            // Malformed upstream data is not the grid's problem.
            continue;
        };
        let local = start.with_timezone(tz);
        let date = local.date_naive();

        let Some(day_index) = days.iter().position(|day| day.date == date) else {
            continue;
        };
        let Some(slot_index) = slots
            .iter()
            .position(|slot| slot.hour == local.hour() && slot.minute == local.minute())
        else {
            continue;
        };

        if cells[day_index][slot_index].is_some() {
            debug!(
                "slot ({}, {}) already occupied, dropping appointment {:?}",
                day_index, slot_index, appointment.id
            );
            continue;
        }

        cells[day_index][slot_index] = Some(classify(appointment, encounters));
    }

    WeekGrid {
        days: days.to_vec(),
        slots: slots.to_vec(),
        cells,
    }
}

fn classify(appointment: &Appointment, encounters: &[Encounter]) -> GridCell {
    let badge = appointment
        .id
        .as_deref()
        .and_then(|id| encounter_badge(id, encounters));

    GridCell {
        patient_name: appointment.patient_display(),
        type_color: appointment_type_color(appointment),
        status_color: appointment_status_color(appointment),
        status_label: appointment.status.label().to_string(),
        badge,
        appointment: appointment.clone(),
    }
}

/// Color for the appointment's coded type. The structured code wins over the
/// free-text display; anything unrecognized lands on the neutral color, so
/// the lookup is total.
pub fn appointment_type_color(appointment: &Appointment) -> Color {
    if let Some(color) = appointment
        .type_code()
        .and_then(|code| type_color_for_code(&code.to_uppercase()))
    {
        return color;
    }

    appointment
        .type_display()
        .and_then(|display| type_color_for_display(&display.to_lowercase()))
        .unwrap_or(Color::Gray)
}

fn type_color_for_code(code: &str) -> Option<Color> {
    match code {
        "EMERGENCY" => Some(Color::Red),
        "CHECKUP" | "ROUTINE" => Some(Color::Blue),
        "FOLLOWUP" => Some(Color::Green),
        "WALKIN" => Some(Color::Yellow),
        _ => None,
    }
}

// Free-text fallback kept for records coded before the v2-0276 table was
// adopted upstream.
fn type_color_for_display(display: &str) -> Option<Color> {
    match display {
        "emergency" | "emergency appointment" => Some(Color::Red),
        "checkup"
        | "routine"
        | "routine appointment"
        | "routine appointment - default if not valued"
        | "a routine check-up, such as an annual physical" => Some(Color::Blue),
        "consultation" => Some(Color::Purple),
        "follow-up"
        | "followup"
        | "follow up visit from a previous appointment"
        | "a follow up visit from a previous appointment" => Some(Color::Green),
        "walk-in" | "walkin" | "a previously unscheduled walk-in visit" => Some(Color::Yellow),
        "surgery" | "procedure" => Some(Color::Orange),
        "therapy" => Some(Color::Teal),
        _ => None,
    }
}

/// Color for the appointment's lifecycle status; unknown codes are neutral.
pub fn appointment_status_color(appointment: &Appointment) -> Color {
    use shared_models::fhir::AppointmentStatus::*;

    match &appointment.status {
        Proposed => Color::Gray,
        Pending => Color::Yellow,
        Booked => Color::Blue,
        Arrived => Color::Green,
        Fulfilled => Color::Purple,
        Cancelled => Color::Red,
        Noshow => Color::Orange,
        Other(_) => Color::Gray,
    }
}

/// Badge for the first encounter back-referencing this appointment: a live
/// visit or a completed one. Array order decides when several match.
pub fn encounter_badge(appointment_id: &str, encounters: &[Encounter]) -> Option<EncounterBadge> {
    let encounter = encounters
        .iter()
        .find(|encounter| encounter.references_appointment(appointment_id))?;

    match encounter.status {
        EncounterStatus::InProgress => Some(EncounterBadge::Active),
        EncounterStatus::Finished => Some(EncounterBadge::Completed),
        EncounterStatus::Other(_) => None,
    }
}
