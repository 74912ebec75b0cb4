// libs/calendar-cell/src/models.rs
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

use shared_models::fhir::Appointment;

// ==============================================================================
// CALENDAR CONFIGURATION
// ==============================================================================

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum CalendarError {
    #[error("work window closes at hour {end} before it opens at hour {start}")]
    WindowInverted { start: u32, end: u32 },

    #[error("hour {0} is out of the 0-23 range")]
    HourOutOfRange(u32),

    #[error("slot cadence of {0} minutes must be between 1 and 59")]
    InvalidCadence(u32),
}

/// The business-hours window and slot cadence of the weekly grid. Values are
/// validated on construction, so a held config is always usable.
#[derive(Debug, Clone, Serialize)]
pub struct CalendarConfig {
    work_start_hour: u32,
    work_end_hour: u32,
    slot_minutes: u32,
}

impl CalendarConfig {
    pub fn new(
        work_start_hour: u32,
        work_end_hour: u32,
        slot_minutes: u32,
    ) -> Result<Self, CalendarError> {
        if work_start_hour > 23 {
            return Err(CalendarError::HourOutOfRange(work_start_hour));
        }
        if work_end_hour > 23 {
            return Err(CalendarError::HourOutOfRange(work_end_hour));
        }
        if work_end_hour < work_start_hour {
            return Err(CalendarError::WindowInverted {
                start: work_start_hour,
                end: work_end_hour,
            });
        }
        if slot_minutes == 0 || slot_minutes >= 60 {
            return Err(CalendarError::InvalidCadence(slot_minutes));
        }

        Ok(Self {
            work_start_hour,
            work_end_hour,
            slot_minutes,
        })
    }

    pub fn work_start_hour(&self) -> u32 {
        self.work_start_hour
    }

    pub fn work_end_hour(&self) -> u32 {
        self.work_end_hour
    }

    pub fn slot_minutes(&self) -> u32 {
        self.slot_minutes
    }
}

impl Default for CalendarConfig {
    /// 8 AM through 6 PM at a 30-minute cadence.
    fn default() -> Self {
        Self {
            work_start_hour: 8,
            work_end_hour: 18,
            slot_minutes: 30,
        }
    }
}

// ==============================================================================
// GRID BUILDING BLOCKS
// ==============================================================================

/// One calendar day of the displayed week.
#[derive(Debug, Clone, Serialize)]
pub struct WeekDay {
    pub date: NaiveDate,
    pub day_name: &'static str,
    pub date_label: String,
    pub is_today: bool,
}

/// One bookable unit within a day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TimeSlot {
    pub hour: u32,
    pub minute: u32,
    pub label: String,
}

// ==============================================================================
// DISPLAY CLASSIFICATION
// ==============================================================================

/// The display palette. Both classification lookups are total: any input maps
/// to one of these, with `Gray` as the neutral fallback.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Color {
    Gray,
    Blue,
    Green,
    Yellow,
    Purple,
    Red,
    Orange,
    Teal,
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Color::Gray => "gray",
            Color::Blue => "blue",
            Color::Green => "green",
            Color::Yellow => "yellow",
            Color::Purple => "purple",
            Color::Red => "red",
            Color::Orange => "orange",
            Color::Teal => "teal",
        };
        write!(f, "{}", name)
    }
}

/// Encounter overlay for an occupied cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EncounterBadge {
    Active,
    Completed,
}

// ==============================================================================
// RESOLVED GRID
// ==============================================================================

/// An occupied cell: the appointment plus everything derived for display.
#[derive(Debug, Clone, Serialize)]
pub struct GridCell {
    pub appointment: Appointment,
    pub patient_name: String,
    pub type_color: Color,
    pub status_color: Color,
    pub status_label: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub badge: Option<EncounterBadge>,
}

/// The renderable weekly snapshot: 7 days by N slots, each cell empty or
/// carrying one appointment. Rebuilt from scratch on every input change;
/// never mutated in place.
#[derive(Debug, Clone, Serialize)]
pub struct WeekGrid {
    pub days: Vec<WeekDay>,
    pub slots: Vec<TimeSlot>,
    /// Indexed `cells[day][slot]`.
    pub cells: Vec<Vec<Option<GridCell>>>,
}

impl WeekGrid {
    pub fn cell(&self, day_index: usize, slot_index: usize) -> Option<&GridCell> {
        self.cells.get(day_index)?.get(slot_index)?.as_ref()
    }

    /// An empty cell is a click target for starting a new booking.
    pub fn is_free(&self, day_index: usize, slot_index: usize) -> bool {
        self.cell(day_index, slot_index).is_none()
    }

    /// Column index of today, when the displayed week contains it.
    pub fn today_index(&self) -> Option<usize> {
        self.days.iter().position(|day| day.is_today)
    }

    pub fn occupied_count(&self) -> usize {
        self.cells
            .iter()
            .flat_map(|row| row.iter())
            .filter(|cell| cell.is_some())
            .count()
    }
}

// ==============================================================================
// CURRENT-TIME INDICATOR
// ==============================================================================

/// Position of the live clock within the work window, at minute resolution.
/// Converting the offset to pixels is the renderer's concern.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TimeIndicator {
    pub visible: bool,
    pub offset_minutes: u32,
    pub label: String,
}

impl TimeIndicator {
    pub fn hidden() -> Self {
        Self {
            visible: false,
            offset_minutes: 0,
            label: String::new(),
        }
    }
}
