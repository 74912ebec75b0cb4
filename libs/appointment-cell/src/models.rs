// libs/appointment-cell/src/models.rs
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use shared_models::fhir::{Appointment, AppointmentStatus, Encounter};

// ==============================================================================
// REQUEST/RESPONSE MODELS
// ==============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateAppointmentRequest {
    pub patient_id: String,
    pub patient_name: Option<String>,
    pub start: DateTime<Utc>,
    pub duration_minutes: Option<u32>,
    pub type_code: String,
    pub type_display: Option<String>,
    pub status: Option<AppointmentStatus>,
    pub description: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateAppointmentStatusRequest {
    pub status: AppointmentStatus,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BeginEncounterRequest {
    pub patient_id: String,
    pub appointment_id: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ActiveEncounterQuery {
    pub patient_id: Option<String>,
}

/// One displayed week's worth of calendar data, fetched in a single combined
/// query against the FHIR server.
#[derive(Debug, Clone, Serialize)]
pub struct WeekSchedule {
    pub appointments: Vec<Appointment>,
    pub encounters: Vec<Encounter>,
}

// ==============================================================================
// ERROR TYPES
// ==============================================================================

#[derive(Debug, thiserror::Error)]
pub enum AppointmentError {
    #[error("Appointment not found")]
    NotFound,

    #[error("Invalid appointment time: {0}")]
    InvalidTime(String),

    #[error("Slot already booked: {0}")]
    SlotTaken(String),

    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("FHIR server error: {0}")]
    ServerError(String),
}

impl From<AppointmentError> for shared_models::error::AppError {
    fn from(err: AppointmentError) -> Self {
        use shared_models::error::AppError;

        match err {
            AppointmentError::NotFound => AppError::NotFound(err.to_string()),
            AppointmentError::SlotTaken(_) => AppError::Conflict(err.to_string()),
            AppointmentError::InvalidTime(_) | AppointmentError::ValidationError(_) => {
                AppError::ValidationError(err.to_string())
            }
            AppointmentError::ServerError(_) => AppError::ExternalService(err.to_string()),
        }
    }
}
