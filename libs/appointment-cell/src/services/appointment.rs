// libs/appointment-cell/src/services/appointment.rs
use chrono::{DateTime, Duration, NaiveDate, SecondsFormat, Utc};
use serde_json::Value;
use tracing::{debug, info, warn};

use shared_aidbox::AidboxClient;
use shared_config::AppConfig;
use shared_models::fhir::{
    Appointment, AppointmentStatus, CodeableConcept, Coding, Participant, Reference,
    V2_0276_SYSTEM,
};

use crate::models::{AppointmentError, CreateAppointmentRequest, WeekSchedule};

const DEFAULT_DURATION_MINUTES: u32 = 30;

pub struct AppointmentService {
    aidbox: AidboxClient,
}

impl AppointmentService {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            aidbox: AidboxClient::new(config),
        }
    }

    pub fn with_client(aidbox: AidboxClient) -> Self {
        Self { aidbox }
    }

    /// Fetch one week's appointments together with their linked encounters in
    /// a single combined search (`_revinclude=Encounter:appointment`).
    /// Entries that fail to decode are skipped, not fatal: one malformed
    /// record must not blank the whole calendar.
    pub async fn list_week_with_encounters(
        &self,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<WeekSchedule, AppointmentError> {
        debug!("Fetching week schedule from {} to {}", start, end);

        let params = vec![
            ("date".to_string(), format!("ge{}", start)),
            ("date".to_string(), format!("le{}", end)),
            ("_sort".to_string(), "date".to_string()),
            ("_count".to_string(), "100".to_string()),
            ("_revinclude".to_string(), "Encounter:appointment".to_string()),
        ];

        let bundle = self
            .aidbox
            .search("Appointment", &params)
            .await
            .map_err(|e| AppointmentError::ServerError(e.to_string()))?;

        let mut appointments = Vec::new();
        let mut encounters = Vec::new();

        for entry in &bundle.entry {
            let Some(resource) = &entry.resource else {
                continue;
            };
            match resource.get("resourceType").and_then(Value::as_str) {
                Some("Appointment") => match serde_json::from_value(resource.clone()) {
                    Ok(appointment) => appointments.push(appointment),
                    Err(e) => warn!("Skipping undecodable appointment: {}", e),
                },
                Some("Encounter") => match serde_json::from_value(resource.clone()) {
                    Ok(encounter) => encounters.push(encounter),
                    Err(e) => warn!("Skipping undecodable encounter: {}", e),
                },
                _ => {}
            }
        }

        debug!(
            "Week schedule loaded: {} appointments, {} encounters",
            appointments.len(),
            encounters.len()
        );

        Ok(WeekSchedule {
            appointments,
            encounters,
        })
    }

    /// Create an appointment; the server assigns and returns the identifier.
    /// A start instant already held by a live appointment is rejected.
    pub async fn create_appointment(
        &self,
        request: CreateAppointmentRequest,
    ) -> Result<Appointment, AppointmentError> {
        if request.patient_id.is_empty() {
            return Err(AppointmentError::ValidationError(
                "patient_id must not be empty".to_string(),
            ));
        }
        let duration = request.duration_minutes.unwrap_or(DEFAULT_DURATION_MINUTES);
        if duration == 0 {
            return Err(AppointmentError::InvalidTime(
                "duration must be at least one minute".to_string(),
            ));
        }

        if self.slot_is_taken(&request.start).await? {
            return Err(AppointmentError::SlotTaken(format!(
                "an appointment already starts at {}",
                request.start
            )));
        }

        let appointment = Appointment {
            resource_type: "Appointment".to_string(),
            id: None,
            status: request.status.unwrap_or(AppointmentStatus::Booked),
            appointment_type: Some(CodeableConcept {
                coding: vec![Coding {
                    system: Some(V2_0276_SYSTEM.to_string()),
                    code: Some(request.type_code.clone()),
                    display: request.type_display.clone(),
                }],
                text: request.type_display.clone(),
            }),
            description: request.description.clone(),
            start: Some(request.start),
            end: Some(request.start + Duration::minutes(duration as i64)),
            minutes_duration: Some(duration),
            participant: vec![Participant {
                actor: Some(Reference {
                    reference: Some(format!("Patient/{}", request.patient_id)),
                    display: request.patient_name.clone(),
                }),
                status: Some("accepted".to_string()),
            }],
        };

        let created = self
            .aidbox
            .create("Appointment", &appointment)
            .await
            .map_err(|e| AppointmentError::ServerError(e.to_string()))?;

        info!("Created appointment {:?} at {}", created.id, request.start);
        Ok(created)
    }

    /// Whether any live appointment already starts at this exact instant.
    /// Cancelled bookings do not hold their slot.
    async fn slot_is_taken(&self, start: &DateTime<Utc>) -> Result<bool, AppointmentError> {
        let params = vec![(
            "date".to_string(),
            start.to_rfc3339_opts(SecondsFormat::Secs, true),
        )];

        let bundle = self
            .aidbox
            .search("Appointment", &params)
            .await
            .map_err(|e| AppointmentError::ServerError(e.to_string()))?;

        let taken = bundle
            .entry
            .iter()
            .filter_map(|entry| entry.resource.as_ref())
            .filter_map(|resource| {
                serde_json::from_value::<Appointment>(resource.clone()).ok()
            })
            .any(|existing| existing.status != AppointmentStatus::Cancelled);

        Ok(taken)
    }

    /// Update an appointment's status by identifier (read-modify-write; the
    /// FHIR endpoint replaces whole resources).
    pub async fn update_status(
        &self,
        id: &str,
        status: AppointmentStatus,
    ) -> Result<Appointment, AppointmentError> {
        let mut appointment: Appointment = self
            .aidbox
            .read("Appointment", id)
            .await
            .map_err(|_| AppointmentError::NotFound)?;

        appointment.status = status;

        let updated = self
            .aidbox
            .update("Appointment", id, &appointment)
            .await
            .map_err(|e| AppointmentError::ServerError(e.to_string()))?;

        info!("Updated appointment {} to status {}", id, updated.status);
        Ok(updated)
    }

    pub async fn delete_appointment(&self, id: &str) -> Result<(), AppointmentError> {
        self.aidbox
            .delete("Appointment", id)
            .await
            .map_err(|e| AppointmentError::ServerError(e.to_string()))?;

        info!("Deleted appointment {}", id);
        Ok(())
    }
}
