// libs/appointment-cell/src/services/encounter.rs
use chrono::Utc;
use tracing::{debug, info, warn};

use shared_aidbox::AidboxClient;
use shared_config::AppConfig;
use shared_models::fhir::{
    Coding, Encounter, EncounterStatus, Patient, Period, Reference, ACT_CODE_SYSTEM,
};

use crate::models::AppointmentError;

pub struct EncounterService {
    aidbox: AidboxClient,
}

impl EncounterService {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            aidbox: AidboxClient::new(config),
        }
    }

    pub fn with_client(aidbox: AidboxClient) -> Self {
        Self { aidbox }
    }

    /// Start a clinical visit for a patient, optionally linked to the
    /// appointment being honored. Opens `in-progress` with period.start = now.
    pub async fn begin_encounter(
        &self,
        patient_id: &str,
        appointment_id: Option<&str>,
    ) -> Result<Encounter, AppointmentError> {
        let patient: Patient = self
            .aidbox
            .read("Patient", patient_id)
            .await
            .map_err(|_| AppointmentError::ValidationError(format!(
                "patient {} not found",
                patient_id
            )))?;

        let encounter = Encounter {
            resource_type: "Encounter".to_string(),
            id: None,
            status: EncounterStatus::InProgress,
            class: Some(Coding {
                system: Some(ACT_CODE_SYSTEM.to_string()),
                code: Some("AMB".to_string()),
                display: Some("ambulatory".to_string()),
            }),
            subject: Some(Reference {
                reference: Some(format!("Patient/{}", patient_id)),
                display: Some(patient.display_name()),
            }),
            appointment: appointment_id
                .map(|id| {
                    vec![Reference {
                        reference: Some(format!("Appointment/{}", id)),
                        display: None,
                    }]
                })
                .unwrap_or_default(),
            period: Some(Period {
                start: Some(Utc::now()),
                end: None,
            }),
        };

        let created = self
            .aidbox
            .create("Encounter", &encounter)
            .await
            .map_err(|e| AppointmentError::ServerError(e.to_string()))?;

        info!(
            "Began encounter {:?} for patient {} (appointment {:?})",
            created.id, patient_id, appointment_id
        );
        Ok(created)
    }

    /// Close a visit: status `finished`, period.end = now.
    pub async fn finish_encounter(&self, id: &str) -> Result<Encounter, AppointmentError> {
        let mut encounter: Encounter = self
            .aidbox
            .read("Encounter", id)
            .await
            .map_err(|_| AppointmentError::NotFound)?;

        encounter.status = EncounterStatus::Finished;
        let mut period = encounter.period.take().unwrap_or_default();
        period.end = Some(Utc::now());
        encounter.period = Some(period);

        let updated = self
            .aidbox
            .update("Encounter", id, &encounter)
            .await
            .map_err(|e| AppointmentError::ServerError(e.to_string()))?;

        info!("Finished encounter {}", id);
        Ok(updated)
    }

    /// All in-progress encounters, optionally narrowed to one patient.
    pub async fn active_encounters(
        &self,
        patient_id: Option<&str>,
    ) -> Result<Vec<Encounter>, AppointmentError> {
        let mut params = vec![("status".to_string(), "in-progress".to_string())];
        if let Some(patient_id) = patient_id {
            params.push(("subject".to_string(), format!("Patient/{}", patient_id)));
        }

        debug!("Listing active encounters (patient: {:?})", patient_id);

        let bundle = self
            .aidbox
            .search("Encounter", &params)
            .await
            .map_err(|e| AppointmentError::ServerError(e.to_string()))?;

        let encounters = bundle
            .entry
            .iter()
            .filter_map(|entry| entry.resource.clone())
            .filter_map(|resource| match serde_json::from_value(resource) {
                Ok(encounter) => Some(encounter),
                Err(e) => {
                    warn!("Skipping undecodable encounter: {}", e);
                    None
                }
            })
            .collect();

        Ok(encounters)
    }
}
