// libs/shared/models/src/fhir.rs
//
// FHIR-lite resource shapes: explicit structs carrying only the fields this
// system actually reads from the Aidbox server. The full FHIR schema stays on
// the server side.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

pub const V2_0276_SYSTEM: &str = "http://terminology.hl7.org/CodeSystem/v2-0276";
pub const ACT_CODE_SYSTEM: &str = "http://terminology.hl7.org/CodeSystem/v3-ActCode";

// ==============================================================================
// SHARED DATATYPES
// ==============================================================================

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Coding {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub system: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub display: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CodeableConcept {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub coding: Vec<Coding>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Reference {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reference: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub display: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Period {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct HumanName {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub given: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub family: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ContactPoint {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub system: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
    #[serde(rename = "use", skip_serializing_if = "Option::is_none")]
    pub use_: Option<String>,
}

// ==============================================================================
// STATUS ENUMERATIONS
// ==============================================================================

/// Appointment lifecycle status. The enumeration is closed on the server side,
/// but codes this client does not anticipate round-trip verbatim through
/// `Other` instead of failing deserialization.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum AppointmentStatus {
    Proposed,
    Pending,
    Booked,
    Arrived,
    Fulfilled,
    Cancelled,
    Noshow,
    Other(String),
}

impl From<String> for AppointmentStatus {
    fn from(value: String) -> Self {
        match value.as_str() {
            "proposed" => AppointmentStatus::Proposed,
            "pending" => AppointmentStatus::Pending,
            "booked" => AppointmentStatus::Booked,
            "arrived" => AppointmentStatus::Arrived,
            "fulfilled" => AppointmentStatus::Fulfilled,
            "cancelled" => AppointmentStatus::Cancelled,
            "noshow" => AppointmentStatus::Noshow,
            _ => AppointmentStatus::Other(value),
        }
    }
}

impl From<AppointmentStatus> for String {
    fn from(status: AppointmentStatus) -> Self {
        status.to_string()
    }
}

impl fmt::Display for AppointmentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppointmentStatus::Proposed => write!(f, "proposed"),
            AppointmentStatus::Pending => write!(f, "pending"),
            AppointmentStatus::Booked => write!(f, "booked"),
            AppointmentStatus::Arrived => write!(f, "arrived"),
            AppointmentStatus::Fulfilled => write!(f, "fulfilled"),
            AppointmentStatus::Cancelled => write!(f, "cancelled"),
            AppointmentStatus::Noshow => write!(f, "noshow"),
            AppointmentStatus::Other(code) => write!(f, "{}", code),
        }
    }
}

impl AppointmentStatus {
    /// Human label for display. Unrecognized codes pass through verbatim so
    /// unexpected server data degrades to text instead of an error.
    pub fn label(&self) -> &str {
        match self {
            AppointmentStatus::Proposed => "Proposed",
            AppointmentStatus::Pending => "Pending",
            AppointmentStatus::Booked => "Booked",
            AppointmentStatus::Arrived => "Arrived",
            AppointmentStatus::Fulfilled => "Fulfilled",
            AppointmentStatus::Cancelled => "Cancelled",
            AppointmentStatus::Noshow => "No Show",
            AppointmentStatus::Other(code) => code,
        }
    }
}

/// Encounter lifecycle status. Only `in-progress` and `finished` drive
/// behavior here; everything else is carried through `Other`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum EncounterStatus {
    InProgress,
    Finished,
    Other(String),
}

impl From<String> for EncounterStatus {
    fn from(value: String) -> Self {
        match value.as_str() {
            "in-progress" => EncounterStatus::InProgress,
            "finished" => EncounterStatus::Finished,
            _ => EncounterStatus::Other(value),
        }
    }
}

impl From<EncounterStatus> for String {
    fn from(status: EncounterStatus) -> Self {
        status.to_string()
    }
}

impl fmt::Display for EncounterStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EncounterStatus::InProgress => write!(f, "in-progress"),
            EncounterStatus::Finished => write!(f, "finished"),
            EncounterStatus::Other(code) => write!(f, "{}", code),
        }
    }
}

// ==============================================================================
// RESOURCES
// ==============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Patient {
    #[serde(default = "Patient::resource_type")]
    pub resource_type: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub active: Option<bool>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub name: Vec<HumanName>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gender: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub birth_date: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub telecom: Vec<ContactPoint>,
}

impl Patient {
    fn resource_type() -> String {
        "Patient".to_string()
    }

    pub fn display_name(&self) -> String {
        let Some(name) = self.name.first() else {
            return "Unknown Patient".to_string();
        };
        let given = name.given.join(" ");
        let family = name.family.as_deref().unwrap_or("");
        let full = format!("{} {}", given, family).trim().to_string();
        if full.is_empty() {
            "Unknown Patient".to_string()
        } else {
            full
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Participant {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub actor: Option<Reference>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Appointment {
    #[serde(default = "Appointment::resource_type")]
    pub resource_type: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub status: AppointmentStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub appointment_type: Option<CodeableConcept>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub minutes_duration: Option<u32>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub participant: Vec<Participant>,
}

impl Appointment {
    fn resource_type() -> String {
        "Appointment".to_string()
    }

    /// The coded type, preferring the structured code over free text.
    pub fn type_code(&self) -> Option<&str> {
        self.appointment_type
            .as_ref()?
            .coding
            .first()?
            .code
            .as_deref()
    }

    /// The human-readable type, falling back through text and coding display.
    pub fn type_display(&self) -> Option<&str> {
        let concept = self.appointment_type.as_ref()?;
        concept
            .text
            .as_deref()
            .or_else(|| concept.coding.first()?.display.as_deref())
    }

    /// The Patient participant, if any.
    pub fn patient_actor(&self) -> Option<&Reference> {
        self.participant
            .iter()
            .filter_map(|p| p.actor.as_ref())
            .find(|actor| {
                actor
                    .reference
                    .as_deref()
                    .is_some_and(|r| r.starts_with("Patient/"))
            })
    }

    pub fn patient_display(&self) -> String {
        self.patient_actor()
            .and_then(|actor| actor.display.clone())
            .unwrap_or_else(|| "Unknown Patient".to_string())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Encounter {
    #[serde(default = "Encounter::resource_type")]
    pub resource_type: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub status: EncounterStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub class: Option<Coding>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subject: Option<Reference>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub appointment: Vec<Reference>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub period: Option<Period>,
}

impl Encounter {
    fn resource_type() -> String {
        "Encounter".to_string()
    }

    /// Whether this encounter back-references the given appointment id.
    pub fn references_appointment(&self, appointment_id: &str) -> bool {
        let target = format!("Appointment/{}", appointment_id);
        self.appointment
            .iter()
            .any(|r| r.reference.as_deref() == Some(target.as_str()))
    }
}

// ==============================================================================
// SEARCH BUNDLES
// ==============================================================================

/// A FHIR searchset envelope. Entries stay raw JSON so one malformed record
/// cannot poison the whole batch; callers decode per entry and skip failures.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Bundle {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total: Option<u64>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub entry: Vec<BundleEntry>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BundleEntry {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resource: Option<Value>,
}

impl Bundle {
    /// The `resourceType` tags of every entry, in order.
    pub fn resource_types(&self) -> impl Iterator<Item = (&Value, Option<&str>)> {
        self.entry.iter().filter_map(|entry| {
            let resource = entry.resource.as_ref()?;
            Some((resource, resource.get("resourceType").and_then(Value::as_str)))
        })
    }
}
