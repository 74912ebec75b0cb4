pub mod error;
pub mod fhir;
