// libs/appointment-cell/src/handlers.rs
use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde_json::{json, Value};

use shared_config::AppConfig;
use shared_models::error::AppError;

use crate::models::{
    ActiveEncounterQuery, BeginEncounterRequest, CreateAppointmentRequest,
    UpdateAppointmentStatusRequest,
};
use crate::services::{AppointmentService, EncounterService};

#[axum::debug_handler]
pub async fn create_appointment(
    State(config): State<Arc<AppConfig>>,
    Json(request): Json<CreateAppointmentRequest>,
) -> Result<Json<Value>, AppError> {
    let service = AppointmentService::new(&config);

    let appointment = service.create_appointment(request).await?;

    Ok(Json(json!(appointment)))
}

#[axum::debug_handler]
pub async fn update_appointment_status(
    State(config): State<Arc<AppConfig>>,
    Path(appointment_id): Path<String>,
    Json(request): Json<UpdateAppointmentStatusRequest>,
) -> Result<Json<Value>, AppError> {
    let service = AppointmentService::new(&config);

    let appointment = service
        .update_status(&appointment_id, request.status)
        .await?;

    Ok(Json(json!(appointment)))
}

#[axum::debug_handler]
pub async fn delete_appointment(
    State(config): State<Arc<AppConfig>>,
    Path(appointment_id): Path<String>,
) -> Result<Json<Value>, AppError> {
    let service = AppointmentService::new(&config);

    service.delete_appointment(&appointment_id).await?;

    Ok(Json(json!({ "deleted": appointment_id })))
}

#[axum::debug_handler]
pub async fn begin_encounter(
    State(config): State<Arc<AppConfig>>,
    Json(request): Json<BeginEncounterRequest>,
) -> Result<Json<Value>, AppError> {
    let service = EncounterService::new(&config);

    let encounter = service
        .begin_encounter(&request.patient_id, request.appointment_id.as_deref())
        .await?;

    Ok(Json(json!(encounter)))
}

#[axum::debug_handler]
pub async fn finish_encounter(
    State(config): State<Arc<AppConfig>>,
    Path(encounter_id): Path<String>,
) -> Result<Json<Value>, AppError> {
    let service = EncounterService::new(&config);

    let encounter = service.finish_encounter(&encounter_id).await?;

    Ok(Json(json!(encounter)))
}

#[axum::debug_handler]
pub async fn list_active_encounters(
    State(config): State<Arc<AppConfig>>,
    Query(query): Query<ActiveEncounterQuery>,
) -> Result<Json<Value>, AppError> {
    let service = EncounterService::new(&config);

    let encounters = service
        .active_encounters(query.patient_id.as_deref())
        .await?;

    Ok(Json(json!({ "encounters": encounters })))
}
