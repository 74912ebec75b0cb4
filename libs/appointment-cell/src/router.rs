// libs/appointment-cell/src/router.rs
use std::sync::Arc;

use axum::{
    routing::{delete, get, post, put},
    Router,
};

use shared_config::AppConfig;

use crate::handlers;

pub fn appointment_routes(state: Arc<AppConfig>) -> Router {
    Router::new()
        .route("/", post(handlers::create_appointment))
        .route("/{appointment_id}/status", put(handlers::update_appointment_status))
        .route("/{appointment_id}", delete(handlers::delete_appointment))
        .with_state(state)
}

pub fn encounter_routes(state: Arc<AppConfig>) -> Router {
    Router::new()
        .route("/", post(handlers::begin_encounter))
        .route("/{encounter_id}/finish", put(handlers::finish_encounter))
        .route("/active", get(handlers::list_active_encounters))
        .with_state(state)
}
