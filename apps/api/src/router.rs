use std::sync::Arc;

use axum::{
    Router,
    routing::get,
};

use appointment_cell::router::{appointment_routes, encounter_routes};
use calendar_cell::router::calendar_routes;
use shared_config::AppConfig;

pub fn create_router(state: Arc<AppConfig>) -> Router {
    Router::new()
        .route("/", get(|| async { "Intake Calendar API is running!" }))
        .nest("/calendar", calendar_routes(state.clone()))
        .nest("/appointments", appointment_routes(state.clone()))
        .nest("/encounters", encounter_routes(state.clone()))
}
