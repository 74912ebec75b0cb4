// libs/calendar-cell/src/router.rs
use std::sync::Arc;

use axum::{routing::get, Router};

use shared_config::AppConfig;

use crate::handlers;

pub fn calendar_routes(state: Arc<AppConfig>) -> Router {
    Router::new()
        .route("/week", get(handlers::week_view))
        .with_state(state)
}
