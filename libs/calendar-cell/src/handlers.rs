// libs/calendar-cell/src/handlers.rs
use std::sync::Arc;

use axum::{
    extract::{Query, State},
    Json,
};
use chrono::{FixedOffset, NaiveDate, NaiveTime, TimeZone, Utc};
use serde::Deserialize;
use serde_json::{json, Value};

use appointment_cell::services::AppointmentService;
use shared_config::AppConfig;
use shared_models::error::AppError;

use crate::models::{CalendarConfig, TimeIndicator};
use crate::services::indicator::compute_indicator;
use crate::services::resolver::resolve;
use crate::services::week::{build_slots, build_week};

#[derive(Debug, Deserialize)]
pub struct WeekViewQuery {
    /// Reference date; any day of the wanted week. Defaults to today.
    pub date: Option<NaiveDate>,
    /// Viewer's UTC offset, east-positive. Defaults to UTC.
    pub tz_offset_minutes: Option<i32>,
}

/// One renderable weekly snapshot: days, slots, resolved cells and the
/// current-time indicator (suppressed when the week does not contain today).
#[axum::debug_handler]
pub async fn week_view(
    State(config): State<Arc<AppConfig>>,
    Query(query): Query<WeekViewQuery>,
) -> Result<Json<Value>, AppError> {
    let calendar = CalendarConfig::new(
        config.work_start_hour,
        config.work_end_hour,
        config.slot_minutes,
    )
    .map_err(|e| AppError::Internal(e.to_string()))?;

    let offset_minutes = query.tz_offset_minutes.unwrap_or(0);
    let offset = FixedOffset::east_opt(offset_minutes * 60)
        .ok_or_else(|| AppError::BadRequest(format!("invalid tz offset {}", offset_minutes)))?;

    let now = Utc::now().with_timezone(&offset);
    let reference = match query.date {
        Some(date) => offset
            .from_local_datetime(&date.and_time(NaiveTime::MIN))
            .single()
            .unwrap_or(now),
        None => now,
    };

    let days = build_week(&reference, &now);
    let slots = build_slots(&calendar);

    let schedule = AppointmentService::new(&config)
        .list_week_with_encounters(days[0].date, days[6].date)
        .await?;

    let grid = resolve(
        &days,
        &slots,
        &schedule.appointments,
        &schedule.encounters,
        &offset,
    );

    let indicator = if grid.today_index().is_some() {
        compute_indicator(&now, &calendar)
    } else {
        TimeIndicator::hidden()
    };

    Ok(Json(json!({
        "week": grid,
        "indicator": indicator,
    })))
}
