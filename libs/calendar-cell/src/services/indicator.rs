// libs/calendar-cell/src/services/indicator.rs
//
// Current-time indicator: where the live clock sits inside the work window.
// The computation is pure; the ticker below owns the periodic refresh so the
// calendar view can cancel it on teardown.

use chrono::{DateTime, Local, TimeZone, Timelike};
use std::time::Duration;
use tokio::task::JoinHandle;

use crate::models::{CalendarConfig, TimeIndicator};
use crate::services::week::format_slot_label;

/// Suggested refresh cadence for callers driving the ticker.
pub const DEFAULT_REFRESH_PERIOD: Duration = Duration::from_secs(60);

/// Position of `now` within the work window. Visible exactly from the opening
/// minute through the closing minute; the offset counts minutes since the
/// window opened. Whether today's column is even on screen is the caller's
/// check, not this function's.
pub fn compute_indicator<Tz: TimeZone>(now: &DateTime<Tz>, config: &CalendarConfig) -> TimeIndicator {
    let minute_of_day = now.hour() * 60 + now.minute();
    let window_open = config.work_start_hour() * 60;
    let window_close = config.work_end_hour() * 60;

    if minute_of_day < window_open || minute_of_day > window_close {
        return TimeIndicator::hidden();
    }

    TimeIndicator {
        visible: true,
        offset_minutes: minute_of_day - window_open,
        label: format_slot_label(now.hour(), now.minute()),
    }
}

/// A cancellable repeating task that re-evaluates the indicator and hands each
/// reading to the callback. The first reading is delivered immediately.
pub struct IndicatorTicker {
    handle: JoinHandle<()>,
}

impl IndicatorTicker {
    pub fn start<F>(config: CalendarConfig, period: Duration, on_tick: F) -> Self
    where
        F: Fn(TimeIndicator) + Send + 'static,
    {
        let handle = tokio::spawn(async move {
            let mut interval = tokio::time::interval(period);
            loop {
                interval.tick().await;
                on_tick(compute_indicator(&Local::now(), &config));
            }
        });

        Self { handle }
    }

    /// Stop refreshing. Call when the calendar view is torn down.
    pub fn stop(self) {
        self.handle.abort();
    }

    pub fn is_stopped(&self) -> bool {
        self.handle.is_finished()
    }
}
