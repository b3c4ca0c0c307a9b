// Per-mill reliability metrics over an analysis window
use crate::domain::downtime::{DowntimeCategory, DowntimeEvent};
use crate::domain::metrics::{MillMetrics, round2};
use crate::domain::reading::LiveSnapshot;

/// Compute a mill's metrics from its events over a window of `window_minutes`.
///
/// MTBF and MTTR are zero when no event occurred. Feed efficiency is derived
/// from nominal rate and uptime, so it tracks availability rather than
/// measured tonnage.
pub fn compute(
    events: &[DowntimeEvent],
    window_minutes: i64,
    nominal_feed_rate: f64,
    live: &LiveSnapshot,
) -> MillMetrics {
    let window_minutes = window_minutes as f64;
    let event_count = events.len();

    let total_downtime_minutes: f64 = events.iter().map(|e| e.duration_minutes as f64).sum();
    let available_minutes = window_minutes - total_downtime_minutes;
    let total_downtime_hours = total_downtime_minutes / 60.0;

    let availability_pct = if window_minutes > 0.0 {
        available_minutes / window_minutes * 100.0
    } else {
        100.0
    };

    let (mtbf_hours, mttr_hours, avg_downtime_duration_min) = if event_count > 0 {
        let n = event_count as f64;
        (
            available_minutes / 60.0 / n,
            total_downtime_hours / n,
            total_downtime_minutes / n,
        )
    } else {
        (0.0, 0.0, 0.0)
    };

    let expected_feed = nominal_feed_rate * (window_minutes / 60.0);
    let actual_feed = nominal_feed_rate * (available_minutes / 60.0);
    let feed_efficiency_pct = if expected_feed > 0.0 {
        actual_feed / expected_feed * 100.0
    } else {
        100.0
    };

    let minor_count = events
        .iter()
        .filter(|e| e.category == DowntimeCategory::Minor)
        .count();

    MillMetrics {
        availability_pct: round2(availability_pct),
        mtbf_hours: round2(mtbf_hours),
        mttr_hours: round2(mttr_hours),
        total_downtime_hours: round2(total_downtime_hours),
        minor_count,
        major_count: event_count - minor_count,
        total_events: event_count,
        avg_downtime_duration_min: round2(avg_downtime_duration_min),
        feed_efficiency_pct: round2(feed_efficiency_pct),
        current_ore_rate: round2(live.current_rate),
        is_running: live.is_running,
    }
}
