// Reliability metric domain models
use crate::domain::downtime::DowntimeReason;
use chrono::NaiveDate;
use serde::Serialize;

/// Round to two decimals. Applied only when building output structs.
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MillMetrics {
    pub availability_pct: f64,
    pub mtbf_hours: f64,
    pub mttr_hours: f64,
    pub total_downtime_hours: f64,
    pub minor_count: usize,
    pub major_count: usize,
    pub total_events: usize,
    pub avg_downtime_duration_min: f64,
    pub feed_efficiency_pct: f64,
    pub current_ore_rate: f64,
    pub is_running: bool,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AggregateMetrics {
    pub mill_count: usize,
    pub mills_running: usize,
    pub avg_availability_pct: f64,
    pub avg_mtbf_hours: f64,
    pub avg_mttr_hours: f64,
    pub total_downtime_hours: f64,
    pub total_events: usize,
    pub minor_count: usize,
    pub major_count: usize,
    pub minor_downtime_hours: f64,
    pub major_downtime_hours: f64,
}

/// Fleet means of the metrics a single mill is compared on.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FleetAverages {
    pub availability_pct: f64,
    pub mtbf_hours: f64,
    pub mttr_hours: f64,
    pub total_downtime_hours: f64,
    pub total_events: f64,
}

impl FleetAverages {
    pub fn rounded(&self) -> Self {
        Self {
            availability_pct: round2(self.availability_pct),
            mtbf_hours: round2(self.mtbf_hours),
            mttr_hours: round2(self.mttr_hours),
            total_downtime_hours: round2(self.total_downtime_hours),
            total_events: round2(self.total_events),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DowntimeByDay {
    pub date: NaiveDate,
    pub minor_count: usize,
    pub major_count: usize,
    pub minor_hours: f64,
    pub major_hours: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DowntimeByReason {
    pub reason: DowntimeReason,
    pub minor_count: usize,
    pub major_count: usize,
    pub total: usize,
    pub hours: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MillComparisonData {
    pub mill_id: String,
    pub display_name: String,
    pub section: String,
    pub availability_pct: f64,
    pub mtbf_hours: f64,
    pub mttr_hours: f64,
    pub total_downtime_hours: f64,
    pub total_events: usize,
    pub minor_count: usize,
    pub major_count: usize,
    pub feed_efficiency_pct: f64,
    pub current_ore_rate: f64,
    pub is_running: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum ComparisonMetric {
    Availability,
    Mtbf,
    Mttr,
    TotalDowntime,
    TotalEvents,
}

impl ComparisonMetric {
    pub const ALL: [ComparisonMetric; 5] = [
        ComparisonMetric::Availability,
        ComparisonMetric::Mtbf,
        ComparisonMetric::Mttr,
        ComparisonMetric::TotalDowntime,
        ComparisonMetric::TotalEvents,
    ];

    pub fn higher_is_better(self) -> bool {
        matches!(self, ComparisonMetric::Availability | ComparisonMetric::Mtbf)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ComparisonStatus {
    Better,
    Worse,
    Neutral,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ComparisonRow {
    pub metric: ComparisonMetric,
    pub mill_value: f64,
    pub fleet_average: f64,
    pub diff: f64,
    pub percent_diff: f64,
    pub status: ComparisonStatus,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Verdict {
    AboveAverage,
    AroundAverage,
    BelowAverage,
}
