// Per-mill and fleet report models handed to the presentation layer
use crate::domain::downtime::DowntimeEvent;
use crate::domain::metrics::{
    AggregateMetrics, ComparisonRow, DowntimeByDay, DowntimeByReason, FleetAverages,
    MillComparisonData, MillMetrics, Verdict,
};
use crate::domain::mill::MillInfo;
use crate::domain::window::TimeWindow;
use chrono::{DateTime, Utc};
use serde::Serialize;

/// Everything computed for one mill. Only ever built from a complete event list.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MillReport {
    pub mill: MillInfo,
    pub events: Vec<DowntimeEvent>,
    pub metrics: MillMetrics,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FleetAggregation {
    pub aggregate: AggregateMetrics,
    pub fleet_averages: FleetAverages,
    pub by_day: Vec<DowntimeByDay>,
    pub by_reason: Vec<DowntimeByReason>,
    pub comparison: Vec<MillComparisonData>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FleetReport {
    pub window_days: TimeWindow,
    pub generated_at: DateTime<Utc>,
    #[serde(flatten)]
    pub aggregation: FleetAggregation,
    /// Newest first, across all mills.
    pub events: Vec<DowntimeEvent>,
    pub unavailable_mills: Vec<UnavailableMill>,
}

/// A mill left out of the fleet roll-up because its data could not be fetched.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UnavailableMill {
    pub mill_id: String,
    pub reason: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MillDetail {
    pub window_days: TimeWindow,
    pub mill: MillInfo,
    pub metrics: MillMetrics,
    pub events: Vec<DowntimeEvent>,
    pub fleet_averages: FleetAverages,
    pub comparison: Vec<ComparisonRow>,
    pub verdict: Verdict,
}
