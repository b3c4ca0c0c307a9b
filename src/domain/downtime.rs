// Downtime event domain models
use crate::domain::error::ReliabilityError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Dips shorter than this are treated as sensor noise and never become events.
pub const MIN_EVENT_MINUTES: i64 = 5;

#[derive(Debug, Clone, Copy, PartialEq, Deserialize, Serialize)]
#[serde(rename_all(serialize = "camelCase"))]
pub struct DowntimeConfig {
    /// Feed rate (t/h) below which a mill counts as down.
    pub downtime_threshold: f64,
    /// Events shorter than this many minutes are minor, the rest major.
    pub minor_downtime_max_minutes: u32,
}

impl DowntimeConfig {
    pub fn new(downtime_threshold: f64, minor_downtime_max_minutes: u32) -> Self {
        Self {
            downtime_threshold,
            minor_downtime_max_minutes,
        }
    }

    pub fn validate(&self) -> Result<(), ReliabilityError> {
        if !self.downtime_threshold.is_finite() || self.downtime_threshold <= 0.0 {
            return Err(ReliabilityError::InvalidConfig(format!(
                "downtime_threshold must be a positive number, got {}",
                self.downtime_threshold
            )));
        }
        if self.minor_downtime_max_minutes == 0 {
            return Err(ReliabilityError::InvalidConfig(
                "minor_downtime_max_minutes must be positive".to_string(),
            ));
        }
        Ok(())
    }

    pub fn category_for(&self, duration_minutes: i64) -> DowntimeCategory {
        if duration_minutes < i64::from(self.minor_downtime_max_minutes) {
            DowntimeCategory::Minor
        } else {
            DowntimeCategory::Major
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DowntimeCategory {
    Minor,
    Major,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DowntimeReason {
    ScheduledMaintenance,
    Mechanical,
    Electrical,
    Technological,
}

impl DowntimeReason {
    /// Every reason key, in the order histograms list them before sorting.
    pub const CATALOG: [DowntimeReason; 4] = [
        DowntimeReason::ScheduledMaintenance,
        DowntimeReason::Mechanical,
        DowntimeReason::Electrical,
        DowntimeReason::Technological,
    ];

    pub const MINOR_REASONS: [DowntimeReason; 3] = [
        DowntimeReason::Mechanical,
        DowntimeReason::Electrical,
        DowntimeReason::Technological,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            DowntimeReason::ScheduledMaintenance => "scheduled_maintenance",
            DowntimeReason::Mechanical => "mechanical",
            DowntimeReason::Electrical => "electrical",
            DowntimeReason::Technological => "technological",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DowntimeEvent {
    pub id: String,
    pub mill_id: String,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub duration_minutes: i64,
    pub category: DowntimeCategory,
    pub reason: DowntimeReason,
    pub feed_rate_before: f64,
    pub feed_rate_during_min: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl DowntimeEvent {
    pub fn duration_hours(&self) -> f64 {
        self.duration_minutes as f64 / 60.0
    }
}
