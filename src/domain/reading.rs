// Feed-rate reading domain models
use chrono::{DateTime, Utc};
use serde::Serialize;

/// A single ore feed-rate sample (t/h). `value` is `None` when the sensor
/// reported nothing for that timestamp.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Reading {
    pub timestamp: DateTime<Utc>,
    pub value: Option<f64>,
}

impl Reading {
    pub fn new(timestamp: DateTime<Utc>, value: f64) -> Self {
        Self {
            timestamp,
            value: Some(value),
        }
    }

    pub fn missing(timestamp: DateTime<Utc>) -> Self {
        Self {
            timestamp,
            value: None,
        }
    }

    /// The sample value, if present and finite.
    pub fn finite_value(&self) -> Option<f64> {
        self.value.filter(|v| v.is_finite())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LiveSnapshot {
    pub current_rate: f64,
    pub is_running: bool,
}

impl LiveSnapshot {
    pub fn from_rate(rate: Option<f64>, downtime_threshold: f64) -> Self {
        match rate.filter(|r| r.is_finite()) {
            Some(current_rate) => Self {
                current_rate,
                is_running: current_rate >= downtime_threshold,
            },
            None => Self {
                current_rate: 0.0,
                is_running: false,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_finite_value_filters_gaps() {
        let ts = Utc::now();
        assert_eq!(Reading::new(ts, 150.0).finite_value(), Some(150.0));
        assert_eq!(Reading::new(ts, f64::NAN).finite_value(), None);
        assert_eq!(Reading::new(ts, f64::INFINITY).finite_value(), None);
        assert_eq!(Reading::missing(ts).finite_value(), None);
    }

    #[test]
    fn test_live_snapshot_from_rate() {
        let running = LiveSnapshot::from_rate(Some(155.0), 10.0);
        assert!(running.is_running);
        assert_eq!(running.current_rate, 155.0);

        let stopped = LiveSnapshot::from_rate(Some(2.5), 10.0);
        assert!(!stopped.is_running);

        let unknown = LiveSnapshot::from_rate(None, 10.0);
        assert_eq!(unknown.current_rate, 0.0);
        assert!(!unknown.is_running);
    }
}
