// Downtime detection - threshold-crossing state machine over feed-rate readings
use crate::application::reason_classifier::ReasonClassifier;
use crate::domain::downtime::{DowntimeConfig, DowntimeEvent, MIN_EVENT_MINUTES};
use crate::domain::reading::Reading;
use chrono::{DateTime, Utc};
use std::cmp::Ordering;

const OPEN_EVENT_NOTE: &str = "ongoing at end of window";

#[derive(Debug, Clone, Copy)]
struct OpenDowntime {
    start: DateTime<Utc>,
    feed_rate_before: f64,
    min_during: f64,
}

#[derive(Debug, Clone, Copy)]
enum DetectorState {
    Running,
    Down(OpenDowntime),
}

#[derive(Clone)]
pub struct EventDetector {
    config: DowntimeConfig,
    classifier: ReasonClassifier,
}

impl EventDetector {
    pub fn new(config: DowntimeConfig, classifier: ReasonClassifier) -> Self {
        Self { config, classifier }
    }

    pub fn config(&self) -> &DowntimeConfig {
        &self.config
    }

    /// Turn one mill's readings (any order) into downtime events, newest first.
    ///
    /// Missing or non-finite samples are skipped: they neither open nor close
    /// a downtime. A downtime still open after the last reading is closed at
    /// that reading's timestamp and tagged with a note, since the mill may in
    /// fact still be down.
    pub fn detect(&self, mill_id: &str, readings: &[Reading]) -> Vec<DowntimeEvent> {
        if readings.len() < 2 {
            return Vec::new();
        }

        let mut sorted: Vec<&Reading> = readings.iter().collect();
        sorted.sort_by(|a, b| {
            a.timestamp
                .cmp(&b.timestamp)
                .then_with(|| compare_values(a.value, b.value))
        });

        let threshold = self.config.downtime_threshold;
        let mut state = DetectorState::Running;
        let mut previous: Option<f64> = None;
        let mut last_seen: Option<DateTime<Utc>> = None;
        let mut skipped = 0usize;
        let mut events = Vec::new();

        for reading in sorted {
            let Some(value) = reading.finite_value() else {
                skipped += 1;
                continue;
            };

            state = match state {
                DetectorState::Running if value < threshold => DetectorState::Down(OpenDowntime {
                    start: reading.timestamp,
                    feed_rate_before: previous.unwrap_or(value),
                    min_during: value,
                }),
                DetectorState::Running => DetectorState::Running,
                DetectorState::Down(mut open) if value < threshold => {
                    open.min_during = open.min_during.min(value);
                    DetectorState::Down(open)
                }
                DetectorState::Down(open) => {
                    events.extend(self.close(mill_id, open, reading.timestamp, None));
                    DetectorState::Running
                }
            };

            previous = Some(value);
            last_seen = Some(reading.timestamp);
        }

        if let (DetectorState::Down(open), Some(end)) = (state, last_seen) {
            events.extend(self.close(mill_id, open, end, Some(OPEN_EVENT_NOTE.to_string())));
        }

        if skipped > 0 {
            tracing::warn!(
                "Skipped {} missing or non-finite readings for mill {}",
                skipped,
                mill_id
            );
        }

        events.sort_by(|a, b| b.start_time.cmp(&a.start_time));
        events
    }

    fn close(
        &self,
        mill_id: &str,
        open: OpenDowntime,
        end: DateTime<Utc>,
        notes: Option<String>,
    ) -> Option<DowntimeEvent> {
        let elapsed_ms = (end - open.start).num_milliseconds();
        let duration_minutes = (elapsed_ms as f64 / 60_000.0).round() as i64;
        if duration_minutes < MIN_EVENT_MINUTES {
            return None;
        }

        let category = self.config.category_for(duration_minutes);
        let reason = self.classifier.classify(category);

        Some(DowntimeEvent {
            id: format!("{}-{}", mill_id, open.start.timestamp_millis()),
            mill_id: mill_id.to_string(),
            start_time: open.start,
            end_time: end,
            duration_minutes,
            category,
            reason,
            feed_rate_before: open.feed_rate_before,
            feed_rate_during_min: open.min_during,
            notes,
        })
    }
}

/// Total order over optional samples so duplicate timestamps sort the same
/// way regardless of input order.
fn compare_values(a: Option<f64>, b: Option<f64>) -> Ordering {
    match (a, b) {
        (Some(x), Some(y)) => x.total_cmp(&y),
        (None, Some(_)) => Ordering::Less,
        (Some(_), None) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}
