// Reason assignment for detected downtime events
use crate::domain::downtime::{DowntimeCategory, DowntimeReason};
use rand::seq::SliceRandom;
use std::sync::Arc;

/// Supplies the reason tag for minor events. Production will back this with
/// real fault codes; until then `RandomReasonSource` stands in.
pub trait ReasonSource: Send + Sync {
    fn minor_reason(&self) -> DowntimeReason;
}

/// Picks uniformly from the minor fault families.
#[derive(Debug, Default, Clone, Copy)]
pub struct RandomReasonSource;

impl ReasonSource for RandomReasonSource {
    fn minor_reason(&self) -> DowntimeReason {
        DowntimeReason::MINOR_REASONS
            .choose(&mut rand::thread_rng())
            .copied()
            .unwrap_or(DowntimeReason::Mechanical)
    }
}

/// Always returns the same reason.
#[derive(Debug, Clone, Copy)]
pub struct FixedReasonSource(pub DowntimeReason);

impl ReasonSource for FixedReasonSource {
    fn minor_reason(&self) -> DowntimeReason {
        self.0
    }
}

#[derive(Clone)]
pub struct ReasonClassifier {
    source: Arc<dyn ReasonSource>,
}

impl ReasonClassifier {
    pub fn new(source: Arc<dyn ReasonSource>) -> Self {
        Self { source }
    }

    pub fn classify(&self, category: DowntimeCategory) -> DowntimeReason {
        match category {
            DowntimeCategory::Major => DowntimeReason::ScheduledMaintenance,
            DowntimeCategory::Minor => self.source.minor_reason(),
        }
    }
}

impl Default for ReasonClassifier {
    fn default() -> Self {
        Self::new(Arc::new(RandomReasonSource))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_major_is_always_scheduled_maintenance() {
        let classifier = ReasonClassifier::new(Arc::new(FixedReasonSource(
            DowntimeReason::Electrical,
        )));
        assert_eq!(
            classifier.classify(DowntimeCategory::Major),
            DowntimeReason::ScheduledMaintenance
        );
    }

    #[test]
    fn test_minor_uses_injected_source() {
        let classifier = ReasonClassifier::new(Arc::new(FixedReasonSource(
            DowntimeReason::Technological,
        )));
        assert_eq!(
            classifier.classify(DowntimeCategory::Minor),
            DowntimeReason::Technological
        );
    }

    #[test]
    fn test_random_source_stays_in_minor_set() {
        let classifier = ReasonClassifier::default();
        for _ in 0..50 {
            let reason = classifier.classify(DowntimeCategory::Minor);
            assert!(DowntimeReason::MINOR_REASONS.contains(&reason));
        }
    }
}
