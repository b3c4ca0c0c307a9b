// Reliability service - Per-mill fan-out, then fleet aggregation and comparison
use crate::application::comparison_engine;
use crate::application::event_detector::EventDetector;
use crate::application::fleet_aggregator;
use crate::application::metrics_aggregator;
use crate::application::reading_source::ReadingSource;
use crate::domain::downtime::{DowntimeEvent, DowntimeReason};
use crate::domain::error::ReliabilityError;
use crate::domain::mill::MillInfo;
use crate::domain::reading::LiveSnapshot;
use crate::domain::report::{FleetReport, MillDetail, MillReport, UnavailableMill};
use crate::domain::window::TimeWindow;
use chrono::{DateTime, Utc};
use std::collections::HashSet;
use std::sync::Arc;
use tokio::task::JoinSet;

#[derive(Clone)]
pub struct ReliabilityService {
    source: Arc<dyn ReadingSource>,
    mills: Arc<Vec<MillInfo>>,
    detector: EventDetector,
}

impl ReliabilityService {
    pub fn new(
        source: Arc<dyn ReadingSource>,
        mills: Vec<MillInfo>,
        detector: EventDetector,
    ) -> Self {
        Self {
            source,
            mills: Arc::new(mills),
            detector,
        }
    }

    pub fn mills(&self) -> &[MillInfo] {
        &self.mills
    }

    /// Configured mills the reading source has never heard of
    pub async fn unmonitored_mills(&self) -> anyhow::Result<Vec<String>> {
        let known: HashSet<String> = self.source.list_mill_ids().await?.into_iter().collect();
        Ok(self
            .mills
            .iter()
            .filter(|m| !known.contains(&m.id))
            .map(|m| m.id.clone())
            .collect())
    }

    pub async fn fleet_report(
        &self,
        window: TimeWindow,
        now: DateTime<Utc>,
    ) -> Result<FleetReport, ReliabilityError> {
        let (reports, unavailable_mills) = self.compute_all(window).await?;

        let mut aggregation =
            fleet_aggregator::aggregate(&reports, window.days(), now, &DowntimeReason::CATALOG);
        aggregation.fleet_averages = aggregation.fleet_averages.rounded();

        let mut events: Vec<DowntimeEvent> = reports.into_iter().flat_map(|r| r.events).collect();
        events.sort_by(|a, b| b.start_time.cmp(&a.start_time));

        tracing::info!(
            "Fleet report for {} days: {} mills, {} events, {} unavailable",
            window.days(),
            aggregation.aggregate.mill_count,
            events.len(),
            unavailable_mills.len()
        );

        Ok(FleetReport {
            window_days: window,
            generated_at: now,
            aggregation,
            events,
            unavailable_mills,
        })
    }

    pub async fn mill_detail(
        &self,
        mill_id: &str,
        window: TimeWindow,
    ) -> Result<MillDetail, ReliabilityError> {
        if !self.mills.iter().any(|m| m.id == mill_id) {
            return Err(ReliabilityError::UnknownMill(mill_id.to_string()));
        }

        let (reports, unavailable) = self.compute_all(window).await?;
        if let Some(missing) = unavailable.into_iter().find(|u| u.mill_id == mill_id) {
            return Err(ReliabilityError::DataUnavailable {
                mill_id: missing.mill_id,
                reason: missing.reason,
            });
        }

        let fleet_averages = fleet_aggregator::fleet_averages(&reports);
        let report = reports
            .into_iter()
            .find(|r| r.mill.id == mill_id)
            .ok_or_else(|| ReliabilityError::UnknownMill(mill_id.to_string()))?;

        let comparison = comparison_engine::compare(&report.metrics, &fleet_averages);
        let verdict = comparison_engine::verdict(&comparison);

        Ok(MillDetail {
            window_days: window,
            mill: report.mill,
            metrics: report.metrics,
            events: report.events,
            fleet_averages: fleet_averages.rounded(),
            comparison,
            verdict,
        })
    }

    /// One task per mill; waits for all of them before returning. Dropping the
    /// returned future aborts every task still running.
    async fn compute_all(
        &self,
        window: TimeWindow,
    ) -> Result<(Vec<MillReport>, Vec<UnavailableMill>), ReliabilityError> {
        let mut tasks = JoinSet::new();
        for mill in self.mills.iter().cloned() {
            let source = self.source.clone();
            let detector = self.detector.clone();
            tasks.spawn(
                async move { compute_mill(source.as_ref(), &detector, mill, window).await },
            );
        }

        let mut reports = Vec::with_capacity(self.mills.len());
        let mut unavailable = Vec::new();
        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok(Ok(report)) => reports.push(report),
                Ok(Err(ReliabilityError::DataUnavailable { mill_id, reason })) => {
                    tracing::warn!("Mill {} excluded from fleet metrics: {}", mill_id, reason);
                    unavailable.push(UnavailableMill { mill_id, reason });
                }
                Ok(Err(e)) => return Err(e),
                Err(e) => return Err(ReliabilityError::TaskFailed(e.to_string())),
            }
        }

        // Completion order is arbitrary; present mills in configured order.
        let position = |id: &str| self.mills.iter().position(|m| m.id == id);
        reports.sort_by_key(|r| position(&r.mill.id));
        unavailable.sort_by_key(|u| position(&u.mill_id));

        Ok((reports, unavailable))
    }
}

async fn compute_mill(
    source: &dyn ReadingSource,
    detector: &EventDetector,
    mill: MillInfo,
    window: TimeWindow,
) -> Result<MillReport, ReliabilityError> {
    let unavailable = |reason: String| ReliabilityError::DataUnavailable {
        mill_id: mill.id.clone(),
        reason,
    };

    let readings = source
        .fetch_readings(&mill.id, window)
        .await
        .map_err(|e| unavailable(format!("failed to fetch readings: {e:#}")))?;

    // Detection needs at least two samples.
    match readings.iter().filter(|r| r.finite_value().is_some()).count() {
        0 => return Err(unavailable("no readings in window".to_string())),
        1 => return Err(unavailable("insufficient readings in window".to_string())),
        _ => {}
    }

    let live_rate = source
        .fetch_live_rate(&mill.id)
        .await
        .map_err(|e| unavailable(format!("failed to fetch live rate: {e:#}")))?;
    let live = LiveSnapshot::from_rate(live_rate, detector.config().downtime_threshold);

    let events = detector.detect(&mill.id, &readings);
    let metrics = metrics_aggregator::compute(
        &events,
        window.window_minutes(),
        mill.nominal_feed_rate,
        &live,
    );

    tracing::debug!(
        "Mill {}: {} readings, {} events, availability {}%",
        mill.id,
        readings.len(),
        events.len(),
        metrics.availability_pct
    );

    Ok(MillReport {
        mill,
        events,
        metrics,
    })
}
