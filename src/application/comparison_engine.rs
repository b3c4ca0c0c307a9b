// Mill-versus-fleet comparison and overall verdict
use crate::domain::metrics::{
    ComparisonMetric, ComparisonRow, ComparisonStatus, FleetAverages, MillMetrics, Verdict, round2,
};

/// Differences smaller than this (in percent of the fleet average) are neutral.
const NEUTRAL_BAND_PCT: f64 = 5.0;
/// How many more better (or worse) metrics are needed to leave "around average".
const VERDICT_MARGIN: usize = 1;

fn metric_values(
    metric: ComparisonMetric,
    mill: &MillMetrics,
    fleet: &FleetAverages,
) -> (f64, f64) {
    match metric {
        ComparisonMetric::Availability => (mill.availability_pct, fleet.availability_pct),
        ComparisonMetric::Mtbf => (mill.mtbf_hours, fleet.mtbf_hours),
        ComparisonMetric::Mttr => (mill.mttr_hours, fleet.mttr_hours),
        ComparisonMetric::TotalDowntime => (mill.total_downtime_hours, fleet.total_downtime_hours),
        ComparisonMetric::TotalEvents => (mill.total_events as f64, fleet.total_events),
    }
}

fn percent_diff(diff: f64, average: f64) -> f64 {
    if average != 0.0 {
        diff / average * 100.0
    } else if diff > 0.0 {
        100.0
    } else if diff < 0.0 {
        -100.0
    } else {
        0.0
    }
}

fn status_for(metric: ComparisonMetric, percent_diff: f64) -> ComparisonStatus {
    if percent_diff.abs() < NEUTRAL_BAND_PCT {
        return ComparisonStatus::Neutral;
    }
    match (metric.higher_is_better(), percent_diff > 0.0) {
        (true, true) | (false, false) => ComparisonStatus::Better,
        _ => ComparisonStatus::Worse,
    }
}

pub fn compare(mill: &MillMetrics, fleet: &FleetAverages) -> Vec<ComparisonRow> {
    ComparisonMetric::ALL
        .into_iter()
        .map(|metric| {
            let (mill_value, fleet_average) = metric_values(metric, mill, fleet);
            let diff = mill_value - fleet_average;
            let pct = percent_diff(diff, fleet_average);
            ComparisonRow {
                metric,
                mill_value: round2(mill_value),
                fleet_average: round2(fleet_average),
                diff: round2(diff),
                percent_diff: round2(pct),
                status: status_for(metric, pct),
            }
        })
        .collect()
}

pub fn verdict(rows: &[ComparisonRow]) -> Verdict {
    let better = rows
        .iter()
        .filter(|r| r.status == ComparisonStatus::Better)
        .count();
    let worse = rows
        .iter()
        .filter(|r| r.status == ComparisonStatus::Worse)
        .count();

    if better > worse + VERDICT_MARGIN {
        Verdict::AboveAverage
    } else if worse > better + VERDICT_MARGIN {
        Verdict::BelowAverage
    } else {
        Verdict::AroundAverage
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn metrics(
        availability: f64,
        mtbf: f64,
        mttr: f64,
        downtime: f64,
        events: usize,
    ) -> MillMetrics {
        MillMetrics {
            availability_pct: availability,
            mtbf_hours: mtbf,
            mttr_hours: mttr,
            total_downtime_hours: downtime,
            minor_count: events,
            major_count: 0,
            total_events: events,
            avg_downtime_duration_min: 0.0,
            feed_efficiency_pct: availability,
            current_ore_rate: 150.0,
            is_running: true,
        }
    }

    fn fleet() -> FleetAverages {
        FleetAverages {
            availability_pct: 90.0,
            mtbf_hours: 20.0,
            mttr_hours: 2.0,
            total_downtime_hours: 16.0,
            total_events: 8.0,
        }
    }

    fn status(rows: &[ComparisonRow], metric: ComparisonMetric) -> ComparisonStatus {
        rows.iter().find(|r| r.metric == metric).unwrap().status
    }

    #[test]
    fn test_strong_mill_is_above_average() {
        let rows = compare(&metrics(97.0, 40.0, 1.0, 5.0, 3), &fleet());

        assert_eq!(rows.len(), 5);
        assert!(rows.iter().all(|r| r.status == ComparisonStatus::Better));
        assert_eq!(verdict(&rows), Verdict::AboveAverage);
    }

    #[test]
    fn test_weak_mill_is_below_average() {
        let rows = compare(&metrics(70.0, 10.0, 4.0, 40.0, 20), &fleet());
        assert!(rows.iter().all(|r| r.status == ComparisonStatus::Worse));
        assert_eq!(verdict(&rows), Verdict::BelowAverage);
    }

    #[test]
    fn test_lower_is_better_metrics() {
        let rows = compare(&metrics(90.0, 20.0, 1.0, 16.0, 8), &fleet());
        assert_eq!(status(&rows, ComparisonMetric::Mttr), ComparisonStatus::Better);
        assert_eq!(status(&rows, ComparisonMetric::Availability), ComparisonStatus::Neutral);

        let row = rows.iter().find(|r| r.metric == ComparisonMetric::Mttr).unwrap();
        assert_eq!(row.diff, -1.0);
        assert_eq!(row.percent_diff, -50.0);
    }

    #[test]
    fn test_small_differences_are_neutral() {
        let rows = compare(&metrics(92.0, 20.5, 2.05, 16.5, 8), &fleet());
        assert!(rows.iter().all(|r| r.status == ComparisonStatus::Neutral));
        assert_eq!(verdict(&rows), Verdict::AroundAverage);
    }

    #[test]
    fn test_zero_average_uses_sign() {
        let zero_fleet = FleetAverages::default();
        let rows = compare(&metrics(0.0, 0.0, 3.0, 0.0, 0), &zero_fleet);

        let mttr = rows.iter().find(|r| r.metric == ComparisonMetric::Mttr).unwrap();
        assert_eq!(mttr.percent_diff, 100.0);
        assert_eq!(mttr.status, ComparisonStatus::Worse);

        let events = rows.iter().find(|r| r.metric == ComparisonMetric::TotalEvents).unwrap();
        assert_eq!(events.percent_diff, 0.0);
        assert_eq!(events.status, ComparisonStatus::Neutral);
    }

    #[test]
    fn test_verdict_margin() {
        // One better, none worse: within the margin.
        let rows = compare(&metrics(90.0, 30.0, 2.0, 16.0, 8), &fleet());
        assert_eq!(verdict(&rows), Verdict::AroundAverage);

        // Two better, none worse: above.
        let rows = compare(&metrics(90.0, 30.0, 1.0, 16.0, 8), &fleet());
        assert_eq!(verdict(&rows), Verdict::AboveAverage);
    }
}
