// Fleet-wide roll-ups, histograms and the per-mill comparison table
use crate::domain::downtime::{DowntimeCategory, DowntimeEvent, DowntimeReason};
use crate::domain::metrics::{
    AggregateMetrics, DowntimeByDay, DowntimeByReason, FleetAverages, MillComparisonData, round2,
};
use crate::domain::report::{FleetAggregation, MillReport};
use chrono::{DateTime, Duration, NaiveDate, Utc};
use std::collections::BTreeMap;

pub fn aggregate(
    reports: &[MillReport],
    day_count: u32,
    now: DateTime<Utc>,
    reason_catalog: &[DowntimeReason],
) -> FleetAggregation {
    FleetAggregation {
        aggregate: aggregate_metrics(reports),
        fleet_averages: fleet_averages(reports),
        by_day: downtime_by_day(reports, day_count, now),
        by_reason: downtime_by_reason(reports, reason_catalog),
        comparison: comparison_table(reports),
    }
}

fn mean(values: impl Iterator<Item = f64>, count: usize) -> f64 {
    if count == 0 {
        0.0
    } else {
        values.sum::<f64>() / count as f64
    }
}

pub fn aggregate_metrics(reports: &[MillReport]) -> AggregateMetrics {
    let n = reports.len();

    // Downtime hours come from raw event durations, not the rounded per-mill totals.
    let mut totals = Tally::default();
    for event in reports.iter().flat_map(|r| &r.events) {
        totals.add(event);
    }

    AggregateMetrics {
        mill_count: n,
        mills_running: reports.iter().filter(|r| r.metrics.is_running).count(),
        avg_availability_pct: round2(mean(reports.iter().map(|r| r.metrics.availability_pct), n)),
        avg_mtbf_hours: round2(mean(reports.iter().map(|r| r.metrics.mtbf_hours), n)),
        avg_mttr_hours: round2(mean(reports.iter().map(|r| r.metrics.mttr_hours), n)),
        total_downtime_hours: round2(
            (totals.minor_minutes + totals.major_minutes) as f64 / 60.0,
        ),
        total_events: reports.iter().map(|r| r.metrics.total_events).sum(),
        minor_count: reports.iter().map(|r| r.metrics.minor_count).sum(),
        major_count: reports.iter().map(|r| r.metrics.major_count).sum(),
        minor_downtime_hours: round2(totals.minor_minutes as f64 / 60.0),
        major_downtime_hours: round2(totals.major_minutes as f64 / 60.0),
    }
}

pub fn fleet_averages(reports: &[MillReport]) -> FleetAverages {
    let n = reports.len();
    FleetAverages {
        availability_pct: mean(reports.iter().map(|r| r.metrics.availability_pct), n),
        mtbf_hours: mean(reports.iter().map(|r| r.metrics.mtbf_hours), n),
        mttr_hours: mean(reports.iter().map(|r| r.metrics.mttr_hours), n),
        total_downtime_hours: mean(reports.iter().map(|r| r.metrics.total_downtime_hours), n),
        total_events: mean(reports.iter().map(|r| r.metrics.total_events as f64), n),
    }
}

#[derive(Default)]
struct Tally {
    minor_count: usize,
    major_count: usize,
    minor_minutes: i64,
    major_minutes: i64,
}

impl Tally {
    fn add(&mut self, event: &DowntimeEvent) {
        match event.category {
            DowntimeCategory::Minor => {
                self.minor_count += 1;
                self.minor_minutes += event.duration_minutes;
            }
            DowntimeCategory::Major => {
                self.major_count += 1;
                self.major_minutes += event.duration_minutes;
            }
        }
    }
}

/// One bucket per UTC calendar day from `now - day_count` through `now`,
/// inclusive. An event counts wholly toward the day it started on.
pub fn downtime_by_day(
    reports: &[MillReport],
    day_count: u32,
    now: DateTime<Utc>,
) -> Vec<DowntimeByDay> {
    let last_day = now.date_naive();
    let first_day = (now - Duration::days(i64::from(day_count))).date_naive();

    let mut buckets: BTreeMap<NaiveDate, Tally> = first_day
        .iter_days()
        .take_while(|d| *d <= last_day)
        .map(|d| (d, Tally::default()))
        .collect();

    for event in reports.iter().flat_map(|r| &r.events) {
        let day = event.start_time.date_naive();
        match buckets.get_mut(&day) {
            Some(bucket) => bucket.add(event),
            None => {
                tracing::debug!("Event {} starts outside the day histogram ({})", event.id, day)
            }
        }
    }

    buckets
        .into_iter()
        .map(|(date, b)| DowntimeByDay {
            date,
            minor_count: b.minor_count,
            major_count: b.major_count,
            minor_hours: round2(b.minor_minutes as f64 / 60.0),
            major_hours: round2(b.major_minutes as f64 / 60.0),
        })
        .collect()
}

/// Reasons with at least one event, most frequent first. Ties keep catalog order.
pub fn downtime_by_reason(
    reports: &[MillReport],
    reason_catalog: &[DowntimeReason],
) -> Vec<DowntimeByReason> {
    let mut rows: Vec<(DowntimeReason, Tally)> = reason_catalog
        .iter()
        .map(|reason| (*reason, Tally::default()))
        .collect();

    for event in reports.iter().flat_map(|r| &r.events) {
        let idx = match rows.iter().position(|(reason, _)| *reason == event.reason) {
            Some(idx) => idx,
            None => {
                rows.push((event.reason, Tally::default()));
                rows.len() - 1
            }
        };
        rows[idx].1.add(event);
    }

    let mut result: Vec<DowntimeByReason> = rows
        .into_iter()
        .map(|(reason, b)| DowntimeByReason {
            reason,
            minor_count: b.minor_count,
            major_count: b.major_count,
            total: b.minor_count + b.major_count,
            hours: round2((b.minor_minutes + b.major_minutes) as f64 / 60.0),
        })
        .filter(|row| row.total > 0)
        .collect();
    result.sort_by(|a, b| b.total.cmp(&a.total));
    result
}

pub fn comparison_table(reports: &[MillReport]) -> Vec<MillComparisonData> {
    reports
        .iter()
        .map(|r| MillComparisonData {
            mill_id: r.mill.id.clone(),
            display_name: r.mill.display_name.clone(),
            section: r.mill.section.clone(),
            availability_pct: r.metrics.availability_pct,
            mtbf_hours: r.metrics.mtbf_hours,
            mttr_hours: r.metrics.mttr_hours,
            total_downtime_hours: r.metrics.total_downtime_hours,
            total_events: r.metrics.total_events,
            minor_count: r.metrics.minor_count,
            major_count: r.metrics.major_count,
            feed_efficiency_pct: r.metrics.feed_efficiency_pct,
            current_ore_rate: r.metrics.current_ore_rate,
            is_running: r.metrics.is_running,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::metrics_aggregator;
    use crate::domain::mill::MillInfo;
    use crate::domain::reading::LiveSnapshot;
    use chrono::TimeZone;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 10, 12, 0, 0).unwrap()
    }

    fn event(
        mill_id: &str,
        days_ago: i64,
        minutes: i64,
        category: DowntimeCategory,
        reason: DowntimeReason,
    ) -> DowntimeEvent {
        let start = now() - Duration::days(days_ago);
        DowntimeEvent {
            id: format!("{}-{}", mill_id, start.timestamp_millis()),
            mill_id: mill_id.to_string(),
            start_time: start,
            end_time: start + Duration::minutes(minutes),
            duration_minutes: minutes,
            category,
            reason,
            feed_rate_before: 150.0,
            feed_rate_during_min: 0.0,
            notes: None,
        }
    }

    fn report(mill_id: &str, events: Vec<DowntimeEvent>, rate: f64) -> MillReport {
        let live = LiveSnapshot::from_rate(Some(rate), 10.0);
        let metrics = metrics_aggregator::compute(&events, 7 * 1440, 160.0, &live);
        MillReport {
            mill: MillInfo::new(mill_id.to_string(), None, "North".to_string(), 160.0),
            events,
            metrics,
        }
    }

    fn fleet() -> Vec<MillReport> {
        vec![
            report(
                "mill_01",
                vec![
                    event("mill_01", 1, 20, DowntimeCategory::Minor, DowntimeReason::Mechanical),
                    event(
                        "mill_01",
                        3,
                        120,
                        DowntimeCategory::Major,
                        DowntimeReason::ScheduledMaintenance,
                    ),
                ],
                150.0,
            ),
            report(
                "mill_02",
                vec![
                    event("mill_02", 1, 10, DowntimeCategory::Minor, DowntimeReason::Mechanical),
                    event("mill_02", 2, 7, DowntimeCategory::Minor, DowntimeReason::Electrical),
                ],
                0.0,
            ),
            report("mill_03", vec![], 140.0),
        ]
    }

    #[test]
    fn test_aggregate_metrics_sums_and_means() {
        let reports = fleet();
        let agg = aggregate_metrics(&reports);

        assert_eq!(agg.mill_count, 3);
        assert_eq!(agg.mills_running, 2);
        assert_eq!(agg.total_events, 4);
        assert_eq!(agg.minor_count, 3);
        assert_eq!(agg.major_count, 1);
        assert_eq!(agg.minor_downtime_hours, round2(37.0 / 60.0));
        assert_eq!(agg.major_downtime_hours, 2.0);

        let expected_avail = reports.iter().map(|r| r.metrics.availability_pct).sum::<f64>() / 3.0;
        assert_eq!(agg.avg_availability_pct, round2(expected_avail));
    }

    #[test]
    fn test_downtime_hours_sum_raw_minutes() {
        // Three 7-minute minors: per mill 0.12h rounded, 0.35h in total.
        let reports: Vec<MillReport> = ["mill_01", "mill_02", "mill_03"]
            .iter()
            .map(|id| {
                let ev = event(id, 1, 7, DowntimeCategory::Minor, DowntimeReason::Electrical);
                report(id, vec![ev], 150.0)
            })
            .collect();
        let agg = aggregate_metrics(&reports);

        assert_eq!(reports[0].metrics.total_downtime_hours, 0.12);
        assert_eq!(agg.minor_downtime_hours, 0.35);
        assert_eq!(agg.total_downtime_hours, 0.35);
        assert_eq!(
            agg.total_downtime_hours,
            round2(agg.minor_downtime_hours + agg.major_downtime_hours)
        );
    }

    #[test]
    fn test_empty_fleet() {
        let agg = aggregate_metrics(&[]);
        assert_eq!(agg.mill_count, 0);
        assert_eq!(agg.avg_availability_pct, 0.0);
        assert_eq!(fleet_averages(&[]), FleetAverages::default());
    }

    #[test]
    fn test_day_histogram_is_prefilled() {
        let by_day = downtime_by_day(&[], 7, now());
        assert_eq!(by_day.len(), 8);
        assert_eq!(by_day[0].date, NaiveDate::from_ymd_opt(2024, 3, 3).unwrap());
        assert_eq!(by_day[7].date, NaiveDate::from_ymd_opt(2024, 3, 10).unwrap());
        assert!(by_day.iter().all(|d| d.minor_count == 0 && d.major_count == 0));
    }

    #[test]
    fn test_day_histogram_buckets_by_start_day() {
        let by_day = downtime_by_day(&fleet(), 7, now());
        let day = |d: u32| {
            by_day
                .iter()
                .find(|b| b.date == NaiveDate::from_ymd_opt(2024, 3, d).unwrap())
                .unwrap()
        };

        assert_eq!(day(9).minor_count, 2);
        assert_eq!(day(9).minor_hours, 0.5);
        assert_eq!(day(8).minor_count, 1);
        assert_eq!(day(7).major_count, 1);
        assert_eq!(day(7).major_hours, 2.0);
    }

    #[test]
    fn test_event_spanning_midnight_stays_on_start_day() {
        let start = Utc.with_ymd_and_hms(2024, 3, 8, 23, 0, 0).unwrap();
        let mut ev = event(
            "mill_01",
            0,
            180,
            DowntimeCategory::Major,
            DowntimeReason::ScheduledMaintenance,
        );
        ev.start_time = start;
        ev.end_time = start + Duration::minutes(180);
        let by_day = downtime_by_day(&[report("mill_01", vec![ev], 150.0)], 7, now());

        let march8 = by_day.iter().find(|b| b.date.to_string() == "2024-03-08").unwrap();
        let march9 = by_day.iter().find(|b| b.date.to_string() == "2024-03-09").unwrap();
        assert_eq!(march8.major_hours, 3.0);
        assert_eq!(march9.major_hours, 0.0);
    }

    #[test]
    fn test_reason_histogram_filters_and_sorts() {
        let by_reason = downtime_by_reason(&fleet(), &DowntimeReason::CATALOG);

        assert_eq!(by_reason.len(), 3);
        assert_eq!(by_reason[0].reason, DowntimeReason::Mechanical);
        assert_eq!(by_reason[0].total, 2);
        assert_eq!(by_reason[0].hours, 0.5);
        assert!(by_reason.iter().all(|r| r.total > 0));
        assert!(!by_reason.iter().any(|r| r.reason == DowntimeReason::Technological));
    }

    #[test]
    fn test_comparison_table_one_row_per_mill() {
        let reports = fleet();
        let table = comparison_table(&reports);

        assert_eq!(table.len(), reports.len());
        for (row, report) in table.iter().zip(&reports) {
            assert_eq!(row.mill_id, report.mill.id);
            assert_eq!(row.availability_pct, report.metrics.availability_pct);
        }
    }

    #[test]
    fn test_fleet_averages() {
        let averages = fleet_averages(&fleet());
        assert!((averages.total_events - 4.0 / 3.0).abs() < 1e-9);
    }
}
