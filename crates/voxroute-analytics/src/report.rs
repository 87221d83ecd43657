// SPDX-FileCopyrightText: 2026 Voxroute Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Point-in-time aggregates over the processing event log.
//!
//! Every view is a pure recomputation over a slice of events; nothing here
//! keeps incremental state.

use std::collections::{BTreeMap, HashMap};

use chrono::{DateTime, Datelike, Duration, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use strum::Display;
use voxroute_config::model::AnalyticsConfig;
use voxroute_core::{NetworkQuality, ProcessingEvent, ProcessingLocation};

/// Length of the weekly trend window in days, including today.
pub const WEEKLY_WINDOW_DAYS: i64 = 7;

/// Knobs for report computation, taken from [`AnalyticsConfig`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ReportSettings {
    pub server_cost_per_request_usd: f64,
    pub top_reasons: usize,
    pub recent_window: usize,
}

impl From<&AnalyticsConfig> for ReportSettings {
    fn from(config: &AnalyticsConfig) -> Self {
        Self {
            server_cost_per_request_usd: config.server_cost_per_request_usd,
            top_reasons: config.top_reasons,
            recent_window: config.recent_window,
        }
    }
}

impl Default for ReportSettings {
    fn default() -> Self {
        Self::from(&AnalyticsConfig::default())
    }
}

/// Location breakdown and averages over a set of events.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PeriodStats {
    pub total_decisions: u64,
    pub on_device_count: u64,
    pub server_count: u64,
    pub hybrid_count: u64,
    pub fallback_count: u64,
    pub on_device_ratio: f64,
    pub server_ratio: f64,
    pub hybrid_ratio: f64,
    pub fallback_ratio: f64,
    pub average_confidence: f64,
    /// Mean decision time in seconds.
    pub average_processing_time: f64,
    pub success_rate: f64,
}

impl PeriodStats {
    pub fn from_events<'a, I>(events: I) -> Self
    where
        I: IntoIterator<Item = &'a ProcessingEvent>,
    {
        let mut stats = Self::default();
        let mut confidence = 0.0;
        let mut time = 0.0;
        let mut successes = 0u64;

        for event in events {
            stats.total_decisions += 1;
            match event.location() {
                ProcessingLocation::OnDevice => stats.on_device_count += 1,
                ProcessingLocation::Server => stats.server_count += 1,
                ProcessingLocation::Hybrid => stats.hybrid_count += 1,
                ProcessingLocation::Fallback => stats.fallback_count += 1,
            }
            confidence += event.decision.confidence;
            time += event.decision.decision_time_seconds;
            if event.success {
                successes += 1;
            }
        }

        if stats.total_decisions > 0 {
            let total = stats.total_decisions as f64;
            stats.on_device_ratio = stats.on_device_count as f64 / total;
            stats.server_ratio = stats.server_count as f64 / total;
            stats.hybrid_ratio = stats.hybrid_count as f64 / total;
            stats.fallback_ratio = stats.fallback_count as f64 / total;
            stats.average_confidence = confidence / total;
            stats.average_processing_time = time / total;
            stats.success_rate = successes as f64 / total;
        }
        stats
    }
}

/// Rolling seven-day view with a per-day breakdown.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WeeklyTrends {
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub summary: PeriodStats,
    /// Only days with at least one event appear.
    pub daily: BTreeMap<NaiveDate, PeriodStats>,
}

/// Month-to-date cost compared with routing everything to the server.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CostSavings {
    /// `YYYY-MM`.
    pub month: String,
    pub event_count: u64,
    pub actual_cost: f64,
    pub estimated_server_only_cost: f64,
    /// Never negative.
    pub savings: f64,
    /// Savings as a percentage of the server-only estimate.
    pub savings_percentage: f64,
    pub cost_by_location: BTreeMap<ProcessingLocation, f64>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReasonCount {
    pub reason: String,
    pub count: u64,
}

/// Averages for one segment of events.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SegmentPerformance {
    pub count: u64,
    pub average_processing_time: f64,
    pub average_confidence: f64,
    pub success_rate: f64,
}

impl SegmentPerformance {
    fn from_events<'a, I>(events: I) -> Self
    where
        I: IntoIterator<Item = &'a ProcessingEvent>,
    {
        let stats = PeriodStats::from_events(events);
        Self {
            count: stats.total_decisions,
            average_processing_time: stats.average_processing_time,
            average_confidence: stats.average_confidence,
            success_rate: stats.success_rate,
        }
    }
}

/// Battery level band at decision time.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Display, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum BatterySegment {
    Low,
    Medium,
    High,
}

impl BatterySegment {
    pub const ALL: [BatterySegment; 3] =
        [BatterySegment::Low, BatterySegment::Medium, BatterySegment::High];

    /// Low below 0.3, medium below 0.7, high otherwise.
    pub fn for_level(level: f64) -> Self {
        if level < 0.3 {
            BatterySegment::Low
        } else if level < 0.7 {
            BatterySegment::Medium
        } else {
            BatterySegment::High
        }
    }
}

/// Full aggregate snapshot for display or export.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalyticsReport {
    pub generated_at: DateTime<Utc>,
    pub total_events: u64,
    pub current_stats: PeriodStats,
    pub weekly_trends: WeeklyTrends,
    pub cost_savings: CostSavings,
    pub top_reasons: Vec<ReasonCount>,
    pub network_performance: BTreeMap<NetworkQuality, SegmentPerformance>,
    pub battery_performance: BTreeMap<BatterySegment, SegmentPerformance>,
    pub average_privacy_score: f64,
    pub location_performance: BTreeMap<ProcessingLocation, SegmentPerformance>,
}

impl AnalyticsReport {
    /// Compute every view over `events` (oldest first) as of `now`.
    pub fn compute(events: &[ProcessingEvent], settings: &ReportSettings, now: DateTime<Utc>) -> Self {
        let today = now.date_naive();

        Self {
            generated_at: now,
            total_events: events.len() as u64,
            current_stats: current_stats(events, today),
            weekly_trends: weekly_trends(events, today),
            cost_savings: cost_savings(events, today, settings.server_cost_per_request_usd),
            top_reasons: top_reasons(events, settings.recent_window, settings.top_reasons),
            network_performance: network_performance(events),
            battery_performance: battery_performance(events),
            average_privacy_score: average_privacy_score(events),
            location_performance: location_performance(events),
        }
    }
}

/// Stats over events dated `today`.
pub fn current_stats(events: &[ProcessingEvent], today: NaiveDate) -> PeriodStats {
    PeriodStats::from_events(events.iter().filter(|e| e.date() == today))
}

/// Stats over the seven days ending `today`, plus a per-day map.
pub fn weekly_trends(events: &[ProcessingEvent], today: NaiveDate) -> WeeklyTrends {
    let start_date = today - Duration::days(WEEKLY_WINDOW_DAYS - 1);
    let in_window: Vec<&ProcessingEvent> = events
        .iter()
        .filter(|e| {
            let date = e.date();
            date >= start_date && date <= today
        })
        .collect();

    let mut by_day: BTreeMap<NaiveDate, Vec<&ProcessingEvent>> = BTreeMap::new();
    for event in in_window.iter().copied() {
        by_day.entry(event.date()).or_default().push(event);
    }

    WeeklyTrends {
        start_date,
        end_date: today,
        summary: PeriodStats::from_events(in_window.iter().copied()),
        daily: by_day
            .into_iter()
            .map(|(day, events)| (day, PeriodStats::from_events(events)))
            .collect(),
    }
}

/// Month-to-date savings against an all-server estimate.
pub fn cost_savings(
    events: &[ProcessingEvent],
    today: NaiveDate,
    server_cost_per_request_usd: f64,
) -> CostSavings {
    let in_month = events.iter().filter(|e| {
        let date = e.date();
        date.year() == today.year() && date.month() == today.month()
    });

    let mut cost_by_location: BTreeMap<ProcessingLocation, f64> = ProcessingLocation::ALL
        .iter()
        .map(|l| (*l, 0.0))
        .collect();
    let mut event_count = 0u64;
    let mut actual_cost = 0.0;
    for event in in_month {
        event_count += 1;
        actual_cost += event.cost;
        *cost_by_location.entry(event.location()).or_default() += event.cost;
    }

    let estimated = event_count as f64 * server_cost_per_request_usd;
    let savings = (estimated - actual_cost).max(0.0);
    let savings_percentage = if estimated > 0.0 {
        savings / estimated * 100.0
    } else {
        0.0
    };

    CostSavings {
        month: today.format("%Y-%m").to_string(),
        event_count,
        actual_cost,
        estimated_server_only_cost: estimated,
        savings,
        savings_percentage,
        cost_by_location,
    }
}

/// Most frequent reasoning strings across the newest `window` events.
///
/// Ties are broken alphabetically so the order is stable.
pub fn top_reasons(events: &[ProcessingEvent], window: usize, limit: usize) -> Vec<ReasonCount> {
    let skip = events.len().saturating_sub(window);
    let mut counts: HashMap<&str, u64> = HashMap::new();
    for event in &events[skip..] {
        for reason in &event.decision.reasoning {
            *counts.entry(reason.as_str()).or_default() += 1;
        }
    }

    let mut ranked: Vec<ReasonCount> = counts
        .into_iter()
        .map(|(reason, count)| ReasonCount {
            reason: reason.to_string(),
            count,
        })
        .collect();
    ranked.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.reason.cmp(&b.reason)));
    ranked.truncate(limit);
    ranked
}

/// Performance per network quality; only qualities that occurred appear.
pub fn network_performance(
    events: &[ProcessingEvent],
) -> BTreeMap<NetworkQuality, SegmentPerformance> {
    NetworkQuality::ALL
        .iter()
        .filter_map(|quality| {
            let segment: Vec<&ProcessingEvent> = events
                .iter()
                .filter(|e| e.decision.network_conditions.quality == *quality)
                .collect();
            (!segment.is_empty()).then(|| (*quality, SegmentPerformance::from_events(segment)))
        })
        .collect()
}

/// Performance per battery band; every band appears, empty ones zeroed.
pub fn battery_performance(
    events: &[ProcessingEvent],
) -> BTreeMap<BatterySegment, SegmentPerformance> {
    BatterySegment::ALL
        .iter()
        .map(|band| {
            let segment = events.iter().filter(|e| {
                BatterySegment::for_level(e.decision.resource_constraints.battery_level) == *band
            });
            (*band, SegmentPerformance::from_events(segment))
        })
        .collect()
}

pub fn average_privacy_score(events: &[ProcessingEvent]) -> f64 {
    if events.is_empty() {
        return 0.0;
    }
    events.iter().map(|e| e.privacy_score).sum::<f64>() / events.len() as f64
}

/// Performance for the on-device, server, and hybrid locations.
pub fn location_performance(
    events: &[ProcessingEvent],
) -> BTreeMap<ProcessingLocation, SegmentPerformance> {
    [
        ProcessingLocation::OnDevice,
        ProcessingLocation::Server,
        ProcessingLocation::Hybrid,
    ]
    .iter()
    .map(|location| {
        let segment = events.iter().filter(|e| e.location() == *location);
        (*location, SegmentPerformance::from_events(segment))
    })
    .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use voxroute_core::{
        NetworkConditions, ProcessingDecision, ProcessingOutcome, ResourceConstraints,
    };

    fn event_at(
        location: ProcessingLocation,
        at: DateTime<Utc>,
        cost: f64,
        success: bool,
    ) -> ProcessingEvent {
        let mut decision = ProcessingDecision::on_device_fallback();
        decision.recommended_location = location;
        decision.timestamp = at;
        decision.confidence = 0.8;
        decision.decision_time_seconds = 0.002;
        let outcome = if success {
            ProcessingOutcome::success(cost, 0.5)
        } else {
            ProcessingOutcome::failure(cost, 0.5, "timeout")
        };
        ProcessingEvent::new(decision, outcome)
    }

    fn noon(y: i32, m: u32, d: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, 12, 0, 0).unwrap()
    }

    #[test]
    fn period_stats_empty_is_zeroed() {
        let stats = PeriodStats::from_events(std::iter::empty::<&ProcessingEvent>());
        assert_eq!(stats, PeriodStats::default());
    }

    #[test]
    fn current_stats_only_counts_today() {
        let now = noon(2026, 3, 10);
        let events = vec![
            event_at(ProcessingLocation::OnDevice, now, 0.0, true),
            event_at(ProcessingLocation::Server, now, 0.002, false),
            event_at(ProcessingLocation::Server, noon(2026, 3, 9), 0.002, true),
        ];
        let stats = current_stats(&events, now.date_naive());
        assert_eq!(stats.total_decisions, 2);
        assert_eq!(stats.on_device_ratio, 0.5);
        assert_eq!(stats.server_ratio, 0.5);
        assert_eq!(stats.success_rate, 0.5);
        assert!((stats.average_confidence - 0.8).abs() < 1e-12);
    }

    #[test]
    fn weekly_ratios_sum_to_one_without_fallback() {
        let now = noon(2026, 3, 10);
        let mut events = Vec::new();
        for day in 0..7 {
            let at = now - Duration::days(day);
            events.push(event_at(ProcessingLocation::OnDevice, at, 0.0, true));
            events.push(event_at(ProcessingLocation::Server, at, 0.002, true));
            if day % 2 == 0 {
                events.push(event_at(ProcessingLocation::Hybrid, at, 0.001, true));
            }
        }
        // Outside the window
        events.push(event_at(ProcessingLocation::Fallback, now - Duration::days(7), 0.0, false));

        let trends = weekly_trends(&events, now.date_naive());
        let s = &trends.summary;
        assert_eq!(s.total_decisions, 18);
        assert_eq!(s.fallback_count, 0);
        assert!((s.on_device_ratio + s.server_ratio + s.hybrid_ratio - 1.0).abs() < 1e-9);
        assert_eq!(trends.daily.len(), 7);
        assert_eq!(trends.start_date, NaiveDate::from_ymd_opt(2026, 3, 4).unwrap());
        assert_eq!(trends.daily[&now.date_naive()].total_decisions, 3);
    }

    #[test]
    fn cost_savings_month_to_date() {
        let now = noon(2026, 3, 10);
        let events = vec![
            event_at(ProcessingLocation::OnDevice, now, 0.0, true),
            event_at(ProcessingLocation::OnDevice, noon(2026, 3, 1), 0.0, true),
            event_at(ProcessingLocation::Server, now, 0.002, true),
            event_at(ProcessingLocation::Server, noon(2026, 2, 28), 0.5, true),
        ];
        let savings = cost_savings(&events, now.date_naive(), 0.002);
        assert_eq!(savings.month, "2026-03");
        assert_eq!(savings.event_count, 3);
        assert!((savings.estimated_server_only_cost - 0.006).abs() < 1e-12);
        assert!((savings.savings - 0.004).abs() < 1e-12);
        assert!((savings.savings_percentage - 66.666_666).abs() < 1e-3);
        assert_eq!(savings.cost_by_location[&ProcessingLocation::Server], 0.002);
        assert_eq!(savings.cost_by_location[&ProcessingLocation::Hybrid], 0.0);
    }

    #[test]
    fn cost_savings_never_negative() {
        let now = noon(2026, 3, 10);
        let events = vec![event_at(ProcessingLocation::Server, now, 1.0, true)];
        let savings = cost_savings(&events, now.date_naive(), 0.002);
        assert_eq!(savings.savings, 0.0);
        assert_eq!(savings.savings_percentage, 0.0);

        let none = cost_savings(&[], now.date_naive(), 0.002);
        assert_eq!(none.savings, 0.0);
        assert_eq!(none.savings_percentage, 0.0);
    }

    #[test]
    fn top_reasons_uses_recent_window() {
        let now = noon(2026, 3, 10);
        let mut old = event_at(ProcessingLocation::Server, now, 0.0, true);
        old.decision.reasoning = vec!["Stale reason".into(), "Stale reason 2".into()];
        let mut a = event_at(ProcessingLocation::OnDevice, now, 0.0, true);
        a.decision.reasoning = vec!["On-device processing selected".into(), "Simple".into()];
        let mut b = a.clone();
        b.decision.reasoning = vec!["On-device processing selected".into(), "Private".into()];

        let events = vec![old, a, b];
        let top = top_reasons(&events, 2, 2);
        assert_eq!(
            top,
            vec![
                ReasonCount {
                    reason: "On-device processing selected".into(),
                    count: 2
                },
                ReasonCount {
                    reason: "Private".into(),
                    count: 1
                },
            ]
        );
    }

    #[test]
    fn segments_by_network_and_battery() {
        let now = noon(2026, 3, 10);
        let mut low = event_at(ProcessingLocation::Server, now, 0.0, true);
        low.decision.resource_constraints = ResourceConstraints {
            battery_level: 0.1,
            ..ResourceConstraints::default()
        };
        low.decision.network_conditions = NetworkConditions::for_quality(NetworkQuality::Good, false);
        let mut high = event_at(ProcessingLocation::OnDevice, now, 0.0, false);
        high.decision.resource_constraints.battery_level = 0.95;

        let events = vec![low, high];
        let network = network_performance(&events);
        assert_eq!(network.len(), 2);
        assert_eq!(network[&NetworkQuality::Good].count, 1);
        assert_eq!(network[&NetworkQuality::Unavailable].success_rate, 0.0);

        let battery = battery_performance(&events);
        assert_eq!(battery[&BatterySegment::Low].count, 1);
        assert_eq!(battery[&BatterySegment::Medium].count, 0);
        assert_eq!(battery[&BatterySegment::High].count, 1);
        assert_eq!(BatterySegment::for_level(0.3), BatterySegment::Medium);
        assert_eq!(BatterySegment::for_level(0.7), BatterySegment::High);
    }

    #[test]
    fn location_performance_covers_three_locations() {
        let now = noon(2026, 3, 10);
        let events = vec![
            event_at(ProcessingLocation::Hybrid, now, 0.001, true),
            event_at(ProcessingLocation::Fallback, now, 0.0, false),
        ];
        let perf = location_performance(&events);
        assert_eq!(perf.len(), 3);
        assert_eq!(perf[&ProcessingLocation::Hybrid].count, 1);
        assert_eq!(perf[&ProcessingLocation::Hybrid].success_rate, 1.0);
        assert_eq!(perf[&ProcessingLocation::OnDevice].count, 0);
        assert!(!perf.contains_key(&ProcessingLocation::Fallback));
    }

    #[test]
    fn report_survives_json() {
        let now = noon(2026, 3, 10);
        let events = vec![
            event_at(ProcessingLocation::OnDevice, now, 0.0, true),
            event_at(ProcessingLocation::Server, now, 0.002, true),
        ];
        let report = AnalyticsReport::compute(&events, &ReportSettings::default(), now);
        let json = serde_json::to_string(&report).unwrap();
        let back: AnalyticsReport = serde_json::from_str(&json).unwrap();
        assert_eq!(back, report);
        assert_eq!(report.average_privacy_score, 0.5);
    }
}
