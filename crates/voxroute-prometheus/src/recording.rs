// SPDX-FileCopyrightText: 2026 Voxroute Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Metric registration and recording helpers.
//!
//! Uses the metrics-rs facade so any recorder (Prometheus, statsd, etc.)
//! can collect these metrics.

use metrics::{describe_counter, describe_gauge, describe_histogram};
use voxroute_core::{ProcessingDecision, ProcessingEvent};

/// Register all voxroute metric descriptions.
///
/// Called once at startup after the recorder is installed.
pub fn register_metrics() {
    describe_counter!(
        "voxroute_decisions_total",
        "Processing decisions made, by recommended location"
    );
    describe_histogram!(
        "voxroute_decision_seconds",
        "Time spent computing a processing decision in seconds"
    );
    describe_histogram!(
        "voxroute_decision_confidence",
        "Confidence of processing decisions"
    );
    describe_counter!(
        "voxroute_outcomes_total",
        "Recorded processing outcomes, by location and success"
    );
    describe_gauge!(
        "voxroute_cost_usd_total",
        "Cumulative processing cost in USD"
    );
}

/// Record a decision returned by the engine.
pub fn record_decision(decision: &ProcessingDecision) {
    metrics::counter!(
        "voxroute_decisions_total",
        "location" => decision.recommended_location.to_string()
    )
    .increment(1);
    metrics::histogram!("voxroute_decision_seconds").record(decision.decision_time_seconds);
    metrics::histogram!("voxroute_decision_confidence").record(decision.confidence);
}

/// Record a completed processing event.
pub fn record_outcome(event: &ProcessingEvent) {
    metrics::counter!(
        "voxroute_outcomes_total",
        "location" => event.location().to_string(),
        "success" => if event.success { "true" } else { "false" }
    )
    .increment(1);
    // Cost is fractional, so it accumulates in a gauge rather than a u64 counter.
    metrics::gauge!("voxroute_cost_usd_total").increment(event.cost);
}
