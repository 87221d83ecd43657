// SPDX-FileCopyrightText: 2026 Voxroute Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Builders for analytics events with controlled fields.

use chrono::{DateTime, Utc};
use voxroute_core::{
    NetworkConditions, NetworkQuality, ProcessingDecision, ProcessingEvent, ProcessingLocation,
    ProcessingOutcome,
};

/// Builds a [`ProcessingEvent`] without running the decision pipeline.
///
/// Defaults: successful, zero cost, privacy score 1.0, confidence 0.8,
/// timestamped now on an excellent network at full battery.
#[derive(Debug, Clone)]
pub struct EventBuilder {
    decision: ProcessingDecision,
    outcome: ProcessingOutcome,
}

impl EventBuilder {
    pub fn new(location: ProcessingLocation) -> Self {
        let mut decision = ProcessingDecision::on_device_fallback();
        decision.recommended_location = location;
        decision.reasoning = vec![format!("{} processing selected", location.label())];
        decision.network_conditions = NetworkConditions::for_quality(NetworkQuality::Excellent, false);
        decision.resource_constraints.network_quality = NetworkQuality::Excellent;
        Self {
            decision,
            outcome: ProcessingOutcome::success(0.0, 1.0),
        }
    }

    pub fn confidence(mut self, confidence: f64) -> Self {
        self.decision.confidence = confidence;
        self
    }

    pub fn cost(mut self, cost: f64) -> Self {
        self.outcome.cost = cost;
        self
    }

    pub fn privacy_score(mut self, score: f64) -> Self {
        self.outcome.privacy_score = score;
        self
    }

    pub fn failed(mut self, error_type: &str) -> Self {
        self.outcome.success = false;
        self.outcome.error_type = Some(error_type.to_string());
        self
    }

    pub fn at(mut self, timestamp: DateTime<Utc>) -> Self {
        self.decision.timestamp = timestamp;
        self
    }

    pub fn decision_time(mut self, seconds: f64) -> Self {
        self.decision.decision_time_seconds = seconds;
        self
    }

    /// Replace the reasoning with a single line.
    pub fn reason(mut self, reason: &str) -> Self {
        self.decision.reasoning = vec![reason.to_string()];
        self
    }

    pub fn network(mut self, quality: NetworkQuality) -> Self {
        self.decision.network_conditions =
            NetworkConditions::for_quality(quality, self.decision.network_conditions.is_metered);
        self.decision.resource_constraints.network_quality = quality;
        self
    }

    pub fn battery(mut self, level: f64) -> Self {
        self.decision.resource_constraints.battery_level = level;
        self
    }

    pub fn build(self) -> ProcessingEvent {
        ProcessingEvent::new(self.decision, self.outcome)
    }
}
