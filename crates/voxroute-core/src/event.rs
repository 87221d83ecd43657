// SPDX-FileCopyrightText: 2026 Voxroute Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Analytics events: a decision joined with its post-execution outcome.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::types::{clamp_unit, ProcessingDecision, ProcessingLocation};

/// What the executing caller observed after running inference.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProcessingOutcome {
    pub success: bool,
    /// Cost of the request in USD.
    pub cost: f64,
    /// Privacy score in `[0, 1]`; clamped on construction of the event.
    pub privacy_score: f64,
    pub error_type: Option<String>,
}

impl ProcessingOutcome {
    /// A successful outcome with the given cost and privacy score.
    pub fn success(cost: f64, privacy_score: f64) -> Self {
        Self {
            success: true,
            cost,
            privacy_score,
            error_type: None,
        }
    }

    /// A failed outcome tagged with an error type.
    pub fn failure(cost: f64, privacy_score: f64, error_type: impl Into<String>) -> Self {
        Self {
            success: false,
            cost,
            privacy_score,
            error_type: Some(error_type.into()),
        }
    }
}

/// A completed analytics event. Appended to the log, never edited.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProcessingEvent {
    #[serde(flatten)]
    pub decision: ProcessingDecision,
    pub success: bool,
    pub cost: f64,
    pub privacy_score: f64,
    pub error_type: Option<String>,
}

impl ProcessingEvent {
    /// Join a decision with its outcome.
    ///
    /// Negative or non-finite costs are recorded as zero.
    pub fn new(decision: ProcessingDecision, outcome: ProcessingOutcome) -> Self {
        let cost = if outcome.cost.is_finite() && outcome.cost > 0.0 {
            outcome.cost
        } else {
            0.0
        };
        Self {
            decision,
            success: outcome.success,
            cost,
            privacy_score: clamp_unit(outcome.privacy_score),
            error_type: outcome.error_type,
        }
    }

    pub fn location(&self) -> ProcessingLocation {
        self.decision.recommended_location
    }

    /// UTC calendar day the decision was made on.
    pub fn date(&self) -> NaiveDate {
        self.decision.timestamp.date_naive()
    }
}

/// Per-day roll-up kept beyond the bounded event log.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyStats {
    pub date: NaiveDate,
    pub total: u64,
    pub on_device: u64,
    pub server: u64,
    pub hybrid: u64,
    pub fallback: u64,
    pub successes: u64,
    pub total_cost: f64,
    pub confidence_sum: f64,
    pub decision_time_sum: f64,
}

impl DailyStats {
    pub fn new(date: NaiveDate) -> Self {
        Self {
            date,
            total: 0,
            on_device: 0,
            server: 0,
            hybrid: 0,
            fallback: 0,
            successes: 0,
            total_cost: 0.0,
            confidence_sum: 0.0,
            decision_time_sum: 0.0,
        }
    }

    /// Fold one event into the roll-up.
    pub fn record(&mut self, event: &ProcessingEvent) {
        self.total += 1;
        match event.location() {
            ProcessingLocation::OnDevice => self.on_device += 1,
            ProcessingLocation::Server => self.server += 1,
            ProcessingLocation::Hybrid => self.hybrid += 1,
            ProcessingLocation::Fallback => self.fallback += 1,
        }
        if event.success {
            self.successes += 1;
        }
        self.total_cost += event.cost;
        self.confidence_sum += event.decision.confidence;
        self.decision_time_sum += event.decision.decision_time_seconds;
    }

    pub fn average_confidence(&self) -> f64 {
        if self.total == 0 {
            0.0
        } else {
            self.confidence_sum / self.total as f64
        }
    }

    pub fn success_rate(&self) -> f64 {
        if self.total == 0 {
            0.0
        } else {
            self.successes as f64 / self.total as f64
        }
    }
}
