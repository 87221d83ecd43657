// SPDX-FileCopyrightText: 2026 Voxroute Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The service boundary: decide, record, report, export, clear.

use std::sync::Arc;

use tracing::{debug, info};
use voxroute_analytics::{AnalyticsAggregator, AnalyticsReport};
use voxroute_config::model::VoxrouteConfig;
use voxroute_core::{
    ProcessingDecision, ProcessingEvent, ProcessingOutcome, ResourceSampler,
    UserProcessingPreferences, VoxrouteError,
};
use voxroute_router::DecisionEngine;

/// Decision engine and analytics behind one explicitly owned handle.
///
/// Safe to share across threads behind an `Arc`; every method takes
/// `&self`.
pub struct ProcessingService {
    engine: DecisionEngine,
    analytics: AnalyticsAggregator,
    defaults: UserProcessingPreferences,
    metrics_enabled: bool,
}

impl ProcessingService {
    /// Assemble a service from already constructed parts.
    pub fn new(
        engine: DecisionEngine,
        analytics: AnalyticsAggregator,
        config: &VoxrouteConfig,
    ) -> Self {
        info!(
            history_capacity = engine.capacity(),
            persistent = analytics.is_persistent(),
            metrics = config.metrics.enabled,
            "processing service initialized"
        );
        Self {
            engine,
            analytics,
            defaults: config.preferences.to_preferences(),
            metrics_enabled: config.metrics.enabled,
        }
    }

    /// Build the engine and analytics described by `config`.
    ///
    /// Opens the analytics database when persistence is enabled. A database
    /// that cannot be opened degrades to in-memory analytics.
    pub async fn from_config(config: &VoxrouteConfig, sampler: Arc<dyn ResourceSampler>) -> Self {
        let engine = DecisionEngine::new(sampler, &config.engine);
        let analytics = AnalyticsAggregator::from_config(config.analytics.clone()).await;
        Self::new(engine, analytics, config)
    }

    /// Decide where `text` should be processed. Never fails.
    pub fn make_decision(
        &self,
        text: &str,
        audio: Option<&[u8]>,
        preferences: &UserProcessingPreferences,
    ) -> ProcessingDecision {
        let decision = self.engine.make_decision(text, audio, preferences);
        self.observe_decision(&decision);
        decision
    }

    /// [`make_decision`](Self::make_decision) with the configured default
    /// preferences.
    pub fn decide(&self, text: &str, audio: Option<&[u8]>) -> ProcessingDecision {
        self.make_decision(text, audio, &self.defaults)
    }

    /// Complete the analytics event for `decision` once inference has run.
    ///
    /// Persistence happens in the background and its failures are only
    /// logged.
    pub fn record_outcome(
        &self,
        decision: &ProcessingDecision,
        success: bool,
        cost: f64,
        privacy_score: f64,
        error: Option<&str>,
    ) -> ProcessingEvent {
        let outcome = ProcessingOutcome {
            success,
            cost,
            privacy_score,
            error_type: error.map(str::to_string),
        };
        let event = self.analytics.record_outcome(decision, outcome);
        debug!(
            decision_id = %event.decision.id,
            location = %event.location(),
            success = event.success,
            cost = event.cost,
            "processing outcome recorded"
        );
        self.observe_outcome(&event);
        event
    }

    pub fn analytics_report(&self) -> AnalyticsReport {
        self.analytics.report()
    }

    /// Serialized JSON snapshot of the event log, roll-ups, and report.
    pub fn export_analytics_data(&self) -> Result<Vec<u8>, VoxrouteError> {
        self.analytics.export_json()
    }

    /// Drop decision history, events, and persisted stats.
    pub fn clear_analytics_data(&self) {
        self.engine.clear_history();
        self.analytics.clear();
    }

    /// Wait for queued analytics writes to reach the store.
    pub async fn flush(&self) {
        self.analytics.flush().await;
    }

    pub fn engine(&self) -> &DecisionEngine {
        &self.engine
    }

    pub fn analytics(&self) -> &AnalyticsAggregator {
        &self.analytics
    }

    pub fn default_preferences(&self) -> &UserProcessingPreferences {
        &self.defaults
    }

    pub fn metrics_enabled(&self) -> bool {
        self.metrics_enabled
    }

    #[cfg(feature = "prometheus")]
    fn observe_decision(&self, decision: &ProcessingDecision) {
        if self.metrics_enabled {
            voxroute_prometheus::record_decision(decision);
        }
    }

    #[cfg(not(feature = "prometheus"))]
    fn observe_decision(&self, _decision: &ProcessingDecision) {}

    #[cfg(feature = "prometheus")]
    fn observe_outcome(&self, event: &ProcessingEvent) {
        if self.metrics_enabled {
            voxroute_prometheus::record_outcome(event);
        }
    }

    #[cfg(not(feature = "prometheus"))]
    fn observe_outcome(&self, _event: &ProcessingEvent) {}
}
