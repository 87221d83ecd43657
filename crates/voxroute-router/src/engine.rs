// SPDX-FileCopyrightText: 2026 Voxroute Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The decision pipeline and its bounded history.
//!
//! Orchestration order per call: resource snapshot, complexity, privacy,
//! capability, network conditions, scoring, assembly, history append.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Instant;

use chrono::Utc;
use tracing::{debug, trace};
use voxroute_config::model::EngineConfig;
use voxroute_core::{
    NetworkConditions, ProcessingDecision, ResourceSampler, UserProcessingPreferences,
};

use crate::capability::CapabilityAssessor;
use crate::complexity::ComplexityAssessor;
use crate::privacy::PrivacyClassifier;
use crate::scorer::{DecisionScorer, ScoringInputs};

/// Default number of decisions retained in history.
pub const DEFAULT_HISTORY_CAPACITY: usize = 100;

/// Chooses a processing location for each query.
///
/// Never fails: malformed input degrades to a best-effort decision and
/// missing resource signals fall back to conservative defaults.
pub struct DecisionEngine {
    sampler: Arc<dyn ResourceSampler>,
    complexity: ComplexityAssessor,
    privacy: PrivacyClassifier,
    capability: CapabilityAssessor,
    scorer: DecisionScorer,
    capacity: usize,
    history: Mutex<VecDeque<ProcessingDecision>>,
}

impl DecisionEngine {
    pub fn new(sampler: Arc<dyn ResourceSampler>, config: &EngineConfig) -> Self {
        Self::with_capacity(sampler, config.history_capacity)
    }

    /// Build an engine keeping at most `capacity` decisions (minimum 1).
    pub fn with_capacity(sampler: Arc<dyn ResourceSampler>, capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            sampler,
            complexity: ComplexityAssessor::new(),
            privacy: PrivacyClassifier::new(),
            capability: CapabilityAssessor::new(),
            scorer: DecisionScorer::new(),
            capacity,
            history: Mutex::new(VecDeque::with_capacity(capacity)),
        }
    }

    /// Decide where to process one query.
    pub fn make_decision(
        &self,
        text: &str,
        audio: Option<&[u8]>,
        preferences: &UserProcessingPreferences,
    ) -> ProcessingDecision {
        let started = Instant::now();

        let snapshot = self.sampler.current_snapshot();
        let constraints = snapshot.constraints;
        let complexity = self.complexity.assess(text, audio.map(<[u8]>::len));
        let privacy_required = self.privacy.requires_privacy(text, preferences);
        let capability = self.capability.assess(text, complexity, &constraints);
        let network =
            NetworkConditions::for_quality(constraints.network_quality, snapshot.network.is_metered);

        let scored = self.scorer.score(&ScoringInputs {
            complexity,
            capability: capability.score,
            privacy_required,
            constraints: &constraints,
            network: &network,
            preferences,
        });

        let decision = ProcessingDecision {
            id: uuid::Uuid::new_v4().to_string(),
            recommended_location: scored.location,
            complexity_score: complexity,
            on_device_capability: capability.score,
            resource_constraints: constraints,
            privacy_required,
            network_conditions: network,
            confidence: scored.confidence,
            reasoning: scored.reasoning,
            matched_capabilities: capability.matched_names(),
            rule: scored.rule,
            decision_time_seconds: started.elapsed().as_secs_f64(),
            timestamp: Utc::now(),
        };

        debug!(
            decision_id = decision.id.as_str(),
            location = %decision.recommended_location,
            rule = %decision.rule,
            complexity = decision.complexity_score,
            capability = decision.on_device_capability,
            confidence = decision.confidence,
            privacy_required,
            "processing decision made"
        );

        self.push_history(decision.clone());
        decision
    }

    /// Immediate on-device decision for callers that cannot run the pipeline.
    pub fn on_device_fallback() -> ProcessingDecision {
        ProcessingDecision::on_device_fallback()
    }

    /// Immediate degraded-mode decision for callers that cannot run the pipeline.
    pub fn basic_fallback() -> ProcessingDecision {
        ProcessingDecision::basic_fallback()
    }

    /// All retained decisions, oldest first.
    pub fn history(&self) -> Vec<ProcessingDecision> {
        self.lock_history().iter().cloned().collect()
    }

    /// The newest `n` decisions, oldest first.
    pub fn recent(&self, n: usize) -> Vec<ProcessingDecision> {
        let history = self.lock_history();
        let skip = history.len().saturating_sub(n);
        history.iter().skip(skip).cloned().collect()
    }

    pub fn history_len(&self) -> usize {
        self.lock_history().len()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn clear_history(&self) {
        self.lock_history().clear();
    }

    fn push_history(&self, decision: ProcessingDecision) {
        let mut history = self.lock_history();
        history.push_back(decision);
        while history.len() > self.capacity {
            if let Some(evicted) = history.pop_front() {
                trace!(decision_id = evicted.id.as_str(), "evicted oldest decision");
            }
        }
    }

    // A panic while holding the lock cannot leave the deque half-updated,
    // so a poisoned guard is still usable.
    fn lock_history(&self) -> MutexGuard<'_, VecDeque<ProcessingDecision>> {
        self.history.lock().unwrap_or_else(|e| e.into_inner())
    }
}
