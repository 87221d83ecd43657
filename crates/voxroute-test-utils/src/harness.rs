// SPDX-FileCopyrightText: 2026 Voxroute Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Test harness for end-to-end integration testing.
//!
//! `TestHarness` owns a temp directory holding the analytics database, a
//! configuration pointing at it, and a [`FixedSampler`]. Engines and
//! aggregators are built from it on demand, so a test can open the same
//! database twice to check that state survives a restart.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use voxroute_analytics::AnalyticsAggregator;
use voxroute_config::model::VoxrouteConfig;
use voxroute_core::{ResourceSnapshot, VoxrouteError};
use voxroute_router::DecisionEngine;

use crate::sampler::FixedSampler;

/// Builder for creating test environments with configurable options.
pub struct TestHarnessBuilder {
    snapshot: Option<ResourceSnapshot>,
    max_events: Option<usize>,
    history_capacity: Option<usize>,
    retention_days: Option<u32>,
    persist: bool,
    metrics: bool,
}

impl TestHarnessBuilder {
    fn new() -> Self {
        Self {
            snapshot: None,
            max_events: None,
            history_capacity: None,
            retention_days: None,
            persist: true,
            metrics: false,
        }
    }

    /// Resource snapshot the sampler starts with.
    pub fn with_snapshot(mut self, snapshot: ResourceSnapshot) -> Self {
        self.snapshot = Some(snapshot);
        self
    }

    pub fn with_max_events(mut self, max_events: usize) -> Self {
        self.max_events = Some(max_events);
        self
    }

    pub fn with_history_capacity(mut self, capacity: usize) -> Self {
        self.history_capacity = Some(capacity);
        self
    }

    pub fn with_retention_days(mut self, days: u32) -> Self {
        self.retention_days = Some(days);
        self
    }

    /// Keep analytics in memory only.
    pub fn without_persistence(mut self) -> Self {
        self.persist = false;
        self
    }

    pub fn with_metrics(mut self) -> Self {
        self.metrics = true;
        self
    }

    /// Create the temp directory and the configuration pointing into it.
    pub fn build(self) -> Result<TestHarness, VoxrouteError> {
        let temp_dir =
            tempfile::TempDir::new().map_err(|e| VoxrouteError::Storage { source: e.into() })?;
        let database_path = temp_dir.path().join("analytics.db");

        let mut config = VoxrouteConfig::default();
        config.analytics.persist = self.persist;
        config.analytics.database_path = database_path.to_string_lossy().into_owned();
        if let Some(max_events) = self.max_events {
            config.analytics.max_events = max_events;
        }
        if let Some(days) = self.retention_days {
            config.analytics.retention_days = days;
        }
        if let Some(capacity) = self.history_capacity {
            config.engine.history_capacity = capacity;
        }
        config.metrics.enabled = self.metrics;

        let sampler = Arc::new(
            self.snapshot
                .map(FixedSampler::new)
                .unwrap_or_default(),
        );

        Ok(TestHarness {
            config,
            sampler,
            database_path,
            _temp_dir: temp_dir,
        })
    }
}

/// A configured voxroute environment backed by a throwaway database.
pub struct TestHarness {
    config: VoxrouteConfig,
    sampler: Arc<FixedSampler>,
    database_path: PathBuf,
    // Held so the directory outlives every store opened from it.
    _temp_dir: tempfile::TempDir,
}

impl TestHarness {
    pub fn builder() -> TestHarnessBuilder {
        TestHarnessBuilder::new()
    }

    pub fn config(&self) -> &VoxrouteConfig {
        &self.config
    }

    /// Shared sampler; call [`FixedSampler::set`] to change conditions.
    pub fn sampler(&self) -> Arc<FixedSampler> {
        Arc::clone(&self.sampler)
    }

    pub fn database_path(&self) -> &Path {
        &self.database_path
    }

    /// A fresh engine reading from the harness sampler.
    pub fn engine(&self) -> DecisionEngine {
        DecisionEngine::new(self.sampler(), &self.config.engine)
    }

    /// A fresh aggregator over the harness database. Reopening reloads
    /// whatever earlier aggregators flushed.
    pub async fn analytics(&self) -> AnalyticsAggregator {
        AnalyticsAggregator::from_config(self.config.analytics.clone()).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use voxroute_core::ProcessingLocation;

    use crate::fixtures::EventBuilder;

    #[tokio::test]
    async fn harness_database_survives_reopen() {
        let harness = TestHarness::builder().with_max_events(10).build().unwrap();
        assert!(!harness.database_path().exists());

        let first = harness.analytics().await;
        assert!(first.is_persistent());
        first.record(EventBuilder::new(ProcessingLocation::Server).cost(0.002).build());
        first.flush().await;
        assert!(harness.database_path().exists());

        let second = harness.analytics().await;
        assert_eq!(second.events(), first.events());
    }

    #[test]
    fn builder_applies_overrides() {
        let harness = TestHarness::builder()
            .with_history_capacity(5)
            .with_retention_days(7)
            .without_persistence()
            .build()
            .unwrap();
        assert_eq!(harness.engine().capacity(), 5);
        assert_eq!(harness.config().analytics.retention_days, 7);
        assert!(!harness.config().analytics.persist);
    }
}
