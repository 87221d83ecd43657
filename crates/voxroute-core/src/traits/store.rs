// SPDX-FileCopyrightText: 2026 Voxroute Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Durable storage seam for analytics events and daily roll-ups.

use async_trait::async_trait;
use chrono::NaiveDate;

use crate::error::VoxrouteError;
use crate::event::{DailyStats, ProcessingEvent};

/// Persistence backend for the analytics event log.
///
/// Callers treat every method as best-effort: failures are logged by the
/// aggregator and never reach the decision path.
#[async_trait]
pub trait AnalyticsStore: Send + Sync + 'static {
    /// Human-readable backend name for logs and diagnostics.
    fn name(&self) -> &str;

    /// Append one event.
    async fn append_event(&self, event: &ProcessingEvent) -> Result<(), VoxrouteError>;

    /// Delete all but the newest `keep` events.
    async fn prune_events(&self, keep: usize) -> Result<(), VoxrouteError>;

    /// Insert or replace the roll-up for `stats.date`.
    async fn upsert_daily_stats(&self, stats: &DailyStats) -> Result<(), VoxrouteError>;

    /// Delete roll-ups dated strictly before `before`.
    async fn prune_daily_stats(&self, before: NaiveDate) -> Result<(), VoxrouteError>;

    /// Load the newest `limit` events, oldest first.
    async fn load_events(&self, limit: usize) -> Result<Vec<ProcessingEvent>, VoxrouteError>;

    /// Load all retained roll-ups, oldest first.
    async fn load_daily_stats(&self) -> Result<Vec<DailyStats>, VoxrouteError>;

    /// Remove every event and roll-up.
    async fn clear(&self) -> Result<(), VoxrouteError>;
}
