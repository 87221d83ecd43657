// SPDX-FileCopyrightText: 2026 Voxroute Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Bounded event log, daily roll-ups, and report generation.
//!
//! The aggregator owns the in-memory event log, which is authoritative for
//! the session. Appends and pruning happen under one mutex; reports are
//! computed from a cloned snapshot so the lock is never held during
//! aggregation. When a store is attached, every change is queued to the
//! background writer.

use std::collections::{BTreeMap, VecDeque};
use std::sync::{Arc, Mutex, MutexGuard};

use chrono::{DateTime, Duration, NaiveDate, Utc};
use tracing::{debug, info, warn};
use voxroute_config::model::AnalyticsConfig;
use voxroute_core::{
    AnalyticsStore, DailyStats, ProcessingDecision, ProcessingEvent, ProcessingOutcome,
    VoxrouteError,
};

use crate::export::AnalyticsExport;
use crate::report::{AnalyticsReport, ReportSettings};
use crate::store::SqliteAnalyticsStore;
use crate::writer::PersistenceWriter;

#[derive(Debug, Default)]
struct AnalyticsState {
    events: VecDeque<ProcessingEvent>,
    daily: BTreeMap<NaiveDate, DailyStats>,
}

/// Turns recorded outcomes into point-in-time aggregates.
pub struct AnalyticsAggregator {
    config: AnalyticsConfig,
    settings: ReportSettings,
    state: Mutex<AnalyticsState>,
    writer: Option<PersistenceWriter>,
}

impl AnalyticsAggregator {
    /// Aggregator with no persistence.
    pub fn in_memory(config: AnalyticsConfig) -> Self {
        Self {
            settings: ReportSettings::from(&config),
            config,
            state: Mutex::new(AnalyticsState::default()),
            writer: None,
        }
    }

    /// Reload retained events and roll-ups from `store`, then persist
    /// further changes to it.
    ///
    /// Load failures are logged and the aggregator starts empty. Must be
    /// called from within a tokio runtime.
    pub async fn with_store(config: AnalyticsConfig, store: Arc<dyn AnalyticsStore>) -> Self {
        let aggregator = Self::in_memory(config);
        let cutoff = aggregator.retention_cutoff(Utc::now().date_naive());

        match store.load_events(aggregator.config.max_events).await {
            Ok(events) => {
                let count = events.len();
                aggregator.lock().events = events.into();
                debug!(store = store.name(), count, "loaded analytics events");
            }
            Err(e) => {
                warn!(store = store.name(), error = %e, "failed to load analytics events, starting empty");
            }
        }

        match store.load_daily_stats().await {
            Ok(days) => {
                aggregator.lock().daily = days
                    .into_iter()
                    .filter(|d| d.date >= cutoff)
                    .map(|d| (d.date, d))
                    .collect();
            }
            Err(e) => {
                warn!(store = store.name(), error = %e, "failed to load daily stats, starting empty");
            }
        }

        Self {
            writer: Some(PersistenceWriter::spawn(store)),
            ..aggregator
        }
    }

    /// Build from configuration: SQLite-backed when `persist` is set.
    ///
    /// If the database cannot be opened the aggregator runs in memory only.
    pub async fn from_config(config: AnalyticsConfig) -> Self {
        if !config.persist {
            return Self::in_memory(config);
        }
        match SqliteAnalyticsStore::open(&config.database_path).await {
            Ok(store) => {
                info!(path = %config.database_path, "analytics persistence enabled");
                Self::with_store(config, Arc::new(store)).await
            }
            Err(e) => {
                warn!(
                    path = %config.database_path,
                    error = %e,
                    "cannot open analytics database, continuing without persistence"
                );
                Self::in_memory(config)
            }
        }
    }

    pub fn config(&self) -> &AnalyticsConfig {
        &self.config
    }

    pub fn is_persistent(&self) -> bool {
        self.writer.is_some()
    }

    /// Join a decision with its outcome and record it.
    pub fn record_outcome(
        &self,
        decision: &ProcessingDecision,
        outcome: ProcessingOutcome,
    ) -> ProcessingEvent {
        let event = ProcessingEvent::new(decision.clone(), outcome);
        self.record(event.clone());
        event
    }

    /// Append an event, evicting the oldest beyond `max_events`, and fold
    /// it into its day's roll-up.
    pub fn record(&self, event: ProcessingEvent) {
        let max_events = self.config.max_events.max(1);
        let cutoff = self.retention_cutoff(Utc::now().date_naive());

        let mut state = self.lock();
        state.events.push_back(event.clone());
        let mut evicted = 0usize;
        while state.events.len() > max_events {
            state.events.pop_front();
            evicted += 1;
        }
        if evicted > 0 {
            debug!(evicted, "evicted oldest analytics events");
        }

        let date = event.date();
        let day = state
            .daily
            .entry(date)
            .or_insert_with(|| DailyStats::new(date));
        day.record(&event);
        let day = day.clone();
        state.daily.retain(|d, _| *d >= cutoff);

        // Queued under the lock so the store sees writes in log order.
        if let Some(writer) = &self.writer {
            writer.append_event(event, max_events);
            writer.save_daily(day, cutoff);
        }
    }

    /// Copy of the event log, oldest first.
    pub fn events(&self) -> Vec<ProcessingEvent> {
        self.lock().events.iter().cloned().collect()
    }

    /// Retained daily roll-ups, oldest first.
    pub fn daily_stats(&self) -> Vec<DailyStats> {
        self.lock().daily.values().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.lock().events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn report(&self) -> AnalyticsReport {
        self.report_at(Utc::now())
    }

    pub fn report_at(&self, now: DateTime<Utc>) -> AnalyticsReport {
        let events = self.events();
        AnalyticsReport::compute(&events, &self.settings, now)
    }

    /// Snapshot of the log, roll-ups, and report taken under one lock.
    pub fn export(&self) -> AnalyticsExport {
        let (events, daily) = {
            let state = self.lock();
            (
                state.events.iter().cloned().collect::<Vec<_>>(),
                state.daily.values().cloned().collect::<Vec<_>>(),
            )
        };
        let now = Utc::now();
        let report = AnalyticsReport::compute(&events, &self.settings, now);
        AnalyticsExport::new(events, daily, report, now)
    }

    pub fn export_json(&self) -> Result<Vec<u8>, VoxrouteError> {
        self.export().to_json_bytes()
    }

    /// Drop every event and roll-up, in memory and in the store.
    pub fn clear(&self) {
        let mut state = self.lock();
        state.events.clear();
        state.daily.clear();
        if let Some(writer) = &self.writer {
            writer.clear();
        }
        info!("analytics data cleared");
    }

    /// Wait for queued persistence writes to be attempted.
    pub async fn flush(&self) {
        if let Some(writer) = &self.writer {
            writer.flush().await;
        }
    }

    fn retention_cutoff(&self, today: NaiveDate) -> NaiveDate {
        today
            .checked_sub_signed(Duration::days(i64::from(self.config.retention_days)))
            .unwrap_or(NaiveDate::MIN)
    }

    fn lock(&self) -> MutexGuard<'_, AnalyticsState> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }
}
