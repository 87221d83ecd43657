// SPDX-FileCopyrightText: 2026 Voxroute Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Single background writer for analytics persistence.
//!
//! The aggregator enqueues writes without awaiting them, so the decision
//! path never blocks on storage. One task drains the queue in order, which
//! keeps the store's view consistent with the in-memory log. Failures are
//! logged and dropped; in-memory state stays authoritative.

use std::sync::Arc;

use chrono::NaiveDate;
use tokio::sync::{mpsc, oneshot};
use tracing::{debug, warn, Instrument};
use voxroute_core::{AnalyticsStore, DailyStats, ProcessingEvent};

enum WriteOp {
    Event {
        event: Box<ProcessingEvent>,
        keep: usize,
    },
    Daily {
        stats: DailyStats,
        prune_before: NaiveDate,
    },
    Clear,
    Flush(oneshot::Sender<()>),
}

/// Handle to the background writer task.
#[derive(Clone)]
pub struct PersistenceWriter {
    tx: mpsc::UnboundedSender<WriteOp>,
    store_name: String,
}

impl PersistenceWriter {
    /// Spawn the writer on the current tokio runtime, inside the caller's span.
    pub fn spawn(store: Arc<dyn AnalyticsStore>) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        let store_name = store.name().to_string();
        tokio::spawn(run(store, rx).in_current_span());
        Self { tx, store_name }
    }

    pub fn store_name(&self) -> &str {
        &self.store_name
    }

    /// Append an event, then trim the store to the newest `keep` events.
    pub fn append_event(&self, event: ProcessingEvent, keep: usize) {
        self.submit(WriteOp::Event {
            event: Box::new(event),
            keep,
        });
    }

    /// Save a day's roll-up and drop roll-ups dated before `prune_before`.
    pub fn save_daily(&self, stats: DailyStats, prune_before: NaiveDate) {
        self.submit(WriteOp::Daily {
            stats,
            prune_before,
        });
    }

    pub fn clear(&self) {
        self.submit(WriteOp::Clear);
    }

    /// Wait until every write queued before this call has been attempted.
    pub async fn flush(&self) {
        let (done, wait) = oneshot::channel();
        self.submit(WriteOp::Flush(done));
        let _ = wait.await;
    }

    fn submit(&self, op: WriteOp) {
        if self.tx.send(op).is_err() {
            warn!(store = %self.store_name, "analytics writer stopped, dropping write");
        }
    }
}

async fn run(store: Arc<dyn AnalyticsStore>, mut rx: mpsc::UnboundedReceiver<WriteOp>) {
    debug!(store = store.name(), "analytics writer started");
    while let Some(op) = rx.recv().await {
        match op {
            WriteOp::Event { event, keep } => {
                if let Err(e) = store.append_event(&event).await {
                    warn!(store = store.name(), error = %e, "failed to persist analytics event");
                    continue;
                }
                if let Err(e) = store.prune_events(keep).await {
                    warn!(store = store.name(), error = %e, "failed to prune analytics events");
                }
            }
            WriteOp::Daily {
                stats,
                prune_before,
            } => {
                if let Err(e) = store.upsert_daily_stats(&stats).await {
                    warn!(store = store.name(), date = %stats.date, error = %e, "failed to persist daily stats");
                }
                if let Err(e) = store.prune_daily_stats(prune_before).await {
                    warn!(store = store.name(), error = %e, "failed to prune daily stats");
                }
            }
            WriteOp::Clear => {
                if let Err(e) = store.clear().await {
                    warn!(store = store.name(), error = %e, "failed to clear analytics store");
                }
            }
            WriteOp::Flush(done) => {
                let _ = done.send(());
            }
        }
    }
    debug!(store = store.name(), "analytics writer stopped");
}
