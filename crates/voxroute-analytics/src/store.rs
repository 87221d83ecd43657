// SPDX-FileCopyrightText: 2026 Voxroute Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! SQLite implementation of the AnalyticsStore trait.
//!
//! Events are stored whole as JSON so every field survives a reload; the
//! indexed columns beside the payload exist for ad-hoc inspection.

use async_trait::async_trait;
use chrono::NaiveDate;
use tracing::debug;
use voxroute_core::{AnalyticsStore, DailyStats, ProcessingEvent, VoxrouteError};

use crate::database::{map_tr_err, Database};

const DATE_FORMAT: &str = "%Y-%m-%d";

/// SQLite-backed analytics store.
pub struct SqliteAnalyticsStore {
    db: Database,
}

impl SqliteAnalyticsStore {
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    /// Open the store at `path`, creating the file and schema if needed.
    pub async fn open(path: &str) -> Result<Self, VoxrouteError> {
        Ok(Self::new(Database::open(path).await?))
    }

    pub async fn open_in_memory() -> Result<Self, VoxrouteError> {
        Ok(Self::new(Database::open_in_memory().await?))
    }

    /// Number of persisted events.
    pub async fn event_count(&self) -> Result<usize, VoxrouteError> {
        self.db
            .connection()
            .call(|conn| -> Result<i64, rusqlite::Error> {
                conn.query_row("SELECT COUNT(*) FROM processing_events", [], |row| {
                    row.get(0)
                })
            })
            .await
            .map_err(map_tr_err)
            .map(|n| usize::try_from(n).unwrap_or(0))
    }

    pub async fn close(&self) -> Result<(), VoxrouteError> {
        self.db.checkpoint().await
    }
}

fn parse_date(raw: &str) -> Result<NaiveDate, VoxrouteError> {
    NaiveDate::parse_from_str(raw, DATE_FORMAT).map_err(|e| VoxrouteError::Storage {
        source: Box::new(e),
    })
}

fn to_i64(value: u64) -> i64 {
    i64::try_from(value).unwrap_or(i64::MAX)
}

fn to_u64(value: i64) -> u64 {
    u64::try_from(value).unwrap_or(0)
}

#[async_trait]
impl AnalyticsStore for SqliteAnalyticsStore {
    fn name(&self) -> &str {
        "sqlite"
    }

    async fn append_event(&self, event: &ProcessingEvent) -> Result<(), VoxrouteError> {
        let payload = serde_json::to_string(event)?;
        let decision_id = event.decision.id.clone();
        let location = event.location().to_string();
        let success = event.success;
        let cost = event.cost;
        let created_at = event.decision.timestamp.to_rfc3339();

        self.db
            .connection()
            .call(move |conn| -> Result<(), rusqlite::Error> {
                conn.execute(
                    "INSERT INTO processing_events (decision_id, location, success, cost_usd, \
                     created_at, payload) VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
                    rusqlite::params![decision_id, location, success, cost, created_at, payload],
                )?;
                Ok(())
            })
            .await
            .map_err(map_tr_err)
    }

    async fn prune_events(&self, keep: usize) -> Result<(), VoxrouteError> {
        let keep = i64::try_from(keep).unwrap_or(i64::MAX);
        let removed = self
            .db
            .connection()
            .call(move |conn| -> Result<usize, rusqlite::Error> {
                conn.execute(
                    "DELETE FROM processing_events WHERE seq NOT IN \
                     (SELECT seq FROM processing_events ORDER BY seq DESC LIMIT ?1)",
                    rusqlite::params![keep],
                )
            })
            .await
            .map_err(map_tr_err)?;
        if removed > 0 {
            debug!(removed, "pruned persisted analytics events");
        }
        Ok(())
    }

    async fn upsert_daily_stats(&self, stats: &DailyStats) -> Result<(), VoxrouteError> {
        let stats = stats.clone();
        self.db
            .connection()
            .call(move |conn| -> Result<(), rusqlite::Error> {
                conn.execute(
                    "INSERT INTO daily_stats (date, total, on_device, server, hybrid, fallback, \
                     successes, total_cost, confidence_sum, decision_time_sum) \
                     VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10) \
                     ON CONFLICT(date) DO UPDATE SET total = excluded.total, \
                     on_device = excluded.on_device, server = excluded.server, \
                     hybrid = excluded.hybrid, fallback = excluded.fallback, \
                     successes = excluded.successes, total_cost = excluded.total_cost, \
                     confidence_sum = excluded.confidence_sum, \
                     decision_time_sum = excluded.decision_time_sum",
                    rusqlite::params![
                        stats.date.format(DATE_FORMAT).to_string(),
                        to_i64(stats.total),
                        to_i64(stats.on_device),
                        to_i64(stats.server),
                        to_i64(stats.hybrid),
                        to_i64(stats.fallback),
                        to_i64(stats.successes),
                        stats.total_cost,
                        stats.confidence_sum,
                        stats.decision_time_sum,
                    ],
                )?;
                Ok(())
            })
            .await
            .map_err(map_tr_err)
    }

    async fn prune_daily_stats(&self, before: NaiveDate) -> Result<(), VoxrouteError> {
        let cutoff = before.format(DATE_FORMAT).to_string();
        self.db
            .connection()
            .call(move |conn| -> Result<(), rusqlite::Error> {
                conn.execute(
                    "DELETE FROM daily_stats WHERE date < ?1",
                    rusqlite::params![cutoff],
                )?;
                Ok(())
            })
            .await
            .map_err(map_tr_err)
    }

    async fn load_events(&self, limit: usize) -> Result<Vec<ProcessingEvent>, VoxrouteError> {
        let limit = i64::try_from(limit).unwrap_or(i64::MAX);
        let payloads = self
            .db
            .connection()
            .call(move |conn| -> Result<Vec<String>, rusqlite::Error> {
                let mut stmt = conn.prepare(
                    "SELECT payload FROM (SELECT seq, payload FROM processing_events \
                     ORDER BY seq DESC LIMIT ?1) ORDER BY seq ASC",
                )?;
                let rows = stmt.query_map(rusqlite::params![limit], |row| row.get(0))?;
                rows.collect()
            })
            .await
            .map_err(map_tr_err)?;

        payloads
            .iter()
            .map(|p| serde_json::from_str(p).map_err(VoxrouteError::from))
            .collect()
    }

    async fn load_daily_stats(&self) -> Result<Vec<DailyStats>, VoxrouteError> {
        type Row = (String, i64, i64, i64, i64, i64, i64, f64, f64, f64);

        let rows = self
            .db
            .connection()
            .call(|conn| -> Result<Vec<Row>, rusqlite::Error> {
                let mut stmt = conn.prepare(
                    "SELECT date, total, on_device, server, hybrid, fallback, successes, \
                     total_cost, confidence_sum, decision_time_sum FROM daily_stats \
                     ORDER BY date ASC",
                )?;
                let rows = stmt.query_map([], |row| {
                    Ok((
                        row.get(0)?,
                        row.get(1)?,
                        row.get(2)?,
                        row.get(3)?,
                        row.get(4)?,
                        row.get(5)?,
                        row.get(6)?,
                        row.get(7)?,
                        row.get(8)?,
                        row.get(9)?,
                    ))
                })?;
                rows.collect()
            })
            .await
            .map_err(map_tr_err)?;

        rows.into_iter()
            .map(|r| {
                Ok(DailyStats {
                    date: parse_date(&r.0)?,
                    total: to_u64(r.1),
                    on_device: to_u64(r.2),
                    server: to_u64(r.3),
                    hybrid: to_u64(r.4),
                    fallback: to_u64(r.5),
                    successes: to_u64(r.6),
                    total_cost: r.7,
                    confidence_sum: r.8,
                    decision_time_sum: r.9,
                })
            })
            .collect()
    }

    async fn clear(&self) -> Result<(), VoxrouteError> {
        self.db
            .connection()
            .call(|conn| -> Result<(), rusqlite::Error> {
                conn.execute_batch(
                    "DELETE FROM processing_events; DELETE FROM daily_stats;",
                )?;
                Ok(())
            })
            .await
            .map_err(map_tr_err)?;
        debug!("analytics store cleared");
        Ok(())
    }
}
