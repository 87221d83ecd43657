// SPDX-FileCopyrightText: 2026 Voxroute Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! User-facing JSON export of the event log and aggregates.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use voxroute_core::{DailyStats, ProcessingEvent, VoxrouteError};

use crate::report::AnalyticsReport;

/// Earliest and latest decision timestamps among exported events.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl DateRange {
    /// `None` when there are no events.
    pub fn covering(events: &[ProcessingEvent]) -> Option<Self> {
        let start = events.iter().map(|e| e.decision.timestamp).min()?;
        let end = events.iter().map(|e| e.decision.timestamp).max()?;
        Some(Self { start, end })
    }
}

/// Snapshot written by `export`. Every field of every event is preserved.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalyticsExport {
    pub exported_at: DateTime<Utc>,
    pub date_range: Option<DateRange>,
    pub total_events: u64,
    pub events: Vec<ProcessingEvent>,
    pub daily_stats: Vec<DailyStats>,
    pub report: AnalyticsReport,
}

impl AnalyticsExport {
    pub fn new(
        events: Vec<ProcessingEvent>,
        daily_stats: Vec<DailyStats>,
        report: AnalyticsReport,
        exported_at: DateTime<Utc>,
    ) -> Self {
        Self {
            exported_at,
            date_range: DateRange::covering(&events),
            total_events: events.len() as u64,
            events,
            daily_stats,
            report,
        }
    }

    /// Pretty-printed JSON bytes.
    pub fn to_json_bytes(&self) -> Result<Vec<u8>, VoxrouteError> {
        Ok(serde_json::to_vec_pretty(self)?)
    }

    pub fn from_json_bytes(bytes: &[u8]) -> Result<Self, VoxrouteError> {
        Ok(serde_json::from_slice(bytes)?)
    }
}
