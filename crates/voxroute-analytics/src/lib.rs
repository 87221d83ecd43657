// SPDX-FileCopyrightText: 2026 Voxroute Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Processing analytics for the voxroute decision engine.
//!
//! Holds a bounded log of completed [`ProcessingEvent`]s, derives reports
//! from it on demand, exports it as JSON, and optionally persists it to
//! SQLite through a single background writer so the decision path never
//! waits on disk.
//!
//! [`ProcessingEvent`]: voxroute_core::ProcessingEvent

pub mod aggregator;
pub mod database;
pub mod export;
pub mod report;
pub mod store;
pub mod writer;

pub use aggregator::AnalyticsAggregator;
pub use database::Database;
pub use export::{AnalyticsExport, DateRange};
pub use report::{
    AnalyticsReport, BatterySegment, CostSavings, PeriodStats, ReasonCount, ReportSettings,
    SegmentPerformance, WeeklyTrends,
};
pub use store::SqliteAnalyticsStore;
pub use writer::PersistenceWriter;
