// SPDX-FileCopyrightText: 2026 Voxroute Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Processing service for the voxroute decision engine.
//!
//! The [`ProcessingService`] is the single handle the host application
//! constructs at startup and passes to its consumers. It:
//! - Decides where each query runs
//! - Joins decisions with their outcomes into analytics events
//! - Serves reports and JSON exports
//! - Records metrics when the `prometheus` feature is enabled

pub mod service;

pub use service::ProcessingService;
