// SPDX-FileCopyrightText: 2026 Voxroute Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Test utilities for voxroute integration tests.
//!
//! Provides a fixed resource sampler, event builders, and a harness with a
//! throwaway SQLite database, so tests are deterministic and never depend
//! on the host's battery or network.
//!
//! # Components
//!
//! - [`FixedSampler`] - Resource sampler returning a settable snapshot
//! - [`SnapshotBuilder`] - Fluent construction of resource snapshots
//! - [`EventBuilder`] - Analytics events with chosen location, cost, and time
//! - [`TestHarness`] - Config, sampler, and temp database wired together

pub mod fixtures;
pub mod harness;
pub mod sampler;

pub use fixtures::EventBuilder;
pub use harness::{TestHarness, TestHarnessBuilder};
pub use sampler::{FixedSampler, SnapshotBuilder};
