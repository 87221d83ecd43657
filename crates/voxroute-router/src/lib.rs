// SPDX-FileCopyrightText: 2026 Voxroute Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Per-query processing location decisions for the voxroute assistant.
//!
//! This crate provides:
//! - [`ResourceMonitor`]: Cached battery, thermal, network, and memory signals
//! - [`ComplexityAssessor`], [`PrivacyClassifier`], [`CapabilityAssessor`]: Heuristic query assessment
//! - [`DecisionScorer`]: Ordered overrides followed by balanced scoring
//! - [`DecisionEngine`]: The full pipeline with a bounded decision history
//!
//! Every step is in-memory arithmetic over cached state. Nothing here
//! performs I/O on the decision path.

pub mod capability;
pub mod complexity;
pub mod engine;
pub mod privacy;
pub mod resources;
pub mod scorer;

pub use capability::{CapabilityAssessment, CapabilityAssessor, OnDeviceCapability};
pub use complexity::ComplexityAssessor;
pub use engine::{DecisionEngine, DEFAULT_HISTORY_CAPACITY};
pub use privacy::PrivacyClassifier;
pub use resources::{memory_pressure_from_bytes, InterfaceKind, NetworkPath, ResourceMonitor};
pub use scorer::{CandidateScores, DecisionScorer, ScoredDecision, ScoringInputs};
