// SPDX-FileCopyrightText: 2026 Voxroute Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Trait seams between the decision engine and its collaborators.

pub mod sampler;
pub mod store;

pub use sampler::ResourceSampler;
pub use store::AnalyticsStore;
