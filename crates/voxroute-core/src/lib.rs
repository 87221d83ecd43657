// SPDX-FileCopyrightText: 2026 Voxroute Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Core library for the voxroute processing decision engine.
//!
//! This crate holds the data model shared by every other crate: processing
//! locations, resource snapshots, decisions, analytics events, and the
//! trait seams ([`ResourceSampler`], [`AnalyticsStore`]) that let the host
//! platform and the persistence layer be swapped out in tests.

pub mod error;
pub mod event;
pub mod traits;
pub mod types;

// Re-export key items at crate root for ergonomic imports.
pub use error::VoxrouteError;
pub use event::{DailyStats, ProcessingEvent, ProcessingOutcome};
pub use traits::{AnalyticsStore, ResourceSampler};
pub use types::{
    clamp_unit, DecisionRule, NetworkConditions, NetworkQuality, PrivacyMode,
    ProcessingDecision, ProcessingLocation, ResourceConstraints, ResourceSnapshot, ThermalState,
    UserProcessingPreferences,
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn voxroute_error_has_all_variants() {
        let _config = VoxrouteError::Config("test".into());
        let _storage = VoxrouteError::Storage {
            source: Box::new(std::io::Error::other("test")),
        };
        let bad_json = serde_json::from_str::<ProcessingLocation>("42").unwrap_err();
        let serialization: VoxrouteError = bad_json.into();
        assert!(serialization.to_string().starts_with("serialization error"));
        let _internal = VoxrouteError::Internal("test".into());
    }

    #[test]
    fn all_trait_seams_are_exported() {
        fn _assert_sampler<T: ResourceSampler>() {}
        fn _assert_store<T: AnalyticsStore>() {}
    }
}
