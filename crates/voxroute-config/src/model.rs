// SPDX-FileCopyrightText: 2026 Voxroute Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration model structs for the voxroute decision engine.
//!
//! All structs use `#[serde(deny_unknown_fields)]` to reject unrecognized
//! config keys at startup, providing actionable error messages.

use serde::{Deserialize, Serialize};
use voxroute_core::{PrivacyMode, UserProcessingPreferences};

/// Top-level voxroute configuration.
///
/// Loaded from TOML files following XDG hierarchy, with environment variable overrides.
/// All sections are optional and default to sensible values.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct VoxrouteConfig {
    /// Decision engine settings.
    #[serde(default)]
    pub engine: EngineConfig,

    /// Default user processing preferences.
    #[serde(default)]
    pub preferences: PreferencesConfig,

    /// Analytics aggregation and persistence settings.
    #[serde(default)]
    pub analytics: AnalyticsConfig,

    /// Metrics recording settings.
    #[serde(default)]
    pub metrics: MetricsConfig,
}

/// Decision engine configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct EngineConfig {
    /// Maximum number of decisions kept in the history ring buffer.
    #[serde(default = "default_history_capacity")]
    pub history_capacity: usize,

    /// Logging level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            history_capacity: default_history_capacity(),
            log_level: default_log_level(),
        }
    }
}

fn default_history_capacity() -> usize {
    100
}

fn default_log_level() -> String {
    "info".to_string()
}

/// Default routing preferences, used when the caller supplies none.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct PreferencesConfig {
    #[serde(default = "default_true")]
    pub prefer_on_device: bool,

    /// One of `maximum`, `balanced`, `performance`.
    #[serde(default)]
    pub privacy_mode: PrivacyMode,

    #[serde(default = "default_true")]
    pub cost_optimization: bool,

    /// Offload to the server on low battery when the network allows it.
    #[serde(default = "default_true")]
    pub battery_optimization: bool,
}

impl Default for PreferencesConfig {
    fn default() -> Self {
        Self {
            prefer_on_device: true,
            privacy_mode: PrivacyMode::default(),
            cost_optimization: true,
            battery_optimization: true,
        }
    }
}

impl PreferencesConfig {
    /// Convert into the engine's preference value.
    pub fn to_preferences(&self) -> UserProcessingPreferences {
        UserProcessingPreferences {
            prefer_on_device: self.prefer_on_device,
            privacy_mode: self.privacy_mode,
            cost_optimization: self.cost_optimization,
            battery_optimization: self.battery_optimization,
        }
    }
}

fn default_true() -> bool {
    true
}

/// Analytics configuration.
///
/// Controls the bounded event log, the daily roll-up retention window, the
/// flat server cost used for savings estimates, and SQLite persistence.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct AnalyticsConfig {
    /// Persist events and daily stats to SQLite.
    #[serde(default = "default_true")]
    pub persist: bool,

    /// Path to the SQLite database file.
    #[serde(default = "default_database_path")]
    pub database_path: String,

    /// Maximum number of events kept in memory and on disk.
    #[serde(default = "default_max_events")]
    pub max_events: usize,

    /// Days of daily roll-ups to keep.
    #[serde(default = "default_retention_days")]
    pub retention_days: u32,

    /// Flat per-request cost used to estimate an all-server bill.
    #[serde(default = "default_server_cost_per_request_usd")]
    pub server_cost_per_request_usd: f64,

    /// Number of reasoning strings in the top-reasons view.
    #[serde(default = "default_top_reasons")]
    pub top_reasons: usize,

    /// Number of most recent events scanned for the top-reasons view.
    #[serde(default = "default_recent_window")]
    pub recent_window: usize,
}

impl Default for AnalyticsConfig {
    fn default() -> Self {
        Self {
            persist: true,
            database_path: default_database_path(),
            max_events: default_max_events(),
            retention_days: default_retention_days(),
            server_cost_per_request_usd: default_server_cost_per_request_usd(),
            top_reasons: default_top_reasons(),
            recent_window: default_recent_window(),
        }
    }
}

fn default_database_path() -> String {
    dirs::data_dir()
        .map(|p| p.join("voxroute").join("analytics.db"))
        .unwrap_or_else(|| std::path::PathBuf::from("analytics.db"))
        .to_string_lossy()
        .into_owned()
}

fn default_max_events() -> usize {
    1000
}

fn default_retention_days() -> u32 {
    30
}

fn default_server_cost_per_request_usd() -> f64 {
    0.002
}

fn default_top_reasons() -> usize {
    5
}

fn default_recent_window() -> usize {
    100
}

/// Metrics recording configuration.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct MetricsConfig {
    /// Record decision and outcome metrics through the metrics facade.
    #[serde(default)]
    pub enabled: bool,
}
