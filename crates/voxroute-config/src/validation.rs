// SPDX-FileCopyrightText: 2026 Voxroute Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Post-deserialization validation for configuration values.
//!
//! Validates semantic constraints that cannot be expressed via serde attributes,
//! such as non-zero capacities, non-empty paths, and non-negative costs.

use crate::diagnostic::ConfigError;
use crate::model::VoxrouteConfig;

const LOG_LEVELS: &[&str] = &["trace", "debug", "info", "warn", "error"];

/// Longest retention window accepted, in days (about a century).
pub const MAX_RETENTION_DAYS: u32 = 36_500;

/// Validate a deserialized configuration for semantic correctness.
///
/// Returns `Ok(())` if all validations pass, or `Err(Vec<ConfigError>)` with
/// all collected validation errors (does not fail fast).
pub fn validate_config(config: &VoxrouteConfig) -> Result<(), Vec<ConfigError>> {
    let mut errors = Vec::new();

    if config.engine.history_capacity == 0 {
        errors.push(ConfigError::Validation {
            message: "engine.history_capacity must be at least 1".to_string(),
        });
    }

    let level = config.engine.log_level.trim().to_lowercase();
    if !LOG_LEVELS.contains(&level.as_str()) {
        errors.push(ConfigError::Validation {
            message: format!(
                "engine.log_level `{}` is not one of {}",
                config.engine.log_level,
                LOG_LEVELS.join(", ")
            ),
        });
    }

    let analytics = &config.analytics;

    if analytics.persist && analytics.database_path.trim().is_empty() {
        errors.push(ConfigError::Validation {
            message: "analytics.database_path must not be empty when analytics.persist is enabled"
                .to_string(),
        });
    }

    if analytics.max_events == 0 {
        errors.push(ConfigError::Validation {
            message: "analytics.max_events must be at least 1".to_string(),
        });
    }

    if !(1..=MAX_RETENTION_DAYS).contains(&analytics.retention_days) {
        errors.push(ConfigError::Validation {
            message: format!(
                "analytics.retention_days must be between 1 and {MAX_RETENTION_DAYS}, got {}",
                analytics.retention_days
            ),
        });
    }

    let cost = analytics.server_cost_per_request_usd;
    if !cost.is_finite() || cost < 0.0 {
        errors.push(ConfigError::Validation {
            message: format!(
                "analytics.server_cost_per_request_usd must be a non-negative number, got {cost}"
            ),
        });
    }

    if analytics.top_reasons == 0 {
        errors.push(ConfigError::Validation {
            message: "analytics.top_reasons must be at least 1".to_string(),
        });
    }

    if analytics.recent_window == 0 {
        errors.push(ConfigError::Validation {
            message: "analytics.recent_window must be at least 1".to_string(),
        });
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
