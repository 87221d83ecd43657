// SPDX-FileCopyrightText: 2026 Voxroute Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration loader using Figment for layered config merging.
//!
//! Supports XDG hierarchy: `./voxroute.toml` > `~/.config/voxroute/voxroute.toml` >
//! `/etc/voxroute/voxroute.toml` with environment variable overrides via `VOXROUTE_` prefix.

#![allow(clippy::result_large_err)] // figment::Error is external and cannot be boxed without wrapper

use std::path::Path;

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};

use crate::model::VoxrouteConfig;

/// Top-level sections that environment keys are mapped into.
const SECTIONS: &[&str] = &["engine", "preferences", "analytics", "metrics"];

/// Load configuration from the standard XDG hierarchy with env var overrides.
///
/// Merge order (later overrides earlier):
/// 1. Compiled defaults
/// 2. `/etc/voxroute/voxroute.toml` (system-wide)
/// 3. `~/.config/voxroute/voxroute.toml` (user XDG config)
/// 4. `./voxroute.toml` (local directory)
/// 5. `VOXROUTE_*` environment variables
pub fn load_config() -> Result<VoxrouteConfig, figment::Error> {
    build_figment().extract()
}

/// Load configuration from a TOML string only (no XDG lookup, no env).
///
/// Used for testing and explicit configuration.
pub fn load_config_from_str(toml_content: &str) -> Result<VoxrouteConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(VoxrouteConfig::default()))
        .merge(Toml::string(toml_content))
        .extract()
}

/// Load configuration from a specific file path with env var overrides.
pub fn load_config_from_path(path: &Path) -> Result<VoxrouteConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(VoxrouteConfig::default()))
        .merge(Toml::file(path))
        .merge(env_provider())
        .extract()
}

/// Build the Figment used internally for config loading (exposed for diagnostic use).
///
/// Returns the Figment before extraction so callers can inspect metadata.
pub fn build_figment() -> Figment {
    Figment::new()
        .merge(Serialized::defaults(VoxrouteConfig::default()))
        .merge(Toml::file("/etc/voxroute/voxroute.toml"))
        .merge(Toml::file(
            dirs::config_dir()
                .map(|d| d.join("voxroute/voxroute.toml"))
                .unwrap_or_default(),
        ))
        .merge(Toml::file("voxroute.toml"))
        .merge(env_provider())
}

/// Map a lowercased, prefix-stripped env key to a dotted config path.
///
/// Only the leading section name is split off, so
/// `analytics_database_path` becomes `analytics.database_path` and not
/// `analytics.database.path`.
pub fn map_env_key(key: &str) -> String {
    for section in SECTIONS {
        if let Some(rest) = key
            .strip_prefix(section)
            .and_then(|rest| rest.strip_prefix('_'))
        {
            return format!("{section}.{rest}");
        }
    }
    key.to_string()
}

/// Create the environment variable provider using explicit `map()` for section-to-dot mapping.
fn env_provider() -> Env {
    Env::prefixed("VOXROUTE_")
        .map(|key| map_env_key(&key.as_str().to_ascii_lowercase()).into())
}
