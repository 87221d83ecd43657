// SPDX-FileCopyrightText: 2026 Voxroute Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Decision data model: locations, resource snapshots, preferences, and the
//! immutable [`ProcessingDecision`] record.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// Clamp a score into `[0, 1]`. NaN collapses to `0.0`.
pub fn clamp_unit(value: f64) -> f64 {
    if value.is_nan() {
        0.0
    } else {
        value.clamp(0.0, 1.0)
    }
}

/// Where inference for a query should run.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Display, EnumString, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum ProcessingLocation {
    OnDevice,
    Server,
    Hybrid,
    Fallback,
}

impl ProcessingLocation {
    /// All locations in reporting order.
    pub const ALL: [ProcessingLocation; 4] = [
        ProcessingLocation::OnDevice,
        ProcessingLocation::Server,
        ProcessingLocation::Hybrid,
        ProcessingLocation::Fallback,
    ];

    /// Capitalized display label used in reasoning strings.
    pub fn label(&self) -> &'static str {
        match self {
            ProcessingLocation::OnDevice => "On-device",
            ProcessingLocation::Server => "Server",
            ProcessingLocation::Hybrid => "Hybrid",
            ProcessingLocation::Fallback => "Fallback",
        }
    }
}

/// Network path quality, ordered from worst to best.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Display, EnumString, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum NetworkQuality {
    Unavailable,
    Poor,
    Fair,
    Good,
    Excellent,
}

impl NetworkQuality {
    /// All qualities from best to worst (reporting order).
    pub const ALL: [NetworkQuality; 5] = [
        NetworkQuality::Excellent,
        NetworkQuality::Good,
        NetworkQuality::Fair,
        NetworkQuality::Poor,
        NetworkQuality::Unavailable,
    ];

    /// Explicit ordinal rank: unavailable=0 .. excellent=4.
    pub fn ordinal(&self) -> u8 {
        match self {
            NetworkQuality::Unavailable => 0,
            NetworkQuality::Poor => 1,
            NetworkQuality::Fair => 2,
            NetworkQuality::Good => 3,
            NetworkQuality::Excellent => 4,
        }
    }

    /// Ordinal rank normalized to `[0, 1]`.
    pub fn normalized_rank(&self) -> f64 {
        f64::from(self.ordinal()) / 4.0
    }

    /// Whether any network path is usable at all.
    pub fn is_available(&self) -> bool {
        *self != NetworkQuality::Unavailable
    }
}

/// Device thermal state as reported by the host platform.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Display, EnumString, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum ThermalState {
    Nominal,
    Fair,
    Serious,
    Critical,
}

impl ThermalState {
    /// Serious or critical.
    pub fn is_elevated(&self) -> bool {
        matches!(self, ThermalState::Serious | ThermalState::Critical)
    }
}

/// User privacy policy.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum PrivacyMode {
    Maximum,
    #[default]
    Balanced,
    Performance,
}

/// Immutable snapshot of device resources taken at decision time.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ResourceConstraints {
    /// Battery charge in `[0, 1]`.
    pub battery_level: f64,
    pub network_quality: NetworkQuality,
    /// Memory pressure in `[0, 1]`.
    pub memory_pressure: f64,
    pub thermal_state: ThermalState,
}

impl Default for ResourceConstraints {
    /// Conservative defaults used when the platform has not reported yet.
    fn default() -> Self {
        Self {
            battery_level: 1.0,
            network_quality: NetworkQuality::Unavailable,
            memory_pressure: 0.0,
            thermal_state: ThermalState::Nominal,
        }
    }
}

/// Network characteristics derived from [`NetworkQuality`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NetworkConditions {
    pub quality: NetworkQuality,
    pub is_metered: bool,
    pub estimated_bandwidth_mbps: f64,
    pub latency_ms: f64,
}

impl NetworkConditions {
    /// Build conditions from the fixed bandwidth/latency lookup table.
    pub fn for_quality(quality: NetworkQuality, is_metered: bool) -> Self {
        let (estimated_bandwidth_mbps, latency_ms) = match quality {
            NetworkQuality::Excellent => (100.0, 20.0),
            NetworkQuality::Good => (50.0, 50.0),
            NetworkQuality::Fair => (10.0, 150.0),
            NetworkQuality::Poor => (1.0, 500.0),
            NetworkQuality::Unavailable => (0.0, 10_000.0),
        };
        Self {
            quality,
            is_metered,
            estimated_bandwidth_mbps,
            latency_ms,
        }
    }
}

impl Default for NetworkConditions {
    fn default() -> Self {
        Self::for_quality(NetworkQuality::Unavailable, false)
    }
}

/// Everything a sampler reports for one decision.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ResourceSnapshot {
    pub constraints: ResourceConstraints,
    pub network: NetworkConditions,
}

/// User-controlled routing preferences, read-only to the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProcessingPreferences {
    pub prefer_on_device: bool,
    pub privacy_mode: PrivacyMode,
    pub cost_optimization: bool,
    pub battery_optimization: bool,
}

impl Default for UserProcessingPreferences {
    fn default() -> Self {
        Self {
            prefer_on_device: true,
            privacy_mode: PrivacyMode::Balanced,
            cost_optimization: true,
            battery_optimization: true,
        }
    }
}

/// Which rule of the scorer produced a decision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum DecisionRule {
    PrivacyOverride,
    NoNetwork,
    LowCapability,
    ComplexOnPoorNetwork,
    BatteryOptimization,
    PrivacyModeMaximum,
    PrivacyModePerformance,
    Balanced,
    /// Static fallback constructed outside the scoring path.
    StaticFallback,
}

/// The routing decision for one query. Never mutated after construction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProcessingDecision {
    /// Unique decision identifier (UUID v4).
    pub id: String,
    pub recommended_location: ProcessingLocation,
    pub complexity_score: f64,
    pub on_device_capability: f64,
    pub resource_constraints: ResourceConstraints,
    pub privacy_required: bool,
    pub network_conditions: NetworkConditions,
    pub confidence: f64,
    /// Human-readable explanation, never empty.
    pub reasoning: Vec<String>,
    /// Names of the fixed on-device capabilities the query matched.
    #[serde(default)]
    pub matched_capabilities: Vec<String>,
    pub rule: DecisionRule,
    pub decision_time_seconds: f64,
    pub timestamp: DateTime<Utc>,
}

impl ProcessingDecision {
    /// Immediate on-device decision for callers that cannot run the pipeline.
    pub fn on_device_fallback() -> Self {
        Self::static_fallback(
            ProcessingLocation::OnDevice,
            0.8,
            0.8,
            "On-device fallback processing selected",
        )
    }

    /// Immediate degraded-mode decision for callers that cannot run the pipeline.
    pub fn basic_fallback() -> Self {
        Self::static_fallback(
            ProcessingLocation::Fallback,
            0.3,
            0.0,
            "Basic fallback processing selected",
        )
    }

    fn static_fallback(
        location: ProcessingLocation,
        confidence: f64,
        on_device_capability: f64,
        reason: &str,
    ) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            recommended_location: location,
            complexity_score: 0.5,
            on_device_capability,
            resource_constraints: ResourceConstraints::default(),
            privacy_required: false,
            network_conditions: NetworkConditions::default(),
            confidence,
            reasoning: vec![reason.to_string()],
            matched_capabilities: Vec::new(),
            rule: DecisionRule::StaticFallback,
            decision_time_seconds: 0.0,
            timestamp: Utc::now(),
        }
    }
}
