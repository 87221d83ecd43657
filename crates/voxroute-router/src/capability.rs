// SPDX-FileCopyrightText: 2026 Voxroute Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! On-device capability assessment.
//!
//! Starts from full capability and subtracts penalties for complexity,
//! battery, thermal state, memory pressure, and queries the local model has
//! no canned capability for.

use strum::{Display, EnumIter, IntoEnumIterator};
use voxroute_core::{clamp_unit, ResourceConstraints, ThermalState};

/// Fixed set of things the on-device model handles well.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumIter)]
pub enum OnDeviceCapability {
    #[strum(serialize = "time queries")]
    TimeQueries,
    #[strum(serialize = "simple math")]
    SimpleMath,
    #[strum(serialize = "cached calendar")]
    CachedCalendar,
    #[strum(serialize = "cached contacts")]
    CachedContacts,
    #[strum(serialize = "cached weather")]
    CachedWeather,
    #[strum(serialize = "reminders")]
    Reminders,
}

impl OnDeviceCapability {
    fn keywords(&self) -> &'static [&'static str] {
        match self {
            OnDeviceCapability::TimeQueries => &["time", "date"],
            OnDeviceCapability::SimpleMath => &["calculate", "math"],
            OnDeviceCapability::CachedCalendar => &["calendar", "meeting"],
            OnDeviceCapability::CachedContacts => &["contact", "call"],
            OnDeviceCapability::CachedWeather => &["weather"],
            OnDeviceCapability::Reminders => &["reminder", "note"],
        }
    }

    /// Every capability whose keywords appear in `text` (case-insensitive).
    pub fn matching(text: &str) -> Vec<OnDeviceCapability> {
        let lower = text.to_lowercase();
        Self::iter()
            .filter(|cap| cap.keywords().iter().any(|kw| lower.contains(kw)))
            .collect()
    }
}

/// Result of a capability assessment.
#[derive(Debug, Clone, PartialEq)]
pub struct CapabilityAssessment {
    /// Score in `[0, 1]`.
    pub score: f64,
    /// Capabilities the query matched, informational only.
    pub matched: Vec<OnDeviceCapability>,
}

impl CapabilityAssessment {
    pub fn matched_names(&self) -> Vec<String> {
        self.matched.iter().map(ToString::to_string).collect()
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct CapabilityAssessor;

impl CapabilityAssessor {
    pub fn new() -> Self {
        Self
    }

    pub fn assess(
        &self,
        text: &str,
        complexity: f64,
        constraints: &ResourceConstraints,
    ) -> CapabilityAssessment {
        let matched = OnDeviceCapability::matching(text);
        let mut score = 1.0;

        score -= (complexity * 0.5).min(0.4);

        if constraints.battery_level < 0.2 {
            score -= 0.3;
        } else if constraints.battery_level < 0.5 {
            score -= 0.1;
        }

        match constraints.thermal_state {
            ThermalState::Serious => score -= 0.2,
            ThermalState::Critical => score -= 0.5,
            ThermalState::Nominal | ThermalState::Fair => {}
        }

        if constraints.memory_pressure > 0.8 {
            score -= 0.3;
        } else if constraints.memory_pressure > 0.6 {
            score -= 0.1;
        }

        if matched.is_empty() {
            score -= 0.4;
        }

        CapabilityAssessment {
            score: clamp_unit(score),
            matched,
        }
    }
}
