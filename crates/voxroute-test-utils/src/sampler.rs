// SPDX-FileCopyrightText: 2026 Voxroute Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Deterministic resource sampling for tests.

use std::sync::Mutex;

use voxroute_core::{
    NetworkConditions, NetworkQuality, ResourceConstraints, ResourceSampler, ResourceSnapshot,
    ThermalState,
};

/// Fluent builder for a [`ResourceSnapshot`].
///
/// Starts from a healthy device: full battery, nominal thermals, no memory
/// pressure, and an unmetered excellent network.
#[derive(Debug, Clone, Copy)]
pub struct SnapshotBuilder {
    battery_level: f64,
    thermal_state: ThermalState,
    memory_pressure: f64,
    network_quality: NetworkQuality,
    is_metered: bool,
}

impl Default for SnapshotBuilder {
    fn default() -> Self {
        Self {
            battery_level: 1.0,
            thermal_state: ThermalState::Nominal,
            memory_pressure: 0.0,
            network_quality: NetworkQuality::Excellent,
            is_metered: false,
        }
    }
}

impl SnapshotBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn battery(mut self, level: f64) -> Self {
        self.battery_level = level;
        self
    }

    pub fn thermal(mut self, state: ThermalState) -> Self {
        self.thermal_state = state;
        self
    }

    pub fn memory_pressure(mut self, pressure: f64) -> Self {
        self.memory_pressure = pressure;
        self
    }

    pub fn network(mut self, quality: NetworkQuality) -> Self {
        self.network_quality = quality;
        self
    }

    pub fn metered(mut self, metered: bool) -> Self {
        self.is_metered = metered;
        self
    }

    pub fn build(self) -> ResourceSnapshot {
        ResourceSnapshot {
            constraints: ResourceConstraints {
                battery_level: self.battery_level,
                network_quality: self.network_quality,
                memory_pressure: self.memory_pressure,
                thermal_state: self.thermal_state,
            },
            network: NetworkConditions::for_quality(self.network_quality, self.is_metered),
        }
    }
}

/// Sampler that returns whatever snapshot it was last given.
#[derive(Debug)]
pub struct FixedSampler {
    snapshot: Mutex<ResourceSnapshot>,
}

impl FixedSampler {
    pub fn new(snapshot: ResourceSnapshot) -> Self {
        Self {
            snapshot: Mutex::new(snapshot),
        }
    }

    /// Healthy device on the given network.
    pub fn with_network(quality: NetworkQuality) -> Self {
        Self::new(SnapshotBuilder::new().network(quality).build())
    }

    /// Replace the snapshot seen by subsequent decisions.
    pub fn set(&self, snapshot: ResourceSnapshot) {
        *self.snapshot.lock().unwrap_or_else(|e| e.into_inner()) = snapshot;
    }
}

impl Default for FixedSampler {
    fn default() -> Self {
        Self::new(SnapshotBuilder::new().build())
    }
}

impl ResourceSampler for FixedSampler {
    fn current_snapshot(&self) -> ResourceSnapshot {
        *self.snapshot.lock().unwrap_or_else(|e| e.into_inner())
    }
}
