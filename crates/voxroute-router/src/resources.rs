// SPDX-FileCopyrightText: 2026 Voxroute Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Cached host resource signals.
//!
//! Platform observers push battery, thermal, network path, and resident
//! memory readings into a [`ResourceMonitor`] whenever they change. The
//! decision path reads the latest cached values through
//! [`ResourceSampler::current_snapshot`] without blocking. Signals that were
//! never reported fall back to conservative defaults.

use arc_swap::ArcSwap;
use strum::{Display, EnumString};
use sysinfo::{ProcessRefreshKind, ProcessesToUpdate, System};
use tracing::{debug, warn};
use voxroute_core::{
    clamp_unit, NetworkConditions, NetworkQuality, ResourceConstraints, ResourceSampler,
    ResourceSnapshot, ThermalState,
};

const BYTES_PER_MIB: f64 = 1024.0 * 1024.0;

/// Interface type carried by a network path descriptor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString)]
#[strum(serialize_all = "snake_case")]
pub enum InterfaceKind {
    Wifi,
    WiredEthernet,
    Cellular,
    Loopback,
    Other,
}

/// Host-provided description of the current network path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NetworkPath {
    /// Whether the path can carry traffic at all.
    pub satisfied: bool,
    /// The platform flagged the path as costly (metered data plan).
    pub expensive: bool,
    pub interface: InterfaceKind,
}

impl NetworkPath {
    pub fn classify(&self) -> NetworkQuality {
        if !self.satisfied {
            return NetworkQuality::Unavailable;
        }
        if self.expensive {
            return NetworkQuality::Fair;
        }
        match self.interface {
            InterfaceKind::Wifi | InterfaceKind::WiredEthernet => NetworkQuality::Excellent,
            InterfaceKind::Cellular => NetworkQuality::Good,
            InterfaceKind::Loopback | InterfaceKind::Other => NetworkQuality::Fair,
        }
    }
}

/// Memory pressure in `[0, 1]`: resident MiB over a 1 GiB budget.
pub fn memory_pressure_from_bytes(resident_bytes: u64) -> f64 {
    let used_mb = resident_bytes as f64 / BYTES_PER_MIB;
    (used_mb / 1024.0).min(1.0)
}

#[derive(Debug, Clone, Default)]
struct HostSignals {
    battery_level: Option<f64>,
    thermal_state: Option<ThermalState>,
    network_path: Option<NetworkPath>,
    resident_memory_bytes: Option<u64>,
}

impl HostSignals {
    fn snapshot(&self) -> ResourceSnapshot {
        let network_quality = self
            .network_path
            .map(|p| p.classify())
            .unwrap_or(NetworkQuality::Unavailable);
        let is_metered = self.network_path.is_some_and(|p| p.expensive);

        let constraints = ResourceConstraints {
            battery_level: self.battery_level.unwrap_or(1.0),
            network_quality,
            memory_pressure: self
                .resident_memory_bytes
                .map(memory_pressure_from_bytes)
                .unwrap_or(0.0),
            thermal_state: self.thermal_state.unwrap_or(ThermalState::Nominal),
        };

        ResourceSnapshot {
            constraints,
            network: NetworkConditions::for_quality(network_quality, is_metered),
        }
    }
}

/// Lock-free cache of the latest host resource signals.
///
/// Cheap to share behind an `Arc`; every update swaps in a new signal set,
/// so readers never observe a half-written update.
#[derive(Debug, Default)]
pub struct ResourceMonitor {
    signals: ArcSwap<HostSignals>,
}

impl ResourceMonitor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a battery reading. Out-of-range values are clamped.
    pub fn update_battery(&self, level: f64) {
        let level = clamp_unit(level);
        self.signals.rcu(|current| HostSignals {
            battery_level: Some(level),
            ..HostSignals::clone(current)
        });
        debug!(battery_level = level, "battery signal updated");
    }

    pub fn update_thermal(&self, state: ThermalState) {
        self.signals.rcu(|current| HostSignals {
            thermal_state: Some(state),
            ..HostSignals::clone(current)
        });
        debug!(thermal_state = %state, "thermal signal updated");
    }

    pub fn update_network_path(&self, path: NetworkPath) {
        self.signals.rcu(|current| HostSignals {
            network_path: Some(path),
            ..HostSignals::clone(current)
        });
        debug!(
            satisfied = path.satisfied,
            expensive = path.expensive,
            interface = %path.interface,
            quality = %path.classify(),
            "network path updated"
        );
    }

    pub fn update_resident_memory(&self, bytes: u64) {
        self.signals.rcu(|current| HostSignals {
            resident_memory_bytes: Some(bytes),
            ..HostSignals::clone(current)
        });
    }

    /// Sample this process's resident memory from the OS and cache it.
    ///
    /// Returns the sampled byte count, or `None` when the process table
    /// could not be read; the previous reading is kept in that case.
    pub fn refresh_resident_memory(&self) -> Option<u64> {
        let pid = match sysinfo::get_current_pid() {
            Ok(pid) => pid,
            Err(e) => {
                warn!(error = e, "cannot determine current pid for memory sampling");
                return None;
            }
        };

        let mut system = System::new();
        system.refresh_processes_specifics(
            ProcessesToUpdate::Some(&[pid]),
            true,
            ProcessRefreshKind::nothing().with_memory(),
        );

        let bytes = system.process(pid).map(|p| p.memory())?;
        self.update_resident_memory(bytes);
        Some(bytes)
    }

    pub fn snapshot(&self) -> ResourceSnapshot {
        self.signals.load().snapshot()
    }
}

impl ResourceSampler for ResourceMonitor {
    fn current_snapshot(&self) -> ResourceSnapshot {
        self.snapshot()
    }
}
