// SPDX-FileCopyrightText: 2026 Voxroute Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `voxroute decide` command implementation.
//!
//! Feeds the command-line resource readings into a [`ResourceMonitor`] the
//! same way platform observers would, then runs one decision through the
//! processing service.

use std::io::IsTerminal;
use std::sync::Arc;

use clap::Args;
use voxroute_agent::ProcessingService;
use voxroute_config::model::VoxrouteConfig;
use voxroute_core::{PrivacyMode, ProcessingDecision, ProcessingLocation, ThermalState, VoxrouteError};
use voxroute_router::{InterfaceKind, NetworkPath, ResourceMonitor};

use crate::MetricsRender;

const BYTES_PER_MIB: u64 = 1024 * 1024;

/// Arguments for `voxroute decide`.
#[derive(Args, Debug)]
pub struct DecideArgs {
    /// Query text.
    pub text: String,

    /// Battery level between 0 and 1.
    #[arg(long)]
    pub battery: Option<f64>,

    /// Thermal state: nominal, fair, serious, critical.
    #[arg(long, default_value = "nominal")]
    pub thermal: ThermalState,

    /// Network interface: wifi, wired_ethernet, cellular, loopback, other.
    #[arg(long, default_value = "wifi")]
    pub network: InterfaceKind,

    /// Treat the network path as unavailable.
    #[arg(long)]
    pub offline: bool,

    /// The network path is metered.
    #[arg(long)]
    pub metered: bool,

    /// Resident memory in MiB; sampled from this process when omitted.
    #[arg(long)]
    pub memory_mb: Option<u64>,

    /// Size of an accompanying audio payload in bytes.
    #[arg(long)]
    pub audio_bytes: Option<usize>,

    /// Override the configured privacy mode: maximum, balanced, performance.
    #[arg(long)]
    pub privacy_mode: Option<PrivacyMode>,

    /// Record a successful outcome for the decision.
    #[arg(long)]
    pub record: bool,

    /// Cost in USD to record with the outcome.
    #[arg(long, default_value_t = 0.0, requires = "record")]
    pub cost: f64,

    /// Record the outcome as failed with this error type.
    #[arg(long, requires = "record")]
    pub failed: Option<String>,

    /// Print the decision as JSON.
    #[arg(long)]
    pub json: bool,

    /// Print Prometheus metrics after the decision (needs `metrics.enabled`).
    #[arg(long)]
    pub metrics: bool,
}

impl DecideArgs {
    /// Push the command-line readings into `monitor`.
    fn apply_to(&self, monitor: &ResourceMonitor) {
        if let Some(level) = self.battery {
            monitor.update_battery(level);
        }
        monitor.update_thermal(self.thermal);
        monitor.update_network_path(NetworkPath {
            satisfied: !self.offline,
            expensive: self.metered,
            interface: self.network,
        });
        match self.memory_mb {
            Some(mb) => monitor.update_resident_memory(mb.saturating_mul(BYTES_PER_MIB)),
            None => {
                monitor.refresh_resident_memory();
            }
        }
    }
}

/// Privacy score recorded for an outcome at `location`.
///
/// On-device work never leaves the device; hybrid sends part of it.
fn privacy_score_for(location: ProcessingLocation) -> f64 {
    match location {
        ProcessingLocation::OnDevice | ProcessingLocation::Fallback => 1.0,
        ProcessingLocation::Hybrid => 0.5,
        ProcessingLocation::Server => 0.0,
    }
}

/// Run the `voxroute decide` command.
pub async fn run_decide(
    config: &VoxrouteConfig,
    args: DecideArgs,
    metrics: Option<&MetricsRender>,
) -> Result<(), VoxrouteError> {
    let monitor = Arc::new(ResourceMonitor::new());
    args.apply_to(&monitor);

    let service = ProcessingService::from_config(config, monitor).await;
    let mut preferences = *service.default_preferences();
    if let Some(mode) = args.privacy_mode {
        preferences.privacy_mode = mode;
    }

    let audio = args.audio_bytes.map(|len| vec![0u8; len]);
    let decision = service.make_decision(&args.text, audio.as_deref(), &preferences);

    if args.record {
        let location = decision.recommended_location;
        service.record_outcome(
            &decision,
            args.failed.is_none(),
            args.cost,
            privacy_score_for(location),
            args.failed.as_deref(),
        );
        service.flush().await;
    }

    if args.json {
        println!("{}", serde_json::to_string_pretty(&decision)?);
    } else {
        print_decision(&decision, std::io::stdout().is_terminal());
    }

    if args.metrics {
        match metrics {
            Some(render) => print!("{}", render()),
            None => eprintln!("voxroute: metrics are disabled (set metrics.enabled = true)"),
        }
    }

    Ok(())
}

fn print_decision(decision: &ProcessingDecision, use_color: bool) {
    let location = decision.recommended_location.to_string();
    let location = if use_color {
        use colored::Colorize;
        match decision.recommended_location {
            ProcessingLocation::OnDevice => location.green().bold().to_string(),
            ProcessingLocation::Server => location.blue().bold().to_string(),
            ProcessingLocation::Hybrid => location.cyan().bold().to_string(),
            ProcessingLocation::Fallback => location.yellow().bold().to_string(),
        }
    } else {
        location
    };

    let constraints = &decision.resource_constraints;
    println!();
    println!("  location     {location}");
    println!("  confidence   {:.2}", decision.confidence);
    println!("  rule         {}", decision.rule);
    println!("  complexity   {:.2}", decision.complexity_score);
    println!("  capability   {:.2}", decision.on_device_capability);
    println!("  privacy      {}", if decision.privacy_required { "required" } else { "not required" });
    println!(
        "  resources    battery {:.0}%, thermal {}, network {}{}, memory pressure {:.2}",
        constraints.battery_level * 100.0,
        constraints.thermal_state,
        constraints.network_quality,
        if decision.network_conditions.is_metered { " (metered)" } else { "" },
        constraints.memory_pressure,
    );
    if !decision.matched_capabilities.is_empty() {
        println!("  matched      {}", decision.matched_capabilities.join(", "));
    }
    println!();
    for reason in &decision.reasoning {
        println!("  - {reason}");
    }
    println!();
}
