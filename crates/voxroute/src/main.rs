// SPDX-FileCopyrightText: 2026 Voxroute Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Voxroute - processing location decisions for a voice assistant.
//!
//! This is the binary entry point: one-shot decisions from the command
//! line plus inspection and maintenance of the recorded analytics.

#[cfg(not(target_env = "msvc"))]
use tikv_jemallocator::Jemalloc;

#[cfg(not(target_env = "msvc"))]
#[global_allocator]
static GLOBAL: Jemalloc = Jemalloc;

mod analytics;
mod decide;
mod doctor;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing::debug;
#[cfg(feature = "prometheus")]
use tracing::{info, warn};
use voxroute_config::model::VoxrouteConfig;

/// Renders the current metrics in Prometheus text format.
pub type MetricsRender = Box<dyn Fn() -> String + Send + Sync>;

/// Voxroute - decide where voice assistant queries run.
#[derive(Parser, Debug)]
#[command(name = "voxroute", version, about, long_about = None)]
struct Cli {
    /// Read configuration from this file instead of the standard locations.
    #[arg(long, global = true, value_name = "FILE")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Decide where a query should be processed.
    Decide(decide::DecideArgs),
    /// Print the analytics report.
    Report {
        /// Output JSON instead of a summary.
        #[arg(long)]
        json: bool,
    },
    /// Export recorded analytics as JSON.
    Export {
        /// Write to this file instead of stdout.
        #[arg(long, short)]
        output: Option<PathBuf>,
    },
    /// Delete all recorded analytics.
    Clear {
        /// Skip the confirmation check.
        #[arg(long)]
        yes: bool,
    },
    /// Check configuration and the analytics database.
    Doctor {
        /// Also run integrity and resource checks.
        #[arg(long)]
        deep: bool,
        /// Disable colored output.
        #[arg(long)]
        plain: bool,
    },
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let loaded = match &cli.config {
        Some(path) => voxroute_config::load_and_validate_path(path),
        None => voxroute_config::load_and_validate(),
    };
    let config = match loaded {
        Ok(config) => config,
        Err(errors) => {
            voxroute_config::render_errors(&errors);
            std::process::exit(1);
        }
    };

    init_tracing(&config.engine.log_level);
    debug!(persist = config.analytics.persist, "configuration loaded");

    let metrics = install_metrics(&config);

    let result = match cli.command {
        Commands::Decide(args) => decide::run_decide(&config, args, metrics.as_ref()).await,
        Commands::Report { json } => analytics::run_report(&config, json).await,
        Commands::Export { output } => analytics::run_export(&config, output.as_deref()).await,
        Commands::Clear { yes } => analytics::run_clear(&config, yes).await,
        Commands::Doctor { deep, plain } => {
            doctor::run_doctor(&config, cli.config.as_deref(), deep, plain).await
        }
    };

    if let Err(e) = result {
        eprintln!("voxroute: {e}");
        std::process::exit(1);
    }
}

/// Install the Prometheus recorder when metrics are enabled.
#[cfg(feature = "prometheus")]
fn install_metrics(config: &VoxrouteConfig) -> Option<MetricsRender> {
    if !config.metrics.enabled {
        debug!("prometheus metrics disabled by configuration");
        return None;
    }
    match voxroute_prometheus::PrometheusAdapter::new() {
        Ok(adapter) => {
            info!("prometheus metrics enabled");
            Some(Box::new(move || adapter.render()))
        }
        Err(e) => {
            warn!(error = %e, "prometheus initialization failed, continuing without metrics");
            None
        }
    }
}

#[cfg(not(feature = "prometheus"))]
fn install_metrics(_config: &VoxrouteConfig) -> Option<MetricsRender> {
    None
}

/// Initialize the tracing subscriber with an env filter.
///
/// `RUST_LOG` takes precedence over the configured level.
fn init_tracing(log_level: &str) {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("voxroute={log_level},warn")));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_names(false)
        .with_writer(std::io::stderr)
        .init();
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    #[cfg(not(target_env = "msvc"))]
    fn jemalloc_is_active() {
        // Only jemalloc supports advancing the epoch.
        use tikv_jemalloc_ctl::{epoch, stats};
        epoch::advance().unwrap();
        let allocated = stats::allocated::read().unwrap();
        assert!(allocated > 0, "jemalloc should report non-zero allocation");
    }

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn decide_flags_parse() {
        let cli = Cli::try_parse_from([
            "voxroute",
            "decide",
            "what time is it",
            "--battery",
            "0.25",
            "--thermal",
            "serious",
            "--network",
            "cellular",
            "--metered",
            "--privacy-mode",
            "maximum",
            "--json",
        ])
        .unwrap();
        let Commands::Decide(args) = cli.command else {
            panic!("expected decide");
        };
        assert_eq!(args.text, "what time is it");
        assert_eq!(args.battery, Some(0.25));
        assert!(args.metered);
        assert!(args.json);
    }

    #[test]
    fn binary_loads_config_defaults() {
        let config = voxroute_config::load_config_from_str("").expect("defaults should load");
        assert_eq!(config.engine.history_capacity, 100);
    }
}
