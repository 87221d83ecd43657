// SPDX-FileCopyrightText: 2026 Voxroute Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `voxroute report`, `voxroute export`, and `voxroute clear`.

use std::io::{IsTerminal, Write};
use std::path::Path;

use tracing::info;
use voxroute_analytics::{AnalyticsAggregator, AnalyticsReport};
use voxroute_config::model::VoxrouteConfig;
use voxroute_core::{ProcessingLocation, VoxrouteError};

/// Run the `voxroute report` command.
pub async fn run_report(config: &VoxrouteConfig, json: bool) -> Result<(), VoxrouteError> {
    let analytics = AnalyticsAggregator::from_config(config.analytics.clone()).await;
    let report = analytics.report();

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print_report(&report, std::io::stdout().is_terminal());
    }
    Ok(())
}

/// Run the `voxroute export` command.
pub async fn run_export(
    config: &VoxrouteConfig,
    output: Option<&Path>,
) -> Result<(), VoxrouteError> {
    let analytics = AnalyticsAggregator::from_config(config.analytics.clone()).await;
    let bytes = analytics.export_json()?;

    match output {
        Some(path) => {
            std::fs::write(path, &bytes).map_err(|e| VoxrouteError::Storage {
                source: Box::new(e),
            })?;
            info!(path = %path.display(), events = analytics.len(), "analytics exported");
            eprintln!("voxroute: exported {} events to {}", analytics.len(), path.display());
        }
        None => {
            let mut stdout = std::io::stdout().lock();
            stdout
                .write_all(&bytes)
                .and_then(|()| writeln!(stdout))
                .map_err(|e| VoxrouteError::Internal(format!("failed to write export: {e}")))?;
        }
    }
    Ok(())
}

/// Run the `voxroute clear` command.
///
/// Refuses to delete anything unless `--yes` is given.
pub async fn run_clear(config: &VoxrouteConfig, yes: bool) -> Result<(), VoxrouteError> {
    if !yes {
        return Err(VoxrouteError::Config(
            "clear deletes all recorded analytics; re-run with --yes to confirm".to_string(),
        ));
    }

    let analytics = AnalyticsAggregator::from_config(config.analytics.clone()).await;
    let removed = analytics.len();
    analytics.clear();
    analytics.flush().await;
    println!("voxroute: cleared {removed} events");
    Ok(())
}

fn print_report(report: &AnalyticsReport, use_color: bool) {
    let heading = |text: &str| {
        if use_color {
            use colored::Colorize;
            text.bold().to_string()
        } else {
            text.to_string()
        }
    };

    let today = &report.current_stats;
    println!();
    println!("  {}", heading("voxroute analytics"));
    println!("  {}", "-".repeat(50));
    println!("  events retained    {}", report.total_events);
    println!(
        "  today              {} decisions, {:.0}% success, avg confidence {:.2}",
        today.total_decisions,
        today.success_rate * 100.0,
        today.average_confidence
    );
    println!(
        "  today by location  on-device {:.0}%, server {:.0}%, hybrid {:.0}%, fallback {:.0}%",
        today.on_device_ratio * 100.0,
        today.server_ratio * 100.0,
        today.hybrid_ratio * 100.0,
        today.fallback_ratio * 100.0
    );

    let weekly = &report.weekly_trends;
    println!(
        "  {} .. {}  {} decisions",
        weekly.start_date, weekly.end_date, weekly.summary.total_decisions
    );

    let savings = &report.cost_savings;
    println!();
    println!("  {}", heading(&format!("cost ({})", savings.month)));
    println!("  actual             ${:.4}", savings.actual_cost);
    println!("  all-server         ${:.4}", savings.estimated_server_only_cost);
    println!(
        "  saved              ${:.4} ({:.1}%)",
        savings.savings, savings.savings_percentage
    );

    println!();
    println!("  {}", heading("by location"));
    for (location, perf) in &report.location_performance {
        println!(
            "  {:<18} {} events, {:.0}% success, avg confidence {:.2}",
            location_name(*location),
            perf.count,
            perf.success_rate * 100.0,
            perf.average_confidence
        );
    }

    if !report.top_reasons.is_empty() {
        println!();
        println!("  {}", heading("top reasons"));
        for reason in &report.top_reasons {
            println!("  {:>4}  {}", reason.count, reason.reason);
        }
    }

    println!();
    println!("  average privacy score {:.2}", report.average_privacy_score);
    println!();
}

fn location_name(location: ProcessingLocation) -> &'static str {
    match location {
        ProcessingLocation::OnDevice => "on-device",
        ProcessingLocation::Server => "server",
        ProcessingLocation::Hybrid => "hybrid",
        ProcessingLocation::Fallback => "fallback",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use voxroute_test_utils::{EventBuilder, TestHarness};

    #[tokio::test]
    async fn clear_requires_confirmation() {
        let harness = TestHarness::builder().build().unwrap();
        let err = run_clear(harness.config(), false).await.unwrap_err();
        assert!(err.to_string().contains("--yes"));
    }

    #[tokio::test]
    async fn export_writes_file_and_clear_empties_store() {
        let harness = TestHarness::builder().build().unwrap();
        {
            let analytics = harness.analytics().await;
            analytics.record(EventBuilder::new(ProcessingLocation::Server).cost(0.002).build());
            analytics.flush().await;
        }

        let out = harness.database_path().with_file_name("export.json");
        run_export(harness.config(), Some(&out)).await.unwrap();
        let export =
            voxroute_analytics::AnalyticsExport::from_json_bytes(&std::fs::read(&out).unwrap())
                .unwrap();
        assert_eq!(export.total_events, 1);

        run_clear(harness.config(), true).await.unwrap();
        assert!(harness.analytics().await.is_empty());
    }
}
