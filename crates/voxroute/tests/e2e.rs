// SPDX-FileCopyrightText: 2026 Voxroute Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! End-to-end tests driving the `voxroute` binary.
//!
//! Each test writes its own config file pointing at a temp database, so
//! tests are independent of the host's configuration and of each other.

use std::path::{Path, PathBuf};
use std::process::{Command, Output};

use voxroute_analytics::AnalyticsExport;
use voxroute_core::{DecisionRule, ProcessingDecision, ProcessingLocation};

struct Workspace {
    dir: tempfile::TempDir,
    config: PathBuf,
}

impl Workspace {
    fn new() -> Self {
        let dir = tempfile::tempdir().unwrap();
        let db = dir.path().join("analytics.db");
        let config = dir.path().join("voxroute.toml");
        std::fs::write(
            &config,
            format!(
                "[engine]\nlog_level = \"warn\"\n\n[analytics]\ndatabase_path = {:?}\n",
                db.to_string_lossy()
            ),
        )
        .unwrap();
        Self { dir, config }
    }

    fn run(&self, args: &[&str]) -> Output {
        Command::new(env!("CARGO_BIN_EXE_voxroute"))
            .arg("--config")
            .arg(&self.config)
            .args(args)
            .env_remove("RUST_LOG")
            .current_dir(self.dir.path())
            .output()
            .unwrap()
    }

    fn path(&self, name: &str) -> PathBuf {
        self.dir.path().join(name)
    }
}

fn stdout(output: &Output) -> String {
    assert!(
        output.status.success(),
        "command failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    String::from_utf8_lossy(&output.stdout).into_owned()
}

fn export(ws: &Workspace, file: &Path) -> AnalyticsExport {
    stdout(&ws.run(&["export", "--output", file.to_str().unwrap()]));
    AnalyticsExport::from_json_bytes(&std::fs::read(file).unwrap()).unwrap()
}

#[test]
fn decide_json_offline_never_picks_server() {
    let ws = Workspace::new();
    let out = stdout(&ws.run(&["decide", "what time is it", "--offline", "--json"]));
    let decision: ProcessingDecision = serde_json::from_str(&out).unwrap();

    assert_eq!(decision.rule, DecisionRule::NoNetwork);
    assert_ne!(decision.recommended_location, ProcessingLocation::Server);
    assert!(!decision.reasoning.is_empty());
}

#[test]
fn decide_privacy_keyword_stays_on_device() {
    let ws = Workspace::new();
    let out = stdout(&ws.run(&["decide", "check my bank balance", "--json"]));
    let decision: ProcessingDecision = serde_json::from_str(&out).unwrap();
    assert!(decision.privacy_required);
    assert_eq!(decision.recommended_location, ProcessingLocation::OnDevice);
}

#[test]
fn recorded_decisions_flow_into_export_and_clear() {
    let ws = Workspace::new();
    stdout(&ws.run(&["decide", "set a timer", "--record"]));
    stdout(&ws.run(&["decide", "what is the weather", "--record", "--failed", "timeout"]));

    let exported = export(&ws, &ws.path("first.json"));
    assert_eq!(exported.total_events, 2);
    assert!(exported.events.iter().any(|e| e.error_type.as_deref() == Some("timeout")));

    let report: serde_json::Value =
        serde_json::from_str(&stdout(&ws.run(&["report", "--json"]))).unwrap();
    assert_eq!(report["total_events"], 2);

    assert!(!ws.run(&["clear"]).status.success());
    stdout(&ws.run(&["clear", "--yes"]));
    assert_eq!(export(&ws, &ws.path("second.json")).total_events, 0);
}

#[test]
fn invalid_config_exits_nonzero() {
    let ws = Workspace::new();
    std::fs::write(&ws.config, "[engine]\nhistory_capacity = 0\n").unwrap();
    let output = ws.run(&["report"]);
    assert!(!output.status.success());
}
