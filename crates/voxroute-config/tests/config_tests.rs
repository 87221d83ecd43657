// SPDX-FileCopyrightText: 2026 Voxroute Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Integration tests for the voxroute configuration system.

use voxroute_config::diagnostic::{suggest_key, ConfigError};
use voxroute_config::model::VoxrouteConfig;
use voxroute_config::{load_and_validate_path, load_and_validate_str, load_config_from_str};
use voxroute_core::PrivacyMode;

/// Valid TOML with all known fields deserializes successfully.
#[test]
fn valid_toml_deserializes_into_voxroute_config() {
    let toml = r#"
[engine]
history_capacity = 50
log_level = "debug"

[preferences]
prefer_on_device = false
privacy_mode = "maximum"
cost_optimization = false
battery_optimization = false

[analytics]
persist = false
database_path = "/tmp/analytics.db"
max_events = 200
retention_days = 7
server_cost_per_request_usd = 0.01
top_reasons = 3
recent_window = 20

[metrics]
enabled = true
"#;

    let config = load_config_from_str(toml).expect("valid TOML should deserialize");
    assert_eq!(config.engine.history_capacity, 50);
    assert_eq!(config.engine.log_level, "debug");
    assert!(!config.preferences.prefer_on_device);
    assert_eq!(config.preferences.privacy_mode, PrivacyMode::Maximum);
    assert!(!config.preferences.cost_optimization);
    assert!(!config.preferences.battery_optimization);
    assert!(!config.analytics.persist);
    assert_eq!(config.analytics.database_path, "/tmp/analytics.db");
    assert_eq!(config.analytics.max_events, 200);
    assert_eq!(config.analytics.retention_days, 7);
    assert_eq!(config.analytics.server_cost_per_request_usd, 0.01);
    assert_eq!(config.analytics.top_reasons, 3);
    assert_eq!(config.analytics.recent_window, 20);
    assert!(config.metrics.enabled);
}

/// Missing optional sections use defaults without error.
#[test]
fn missing_optional_sections_use_defaults() {
    let config = load_config_from_str("").expect("empty TOML should use defaults");

    assert_eq!(config.engine.history_capacity, 100);
    assert_eq!(config.engine.log_level, "info");
    assert!(config.preferences.prefer_on_device);
    assert_eq!(config.preferences.privacy_mode, PrivacyMode::Balanced);
    assert!(config.preferences.battery_optimization);
    assert!(config.analytics.persist);
    assert!(config.analytics.database_path.ends_with("analytics.db"));
    assert_eq!(config.analytics.max_events, 1000);
    assert_eq!(config.analytics.retention_days, 30);
    assert_eq!(config.analytics.server_cost_per_request_usd, 0.002);
    assert!(!config.metrics.enabled);
}

/// Preferences section converts into the engine's preference value.
#[test]
fn preferences_convert_to_engine_value() {
    let toml = r#"
[preferences]
privacy_mode = "performance"
battery_optimization = false
"#;
    let config = load_config_from_str(toml).unwrap();
    let prefs = config.preferences.to_preferences();
    assert_eq!(prefs.privacy_mode, PrivacyMode::Performance);
    assert!(!prefs.battery_optimization);
    assert!(prefs.prefer_on_device);
}

/// Unknown privacy mode is rejected at deserialization.
#[test]
fn unknown_privacy_mode_rejected() {
    let toml = r#"
[preferences]
privacy_mode = "paranoid"
"#;
    assert!(load_config_from_str(toml).is_err());
}

/// Unknown field in [engine] section produces an UnknownField error.
#[test]
fn unknown_field_in_engine_produces_error() {
    let toml = r#"
[engine]
histroy_capacity = 10
"#;

    let err = load_config_from_str(toml).expect_err("should reject unknown field");
    let err_str = format!("{err}");
    assert!(
        err_str.contains("unknown field") || err_str.contains("histroy_capacity"),
        "error should mention unknown field or the bad key, got: {err_str}"
    );
}

/// Environment-style dotted overrides win over TOML.
#[test]
fn dotted_override_beats_toml() {
    use figment::{
        providers::{Format, Serialized, Toml},
        Figment,
    };

    let toml_content = r#"
[analytics]
database_path = "/from/toml.db"
"#;

    let config: VoxrouteConfig = Figment::new()
        .merge(Serialized::defaults(VoxrouteConfig::default()))
        .merge(Toml::string(toml_content))
        .merge(("analytics.database_path", "/from/env.db"))
        .extract()
        .expect("should merge env override");

    assert_eq!(config.analytics.database_path, "/from/env.db");
}

/// Missing config files are silently skipped (Figment's Toml::file() behavior).
#[test]
fn missing_config_files_silently_skipped() {
    use figment::{
        providers::{Format, Serialized, Toml},
        Figment,
    };

    let config: VoxrouteConfig = Figment::new()
        .merge(Serialized::defaults(VoxrouteConfig::default()))
        .merge(Toml::file("/nonexistent/path/voxroute.toml"))
        .extract()
        .expect("missing file should be silently skipped");

    assert_eq!(config.engine.history_capacity, 100);
}

/// Unexpected top-level section is rejected by deny_unknown_fields.
#[test]
fn deny_unknown_fields_at_top_level() {
    let toml = r#"
[telemetry]
level = "debug"
"#;

    let err = load_config_from_str(toml).expect_err("unknown top-level section should be rejected");
    let err_str = format!("{err}");
    assert!(
        err_str.contains("unknown field") || err_str.contains("telemetry"),
        "error should mention unknown field, got: {err_str}"
    );
}

#[test]
fn diagnostic_typo_suggests_valid_key() {
    let valid_keys = &["prefer_on_device", "privacy_mode", "cost_optimization"];
    assert_eq!(
        suggest_key("privcy_mode", valid_keys),
        Some("privacy_mode")
    );
}

/// Error output from load_and_validate_str includes the unknown key and a suggestion.
#[test]
fn diagnostic_error_includes_unknown_key() {
    let toml = r#"
[engine]
log_levle = "debug"
"#;

    let errors = load_and_validate_str(toml).expect_err("should produce errors");
    let has_unknown_key = errors.iter().any(|e| {
        matches!(e, ConfigError::UnknownKey { key, suggestion, valid_keys, .. } if {
            key == "log_levle"
                && suggestion.as_deref() == Some("log_level")
                && valid_keys.contains("history_capacity")
        })
    });
    assert!(
        has_unknown_key,
        "should have UnknownKey error for 'log_levle' with suggestion, got: {errors:?}"
    );
}

/// Invalid type (string where number expected) produces clear message.
#[test]
fn diagnostic_invalid_type_message() {
    let toml = r#"
[analytics]
max_events = "lots"
"#;

    let errors = load_and_validate_str(toml).expect_err("should reject invalid type");
    assert!(
        errors
            .iter()
            .any(|e| matches!(e, ConfigError::InvalidType { key, .. } if key.contains("max_events"))),
        "error should name the key, got: {errors:?}"
    );
}

/// ConfigError can be rendered using miette's graphical handler.
#[test]
fn config_error_renders_with_miette() {
    use miette::{Diagnostic, GraphicalReportHandler};

    let error = ConfigError::UnknownKey {
        key: "log_levle".to_string(),
        table: "[engine]".to_string(),
        suggestion: Some("log_level".to_string()),
        valid_keys: "history_capacity, log_level".to_string(),
        span: None,
        src: None,
    };

    assert!(error.code().is_some(), "should have diagnostic code");
    let help = error.help().expect("should have help text").to_string();
    assert!(help.contains("did you mean `log_level`"), "got: {help}");

    let handler = GraphicalReportHandler::new();
    let mut buf = String::new();
    handler
        .render_report(&mut buf, &error)
        .expect("should render without error");
    assert!(buf.contains("log_levle"));
}

/// Validation runs after a successful parse.
#[test]
fn validation_catches_zero_max_events() {
    let toml = r#"
[analytics]
max_events = 0
"#;

    let errors = load_and_validate_str(toml).expect_err("zero max_events should fail");
    assert!(errors.iter().any(|e| {
        matches!(e, ConfigError::Validation { message } if message.contains("max_events"))
    }));
}

/// `VOXROUTE_*` variables override values from the file.
#[test]
#[serial_test::serial]
fn env_var_overrides_file_value() {
    let dir = tempfile::tempdir().expect("temp dir");
    let path = dir.path().join("voxroute.toml");
    std::fs::write(&path, "[analytics]\nmax_events = 50\n").expect("write config");

    // SAFETY: test-only env mutation, serialized with other env tests.
    unsafe { std::env::set_var("VOXROUTE_ANALYTICS_MAX_EVENTS", "75") };
    let result = load_and_validate_path(&path);
    unsafe { std::env::remove_var("VOXROUTE_ANALYTICS_MAX_EVENTS") };

    let config = result.expect("config should load");
    assert_eq!(config.analytics.max_events, 75);
}

/// Env keys with underscores inside the field name map to the right field.
#[test]
#[serial_test::serial]
fn env_var_sets_underscored_field() {
    let dir = tempfile::tempdir().expect("temp dir");
    let path = dir.path().join("voxroute.toml");
    std::fs::write(&path, "[analytics]\npersist = true\n").expect("write config");

    // SAFETY: test-only env mutation, serialized with other env tests.
    unsafe { std::env::set_var("VOXROUTE_ANALYTICS_DATABASE_PATH", "/tmp/vox-env.db") };
    let result = load_and_validate_path(&path);
    unsafe { std::env::remove_var("VOXROUTE_ANALYTICS_DATABASE_PATH") };

    let config = result.expect("config should load");
    assert_eq!(config.analytics.database_path, "/tmp/vox-env.db");
    assert!(config.analytics.persist);
}
