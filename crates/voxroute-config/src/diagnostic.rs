// SPDX-FileCopyrightText: 2026 Voxroute Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration diagnostics rendered through miette.
//!
//! Figment reports unknown keys and mistyped values with a key path but no
//! position. This module points them back at the line in `voxroute.toml`
//! that caused them and offers the nearest valid key for typos.

#![allow(unused_assignments)] // miette's Diagnostic derive generates code triggering this lint

use figment::error::Kind;
use miette::{Diagnostic, GraphicalReportHandler, NamedSource, SourceSpan};
use thiserror::Error;

/// Jaro-Winkler score a candidate must beat to be offered as a correction.
const SUGGESTION_THRESHOLD: f64 = 0.8;

/// Name used for configuration passed as a string rather than a file.
pub const INLINE_SOURCE: &str = "<inline>";

/// TOML text that took part in a load, kept for span lookup.
#[derive(Debug, Clone)]
pub struct SourceFile {
    pub name: String,
    pub content: String,
}

impl SourceFile {
    pub fn new(name: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            content: content.into(),
        }
    }

    pub fn inline(content: impl Into<String>) -> Self {
        Self::new(INLINE_SOURCE, content)
    }
}

/// A configuration error with enough context for miette to render it.
#[derive(Debug, Error, Diagnostic)]
pub enum ConfigError {
    #[error("unknown key `{key}` in {table}")]
    #[diagnostic(
        code(voxroute::config::unknown_key),
        help("{}", unknown_key_help(suggestion.as_deref(), valid_keys))
    )]
    UnknownKey {
        key: String,
        /// `[engine]`, `[analytics]`, ... or `the top level`.
        table: String,
        suggestion: Option<String>,
        valid_keys: String,
        #[label("not a voxroute setting")]
        span: Option<SourceSpan>,
        #[source_code]
        src: Option<NamedSource<String>>,
    },

    #[error("`{key}` has the wrong type: found {found}")]
    #[diagnostic(code(voxroute::config::invalid_type), help("expected {expected}"))]
    InvalidType {
        /// Dotted path, e.g. `analytics.max_events`.
        key: String,
        found: String,
        expected: String,
        #[label("expected {expected}")]
        span: Option<SourceSpan>,
        #[source_code]
        src: Option<NamedSource<String>>,
    },

    /// Raised after a successful parse by `validation`.
    #[error("{message}")]
    #[diagnostic(code(voxroute::config::validation))]
    Validation { message: String },

    #[error("configuration error: {0}")]
    #[diagnostic(code(voxroute::config::other))]
    Other(String),
}

fn unknown_key_help(suggestion: Option<&str>, valid_keys: &str) -> String {
    match suggestion {
        Some(s) => format!("did you mean `{s}`? Valid keys: {valid_keys}"),
        None => format!("valid keys: {valid_keys}"),
    }
}

/// Turn every error figment collected into a [`ConfigError`].
pub fn figment_to_config_errors(err: figment::Error, sources: &[SourceFile]) -> Vec<ConfigError> {
    err.into_iter()
        .map(|error| {
            let path: Vec<String> = error.path.iter().map(|s| s.to_string()).collect();
            match &error.kind {
                Kind::UnknownField(field, expected) => {
                    // Figment's path may or may not end with the field itself.
                    let table = path.first().filter(|s| *s != field).cloned();
                    let located = locate(&error, sources, table.as_deref(), field);
                    ConfigError::UnknownKey {
                        key: field.clone(),
                        table: table
                            .map(|t| format!("[{t}]"))
                            .unwrap_or_else(|| "the top level".to_string()),
                        suggestion: suggest_key(field, expected).map(str::to_string),
                        valid_keys: expected.join(", "),
                        span: located.as_ref().map(|(span, _)| *span),
                        src: located.map(|(_, src)| src),
                    }
                }
                Kind::InvalidType(found, expected) => {
                    let located = match path.as_slice() {
                        [table, field] => locate(&error, sources, Some(table.as_str()), field),
                        [field] => locate(&error, sources, None, field),
                        _ => None,
                    };
                    ConfigError::InvalidType {
                        key: path.join("."),
                        found: found.to_string(),
                        expected: expected.clone(),
                        span: located.as_ref().map(|(span, _)| *span),
                        src: located.map(|(_, src)| src),
                    }
                }
                _ => ConfigError::Other(error.to_string()),
            }
        })
        .collect()
}

/// Find the key's span, preferring the file figment says the error came from.
///
/// Merged tables can carry the defaults' metadata, so every other source is
/// searched as well.
fn locate(
    error: &figment::Error,
    sources: &[SourceFile],
    table: Option<&str>,
    key: &str,
) -> Option<(SourceSpan, NamedSource<String>)> {
    let reported = match error.metadata.as_ref().and_then(|m| m.source.as_ref()) {
        Some(figment::Source::File(path)) => {
            let path = path.display().to_string();
            sources.iter().find(|s| s.name == path)
        }
        _ => None,
    };
    let (source, offset) = reported
        .into_iter()
        .chain(sources)
        .find_map(|s| key_offset(&s.content, table, key).map(|offset| (s, offset)))?;
    Some((
        SourceSpan::new(offset.into(), key.len()),
        NamedSource::new(&source.name, source.content.clone()),
    ))
}

/// Byte offset of `key = ...` inside `[table]`, or before any table header
/// when `table` is `None`.
///
/// Tracks the current header line by line, so tables may appear in any order.
pub fn key_offset(content: &str, table: Option<&str>, key: &str) -> Option<usize> {
    let mut current: Option<&str> = None;
    let mut offset = 0;
    for line in content.split_inclusive('\n') {
        let trimmed = line.trim_start();
        if let Some(header) = trimmed.strip_prefix('[') {
            current = header.split(']').next().map(str::trim);
        } else if current == table {
            let is_key = trimmed
                .strip_prefix(key)
                .is_some_and(|rest| rest.trim_start().starts_with('='));
            if is_key {
                return Some(offset + (line.len() - trimmed.len()));
            }
        }
        offset += line.len();
    }
    None
}

/// Closest valid key to `unknown`, if any is similar enough.
pub fn suggest_key<'a>(unknown: &str, valid_keys: &[&'a str]) -> Option<&'a str> {
    valid_keys
        .iter()
        .map(|&key| (key, strsim::jaro_winkler(unknown, key)))
        .filter(|(_, score)| *score > SUGGESTION_THRESHOLD)
        .max_by(|a, b| a.1.total_cmp(&b.1))
        .map(|(key, _)| key)
}

/// Print each error to stderr with miette's graphical handler.
pub fn render_errors(errors: &[ConfigError]) {
    let handler = GraphicalReportHandler::new();
    for error in errors {
        let mut buf = String::new();
        match handler.render_report(&mut buf, error) {
            Ok(()) => eprint!("{buf}"),
            Err(_) => eprintln!("Error: {error}"),
        }
    }
}
