// SPDX-FileCopyrightText: 2026 Voxroute Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Heuristic query complexity scoring.
//!
//! Scores a query in `[0, 1]` from additive text signals plus an optional
//! audio-length signal. Pure and deterministic: no model, no network.

use voxroute_core::clamp_unit;

/// Phrases that indicate the user wants more than a lookup (contains, case-insensitive).
const COMPLEX_PHRASES: &[&str] = &[
    "explain",
    "analyze",
    "compare",
    "summarize",
    "translate",
    "research",
    "investigate",
    "calculate complex",
    "detailed",
    "comprehensive",
    "in-depth",
    "thorough",
];

/// Rough compressed-audio byte rate used to estimate utterance length.
const AUDIO_BYTES_PER_SECOND: f64 = 8192.0;

/// Additive complexity scorer.
#[derive(Debug, Clone, Copy, Default)]
pub struct ComplexityAssessor;

impl ComplexityAssessor {
    pub fn new() -> Self {
        Self
    }

    /// Score a query. Empty or whitespace-only text scores `0.0`.
    ///
    /// `audio_byte_count` is the size of the recorded utterance, if any.
    pub fn assess(&self, text: &str, audio_byte_count: Option<usize>) -> f64 {
        let trimmed = text.trim();
        if trimmed.is_empty() {
            return 0.0;
        }

        let lower = trimmed.to_lowercase();
        let words: Vec<&str> = trimmed.split_whitespace().collect();
        let mut score = 0.0;

        // Signal 1: length
        score += (words.len() as f64 / 50.0).min(0.4);

        // Signal 2: vocabulary weight
        score += (Self::average_word_length(&words) / 25.0).min(0.2);

        // Signal 3: questions
        if trimmed.contains('?') || lower.starts_with("what") || lower.starts_with("how") {
            score += 0.15;
        }

        // Signal 4: explicit complexity phrases
        if COMPLEX_PHRASES.iter().any(|p| lower.contains(p)) {
            score += 0.1;
        }

        // Signal 5: numbers
        if trimmed.chars().any(|c| c.is_ascii_digit()) {
            score += 0.05;
        }

        // Signal 6: proper nouns
        if words.iter().any(|w| Self::is_capitalized_word(w)) {
            score += 0.1;
        }

        // Signal 7: spoken length
        if let Some(bytes) = audio_byte_count {
            let seconds = bytes as f64 / AUDIO_BYTES_PER_SECOND;
            score += (seconds / 30.0).min(0.2);
        }

        clamp_unit(score)
    }

    fn average_word_length(words: &[&str]) -> f64 {
        if words.is_empty() {
            return 0.0;
        }
        let total: usize = words.iter().map(|w| w.chars().count()).sum();
        total as f64 / words.len() as f64
    }

    fn is_capitalized_word(word: &str) -> bool {
        word.chars().next().is_some_and(char::is_uppercase) && word.chars().count() > 2
    }
}
