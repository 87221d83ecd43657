// SPDX-FileCopyrightText: 2026 Voxroute Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Binary privacy classification for query text.

use voxroute_core::{PrivacyMode, UserProcessingPreferences};

/// Substrings that mark a query as privacy-sensitive (matched lowercase).
const PRIVACY_KEYWORDS: &[&str] = &[
    "password",
    "ssn",
    "social security",
    "credit card",
    "personal",
    "private",
    "confidential",
    "secret",
    "address",
    "phone number",
    "email",
    "bank",
    "account",
    "medical",
    "health",
];

/// Flags queries that must stay on the device.
#[derive(Debug, Clone, Copy, Default)]
pub struct PrivacyClassifier;

impl PrivacyClassifier {
    pub fn new() -> Self {
        Self
    }

    /// True when the text hits a sensitive keyword or the user runs in
    /// maximum privacy mode.
    pub fn requires_privacy(&self, text: &str, preferences: &UserProcessingPreferences) -> bool {
        preferences.privacy_mode == PrivacyMode::Maximum || Self::contains_sensitive(text)
    }

    fn contains_sensitive(text: &str) -> bool {
        let lower = text.to_lowercase();
        PRIVACY_KEYWORDS.iter().any(|kw| lower.contains(kw))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn balanced() -> UserProcessingPreferences {
        UserProcessingPreferences::default()
    }

    #[test]
    fn keyword_match_is_case_insensitive() {
        let c = PrivacyClassifier::new();
        assert!(c.requires_privacy("What is my BANK balance", &balanced()));
        assert!(c.requires_privacy("read my Medical records", &balanced()));
        assert!(c.requires_privacy("text my phone number to Sam", &balanced()));
    }

    #[test]
    fn plain_query_is_not_private() {
        let c = PrivacyClassifier::new();
        assert!(!c.requires_privacy("what is the weather tomorrow", &balanced()));
        assert!(!c.requires_privacy("", &balanced()));
    }

    #[test]
    fn maximum_mode_forces_privacy() {
        let c = PrivacyClassifier::new();
        let prefs = UserProcessingPreferences {
            privacy_mode: PrivacyMode::Maximum,
            ..balanced()
        };
        assert!(c.requires_privacy("play some jazz", &prefs));
    }

    #[test]
    fn performance_mode_still_honors_keywords() {
        let c = PrivacyClassifier::new();
        let prefs = UserProcessingPreferences {
            privacy_mode: PrivacyMode::Performance,
            ..balanced()
        };
        assert!(c.requires_privacy("reset my password", &prefs));
        assert!(!c.requires_privacy("play some jazz", &prefs));
    }
}
