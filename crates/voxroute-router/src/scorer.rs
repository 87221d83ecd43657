// SPDX-FileCopyrightText: 2026 Voxroute Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Location selection, confidence, and reasoning.
//!
//! Ordered overrides are evaluated first; the first rule that matches wins.
//! Queries that no override claims fall through to balanced scoring of the
//! on-device, server, and hybrid candidates.

use voxroute_core::{
    clamp_unit, DecisionRule, NetworkConditions, NetworkQuality, PrivacyMode, ProcessingLocation,
    ResourceConstraints, UserProcessingPreferences,
};

/// Reasoning clauses appended after the opening statement.
const MAX_REASON_CLAUSES: usize = 3;

/// Hybrid is only chosen above this score, even when it is the highest.
const HYBRID_FLOOR: f64 = 0.6;

/// Everything the scorer needs for one query.
#[derive(Debug, Clone, Copy)]
pub struct ScoringInputs<'a> {
    pub complexity: f64,
    pub capability: f64,
    pub privacy_required: bool,
    pub constraints: &'a ResourceConstraints,
    pub network: &'a NetworkConditions,
    pub preferences: &'a UserProcessingPreferences,
}

impl ScoringInputs<'_> {
    fn quality(&self) -> NetworkQuality {
        self.constraints.network_quality
    }
}

/// Candidate scores computed by the balanced branch.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CandidateScores {
    pub on_device: f64,
    pub server: f64,
    pub hybrid: f64,
}

/// Output of [`DecisionScorer::score`].
#[derive(Debug, Clone, PartialEq)]
pub struct ScoredDecision {
    pub location: ProcessingLocation,
    pub rule: DecisionRule,
    pub confidence: f64,
    /// Never empty; the first entry names the chosen location.
    pub reasoning: Vec<String>,
    /// Present only when balanced scoring decided.
    pub candidates: Option<CandidateScores>,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct DecisionScorer;

impl DecisionScorer {
    pub fn new() -> Self {
        Self
    }

    pub fn score(&self, inputs: &ScoringInputs<'_>) -> ScoredDecision {
        let (location, rule, candidates) = match Self::apply_overrides(inputs) {
            Some((location, rule)) => (location, rule, None),
            None => {
                let candidates = Self::balanced_scores(inputs);
                (Self::select(&candidates), DecisionRule::Balanced, Some(candidates))
            }
        };

        ScoredDecision {
            location,
            rule,
            confidence: Self::confidence(location, inputs),
            reasoning: Self::reasoning(location, rule, inputs),
            candidates,
        }
    }

    /// Rules 1 through 6. `None` means balanced scoring decides.
    fn apply_overrides(inputs: &ScoringInputs<'_>) -> Option<(ProcessingLocation, DecisionRule)> {
        use ProcessingLocation::{Fallback, OnDevice, Server};

        let cap = inputs.capability;
        let quality = inputs.quality();
        let prefs = inputs.preferences;

        if inputs.privacy_required && cap > 0.3 {
            return Some((OnDevice, DecisionRule::PrivacyOverride));
        }

        if quality == NetworkQuality::Unavailable {
            let location = if cap > 0.2 { OnDevice } else { Fallback };
            return Some((location, DecisionRule::NoNetwork));
        }

        if cap < 0.2 {
            let location = if quality.is_available() { Server } else { Fallback };
            return Some((location, DecisionRule::LowCapability));
        }

        if inputs.complexity > 0.7 && quality == NetworkQuality::Poor {
            let location = if cap > 0.5 { OnDevice } else { Fallback };
            return Some((location, DecisionRule::ComplexOnPoorNetwork));
        }

        if prefs.battery_optimization && inputs.constraints.battery_level < 0.3 {
            let location = if quality >= NetworkQuality::Good {
                Server
            } else {
                Fallback
            };
            return Some((location, DecisionRule::BatteryOptimization));
        }

        match prefs.privacy_mode {
            PrivacyMode::Maximum => {
                let location = if cap > 0.3 { OnDevice } else { Fallback };
                Some((location, DecisionRule::PrivacyModeMaximum))
            }
            PrivacyMode::Performance => {
                let location = if quality >= NetworkQuality::Good {
                    Server
                } else {
                    OnDevice
                };
                Some((location, DecisionRule::PrivacyModePerformance))
            }
            PrivacyMode::Balanced => None,
        }
    }

    fn balanced_scores(inputs: &ScoringInputs<'_>) -> CandidateScores {
        let complexity = inputs.complexity;
        let constraints = inputs.constraints;

        let mut on_device = inputs.capability;
        if complexity < 0.3 {
            on_device += 0.2;
        }
        if constraints.battery_level < 0.2 {
            on_device -= 0.3;
        }
        if constraints.thermal_state.is_elevated() {
            on_device -= 0.2;
        }
        let on_device = on_device.max(0.0);

        let mut server: f64 = 0.7;
        if complexity > 0.6 {
            server += 0.2;
        }
        server += match inputs.quality() {
            NetworkQuality::Excellent => 0.2,
            NetworkQuality::Good => 0.1,
            NetworkQuality::Fair => -0.1,
            NetworkQuality::Poor => -0.3,
            NetworkQuality::Unavailable => 0.0,
        };
        if inputs.privacy_required {
            server -= 0.4;
        }
        if inputs.network.is_metered {
            server -= 0.2;
        }
        let server = if inputs.quality().is_available() {
            server.max(0.0)
        } else {
            0.0
        };

        let moderate_bonus = if complexity > 0.3 && complexity < 0.7 {
            0.1
        } else {
            0.0
        };
        let hybrid =
            on_device.min(server) * 0.7 + (on_device + server) / 2.0 * 0.3 + moderate_bonus;

        CandidateScores {
            on_device,
            server,
            hybrid,
        }
    }

    fn select(scores: &CandidateScores) -> ProcessingLocation {
        let best = scores.on_device.max(scores.server).max(scores.hybrid);
        if scores.hybrid == best && scores.hybrid > HYBRID_FLOOR {
            ProcessingLocation::Hybrid
        } else if scores.on_device == best {
            ProcessingLocation::OnDevice
        } else if scores.server == best {
            ProcessingLocation::Server
        } else {
            ProcessingLocation::Fallback
        }
    }

    fn confidence(location: ProcessingLocation, inputs: &ScoringInputs<'_>) -> f64 {
        let mut confidence: f64 = 0.5;
        match location {
            ProcessingLocation::OnDevice => {
                confidence += inputs.capability * 0.3;
                if inputs.privacy_required {
                    confidence += 0.2;
                }
                if inputs.constraints.battery_level > 0.5 {
                    confidence += 0.1;
                }
                if inputs.complexity < 0.5 {
                    confidence += 0.1;
                }
            }
            ProcessingLocation::Server => {
                confidence += match inputs.quality() {
                    NetworkQuality::Excellent => 0.3,
                    NetworkQuality::Good => 0.2,
                    _ => 0.0,
                };
                if inputs.complexity > 0.6 {
                    confidence += 0.2;
                }
                if !inputs.privacy_required {
                    confidence += 0.1;
                }
            }
            ProcessingLocation::Hybrid => {
                let network_rank = inputs.quality().normalized_rank().min(0.8);
                confidence += (inputs.capability + network_rank) * 0.15;
            }
            ProcessingLocation::Fallback => confidence = 0.3,
        }
        clamp_unit(confidence)
    }

    fn reasoning(
        location: ProcessingLocation,
        rule: DecisionRule,
        inputs: &ScoringInputs<'_>,
    ) -> Vec<String> {
        let mut clauses: Vec<&'static str> = Vec::new();
        if let Some(clause) = Self::rule_clause(rule, location) {
            clauses.push(clause);
        }
        clauses.extend(Self::location_clauses(location, inputs));

        let mut reasoning = vec![format!("{} processing selected", location.label())];
        for clause in clauses {
            if reasoning.len() > MAX_REASON_CLAUSES {
                break;
            }
            if !reasoning.iter().any(|r| r == clause) {
                reasoning.push(clause.to_string());
            }
        }
        reasoning
    }

    fn rule_clause(rule: DecisionRule, location: ProcessingLocation) -> Option<&'static str> {
        match rule {
            DecisionRule::PrivacyOverride => Some("Privacy-sensitive content detected"),
            DecisionRule::NoNetwork => Some("No network connection available"),
            DecisionRule::LowCapability => Some("Limited on-device capability"),
            DecisionRule::ComplexOnPoorNetwork => Some("Complex query on a poor network"),
            DecisionRule::BatteryOptimization => Some("Low battery, offloading to save power"),
            DecisionRule::PrivacyModeMaximum => Some("Maximum privacy mode enabled"),
            DecisionRule::PrivacyModePerformance if location == ProcessingLocation::Server => {
                Some("Performance mode enabled")
            }
            DecisionRule::PrivacyModePerformance => {
                Some("Performance mode enabled but network is not good enough")
            }
            DecisionRule::Balanced | DecisionRule::StaticFallback => None,
        }
    }

    fn location_clauses(
        location: ProcessingLocation,
        inputs: &ScoringInputs<'_>,
    ) -> Vec<&'static str> {
        let mut clauses = Vec::new();
        match location {
            ProcessingLocation::OnDevice => {
                if inputs.privacy_required {
                    clauses.push("Privacy-sensitive content detected");
                }
                if inputs.complexity < 0.3 {
                    clauses.push("Simple query suitable for on-device processing");
                }
                if inputs.capability > 0.7 {
                    clauses.push("High on-device capability");
                }
            }
            ProcessingLocation::Server => {
                match inputs.quality() {
                    NetworkQuality::Excellent => clauses.push("Excellent network conditions"),
                    NetworkQuality::Good => clauses.push("Good network conditions"),
                    _ => {}
                }
                if inputs.complexity > 0.6 {
                    clauses.push("Complex query benefits from server processing");
                }
                if inputs.capability < 0.2 {
                    clauses.push("Limited on-device capability");
                }
            }
            ProcessingLocation::Hybrid => {
                if inputs.complexity > 0.3 && inputs.complexity < 0.7 {
                    clauses.push("Moderate complexity suits split processing");
                }
                clauses.push("Device and network resources are both usable");
            }
            ProcessingLocation::Fallback => {
                if !inputs.quality().is_available() {
                    clauses.push("No network connection available");
                }
                if inputs.capability <= 0.2 {
                    clauses.push("Limited on-device capability");
                }
            }
        }
        clauses
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use voxroute_core::ThermalState;

    struct Fixture {
        constraints: ResourceConstraints,
        network: NetworkConditions,
        preferences: UserProcessingPreferences,
    }

    impl Fixture {
        fn new(quality: NetworkQuality) -> Self {
            Self {
                constraints: ResourceConstraints {
                    battery_level: 1.0,
                    network_quality: quality,
                    memory_pressure: 0.1,
                    thermal_state: ThermalState::Nominal,
                },
                network: NetworkConditions::for_quality(quality, false),
                preferences: UserProcessingPreferences::default(),
            }
        }

        fn score(&self, complexity: f64, capability: f64, privacy_required: bool) -> ScoredDecision {
            DecisionScorer::new().score(&ScoringInputs {
                complexity,
                capability,
                privacy_required,
                constraints: &self.constraints,
                network: &self.network,
                preferences: &self.preferences,
            })
        }
    }

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn privacy_override_beats_excellent_network() {
        let f = Fixture::new(NetworkQuality::Excellent);
        let d = f.score(0.9, 0.35, true);
        assert_eq!(d.location, ProcessingLocation::OnDevice);
        assert_eq!(d.rule, DecisionRule::PrivacyOverride);
        assert_eq!(d.reasoning[0], "On-device processing selected");
        assert!(d.reasoning.contains(&"Privacy-sensitive content detected".to_string()));
    }

    #[test]
    fn no_network_routes_by_capability() {
        let f = Fixture::new(NetworkQuality::Unavailable);
        let d = f.score(0.5, 0.25, false);
        assert_eq!(d.location, ProcessingLocation::OnDevice);
        assert_eq!(d.rule, DecisionRule::NoNetwork);

        let d = f.score(0.5, 0.1, false);
        assert_eq!(d.location, ProcessingLocation::Fallback);
        assert_eq!(d.confidence, 0.3);
        assert!(d.reasoning.contains(&"No network connection available".to_string()));
    }

    #[test]
    fn low_capability_goes_to_server() {
        let f = Fixture::new(NetworkQuality::Fair);
        let d = f.score(0.5, 0.1, false);
        assert_eq!(d.location, ProcessingLocation::Server);
        assert_eq!(d.rule, DecisionRule::LowCapability);
        // base 0.5 + not private 0.1
        assert!(approx(d.confidence, 0.6));
    }

    #[test]
    fn complex_query_on_poor_network() {
        let f = Fixture::new(NetworkQuality::Poor);
        assert_eq!(f.score(0.8, 0.6, false).location, ProcessingLocation::OnDevice);
        let d = f.score(0.8, 0.4, false);
        assert_eq!(d.location, ProcessingLocation::Fallback);
        assert_eq!(d.rule, DecisionRule::ComplexOnPoorNetwork);
    }

    #[test]
    fn battery_optimization_offloads_when_network_allows() {
        let mut f = Fixture::new(NetworkQuality::Good);
        f.constraints.battery_level = 0.25;
        let d = f.score(0.2, 0.8, false);
        assert_eq!(d.location, ProcessingLocation::Server);
        assert_eq!(d.rule, DecisionRule::BatteryOptimization);

        f.constraints.network_quality = NetworkQuality::Fair;
        assert_eq!(f.score(0.2, 0.8, false).location, ProcessingLocation::Fallback);

        f.preferences.battery_optimization = false;
        assert_ne!(f.score(0.2, 0.8, false).rule, DecisionRule::BatteryOptimization);
    }

    #[test]
    fn privacy_mode_shortcuts() {
        let mut f = Fixture::new(NetworkQuality::Excellent);
        f.preferences.privacy_mode = PrivacyMode::Maximum;
        let d = f.score(0.5, 0.5, false);
        assert_eq!(d.location, ProcessingLocation::OnDevice);
        assert_eq!(d.rule, DecisionRule::PrivacyModeMaximum);

        f.preferences.privacy_mode = PrivacyMode::Performance;
        assert_eq!(f.score(0.1, 0.9, false).location, ProcessingLocation::Server);

        f.constraints.network_quality = NetworkQuality::Fair;
        let d = f.score(0.1, 0.9, false);
        assert_eq!(d.location, ProcessingLocation::OnDevice);
        assert_eq!(d.rule, DecisionRule::PrivacyModePerformance);
    }

    #[test]
    fn balanced_simple_query_stays_on_device() {
        let f = Fixture::new(NetworkQuality::Excellent);
        // on = 0.9 + 0.2 = 1.1, server = 0.9, hybrid = 0.63 + 0.3 = 0.93
        let d = f.score(0.2, 0.9, false);
        assert_eq!(d.rule, DecisionRule::Balanced);
        assert_eq!(d.location, ProcessingLocation::OnDevice);
        let c = d.candidates.unwrap();
        assert!(approx(c.on_device, 1.1));
        assert!(approx(c.server, 0.9));
        // 0.5 + 0.27 + 0.1 + 0.1
        assert!(approx(d.confidence, 0.97));
    }

    #[test]
    fn balanced_complex_query_goes_to_server() {
        let f = Fixture::new(NetworkQuality::Excellent);
        let d = f.score(0.8, 0.4, false);
        assert_eq!(d.location, ProcessingLocation::Server);
        let c = d.candidates.unwrap();
        assert!(approx(c.server, 1.1));
        // 0.5 + 0.3 excellent + 0.2 complex + 0.1 not private, clamped
        assert_eq!(d.confidence, 1.0);
        assert!(d.reasoning.contains(&"Excellent network conditions".to_string()));
    }

    #[test]
    fn hybrid_needs_to_win_and_clear_the_floor() {
        let mut f = Fixture::new(NetworkQuality::Fair);
        f.network.is_metered = false;
        // on = 0.65, server = 0.6, hybrid = 0.42 + 0.1875 + 0.1 = 0.7075
        let d = f.score(0.5, 0.65, false);
        assert_eq!(d.location, ProcessingLocation::Hybrid);
        // 0.5 + (0.65 + 0.5) * 0.15
        assert!(approx(d.confidence, 0.6725));

        // on = 0.45, server = 0.4, hybrid = 0.28 + 0.1275 + 0.1 = 0.5075:
        // hybrid is highest but under the floor, so neither single location matches.
        let mut f = Fixture::new(NetworkQuality::Fair);
        f.network.is_metered = true;
        let d = f.score(0.5, 0.45, false);
        assert_eq!(d.location, ProcessingLocation::Fallback);
        assert_eq!(d.confidence, 0.3);
    }

    #[test]
    fn hybrid_confidence_caps_network_rank() {
        let f = Fixture::new(NetworkQuality::Excellent);
        let inputs = ScoringInputs {
            complexity: 0.5,
            capability: 1.0,
            privacy_required: false,
            constraints: &f.constraints,
            network: &f.network,
            preferences: &f.preferences,
        };
        let c = DecisionScorer::confidence(ProcessingLocation::Hybrid, &inputs);
        assert!(approx(c, 0.5 + 1.8 * 0.15));
    }

    #[test]
    fn reasoning_is_bounded_and_unique() {
        let f = Fixture::new(NetworkQuality::Excellent);
        let d = f.score(0.1, 0.9, true);
        assert!(d.reasoning.len() <= 1 + MAX_REASON_CLAUSES);
        let mut sorted = d.reasoning.clone();
        sorted.sort();
        sorted.dedup();
        assert_eq!(sorted.len(), d.reasoning.len());
    }
}
