use std::env;

use crate::dedup::ConflictPolicy;
use crate::match_convert::Phase;

#[derive(Debug, Clone)]
pub struct ConvertConfig {
    // Optional phases to attempt; base always runs.
    pub phases: Vec<Phase>,
    pub conflict_policy: ConflictPolicy,
    // Malformed records fail their phase instead of being skipped.
    pub strict: bool,
}

impl Default for ConvertConfig {
    fn default() -> Self {
        Self {
            phases: Phase::OPTIONAL.to_vec(),
            conflict_policy: ConflictPolicy::FirstWins,
            strict: false,
        }
    }
}

impl ConvertConfig {
    pub fn from_env() -> Self {
        let defaults = Self::default();
        let phases = env::var("SOFA_ROWS_PHASES")
            .ok()
            .map(|raw| parse_phases(&raw))
            .unwrap_or(defaults.phases);
        let conflict_policy = env::var("SOFA_ROWS_CONFLICT")
            .ok()
            .and_then(|raw| parse_conflict_policy(&raw))
            .unwrap_or(defaults.conflict_policy);
        let strict = env_bool("SOFA_ROWS_STRICT", defaults.strict);

        Self {
            phases,
            conflict_policy,
            strict,
        }
    }

    pub fn runs(&self, phase: Phase) -> bool {
        phase == Phase::Base || self.phases.contains(&phase)
    }
}

fn parse_phases(raw: &str) -> Vec<Phase> {
    let mut out = Vec::new();
    for part in raw.split([',', ';', ' ']) {
        let Some(phase) = Phase::from_name(part) else {
            continue;
        };
        if phase != Phase::Base && !out.contains(&phase) {
            out.push(phase);
        }
    }
    out
}

fn parse_conflict_policy(raw: &str) -> Option<ConflictPolicy> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "first" | "first_wins" | "first-wins" => Some(ConflictPolicy::FirstWins),
        "last" | "last_wins" | "last-wins" => Some(ConflictPolicy::LastWins),
        _ => None,
    }
}

fn env_bool(key: &str, default: bool) -> bool {
    env::var(key)
        .ok()
        .map(|v| {
            let t = v.trim().to_ascii_lowercase();
            !(t.is_empty() || t == "0" || t == "false" || t == "off" || t == "no")
        })
        .unwrap_or(default)
}
