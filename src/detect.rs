// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2026 Nestguard Authors

//! Scam detection over free text.
//!
//! Scans chat messages against the weighted risk-rule table and lease text
//! against the advisory flag table. Patterns are compiled once at engine
//! construction; a pattern that fails to compile is skipped with a warning
//! and the rest of the table still evaluates.
//!
//! Both scans are pure: lower-case the text, test every rule in table
//! order, report what matched. Chat scoring sums the matched weights and
//! clamps to [`MAX_RISK_SCORE`]. Empty input is "no content" — zero score,
//! no matches, never an error.

use std::path::Path;

use anyhow::Result;
use regex::Regex;

use crate::rules::{LeaseFlagRule, RiskRule, RuleSet};

/// Upper bound for a chat-risk score.
pub const MAX_RISK_SCORE: u32 = 100;

/// Result of scoring one chat message.
///
/// `matches` is in rule-table order, not score order.
#[derive(Debug, Clone, Default)]
pub struct ChatRisk {
    pub score: u32,
    pub matches: Vec<RiskRule>,
}

impl ChatRisk {
    /// True when the host should surface a scam interrupt.
    pub fn is_risky(&self) -> bool {
        !self.matches.is_empty()
    }
}

struct CompiledRiskRule {
    rule: RiskRule,
    regex: Regex,
}

struct CompiledLeaseRule {
    rule: LeaseFlagRule,
    regex: Regex,
}

/// Compiled rule tables, ready to evaluate.
///
/// Immutable after construction and internally `Send + Sync`, so one engine
/// can serve every evaluation in a session (or process).
pub struct RiskEngine {
    risk: Vec<CompiledRiskRule>,
    lease: Vec<CompiledLeaseRule>,
}

impl RiskEngine {
    /// Engine over the built-in rule tables.
    pub fn new() -> Self {
        Self::from_rules(RuleSet::builtin())
    }

    /// Engine over built-in tables overlaid with YAML files from `dir`.
    pub fn load(dir: &Path) -> Result<Self> {
        Ok(Self::from_rules(RuleSet::load(dir)?))
    }

    /// Compile a rule set. Rules whose pattern fails to compile are skipped.
    pub fn from_rules(rules: RuleSet) -> Self {
        let mut risk = Vec::new();
        for rule in rules.risk {
            match Regex::new(&rule.pattern) {
                Ok(regex) => risk.push(CompiledRiskRule { rule, regex }),
                Err(e) => {
                    tracing::warn!("Skipping risk rule '{}': bad pattern: {}", rule.name, e);
                }
            }
        }

        let mut lease = Vec::new();
        for rule in rules.lease {
            match Regex::new(&rule.pattern) {
                Ok(regex) => lease.push(CompiledLeaseRule { rule, regex }),
                Err(e) => {
                    tracing::warn!("Skipping lease rule '{}': bad pattern: {}", rule.name, e);
                }
            }
        }

        Self { risk, lease }
    }

    /// Score a chat message against the risk table.
    pub fn detect_chat_risk(&self, message: &str) -> ChatRisk {
        if message.trim().is_empty() {
            return ChatRisk::default();
        }

        let text = message.to_lowercase();
        let mut matches = Vec::new();
        let mut total: u32 = 0;
        for compiled in &self.risk {
            if compiled.regex.is_match(&text) {
                total = total.saturating_add(compiled.rule.score);
                matches.push(compiled.rule.clone());
            }
        }

        ChatRisk {
            score: total.min(MAX_RISK_SCORE),
            matches,
        }
    }

    /// Scan lease text for advisory flags. Presence only, no scoring.
    pub fn scan_lease_text(&self, text: &str) -> Vec<LeaseFlagRule> {
        if text.trim().is_empty() {
            return Vec::new();
        }

        let lowered = text.to_lowercase();
        self.lease
            .iter()
            .filter(|c| c.regex.is_match(&lowered))
            .map(|c| c.rule.clone())
            .collect()
    }

    /// Number of compiled risk rules.
    pub fn risk_rule_count(&self) -> usize {
        self.risk.len()
    }

    /// Number of compiled lease rules.
    pub fn lease_rule_count(&self) -> usize {
        self.lease.len()
    }
}

impl Default for RiskEngine {
    fn default() -> Self {
        Self::new()
    }
}
