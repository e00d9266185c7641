//! Rule tables for chat-risk scoring and lease scanning.
//!
//! Two independent, ordered tables: weighted [`RiskRule`]s matched against
//! chat messages, and advisory [`LeaseFlagRule`]s matched against pasted
//! lease text. The built-in tables are compiled in; operators can layer
//! `.yaml`/`.yml` files from a rules directory on top. Overlays merge by
//! rule name: same name replaces the built-in, new names append, and
//! `enabled: false` drops a rule.
//!
//! Evaluation order is table order, so merged rule sets keep a stable,
//! predictable order regardless of which file contributed a rule.

use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// A weighted scam-pattern rule for chat messages.
///
/// `pattern` is a regex tested against the lower-cased message. `score` is
/// the weight this rule contributes when it matches; the summed score is
/// clamped to 100 by the detector.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RiskRule {
    pub name: String,
    #[serde(default)]
    pub pattern: String,
    #[serde(default)]
    pub score: u32,
    /// Shown to the student when the rule fires.
    #[serde(default)]
    pub why: String,
    #[serde(default = "default_enabled")]
    pub enabled: bool,
}

/// An advisory rule for lease text. No weight — presence is the signal.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LeaseFlagRule {
    pub name: String,
    #[serde(default)]
    pub pattern: String,
    /// Shown to the student when the clause is found.
    #[serde(default)]
    pub tip: String,
    #[serde(default = "default_enabled")]
    pub enabled: bool,
}

fn default_enabled() -> bool {
    true
}

/// Top-level YAML structure for a rules file.
#[derive(Debug, Deserialize)]
pub(crate) struct RuleFile {
    #[serde(default)]
    risk_rules: Vec<RiskRule>,
    #[serde(default)]
    lease_rules: Vec<LeaseFlagRule>,
}

/// The full rule configuration: both tables, in evaluation order.
#[derive(Debug, Clone)]
pub struct RuleSet {
    pub risk: Vec<RiskRule>,
    pub lease: Vec<LeaseFlagRule>,
}

fn risk(name: &str, pattern: &str, score: u32, why: &str) -> RiskRule {
    RiskRule {
        name: name.to_string(),
        pattern: pattern.to_string(),
        score,
        why: why.to_string(),
        enabled: true,
    }
}

fn lease(name: &str, pattern: &str, tip: &str) -> LeaseFlagRule {
    LeaseFlagRule {
        name: name.to_string(),
        pattern: pattern.to_string(),
        tip: tip.to_string(),
        enabled: true,
    }
}

impl RuleSet {
    /// The built-in tables. These alone reproduce the shipped behavior.
    pub fn builtin() -> Self {
        Self {
            risk: vec![
                risk(
                    "Deposit before viewing",
                    r"\b(deposit|down\s*payment|first\s*month)\b.*\b(before|prior)\b.*\b(viewing|tour|see)\b|\bbefore\s*(you\s*)?(see|view)\b.*\bdeposit\b",
                    45,
                    "Asking for money before you view is a common scam pattern.",
                ),
                risk(
                    "Urgency language",
                    r"\b(today\s*only|right\s*now|immediately|asap|many\s+people|lots\s+of\s+interest|someone\s+else|last\s+chance|hold\s+it\s+for\s+you)\b",
                    25,
                    "Artificial urgency pressures students into irreversible mistakes.",
                ),
                risk(
                    "Off-platform payment",
                    r"\b(whatsapp|telegram|wire\s*transfer|gift\s*card|western\s*union|crypto|bitcoin|pay\s*outside|cash\s*only)\b",
                    40,
                    "Off-platform payment is harder to dispute and often used in scams.",
                ),
            ],
            lease: vec![
                lease(
                    "Deposit wording risk",
                    r"\b(non\s*refundable|nonrefundable|security\s*deposit|key\s*deposit)\b",
                    "If it says 'non-refundable' or 'security deposit', double-check local rules and ask for a written receipt/terms.",
                ),
                lease(
                    "Sublet clause unclear",
                    r"\b(sublet|sublease)\b",
                    "If subletting is forbidden or vague, you may be stuck if plans change.",
                ),
                lease(
                    "Notice / termination mentioned",
                    r"\b(notice|termination)\b",
                    "Make sure notice period matches local rules and your expected stay.",
                ),
                lease(
                    "Missing identifiers risk",
                    r"\b(landlord\s*name|owner|address|unit)\b",
                    "A valid lease should clearly identify the unit + landlord/owner.",
                ),
            ],
        }
    }

    /// Built-in tables overlaid with every `.yaml`/`.yml` file in `dir`.
    ///
    /// Files are applied with `default*` names first, then alphabetical, so
    /// site-specific files win over a shipped default file. A missing
    /// directory is not an error — you get the built-in tables.
    pub fn load(dir: &Path) -> Result<Self> {
        let mut set = Self::builtin();
        if !dir.exists() {
            return Ok(set);
        }

        let entries = std::fs::read_dir(dir)
            .with_context(|| format!("Failed to read rules dir: {}", dir.display()))?;

        let mut files: Vec<_> = entries
            .filter_map(|e| e.ok())
            .filter(|e| {
                matches!(
                    e.path().extension().and_then(|ext| ext.to_str()),
                    Some("yaml") | Some("yml")
                )
            })
            .collect();

        files.sort_by(|a, b| {
            let a_name = a.file_name();
            let b_name = b.file_name();
            let a_is_default = a_name.to_str().map(|s| s.starts_with("default")).unwrap_or(false);
            let b_is_default = b_name.to_str().map(|s| s.starts_with("default")).unwrap_or(false);
            match (a_is_default, b_is_default) {
                (true, false) => std::cmp::Ordering::Less,
                (false, true) => std::cmp::Ordering::Greater,
                _ => a_name.cmp(&b_name),
            }
        });

        for entry in files {
            let path = entry.path();
            let content = std::fs::read_to_string(&path)
                .with_context(|| format!("Failed to read {}", path.display()))?;
            let rf: RuleFile = serde_yaml::from_str(&content)
                .with_context(|| format!("Failed to parse {}", path.display()))?;
            set.overlay(rf);
        }

        tracing::debug!(
            risk_rules = set.risk.len(),
            lease_rules = set.lease.len(),
            "rule tables loaded"
        );
        Ok(set)
    }

    fn overlay(&mut self, rf: RuleFile) {
        self.risk = merge_by_name(std::mem::take(&mut self.risk), rf.risk_rules);
        self.lease = merge_by_name(std::mem::take(&mut self.lease), rf.lease_rules);
    }
}

trait NamedRule {
    fn name(&self) -> &str;
    fn enabled(&self) -> bool;
}

impl NamedRule for RiskRule {
    fn name(&self) -> &str {
        &self.name
    }
    fn enabled(&self) -> bool {
        self.enabled
    }
}

impl NamedRule for LeaseFlagRule {
    fn name(&self) -> &str {
        &self.name
    }
    fn enabled(&self) -> bool {
        self.enabled
    }
}

/// Merge override rules onto base rules by name.
/// Same name = override replaces base. New names = appended.
/// Disabled rules (enabled: false) are filtered out.
fn merge_by_name<R: NamedRule>(base: Vec<R>, overrides: Vec<R>) -> Vec<R> {
    let mut merged = base;
    for override_rule in overrides {
        if let Some(pos) = merged.iter().position(|r| r.name() == override_rule.name()) {
            merged[pos] = override_rule;
        } else {
            merged.push(override_rule);
        }
    }
    merged.retain(|r| r.enabled());
    merged
}
