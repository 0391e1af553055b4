//! Keyword-based rule lookup.
//!
//! Rule sets carry free-form JSON: either a list of objects with a
//! "keyword" field, or a map keyed by keyword. The check scans all rule
//! sets in store order and returns the first hit.

use crate::store::WorldStore;
use serde_json::Value;

/// Result of a rule check.
#[derive(Debug, Clone)]
pub struct RuleCheck {
    pub outcome: RuleOutcome,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq)]
pub enum RuleOutcome {
    /// A rule matched; carries the owning rule set name and the rule body.
    Found { ruleset: String, detail: Value },
    NotFound,
    NoRuleSets,
    Error,
}

impl RuleCheck {
    /// Render the reply string for the "check rule for:" command path.
    pub fn render(&self, keyword: &str) -> String {
        let mut out = format!("Rule check for '{keyword}': {}", self.message);
        if let RuleOutcome::Found { detail, .. } = &self.outcome {
            out.push_str(&format!(" Details: {detail}"));
        }
        out
    }
}

/// Look up the rule for an action keyword across all rule sets.
///
/// A store failure or a malformed rule set never panics; malformed rule
/// sets are skipped and a store failure yields an `Error` outcome.
pub fn check_rule(store: &dyn WorldStore, keyword: &str) -> RuleCheck {
    let rule_sets = match store.rule_sets() {
        Ok(sets) => sets,
        Err(e) => {
            tracing::warn!(error = %e, "rule set lookup failed");
            return RuleCheck {
                outcome: RuleOutcome::Error,
                message: format!("An error occurred while checking rules for '{keyword}'."),
            };
        }
    };

    if rule_sets.is_empty() {
        return RuleCheck {
            outcome: RuleOutcome::NoRuleSets,
            message: "No rule sets found in the database.".into(),
        };
    }

    for ruleset in &rule_sets {
        if let Some(detail) = find_in_rules(&ruleset.rules, keyword) {
            return RuleCheck {
                outcome: RuleOutcome::Found {
                    ruleset: ruleset.name.clone(),
                    detail: detail.clone(),
                },
                message: format!(
                    "Rule for '{keyword}' found in rule set '{}'.",
                    ruleset.name
                ),
            };
        }
    }

    RuleCheck {
        outcome: RuleOutcome::NotFound,
        message: format!("No specific rule found for action '{keyword}' across all rule sets."),
    }
}

fn find_in_rules<'a>(rules: &'a Value, keyword: &str) -> Option<&'a Value> {
    match rules {
        Value::Array(list) => list
            .iter()
            .find(|rule| rule.get("keyword").and_then(Value::as_str) == Some(keyword)),
        Value::Object(map) => map.get(keyword),
        _ => None,
    }
}
