//! Declared-action detection.
//!
//! Scans the player's utterance for an action-declaring keyword,
//! extracts a candidate technique name, and resolves it against the
//! focus character's known techniques, then the general repository.
//!
//! The matching is deliberately heuristic and is preserved as-is:
//! priority-ordered substring scan, a 4-token candidate cap, trailing
//! punctuation strip, substring-then-exact resolution. Behavior, not
//! accuracy, is the contract.

use crate::model::{KnownTechniqueLink, TechniqueRecord};
use crate::store::WorldStore;

/// Action keywords in priority order. The trailing space keeps "use "
/// from firing inside words like "house".
const ACTION_KEYWORDS: [&str; 5] = ["use ", "activate ", "cast ", "employ ", "perform "];

/// Maximum number of whitespace tokens taken as the candidate name.
const MAX_CANDIDATE_TOKENS: usize = 4;

/// Ephemeral context for a technique the player declared using.
#[derive(Debug, Clone)]
pub struct ActionContextBlock {
    pub technique: TechniqueRecord,
    /// The literal keyword that triggered detection.
    pub keyword: &'static str,
}

impl ActionContextBlock {
    /// Render the declared-action text injected into the prompt body.
    pub fn render(&self) -> String {
        let tech = &self.technique;
        let cost = tech
            .mana_cost
            .map(|c| c.to_string())
            .unwrap_or_else(|| "N/A".to_string());
        format!(
            "\n[TECHNIQUE ACTION DECLARED BY THE PLAYER]\n\
             Technique: {} (Rank: {}, Element: {})\n\
             Description: {}\n\
             Effects/Damage: {}\n\
             Mana cost: {}\n\
             Narrate the activation and immediate outcome of this technique. \
             Assume a successful result or describe plausible consequences if the situation \
             warrants it. Dice rolls and final rule validation are handled by the separate \
             game system.",
            tech.name,
            tech.rank.as_deref().unwrap_or("N/A"),
            tech.element.as_deref().unwrap_or("N/A"),
            tech.description.as_deref().unwrap_or("Not detailed."),
            tech.damage.as_deref().unwrap_or("Not specified."),
            cost,
        )
    }
}

/// Extract the candidate technique name from an utterance, if any
/// action keyword is present.
///
/// The first keyword in priority order that occurs anywhere in the
/// lower-cased utterance wins; the text after its first occurrence is
/// capped at four tokens with trailing '.' and '!' stripped. The result
/// is lower-cased.
pub fn extract_candidate(utterance: &str) -> Option<(String, &'static str)> {
    let lower = utterance.to_lowercase();
    for keyword in ACTION_KEYWORDS {
        if let Some(pos) = lower.find(keyword) {
            let tail = &lower[pos + keyword.len()..];
            let candidate = tail
                .split_whitespace()
                .take(MAX_CANDIDATE_TOKENS)
                .collect::<Vec<_>>()
                .join(" ");
            let candidate = candidate.trim_end_matches(['.', '!']).trim().to_string();
            if candidate.is_empty() {
                return None;
            }
            return Some((candidate, keyword));
        }
    }
    None
}

/// Resolve a candidate name to a concrete technique.
///
/// Known techniques are checked first with a case-insensitive substring
/// match, in the character's iteration order; only then is the general
/// repository tried with an exact name lookup. A store failure degrades
/// to "no technique".
pub fn resolve_technique(
    candidate: &str,
    known: &[KnownTechniqueLink],
    store: &dyn WorldStore,
) -> Option<TechniqueRecord> {
    let needle = candidate.to_lowercase();
    for link in known {
        if link.technique.name.to_lowercase().contains(&needle) {
            return Some(link.technique.clone());
        }
    }

    match store.technique(candidate) {
        Ok(found) => found,
        Err(e) => {
            tracing::warn!(candidate, error = %e, "technique lookup failed");
            None
        }
    }
}

/// Run the full interpretation for one utterance: detect a declared
/// action and build its context block, or nothing.
pub fn interpret(
    utterance: &str,
    known: &[KnownTechniqueLink],
    store: &dyn WorldStore,
) -> Option<ActionContextBlock> {
    let (candidate, keyword) = extract_candidate(utterance)?;
    let technique = resolve_technique(&candidate, known, store)?;
    Some(ActionContextBlock { technique, keyword })
}
