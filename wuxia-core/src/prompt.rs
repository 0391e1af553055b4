//! Prompt composition.
//!
//! Deterministically merges the persona text, the assembled context
//! fragments, the optional declared-action block, and the verbatim
//! player utterance into the two strings handed to the generation
//! backend as the system and user turns. Composition never calls the
//! backend itself.

use crate::action::ActionContextBlock;
use crate::model::GuidelineSet;

const PERSONA_BASE: &str = "You are a Dungeon Master (DM) for a wuxia-style text role-playing \
     game. Your goal is to narrate events, describe scenes, play NPCs, and respond to the \
     player's actions creatively and consistently with the world and the provided guidelines.";

/// The two halves of a chat exchange, ready for the generator.
#[derive(Debug, Clone, PartialEq)]
pub struct Prompt {
    /// System turn: the DM persona.
    pub persona: String,
    /// User turn: context, action block, and the player's words.
    pub body: String,
}

/// Compose the persona and body for one turn.
pub fn compose(
    guidelines: Option<&GuidelineSet>,
    fragments: &[String],
    action: Option<&ActionContextBlock>,
    utterance: &str,
) -> Prompt {
    let mut persona = PERSONA_BASE.to_string();
    if let Some(system_base) = guidelines.and_then(|g| g.system_base.as_deref()) {
        persona.push_str(&format!(" The base game system is: {system_base}."));
    }

    let context = fragments
        .iter()
        .map(|f| format!("- {f}"))
        .collect::<Vec<_>>()
        .join("\n");
    let action_block = action.map(|a| a.render()).unwrap_or_default();

    let body = format!(
        "[WORLD CONTEXT AND GUIDELINES]\n{context}\n{action_block}\n---\n\
         The player says: \"{utterance}\"\n\n\
         DM response (narrating as an AI Dungeon Master):"
    );

    Prompt { persona, body }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::TechniqueRecord;

    #[test]
    fn test_persona_without_guidelines() {
        let prompt = compose(None, &[], None, "hello");
        assert_eq!(prompt.persona, PERSONA_BASE);
    }

    #[test]
    fn test_persona_appends_system_base() {
        let g = GuidelineSet {
            name: "G".into(),
            tone_style: None,
            tone_focus: None,
            dice_roll_rules: None,
            system_base: Some("Custom D&D 5e hybrid".into()),
        };
        let prompt = compose(Some(&g), &[], None, "hello");
        assert!(prompt
            .persona
            .ends_with("The base game system is: Custom D&D 5e hybrid."));
    }

    #[test]
    fn test_body_well_formed_with_no_fragments() {
        let prompt = compose(None, &[], None, "What do I see?");
        assert!(!prompt.body.is_empty());
        assert!(prompt.body.starts_with("[WORLD CONTEXT AND GUIDELINES]"));
        assert!(prompt.body.contains("The player says: \"What do I see?\""));
        assert!(prompt
            .body
            .ends_with("DM response (narrating as an AI Dungeon Master):"));
    }

    #[test]
    fn test_fragments_are_bulleted_in_order() {
        let fragments = vec!["first".to_string(), "second".to_string()];
        let prompt = compose(None, &fragments, None, "go");
        assert!(prompt.body.contains("- first\n- second"));
    }

    #[test]
    fn test_action_block_included_verbatim() {
        let block = ActionContextBlock {
            technique: TechniqueRecord {
                name: "Iron Palm".into(),
                rank: None,
                element: None,
                mana_cost: Some(10),
                description: None,
                damage: None,
            },
            keyword: "use ",
        };
        let prompt = compose(None, &[], Some(&block), "I use Iron Palm");
        assert!(prompt.body.contains("[TECHNIQUE ACTION DECLARED BY THE PLAYER]"));
        assert!(prompt.body.contains("Technique: Iron Palm"));
    }

    #[test]
    fn test_compose_is_deterministic() {
        let fragments = vec!["a".to_string()];
        let one = compose(None, &fragments, None, "same input");
        let two = compose(None, &fragments, None, "same input");
        assert_eq!(one, two);
    }
}
