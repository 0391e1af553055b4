//! The DM agent.
//!
//! One invocation per player turn: lookups and the generation call run
//! sequentially, the agent holds no mutable state, and every path
//! returns a string. The guideline set is loaded once at construction
//! and treated as immutable for the session.

use crate::action;
use crate::config::{DEFAULT_FOCUS_CHARACTER, DEFAULT_GUIDELINE_NAME};
use crate::context::assemble_context;
use crate::generate::{fallback_message, Generator};
use crate::model::GuidelineSet;
use crate::prompt::compose;
use crate::rules::check_rule;
use crate::store::WorldStore;
use std::sync::Arc;

/// Command prefix that routes straight to the rules lookup.
const RULE_COMMAND: &str = "check rule for:";

/// Returned whenever generation is requested but no backend is configured.
const UNAVAILABLE: &str =
    "Error: AI functionality is not available. Check API key configuration.";

const STORYTELLER_PERSONA: &str = "You are a master storyteller for a role-playing game, \
     skilled in creating vivid and engaging descriptions. Focus on being concise yet evocative.";

/// Configuration for the DM agent.
#[derive(Debug, Clone)]
pub struct DmConfig {
    /// Name of the guideline set loaded at startup.
    pub guideline_name: String,
    /// The character whose data is always pulled into context.
    pub focus_character: String,
}

impl Default for DmConfig {
    fn default() -> Self {
        Self {
            guideline_name: DEFAULT_GUIDELINE_NAME.to_string(),
            focus_character: DEFAULT_FOCUS_CHARACTER.to_string(),
        }
    }
}

/// The AI Dungeon Master.
pub struct DmAgent {
    store: Arc<dyn WorldStore>,
    generator: Option<Arc<dyn Generator>>,
    config: DmConfig,
    guidelines: Option<GuidelineSet>,
}

impl DmAgent {
    /// Create an agent over a store and an optional generation backend.
    ///
    /// A missing backend is reported here once; afterwards every
    /// generation-dependent call returns a fixed unavailable message.
    pub fn new(
        store: Arc<dyn WorldStore>,
        generator: Option<Arc<dyn Generator>>,
        config: DmConfig,
    ) -> Self {
        if generator.is_none() {
            tracing::warn!("no generation backend configured; AI features disabled");
        }

        let guidelines = match store.guideline_set(&config.guideline_name) {
            Ok(Some(g)) => {
                tracing::info!(guidelines = %g.name, "DM guidelines loaded");
                Some(g)
            }
            Ok(None) => {
                tracing::warn!(name = %config.guideline_name, "DM guidelines not found");
                None
            }
            Err(e) => {
                tracing::warn!(error = %e, "guideline lookup failed");
                None
            }
        };

        Self {
            store,
            generator,
            config,
            guidelines,
        }
    }

    /// The loaded guideline set, if any.
    pub fn guidelines(&self) -> Option<&GuidelineSet> {
        self.guidelines.as_ref()
    }

    /// Process one player utterance and return the DM's reply.
    ///
    /// Always returns some string: rule-check replies, generated
    /// narration, or a fixed fallback. Never panics or errors.
    pub async fn respond_to(&self, utterance: &str) -> String {
        let lower = utterance.to_lowercase();
        if let Some(rest) = lower.strip_prefix(RULE_COMMAND) {
            let keyword = rest.trim();
            let check = check_rule(self.store.as_ref(), keyword);
            tracing::debug!(keyword, outcome = ?check.outcome, "rule check");
            return check.render(keyword);
        }

        let Some(generator) = &self.generator else {
            return UNAVAILABLE.to_string();
        };

        // Technique resolution only needs the known-technique list when
        // the utterance actually declares an action.
        let action_block = if action::extract_candidate(utterance).is_some() {
            let known = match self.store.known_techniques(&self.config.focus_character) {
                Ok(links) => links,
                Err(e) => {
                    tracing::warn!(error = %e, "known technique lookup failed");
                    Vec::new()
                }
            };
            action::interpret(utterance, &known, self.store.as_ref())
        } else {
            None
        };

        let fragments = assemble_context(
            self.store.as_ref(),
            self.guidelines.as_ref(),
            &self.config.focus_character,
            utterance,
        );

        let prompt = compose(
            self.guidelines.as_ref(),
            &fragments,
            action_block.as_ref(),
            utterance,
        );

        match generator.generate(&prompt.persona, &prompt.body).await {
            Ok(text) => text,
            Err(e) => {
                tracing::warn!(error = %e, "generation failed");
                fallback_message(&e).to_string()
            }
        }
    }

    /// Generate a standalone description of a topic, bypassing context
    /// assembly. `context` and `tone` fall back to generic defaults.
    pub async fn describe(
        &self,
        topic: &str,
        context: Option<&str>,
        tone: Option<&str>,
    ) -> String {
        let Some(generator) = &self.generator else {
            return UNAVAILABLE.to_string();
        };

        let context = context.unwrap_or("A player asked for a description.");
        let tone = tone.unwrap_or("informative");
        let body = format!(
            "Describe the following topic for a player in a role-playing game: '{topic}'.\n\
             Context: {context}.\n\
             Tone: {tone}."
        );

        match generator.generate(STORYTELLER_PERSONA, &body).await {
            Ok(text) => text,
            Err(e) => {
                tracing::warn!(error = %e, topic, "description generation failed");
                fallback_message(&e).to_string()
            }
        }
    }
}
