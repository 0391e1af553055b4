//! The AI Dungeon Master agent.
//!
//! Ties the lookup collaborators, the context/action/prompt pipeline,
//! and the generation backend into the two player-facing operations:
//! `respond_to` and `describe`.

mod agent;

pub use agent::{DmAgent, DmConfig};
