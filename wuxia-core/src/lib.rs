//! Wuxia text-adventure engine with an AI Dungeon Master.
//!
//! This crate provides:
//! - Read-only projections of the persisted world (characters, events,
//!   techniques, lore, guidelines)
//! - Context assembly, declared-action interpretation, and prompt
//!   composition for the generation backend
//! - Keyword-based rule lookup
//! - The DM agent tying it all together
//!
//! # Quick Start
//!
//! ```ignore
//! use std::sync::Arc;
//! use wuxia_core::{DmAgent, DmConfig, MemoryStore, sample_world};
//!
//! #[tokio::main]
//! async fn main() {
//!     let store = Arc::new(MemoryStore::new(sample_world()));
//!     let client = Arc::new(openai::Client::new("sk-..."));
//!
//!     let agent = DmAgent::new(store, Some(client), DmConfig::default());
//!     let reply = agent.respond_to("I look around the courtyard").await;
//!     println!("{reply}");
//! }
//! ```

pub mod action;
pub mod config;
pub mod context;
pub mod dm;
pub mod generate;
pub mod model;
pub mod prompt;
pub mod rules;
pub mod store;
pub mod testing;

// Primary public API
pub use config::{Config, DEFAULT_FOCUS_CHARACTER, DEFAULT_GUIDELINE_NAME};
pub use dm::{DmAgent, DmConfig};
pub use generate::Generator;
pub use model::{
    EventSummary, GuidelineSet, KnownTechniqueLink, LoreFragment, ProtagonistSummary, RealmTier,
    RuleSet, TechniqueRecord,
};
pub use store::{sample_world, MemoryStore, StoreError, WorldData, WorldStore};
