//! World persistence and lookup collaborators.
//!
//! The engine consumes the [`WorldStore`] trait: simple key/keyword
//! lookups returning structured records or "not found". [`MemoryStore`]
//! implements it over a [`WorldData`] snapshot that round-trips through
//! a human-readable JSON file.

use crate::model::{
    EventSummary, GuidelineSet, KnownTechniqueLink, LoreFragment, ProtagonistSummary, RealmTier,
    RuleSet, TechniqueRecord,
};
use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

/// Errors from the persistence layer.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Store unavailable: {0}")]
    Unavailable(String),
}

/// Lookup interface over the persisted world.
///
/// Implementations must be safe for concurrent reads; the engine holds
/// no mutable state and issues lookups sequentially within one turn.
pub trait WorldStore: Send + Sync {
    /// Fetch a guideline set by name.
    fn guideline_set(&self, name: &str) -> Result<Option<GuidelineSet>, StoreError>;

    /// Fetch a character summary by name.
    fn protagonist(&self, name: &str) -> Result<Option<ProtagonistSummary>, StoreError>;

    /// Fetch up to `limit` campaign events, most recent first.
    fn recent_events(&self, limit: usize) -> Result<Vec<EventSummary>, StoreError>;

    /// Fetch a lore fragment by exact name.
    fn lore_fragment(&self, name: &str) -> Result<Option<LoreFragment>, StoreError>;

    /// Fetch all cultivation realm tiers in ascending order.
    fn cultivation_tiers(&self) -> Result<Vec<RealmTier>, StoreError>;

    /// Fetch the techniques a character knows.
    fn known_techniques(&self, character: &str) -> Result<Vec<KnownTechniqueLink>, StoreError>;

    /// Fetch a technique by exact name.
    fn technique(&self, name: &str) -> Result<Option<TechniqueRecord>, StoreError>;

    /// Fetch all rule sets.
    fn rule_sets(&self) -> Result<Vec<RuleSet>, StoreError>;

    /// Search campaign events whose title, summary, or tags contain the
    /// keyword (case-insensitive), most recent first.
    fn events_by_keyword(
        &self,
        keyword: &str,
        limit: usize,
    ) -> Result<Vec<EventSummary>, StoreError>;
}

/// Serializable snapshot of the whole world.
///
/// Events are stored in chronological order; lookups that want "most
/// recent first" walk the list backwards.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WorldData {
    #[serde(default)]
    pub guidelines: Vec<GuidelineSet>,
    #[serde(default)]
    pub characters: Vec<ProtagonistSummary>,
    #[serde(default)]
    pub events: Vec<EventSummary>,
    #[serde(default)]
    pub lore: Vec<LoreFragment>,
    #[serde(default)]
    pub realms: Vec<RealmTier>,
    #[serde(default)]
    pub techniques: Vec<TechniqueRecord>,
    #[serde(default)]
    pub known_techniques: Vec<CharacterTechniques>,
    #[serde(default)]
    pub rule_sets: Vec<RuleSet>,
}

/// The techniques one character knows.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CharacterTechniques {
    pub character: String,
    pub techniques: Vec<KnownTechniqueLink>,
}

impl WorldData {
    /// Load from a JSON file.
    pub fn load_json(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        let content = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&content)?)
    }

    /// Save to a JSON file.
    pub fn save_json(&self, path: impl AsRef<Path>) -> Result<(), StoreError> {
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }
}

/// In-memory [`WorldStore`] over a [`WorldData`] snapshot.
pub struct MemoryStore {
    data: WorldData,
}

impl MemoryStore {
    pub fn new(data: WorldData) -> Self {
        Self { data }
    }

    /// Load a store from a JSON world file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        Ok(Self::new(WorldData::load_json(path)?))
    }

    pub fn data(&self) -> &WorldData {
        &self.data
    }
}

impl WorldStore for MemoryStore {
    fn guideline_set(&self, name: &str) -> Result<Option<GuidelineSet>, StoreError> {
        Ok(self.data.guidelines.iter().find(|g| g.name == name).cloned())
    }

    fn protagonist(&self, name: &str) -> Result<Option<ProtagonistSummary>, StoreError> {
        Ok(self.data.characters.iter().find(|c| c.name == name).cloned())
    }

    fn recent_events(&self, limit: usize) -> Result<Vec<EventSummary>, StoreError> {
        Ok(self.data.events.iter().rev().take(limit).cloned().collect())
    }

    fn lore_fragment(&self, name: &str) -> Result<Option<LoreFragment>, StoreError> {
        Ok(self.data.lore.iter().find(|l| l.name == name).cloned())
    }

    fn cultivation_tiers(&self) -> Result<Vec<RealmTier>, StoreError> {
        let mut tiers = self.data.realms.clone();
        tiers.sort_by_key(|t| t.order);
        Ok(tiers)
    }

    fn known_techniques(&self, character: &str) -> Result<Vec<KnownTechniqueLink>, StoreError> {
        Ok(self
            .data
            .known_techniques
            .iter()
            .find(|ct| ct.character == character)
            .map(|ct| ct.techniques.clone())
            .unwrap_or_default())
    }

    fn technique(&self, name: &str) -> Result<Option<TechniqueRecord>, StoreError> {
        Ok(self.data.techniques.iter().find(|t| t.name == name).cloned())
    }

    fn rule_sets(&self) -> Result<Vec<RuleSet>, StoreError> {
        Ok(self.data.rule_sets.clone())
    }

    fn events_by_keyword(
        &self,
        keyword: &str,
        limit: usize,
    ) -> Result<Vec<EventSummary>, StoreError> {
        let needle = keyword.to_lowercase();
        Ok(self
            .data
            .events
            .iter()
            .rev()
            .filter(|e| {
                e.title.to_lowercase().contains(&needle)
                    || e.summary.to_lowercase().contains(&needle)
                    || e.tags.iter().any(|t| t.to_lowercase().contains(&needle))
            })
            .take(limit)
            .cloned()
            .collect())
    }
}

/// Build the seeded demo world used by the CLI's `--sample` flag and
/// the integration tests.
pub fn sample_world() -> WorldData {
    let adaptive_blade = TechniqueRecord {
        name: "Hoja de Fuego Adaptativa".into(),
        rank: Some("Mortal Superior".into()),
        element: Some("Fire".into()),
        mana_cost: Some(150),
        description: Some(
            "Conjures a blade of living flame that reshapes itself to counter the \
             opponent's stance, growing or shrinking with the wielder's intent."
                .into(),
        ),
        damage: Some("2d8 fire, +1d8 when the target is staggered".into()),
    };

    let primary_shot = TechniqueRecord {
        name: "Disparo de Fuego Primario".into(),
        rank: Some("Mortal Inferior".into()),
        element: Some("Fire".into()),
        mana_cost: Some(40),
        description: Some("A compressed bolt of chi-fed flame loosed from the palm.".into()),
        damage: Some("1d10 fire".into()),
    };

    WorldData {
        guidelines: vec![GuidelineSet {
            name: "Complete DM Guidelines - Wuxia World Liang Wuzhao".into(),
            tone_style: Some(
                "Cinematic and descriptive. Memorable moments and an immersive atmosphere; \
                 humor is welcome when it fits."
                    .into(),
            ),
            tone_focus: Some(
                "Adventure, mystery, personal growth, political intrigue. Emphasis on the \
                 character's evolution and their impact on the world."
                    .into(),
            ),
            dice_roll_rules: Some(
                "Ability checks: D20 + modifier vs DC. Combat: D20 + attack modifier vs AC. \
                 Damage: per technique or weapon. Saves: D20 + modifier vs technique DC."
                    .into(),
            ),
            system_base: Some(
                "Custom system with D&D 5e adaptations and PbtA narrative elements.".into(),
            ),
        }],
        characters: vec![ProtagonistSummary {
            name: "Liáng Wǔzhào".into(),
            level: 5,
            character_class: Some("Cultivator".into()),
            race: Some("Human".into()),
            status: Some("Healthy, training at the monastery".into()),
            dao: Some("Dao of Adaptability".into()),
            affiliation: Some("Azure Cloud Monastery".into()),
            hp_current: 40,
            hp_max: 40,
            mana_current: 4730,
            mana_max: Some(4730),
            active_titles: vec!["Disciple of the Inner Court".into()],
            compatible_elements: vec!["Fire".into(), "Wind".into()],
            reclusion: None,
        }],
        events: vec![
            EventSummary {
                title: "Arrival at the Azure Cloud Monastery".into(),
                day_start: 1,
                day_end: Some(3),
                summary: "After a long climb through the mist, Liáng Wǔzhào was accepted as \
                          an outer disciple and assigned a cell overlooking the cloud sea."
                    .into(),
                tags: vec!["monastery".into(), "introduction".into()],
            },
            EventSummary {
                title: "The Scarecrow Trial".into(),
                day_start: 12,
                day_end: Some(12),
                summary: "The training master set enchanted scarecrows loose in the eastern \
                          courtyard and told the disciples to disable them without burning \
                          the plum trees. Liáng passed, barely, and the plum trees survived \
                          with only minor scorching."
                    .into(),
                tags: vec!["training".into(), "trial".into()],
            },
        ],
        lore: vec![LoreFragment {
            name: "Primordial Energy Flow (Chi/Mana)".into(),
            description: Some(
                "All living things channel the primordial flow, the breath of the world that \
                 pools in meridians and dantians. Cultivators refine it into usable chi; what \
                 outsiders call mana is the same current given a foreign name. Where the flow \
                 knots, spirit beasts gather and strange weather follows."
                    .into(),
            ),
            realms: Vec::new(),
        }],
        realms: vec![
            RealmTier {
                order: 1,
                name: "Body Tempering".into(),
                level_range: "1-5".into(),
            },
            RealmTier {
                order: 2,
                name: "Chi Condensation".into(),
                level_range: "6-10".into(),
            },
            RealmTier {
                order: 3,
                name: "Foundation Establishment".into(),
                level_range: "11-16".into(),
            },
            RealmTier {
                order: 4,
                name: "Core Formation".into(),
                level_range: "17-20".into(),
            },
        ],
        techniques: vec![adaptive_blade.clone(), primary_shot],
        known_techniques: vec![CharacterTechniques {
            character: "Liáng Wǔzhào".into(),
            techniques: vec![KnownTechniqueLink {
                technique: adaptive_blade,
                mastery: Some("Practiced".into()),
            }],
        }],
        rule_sets: vec![RuleSet {
            name: "Core Mechanics".into(),
            rules: serde_json::json!([
                {
                    "keyword": "initiative",
                    "description": "Roll D20 + Dexterity modifier; ties go to the higher modifier.",
                    "difficulty_class_info": "No DC; ordering only"
                },
                {
                    "keyword": "stealth",
                    "description": "Roll Dexterity (Stealth) vs passive Perception.",
                    "difficulty_class_info": "Varies by situation"
                }
            ]),
        }],
    }
}
