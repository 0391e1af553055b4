//! Read-only projections of the persisted world.
//!
//! The engine never creates, mutates, or deletes these records; the
//! persistence layer owns them. Optional fields are explicit `Option`s
//! so that "absent" is a visible state rather than an empty string.

use serde::{Deserialize, Serialize};

/// Summary of the focus character, as pulled into the prompt context.
///
/// Invariant (assumed, not enforced here): current values never exceed
/// their maxima for health and mana.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProtagonistSummary {
    pub name: String,
    pub level: u32,
    pub character_class: Option<String>,
    pub race: Option<String>,
    pub status: Option<String>,
    /// Dao philosophy the character follows.
    pub dao: Option<String>,
    pub affiliation: Option<String>,
    pub hp_current: i32,
    pub hp_max: i32,
    pub mana_current: i32,
    /// Absent when the character has no mana pool; rendered as "N/A".
    pub mana_max: Option<i32>,
    #[serde(default)]
    pub active_titles: Vec<String>,
    #[serde(default)]
    pub compatible_elements: Vec<String>,
    #[serde(default)]
    pub reclusion: Option<ReclusionInterval>,
}

/// A closed-door cultivation interval for a character.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReclusionInterval {
    pub start_day: u32,
    pub end_day: u32,
    pub days_remaining: u32,
}

/// A campaign event, most recent first in store ordering.
///
/// Invariant: when `day_end` is present, `day_end >= day_start`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventSummary {
    pub title: String,
    pub day_start: u32,
    #[serde(default)]
    pub day_end: Option<u32>,
    pub summary: String,
    #[serde(default)]
    pub tags: Vec<String>,
}

impl EventSummary {
    /// Render the day range: "Days 10" or "Days 10-20".
    ///
    /// An end day equal to the start collapses to the single-day form.
    pub fn day_range(&self) -> String {
        match self.day_end {
            Some(end) if end != self.day_start => format!("Days {}-{}", self.day_start, end),
            _ => format!("Days {}", self.day_start),
        }
    }
}

/// Immutable reference data for a technique.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TechniqueRecord {
    pub name: String,
    /// Free-text tier label, e.g. "Mortal Inferior".
    pub rank: Option<String>,
    pub element: Option<String>,
    pub mana_cost: Option<i32>,
    pub description: Option<String>,
    /// Free-text damage or effect string.
    pub damage: Option<String>,
}

/// Association between a character and a technique they know.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KnownTechniqueLink {
    pub technique: TechniqueRecord,
    pub mastery: Option<String>,
}

/// DM persona configuration, loaded once per session and read-only.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GuidelineSet {
    pub name: String,
    pub tone_style: Option<String>,
    pub tone_focus: Option<String>,
    pub dice_roll_rules: Option<String>,
    pub system_base: Option<String>,
}

/// A named lore entry with an optional ordered tier sub-list.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoreFragment {
    pub name: String,
    pub description: Option<String>,
    #[serde(default)]
    pub realms: Vec<RealmTier>,
}

/// One cultivation realm tier.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RealmTier {
    pub order: u32,
    pub name: String,
    /// Approximate player-character level range, e.g. "1-5".
    pub level_range: String,
}

/// A named rule set whose rules are free-form JSON.
///
/// The rules value is either a list of objects carrying a "keyword"
/// field, or a map keyed by keyword.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RuleSet {
    pub name: String,
    pub rules: serde_json::Value,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_day_range_single_day() {
        let event = EventSummary {
            title: "Arrival".into(),
            day_start: 10,
            day_end: Some(10),
            summary: String::new(),
            tags: Vec::new(),
        };
        assert_eq!(event.day_range(), "Days 10");
    }

    #[test]
    fn test_day_range_span() {
        let event = EventSummary {
            title: "Journey".into(),
            day_start: 10,
            day_end: Some(20),
            summary: String::new(),
            tags: Vec::new(),
        };
        assert_eq!(event.day_range(), "Days 10-20");
    }

    #[test]
    fn test_day_range_open_end() {
        let event = EventSummary {
            title: "Siege".into(),
            day_start: 7,
            day_end: None,
            summary: String::new(),
            tags: Vec::new(),
        };
        assert_eq!(event.day_range(), "Days 7");
    }
}
