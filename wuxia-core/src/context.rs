//! Context assembly.
//!
//! Gathers a bounded set of facts about the world and the focus
//! character into an ordered list of short text fragments. Every source
//! is optional: a missing record or a failing lookup drops that fragment
//! and never aborts assembly of the rest.

use crate::model::GuidelineSet;
use crate::store::WorldStore;

/// Utterance keywords that pull the cultivation realm list into context.
const CULTIVATION_KEYWORDS: [&str; 3] = ["cultivation level", "cultivation", "realm"];

/// Utterance phrases that pull the energy-flow lore topic into context.
const ENERGY_FLOW_TRIGGERS: [&str; 2] = ["energy flow", "chi/mana"];

/// Exact name of the energy-flow lore fragment.
const ENERGY_FLOW_TOPIC: &str = "Primordial Energy Flow (Chi/Mana)";

/// Truncate to at most `max` characters, appending "..." only when
/// something was cut. Character-based, so multi-byte names are safe.
pub(crate) fn truncate(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        text.to_string()
    } else {
        let head: String = text.chars().take(max).collect();
        format!("{head}...")
    }
}

fn or_na(value: Option<&str>) -> &str {
    value.unwrap_or("N/A")
}

/// Assemble the ordered context fragments for one turn.
///
/// `utterance` drives the conditional lore triggers; `focus` names the
/// character whose summary and techniques are pulled in.
pub fn assemble_context(
    store: &dyn WorldStore,
    guidelines: Option<&GuidelineSet>,
    focus: &str,
    utterance: &str,
) -> Vec<String> {
    let mut fragments = Vec::new();
    let utterance_lower = utterance.to_lowercase();

    if let Some(g) = guidelines {
        fragments.push(format!("DM style: {}.", or_na(g.tone_style.as_deref())));
        fragments.push(format!("DM focus: {}.", or_na(g.tone_focus.as_deref())));
        if let Some(rules) = g.dice_roll_rules.as_deref() {
            // Only the first sentence; the full ruling text is too long
            // for a context fragment.
            let first = rules.split('.').next().unwrap_or(rules).trim();
            fragments.push(format!("Key dice rules: {first}."));
        }
    }

    match store.protagonist(focus) {
        Ok(Some(c)) => {
            let mana = match c.mana_max {
                Some(max) => format!("{}/{}", c.mana_current, max),
                None => "N/A".to_string(),
            };
            let mut summary = format!(
                "Main character: {} (Level {} {}, {}). Status: {}. Dao: {}. Affiliation: {}. \
                 HP: {}/{}, Mana: {}.",
                c.name,
                c.level,
                or_na(c.character_class.as_deref()),
                or_na(c.race.as_deref()),
                or_na(c.status.as_deref()),
                or_na(c.dao.as_deref()),
                or_na(c.affiliation.as_deref()),
                c.hp_current,
                c.hp_max,
                mana,
            );
            if !c.active_titles.is_empty() {
                summary.push_str(&format!(" Titles: {}.", c.active_titles.join(", ")));
            }
            if let Some(r) = &c.reclusion {
                summary.push_str(&format!(
                    " Reclusion: Start: Day {}, End: Day {}, Remaining: {} days.",
                    r.start_day, r.end_day, r.days_remaining
                ));
            }
            fragments.push(summary);
        }
        Ok(None) => {}
        Err(e) => tracing::warn!(character = focus, error = %e, "character lookup failed"),
    }

    match store.recent_events(1) {
        Ok(events) => {
            if let Some(event) = events.first() {
                fragments.push(format!(
                    "Recent event ({}): {} - {}",
                    event.day_range(),
                    event.title,
                    truncate(&event.summary, 100)
                ));
            }
        }
        Err(e) => tracing::warn!(error = %e, "recent event lookup failed"),
    }

    if CULTIVATION_KEYWORDS.iter().any(|k| utterance_lower.contains(k)) {
        match store.cultivation_tiers() {
            Ok(tiers) if !tiers.is_empty() => {
                let listing: Vec<String> = tiers
                    .iter()
                    .map(|t| format!("{} (Approx. PC level: {})", t.name, t.level_range))
                    .collect();
                fragments.push(format!("Known cultivation realms: {}", listing.join(", ")));
            }
            Ok(_) => {}
            Err(e) => tracing::warn!(error = %e, "cultivation tier lookup failed"),
        }
    }

    if ENERGY_FLOW_TRIGGERS.iter().any(|k| utterance_lower.contains(k)) {
        match store.lore_fragment(ENERGY_FLOW_TOPIC) {
            Ok(Some(lore)) => {
                if let Some(desc) = lore.description.as_deref().filter(|d| !d.is_empty()) {
                    fragments.push(format!("On energy flow: {}", truncate(desc, 150)));
                }
            }
            Ok(None) => {}
            Err(e) => tracing::warn!(topic = ENERGY_FLOW_TOPIC, error = %e, "lore lookup failed"),
        }
    }

    match store.known_techniques(focus) {
        Ok(links) if !links.is_empty() => {
            let lines: Vec<String> = links
                .iter()
                .map(|link| {
                    let tech = &link.technique;
                    let effect = tech
                        .description
                        .as_deref()
                        .map(|d| truncate(d, 50))
                        .unwrap_or_else(|| "unspecified".to_string());
                    let cost = tech
                        .mana_cost
                        .map(|c| c.to_string())
                        .unwrap_or_else(|| "N/A".to_string());
                    format!(
                        "- {} (Rank: {}, Element: {}, Cost: {}). Effect: {}.",
                        tech.name,
                        or_na(tech.rank.as_deref()),
                        or_na(tech.element.as_deref()),
                        cost,
                        effect
                    )
                })
                .collect();
            fragments.push(format!("Techniques known by {focus}:\n{}", lines.join("\n")));
        }
        Ok(_) => {}
        Err(e) => tracing::warn!(character = focus, error = %e, "known technique lookup failed"),
    }

    fragments
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{sample_world, MemoryStore, WorldData};

    fn sample_store() -> MemoryStore {
        MemoryStore::new(sample_world())
    }

    fn guidelines() -> GuidelineSet {
        GuidelineSet {
            name: "Test".into(),
            tone_style: Some("Epic".into()),
            tone_focus: Some("Adventure".into()),
            dice_roll_rules: Some("First sentence here. Second sentence ignored.".into()),
            system_base: None,
        }
    }

    #[test]
    fn test_all_sources_absent_yields_empty_list() {
        let store = MemoryStore::new(WorldData::default());
        let fragments = assemble_context(&store, None, "Nobody", "hello");
        assert!(fragments.is_empty());
    }

    #[test]
    fn test_guideline_fragments_and_first_sentence() {
        let store = MemoryStore::new(WorldData::default());
        let g = guidelines();
        let fragments = assemble_context(&store, Some(&g), "Nobody", "hello");

        assert_eq!(fragments.len(), 3);
        assert_eq!(fragments[0], "DM style: Epic.");
        assert_eq!(fragments[1], "DM focus: Adventure.");
        assert_eq!(fragments[2], "Key dice rules: First sentence here.");
    }

    #[test]
    fn test_protagonist_fragment_fields() {
        let store = sample_store();
        let fragments = assemble_context(&store, None, "Liáng Wǔzhào", "hello");

        let character = fragments
            .iter()
            .find(|f| f.starts_with("Main character:"))
            .expect("character fragment");
        assert!(character.contains("Liáng Wǔzhào (Level 5 Cultivator, Human)"));
        assert!(character.contains("HP: 40/40, Mana: 4730/4730."));
        assert!(character.contains("Titles: Disciple of the Inner Court."));
        assert!(!character.contains("Reclusion:"));
    }

    #[test]
    fn test_mana_renders_na_when_max_absent() {
        let mut data = sample_world();
        data.characters[0].mana_max = None;
        let store = MemoryStore::new(data);

        let fragments = assemble_context(&store, None, "Liáng Wǔzhào", "hello");
        let character = fragments
            .iter()
            .find(|f| f.starts_with("Main character:"))
            .unwrap();
        assert!(character.contains("Mana: N/A."));
    }

    #[test]
    fn test_reclusion_appended_to_character_fragment() {
        let mut data = sample_world();
        data.characters[0].reclusion = Some(crate::model::ReclusionInterval {
            start_day: 30,
            end_day: 60,
            days_remaining: 12,
        });
        let store = MemoryStore::new(data);

        let fragments = assemble_context(&store, None, "Liáng Wǔzhào", "hello");
        let character = fragments.iter().find(|f| f.starts_with("Main character:")).unwrap();
        assert!(character.contains("Reclusion: Start: Day 30, End: Day 60, Remaining: 12 days."));
    }

    #[test]
    fn test_event_fragment_uses_most_recent() {
        let store = sample_store();
        let fragments = assemble_context(&store, None, "Nobody", "hello");

        let event = fragments
            .iter()
            .find(|f| f.starts_with("Recent event"))
            .expect("event fragment");
        assert!(event.starts_with("Recent event (Days 12): The Scarecrow Trial - "));
        // Summary is over 100 chars, so it must carry the ellipsis.
        assert!(event.ends_with("..."));
    }

    #[test]
    fn test_truncation_exact_and_idempotent() {
        let exactly_100: String = "a".repeat(100);
        assert_eq!(truncate(&exactly_100, 100), exactly_100);

        let over = "a".repeat(101);
        let cut = truncate(&over, 100);
        assert_eq!(cut.chars().count(), 103);
        assert!(cut.ends_with("..."));
        assert_eq!(&cut[..100], &over[..100]);
    }

    #[test]
    fn test_truncation_is_char_based() {
        // Multi-byte characters must not split at a byte boundary.
        let text = "á".repeat(60);
        let cut = truncate(&text, 50);
        assert_eq!(cut.chars().count(), 53);
        assert!(cut.ends_with("..."));
    }

    #[test]
    fn test_cultivation_trigger_emits_single_tier_fragment() {
        let store = sample_store();
        let fragments =
            assemble_context(&store, None, "Nobody", "What realm comes after Body Tempering?");

        let realm_fragments: Vec<_> = fragments
            .iter()
            .filter(|f| f.starts_with("Known cultivation realms:"))
            .collect();
        assert_eq!(realm_fragments.len(), 1);
        let listing = realm_fragments[0];

        // Ascending order index.
        let body = listing.find("Body Tempering").unwrap();
        let chi = listing.find("Chi Condensation").unwrap();
        let foundation = listing.find("Foundation Establishment").unwrap();
        let core = listing.find("Core Formation").unwrap();
        assert!(body < chi && chi < foundation && foundation < core);
        assert!(listing.contains("Body Tempering (Approx. PC level: 1-5)"));
    }

    #[test]
    fn test_cultivation_trigger_case_insensitive() {
        let store = sample_store();
        let fragments = assemble_context(&store, None, "Nobody", "Tell me about CULTIVATION");
        assert!(fragments.iter().any(|f| f.starts_with("Known cultivation realms:")));
    }

    #[test]
    fn test_no_tiers_no_fragment() {
        let mut data = sample_world();
        data.realms.clear();
        let store = MemoryStore::new(data);

        let fragments = assemble_context(&store, None, "Nobody", "tell me about the realm");
        assert!(!fragments.iter().any(|f| f.starts_with("Known cultivation realms:")));
    }

    #[test]
    fn test_energy_flow_trigger() {
        let store = sample_store();
        let fragments =
            assemble_context(&store, None, "Nobody", "How does the energy flow work here?");

        let lore = fragments
            .iter()
            .find(|f| f.starts_with("On energy flow:"))
            .expect("lore fragment");
        // Description exceeds 150 chars in the sample world.
        assert!(lore.ends_with("..."));
        assert!(lore.contains("primordial flow"));
    }

    #[test]
    fn test_known_technique_digest() {
        let store = sample_store();
        let fragments = assemble_context(&store, None, "Liáng Wǔzhào", "hello");

        let digest = fragments
            .iter()
            .find(|f| f.starts_with("Techniques known by Liáng Wǔzhào:"))
            .expect("technique digest");
        assert!(digest.contains(
            "- Hoja de Fuego Adaptativa (Rank: Mortal Superior, Element: Fire, Cost: 150). Effect: "
        ));
        assert!(digest.contains("...."));
    }

    #[test]
    fn test_technique_without_description_is_unspecified() {
        let mut data = sample_world();
        data.known_techniques[0].techniques[0].technique.description = None;
        let store = MemoryStore::new(data);

        let fragments = assemble_context(&store, None, "Liáng Wǔzhào", "hello");
        let digest = fragments
            .iter()
            .find(|f| f.starts_with("Techniques known by"))
            .unwrap();
        assert!(digest.contains("Effect: unspecified."));
    }

    #[test]
    fn test_fragment_order_is_fixed() {
        let store = sample_store();
        let g = guidelines();
        let fragments = assemble_context(
            &store,
            Some(&g),
            "Liáng Wǔzhào",
            "What realm governs the energy flow?",
        );

        let position = |prefix: &str| {
            fragments
                .iter()
                .position(|f| f.starts_with(prefix))
                .unwrap_or_else(|| panic!("missing fragment {prefix}"))
        };

        assert!(position("DM style:") < position("Main character:"));
        assert!(position("Main character:") < position("Recent event"));
        assert!(position("Recent event") < position("Known cultivation realms:"));
        assert!(position("Known cultivation realms:") < position("On energy flow:"));
        assert!(position("On energy flow:") < position("Techniques known by"));
    }
}
