// src/scenario/mod.rs — Built-in practice scenarios
//
// The catalog is compiled in. Each entry is the persona the model plays
// (system prompt) plus the line it opens with.

mod catalog;

use serde::Serialize;

pub use catalog::CATALOG;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Difficulty {
    Beginner,
    Intermediate,
    Advanced,
}

impl std::fmt::Display for Difficulty {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Difficulty::Beginner => "Beginner",
            Difficulty::Intermediate => "Intermediate",
            Difficulty::Advanced => "Advanced",
        };
        f.write_str(s)
    }
}

/// A predefined conversation to rehearse.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Scenario {
    pub id: &'static str,
    pub title: &'static str,
    /// Situation shown before the session starts.
    pub description: &'static str,
    /// One-line pitch used in the catalog listing.
    pub summary: &'static str,
    pub category: &'static str,
    pub difficulty: Difficulty,
    /// Persona instructions sent as the system prompt on every turn.
    pub system_prompt: &'static str,
    pub opening_message: &'static str,
}

/// A named group of scenarios, in catalog order.
#[derive(Debug, Clone, Serialize)]
pub struct Category {
    pub name: &'static str,
    pub description: &'static str,
    pub scenarios: Vec<&'static Scenario>,
}

const CATEGORY_BLURBS: &[(&str, &str)] = &[
    (
        "Relationships & Breakups",
        "Navigate ending relationships with compassion and clarity",
    ),
    (
        "Setting Boundaries",
        "Learn to say no and set limits while preserving relationships",
    ),
    (
        "Conflict & Repair",
        "Navigate hurt feelings and repair damaged relationships",
    ),
];

pub fn all() -> &'static [Scenario] {
    CATALOG
}

pub fn find(id: &str) -> Option<&'static Scenario> {
    CATALOG.iter().find(|s| s.id == id)
}

/// Scenarios grouped by category, categories in catalog order.
pub fn categories() -> Vec<Category> {
    let mut out: Vec<Category> = Vec::new();
    for scenario in CATALOG {
        match out.iter_mut().find(|c| c.name == scenario.category) {
            Some(cat) => cat.scenarios.push(scenario),
            None => {
                let description = CATEGORY_BLURBS
                    .iter()
                    .find(|(name, _)| *name == scenario.category)
                    .map(|(_, d)| *d)
                    .unwrap_or("");
                out.push(Category {
                    name: scenario.category,
                    description,
                    scenarios: vec![scenario],
                });
            }
        }
    }
    out
}

/// Ids that look like `id`, best match first. Used for "did you mean" hints.
pub fn suggest(id: &str) -> Vec<&'static str> {
    let mut scored: Vec<(&'static str, f64)> = CATALOG
        .iter()
        .map(|s| (s.id, strsim::jaro_winkler(s.id, id)))
        .filter(|(_, score)| *score > 0.7)
        .collect();
    scored.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));
    scored.truncate(3);
    scored.into_iter().map(|(id, _)| id).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_catalog_has_eleven_unique_ids() {
        let ids: HashSet<&str> = all().iter().map(|s| s.id).collect();
        assert_eq!(all().len(), 11);
        assert_eq!(ids.len(), 11);
    }

    #[test]
    fn test_every_scenario_is_complete() {
        for s in all() {
            assert!(!s.title.is_empty(), "{} has no title", s.id);
            assert!(!s.description.is_empty(), "{} has no description", s.id);
            assert!(!s.system_prompt.is_empty(), "{} has no prompt", s.id);
            assert!(!s.opening_message.is_empty(), "{} has no opener", s.id);
        }
    }

    #[test]
    fn test_find() {
        let s = find("rejection").unwrap();
        assert_eq!(s.title, "Rejecting Someone Gracefully");
        assert_eq!(s.difficulty, Difficulty::Beginner);
        assert!(find("nope").is_none());
    }

    #[test]
    fn test_categories_in_order() {
        let cats = categories();
        let names: Vec<&str> = cats.iter().map(|c| c.name).collect();
        assert_eq!(
            names,
            vec!["Relationships & Breakups", "Setting Boundaries", "Conflict & Repair"]
        );
        assert_eq!(cats[0].scenarios.len(), 4);
        assert_eq!(cats[1].scenarios.len(), 4);
        assert_eq!(cats[2].scenarios.len(), 3);
        assert!(cats.iter().all(|c| !c.description.is_empty()));
    }

    #[test]
    fn test_suggest_close_ids() {
        let hints = suggest("breaking-upp");
        assert_eq!(hints.first(), Some(&"breaking-up"));
        assert!(suggest("zzzzzzzzzzzz").is_empty());
    }

    #[test]
    fn test_serialized_card_uses_camel_case() {
        let json = serde_json::to_value(find("apologizing").unwrap()).unwrap();
        assert_eq!(json["id"], "apologizing");
        assert!(json.get("systemPrompt").is_some());
        assert!(json.get("openingMessage").is_some());
        assert_eq!(json["difficulty"], "Intermediate");
    }
}
