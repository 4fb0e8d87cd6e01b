// src/cli/scenarios.rs — `interpersonal scenarios`

use crate::scenario::{self, Category};

/// Print the catalog grouped by category.
pub fn list_scenarios() {
    for category in scenario::categories() {
        print!("{}", render_category(&category));
    }
}

fn render_category(category: &Category) -> String {
    let mut out = format!("\n{}\n  {}\n", category.name, category.description);
    for s in &category.scenarios {
        out.push_str(&format!(
            "  {:<22} {:<13} {}\n",
            s.id,
            format!("[{}]", s.difficulty),
            s.title
        ));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_lists_every_scenario_once() {
        let text: String = scenario::categories()
            .iter()
            .map(render_category)
            .collect();
        for s in scenario::all() {
            assert_eq!(text.matches(&format!(" {} ", s.id)).count(), 1, "{}", s.id);
        }
        assert!(text.contains("Setting Boundaries"));
        assert!(text.contains("[Advanced]"));
    }
}
