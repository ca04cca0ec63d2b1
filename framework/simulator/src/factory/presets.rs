use crate::factory::{Scenario, ScenarioParams};

/// Three curated scenarios, from a light flat container up to a DOM heavy nested one.
pub fn example_scenarios() -> Vec<Scenario> {
    vec![
        Scenario::new(
            "baseline-low",
            ScenarioParams {
                pixel_tags: 5,
                dom_tags: 0,
                variables: 8,
                depth: 0,
                fan_out: 1,
                iterations: 5,
                network_delay_ms: 18.0,
                dom_complexity: 120,
            },
        ),
        Scenario::new(
            "balanced-mix",
            ScenarioParams {
                pixel_tags: 15,
                dom_tags: 8,
                variables: 40,
                depth: 1,
                fan_out: 2,
                iterations: 5,
                network_delay_ms: 24.0,
                dom_complexity: 180,
            },
        ),
        Scenario::new(
            "dom-heavy-nested",
            ScenarioParams {
                pixel_tags: 10,
                dom_tags: 20,
                variables: 75,
                depth: 2,
                fan_out: 2,
                iterations: 5,
                network_delay_ms: 28.0,
                dom_complexity: 240,
            },
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn presets_have_unique_ids_and_matching_trees() {
        let scenarios = example_scenarios();

        let mut ids = scenarios.iter().map(|s| s.id.as_str()).collect::<Vec<_>>();
        ids.dedup();
        assert_eq!(ids, vec!["baseline-low", "balanced-mix", "dom-heavy-nested"]);

        for scenario in &scenarios {
            assert_eq!(scenario.config.max_depth(), scenario.params.depth);
            assert_eq!(scenario.config.pixel_tags, scenario.params.pixel_tags);
        }

        // 2 children at depth 1, each with round(2 * 0.75) = 2 children at depth 2.
        assert_eq!(scenarios[2].config.node_count(), 1 + 2 + 4);
    }
}
