use serde_json::{Map, Value};

use crate::factory::{Scenario, ScenarioParams, MAX_NETWORK_DELAY_MS};

/// Values used for any field a scenario descriptor leaves out.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScenarioDefaults {
    pub iterations: u32,
    pub network_delay_ms: f64,
    pub dom_complexity: u32,
    pub depth: u32,
    pub fan_out: u32,
}

impl Default for ScenarioDefaults {
    fn default() -> Self {
        Self {
            iterations: 5,
            network_delay_ms: 20.0,
            dom_complexity: 40,
            depth: 0,
            fan_out: 1,
        }
    }
}

impl ScenarioDefaults {
    /// Read the batch level defaults. `fanOut` may be a list, in which case its first entry is
    /// the default.
    pub fn from_batch(batch: &Map<String, Value>) -> Self {
        let fallback = Self::default();

        let fan_out = batch
            .get("fanOut")
            .filter(|value| !value.is_null())
            .and_then(|value| as_list(value).into_iter().next());

        Self {
            iterations: count_or(batch.get("iterations"), fallback.iterations).max(1),
            network_delay_ms: delay_or(batch.get("networkDelay"), fallback.network_delay_ms),
            dom_complexity: count_or(batch.get("domComplexity"), fallback.dom_complexity),
            depth: count_or(batch.get("depth"), fallback.depth),
            fan_out: count_or(fan_out, fallback.fan_out),
        }
    }

    /// Normalise one entry of a `scenarios` list. Never fails: anything missing or not a finite
    /// number takes its default.
    pub(crate) fn scenario_from_descriptor(&self, index: usize, descriptor: &Value) -> Scenario {
        let empty = Map::new();
        let fields = descriptor.as_object().unwrap_or(&empty);

        let id = match first_non_null(fields, &["id", "name"]) {
            Some(Value::String(id)) => id.clone(),
            Some(other) => other.to_string(),
            None => format!("scenario-{}", index + 1),
        };

        let params = ScenarioParams {
            pixel_tags: count_or(fields.get("pixelTags"), 0),
            dom_tags: count_or(fields.get("domTags"), 0),
            variables: count_or(fields.get("variables"), 0),
            depth: count_or(first_non_null(fields, &["depth", "nestedDepth"]), self.depth),
            fan_out: count_or(first_non_null(fields, &["fanOut", "nestedFanOut"]), self.fan_out),
            iterations: count_or(first_non_null(fields, &["iterations", "runs"]), self.iterations),
            network_delay_ms: delay_or(
                first_non_null(fields, &["networkDelay", "network"]),
                self.network_delay_ms,
            ),
            dom_complexity: count_or(
                first_non_null(fields, &["domComplexity", "domSearchComplexity"]),
                self.dom_complexity,
            ),
        };

        Scenario::new(id, params)
    }
}

/// The value of the first key that is present and not null.
pub(crate) fn first_non_null<'a>(
    object: &'a Map<String, Value>,
    keys: &[&str],
) -> Option<&'a Value> {
    keys.iter()
        .filter_map(|key| object.get(*key))
        .find(|value| !value.is_null())
}

/// A list as-is, anything else as a single element list.
pub(crate) fn as_list(value: &Value) -> Vec<&Value> {
    match value {
        Value::Array(values) => values.iter().collect(),
        other => vec![other],
    }
}

/// The value if it is a finite number. Numeric strings do not count.
fn finite_number(value: Option<&Value>) -> Option<f64> {
    value.and_then(Value::as_f64).filter(|n| n.is_finite())
}

/// A non-negative whole number, rounded to the nearest integer.
pub(crate) fn count_or(value: Option<&Value>, fallback: u32) -> u32 {
    match finite_number(value) {
        Some(n) => n.round().clamp(0.0, u32::MAX as f64) as u32,
        None => fallback,
    }
}

/// A delay in milliseconds, clamped to `[0, MAX_NETWORK_DELAY_MS]`.
fn delay_or(value: Option<&Value>, fallback: f64) -> f64 {
    finite_number(value)
        .unwrap_or(fallback)
        .clamp(0.0, MAX_NETWORK_DELAY_MS)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn normalise(descriptor: Value) -> Scenario {
        ScenarioDefaults::default().scenario_from_descriptor(0, &descriptor)
    }

    #[test]
    fn counts_are_rounded_and_clamped() {
        assert_eq!(count_or(Some(&json!(2.5)), 9), 3);
        assert_eq!(count_or(Some(&json!(2.4)), 9), 2);
        assert_eq!(count_or(Some(&json!(-4)), 9), 0);
        assert_eq!(count_or(Some(&json!("12")), 9), 9);
        assert_eq!(count_or(Some(&json!(null)), 9), 9);
        assert_eq!(count_or(None, 9), 9);
    }

    #[test]
    fn first_present_alias_wins_even_when_not_numeric() {
        // `depth` is present, so `nestedDepth` is never consulted and the default applies.
        let scenario = normalise(json!({ "depth": "deep", "nestedDepth": 3 }));
        assert_eq!(scenario.params.depth, 0);

        let scenario = normalise(json!({ "depth": null, "nestedDepth": 3 }));
        assert_eq!(scenario.params.depth, 3);
    }

    #[test]
    fn zero_fan_out_and_iterations_become_one() {
        let scenario = normalise(json!({ "fanOut": 0, "iterations": 0 }));

        assert_eq!(scenario.params.fan_out, 1);
        assert_eq!(scenario.params.iterations, 1);
    }

    #[test]
    fn negative_network_delay_is_clamped() {
        let scenario = normalise(json!({ "network": -15.5 }));
        assert_eq!(scenario.params.network_delay_ms, 0.0);

        let scenario = normalise(json!({ "networkDelay": 7.25 }));
        assert_eq!(scenario.params.network_delay_ms, 7.25);

        let defaults = ScenarioDefaults::from_batch(
            json!({ "networkDelay": 1.5e308 }).as_object().unwrap(),
        );
        assert_eq!(defaults.network_delay_ms, MAX_NETWORK_DELAY_MS);
    }

    #[test]
    fn ids_fall_back_to_name_then_position() {
        let defaults = ScenarioDefaults::default();

        assert_eq!(
            defaults
                .scenario_from_descriptor(4, &json!({ "name": "named" }))
                .id,
            "named"
        );
        assert_eq!(
            defaults.scenario_from_descriptor(4, &json!({ "id": 17 })).id,
            "17"
        );
        assert_eq!(defaults.scenario_from_descriptor(4, &json!({})).id, "scenario-5");
    }

    #[test]
    fn non_object_entries_take_every_default() {
        let scenario = normalise(json!(42));

        assert_eq!(scenario.params.pixel_tags, 0);
        assert_eq!(scenario.params.iterations, 5);
        assert_eq!(scenario.params.network_delay_ms, 20.0);
        assert_eq!(scenario.params.dom_complexity, 40);
    }

    #[test]
    fn batch_fan_out_list_gives_its_first_entry() {
        let defaults = ScenarioDefaults::from_batch(
            json!({ "fanOut": [3, 5], "iterations": 0 })
                .as_object()
                .unwrap(),
        );

        assert_eq!(defaults.fan_out, 3);
        assert_eq!(defaults.iterations, 1);
    }
}
