mod descriptor;
mod presets;
mod sweep;

use serde_json::{Map, Value};

use crate::config::{build_container_config, BuildParams, ContainerConfig};
use crate::document::DocumentSeed;
use crate::error::FactoryError;
use crate::scenario::ExecuteOptions;

pub use descriptor::ScenarioDefaults;
pub use presets::example_scenarios;
pub use sweep::{ParamRange, SweepPlan, MAX_RANGE_VALUES, MAX_SWEEP_SCENARIOS};

use descriptor::{as_list, count_or, first_non_null};

/// Upper bound on a scenario's base network delay, one hour. Larger values are clamped to it.
pub const MAX_NETWORK_DELAY_MS: f64 = 3_600_000.0;

/// Batch level keys which, when no explicit scenario list is given, span a parameter grid.
const GRID_KEYS: [&str; 6] = [
    "pixelTags",
    "domTags",
    "variables",
    "nestedDepth",
    "depth",
    "fanOut",
];

/// The normalised parameters of one scenario.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScenarioParams {
    pub pixel_tags: u32,
    pub dom_tags: u32,
    pub variables: u32,
    pub depth: u32,
    /// At least 1.
    pub fan_out: u32,
    /// At least 1.
    pub iterations: u32,
    /// Between 0 and [MAX_NETWORK_DELAY_MS].
    pub network_delay_ms: f64,
    pub dom_complexity: u32,
}

impl ScenarioParams {
    pub fn build_params(&self) -> BuildParams {
        BuildParams {
            pixel_tags: self.pixel_tags,
            dom_tags: self.dom_tags,
            variables: self.variables,
            nested_depth: self.depth,
            fan_out: self.fan_out,
            dom_complexity: self.dom_complexity,
        }
    }

    pub fn execute_options(&self) -> ExecuteOptions {
        ExecuteOptions {
            iterations: self.iterations,
            network_delay_ms: self.network_delay_ms,
        }
    }
}

/// A named scenario together with the container tree built from its parameters.
#[derive(Debug, Clone, PartialEq)]
pub struct Scenario {
    pub id: String,
    pub params: ScenarioParams,
    pub config: ContainerConfig,
}

impl Scenario {
    /// Build the container tree for `params`. The lower bounds on fan-out, iterations and
    /// network delay are enforced here as well, whatever the caller passed.
    pub fn new(id: impl Into<String>, params: ScenarioParams) -> Self {
        let params = ScenarioParams {
            fan_out: params.fan_out.max(1),
            iterations: params.iterations.max(1),
            network_delay_ms: if params.network_delay_ms.is_finite() {
                params.network_delay_ms.clamp(0.0, MAX_NETWORK_DELAY_MS)
            } else {
                0.0
            },
            ..params
        };

        Self {
            id: id.into(),
            config: build_container_config(&params.build_params()),
            params,
        }
    }
}

/// A parsed batch payload.
#[derive(Debug, Clone, PartialEq)]
pub struct BatchPlan {
    pub scenarios: Vec<Scenario>,
    /// Document shape requested by the payload's `seedDom`, if any.
    pub seed: Option<DocumentSeed>,
}

/// Parse a batch payload into scenarios.
///
/// A non-empty `scenarios` array gives one scenario per entry, with missing fields taken from
/// the batch level defaults. Otherwise the batch level `pixelTags`, `domTags`, `variables`,
/// `nestedDepth` (or `depth`) and `fanOut` values, each a number or an array of numbers, are
/// expanded into every combination. A payload with neither is rejected.
pub fn parse_batch(payload: &Value) -> Result<BatchPlan, FactoryError> {
    let Some(batch) = payload.as_object() else {
        return Err(FactoryError::MalformedPayload(format!(
            "expected a JSON object, got {}",
            value_kind(payload)
        )));
    };

    let defaults = ScenarioDefaults::from_batch(batch);

    let scenarios: Vec<Scenario> = match batch.get("scenarios").and_then(Value::as_array) {
        Some(entries) if !entries.is_empty() => entries
            .iter()
            .enumerate()
            .map(|(index, entry)| defaults.scenario_from_descriptor(index, entry))
            .collect(),
        _ if GRID_KEYS.iter().any(|key| batch.contains_key(*key)) => {
            let scenarios = grid(batch, &defaults);
            if scenarios.is_empty() {
                return Err(FactoryError::NoScenarios(
                    "the parameter grid has an empty axis".to_string(),
                ));
            }
            scenarios
        }
        _ => {
            return Err(FactoryError::NoScenarios(
                "the payload has no `scenarios` entries and no parameter grid keys".to_string(),
            ))
        }
    };

    let seed = batch.get("seedDom").map(document_seed);

    log::debug!(
        "Parsed batch payload into {} scenarios (document seed: {:?})",
        scenarios.len(),
        seed
    );

    Ok(BatchPlan { scenarios, seed })
}

/// Shorthand for [parse_batch] when the document seed is not needed.
pub fn scenarios_from_payload(payload: &Value) -> Result<Vec<Scenario>, FactoryError> {
    parse_batch(payload).map(|plan| plan.scenarios)
}

fn grid(batch: &Map<String, Value>, defaults: &ScenarioDefaults) -> Vec<Scenario> {
    // A missing axis is a single 0, an empty array is an empty axis.
    let axis = |value: Option<&Value>| match value.filter(|value| !value.is_null()) {
        Some(value) => as_list(value)
            .into_iter()
            .map(|value| count_or(Some(value), 0))
            .collect::<Vec<_>>(),
        None => vec![0],
    };

    let pixels = axis(batch.get("pixelTags"));
    let doms = axis(batch.get("domTags"));
    let variables = axis(batch.get("variables"));
    let depths = axis(first_non_null(batch, &["nestedDepth", "depth"]));
    let fan_outs = axis(batch.get("fanOut"));

    let mut scenarios = Vec::new();
    for &pixel_tags in &pixels {
        for &dom_tags in &doms {
            for &variable_count in &variables {
                for &depth in &depths {
                    for &fan_out in &fan_outs {
                        let id = format!("scenario-{}", scenarios.len() + 1);
                        scenarios.push(Scenario::new(
                            id,
                            ScenarioParams {
                                pixel_tags,
                                dom_tags,
                                variables: variable_count,
                                depth,
                                fan_out,
                                iterations: defaults.iterations,
                                network_delay_ms: defaults.network_delay_ms,
                                dom_complexity: defaults.dom_complexity,
                            },
                        ));
                    }
                }
            }
        }
    }

    scenarios
}

fn document_seed(value: &Value) -> DocumentSeed {
    let defaults = DocumentSeed::default();
    DocumentSeed {
        articles: count_or(value.get("articles"), defaults.articles as u32) as usize,
        cta_per_article: count_or(value.get("ctaPerArticle"), defaults.cta_per_article as u32)
            as usize,
    }
}

fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
