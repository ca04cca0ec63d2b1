mod config;
mod container;
mod document;
mod error;
mod factory;
mod scenario;
mod simulator;
mod stats;
mod workload;

pub mod prelude {
    pub use crate::config::{build_container_config, BuildParams, ContainerConfig};
    pub use crate::container::{LoadOptions, RunResult, TagKind, TagRecord};
    pub use crate::document::{DocumentQuery, DocumentSeed, SyntheticDocument, DOM_SELECTORS};
    pub use crate::error::{DocumentError, FactoryError, SimulationError};
    pub use crate::factory::{
        example_scenarios, parse_batch, scenarios_from_payload, BatchPlan, ParamRange, Scenario,
        ScenarioDefaults, ScenarioParams, SweepPlan, MAX_NETWORK_DELAY_MS, MAX_RANGE_VALUES,
        MAX_SWEEP_SCENARIOS,
    };
    pub use crate::scenario::{ExecuteOptions, ScenarioMetrics};
    pub use crate::simulator::{Simulator, SimulatorBuilder};
    pub use crate::stats::{mean, population_std_dev};
    pub use crate::workload::{
        pixel_loop_count, variable_loop_count, DomTagResult, PixelTagResult, VariableResult,
    };
}
