use tag_load_core::prelude::ScenarioCancelledError;

use crate::config::ContainerConfig;
use crate::container::{LoadOptions, RunResult, TagRecord};
use crate::error::SimulationError;
use crate::simulator::Simulator;
use crate::stats::{mean, population_std_dev};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ExecuteOptions {
    pub iterations: u32,
    pub network_delay_ms: f64,
}

impl Default for ExecuteOptions {
    fn default() -> Self {
        Self {
            iterations: 5,
            network_delay_ms: 20.0,
        }
    }
}

/// Aggregate timings over the repeated runs of one scenario.
#[derive(Debug, Clone, PartialEq)]
pub struct ScenarioMetrics {
    pub mean_load_ms: f64,
    pub mean_busy_ms: f64,
    /// Population standard deviation of the total durations.
    pub std_deviation_ms: f64,
    /// Every run, in the order it was executed.
    pub raw_runs: Vec<RunResult>,
}

impl ScenarioMetrics {
    /// Aggregate the given runs, `None` if there are none.
    pub fn from_runs(raw_runs: Vec<RunResult>) -> Option<Self> {
        let loads = raw_runs
            .iter()
            .map(|run| run.total_duration_ms)
            .collect::<Vec<_>>();
        let busy = raw_runs
            .iter()
            .map(|run| run.busy_time_ms)
            .collect::<Vec<_>>();

        Some(Self {
            mean_load_ms: mean(&loads)?,
            mean_busy_ms: mean(&busy)?,
            std_deviation_ms: population_std_dev(&loads)?,
            raw_runs,
        })
    }

    pub fn min_load_ms(&self) -> f64 {
        self.raw_runs
            .iter()
            .map(|run| run.total_duration_ms)
            .fold(f64::INFINITY, f64::min)
    }

    pub fn max_load_ms(&self) -> f64 {
        self.raw_runs
            .iter()
            .map(|run| run.total_duration_ms)
            .fold(f64::NEG_INFINITY, f64::max)
    }

    /// Tag records of every run, concatenated in run order.
    pub fn tag_records(&self) -> impl Iterator<Item = &TagRecord> {
        self.raw_runs.iter().flat_map(|run| run.tag_details.iter())
    }
}

impl Simulator {
    /// Load the container `iterations` times, one after another, and aggregate the timings.
    ///
    /// Each iteration starts again at depth 0 with the base network delay. If this simulator has
    /// a shutdown listener it is checked before every iteration, and a requested shutdown ends
    /// the scenario with [SimulationError::Cancelled].
    pub async fn execute_scenario(
        &self,
        config: &ContainerConfig,
        options: ExecuteOptions,
    ) -> Result<ScenarioMetrics, SimulationError> {
        if options.iterations == 0 {
            return Err(SimulationError::NoIterations);
        }

        let mut raw_runs = Vec::with_capacity(options.iterations as usize);
        for iteration in 1..=options.iterations {
            if self.is_shutdown_requested() {
                log::info!(
                    "Stopping scenario after {} of {} iterations",
                    raw_runs.len(),
                    options.iterations
                );
                return Err(ScenarioCancelledError::default().into());
            }

            let run = self
                .load_container(
                    config,
                    LoadOptions {
                        depth: 0,
                        network_delay_ms: options.network_delay_ms,
                    },
                )
                .await?;

            log::debug!(
                "Iteration {iteration}/{}: load {:.3}ms, busy {:.3}ms, {} tag records",
                options.iterations,
                run.total_duration_ms,
                run.busy_time_ms,
                run.tag_details.len()
            );
            raw_runs.push(run);
        }

        ScenarioMetrics::from_runs(raw_runs).ok_or(SimulationError::NoIterations)
    }
}
