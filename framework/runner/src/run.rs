use std::sync::Arc;

use anyhow::Context;
use tag_load_core::prelude::{DelaySource, ScenarioCancelledError, SeededDelay, ThreadRngDelay};
use tag_load_simulator::prelude::{
    Scenario, ScenarioMetrics, SimulationError, Simulator, SyntheticDocument,
};
use tag_load_summary_model::ScenarioSummary;

use crate::definition::BatchDefinitionBuilder;
use crate::executor::Executor;
use crate::progress::start_progress;
use crate::shutdown::start_shutdown_listener;

/// Run every scenario in the batch, one after another, and report the results.
///
/// Returns the number of scenarios that completed. A Ctrl-C abandons the scenario in progress at
/// its next network wait, partway through an iteration. That scenario is not reported, the ones
/// that completed before it are.
pub fn run(definition: BatchDefinitionBuilder) -> anyhow::Result<usize> {
    let definition = definition.build()?;
    let run_id = definition
        .run_id
        .clone()
        .unwrap_or_else(|| nanoid::nanoid!());

    log::info!(
        "Running batch: {} ({} scenarios, run id {run_id})",
        definition.name,
        definition.scenarios.len()
    );

    // Everything runs on one thread so that no two scenarios or iterations ever overlap.
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("Failed to create Tokio runtime")?;
    let shutdown_handle = start_shutdown_listener(&runtime)?;
    let executor = Executor::new(runtime, shutdown_handle.clone());
    let reporter = definition.report.clone().init();

    if definition.scenarios.is_empty() {
        log::warn!("No scenarios to run");
        reporter.finalize()?;
        return Ok(0);
    }

    let delays: Arc<dyn DelaySource> = match definition.delay_seed {
        Some(seed) => {
            log::info!("Using seeded network delays, seed {seed}");
            Arc::new(SeededDelay::new(seed))
        }
        None => Arc::new(ThreadRngDelay),
    };
    let simulator = Simulator::builder()
        .with_document(Arc::new(SyntheticDocument::seed(definition.document_seed)))
        .with_delay_source(delays)
        .with_shutdown_listener(shutdown_handle.new_listener())
        .build();

    let progress = start_progress(definition.scenarios.len(), definition.no_progress);
    // For us to check if the batch should stop between scenarios
    let cycle_shutdown_receiver = shutdown_handle.new_listener();

    let mut completed = 0;
    for scenario in &definition.scenarios {
        if cycle_shutdown_receiver.should_shutdown() {
            log::info!("Stopping batch after {completed} scenarios");
            break;
        }

        log::info!(
            "Running scenario {}: pixels {}, dom {}, vars {}, depth {}, fan-out {}, iterations {}, network {}ms",
            scenario.id,
            scenario.params.pixel_tags,
            scenario.params.dom_tags,
            scenario.params.variables,
            scenario.params.depth,
            scenario.params.fan_out,
            scenario.params.iterations,
            scenario.params.network_delay_ms,
        );
        progress.set_message(scenario.id.clone());

        let started_at = chrono::Utc::now().timestamp();
        let result = executor.execute_in_place(async {
            // Let anything else queued on the runtime run between scenarios.
            tokio::task::yield_now().await;

            simulator
                .execute_scenario(&scenario.config, scenario.params.execute_options())
                .await
                .map_err(|e| match e {
                    SimulationError::Cancelled(cancelled) => anyhow::Error::new(cancelled),
                    e => anyhow::Error::new(e),
                })
        });

        let metrics = match result {
            Ok(metrics) => metrics,
            Err(e) if e.is::<ScenarioCancelledError>() => {
                log::warn!("Scenario {} was cancelled", scenario.id);
                break;
            }
            Err(e) => {
                progress.abandon();
                return Err(e).with_context(|| format!("Scenario {} failed", scenario.id));
            }
        };

        log::info!(
            "Completed {}: mean load {:.3}ms, mean busy {:.3}ms, std dev {:.3}ms",
            scenario.id,
            metrics.mean_load_ms,
            metrics.mean_busy_ms,
            metrics.std_deviation_ms
        );

        for run in &metrics.raw_runs {
            reporter.add_tag_records(&scenario.id, &run.tag_details);
        }
        reporter.add_scenario(&scenario_summary(&run_id, started_at, scenario, &metrics));

        completed += 1;
        progress.inc(1);
    }

    progress.finish_and_clear();
    reporter.finalize()?;

    Ok(completed)
}

fn scenario_summary(
    run_id: &str,
    started_at: i64,
    scenario: &Scenario,
    metrics: &ScenarioMetrics,
) -> ScenarioSummary {
    ScenarioSummary {
        run_id: run_id.to_string(),
        scenario_id: scenario.id.clone(),
        started_at,
        pixel_tags: scenario.params.pixel_tags,
        dom_tags: scenario.params.dom_tags,
        variables: scenario.params.variables,
        nested_depth: scenario.params.depth,
        fan_out: scenario.params.fan_out,
        iterations: scenario.params.iterations,
        network_delay_ms: scenario.params.network_delay_ms,
        dom_complexity: scenario.params.dom_complexity,
        mean_load_ms: metrics.mean_load_ms,
        mean_busy_ms: metrics.mean_busy_ms,
        std_deviation_ms: metrics.std_deviation_ms,
        tool_version: env!("CARGO_PKG_VERSION").to_string(),
    }
}
