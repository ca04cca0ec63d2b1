use futures::future::BoxFuture;
use futures::FutureExt;
use tag_load_core::prelude::elapsed_ms;

use crate::config::ContainerConfig;
use crate::error::SimulationError;
use crate::simulator::Simulator;

/// Extra work per pixel tag for each level of nesting.
const PIXEL_DEPTH_WEIGHT: f64 = 0.6;
/// Network delay grows by 10% for each level of nesting.
const NESTED_DELAY_GROWTH: f64 = 1.1;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LoadOptions {
    pub depth: u32,
    pub network_delay_ms: f64,
}

impl Default for LoadOptions {
    fn default() -> Self {
        Self {
            depth: 0,
            network_delay_ms: 20.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum TagKind {
    Variables,
    Pixel,
    Dom,
    Nested,
}

impl std::fmt::Display for TagKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TagKind::Variables => write!(f, "variables"),
            TagKind::Pixel => write!(f, "pixel"),
            TagKind::Dom => write!(f, "dom"),
            TagKind::Nested => write!(f, "nested"),
        }
    }
}

/// Diagnostic record of one simulated unit of work.
#[derive(Debug, Clone, PartialEq)]
pub struct TagRecord {
    pub kind: TagKind,
    pub depth: u32,
    /// Busy time for variables, total duration for everything else.
    pub duration_ms: f64,
    /// Busy time of a nested container's whole subtree.
    pub busy_ms: Option<f64>,
    /// Elements matched by a DOM tag.
    pub matches: Option<usize>,
}

/// The outcome of loading one container tree once.
#[derive(Debug, Clone, PartialEq)]
pub struct RunResult {
    /// Wall time from entering the container to leaving it.
    pub total_duration_ms: f64,
    /// CPU time summed over the whole subtree, excluding network delays.
    pub busy_time_ms: f64,
    /// Records in execution order. A nested container's records come before its own summary
    /// record.
    pub tag_details: Vec<TagRecord>,
}

impl Simulator {
    /// Load a container and, depth first, every container nested in it.
    ///
    /// Work inside a container runs strictly in order: variables, pixel tags, DOM tags, then
    /// each nested container. Nothing runs concurrently, so a container's total duration
    /// includes the full wall time of all of its children.
    pub fn load_container<'a>(
        &'a self,
        config: &'a ContainerConfig,
        options: LoadOptions,
    ) -> BoxFuture<'a, Result<RunResult, SimulationError>> {
        async move {
            let LoadOptions {
                depth,
                network_delay_ms,
            } = options;
            let start = self.clock().now();
            let mut busy_time_ms = 0.0;
            let mut tag_details = Vec::new();

            if config.variables > 0 {
                let result = self.simulate_variables(config.variables, depth as f64);
                busy_time_ms += result.busy_ms;
                tag_details.push(TagRecord {
                    kind: TagKind::Variables,
                    depth,
                    duration_ms: result.busy_ms,
                    busy_ms: None,
                    matches: None,
                });
            }

            let work_units = 1.0 + depth as f64 * PIXEL_DEPTH_WEIGHT;
            for _ in 0..config.pixel_tags {
                let result = self.simulate_pixel_tag(work_units, network_delay_ms).await;
                busy_time_ms += result.busy_ms;
                tag_details.push(TagRecord {
                    kind: TagKind::Pixel,
                    depth,
                    duration_ms: result.duration_ms,
                    busy_ms: None,
                    matches: None,
                });
            }

            for _ in 0..config.dom_tags {
                let result = self
                    .simulate_dom_tag(config.dom_complexity, network_delay_ms)
                    .await?;
                busy_time_ms += result.busy_ms;
                tag_details.push(TagRecord {
                    kind: TagKind::Dom,
                    depth,
                    duration_ms: result.duration_ms,
                    busy_ms: None,
                    matches: Some(result.matches),
                });
            }

            for child in &config.nested {
                let child_result = self
                    .load_container(
                        child,
                        LoadOptions {
                            depth: child.depth,
                            network_delay_ms: network_delay_ms * NESTED_DELAY_GROWTH,
                        },
                    )
                    .await?;
                busy_time_ms += child_result.busy_time_ms;
                tag_details.extend(child_result.tag_details);
                tag_details.push(TagRecord {
                    kind: TagKind::Nested,
                    depth: child.depth,
                    duration_ms: child_result.total_duration_ms,
                    busy_ms: Some(child_result.busy_time_ms),
                    matches: None,
                });
            }

            Ok(RunResult {
                total_duration_ms: elapsed_ms(start, self.clock().now()),
                busy_time_ms,
                tag_details,
            })
        }
        .boxed()
    }
}
