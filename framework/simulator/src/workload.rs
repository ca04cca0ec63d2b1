use std::hint::black_box;
use std::time::Duration;

use tag_load_core::prelude::elapsed_ms;

use crate::document::DOM_SELECTORS;
use crate::error::SimulationError;
use crate::simulator::Simulator;

const VARIABLE_LOOP_MULTIPLIER: u64 = 320;
const PIXEL_LOOP_MULTIPLIER: f64 = 50.0;
const VARIABLE_DEPTH_WEIGHT: f64 = 0.4;

const PIXEL_DELAY_RANGE: (f64, f64) = (0.6, 1.4);
const DOM_DELAY_RANGE: (f64, f64) = (0.7, 1.6);

/// Busy-loop iterations for resolving `count` variables at `depth_factor`.
pub fn variable_loop_count(count: u32, depth_factor: f64) -> u64 {
    let loops = (count as f64 * (1.0 + depth_factor * VARIABLE_DEPTH_WEIGHT))
        .round()
        .max(1.0);
    (loops as u64).saturating_mul(VARIABLE_LOOP_MULTIPLIER)
}

/// Busy-loop iterations for one pixel tag with the given work units.
pub fn pixel_loop_count(work_units: f64) -> u64 {
    (work_units * PIXEL_LOOP_MULTIPLIER).max(1.0).ceil() as u64
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VariableResult {
    pub busy_ms: f64,
    pub checksum: u64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PixelTagResult {
    /// CPU portion only.
    pub busy_ms: f64,
    /// CPU plus simulated network delay.
    pub duration_ms: f64,
    pub accumulator: u64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DomTagResult {
    pub busy_ms: f64,
    pub duration_ms: f64,
    pub matches: usize,
}

impl Simulator {
    async fn network_wait(&self, delay_ms: f64) {
        if delay_ms.is_finite() && delay_ms > 0.0 {
            // Whole nanoseconds, so float noise in the scaled delay never spills into the next tick.
            let nanos = (delay_ms * 1_000_000.0).round() as u64;
            self.clock().sleep(Duration::from_nanos(nanos)).await;
        }
    }

    /// Spin through integer arithmetic proportional to the variable count and depth.
    pub fn simulate_variables(&self, count: u32, depth_factor: f64) -> VariableResult {
        let start = self.clock().now();

        let loops = variable_loop_count(count, depth_factor);
        let mut checksum: u64 = 0;
        for i in 0..loops {
            checksum = (checksum.wrapping_add(black_box(i) % 7)) ^ (checksum << 1);
        }

        let busy_ms = elapsed_ms(start, self.clock().now());
        log::trace!("Resolved {count} variables at depth factor {depth_factor} in {busy_ms:.3}ms");

        VariableResult {
            busy_ms,
            checksum: black_box(checksum),
        }
    }

    /// A short busy loop followed by a simulated network round trip.
    pub async fn simulate_pixel_tag(&self, work_units: f64, network_delay_ms: f64) -> PixelTagResult {
        let start = self.clock().now();

        let mut accumulator: u64 = 0;
        for i in 0..pixel_loop_count(work_units) {
            accumulator = accumulator.wrapping_add(black_box(i).wrapping_mul(17) % 5);
        }
        let busy_ms = elapsed_ms(start, self.clock().now());

        let delay_ms = self.delays().sample_ms(
            network_delay_ms * PIXEL_DELAY_RANGE.0,
            network_delay_ms * PIXEL_DELAY_RANGE.1,
        );
        self.network_wait(delay_ms).await;

        let duration_ms = elapsed_ms(start, self.clock().now());
        log::trace!("Pixel tag busy {busy_ms:.3}ms, total {duration_ms:.3}ms");

        PixelTagResult {
            busy_ms,
            duration_ms,
            accumulator: black_box(accumulator),
        }
    }

    /// Run `complexity` selector queries against the document, then a simulated network round
    /// trip. Query failures are fatal for the run.
    pub async fn simulate_dom_tag(
        &self,
        complexity: u32,
        network_delay_ms: f64,
    ) -> Result<DomTagResult, SimulationError> {
        let start = self.clock().now();

        let mut matches = 0;
        for selector in DOM_SELECTORS.iter().cycle().take(complexity as usize) {
            matches += self.document().count_matches(selector)?;
        }
        let busy_ms = elapsed_ms(start, self.clock().now());

        let delay_ms = self.delays().sample_ms(
            network_delay_ms * DOM_DELAY_RANGE.0,
            network_delay_ms * DOM_DELAY_RANGE.1,
        );
        self.network_wait(delay_ms).await;

        let duration_ms = elapsed_ms(start, self.clock().now());
        log::trace!("DOM tag matched {matches} elements, busy {busy_ms:.3}ms, total {duration_ms:.3}ms");

        Ok(DomTagResult {
            busy_ms,
            duration_ms,
            matches,
        })
    }
}
