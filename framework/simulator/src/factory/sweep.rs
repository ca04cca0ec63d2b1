use std::fmt;
use std::str::FromStr;

use crate::error::FactoryError;
use crate::factory::{Scenario, ScenarioParams};

/// Most values a single range may produce.
pub const MAX_RANGE_VALUES: usize = 10_000;
/// Most scenarios a sweep may expand into.
pub const MAX_SWEEP_SCENARIOS: usize = 100_000;

const RANGE_SYNTAX: &str = "expected `start[:end[:step]]`";

/// An inclusive `start..=end` range walked in `step` increments, written `start[:end[:step]]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParamRange {
    pub start: f64,
    pub end: f64,
    pub step: f64,
}

impl ParamRange {
    pub fn new(start: f64, end: f64, step: f64) -> Self {
        Self { start, end, step }
    }

    pub fn single(value: f64) -> Self {
        Self::new(value, value, 1.0)
    }

    /// Every value in the range, rounded to the nearest non-negative integer.
    ///
    /// A step that is not positive is treated as 1 and reversed bounds are swapped, so a valid
    /// range is never empty. Ranges with more than [MAX_RANGE_VALUES] values, or whose step is
    /// too small to move past `start`, are rejected.
    pub fn values(&self) -> Result<Vec<u32>, FactoryError> {
        let step = if self.step > 0.0 && self.step.is_finite() {
            self.step
        } else {
            1.0
        };
        let (start, end) = if self.end < self.start {
            (self.end, self.start)
        } else {
            (self.start, self.end)
        };

        if !start.is_finite() || !end.is_finite() {
            return Err(self.invalid("bounds must be finite numbers"));
        }
        if start < end && start + step == start {
            return Err(self.invalid("step is too small to advance from start"));
        }

        let last = ((end - start) / step).floor();
        if last >= MAX_RANGE_VALUES as f64 {
            return Err(self.invalid(&format!(
                "produces more than {MAX_RANGE_VALUES} values"
            )));
        }

        Ok((0..=last as usize)
            .map(|i| (start + i as f64 * step).round().max(0.0) as u32)
            .collect())
    }

    fn invalid(&self, reason: &str) -> FactoryError {
        FactoryError::InvalidRange {
            range: self.to_string(),
            reason: reason.to_string(),
        }
    }

    fn with_step(self, step: f64) -> Self {
        Self { step, ..self }
    }
}

impl fmt::Display for ParamRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}:{}", self.start, self.end, self.step)
    }
}

impl FromStr for ParamRange {
    type Err = FactoryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || FactoryError::InvalidRange {
            range: s.to_string(),
            reason: RANGE_SYNTAX.to_string(),
        };

        let parts = s
            .split(':')
            .map(|part| part.trim().parse::<f64>())
            .collect::<Result<Vec<_>, _>>()
            .map_err(|_| invalid())?;

        if parts.iter().any(|part| !part.is_finite()) {
            return Err(invalid());
        }

        let range = match parts.as_slice() {
            [value] => Self::single(*value),
            [start, end] => Self::new(*start, *end, 1.0),
            [start, end, step] => Self::new(*start, *end, *step),
            _ => return Err(invalid()),
        };

        // Catch oversized ranges while parsing the command line.
        range.values()?;
        Ok(range)
    }
}

/// A sweep across pixel, DOM, variable and depth ranges. Every other parameter is shared.
#[derive(Debug, Clone, PartialEq)]
pub struct SweepPlan {
    pub pixel_tags: ParamRange,
    pub dom_tags: ParamRange,
    pub variables: ParamRange,
    /// Always walked one level at a time.
    pub depth: ParamRange,
    pub fan_out: u32,
    pub iterations: u32,
    pub network_delay_ms: f64,
    pub dom_complexity: u32,
}

impl Default for SweepPlan {
    fn default() -> Self {
        Self {
            pixel_tags: ParamRange::new(0.0, 40.0, 10.0),
            dom_tags: ParamRange::new(0.0, 20.0, 10.0),
            variables: ParamRange::new(0.0, 100.0, 50.0),
            depth: ParamRange::new(0.0, 2.0, 1.0),
            fan_out: 2,
            iterations: 5,
            network_delay_ms: 20.0,
            dom_complexity: 40,
        }
    }
}

impl SweepPlan {
    /// Expand the sweep into scenarios `scenario-1..`, pixel tags varying slowest and depth
    /// fastest. Fails if a range is invalid or the sweep has more than [MAX_SWEEP_SCENARIOS]
    /// scenarios.
    pub fn scenarios(&self) -> Result<Vec<Scenario>, FactoryError> {
        let pixels = self.pixel_tags.values()?;
        let doms = self.dom_tags.values()?;
        let variables = self.variables.values()?;
        let depths = self.depth.with_step(1.0).values()?;

        let count = [pixels.len(), doms.len(), variables.len(), depths.len()]
            .iter()
            .map(|&len| len as u128)
            .product::<u128>();
        if count > MAX_SWEEP_SCENARIOS as u128 {
            return Err(FactoryError::SweepTooLarge {
                count,
                limit: MAX_SWEEP_SCENARIOS,
            });
        }

        let mut scenarios = Vec::with_capacity(count as usize);
        for &pixel_tags in &pixels {
            for &dom_tags in &doms {
                for &variable_count in &variables {
                    for &depth in &depths {
                        let id = format!("scenario-{}", scenarios.len() + 1);
                        scenarios.push(Scenario::new(
                            id,
                            ScenarioParams {
                                pixel_tags,
                                dom_tags,
                                variables: variable_count,
                                depth,
                                fan_out: self.fan_out,
                                iterations: self.iterations,
                                network_delay_ms: self.network_delay_ms,
                                dom_complexity: self.dom_complexity,
                            },
                        ));
                    }
                }
            }
        }

        log::debug!("Sweep expanded into {} scenarios", scenarios.len());
        Ok(scenarios)
    }
}
