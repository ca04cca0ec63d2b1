use parking_lot::Mutex;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Source of the randomized network delay applied after pixel and DOM tags.
///
/// This is the only non-deterministic input to a simulation apart from host jitter, so tests
/// swap it for [FixedDelay] or [SeededDelay].
pub trait DelaySource: Send + Sync {
    /// A value in `[min, max]`, both inclusive. Bounds given in the wrong order are swapped.
    fn sample_ms(&self, min: f64, max: f64) -> f64;
}

fn ordered(min: f64, max: f64) -> (f64, f64) {
    if max < min {
        (max, min)
    } else {
        (min, max)
    }
}

/// The value to use when there is no range to sample from: equal bounds, or a span that is
/// not a finite number. Prefers a finite bound, and 0 when neither is.
fn degenerate(min: f64, max: f64) -> Option<f64> {
    if min == max {
        return Some(min);
    }
    if (max - min).is_finite() {
        return None;
    }

    Some(if min.is_finite() {
        min
    } else if max.is_finite() {
        max
    } else {
        0.0
    })
}

/// Uniform delays from the thread-local RNG.
#[derive(Debug, Default, Clone, Copy)]
pub struct ThreadRngDelay;

impl DelaySource for ThreadRngDelay {
    fn sample_ms(&self, min: f64, max: f64) -> f64 {
        let (min, max) = ordered(min, max);
        if let Some(value) = degenerate(min, max) {
            return value;
        }
        rand::thread_rng().gen_range(min..=max)
    }
}

/// Uniform delays from a seeded generator, reproducible across runs.
#[derive(Debug)]
pub struct SeededDelay {
    rng: Mutex<StdRng>,
}

impl SeededDelay {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: Mutex::new(StdRng::seed_from_u64(seed)),
        }
    }
}

impl DelaySource for SeededDelay {
    fn sample_ms(&self, min: f64, max: f64) -> f64 {
        let (min, max) = ordered(min, max);
        if let Some(value) = degenerate(min, max) {
            return value;
        }
        self.rng.lock().gen_range(min..=max)
    }
}

/// Always picks the same relative position in the range. `0.0` gives the lower bound, `1.0`
/// the upper bound.
#[derive(Debug, Clone, Copy)]
pub struct FixedDelay {
    fraction: f64,
}

impl FixedDelay {
    pub fn new(fraction: f64) -> Self {
        Self {
            fraction: fraction.clamp(0.0, 1.0),
        }
    }

    pub fn lower_bound() -> Self {
        Self::new(0.0)
    }
}

impl DelaySource for FixedDelay {
    fn sample_ms(&self, min: f64, max: f64) -> f64 {
        let (min, max) = ordered(min, max);
        degenerate(min, max).unwrap_or_else(|| min + self.fraction * (max - min))
    }
}
