use std::time::Duration;

use futures::future::BoxFuture;
use futures::FutureExt;

/// A monotonic clock with an async sleep.
///
/// Everything that measures busy time or total duration reads time through this trait, so a
/// test can run against a paused runtime and get exact numbers.
pub trait Clock: Send + Sync {
    /// Time since an arbitrary, fixed origin. Never goes backwards.
    fn now(&self) -> Duration;

    /// Suspend the current task for `duration`.
    fn sleep(&self, duration: Duration) -> BoxFuture<'static, ()>;
}

/// Clock backed by the tokio timer.
///
/// Uses [tokio::time::Instant] rather than [std::time::Instant] so that tests running with a
/// paused runtime see time advance only through sleeps.
#[derive(Debug, Clone)]
pub struct TokioClock {
    origin: tokio::time::Instant,
}

impl Default for TokioClock {
    fn default() -> Self {
        Self::new()
    }
}

impl TokioClock {
    pub fn new() -> Self {
        Self {
            origin: tokio::time::Instant::now(),
        }
    }
}

impl Clock for TokioClock {
    fn now(&self) -> Duration {
        tokio::time::Instant::now().duration_since(self.origin)
    }

    fn sleep(&self, duration: Duration) -> BoxFuture<'static, ()> {
        tokio::time::sleep(duration).boxed()
    }
}

/// Milliseconds between two clock readings, as a float.
pub fn elapsed_ms(start: Duration, end: Duration) -> f64 {
    end.saturating_sub(start).as_nanos() as f64 / 1_000_000.0
}
