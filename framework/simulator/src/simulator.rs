use std::sync::Arc;

use tag_load_core::prelude::{
    Clock, DelaySource, DelegatedShutdownListener, ThreadRngDelay, TokioClock,
};

use crate::document::{DocumentQuery, SyntheticDocument};

/// Runs synthetic container loads against injected collaborators.
///
/// The document, clock and delay source are all provided from outside so that a test can swap
/// in a paused clock and a fixed delay and get exact timings.
pub struct Simulator {
    document: Arc<dyn DocumentQuery>,
    clock: Arc<dyn Clock>,
    delays: Arc<dyn DelaySource>,
    shutdown_listener: Option<DelegatedShutdownListener>,
}

impl std::fmt::Debug for Simulator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Simulator")
            .field("cancellable", &self.shutdown_listener.is_some())
            .finish_non_exhaustive()
    }
}

impl Simulator {
    pub fn builder() -> SimulatorBuilder {
        SimulatorBuilder::default()
    }

    pub(crate) fn document(&self) -> &dyn DocumentQuery {
        self.document.as_ref()
    }

    pub(crate) fn clock(&self) -> &dyn Clock {
        self.clock.as_ref()
    }

    pub(crate) fn delays(&self) -> &dyn DelaySource {
        self.delays.as_ref()
    }

    /// True once a shutdown has been signalled to the listener this simulator was built with.
    pub fn is_shutdown_requested(&self) -> bool {
        self.shutdown_listener
            .as_ref()
            .is_some_and(DelegatedShutdownListener::should_shutdown)
    }
}

/// Builder for a [Simulator].
///
/// Anything not provided falls back to the default synthetic document, the tokio clock and
/// thread-local random delays.
#[derive(Default)]
pub struct SimulatorBuilder {
    document: Option<Arc<dyn DocumentQuery>>,
    clock: Option<Arc<dyn Clock>>,
    delays: Option<Arc<dyn DelaySource>>,
    shutdown_listener: Option<DelegatedShutdownListener>,
}

impl SimulatorBuilder {
    pub fn with_document(mut self, document: Arc<dyn DocumentQuery>) -> Self {
        self.document = Some(document);
        self
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = Some(clock);
        self
    }

    pub fn with_delay_source(mut self, delays: Arc<dyn DelaySource>) -> Self {
        self.delays = Some(delays);
        self
    }

    /// Checked between iterations, see [Simulator::execute_scenario].
    pub fn with_shutdown_listener(mut self, listener: DelegatedShutdownListener) -> Self {
        self.shutdown_listener = Some(listener);
        self
    }

    pub fn build(self) -> Simulator {
        Simulator {
            document: self
                .document
                .unwrap_or_else(|| Arc::new(SyntheticDocument::default())),
            clock: self.clock.unwrap_or_else(|| Arc::new(TokioClock::new())),
            delays: self.delays.unwrap_or_else(|| Arc::new(ThreadRngDelay)),
            shutdown_listener: self.shutdown_listener,
        }
    }
}
