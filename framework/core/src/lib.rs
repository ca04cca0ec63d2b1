mod cancelled;
mod clock;
mod delay;
mod shutdown;

pub mod prelude {
    pub use crate::cancelled::ScenarioCancelledError;
    pub use crate::clock::{elapsed_ms, Clock, TokioClock};
    pub use crate::delay::{DelaySource, FixedDelay, SeededDelay, ThreadRngDelay};
    pub use crate::shutdown::{DelegatedShutdownListener, ShutdownHandle};
}
