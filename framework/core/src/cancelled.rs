/// Returned when a scenario or batch run is cut short by a shutdown signal.
///
/// Work that completed before the signal is still valid and should be reported. Only the
/// iteration or scenario that was about to start is skipped.
#[derive(derive_more::Error, derive_more::Display, Debug, Clone, PartialEq, Eq)]
pub struct ScenarioCancelledError {
    msg: String,
}

impl ScenarioCancelledError {
    pub fn new(msg: impl Into<String>) -> Self {
        Self { msg: msg.into() }
    }
}

impl Default for ScenarioCancelledError {
    fn default() -> Self {
        Self {
            msg: "Execution cancelled by shutdown signal".to_string(),
        }
    }
}
