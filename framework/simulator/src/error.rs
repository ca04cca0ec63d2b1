use tag_load_core::prelude::ScenarioCancelledError;

#[derive(Debug, thiserror::Error)]
pub enum SimulationError {
    #[error("Document query failed: {0}")]
    Document(#[from] DocumentError),
    #[error("A scenario needs at least one iteration")]
    NoIterations,
    #[error(transparent)]
    Cancelled(#[from] ScenarioCancelledError),
}

impl SimulationError {
    pub fn is_cancelled(&self) -> bool {
        matches!(self, SimulationError::Cancelled(_))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DocumentError {
    #[error("Invalid selector `{selector}`: {reason}")]
    InvalidSelector { selector: String, reason: String },
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FactoryError {
    #[error("Malformed batch payload: {0}")]
    MalformedPayload(String),
    #[error("No scenarios found: {0}")]
    NoScenarios(String),
    #[error("Invalid range `{range}`: {reason}")]
    InvalidRange { range: String, reason: String },
    #[error("A sweep of {count} scenarios is over the limit of {limit}")]
    SweepTooLarge { count: u128, limit: usize },
}
