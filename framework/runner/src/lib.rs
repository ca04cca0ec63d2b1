mod cli;
mod definition;
mod executor;
mod init;
mod progress;
mod run;
mod shutdown;

pub mod prelude {
    pub use crate::cli::{ReporterOpt, ScenarioSource, SweepArgs, TagLoadCli};
    pub use crate::definition::{BatchDefinition, BatchDefinitionBuilder};
    pub use crate::init::init;
    pub use crate::run::run;
}
