use crate::cli::TagLoadCli;
use clap::Parser;

/// Initialise the CLI and logging for the tag load runner.
pub fn init() -> TagLoadCli {
    env_logger::init();

    TagLoadCli::parse()
}
