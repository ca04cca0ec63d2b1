use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use tag_load_simulator::prelude::{ParamRange, SweepPlan};

#[derive(Debug, Clone, Parser)]
#[command(name = "tag-load-sim", version, about, long_about = None)]
pub struct TagLoadCli {
    /// Where the scenarios for this batch come from
    #[command(subcommand)]
    pub source: ScenarioSource,

    /// The reporters to use for this batch.
    ///
    /// Can be given more than once. `summary` prints tables at the end of the batch, `csv` writes
    /// `--output` and `jsonl` appends to `--summary-file` as each scenario completes. `noop`
    /// discards everything.
    #[arg(long, global = true, value_enum, default_values_t = [ReporterOpt::Summary, ReporterOpt::Csv])]
    pub reporter: Vec<ReporterOpt>,

    /// Path of the CSV file written by the `csv` reporter
    #[arg(long, global = true, default_value = "benchmark-results.csv")]
    pub output: PathBuf,

    /// Path of the JSON lines file appended to by the `jsonl` reporter
    #[arg(long, global = true, default_value = "run_summary.jsonl")]
    pub summary_file: PathBuf,

    /// Seed for the simulated network delays. Runs with the same seed see the same delays.
    #[arg(long, global = true)]
    pub seed: Option<u64>,

    /// Number of articles in the synthetic document, overriding the batch file
    #[arg(long, global = true)]
    pub articles: Option<usize>,

    /// Number of call-to-action entries per article, overriding the batch file
    #[arg(long, global = true)]
    pub cta_per_article: Option<usize>,

    /// Do not show a progress bar on the CLI.
    ///
    /// This is recommended for CI/CD environments where the progress bar isn't being looked at by anyone and is just adding noise to the logs.
    #[arg(long, global = true, default_value = "false")]
    pub no_progress: bool,

    /// The id to record for this batch in the summaries. Generated if not given.
    #[arg(long, global = true)]
    pub run_id: Option<String>,
}

#[derive(Debug, Clone, Subcommand)]
pub enum ScenarioSource {
    /// Run the scenarios in a batch file, JSON or TOML (by `.toml` extension)
    Run {
        #[arg(long, short)]
        config: PathBuf,
    },
    /// Run the built-in example scenarios
    Presets,
    /// Run every combination of the given parameter ranges
    Sweep(SweepArgs),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ReporterOpt {
    Summary,
    Csv,
    Jsonl,
    Noop,
}

/// Ranges are written `start[:end[:step]]`.
#[derive(Debug, Clone, Args)]
pub struct SweepArgs {
    #[arg(long, default_value = "0:40:10")]
    pub pixels: ParamRange,

    #[arg(long, default_value = "0:20:10")]
    pub dom: ParamRange,

    #[arg(long, default_value = "0:100:50")]
    pub variables: ParamRange,

    /// Always walked one level at a time, any step is ignored
    #[arg(long, default_value = "0:2")]
    pub depth: ParamRange,

    #[arg(long, default_value_t = 2)]
    pub fan_out: u32,

    #[arg(long, default_value_t = 5)]
    pub iterations: u32,

    /// Base network delay in milliseconds
    #[arg(long, default_value_t = 20.0)]
    pub network: f64,

    #[arg(long, default_value_t = 40)]
    pub dom_complexity: u32,
}

impl SweepArgs {
    pub fn plan(&self) -> SweepPlan {
        SweepPlan {
            pixel_tags: self.pixels,
            dom_tags: self.dom,
            variables: self.variables,
            depth: self.depth,
            fan_out: self.fan_out,
            iterations: self.iterations,
            network_delay_ms: self.network,
            dom_complexity: self.dom_complexity,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cli_definition_is_valid() {
        use clap::CommandFactory;
        TagLoadCli::command().debug_assert();
    }

    #[test]
    fn defaults_for_a_sweep() {
        let cli = TagLoadCli::try_parse_from(["tag-load-sim", "sweep"]).unwrap();

        assert_eq!(cli.reporter, vec![ReporterOpt::Summary, ReporterOpt::Csv]);
        assert_eq!(cli.output, PathBuf::from("benchmark-results.csv"));

        let ScenarioSource::Sweep(args) = cli.source else {
            panic!("expected a sweep");
        };
        assert_eq!(args.pixels, ParamRange::new(0.0, 40.0, 10.0));
        assert_eq!(args.depth, ParamRange::new(0.0, 2.0, 1.0));
        assert_eq!(args.plan().scenarios().unwrap().len(), 5 * 3 * 3 * 3);
    }

    #[test]
    fn global_flags_after_the_subcommand() {
        let cli = TagLoadCli::try_parse_from([
            "tag-load-sim",
            "run",
            "--config",
            "batch.json",
            "--reporter",
            "jsonl",
            "--reporter",
            "noop",
            "--seed",
            "9",
            "--no-progress",
        ])
        .unwrap();

        assert!(matches!(cli.source, ScenarioSource::Run { .. }));
        assert_eq!(cli.reporter, vec![ReporterOpt::Jsonl, ReporterOpt::Noop]);
        assert_eq!(cli.seed, Some(9));
        assert!(cli.no_progress);
    }

    #[test]
    fn bad_range_is_rejected() {
        assert!(TagLoadCli::try_parse_from(["tag-load-sim", "sweep", "--pixels", "1:x"]).is_err());
    }
}
