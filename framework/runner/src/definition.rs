use std::path::Path;

use anyhow::Context;
use serde_json::Value;
use tag_load_instruments::ReportConfig;
use tag_load_simulator::prelude::{example_scenarios, parse_batch, DocumentSeed, Scenario};

use crate::cli::{ReporterOpt, ScenarioSource, TagLoadCli};

/// The builder for a batch definition.
///
/// Starts from the command line and resolves the scenario source when built. Scenarios can also
/// be supplied directly, which skips the source on the command line.
pub struct BatchDefinitionBuilder {
    /// This value is initialised from the command line and you cannot change it.
    #[doc(hidden)]
    cli: TagLoadCli,
    /// Scenarios to run instead of the ones named by the command line.
    scenarios: Option<Vec<Scenario>>,
}

#[derive(Debug)]
pub struct BatchDefinition {
    pub name: String,
    pub scenarios: Vec<Scenario>,
    pub document_seed: DocumentSeed,
    pub delay_seed: Option<u64>,
    pub report: ReportConfig,
    pub no_progress: bool,
    pub run_id: Option<String>,
}

impl BatchDefinitionBuilder {
    pub fn new(cli: TagLoadCli) -> Self {
        Self {
            cli,
            scenarios: None,
        }
    }

    /// Run these scenarios, in order, instead of the command line's scenario source.
    pub fn with_scenarios(mut self, scenarios: Vec<Scenario>) -> Self {
        self.scenarios = Some(scenarios);
        self
    }

    pub(crate) fn build(self) -> anyhow::Result<BatchDefinition> {
        let cli = self.cli;

        let (name, scenarios, payload_seed) = match (self.scenarios, &cli.source) {
            (Some(scenarios), _) => ("custom".to_string(), scenarios, None),
            (None, ScenarioSource::Run { config }) => {
                let payload = load_payload(config)?;
                let plan = parse_batch(&payload)
                    .with_context(|| format!("Invalid batch file {}", config.display()))?;
                (batch_name(config), plan.scenarios, plan.seed)
            }
            (None, ScenarioSource::Presets) => ("presets".to_string(), example_scenarios(), None),
            (None, ScenarioSource::Sweep(args)) => {
                let scenarios = args.plan().scenarios().context("Invalid sweep")?;
                ("sweep".to_string(), scenarios, None)
            }
        };

        let mut document_seed = payload_seed.unwrap_or_default();
        if let Some(articles) = cli.articles {
            document_seed = document_seed.articles(articles);
        }
        if let Some(cta_per_article) = cli.cta_per_article {
            document_seed = document_seed.cta_per_article(cta_per_article);
        }

        Ok(BatchDefinition {
            name,
            scenarios,
            document_seed,
            delay_seed: cli.seed,
            report: report_config(&cli),
            no_progress: cli.no_progress,
            run_id: cli.run_id,
        })
    }
}

/// Read a batch file. `.toml` files are parsed as TOML, everything else as JSON.
fn load_payload(path: &Path) -> anyhow::Result<Value> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read batch file {}", path.display()))?;

    let is_toml = path
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("toml"));

    if is_toml {
        toml::from_str(&raw).with_context(|| format!("Failed to parse TOML in {}", path.display()))
    } else {
        serde_json::from_str(&raw)
            .with_context(|| format!("Failed to parse JSON in {}", path.display()))
    }
}

fn batch_name(path: &Path) -> String {
    path.file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_else(|| "batch".to_string())
}

fn report_config(cli: &TagLoadCli) -> ReportConfig {
    cli.reporter
        .iter()
        .fold(ReportConfig::default(), |config, reporter| match reporter {
            ReporterOpt::Summary => config.enable_summary(),
            ReporterOpt::Csv => config.enable_csv(cli.output.clone()),
            ReporterOpt::Jsonl => config.enable_jsonl(cli.summary_file.clone()),
            ReporterOpt::Noop => config,
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    fn cli(args: &[&str]) -> TagLoadCli {
        TagLoadCli::try_parse_from(std::iter::once("tag-load-sim").chain(args.iter().copied()))
            .unwrap()
    }

    #[test]
    fn toml_batch_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nightly.toml");
        std::fs::write(
            &path,
            r#"
iterations = 2
pixelTags = [1, 2]

[seedDom]
articles = 6
"#,
        )
        .unwrap();

        let definition = BatchDefinitionBuilder::new(cli(&[
            "run",
            "--config",
            path.to_str().unwrap(),
            "--cta-per-article",
            "3",
        ]))
        .build()
        .unwrap();

        assert_eq!(definition.name, "nightly");
        assert_eq!(definition.scenarios.len(), 2);
        assert_eq!(definition.scenarios[0].params.iterations, 2);
        assert_eq!(
            definition.document_seed,
            DocumentSeed {
                articles: 6,
                cta_per_article: 3
            }
        );
    }

    #[test]
    fn empty_json_batch_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("empty.json");
        std::fs::write(&path, "{}").unwrap();

        let err = BatchDefinitionBuilder::new(cli(&["run", "--config", path.to_str().unwrap()]))
            .build()
            .unwrap_err();

        assert!(err.to_string().starts_with("Invalid batch file"));
        assert!(format!("{err:#}").contains("No scenarios found"));
    }

    #[test]
    fn missing_batch_file_is_an_error() {
        let err = BatchDefinitionBuilder::new(cli(&["run", "--config", "does-not-exist.json"]))
            .build()
            .unwrap_err();

        assert!(err.to_string().contains("Failed to read batch file"));
    }

    #[test]
    fn presets_and_seed_flags() {
        let definition = BatchDefinitionBuilder::new(cli(&["presets", "--seed", "3", "--articles", "10"]))
            .build()
            .unwrap();

        assert_eq!(definition.name, "presets");
        assert_eq!(definition.scenarios.len(), 3);
        assert_eq!(definition.delay_seed, Some(3));
        assert_eq!(definition.document_seed, DocumentSeed::default().articles(10));
    }

    #[test]
    fn oversized_sweep_is_an_error() {
        let err = BatchDefinitionBuilder::new(cli(&[
            "sweep",
            "--pixels",
            "0:5000",
            "--dom",
            "0:5000",
        ]))
        .build()
        .unwrap_err();

        assert_eq!(err.to_string(), "Invalid sweep");
        assert!(format!("{err:#}").contains("over the limit"));
    }

    #[test]
    fn explicit_scenarios_replace_the_source() {
        let definition = BatchDefinitionBuilder::new(cli(&["presets"]))
            .with_scenarios(vec![])
            .build()
            .unwrap();

        assert!(definition.scenarios.is_empty());
    }
}
