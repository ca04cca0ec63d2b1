use std::path::Path;

use pretty_assertions::assert_eq;
use tag_load_runner::prelude::{run, BatchDefinitionBuilder, ReporterOpt, ScenarioSource, SweepArgs, TagLoadCli};
use tag_load_simulator::prelude::ParamRange;
use tag_load_summary_model::load_scenario_summaries;

fn sample_cli_cfg(source: ScenarioSource, dir: &Path) -> TagLoadCli {
    TagLoadCli {
        source,
        reporter: vec![ReporterOpt::Csv, ReporterOpt::Jsonl],
        output: dir.join("results").join("benchmark-results.csv"),
        summary_file: dir.join("run_summary.jsonl"),
        seed: Some(1),
        articles: Some(8),
        cta_per_article: None,
        no_progress: true,
        run_id: Some("test-run".to_string()),
    }
}

fn quick_sweep() -> ScenarioSource {
    ScenarioSource::Sweep(SweepArgs {
        pixels: ParamRange::new(0.0, 2.0, 2.0),
        dom: ParamRange::single(1.0),
        variables: ParamRange::single(3.0),
        depth: ParamRange::new(0.0, 1.0, 1.0),
        fan_out: 2,
        iterations: 2,
        network: 0.0,
        dom_complexity: 4,
    })
}

#[test]
fn sweep_reports_every_scenario() {
    let dir = tempfile::tempdir().unwrap();
    let cli = sample_cli_cfg(quick_sweep(), dir.path());

    let completed = run(BatchDefinitionBuilder::new(cli)).unwrap();
    assert_eq!(completed, 4);

    let csv = std::fs::read_to_string(dir.path().join("results").join("benchmark-results.csv"))
        .unwrap();
    let lines = csv.lines().collect::<Vec<_>>();
    assert_eq!(lines.len(), 5);
    assert!(lines[0].starts_with("\"scenario_id\",\"pixel_tags\""));
    assert!(lines[1].starts_with("\"scenario-1\",0,1,3,0,2,2,0,4,"));
    assert!(lines[4].starts_with("\"scenario-4\",2,1,3,1,2,2,0,4,"));

    let summaries = load_scenario_summaries(dir.path().join("run_summary.jsonl")).unwrap();
    assert_eq!(
        summaries
            .iter()
            .map(|s| s.scenario_id.as_str())
            .collect::<Vec<_>>(),
        vec!["scenario-1", "scenario-2", "scenario-3", "scenario-4"]
    );
    assert!(summaries.iter().all(|s| s.run_id == "test-run"));
    assert!(summaries.iter().all(|s| s.mean_load_ms >= s.mean_busy_ms));
}

#[test]
fn json_batch_file() {
    let dir = tempfile::tempdir().unwrap();
    let config = dir.path().join("batch.json");
    std::fs::write(
        &config,
        r#"{
            "iterations": 1,
            "networkDelay": 0,
            "scenarios": [
                { "name": "quote \"me\"", "pixelTags": 1, "variables": 2 },
                { "domTags": 2, "domSearchComplexity": 6 }
            ],
            "seedDom": { "articles": 4, "ctaPerArticle": 2 }
        }"#,
    )
    .unwrap();

    let cli = sample_cli_cfg(ScenarioSource::Run { config }, dir.path());
    let completed = run(BatchDefinitionBuilder::new(cli)).unwrap();
    assert_eq!(completed, 2);

    let csv = std::fs::read_to_string(dir.path().join("results").join("benchmark-results.csv"))
        .unwrap();
    let lines = csv.lines().collect::<Vec<_>>();
    assert!(lines[1].starts_with("\"quote \"\"me\"\"\",1,0,2,0,1,1,0,40,"));
    assert!(lines[2].starts_with("\"scenario-2\",0,2,0,0,1,1,0,6,"));
}

#[test]
fn empty_batch_file_fails_with_a_reason() {
    let dir = tempfile::tempdir().unwrap();
    let config = dir.path().join("empty.json");
    std::fs::write(&config, "{}").unwrap();

    let cli = sample_cli_cfg(ScenarioSource::Run { config }, dir.path());
    let err = run(BatchDefinitionBuilder::new(cli)).unwrap_err();

    assert!(format!("{err:#}").contains("No scenarios found"));
    assert!(!dir.path().join("results").exists());
}

#[test]
fn no_scenarios_is_a_no_op() {
    let dir = tempfile::tempdir().unwrap();
    let cli = sample_cli_cfg(ScenarioSource::Presets, dir.path());

    let completed = run(BatchDefinitionBuilder::new(cli).with_scenarios(vec![])).unwrap();

    assert_eq!(completed, 0);
}

#[test]
fn noop_reporter_writes_nothing() {
    let dir = tempfile::tempdir().unwrap();
    let mut cli = sample_cli_cfg(quick_sweep(), dir.path());
    cli.reporter = vec![ReporterOpt::Noop];

    let completed = run(BatchDefinitionBuilder::new(cli)).unwrap();

    assert_eq!(completed, 4);
    assert!(!dir.path().join("results").exists());
    assert!(!dir.path().join("run_summary.jsonl").exists());
}
