mod report;

use std::path::PathBuf;

use anyhow::Context;
use parking_lot::Mutex;
use tag_load_simulator::prelude::TagRecord;
use tag_load_summary_model::ScenarioSummary;

pub use report::{
    CsvReportCollector, JsonlReportCollector, ReportCollector, SummaryReportCollector,
};

/// Selects which collectors a [Reporter] fans out to.
#[derive(Debug, Clone, Default)]
pub struct ReportConfig {
    enable_summary: bool,
    csv_path: Option<PathBuf>,
    jsonl_path: Option<PathBuf>,
}

impl ReportConfig {
    /// Print scenario and tag tables when the batch finishes.
    pub fn enable_summary(mut self) -> Self {
        self.enable_summary = true;
        self
    }

    /// Write every scenario as a delimited row to `path` when the batch finishes.
    pub fn enable_csv(mut self, path: impl Into<PathBuf>) -> Self {
        self.csv_path = Some(path.into());
        self
    }

    /// Append every scenario to `path` as a JSON line as soon as it completes.
    pub fn enable_jsonl(mut self, path: impl Into<PathBuf>) -> Self {
        self.jsonl_path = Some(path.into());
        self
    }

    pub fn init(self) -> Reporter {
        let mut collectors: Vec<Box<dyn ReportCollector + Send>> = Vec::new();

        if self.enable_summary {
            collectors.push(Box::new(SummaryReportCollector::new()));
        }

        if let Some(path) = self.csv_path {
            collectors.push(Box::new(CsvReportCollector::new(path)));
        }

        if let Some(path) = self.jsonl_path {
            collectors.push(Box::new(JsonlReportCollector::new(path)));
        }

        log::debug!("Initialised reporter with {} collectors", collectors.len());

        Reporter {
            inner: Mutex::new(collectors),
        }
    }
}

/// Fans results out to every enabled [ReportCollector].
///
/// A reporter with no collectors accepts and discards everything.
pub struct Reporter {
    inner: Mutex<Vec<Box<dyn ReportCollector + Send>>>,
}

impl Reporter {
    pub fn add_scenario(&self, summary: &ScenarioSummary) {
        for collector in self.inner.lock().iter_mut() {
            collector.add_scenario(summary);
        }
    }

    pub fn add_tag_records(&self, scenario_id: &str, records: &[TagRecord]) {
        for collector in self.inner.lock().iter_mut() {
            collector.add_tag_records(scenario_id, records);
        }
    }

    /// Finalize every collector, even if an earlier one fails. The first failure is returned.
    pub fn finalize(&self) -> anyhow::Result<()> {
        let mut first_error = None;

        for (index, collector) in self.inner.lock().iter().enumerate() {
            if let Err(e) = collector.finalize() {
                log::error!("Report collector {index} failed to finalize: {e:?}");
                first_error.get_or_insert(e);
            }
        }

        match first_error {
            Some(e) => Err(e).context("Failed to finalize reports"),
            None => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn summary(scenario_id: &str) -> ScenarioSummary {
        ScenarioSummary {
            run_id: "test-run".to_string(),
            scenario_id: scenario_id.to_string(),
            started_at: 0,
            pixel_tags: 3,
            dom_tags: 1,
            variables: 10,
            nested_depth: 1,
            fan_out: 2,
            iterations: 2,
            network_delay_ms: 20.0,
            dom_complexity: 40,
            mean_load_ms: 101.25,
            mean_busy_ms: 1.5,
            std_deviation_ms: 2.0,
            tool_version: "0.1.0".to_string(),
        }
    }

    #[test]
    fn empty_reporter_accepts_everything() {
        let reporter = ReportConfig::default().init();

        reporter.add_scenario(&summary("a"));
        reporter.add_tag_records("a", &[]);
        reporter.finalize().unwrap();
    }

    #[test]
    fn reporter_writes_every_enabled_output() {
        let dir = tempfile::tempdir().unwrap();
        let csv = dir.path().join("out").join("results.csv");
        let jsonl = dir.path().join("summary.jsonl");

        let reporter = ReportConfig::default()
            .enable_summary()
            .enable_csv(&csv)
            .enable_jsonl(&jsonl)
            .init();

        reporter.add_scenario(&summary("first"));
        reporter.add_scenario(&summary("second"));
        reporter.finalize().unwrap();

        let written = std::fs::read_to_string(&csv).unwrap();
        assert_eq!(written.lines().count(), 3);

        let loaded = tag_load_summary_model::load_scenario_summaries(&jsonl).unwrap();
        assert_eq!(loaded.len(), 2);
    }

    #[test]
    fn finalize_reports_a_failing_collector() {
        let dir = tempfile::tempdir().unwrap();
        // A directory cannot be written as a file.
        let reporter = ReportConfig::default()
            .enable_summary()
            .enable_csv(dir.path())
            .init();

        reporter.add_scenario(&summary("a"));
        let err = reporter.finalize().unwrap_err();

        assert_eq!(err.to_string(), "Failed to finalize reports");
    }
}
