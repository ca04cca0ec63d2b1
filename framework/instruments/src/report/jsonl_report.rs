use std::path::PathBuf;

use tag_load_summary_model::{append_scenario_summary, ScenarioSummary};

use crate::report::ReportCollector;

/// Appends each scenario summary to a JSON lines file as soon as it arrives, so completed
/// scenarios are kept even if the batch is cut short.
pub struct JsonlReportCollector {
    path: PathBuf,
    failed_writes: usize,
}

impl JsonlReportCollector {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            failed_writes: 0,
        }
    }
}

impl ReportCollector for JsonlReportCollector {
    fn add_scenario(&mut self, summary: &ScenarioSummary) {
        if let Err(e) = append_scenario_summary(summary, &self.path) {
            log::error!(
                "Failed to append summary for {} to {}: {e:?}",
                summary.scenario_id,
                self.path.display()
            );
            self.failed_writes += 1;
        }
    }

    fn finalize(&self) -> anyhow::Result<()> {
        if self.failed_writes > 0 {
            anyhow::bail!(
                "{} scenario summaries could not be written to {}",
                self.failed_writes,
                self.path.display()
            );
        }

        Ok(())
    }
}
