mod csv_report;
mod jsonl_report;
mod summary_report;

use tag_load_simulator::prelude::TagRecord;
use tag_load_summary_model::ScenarioSummary;

pub use csv_report::CsvReportCollector;
pub use jsonl_report::JsonlReportCollector;
pub use summary_report::SummaryReportCollector;

pub trait ReportCollector {
    fn add_scenario(&mut self, summary: &ScenarioSummary);

    /// Record the per-tag timings of a scenario's runs. Ignored unless a collector reports on
    /// individual tags.
    fn add_tag_records(&mut self, _scenario_id: &str, _records: &[TagRecord]) {}

    fn finalize(&self) -> anyhow::Result<()>;
}
