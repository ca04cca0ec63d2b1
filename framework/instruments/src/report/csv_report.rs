use std::path::PathBuf;

use anyhow::Context;
use csv::{QuoteStyle, Terminator, WriterBuilder};
use tag_load_summary_model::{ScenarioSummary, CSV_COLUMNS};

use crate::report::ReportCollector;

/// Writes one delimited row per scenario, after a header, when the batch is finalized.
///
/// Text fields are quoted and numbers are left bare. The file is replaced on every run and
/// missing parent directories are created.
pub struct CsvReportCollector {
    path: PathBuf,
    records: Vec<[String; 12]>,
}

impl CsvReportCollector {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            records: Vec::new(),
        }
    }

    fn write_records<W: std::io::Write>(&self, out: W) -> anyhow::Result<()> {
        let mut writer = WriterBuilder::new()
            .quote_style(QuoteStyle::NonNumeric)
            .terminator(Terminator::Any(b'\n'))
            .from_writer(out);

        writer.write_record(CSV_COLUMNS)?;
        for record in &self.records {
            writer.write_record(record)?;
        }
        writer.flush()?;

        Ok(())
    }
}

impl ReportCollector for CsvReportCollector {
    fn add_scenario(&mut self, summary: &ScenarioSummary) {
        self.records.push(summary.csv_record());
    }

    fn finalize(&self) -> anyhow::Result<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create output directory {}", parent.display())
            })?;
        }

        let file = std::fs::File::create(&self.path)
            .with_context(|| format!("Failed to create CSV report {}", self.path.display()))?;
        self.write_records(file)
            .with_context(|| format!("Failed to write CSV report to {}", self.path.display()))?;

        log::info!(
            "Wrote {} scenario rows to {}",
            self.records.len(),
            self.path.display()
        );

        Ok(())
    }
}
