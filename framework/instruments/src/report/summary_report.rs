mod operations_table;
mod scenarios_table;

use std::collections::BTreeMap;

use tabled::settings::Style;
use tabled::Table;
use tag_load_simulator::prelude::{TagKind, TagRecord};
use tag_load_summary_model::ScenarioSummary;

use crate::report::summary_report::operations_table::OperationRow;
use crate::report::summary_report::scenarios_table::ScenarioRow;
use crate::report::ReportCollector;

/// Running totals for one kind of tag.
#[derive(Debug, Clone, Copy)]
struct OperationStats {
    count: usize,
    total_ms: f64,
    min_ms: f64,
    max_ms: f64,
}

impl OperationStats {
    fn new(duration_ms: f64) -> Self {
        Self {
            count: 1,
            total_ms: duration_ms,
            min_ms: duration_ms,
            max_ms: duration_ms,
        }
    }

    fn add(&mut self, duration_ms: f64) {
        self.count += 1;
        self.total_ms += duration_ms;
        self.min_ms = self.min_ms.min(duration_ms);
        self.max_ms = self.max_ms.max(duration_ms);
    }
}

/// Prints a table of scenarios, and one of tag timings, at the end of the batch.
///
/// Scenario summaries are kept until then. Tag timings are folded into per-kind totals as they
/// arrive.
#[derive(Default)]
pub struct SummaryReportCollector {
    scenarios: Vec<ScenarioSummary>,
    operations: BTreeMap<TagKind, OperationStats>,
}

impl SummaryReportCollector {
    pub fn new() -> Self {
        Self::default()
    }

    fn scenario_rows(&self) -> Vec<ScenarioRow> {
        self.scenarios
            .iter()
            .map(|summary| ScenarioRow {
                scenario_id: summary.scenario_id.clone(),
                pixel_tags: summary.pixel_tags,
                dom_tags: summary.dom_tags,
                variables: summary.variables,
                depth: summary.nested_depth,
                fan_out: summary.fan_out,
                iterations: summary.iterations,
                mean_load_ms: summary.mean_load_ms,
                mean_busy_ms: summary.mean_busy_ms,
                std_deviation_ms: summary.std_deviation_ms,
            })
            .collect()
    }

    fn operation_rows(&self) -> Vec<OperationRow> {
        self.operations
            .iter()
            .map(|(kind, stats)| OperationRow {
                operation_id: kind.to_string(),
                total_operations: stats.count,
                total_duration_ms: stats.total_ms,
                avg_time_ms: stats.total_ms / stats.count as f64,
                min_time_ms: stats.min_ms,
                max_time_ms: stats.max_ms,
            })
            .collect()
    }

    fn print_summary_of_scenarios(&self) {
        println!("\nSummary of scenarios");
        let mut table = Table::new(self.scenario_rows());
        table.with(Style::modern());

        println!("{table}");
    }

    fn print_summary_of_operations(&self) {
        println!("\nSummary of tags");
        let mut table = Table::new(self.operation_rows());
        table.with(Style::modern());

        println!("{table}");
    }
}

impl ReportCollector for SummaryReportCollector {
    fn add_scenario(&mut self, summary: &ScenarioSummary) {
        self.scenarios.push(summary.clone());
    }

    fn add_tag_records(&mut self, _scenario_id: &str, records: &[TagRecord]) {
        for record in records {
            self.operations
                .entry(record.kind)
                .and_modify(|stats| stats.add(record.duration_ms))
                .or_insert_with(|| OperationStats::new(record.duration_ms));
        }
    }

    fn finalize(&self) -> anyhow::Result<()> {
        if self.scenarios.is_empty() {
            println!("\nNo scenarios completed");
            return Ok(());
        }

        self.print_summary_of_scenarios();
        if !self.operations.is_empty() {
            self.print_summary_of_operations();
        }

        Ok(())
    }
}
