use serde::{Deserialize, Serialize};
use sha3::Digest;
use std::io::{BufRead, Read, Write};
use std::path::Path;

/// Column names of the delimited export, in order.
pub const CSV_COLUMNS: [&str; 12] = [
    "scenario_id",
    "pixel_tags",
    "dom_tags",
    "variables",
    "nested_depth",
    "fan_out",
    "iterations",
    "network_delay_ms",
    "dom_complexity",
    "mean_load_ms",
    "mean_cpu_busy_ms",
    "std_deviation_ms",
];

/// Summary of one executed scenario
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ScenarioSummary {
    /// The id of the batch run this scenario was part of
    ///
    /// Chosen by the runner. Shared by every scenario in a batch.
    pub run_id: String,
    /// The scenario's id, unique within its batch
    pub scenario_id: String,
    /// The time the scenario started
    ///
    /// This is a Unix timestamp in seconds.
    pub started_at: i64,
    pub pixel_tags: u32,
    pub dom_tags: u32,
    pub variables: u32,
    pub nested_depth: u32,
    pub fan_out: u32,
    pub iterations: u32,
    pub network_delay_ms: f64,
    pub dom_complexity: u32,
    /// Mean wall time of one container load, in milliseconds
    pub mean_load_ms: f64,
    /// Mean CPU busy time of one container load, in milliseconds
    pub mean_busy_ms: f64,
    /// Population standard deviation of the load times, in milliseconds
    pub std_deviation_ms: f64,
    /// The version of the simulator that produced this summary
    pub tool_version: String,
}

impl ScenarioSummary {
    /// Compute a fingerprint for the configuration of this scenario
    ///
    /// Two summaries with the same fingerprint were produced by the same scenario parameters on
    /// the same tool version, so their metrics can be compared directly. It uses the
    ///     - Scenario parameters
    ///     - Tool version
    ///
    /// The ids, start time and metrics are not part of the fingerprint.
    ///
    /// The fingerprint is computed using [sha3::Sha3_256].
    pub fn fingerprint(&self) -> String {
        let mut hasher = sha3::Sha3_256::new();
        [
            self.pixel_tags,
            self.dom_tags,
            self.variables,
            self.nested_depth,
            self.fan_out,
            self.iterations,
            self.dom_complexity,
        ]
        .iter()
        .for_each(|v| Digest::update(&mut hasher, v.to_le_bytes()));
        Digest::update(&mut hasher, self.network_delay_ms.to_le_bytes());
        Digest::update(&mut hasher, self.tool_version.as_bytes());

        format!("{:x}", hasher.finalize())
    }

    /// The fields of the delimited export, in [CSV_COLUMNS] order.
    ///
    /// Fields are unquoted here, quoting is left to the writer. The metrics always have three
    /// decimals.
    pub fn csv_record(&self) -> [String; 12] {
        [
            self.scenario_id.clone(),
            self.pixel_tags.to_string(),
            self.dom_tags.to_string(),
            self.variables.to_string(),
            self.nested_depth.to_string(),
            self.fan_out.to_string(),
            self.iterations.to_string(),
            self.network_delay_ms.to_string(),
            self.dom_complexity.to_string(),
            format!("{:.3}", self.mean_load_ms),
            format!("{:.3}", self.mean_busy_ms),
            format!("{:.3}", self.std_deviation_ms),
        ]
    }
}

/// Append the scenario summary to a file
///
/// The summary will be serialized to JSON and output as a single line followed by a newline. The
/// recommended file extension is `.jsonl`.
pub fn append_scenario_summary(
    summary: &ScenarioSummary,
    path: impl AsRef<Path>,
) -> anyhow::Result<()> {
    let mut file = std::fs::OpenOptions::new()
        .append(true)
        .create(true)
        .open(path)?;
    store_scenario_summary(summary, &mut file)?;
    file.write_all(b"\n")?;
    Ok(())
}

/// Serialize the scenario summary to a writer
pub fn store_scenario_summary<W: Write>(
    summary: &ScenarioSummary,
    writer: &mut W,
) -> anyhow::Result<()> {
    serde_json::to_writer(writer, summary)?;
    Ok(())
}

/// Load a single scenario summary from a reader
pub fn load_scenario_summary<R: Read>(reader: R) -> anyhow::Result<ScenarioSummary> {
    let reader = std::io::BufReader::new(reader);
    let summary: ScenarioSummary = serde_json::from_reader(reader)?;
    Ok(summary)
}

/// Load scenario summaries from a file
///
/// The file should contain one JSON object per line. This is the format produced by
/// [append_scenario_summary]. Blank lines are skipped.
pub fn load_scenario_summaries(path: impl AsRef<Path>) -> anyhow::Result<Vec<ScenarioSummary>> {
    let file = std::fs::File::open(path)?;
    let reader = std::io::BufReader::new(file);
    let mut summaries = Vec::new();
    for line in reader.lines() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        summaries.push(serde_json::from_str(&line)?);
    }
    Ok(summaries)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn summary(scenario_id: &str) -> ScenarioSummary {
        ScenarioSummary {
            run_id: "run-1".to_string(),
            scenario_id: scenario_id.to_string(),
            started_at: 1_700_000_000,
            pixel_tags: 15,
            dom_tags: 8,
            variables: 40,
            nested_depth: 1,
            fan_out: 2,
            iterations: 5,
            network_delay_ms: 24.0,
            dom_complexity: 180,
            mean_load_ms: 1234.56789,
            mean_busy_ms: 12.0,
            std_deviation_ms: 0.0004,
            tool_version: "0.1.0".to_string(),
        }
    }

    #[test]
    fn record_uses_fixed_precision_metrics() {
        assert_eq!(
            summary("balanced-mix").csv_record(),
            [
                "balanced-mix",
                "15",
                "8",
                "40",
                "1",
                "2",
                "5",
                "24",
                "180",
                "1234.568",
                "12.000",
                "0.000"
            ]
        );
    }

    #[test]
    fn record_keeps_ids_verbatim() {
        let record = summary("say \"hi\", twice").csv_record();
        assert_eq!(record[0], "say \"hi\", twice");
    }

    #[test]
    fn fractional_network_delay_is_kept() {
        let mut summary = summary("a");
        summary.network_delay_ms = 12.5;
        assert_eq!(summary.csv_record()[7], "12.5");
    }

    #[test]
    fn fingerprint_ignores_ids_and_metrics() {
        let first = summary("first");
        let mut second = summary("second");
        second.run_id = "run-2".to_string();
        second.mean_load_ms = 1.0;
        second.started_at = 0;

        assert_eq!(first.fingerprint(), second.fingerprint());
        assert_eq!(first.fingerprint().len(), 64);
    }

    #[test]
    fn fingerprint_tracks_parameters_and_version() {
        let base = summary("a");

        let mut more_pixels = base.clone();
        more_pixels.pixel_tags += 1;
        assert_ne!(base.fingerprint(), more_pixels.fingerprint());

        let mut slower = base.clone();
        slower.network_delay_ms = 30.0;
        assert_ne!(base.fingerprint(), slower.fingerprint());

        let mut newer = base.clone();
        newer.tool_version = "0.2.0".to_string();
        assert_ne!(base.fingerprint(), newer.fingerprint());
    }

    #[test]
    fn append_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("run_summary.jsonl");

        append_scenario_summary(&summary("one"), &path).unwrap();
        append_scenario_summary(&summary("two"), &path).unwrap();

        let loaded = load_scenario_summaries(&path).unwrap();
        assert_eq!(loaded, vec![summary("one"), summary("two")]);
    }

    #[test]
    fn load_single_summary_from_reader() {
        let mut buffer = Vec::new();
        store_scenario_summary(&summary("solo"), &mut buffer).unwrap();

        let loaded = load_scenario_summary(buffer.as_slice()).unwrap();
        assert_eq!(loaded.scenario_id, "solo");
    }

    #[test]
    fn loading_a_missing_file_fails() {
        let dir = tempfile::tempdir().unwrap();
        assert!(load_scenario_summaries(dir.path().join("missing.jsonl")).is_err());
    }
}
