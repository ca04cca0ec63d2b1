use indicatif::{ProgressBar, ProgressStyle};

/// A progress bar over the scenarios in a batch, or a hidden one if progress is disabled.
pub(crate) fn start_progress(scenario_count: usize, no_progress: bool) -> ProgressBar {
    if no_progress {
        return ProgressBar::hidden();
    }

    let pb = ProgressBar::new(scenario_count as u64);
    pb.set_style(
        ProgressStyle::with_template(
            "{spinner:.green} [{wide_bar:.cyan/blue}] {pos}/{len} scenarios [{elapsed_precise}] {msg}",
        )
        .expect("Failed to set progress style")
        .progress_chars("#>-"),
    );
    pb
}
