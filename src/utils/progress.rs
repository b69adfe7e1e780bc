//! Spinners and per-parameter progress bars for the pipeline steps

use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};

const TICK_INTERVAL: Duration = Duration::from_millis(100);

/// Spinner for steps without a known length (loading, cleaning, writing)
pub fn create_spinner(message: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .template("    {spinner:.cyan} {msg} {elapsed:.dim}")
            .unwrap()
            .tick_chars("◐◓◑◒✓"),
    );
    pb.set_message(message.to_string());
    pb.enable_steady_tick(TICK_INTERVAL);
    pb
}

/// Bar advanced once per tested parameter by the ranker
pub fn create_progress_bar(parameters: u64, message: &str) -> ProgressBar {
    let pb = ProgressBar::new(parameters);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("    {msg:<8} {wide_bar:.cyan/blue} {pos:>4}/{len} params · {per_sec} · eta {eta}")
            .unwrap()
            .progress_chars("█▓░"),
    );
    pb.set_message(message.to_string());
    pb.enable_steady_tick(TICK_INTERVAL);
    pb
}

/// Replace the bar with a green check line
pub fn finish_with_success(pb: &ProgressBar, message: &str) {
    pb.set_style(ProgressStyle::default_bar().template("    {msg}").unwrap());
    pb.finish_with_message(format!("✓ {}", message));
}

/// Replace the bar with a warning line, e.g. when parameters were skipped
pub fn finish_with_warning(pb: &ProgressBar, message: &str) {
    pb.set_style(ProgressStyle::default_bar().template("    {msg}").unwrap());
    pb.finish_with_message(format!("⚠ {}", message));
}
