//! Progress indicators for long-running commands.

use std::future::Future;

use indicatif::{ProgressBar, ProgressStyle};

use crate::output::OutputFormat;

/// Create a spinner with a message.
pub fn spinner(msg: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .tick_chars("⠁⠂⠄⡀⢀⠠⠐⠈ ")
            .template("{spinner:.green} {msg}")
            .expect("Invalid progress bar template"),
    );
    pb.set_message(msg.to_string());
    pb.enable_steady_tick(std::time::Duration::from_millis(100));
    pb
}

/// Create a hidden progress bar (no-op).
///
/// Used for JSON output so nothing but the document reaches stdout.
pub fn hidden() -> ProgressBar {
    ProgressBar::hidden()
}

/// Create a progress bar for a known number of documents.
pub fn progress_bar(total: u64, msg: &str) -> ProgressBar {
    let pb = ProgressBar::new(total);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} {msg} [{bar:40.cyan/blue}] {pos}/{len} ({eta})")
            .expect("Invalid progress bar template")
            .progress_chars("=> "),
    );
    pb.set_message(msg.to_string());
    pb
}

/// Progress bar for `total` items, hidden unless rendering for humans.
pub fn for_format(format: OutputFormat, total: u64, msg: &str) -> ProgressBar {
    match format {
        OutputFormat::Human => progress_bar(total, msg),
        OutputFormat::Json => hidden(),
    }
}

/// Run an async operation behind a spinner when rendering for humans.
pub async fn with_spinner<F, T>(format: OutputFormat, msg: &str, fut: F) -> T
where
    F: Future<Output = T>,
{
    let pb = match format {
        OutputFormat::Human => spinner(msg),
        OutputFormat::Json => hidden(),
    };
    let result = fut.await;
    pb.finish_and_clear();
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_progress_bar_creation() {
        let pb = progress_bar(10, "Indexing...");
        pb.inc(4);
        assert_eq!(pb.position(), 4);
        pb.finish_and_clear();
    }

    #[test]
    fn test_json_is_hidden() {
        let pb = for_format(OutputFormat::Json, 3, "Indexing...");
        assert!(pb.is_hidden());
    }

    #[tokio::test]
    async fn test_with_spinner() {
        let result = with_spinner(OutputFormat::Json, "Extracting...", async { 42 }).await;
        assert_eq!(result, 42);
    }
}
