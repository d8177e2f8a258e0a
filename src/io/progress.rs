//! Progress display for sequential conversion and classification runs

use indicatif::{MultiProgress, ProgressBar, ProgressStyle};
use std::sync::LazyLock;

static BATCH_STYLE: LazyLock<ProgressStyle> = LazyLock::new(|| {
    ProgressStyle::default_bar()
        .template("[{elapsed_precise}] {prefix}: [{bar:40.cyan/blue}] {pos}/{len}")
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("█▉▊▋▌▍▎▏ ")
});

static ITEM_STYLE: LazyLock<ProgressStyle> = LazyLock::new(|| {
    ProgressStyle::default_spinner()
        .template("{spinner} {msg}")
        .unwrap_or_else(|_| ProgressStyle::default_spinner())
});

/// Coordinates progress display for a single sequential run
///
/// A batch bar tracks how many items have completed while a companion line
/// reports what the pipeline is currently doing with the active item
pub struct ProgressManager {
    multi_progress: MultiProgress,
    batch_bar: ProgressBar,
    item_bar: ProgressBar,
}

impl ProgressManager {
    /// Create a progress manager for a run of `total` items
    ///
    /// The `label` names the unit being counted, e.g. "Images" or "Queries"
    pub fn new(label: &str, total: usize) -> Self {
        let multi_progress = MultiProgress::new();

        let batch_bar = multi_progress.add(ProgressBar::new(total as u64));
        batch_bar.set_style(BATCH_STYLE.clone());
        batch_bar.set_prefix(label.to_string());

        let item_bar = multi_progress.add(ProgressBar::new_spinner());
        item_bar.set_style(ITEM_STYLE.clone());

        Self {
            multi_progress,
            batch_bar,
            item_bar,
        }
    }

    /// Announce the item now being processed
    pub fn start_item(&self, description: &str) {
        self.item_bar.set_message(description.to_string());
        self.item_bar.tick();
    }

    /// Replace the current item line with an interim status note
    pub fn note(&self, message: &str) {
        self.item_bar.set_message(message.to_string());
        self.item_bar.tick();
    }

    /// Mark the active item as finished, optionally with an outcome note
    pub fn complete_item(&self, outcome: Option<&str>) {
        if let Some(outcome) = outcome {
            self.item_bar.set_message(outcome.to_string());
            self.item_bar.tick();
        }
        self.batch_bar.inc(1);
    }

    /// Clear the display and print a final summary line
    pub fn finish(&self, summary: &str) {
        self.batch_bar.finish_with_message(String::new());
        self.item_bar.finish_with_message(summary.to_string());
        let _ = self.multi_progress.clear();
    }
}
