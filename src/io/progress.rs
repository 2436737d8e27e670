//! Per-stage token progress with a rolling status line

use crate::io::configuration::PROGRESS_BAR_WIDTH;
use indicatif::{MultiProgress, ProgressBar, ProgressStyle};
use std::sync::LazyLock;

/// Coordinates progress display for the batch stages of a run
///
/// One bar counts processed tokens; a spinner line below it shows the most
/// recent token outcome.
pub struct ProgressManager {
    multi_progress: MultiProgress,
    batch_bar: Option<ProgressBar>,
    status_line: Option<ProgressBar>,
    total: u64,
    completed: u64,
    failed: u64,
}

impl Default for ProgressManager {
    fn default() -> Self {
        Self::new()
    }
}

static BATCH_STYLE: LazyLock<ProgressStyle> = LazyLock::new(|| {
    ProgressStyle::default_bar()
        .template(&format!(
            "[{{elapsed_precise}}] {{prefix:>10}}: [{{bar:{PROGRESS_BAR_WIDTH}.cyan/blue}}] {{pos}}/{{len}}"
        ))
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("█▉▊▋▌▍▎▏ ")
});

static STATUS_STYLE: LazyLock<ProgressStyle> = LazyLock::new(|| {
    ProgressStyle::default_spinner()
        .template("{msg}")
        .unwrap_or_else(|_| ProgressStyle::default_spinner())
});

impl ProgressManager {
    /// Create a new progress manager with no active stage
    pub fn new() -> Self {
        Self {
            multi_progress: MultiProgress::new(),
            batch_bar: None,
            status_line: None,
            total: 0,
            completed: 0,
            failed: 0,
        }
    }

    /// Start a stage over `total` tokens, replacing any previous one
    pub fn start_stage(&mut self, stage: &str, total: u64) {
        self.finish();
        self.total = total;
        self.completed = 0;
        self.failed = 0;

        let bar = ProgressBar::new(total);
        bar.set_style(BATCH_STYLE.clone());
        bar.set_prefix(stage.to_string());
        self.batch_bar = Some(self.multi_progress.add(bar));

        let status = ProgressBar::new_spinner();
        status.set_style(STATUS_STYLE.clone());
        self.status_line = Some(self.multi_progress.add(status));
    }

    /// Record a finished token
    pub fn complete_token(&mut self, token: u64, outcome: &str) {
        self.completed += 1;
        self.advance(format!("#{token}: {outcome}"));
    }

    /// Record a token that failed
    pub fn fail_token(&mut self, token: u64, reason: &str) {
        self.completed += 1;
        self.failed += 1;
        self.advance(format!("✗ #{token}: {reason}"));
    }

    fn advance(&self, message: String) {
        if let Some(ref bar) = self.batch_bar {
            bar.inc(1);
        }
        if let Some(ref status) = self.status_line {
            status.set_message(message);
        }
    }

    /// Tokens processed in the current stage
    pub const fn completed(&self) -> u64 {
        self.completed
    }

    /// Tokens that failed in the current stage
    pub const fn failed(&self) -> u64 {
        self.failed
    }

    /// Token count of the current stage
    pub const fn total(&self) -> u64 {
        self.total
    }

    /// Clean up all progress displays
    pub fn finish(&mut self) {
        if let Some(bar) = self.batch_bar.take() {
            bar.finish_and_clear();
        }
        if let Some(status) = self.status_line.take() {
            status.finish_and_clear();
        }
        let _ = self.multi_progress.clear();
    }
}
