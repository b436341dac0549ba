//! Observer implementations for training runs

use std::sync::atomic::{AtomicU64, Ordering};

use indicatif::{ProgressBar, ProgressStyle};

use super::trainer::{TrainingStats, WorkerStats};
use crate::{Result, ports::TrainingObserver};

/// Observer that ignores every event
#[derive(Debug, Clone, Copy, Default)]
pub struct SilentObserver;

impl TrainingObserver for SilentObserver {}

/// Progress bar observer - Shows training progress
///
/// Workers report in batches, so the bar advances in steps of
/// [`super::trainer::PROGRESS_BATCH`] episodes per worker.
pub struct ProgressObserver {
    progress_bar: ProgressBar,
    finished_workers: AtomicU64,
}

impl ProgressObserver {
    pub fn new() -> Self {
        Self {
            progress_bar: ProgressBar::new(0),
            finished_workers: AtomicU64::new(0),
        }
    }

    fn message(&self) -> String {
        format!(
            "{} workers done",
            self.finished_workers.load(Ordering::Relaxed)
        )
    }
}

impl Default for ProgressObserver {
    fn default() -> Self {
        Self::new()
    }
}

impl TrainingObserver for ProgressObserver {
    fn on_training_start(&self, total_episodes: u64) -> Result<()> {
        self.progress_bar.set_length(total_episodes);
        self.progress_bar.set_style(
            ProgressStyle::default_bar()
                .template("[{elapsed_precise}] {bar:40.cyan/blue} {pos}/{len} games ({msg})")
                .map_err(|e| crate::Error::ProgressBarTemplate {
                    message: e.to_string(),
                })?
                .progress_chars("=>-"),
        );
        self.progress_bar.set_message(self.message());
        Ok(())
    }

    fn on_episodes_completed(&self, _worker: usize, count: u64) {
        self.progress_bar.inc(count);
    }

    fn on_worker_finished(&self, _stats: &WorkerStats) {
        self.finished_workers.fetch_add(1, Ordering::Relaxed);
        self.progress_bar.set_message(self.message());
    }

    fn on_training_end(&self, stats: &TrainingStats) -> Result<()> {
        self.progress_bar.finish_with_message(format!(
            "X:{} O:{} D:{}",
            stats.x_wins, stats.o_wins, stats.draws
        ));
        Ok(())
    }
}
