//! Observer port - abstraction for training observation
//!
//! Training reports its progress through this port so the trainer stays free
//! of any terminal or file output. Workers run concurrently, so every method
//! takes `&self` and implementations must be `Send + Sync`.

use crate::{
    Result,
    pipeline::trainer::{TrainingStats, WorkerStats},
};

/// Observer trait for monitoring a parallel training run
///
/// # Event Sequence
///
/// 1. `on_training_start(total_episodes)` - once, before any worker starts
/// 2. From any worker thread, in no particular order:
///    - `on_episodes_completed(worker, count)` - in batches
///    - `on_worker_finished(stats)` - once per worker that returned normally
/// 3. `on_training_end(stats)` - once, after the merge
///
/// # Examples
///
/// ```
/// use std::sync::atomic::{AtomicU64, Ordering};
///
/// use xxo::ports::TrainingObserver;
///
/// #[derive(Default)]
/// struct Counter {
///     episodes: AtomicU64,
/// }
///
/// impl TrainingObserver for Counter {
///     fn on_episodes_completed(&self, _worker: usize, count: u64) {
///         self.episodes.fetch_add(count, Ordering::Relaxed);
///     }
/// }
/// ```
pub trait TrainingObserver: Send + Sync {
    /// Called when training starts.
    ///
    /// # Default Implementation
    ///
    /// Does nothing.
    fn on_training_start(&self, _total_episodes: u64) -> Result<()> {
        Ok(())
    }

    /// Called by a worker after it finished `count` more episodes.
    fn on_episodes_completed(&self, _worker: usize, _count: u64) {}

    /// Called when a worker returns its table.
    fn on_worker_finished(&self, _stats: &WorkerStats) {}

    /// Called after all workers joined and the tables were merged.
    fn on_training_end(&self, _stats: &TrainingStats) -> Result<()> {
        Ok(())
    }
}
