//! Training pipeline
//!
//! This module provides:
//! - The parallel self-play trainer and its episode partitioning
//! - Observers reporting training progress

pub mod observers;
pub mod trainer;

pub use observers::{ProgressObserver, SilentObserver};
pub use trainer::{
    ParallelTrainer, TrainerPhase, TrainingReport, TrainingStats, WorkerReport, WorkerStats,
    merge_reports, partition, worker_seeds,
};

pub use crate::ports::TrainingObserver;
