//! End-to-end training runs through the parallel trainer

use std::sync::{
    Arc,
    atomic::{AtomicBool, AtomicU64, Ordering},
};

use xxo::{
    app::{LearningConfig, TrainerConfig},
    pipeline::{ParallelTrainer, TrainerPhase, TrainingObserver, WorkerStats, partition},
    q_learning::CreditAssignment,
};

#[test]
fn small_run_learns_the_opening_position() {
    let trainer = ParallelTrainer::new(LearningConfig::default(), TrainerConfig::new(1_000, 4));
    let report = trainer.train().unwrap();

    let root = report
        .table
        .values("---------X")
        .expect("empty board with X to move is always visited");
    assert_eq!(root.len(), 9);
    assert!(root.iter().any(|&v| v != 0.0));

    let stats = &report.stats;
    assert_eq!(stats.episodes_requested, 1_000);
    assert_eq!(stats.episodes_completed, 1_000);
    assert_eq!(stats.x_wins + stats.o_wins + stats.draws, 1_000);
    assert_eq!(stats.workers.len(), 4);
    assert!(stats.failed_workers.is_empty());
    assert!(!stats.cancelled);
    assert_eq!(stats.states, report.table.len());
    assert_eq!(trainer.phase(), TrainerPhase::Done);

    let per_worker: Vec<u64> = stats.workers.iter().map(|w| w.episodes).collect();
    assert_eq!(per_worker, partition(1_000, 4));
}

#[test]
fn seeded_runs_are_reproducible() {
    let config = TrainerConfig::new(2_000, 3).with_seed(2024);
    let first = ParallelTrainer::new(LearningConfig::default(), config.clone())
        .train()
        .unwrap();
    let second = ParallelTrainer::new(LearningConfig::default(), config)
        .train()
        .unwrap();

    assert_eq!(first.table, second.table);
    assert_eq!(first.stats, second.stats);
}

#[test]
fn larger_board_with_interleaved_credit() {
    let learning = LearningConfig::default()
        .with_board(4, 4)
        .with_credit(CreditAssignment::Interleaved);
    let trainer = ParallelTrainer::new(learning, TrainerConfig::new(200, 2).with_seed(5));
    let report = trainer.train().unwrap();

    assert_eq!(report.table.action_space(), 16);
    let root = report.table.values("----------------X").unwrap();
    assert!(root.iter().all(|&v| v >= 0.0));
    assert!(root.iter().any(|&v| v > 0.0));
}

#[test]
fn single_worker_gets_the_whole_budget() {
    let trainer =
        ParallelTrainer::new(LearningConfig::default(), TrainerConfig::new(300, 1).with_seed(8));
    let report = trainer.train().unwrap();
    assert_eq!(report.stats.workers.len(), 1);
    assert_eq!(report.stats.workers[0].episodes, 300);
}

struct PanicOnWorker(usize);

impl TrainingObserver for PanicOnWorker {
    fn on_episodes_completed(&self, worker: usize, _count: u64) {
        if worker == self.0 {
            panic!("observer refused worker {worker}");
        }
    }
}

#[test]
fn panicking_worker_is_excluded_from_the_merge() {
    let trainer =
        ParallelTrainer::new(LearningConfig::default(), TrainerConfig::new(4_000, 4).with_seed(1))
            .with_observer(Box::new(PanicOnWorker(1)));
    let report = trainer.train().unwrap();

    assert_eq!(report.stats.failed_workers, vec![1]);
    assert_eq!(report.stats.episodes_completed, 3_000);
    let indices: Vec<usize> = report.stats.workers.iter().map(|w| w.worker).collect();
    assert_eq!(indices, vec![0, 2, 3]);
    assert!(report.table.values("---------X").is_some());
    assert_eq!(trainer.phase(), TrainerPhase::Done);
}

/// Raises the stop flag as soon as any worker reports progress.
struct StopAfterFirstBatch {
    stop: Arc<AtomicBool>,
    finished: AtomicU64,
}

impl TrainingObserver for StopAfterFirstBatch {
    fn on_episodes_completed(&self, _worker: usize, _count: u64) {
        self.stop.store(true, Ordering::SeqCst);
    }

    fn on_worker_finished(&self, _stats: &WorkerStats) {
        self.finished.fetch_add(1, Ordering::SeqCst);
    }
}

#[test]
fn cancellation_merges_partial_tables() {
    let stop = Arc::new(AtomicBool::new(false));
    let observer = StopAfterFirstBatch {
        stop: Arc::clone(&stop),
        finished: AtomicU64::new(0),
    };
    let trainer = ParallelTrainer::new(
        LearningConfig::default(),
        TrainerConfig::new(200_000, 2).with_seed(4),
    )
    .with_stop_flag(stop)
    .with_observer(Box::new(observer));

    let report = trainer.train().unwrap();
    assert!(report.stats.cancelled);
    assert!(report.stats.episodes_completed >= 1_000);
    assert!(report.stats.episodes_completed < 200_000);
    assert!(report.stats.failed_workers.is_empty());
    assert!(!report.table.is_empty());
}
