//! Parallel self-play trainer
//!
//! The episode budget is split across W workers. Each worker owns a private
//! [`ValueTable`] and RNG and plays its share on a dedicated rayon pool with
//! no shared mutable state. After the join the tables of the workers that
//! finished are averaged into one global table in worker index order.

use std::{
    panic::{self, AssertUnwindSafe},
    path::Path,
    sync::{
        Arc,
        atomic::{AtomicBool, AtomicU8, Ordering},
    },
};

use log::{debug, error, info, warn};
use rand::{RngCore, SeedableRng, rngs::StdRng};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::{
    Error, Result,
    app::{LearningConfig, TrainerConfig},
    pipeline::observers::SilentObserver,
    ports::TrainingObserver,
    q_learning::{EpisodeSimulator, ValueTable},
    tictactoe::{GameOutcome, Player},
};

/// Episodes a worker plays between two progress notifications
pub const PROGRESS_BATCH: u64 = 1_000;

/// Lifecycle of a [`ParallelTrainer`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TrainerPhase {
    Idle,
    Running,
    Merging,
    Done,
}

impl TrainerPhase {
    fn from_u8(value: u8) -> Self {
        match value {
            1 => TrainerPhase::Running,
            2 => TrainerPhase::Merging,
            3 => TrainerPhase::Done,
            _ => TrainerPhase::Idle,
        }
    }
}

/// Outcome counts of one worker
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkerStats {
    pub worker: usize,
    pub episodes: u64,
    pub x_wins: u64,
    pub o_wins: u64,
    pub draws: u64,
}

impl WorkerStats {
    pub fn new(worker: usize) -> Self {
        Self {
            worker,
            ..Self::default()
        }
    }

    pub fn record(&mut self, outcome: GameOutcome) {
        self.episodes += 1;
        match outcome {
            GameOutcome::Win(Player::X) => self.x_wins += 1,
            GameOutcome::Win(Player::O) => self.o_wins += 1,
            GameOutcome::Draw => self.draws += 1,
        }
    }
}

/// What a worker hands back at the join
#[derive(Debug, Clone)]
pub struct WorkerReport {
    pub stats: WorkerStats,
    pub table: ValueTable,
}

/// Summary of a training run
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrainingStats {
    /// Episode budget E
    pub episodes_requested: u64,
    /// Episodes played by workers that made it into the merge
    pub episodes_completed: u64,
    pub x_wins: u64,
    pub o_wins: u64,
    pub draws: u64,
    /// Number of states in the merged table
    pub states: usize,
    /// Per-worker counts, in worker index order
    pub workers: Vec<WorkerStats>,
    /// Workers excluded from the merge after an error or a panic
    pub failed_workers: Vec<usize>,
    /// Whether the stop flag was raised during the run
    pub cancelled: bool,
}

impl TrainingStats {
    /// Save stats to a JSON file
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let file = std::fs::File::create(path)?;
        serde_json::to_writer_pretty(file, self)?;
        Ok(())
    }

    /// Load stats from a JSON file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = std::fs::File::open(path)?;
        let stats = serde_json::from_reader(file)?;
        Ok(stats)
    }
}

/// Merged table plus run statistics
#[derive(Debug, Clone)]
pub struct TrainingReport {
    pub table: ValueTable,
    pub stats: TrainingStats,
}

/// Split `episodes` over `workers`: worker `i` gets `episodes / workers`
/// plus one if `i < episodes % workers`.
///
/// ```
/// use xxo::pipeline::partition;
///
/// assert_eq!(partition(10, 4), vec![3, 3, 2, 2]);
/// assert_eq!(partition(2, 3), vec![1, 1, 0]);
/// ```
pub fn partition(episodes: u64, workers: usize) -> Vec<u64> {
    if workers == 0 {
        return Vec::new();
    }
    let count = workers as u64;
    let (base, remainder) = (episodes / count, episodes % count);
    (0..count)
        .map(|i| base + u64::from(i < remainder))
        .collect()
}

/// One RNG seed per worker, drawn from a master RNG.
///
/// A fixed master seed yields the same worker seeds on every run.
pub fn worker_seeds(seed: Option<u64>, workers: usize) -> Vec<u64> {
    let mut master = match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_rng(&mut rand::rng()),
    };
    (0..workers).map(|_| master.next_u64()).collect()
}

/// Runs `f` and turns a panic into [`Error::WorkerFailed`].
fn catch_panic<F>(worker: usize, f: F) -> Result<WorkerReport>
where
    F: FnOnce() -> Result<WorkerReport>,
{
    match panic::catch_unwind(AssertUnwindSafe(f)) {
        Ok(result) => result,
        Err(payload) => {
            let message = if let Some(s) = payload.downcast_ref::<&str>() {
                s.to_string()
            } else if let Some(s) = payload.downcast_ref::<String>() {
                s.clone()
            } else {
                "unknown panic".to_string()
            };
            Err(Error::WorkerFailed { worker, message })
        }
    }
}

/// Average the tables of the workers that finished, in index order.
///
/// Failed workers are logged and contribute nothing.
pub fn merge_reports(
    outcomes: Vec<Result<WorkerReport>>,
    action_space: usize,
) -> Result<(ValueTable, TrainingStats)> {
    let mut stats = TrainingStats::default();
    let mut tables = Vec::with_capacity(outcomes.len());

    for (worker, outcome) in outcomes.into_iter().enumerate() {
        match outcome {
            Ok(report) => {
                stats.episodes_completed += report.stats.episodes;
                stats.x_wins += report.stats.x_wins;
                stats.o_wins += report.stats.o_wins;
                stats.draws += report.stats.draws;
                stats.workers.push(report.stats);
                tables.push(report.table);
            }
            Err(err) => {
                error!("Worker {worker} excluded from merge: {err}");
                stats.failed_workers.push(worker);
            }
        }
    }

    let table = ValueTable::merge_mean(tables, action_space)?;
    stats.states = table.len();
    Ok((table, stats))
}

/// Parallel self-play trainer
///
/// # Examples
///
/// ```
/// use xxo::{
///     app::{LearningConfig, TrainerConfig},
///     pipeline::{ParallelTrainer, TrainerPhase},
/// };
///
/// let trainer = ParallelTrainer::new(
///     LearningConfig::default(),
///     TrainerConfig::new(200, 2).with_seed(1),
/// );
/// let report = trainer.train()?;
/// assert_eq!(trainer.phase(), TrainerPhase::Done);
/// assert_eq!(report.stats.episodes_completed, 200);
/// # Ok::<(), xxo::Error>(())
/// ```
pub struct ParallelTrainer {
    learning: LearningConfig,
    config: TrainerConfig,
    observer: Box<dyn TrainingObserver>,
    stop: Arc<AtomicBool>,
    phase: AtomicU8,
}

impl ParallelTrainer {
    pub fn new(learning: LearningConfig, config: TrainerConfig) -> Self {
        Self {
            learning,
            config,
            observer: Box::new(SilentObserver),
            stop: Arc::new(AtomicBool::new(false)),
            phase: AtomicU8::new(TrainerPhase::Idle as u8),
        }
    }

    /// Replace the observer notified during training
    pub fn with_observer(mut self, observer: Box<dyn TrainingObserver>) -> Self {
        self.observer = observer;
        self
    }

    /// Share an external stop flag, e.g. one raised by a signal handler
    pub fn with_stop_flag(mut self, stop: Arc<AtomicBool>) -> Self {
        self.stop = stop;
        self
    }

    pub fn stop_flag(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.stop)
    }

    pub fn phase(&self) -> TrainerPhase {
        TrainerPhase::from_u8(self.phase.load(Ordering::SeqCst))
    }

    pub fn learning_config(&self) -> &LearningConfig {
        &self.learning
    }

    pub fn config(&self) -> &TrainerConfig {
        &self.config
    }

    fn set_phase(&self, phase: TrainerPhase) {
        self.phase.store(phase as u8, Ordering::SeqCst);
    }

    /// Run the whole budget and return the merged table.
    ///
    /// When the stop flag is raised, workers stop between episodes and the
    /// tables learned so far are still merged.
    ///
    /// # Errors
    ///
    /// Fails only on invalid configuration or when the thread pool cannot be
    /// built. Individual worker failures are reported in
    /// [`TrainingStats::failed_workers`].
    pub fn train(&self) -> Result<TrainingReport> {
        self.config.validate()?;
        let simulator = EpisodeSimulator::new(self.learning.clone())?;
        let workers = self.config.workers;
        let shares = partition(self.config.episodes, workers);
        let seeds = worker_seeds(self.config.seed, workers);

        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(workers)
            .thread_name(|i| format!("xxo-worker-{i}"))
            .build()
            .map_err(|e| Error::ThreadPool {
                message: e.to_string(),
            })?;

        info!(
            "Training {} episodes on {} workers ({}x{} board, α={}, γ={}, ε={}, {} credit)",
            self.config.episodes,
            workers,
            self.learning.width,
            self.learning.height,
            self.learning.learning_rate,
            self.learning.discount_factor,
            self.learning.epsilon,
            self.learning.credit,
        );
        self.observer.on_training_start(self.config.episodes)?;
        self.set_phase(TrainerPhase::Running);

        let outcomes: Vec<Result<WorkerReport>> = pool.install(|| {
            (0..workers)
                .into_par_iter()
                .map(|worker| {
                    catch_panic(worker, || {
                        self.run_worker(&simulator, worker, shares[worker], seeds[worker])
                    })
                })
                .collect()
        });

        self.set_phase(TrainerPhase::Merging);
        let cancelled = self.stop.load(Ordering::SeqCst);
        if cancelled {
            warn!("Training cancelled, merging partial results");
        }

        let (table, mut stats) = merge_reports(outcomes, self.learning.action_space())?;
        stats.episodes_requested = self.config.episodes;
        stats.cancelled = cancelled;
        info!(
            "Merged {} worker tables into {} states ({} episodes: X {} / O {} / draw {})",
            stats.workers.len(),
            stats.states,
            stats.episodes_completed,
            stats.x_wins,
            stats.o_wins,
            stats.draws,
        );

        self.observer.on_training_end(&stats)?;
        self.set_phase(TrainerPhase::Done);
        Ok(TrainingReport { table, stats })
    }

    fn run_worker(
        &self,
        simulator: &EpisodeSimulator,
        worker: usize,
        episodes: u64,
        seed: u64,
    ) -> Result<WorkerReport> {
        let mut rng = StdRng::seed_from_u64(seed);
        let mut table = ValueTable::new(simulator.config().action_space());
        let mut stats = WorkerStats::new(worker);
        let mut pending = 0;

        for _ in 0..episodes {
            if self.stop.load(Ordering::Relaxed) {
                debug!("Worker {worker} stopping after {} episodes", stats.episodes);
                break;
            }
            let episode = simulator.run(&mut table, &mut rng)?;
            stats.record(episode.outcome);

            pending += 1;
            if pending == PROGRESS_BATCH {
                self.observer.on_episodes_completed(worker, pending);
                pending = 0;
            }
        }
        if pending > 0 {
            self.observer.on_episodes_completed(worker, pending);
        }

        debug!(
            "Worker {worker} finished {} episodes with {} states",
            stats.episodes,
            table.len()
        );
        self.observer.on_worker_finished(&stats);
        Ok(WorkerReport { stats, table })
    }
}
