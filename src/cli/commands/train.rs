//! Train command - parallel self-play training

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Parser;
use log::info;
use serde::Serialize;

use super::{interrupt_flag_or_default, save_with_recovery};
use crate::{
    app::{LearningConfig, TrainerConfig},
    cli::{
        config::BoardArgs,
        output::{format_number, percent, print_kv, print_section},
    },
    pipeline::{ParallelTrainer, ProgressObserver, SilentObserver, TrainingStats},
    q_learning::{CreditAssignment, RewardSchedule},
    tictactoe::OriginBound,
    types::defaults,
};

/// Default file the trained table is written to
pub const DEFAULT_MODEL_PATH: &str = "ai_model.dat";

#[derive(Debug, Serialize)]
struct TrainingSummaryFile<'a> {
    training: &'a TrainingStats,
    learning: &'a LearningConfig,
    trainer: &'a TrainerConfig,
    output: &'a Path,
}

fn sanitize_summary_path(raw: &Path) -> PathBuf {
    let mut normalized = raw.to_path_buf();
    let raw_str = raw.as_os_str().to_string_lossy();

    // Trailing separator or no file name: treat as a directory
    if raw_str.ends_with(std::path::MAIN_SEPARATOR) || normalized.file_name().is_none() {
        normalized.push("training_summary.json");
        return normalized;
    }

    match normalized.extension().and_then(|ext| ext.to_str()) {
        Some(ext) if ext.eq_ignore_ascii_case("json") => normalized,
        _ => {
            normalized.set_extension("json");
            normalized
        }
    }
}

#[derive(Parser, Debug)]
#[command(about = "Train a value table by parallel self-play", allow_negative_numbers = true)]
pub struct TrainArgs {
    /// Total number of self-play episodes
    #[arg(long, short = 'e', default_value_t = defaults::EPISODES)]
    pub episodes: u64,

    /// Number of parallel workers
    #[arg(long, short = 'w', default_value_t = defaults::WORKERS)]
    pub workers: usize,

    /// Learning rate α
    #[arg(long, default_value_t = defaults::LEARNING_RATE)]
    pub alpha: f64,

    /// Discount factor γ
    #[arg(long, default_value_t = defaults::DISCOUNT_FACTOR)]
    pub gamma: f64,

    /// Exploration probability ε
    #[arg(long, default_value_t = defaults::EPSILON)]
    pub epsilon: f64,

    #[command(flatten)]
    pub board: BoardArgs,

    /// Random seed for reproducibility
    #[arg(long)]
    pub seed: Option<u64>,

    /// Output file for the trained table
    #[arg(long, short = 'o', default_value = DEFAULT_MODEL_PATH)]
    pub output: PathBuf,

    /// Optional path for writing a summary JSON file
    #[arg(long)]
    pub summary: Option<PathBuf>,

    /// Credit assignment (per-player or interleaved)
    #[arg(long, default_value = "per-player")]
    pub credit: String,

    /// Reward schedule (win=1,draw=0,loss=-1)
    #[arg(long)]
    pub reward: Option<String>,

    /// Skip the last window row and column on boards larger than 3x3
    #[arg(long)]
    pub legacy_window_scan: bool,

    /// Hide the progress bar
    #[arg(long)]
    pub no_progress: bool,
}

impl TrainArgs {
    /// Learning and trainer configuration described by the flags
    pub fn configs(&self) -> Result<(LearningConfig, TrainerConfig)> {
        let credit: CreditAssignment = self.credit.parse()?;
        let rewards = match &self.reward {
            Some(raw) => raw.parse::<RewardSchedule>()?,
            None => RewardSchedule::default(),
        };
        let window_scan = if self.legacy_window_scan {
            OriginBound::Exclusive
        } else {
            OriginBound::Inclusive
        };

        let learning = LearningConfig::default()
            .with_learning_rate(self.alpha)
            .with_discount_factor(self.gamma)
            .with_epsilon(self.epsilon)
            .with_rewards(rewards)
            .with_credit(credit)
            .with_board(self.board.width, self.board.height)
            .with_window_scan(window_scan);
        learning.validate()?;

        let mut trainer = TrainerConfig::new(self.episodes, self.workers);
        if let Some(seed) = self.seed {
            trainer = trainer.with_seed(seed);
        }
        trainer.validate()?;

        Ok((learning, trainer))
    }
}

fn print_summary(stats: &TrainingStats, output: &Path) {
    print_section("Training Complete");
    print_kv(
        "Episodes",
        &format!(
            "{} / {}",
            format_number(stats.episodes_completed),
            format_number(stats.episodes_requested)
        ),
    );
    let total = stats.episodes_completed;
    print_kv(
        "X wins",
        &format!("{} ({:.1}%)", stats.x_wins, percent(stats.x_wins, total)),
    );
    print_kv(
        "O wins",
        &format!("{} ({:.1}%)", stats.o_wins, percent(stats.o_wins, total)),
    );
    print_kv(
        "Draws",
        &format!("{} ({:.1}%)", stats.draws, percent(stats.draws, total)),
    );
    print_kv("States", &format_number(stats.states as u64));
    if !stats.failed_workers.is_empty() {
        print_kv("Failed workers", &format!("{:?}", stats.failed_workers));
    }
    if stats.cancelled {
        print_kv("Status", "interrupted, partial table saved");
    }
    print_kv("Output", &output.display().to_string());
}

pub fn execute(args: TrainArgs) -> Result<()> {
    let (learning, trainer_config) = args.configs().context("invalid training options")?;

    let summary_path = args.summary.as_deref().map(sanitize_summary_path);

    let mut trainer = ParallelTrainer::new(learning, trainer_config)
        .with_stop_flag(interrupt_flag_or_default());
    if args.no_progress {
        trainer = trainer.with_observer(Box::new(SilentObserver));
    } else {
        trainer = trainer.with_observer(Box::new(ProgressObserver::new()));
    }

    let report = trainer.train().context("training failed")?;
    print_summary(&report.stats, &args.output);

    save_with_recovery(&report.table, &args.output)?;

    if let Some(path) = summary_path {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("failed to create {}", parent.display()))?;
        }
        let file = TrainingSummaryFile {
            training: &report.stats,
            learning: trainer.learning_config(),
            trainer: trainer.config(),
            output: &args.output,
        };
        let writer = std::fs::File::create(&path)
            .with_context(|| format!("failed to create summary {}", path.display()))?;
        serde_json::to_writer_pretty(writer, &file)?;
        info!("Wrote training summary to {}", path.display());
    }

    Ok(())
}
