//! xxo CLI - train and play generalized tic-tac-toe value tables
//!
//! - `xxo train`: parallel self-play training, saved to `ai_model.dat`
//! - `xxo play`: play against a saved table, which learns from the game
//!
//! Logging goes through `env_logger`; set `RUST_LOG=debug` for per-worker
//! detail.

use anyhow::Result;
use clap::{Parser, Subcommand};
use env_logger::Env;

#[derive(Parser)]
#[command(name = "xxo")]
#[command(version, about = "Parallel self-play trainer for generalized tic-tac-toe", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Train a value table by parallel self-play
    Train(Box<xxo::cli::commands::train::TrainArgs>),

    /// Play against a trained value table
    Play(xxo::cli::commands::play::PlayArgs),
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Train(args) => xxo::cli::commands::train::execute(*args),
        Commands::Play(args) => xxo::cli::commands::play::execute(args),
    }
}
