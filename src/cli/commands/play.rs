//! Play command - human vs trained table

use std::{
    io::{BufRead, Write},
    path::PathBuf,
};

use anyhow::{Context, Result, bail};
use clap::Parser;
use rand::{SeedableRng, rngs::StdRng};

use super::{save_with_recovery, train::DEFAULT_MODEL_PATH};
use crate::{
    Error,
    adapters::TextFileRepository,
    app::LearningConfig,
    cli::config::BoardArgs,
    play::PlaySession,
    ports::TableRepository,
    tictactoe::GameOutcome,
};

#[derive(Parser, Debug)]
#[command(about = "Play against a trained table; the table learns from the game")]
pub struct PlayArgs {
    /// Trained table to load and update
    #[arg(long, short = 'm', default_value = DEFAULT_MODEL_PATH)]
    pub model: PathBuf,

    #[command(flatten)]
    pub board: BoardArgs,

    /// Random seed for the AI's choices in unseen positions
    #[arg(long)]
    pub seed: Option<u64>,
}

/// Load the table, play one game over `input`/`output`, and save the table.
pub fn run<R: BufRead, W: Write>(args: &PlayArgs, input: R, output: W) -> Result<GameOutcome> {
    let repo = TextFileRepository::new();
    let mut table = match repo.load(&args.model) {
        Ok(table) => table,
        Err(err @ Error::EmptyTable { .. }) => {
            return Err(err).context("no trained table to play against, run `xxo train` first");
        }
        Err(err) => {
            return Err(err)
                .with_context(|| format!("failed to load {}", args.model.display()));
        }
    };

    if table.action_space() != args.board.action_space() {
        bail!(Error::ActionSpaceMismatch {
            expected: args.board.action_space(),
            found: table.action_space(),
        });
    }

    let config = LearningConfig::default()
        .with_board(args.board.width, args.board.height)
        .with_epsilon(0.0);
    let session = PlaySession::new(config)?;
    let mut rng = match args.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_rng(&mut rand::rng()),
    };

    let outcome = session.play(&mut table, input, output, &mut rng)?;
    save_with_recovery(&table, &args.model)?;
    Ok(outcome)
}

pub fn execute(args: PlayArgs) -> Result<()> {
    let stdin = std::io::stdin();
    let stdout = std::io::stdout();
    run(&args, stdin.lock(), stdout.lock())?;
    Ok(())
}
