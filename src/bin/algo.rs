//! Engine entry point.
//!
//! Speaks the line protocol on stdin/stdout: the first line is the match
//! configuration, every later line is a frame. Deploy-phase frames are
//! answered with two lines (structures, then mobile units). Logging goes to
//! stderr so it never mixes with the protocol.

use log::*;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use std::io::{self, BufRead, Write};
use terminal_foreman::constants::*;
use terminal_foreman::game_state::{GameState, TurnSubmission};
use terminal_foreman::*;

fn seeded_rng() -> ChaCha8Rng {
    match std::env::var("ALGO_SEED").ok().and_then(|s| s.parse().ok()) {
        Some(seed) => {
            info!("Using fixed seed {}", seed);
            ChaCha8Rng::seed_from_u64(seed)
        }
        None => ChaCha8Rng::from_entropy(),
    }
}

fn write_submission(stdout: &io::Stdout, submission: &TurnSubmission) -> Result<()> {
    let [build, deploy] = submission.to_engine_lines()?;
    let mut out = stdout.lock();
    writeln!(out, "{}", build)?;
    writeln!(out, "{}", deploy)?;
    out.flush()?;
    Ok(())
}

fn run() -> Result<()> {
    let stdin = io::stdin();
    let stdout = io::stdout();
    let mut lines = stdin.lock().lines();

    let config = match lines.next() {
        Some(line) => line?,
        None => return Ok(()),
    };
    let mut algo = AlgoStrategy::on_game_start(&config, StrategySettings::default(), seeded_rng())?;

    for line in lines {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }

        let mut state = match GameState::from_frame(algo.catalog().clone(), &line) {
            Ok(state) => state,
            Err(err) => {
                warn!("Skipping frame: {}", err);
                // The engine still waits for a reply to every deploy phase.
                if GameState::peek_phase(&line) == Some(PHASE_DEPLOY) {
                    write_submission(&stdout, &TurnSubmission::default())?;
                }
                continue;
            }
        };

        match state.phase() {
            PHASE_DEPLOY => {
                algo.on_turn(&mut state);
                write_submission(&stdout, &state.submit_turn())?;
            }
            PHASE_END => {
                info!("Game over");
                break;
            }
            _ => {}
        }
    }

    Ok(())
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .target(env_logger::Target::Stderr)
        .init();

    if let Err(err) = run() {
        error!("{}", err);
        std::process::exit(1);
    }
}
