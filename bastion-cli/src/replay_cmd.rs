//! Replay command - apply a recorded list of actions to a fresh game
//!
//! The replay file is a JSON array of actions, for example
//! `[{"action": "finish_terrain"}, {"action": "move", "from": 13, "to": 49}]`.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;

use bastion_core::{Action, BoardView, Event, GameConfig};

use crate::setup::game_with_terrain;

#[derive(Args)]
pub struct ReplayArgs {
    /// Replay file (JSON array of actions)
    #[arg(value_name = "FILE")]
    pub file: PathBuf,

    /// Terrain layout file, laid before the first action
    #[arg(long, value_name = "FILE")]
    pub terrain: Option<PathBuf>,

    /// Keep going after a rejected action
    #[arg(long)]
    pub keep_going: bool,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(serde::Serialize)]
struct StepRecord {
    step: usize,
    action: Action,
    #[serde(skip_serializing_if = "Option::is_none")]
    event: Option<Event>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

pub fn run(args: ReplayArgs, config: &GameConfig) -> Result<()> {
    let actions = load_actions(&args)?;
    let mut game = game_with_terrain(config, args.terrain.as_deref())?;
    tracing::info!("Replaying {} actions from {}", actions.len(), args.file.display());

    let mut records = Vec::with_capacity(actions.len());
    for (step, action) in actions.into_iter().enumerate() {
        let record = match game.apply(action) {
            Ok(event) => StepRecord { step, action, event: Some(event), error: None },
            Err(e) => {
                tracing::warn!("Step {} rejected: {}", step, e);
                StepRecord { step, action, event: None, error: Some(e.to_string()) }
            }
        };
        let rejected = record.error.is_some();
        records.push(record);
        if rejected && !args.keep_going {
            break;
        }
    }

    if args.json {
        #[derive(serde::Serialize)]
        struct JsonOutput<'a> {
            steps: &'a [StepRecord],
            phase: String,
            winner: Option<bastion_core::Side>,
            board: BoardView,
        }
        let output = JsonOutput {
            steps: &records,
            phase: game.phase().name().to_string(),
            winner: game.winner(),
            board: BoardView::of(game.board()),
        };
        println!("{}", serde_json::to_string_pretty(&output)?);
    } else {
        for record in &records {
            match (&record.event, &record.error) {
                (Some(event), _) => println!("{:>4}  {:?}", record.step, event),
                (None, Some(error)) => println!("{:>4}  {:?} rejected: {}", record.step, record.action, error),
                (None, None) => {}
            }
        }
        println!();
        print!("{}", game.board());
        match game.winner() {
            Some(side) => println!("Winner: side {:?}", side),
            None => println!("Phase: {}, side {:?} to move", game.phase().name(), game.turn()),
        }
    }

    if !args.keep_going {
        if let Some(record) = records.iter().find(|r| r.error.is_some()) {
            anyhow::bail!("Replay stopped at step {}", record.step);
        }
    }
    Ok(())
}

fn load_actions(args: &ReplayArgs) -> Result<Vec<Action>> {
    let content = std::fs::read_to_string(&args.file)
        .with_context(|| format!("Failed to read replay file {}", args.file.display()))?;
    serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse replay file {}", args.file.display()))
}
