//! Reach command - inspect one piece on the opening board

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;

use bastion_core::{GameConfig, Pos, PosId, ReachView};

use crate::setup::deployed_game;

#[derive(Args)]
pub struct ReachArgs {
    /// Position id of the piece (x + dimension * y)
    pub id: PosId,

    /// Terrain layout file
    #[arg(long, value_name = "FILE")]
    pub terrain: Option<PathBuf>,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

pub fn run(args: ReachArgs, config: &GameConfig) -> Result<()> {
    let game = deployed_game(config, args.terrain.as_deref())?;
    let board = game.board();
    let dim = board.dimension();
    if args.id >= dim * dim {
        anyhow::bail!("Position id {} is off a {}x{} board", args.id, dim, dim);
    }

    let pos = Pos::from_id(args.id, dim);
    let piece = board
        .piece_at(pos)
        .with_context(|| format!("No piece at id {} {}", args.id, pos))?;
    let view = ReachView::of(piece, dim);

    if args.json {
        println!("{}", serde_json::to_string_pretty(&view)?);
    } else {
        println!("{} ({:?}) at {} {}", piece.spec().name, piece.side, args.id, pos);
        println!("Reachable: {}", format_ids(&view.reachable, dim));
        println!("Targets:   {}", format_ids(&view.targets, dim));
    }
    Ok(())
}

fn format_ids(ids: &[PosId], dim: usize) -> String {
    if ids.is_empty() {
        return "-".to_string();
    }
    ids.iter()
        .map(|&id| format!("{}{}", id, Pos::from_id(id, dim)))
        .collect::<Vec<_>>()
        .join(" ")
}
