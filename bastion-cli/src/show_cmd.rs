//! Show command - deploy both armies and print the opening board

use std::path::PathBuf;

use anyhow::Result;
use clap::Args;

use bastion_core::{BoardView, GameConfig, Side};

use crate::setup::deployed_game;

#[derive(Args)]
pub struct ShowArgs {
    /// Terrain layout file
    #[arg(long, value_name = "FILE")]
    pub terrain: Option<PathBuf>,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

pub fn run(args: ShowArgs, config: &GameConfig) -> Result<()> {
    let game = deployed_game(config, args.terrain.as_deref())?;
    let board = game.board();

    if args.json {
        println!("{}", serde_json::to_string_pretty(&BoardView::of(board))?);
    } else {
        print!("{}", board);
        println!(
            "Side A: {} pieces, {} royal | Side B: {} pieces, {} royal",
            board.pieces_of(Side::A).count(),
            game.royal_count(Side::A),
            board.pieces_of(Side::B).count(),
            game.royal_count(Side::B)
        );
    }
    Ok(())
}
