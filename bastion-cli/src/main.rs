//! BASTION CLI - Command-line interface
//!
//! Commands:
//! - terrain: Generate a random terrain layout
//! - show: Deploy both armies and print the board
//! - reach: Show where a piece can move and what it can attack
//! - replay: Apply a recorded action list to a fresh game

mod reach_cmd;
mod replay_cmd;
mod setup;
mod show_cmd;
mod terrain_cmd;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "bastion")]
#[command(about = "BASTION castle siege board game engine")]
struct Cli {
    /// Game config JSON file (defaults to a 12x12 board)
    #[arg(long, global = true, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Random seed for reproducibility
    #[arg(long, global = true)]
    seed: Option<u64>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate a random terrain layout
    Terrain(terrain_cmd::TerrainArgs),
    /// Deploy both standard armies and print the board
    Show(show_cmd::ShowArgs),
    /// Print the reachable cells and ranged targets of one piece
    Reach(reach_cmd::ReachArgs),
    /// Replay a JSON list of actions
    Replay(replay_cmd::ReplayArgs),
}

fn main() -> anyhow::Result<()> {
    // Logs go to stderr so JSON output stays clean
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = setup::load_config(cli.config.as_deref())?;

    match cli.command {
        Commands::Terrain(args) => terrain_cmd::run(args, &config, cli.seed),
        Commands::Show(args) => show_cmd::run(args, &config),
        Commands::Reach(args) => reach_cmd::run(args, &config),
        Commands::Replay(args) => replay_cmd::run(args, &config),
    }
}
