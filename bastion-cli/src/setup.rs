//! Shared helpers for building games from command-line inputs

use std::path::Path;

use anyhow::{Context, Result};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use bastion_core::{Game, GameConfig, TerrainLayout};

/// Config from file, or the default board
pub fn load_config(path: Option<&Path>) -> Result<GameConfig> {
    match path {
        Some(path) => GameConfig::load(path),
        None => Ok(GameConfig::default()),
    }
}

/// Fresh game with the terrain laid, still in the terrain phase
pub fn game_with_terrain(config: &GameConfig, terrain: Option<&Path>) -> Result<Game> {
    let mut game = Game::new(config.clone()).context("Invalid game config")?;
    if let Some(path) = terrain {
        let layout = TerrainLayout::load(path)?;
        game.load_terrain(&layout)
            .with_context(|| format!("Terrain file {} does not fit the board", path.display()))?;
        tracing::info!("Loaded terrain from {}", path.display());
    }
    Ok(game)
}

/// Game with both standard armies deployed and play started
pub fn deployed_game(config: &GameConfig, terrain: Option<&Path>) -> Result<Game> {
    let mut game = game_with_terrain(config, terrain)?;
    game.finish_terrain().context("Failed to deploy side A")?;
    game.finish_deployment().context("Failed to deploy side B")?;
    game.finish_deployment()?;
    Ok(game)
}

/// Create RNG from seed or random
pub fn create_rng(seed: Option<u64>) -> ChaCha8Rng {
    match seed {
        Some(s) => ChaCha8Rng::seed_from_u64(s),
        None => ChaCha8Rng::from_entropy(),
    }
}
