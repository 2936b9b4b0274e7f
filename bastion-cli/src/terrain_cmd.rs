//! Terrain command - generate a scattered rough-terrain layout

use std::path::PathBuf;

use anyhow::{bail, Result};
use clap::Args;

use bastion_core::{GameConfig, TerrainLayout};

use crate::setup::create_rng;

#[derive(Args)]
pub struct TerrainArgs {
    /// Board dimension (defaults to the config's)
    #[arg(long)]
    pub dimension: Option<usize>,

    /// Fraction of cells made rough
    #[arg(long, default_value = "0.15")]
    pub density: f64,

    /// Write the layout here instead of stdout
    #[arg(long, value_name = "FILE")]
    pub output: Option<PathBuf>,
}

pub fn run(args: TerrainArgs, config: &GameConfig, seed: Option<u64>) -> Result<()> {
    let dimension = args.dimension.unwrap_or(config.dimension);
    if dimension == 0 {
        bail!("Board dimension must be positive");
    }
    if !(0.0..=1.0).contains(&args.density) {
        bail!("Density must lie in [0, 1], got {}", args.density);
    }

    let mut rng = create_rng(seed);
    let layout = TerrainLayout::scattered(&mut rng, dimension, args.density);

    match &args.output {
        Some(path) => {
            layout.save(path)?;
            tracing::info!("Saved {}x{} terrain to {}", dimension, dimension, path.display());
        }
        None => print!("{}", layout.to_text()),
    }
    Ok(())
}
