//! Terrain layout files
//!
//! One line per grid row, one digit per cell, read in position-id order.

use crate::error::LayoutError;
use crate::grid::{PosId, Terrain};
use anyhow::Context;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TerrainLayout {
    pub dimension: usize,
    /// Row-major, indexed by position id
    pub cells: Vec<Terrain>,
}

impl TerrainLayout {
    /// All-open layout
    pub fn open(dimension: usize) -> Self {
        Self {
            dimension,
            cells: vec![Terrain::Open; dimension * dimension],
        }
    }

    pub fn from_cells(dimension: usize, cells: Vec<Terrain>) -> Result<Self, LayoutError> {
        let expected = dimension * dimension;
        if cells.len() != expected {
            return Err(LayoutError::CellCount { found: cells.len(), expected });
        }
        Ok(Self { dimension, cells })
    }

    /// Build from raw tier numbers, as a view would hand them over
    pub fn from_tiers(dimension: usize, tiers: &[u8]) -> Result<Self, LayoutError> {
        let cells = tiers
            .iter()
            .enumerate()
            .map(|(id, &tier)| {
                Terrain::from_tier(tier).ok_or(LayoutError::BadTier {
                    line: id / dimension.max(1) + 1,
                    column: id % dimension.max(1) + 1,
                    found: char::from_digit(tier as u32, 10).unwrap_or('?'),
                })
            })
            .collect::<Result<Vec<_>, _>>()?;
        Self::from_cells(dimension, cells)
    }

    pub fn tiers(&self) -> Vec<u8> {
        self.cells.iter().map(|t| t.tier()).collect()
    }

    pub fn get(&self, id: PosId) -> Terrain {
        self.cells[id]
    }

    pub fn parse(text: &str) -> Result<Self, LayoutError> {
        let mut rows: Vec<&str> = text.lines().map(str::trim_end).collect();
        while rows.last().is_some_and(|line| line.is_empty()) {
            rows.pop();
        }

        let Some(first) = rows.first() else {
            return Err(LayoutError::Empty);
        };
        let dimension = first.chars().count();
        if dimension == 0 {
            return Err(LayoutError::Empty);
        }

        let mut cells = Vec::with_capacity(dimension * dimension);
        for (row, line) in rows.iter().enumerate() {
            let found = line.chars().count();
            if found != dimension {
                return Err(LayoutError::RaggedRow { line: row + 1, found, expected: dimension });
            }
            for (column, c) in line.chars().enumerate() {
                let terrain = c
                    .to_digit(10)
                    .and_then(|d| Terrain::from_tier(d as u8))
                    .ok_or(LayoutError::BadTier { line: row + 1, column: column + 1, found: c })?;
                cells.push(terrain);
            }
        }

        if rows.len() != dimension {
            return Err(LayoutError::NotSquare { rows: rows.len(), columns: dimension });
        }
        Ok(Self { dimension, cells })
    }

    pub fn to_text(&self) -> String {
        let mut out = String::with_capacity(self.cells.len() + self.dimension);
        for row in self.cells.chunks(self.dimension.max(1)) {
            for terrain in row {
                out.push(char::from(b'0' + terrain.tier()));
            }
            out.push('\n');
        }
        out
    }

    /// Load from a layout file
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read terrain file {}", path.display()))?;
        let layout = Self::parse(&content)
            .with_context(|| format!("Invalid terrain file {}", path.display()))?;
        Ok(layout)
    }

    pub fn save(&self, path: &Path) -> anyhow::Result<()> {
        std::fs::write(path, self.to_text())
            .with_context(|| format!("Failed to write terrain file {}", path.display()))?;
        Ok(())
    }

    /// Random rough patches covering roughly `density` of the board
    pub fn scattered<R: Rng>(rng: &mut R, dimension: usize, density: f64) -> Self {
        let density = density.clamp(0.0, 1.0);
        let cells = (0..dimension * dimension)
            .map(|_| {
                if rng.gen_bool(density) {
                    Terrain::Rough
                } else {
                    Terrain::Open
                }
            })
            .collect();
        Self { dimension, cells }
    }

    /// Reproducible scattered layout
    pub fn seeded(dimension: usize, density: f64, seed: u64) -> Self {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        Self::scattered(&mut rng, dimension, density)
    }
}
