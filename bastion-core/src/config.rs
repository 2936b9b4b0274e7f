//! Game configuration

use crate::error::GameError;
use crate::grid::Side;
use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Board size and deployment rules for one game
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Cells per side of the square board
    pub dimension: usize,
    /// Rows at each end of the board a side may deploy into
    pub deployment_rows: usize,
    /// Side that moves first once play starts
    pub first_turn: Side,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            dimension: 12,
            deployment_rows: 6,
            first_turn: Side::A,
        }
    }
}

impl GameConfig {
    pub fn with_dimension(mut self, dimension: usize) -> Self {
        self.dimension = dimension;
        self
    }

    pub fn with_deployment_rows(mut self, rows: usize) -> Self {
        self.deployment_rows = rows;
        self
    }

    pub fn with_first_turn(mut self, side: Side) -> Self {
        self.first_turn = side;
        self
    }

    /// Load from a JSON file. Missing fields take their defaults.
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config {}", path.display()))?;
        let config: GameConfig = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse config {}", path.display()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), GameError> {
        if self.dimension == 0 {
            return Err(GameError::Config("board dimension must be positive".into()));
        }
        if self.deployment_rows == 0 || self.deployment_rows * 2 > self.dimension {
            return Err(GameError::Config(format!(
                "{} deployment rows do not fit a {}x{} board",
                self.deployment_rows, self.dimension, self.dimension
            )));
        }
        Ok(())
    }

    /// First row (inclusive) and last row (exclusive) of `side`'s deployment zone
    pub fn zone_rows(&self, side: Side) -> (usize, usize) {
        match side {
            Side::A => (0, self.deployment_rows),
            Side::B => (self.dimension - self.deployment_rows, self.dimension),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = GameConfig::default();
        assert_eq!(config.dimension, 12);
        assert_eq!(config.deployment_rows, 6);
        assert_eq!(config.first_turn, Side::A);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_zones() {
        let config = GameConfig::default().with_dimension(10).with_deployment_rows(3);
        assert_eq!(config.zone_rows(Side::A), (0, 3));
        assert_eq!(config.zone_rows(Side::B), (7, 10));
    }

    #[test]
    fn test_validate() {
        assert!(GameConfig::default().with_dimension(0).validate().is_err());
        assert!(GameConfig::default().with_deployment_rows(0).validate().is_err());
        assert!(GameConfig::default().with_dimension(10).with_deployment_rows(6).validate().is_err());
        assert!(GameConfig::default().with_dimension(10).with_deployment_rows(5).validate().is_ok());
    }

    #[test]
    fn test_partial_json() {
        let config: GameConfig = serde_json::from_str(r#"{"dimension": 8, "first_turn": "B"}"#).unwrap();
        assert_eq!(config.dimension, 8);
        assert_eq!(config.deployment_rows, 6);
        assert_eq!(config.first_turn, Side::B);
    }
}
