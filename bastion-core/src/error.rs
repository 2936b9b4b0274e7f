//! Error types

use crate::grid::{Pos, PosId, Side};
use thiserror::Error;

/// Placement rejected by the board before any state changed
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SetupError {
    #[error("cell {0} is off the board")]
    OutOfBounds(Pos),
    #[error("cell {0} is already occupied")]
    Occupied(Pos),
    #[error("side {0:?} already has a castle")]
    CastleExists(Side),
    #[error("castle green at {0} would fall off the board")]
    GreenOffBoard(Pos),
    #[error("castle at {0} would overlap another castle")]
    CastleOverlap(Pos),
}

/// Terrain layout text could not be parsed
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LayoutError {
    #[error("terrain layout is empty")]
    Empty,
    #[error("invalid terrain tier {found:?} at line {line}, column {column}")]
    BadTier { line: usize, column: usize, found: char },
    #[error("line {line} has {found} cells, expected {expected}")]
    RaggedRow { line: usize, found: usize, expected: usize },
    #[error("layout has {rows} rows of {columns} cells, expected a square grid")]
    NotSquare { rows: usize, columns: usize },
    #[error("layout holds {found} cells, expected {expected}")]
    CellCount { found: usize, expected: usize },
}

/// Game action rejected by the controller
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GameError {
    #[error("action not allowed during the {0} phase")]
    WrongPhase(&'static str),
    #[error("no piece at cell {0}")]
    NoPiece(PosId),
    #[error("cell {0} belongs to the other side")]
    NotYourPiece(PosId),
    #[error("piece at cell {0} has already acted this turn")]
    AlreadyMoved(PosId),
    #[error("illegal move from {from} to {to}")]
    IllegalMove { from: PosId, to: PosId },
    #[error("piece at cell {from} cannot attack cell {to}")]
    IllegalAttack { from: PosId, to: PosId },
    #[error("cell {0} is outside the deployment zone")]
    OutsideZone(PosId),
    #[error("cell {0} is off the board")]
    OffBoard(PosId),
    #[error("not enough open cells to deploy side {0:?}")]
    NotEnoughRoom(Side),
    #[error("invalid terrain tier {0}")]
    BadTier(u8),
    #[error("invalid configuration: {0}")]
    Config(String),
    #[error("the game is over")]
    GameOver,
    #[error(transparent)]
    Setup(#[from] SetupError),
    #[error(transparent)]
    Layout(#[from] LayoutError),
}
