//! BASTION Core - Movement and attack engine
//!
//! This crate provides the core game logic for BASTION:
//! - Square grid with tiered terrain
//! - Castles and their entrance greens
//! - Piece kinds and their ray templates
//! - Path derivation against terrain, occupancy and castles
//! - Board state transitions and the game flow around them

pub mod grid;
pub mod castle;
pub mod pieces;
pub mod paths;
pub mod board;
pub mod config;
pub mod error;
pub mod game;
pub mod layout;
pub mod view;

// Re-exports for convenient access
pub use grid::{Direction, Pos, PosId, Side, Terrain, TerrainGrid};
pub use castle::{Castle, Entrance};
pub use pieces::{Durability, Piece, PieceKind, PieceSpec, PIECE_SPECS};
pub use paths::Paths;
pub use board::Board;
pub use config::GameConfig;
pub use error::{GameError, LayoutError, SetupError};
pub use game::{Action, Event, Game, Phase, STANDARD_ARMY};
pub use layout::TerrainLayout;
pub use view::{BoardView, CastleView, PieceView, ReachView};
