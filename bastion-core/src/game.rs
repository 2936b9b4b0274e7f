//! Game flow: terrain setup, deployment, turns and victory

use crate::board::Board;
use crate::castle::Entrance;
use crate::config::GameConfig;
use crate::error::{GameError, LayoutError};
use crate::grid::{Pos, PosId, Side, Terrain};
use crate::layout::TerrainLayout;
use crate::pieces::{Piece, PieceKind};
use serde::{Deserialize, Serialize};

// ============================================================================
// CONSTANTS
// ============================================================================

/// Pieces each side deploys, in slot order. The castle takes the next slot.
pub const STANDARD_ARMY: [PieceKind; 13] = [
    PieceKind::King,
    PieceKind::Duke,
    PieceKind::Prince,
    PieceKind::Knight,
    PieceKind::Knight,
    PieceKind::Sergeant,
    PieceKind::Sergeant,
    PieceKind::Squire,
    PieceKind::Archer,
    PieceKind::Pikeman,
    PieceKind::Pikeman,
    PieceKind::Pikeman,
    PieceKind::Pikeman,
];

// ============================================================================
// CORE TYPES
// ============================================================================

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Phase {
    Terrain,
    Deploy(Side),
    InGame,
    Over(Side),
}

impl Phase {
    pub fn name(self) -> &'static str {
        match self {
            Phase::Terrain => "terrain",
            Phase::Deploy(_) => "deployment",
            Phase::InGame => "play",
            Phase::Over(_) => "game over",
        }
    }
}

/// A controller call, as recorded in replay files
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum Action {
    PaintTerrain { id: PosId, tier: u8 },
    FinishTerrain,
    FreeMove { side: Side, from: PosId, to: PosId },
    FinishDeployment,
    Move { from: PosId, to: PosId },
    Attack { from: PosId, target: PosId },
    EndTurn,
}

/// What an applied action did
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum Event {
    TerrainPainted { id: PosId, tier: u8 },
    Deployed { side: Side },
    Relocated { side: Side, from: PosId, to: PosId },
    PlayStarted { turn: Side },
    Moved {
        from: PosId,
        to: PosId,
        #[serde(skip_serializing_if = "Option::is_none")]
        winner: Option<Side>,
    },
    Captured {
        from: PosId,
        target: PosId,
        kind: PieceKind,
        #[serde(skip_serializing_if = "Option::is_none")]
        winner: Option<Side>,
    },
    TurnPassed { turn: Side },
}

// ============================================================================
// GAME
// ============================================================================

#[derive(Clone, Debug)]
pub struct Game {
    config: GameConfig,
    board: Board,
    phase: Phase,
    turn: Side,
}

impl Game {
    // ========================================================================
    // CONSTRUCTION
    // ========================================================================

    /// Fresh game in the terrain phase
    pub fn new(config: GameConfig) -> Result<Self, GameError> {
        config.validate()?;
        Ok(Self {
            board: Board::new(config.dimension),
            turn: config.first_turn,
            phase: Phase::Terrain,
            config,
        })
    }

    /// Resume play on a prepared board, skipping setup
    pub fn in_progress(config: GameConfig, mut board: Board, turn: Side) -> Result<Self, GameError> {
        config.validate()?;
        if board.dimension() != config.dimension {
            return Err(GameError::Config(format!(
                "board is {}x{}, config expects {}",
                board.dimension(),
                board.dimension(),
                config.dimension
            )));
        }
        board.recompute_all();
        board.reset_move_counts();
        Ok(Self {
            config,
            board,
            phase: Phase::InGame,
            turn,
        })
    }

    // ========================================================================
    // ACCESSORS
    // ========================================================================

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Side to move
    pub fn turn(&self) -> Side {
        self.turn
    }

    pub fn winner(&self) -> Option<Side> {
        match self.phase {
            Phase::Over(side) => Some(side),
            _ => None,
        }
    }

    pub fn royal_count(&self, side: Side) -> usize {
        self.board.pieces_of(side).filter(|p| p.is_royal()).count()
    }

    pub fn is_piece_moved(&self, id: PosId) -> bool {
        self.piece(id).is_some_and(|p| p.move_count > 0)
    }

    pub fn reach_of(&self, id: PosId) -> Option<Vec<PosId>> {
        let pos = self.pos(id).ok()?;
        self.board.reach_of(pos)
    }

    /// Would the piece at `from` be allowed to capture whatever stands on `target`?
    pub fn can_attack(&self, from: PosId, target: PosId) -> bool {
        let (Some(attacker), Some(victim)) = (self.piece(from), self.piece(target)) else {
            return false;
        };
        attacker.side != victim.side && attacker.can_attack(victim.pos)
    }

    fn piece(&self, id: PosId) -> Option<&Piece> {
        self.pos(id).ok().and_then(|pos| self.board.piece_at(pos))
    }

    fn pos(&self, id: PosId) -> Result<Pos, GameError> {
        let dim = self.config.dimension;
        if id >= dim * dim {
            return Err(GameError::OffBoard(id));
        }
        Ok(Pos::from_id(id, dim))
    }

    fn expect_phase(&self, expected: Phase) -> Result<(), GameError> {
        match self.phase {
            Phase::Over(_) => Err(GameError::GameOver),
            phase if phase == expected => Ok(()),
            phase => Err(GameError::WrongPhase(phase.name())),
        }
    }

    // ========================================================================
    // TERRAIN PHASE
    // ========================================================================

    pub fn paint_terrain(&mut self, id: PosId, tier: u8) -> Result<(), GameError> {
        self.expect_phase(Phase::Terrain)?;
        let pos = self.pos(id)?;
        let terrain = Terrain::from_tier(tier).ok_or(GameError::BadTier(tier))?;
        self.board.set_terrain(pos, terrain);
        Ok(())
    }

    pub fn load_terrain(&mut self, layout: &TerrainLayout) -> Result<(), GameError> {
        self.expect_phase(Phase::Terrain)?;
        if layout.dimension != self.config.dimension {
            return Err(LayoutError::CellCount {
                found: layout.cells.len(),
                expected: self.config.dimension * self.config.dimension,
            }
            .into());
        }
        self.board.apply_terrain(&layout.cells)?;
        Ok(())
    }

    /// Lock the terrain and deploy side A's army
    pub fn finish_terrain(&mut self) -> Result<(), GameError> {
        self.expect_phase(Phase::Terrain)?;
        self.deploy_army(Side::A)?;
        self.phase = Phase::Deploy(Side::A);
        tracing::info!("Terrain set, side A deploying");
        Ok(())
    }

    // ========================================================================
    // DEPLOYMENT PHASE
    // ========================================================================

    /// Cells in `side`'s zone that can take a piece: open, empty, and with an
    /// open neighbour on the side the castle's entrance faces
    fn open_slots(&self, side: Side, entrance: Entrance) -> Vec<Pos> {
        let dim = self.config.dimension;
        let (first, last) = self.config.zone_rows(side);
        let ids = first * dim..last * dim;
        let ids: Box<dyn Iterator<Item = PosId>> = match side {
            Side::A => Box::new(ids),
            Side::B => Box::new(ids.rev()),
        };

        ids.map(|id| Pos::from_id(id, dim))
            .filter(|&pos| {
                let beside = pos.step(entrance.direction(), 1);
                self.board.terrain(pos).is_open()
                    && self.board.piece_at(pos).is_none()
                    && self.board.in_bounds(beside)
                    && self.board.terrain(beside).is_open()
            })
            .collect()
    }

    fn deploy_army(&mut self, side: Side) -> Result<(), GameError> {
        let entrance = match side {
            Side::A => Entrance::East,
            Side::B => Entrance::West,
        };
        let slots = self.open_slots(side, entrance);
        if slots.len() <= STANDARD_ARMY.len() {
            return Err(GameError::NotEnoughRoom(side));
        }

        for (&kind, &pos) in STANDARD_ARMY.iter().zip(&slots) {
            self.board.add_piece(kind, side, pos)?;
        }
        self.board.add_castle(side, slots[STANDARD_ARMY.len()], entrance)?;
        tracing::debug!("Deployed {} pieces for side {:?}", STANDARD_ARMY.len(), side);
        Ok(())
    }

    fn in_zone(&self, side: Side, pos: Pos) -> bool {
        let (first, last) = self.config.zone_rows(side);
        (first..last).contains(&(pos.y as usize))
    }

    /// Rearrange a piece or the castle of `side` within its deployment zone
    pub fn free_move(&mut self, side: Side, from: PosId, to: PosId) -> Result<(), GameError> {
        self.expect_phase(Phase::Deploy(side))?;
        let src = self.pos(from)?;
        let dest = self.pos(to)?;
        if !self.in_zone(side, dest) {
            return Err(GameError::OutsideZone(to));
        }

        let moved = if self.board.castle_of(side).is_some_and(|c| c.pos == src) {
            self.board.free_move_castle(side, dest)
        } else {
            let piece = self.board.piece_at(src).ok_or(GameError::NoPiece(from))?;
            if piece.side != side {
                return Err(GameError::NotYourPiece(from));
            }
            self.board.free_move(src, dest)
        };

        if moved {
            Ok(())
        } else {
            Err(GameError::IllegalMove { from, to })
        }
    }

    /// Close the current deployment. After side A this deploys side B,
    /// after side B play begins. Returns the new phase.
    pub fn finish_deployment(&mut self) -> Result<Phase, GameError> {
        match self.phase {
            Phase::Deploy(Side::A) => {
                self.deploy_army(Side::B)?;
                self.phase = Phase::Deploy(Side::B);
                tracing::info!("Side B deploying");
            }
            Phase::Deploy(Side::B) => {
                self.board.recompute_all();
                self.board.reset_move_counts();
                self.turn = self.config.first_turn;
                self.phase = Phase::InGame;
                tracing::info!("Play started, side {:?} to move", self.turn);
            }
            Phase::Over(_) => return Err(GameError::GameOver),
            phase => return Err(GameError::WrongPhase(phase.name())),
        }
        Ok(self.phase)
    }

    // ========================================================================
    // PLAY
    // ========================================================================

    /// The piece at `id` belongs to the side to move and has not acted yet
    fn ready_piece(&self, id: PosId) -> Result<Pos, GameError> {
        self.expect_phase(Phase::InGame)?;
        let pos = self.pos(id)?;
        let piece = self.board.piece_at(pos).ok_or(GameError::NoPiece(id))?;
        if piece.side != self.turn {
            return Err(GameError::NotYourPiece(id));
        }
        if piece.move_count > 0 {
            return Err(GameError::AlreadyMoved(id));
        }
        Ok(pos)
    }

    pub fn ruled_move(&mut self, from: PosId, to: PosId) -> Result<(), GameError> {
        let src = self.ready_piece(from)?;
        let dest = self.pos(to)?;
        if !self.board.ruled_move(src, dest) {
            return Err(GameError::IllegalMove { from, to });
        }
        self.check_victory(dest);
        Ok(())
    }

    /// Returns the captured piece
    pub fn attack(&mut self, from: PosId, target: PosId) -> Result<Piece, GameError> {
        let src = self.ready_piece(from)?;
        let dest = self.pos(target)?;
        let captured = self
            .board
            .attack(src, dest)
            .ok_or(GameError::IllegalAttack { from, to: target })?;

        let landing = if self.board.piece_at(src).is_some() { src } else { dest };
        self.check_victory(landing);
        Ok(captured)
    }

    /// Pass the turn. Returns the side now to move.
    pub fn end_turn(&mut self) -> Result<Side, GameError> {
        self.expect_phase(Phase::InGame)?;
        self.turn = self.turn.opponent();
        self.board.reset_move_counts();
        tracing::debug!("Side {:?} to move", self.turn);
        Ok(self.turn)
    }

    /// End the game if the side to move just won. `landing` is where its
    /// piece now stands.
    fn check_victory(&mut self, landing: Pos) {
        let mover = self.turn;
        let winner = if self.royal_count(mover.opponent()) == 0 {
            Some(mover)
        } else if self.royal_count(mover) == 0 {
            Some(mover.opponent())
        } else {
            self.board
                .castle_at(landing)
                .filter(|castle| castle.side != mover)
                .map(|_| mover)
        };

        if let Some(side) = winner {
            self.phase = Phase::Over(side);
            tracing::info!("Side {:?} wins", side);
        }
    }

    // ========================================================================
    // REPLAY
    // ========================================================================

    pub fn apply(&mut self, action: Action) -> Result<Event, GameError> {
        match action {
            Action::PaintTerrain { id, tier } => {
                self.paint_terrain(id, tier)?;
                Ok(Event::TerrainPainted { id, tier })
            }
            Action::FinishTerrain => {
                self.finish_terrain()?;
                Ok(Event::Deployed { side: Side::A })
            }
            Action::FreeMove { side, from, to } => {
                self.free_move(side, from, to)?;
                Ok(Event::Relocated { side, from, to })
            }
            Action::FinishDeployment => match self.finish_deployment()? {
                Phase::Deploy(side) => Ok(Event::Deployed { side }),
                _ => Ok(Event::PlayStarted { turn: self.turn }),
            },
            Action::Move { from, to } => {
                self.ruled_move(from, to)?;
                Ok(Event::Moved { from, to, winner: self.winner() })
            }
            Action::Attack { from, target } => {
                let captured = self.attack(from, target)?;
                Ok(Event::Captured {
                    from,
                    target,
                    kind: captured.kind,
                    winner: self.winner(),
                })
            }
            Action::EndTurn => {
                let turn = self.end_turn()?;
                Ok(Event::TurnPassed { turn })
            }
        }
    }
}

// ============================================================================
// TESTS
// ============================================================================
