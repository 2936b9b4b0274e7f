//! Path derivation: truncating raw ray templates against the board
//!
//! Every piece keeps the cells it can still reach along each ray, plus (for
//! ranged pieces) the enemy cells it can shoot at without moving. Both sets
//! are rebuilt from scratch by [`derive`] whenever the board changes.

use crate::board::Board;
use crate::castle::Castle;
use crate::grid::{Pos, PosId};
use crate::pieces::{Piece, Reach};
use serde::{Deserialize, Serialize};

/// Verified reachable rays and ranged targets of one piece
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Paths {
    rays: Vec<Vec<Pos>>,
    ranged: Vec<Pos>,
}

impl Paths {
    /// Reachable cells per ray, nearest first
    pub fn rays(&self) -> &[Vec<Pos>] {
        &self.rays
    }

    pub fn reachable(&self) -> impl Iterator<Item = Pos> + '_ {
        self.rays.iter().flatten().copied()
    }

    pub fn reachable_ids(&self, dimension: usize) -> Vec<PosId> {
        self.reachable().map(|p| p.id(dimension)).collect()
    }

    pub fn ranged_targets(&self) -> &[Pos] {
        &self.ranged
    }

    pub fn ranged_ids(&self, dimension: usize) -> Vec<PosId> {
        self.ranged.iter().map(|p| p.id(dimension)).collect()
    }

    pub fn reaches(&self, pos: Pos) -> bool {
        self.reachable().any(|p| p == pos)
    }

    pub fn targets(&self, pos: Pos) -> bool {
        self.ranged.contains(&pos)
    }
}

/// Rebuild `piece`'s paths against the current terrain and occupancy
pub(crate) fn derive(board: &Board, piece: &Piece) -> Paths {
    if let Some(castle) = board.castle_at(piece.pos) {
        return siege(board, piece, castle);
    }

    let raw = piece.kind.sketch(piece.pos, board.dimension());
    match piece.spec().reach {
        Reach::Rays { .. } => verify_rays(board, piece, &raw),
        Reach::Leap => verify_leaps(board, piece, &raw),
    }
}

/// Shared truncation pass for straight rays
fn verify_rays(board: &Board, piece: &Piece, raw: &[Vec<Pos>]) -> Paths {
    let durability = piece.durability().tier();
    let mut paths = Paths::default();

    for ray in raw {
        let mut kept = Vec::new();

        for &cell in ray {
            if !board.in_bounds(cell) {
                break;
            }

            let terrain = board.terrain(cell).tier();
            if terrain > durability {
                if enters_castle(board, piece, cell) {
                    admit(board, piece, cell, &mut kept, &mut paths.ranged);
                }
                break;
            }

            // Footmen halt on rough ground
            if terrain == durability && durability != 0 {
                admit(board, piece, cell, &mut kept, &mut paths.ranged);
                break;
            }

            if board.piece_at(cell).is_some() {
                admit(board, piece, cell, &mut kept, &mut paths.ranged);
                break;
            }

            kept.push(cell);
        }

        paths.rays.push(kept);
    }

    paths
}

/// Leap rays: intermediate cells must be clear, only the last cell is kept
fn verify_leaps(board: &Board, piece: &Piece, raw: &[Vec<Pos>]) -> Paths {
    let durability = piece.durability().tier();
    let mut paths = Paths::default();

    for ray in raw {
        let mut kept = Vec::new();
        let last = ray.len().saturating_sub(1);

        for (i, &cell) in ray.iter().enumerate() {
            // An off-board cell anywhere drops the rest of the ray
            if !board.in_bounds(cell) {
                break;
            }
            let landing = i == last;

            if board.terrain(cell).tier() >= durability {
                if landing && storms_castle(board, piece, cell) {
                    admit(board, piece, cell, &mut kept, &mut paths.ranged);
                }
                break;
            }

            if board.piece_at(cell).is_some() {
                if landing {
                    admit(board, piece, cell, &mut kept, &mut paths.ranged);
                }
                break;
            }

            if landing {
                kept.push(cell);
            }
        }

        paths.rays.push(kept);
    }

    paths
}

/// A piece inside a castle can only threaten out through the entrance
fn siege(board: &Board, piece: &Piece, castle: &Castle) -> Paths {
    let mut paths = Paths::default();
    let mut kept = Vec::new();
    let entrance = castle.entrance_point();

    // The entrance is sorted by occupancy, so reach and ranged targets stay disjoint
    if board.in_bounds(entrance) {
        admit(board, piece, entrance, &mut kept, &mut paths.ranged);
    }

    paths.rays.push(kept);
    paths
}

/// Record a terminal cell according to who stands on it
fn admit(board: &Board, piece: &Piece, cell: Pos, kept: &mut Vec<Pos>, ranged: &mut Vec<Pos>) {
    match board.piece_at(cell) {
        None => kept.push(cell),
        Some(occupant) if occupant.side != piece.side => {
            if piece.is_ranged() {
                ranged.push(cell);
            } else {
                kept.push(cell);
            }
        }
        Some(_) => {}
    }
}

/// May `piece` step onto `cell`, whose terrain is harder than it can cross?
fn enters_castle(board: &Board, piece: &Piece, cell: Pos) -> bool {
    match board.castle_at(cell) {
        Some(castle) => {
            castle.is_green(piece.pos) && (piece.is_siegeable() || castle.side != piece.side)
        }
        None => board.castles().any(|c| c.is_green(cell)),
    }
}

/// Leaps waive the terrain limit around the opposing castle's green
fn storms_castle(board: &Board, piece: &Piece, cell: Pos) -> bool {
    board
        .castle_of(piece.side.opponent())
        .is_some_and(|c| c.is_green(piece.pos) || c.is_green(cell))
}
