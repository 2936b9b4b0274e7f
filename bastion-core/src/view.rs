//! Serializable snapshots of board state for tools and front ends

use crate::board::Board;
use crate::castle::Entrance;
use crate::grid::{PosId, Side};
use crate::pieces::{Piece, PieceKind};
use serde::Serialize;

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct PieceView {
    pub id: PosId,
    pub x: i32,
    pub y: i32,
    pub side: Side,
    pub kind: PieceKind,
    pub letter: char,
    pub moved: bool,
}

impl PieceView {
    pub fn of(piece: &Piece, dimension: usize) -> Self {
        Self {
            id: piece.pos.id(dimension),
            x: piece.pos.x,
            y: piece.pos.y,
            side: piece.side,
            kind: piece.kind,
            letter: piece.glyph(),
            moved: piece.move_count > 0,
        }
    }
}

/// Where a piece may go and what it may shoot
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ReachView {
    pub piece: PieceView,
    pub reachable: Vec<PosId>,
    pub targets: Vec<PosId>,
}

impl ReachView {
    pub fn of(piece: &Piece, dimension: usize) -> Self {
        Self {
            piece: PieceView::of(piece, dimension),
            reachable: piece.paths.reachable_ids(dimension),
            targets: piece.paths.ranged_ids(dimension),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct CastleView {
    pub side: Side,
    pub id: PosId,
    pub entrance: Entrance,
    pub green: PosId,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct BoardView {
    pub dimension: usize,
    /// Terrain tiers by position id
    pub terrain: Vec<u8>,
    pub castles: Vec<CastleView>,
    /// Sorted by position id
    pub pieces: Vec<PieceView>,
}

impl BoardView {
    pub fn of(board: &Board) -> Self {
        let dim = board.dimension();
        let mut pieces: Vec<PieceView> = board.pieces().map(|p| PieceView::of(p, dim)).collect();
        pieces.sort_by_key(|p| p.id);

        Self {
            dimension: dim,
            terrain: board.terrain_cells().iter().map(|t| t.tier()).collect(),
            castles: board
                .castles()
                .map(|c| CastleView {
                    side: c.side,
                    id: c.pos.id(dim),
                    entrance: c.entrance,
                    green: c.entrance_point().id(dim),
                })
                .collect(),
            pieces,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::Pos;

    #[test]
    fn test_board_view() {
        let mut board = Board::new(4);
        board.add_castle(Side::B, Pos::new(3, 3), Entrance::West).unwrap();
        board.add_piece(PieceKind::Knight, Side::B, Pos::new(1, 0)).unwrap();
        board.add_piece(PieceKind::King, Side::A, Pos::new(0, 0)).unwrap();

        let view = BoardView::of(&board);
        assert_eq!(view.terrain[15], 2);
        assert_eq!(view.terrain[14], 1);
        assert_eq!(view.castles[0].green, 14);
        let ids: Vec<PosId> = view.pieces.iter().map(|p| p.id).collect();
        assert_eq!(ids, vec![0, 1]);
        assert_eq!(view.pieces[1].letter, 'n');

        let json = serde_json::to_value(&view).unwrap();
        assert_eq!(json["pieces"][0]["kind"], "King");
    }

    #[test]
    fn test_reach_view() {
        let mut board = Board::new(4);
        board.add_piece(PieceKind::Archer, Side::A, Pos::new(0, 0)).unwrap();
        board.add_piece(PieceKind::Knight, Side::B, Pos::new(2, 0)).unwrap();

        let view = ReachView::of(board.piece_at(Pos::new(0, 0)).unwrap(), 4);
        assert_eq!(view.targets, vec![2]);
        assert!(view.reachable.contains(&1));
        assert!(!view.reachable.contains(&2));
    }
}
