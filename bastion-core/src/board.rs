//! The board: terrain, castles and pieces, and every state transition on them
//!
//! Any call that changes occupancy or terrain during play ends with
//! [`Board::recompute_all`], so piece paths never go stale. Free moves made
//! during deployment are provisional and skip it.

use crate::castle::{Castle, Entrance};
use crate::error::{LayoutError, SetupError};
use crate::grid::{Pos, PosId, Side, Terrain, TerrainGrid};
use crate::paths::{self, Paths};
use crate::pieces::{Piece, PieceKind};
use rustc_hash::FxHashMap;
use std::fmt;

#[derive(Clone, Debug)]
pub struct Board {
    terrain: TerrainGrid,
    /// Position id -> piece (sparse)
    pieces: FxHashMap<PosId, Piece>,
    /// One slot per side
    castles: [Option<Castle>; 2],
}

impl Board {
    pub fn new(dimension: usize) -> Self {
        Self {
            terrain: TerrainGrid::new(dimension),
            pieces: FxHashMap::default(),
            castles: [None, None],
        }
    }

    // ========================================================================
    // GEOMETRY & TERRAIN
    // ========================================================================

    pub fn dimension(&self) -> usize {
        self.terrain.dimension()
    }

    pub fn in_bounds(&self, pos: Pos) -> bool {
        self.terrain.in_bounds(pos)
    }

    pub fn id_of(&self, pos: Pos) -> PosId {
        pos.id(self.dimension())
    }

    pub fn terrain(&self, pos: Pos) -> Terrain {
        self.terrain.get(pos)
    }

    /// Overwrite one cell. Callers keep castle cells intact.
    pub fn set_terrain(&mut self, pos: Pos, terrain: Terrain) {
        self.terrain.set(pos, terrain);
    }

    /// Replace the whole terrain grid, row-major by position id
    pub fn apply_terrain(&mut self, cells: &[Terrain]) -> Result<(), LayoutError> {
        let expected = self.dimension() * self.dimension();
        if cells.len() != expected {
            return Err(LayoutError::CellCount { found: cells.len(), expected });
        }
        for (id, &terrain) in cells.iter().enumerate() {
            self.terrain.set_id(id, terrain);
        }
        Ok(())
    }

    pub fn terrain_cells(&self) -> &[Terrain] {
        self.terrain.cells()
    }

    // ========================================================================
    // QUERIES
    // ========================================================================

    pub fn piece_at(&self, pos: Pos) -> Option<&Piece> {
        if !self.in_bounds(pos) {
            return None;
        }
        self.pieces.get(&self.id_of(pos))
    }

    pub fn pieces(&self) -> impl Iterator<Item = &Piece> + '_ {
        self.pieces.values()
    }

    pub fn pieces_of(&self, side: Side) -> impl Iterator<Item = &Piece> + '_ {
        self.pieces.values().filter(move |p| p.side == side)
    }

    pub fn piece_count(&self) -> usize {
        self.pieces.len()
    }

    pub fn castle_at(&self, pos: Pos) -> Option<&Castle> {
        self.castles().find(|c| c.pos == pos)
    }

    pub fn castle_of(&self, side: Side) -> Option<&Castle> {
        self.castles[side.index()].as_ref()
    }

    pub fn castles(&self) -> impl Iterator<Item = &Castle> + '_ {
        self.castles.iter().flatten()
    }

    pub fn is_castle(&self, pos: Pos) -> bool {
        self.castle_at(pos).is_some()
    }

    /// Reachable position ids of the piece at `pos`
    pub fn reach_of(&self, pos: Pos) -> Option<Vec<PosId>> {
        let dim = self.dimension();
        self.piece_at(pos).map(|p| p.paths.reachable_ids(dim))
    }

    /// Ranged target ids of the piece at `pos`
    pub fn targets_of(&self, pos: Pos) -> Option<Vec<PosId>> {
        let dim = self.dimension();
        self.piece_at(pos).map(|p| p.paths.ranged_ids(dim))
    }

    // ========================================================================
    // PLACEMENT
    // ========================================================================

    pub fn add_piece(&mut self, kind: PieceKind, side: Side, pos: Pos) -> Result<(), SetupError> {
        if !self.in_bounds(pos) {
            return Err(SetupError::OutOfBounds(pos));
        }
        let id = self.id_of(pos);
        if self.pieces.contains_key(&id) {
            return Err(SetupError::Occupied(pos));
        }

        self.pieces.insert(id, Piece::new(kind, side, pos));
        self.recompute_all();
        Ok(())
    }

    /// Place `side`'s castle, marking its body and green on the terrain
    pub fn add_castle(&mut self, side: Side, pos: Pos, entrance: Entrance) -> Result<(), SetupError> {
        if self.castles[side.index()].is_some() {
            return Err(SetupError::CastleExists(side));
        }
        let castle = Castle::new(side, pos, entrance);
        self.check_castle_site(&castle, pos)?;

        self.terrain.set(pos, Terrain::Fortress);
        self.terrain.set(castle.entrance_point(), Terrain::Rough);
        self.castles[side.index()] = Some(castle);
        self.recompute_all();
        Ok(())
    }

    /// Can `castle` stand at `pos`? Pieces on the target cells are not checked here.
    fn check_castle_site(&self, castle: &Castle, pos: Pos) -> Result<(), SetupError> {
        if !self.in_bounds(pos) {
            return Err(SetupError::OutOfBounds(pos));
        }
        let green = castle.green_for(pos);
        if !self.in_bounds(green) {
            return Err(SetupError::GreenOffBoard(green));
        }
        let overlaps = self
            .castles()
            .filter(|other| other.side != castle.side)
            .any(|other| other.covers(pos) || other.covers(green));
        if overlaps {
            return Err(SetupError::CastleOverlap(pos));
        }
        Ok(())
    }

    // ========================================================================
    // DEPLOYMENT MOVES
    // ========================================================================

    /// Unranked relocation used while deploying. Paths are not refreshed.
    pub fn free_move(&mut self, src: Pos, dest: Pos) -> bool {
        if src == dest || !self.in_bounds(dest) {
            return false;
        }
        if !self.terrain(dest).is_open() || self.piece_at(dest).is_some() {
            return false;
        }

        self.relocate(src, dest);
        true
    }

    /// Move `side`'s castle to `dest`, carrying its green along
    pub fn free_move_castle(&mut self, side: Side, dest: Pos) -> bool {
        let mut castle = *self
            .castle_of(side)
            .unwrap_or_else(|| panic!("side {:?} has no castle", side));

        if dest == castle.pos || castle.is_green(dest) {
            return false;
        }
        if self.check_castle_site(&castle, dest).is_err() {
            return false;
        }
        let green = castle.green_for(dest);
        if self.piece_at(dest).is_some() || self.piece_at(green).is_some() {
            return false;
        }
        // Cells the castle already covers are cleared on the way out
        let blocked = |p: Pos| !castle.covers(p) && !self.terrain(p).is_open();
        if blocked(dest) || blocked(green) {
            return false;
        }

        let old_green = castle.entrance_point();
        self.terrain.set(castle.pos, Terrain::Open);
        self.terrain.set(old_green, Terrain::Open);
        self.terrain.set(dest, Terrain::Fortress);
        self.terrain.set(green, Terrain::Rough);

        tracing::debug!("castle {:?} moved {} -> {}", side, castle.pos, dest);
        castle.pos = dest;
        self.castles[side.index()] = Some(castle);
        self.recompute_all();
        true
    }

    // ========================================================================
    // PLAY
    // ========================================================================

    /// Rule-checked relocation onto an empty reachable cell
    pub fn ruled_move(&mut self, src: Pos, dest: Pos) -> bool {
        if src == dest {
            return false;
        }
        let piece = self.piece_at(src).expect("No piece at move source");
        if !piece.can_reach(dest) || self.piece_at(dest).is_some() {
            return false;
        }

        self.relocate(src, dest);
        self.recompute_all();
        self.bump_move_count(dest);
        true
    }

    /// Capture the piece at `target`. Melee attackers take its cell, ranged
    /// attackers stay put. Returns the captured piece, or None if the attack
    /// is not legal.
    pub fn attack(&mut self, attacker: Pos, target: Pos) -> Option<Piece> {
        let piece = self.piece_at(attacker).expect("No piece at attacker position");
        let side = piece.side;
        let ranged = piece.is_ranged();

        match self.piece_at(target) {
            Some(victim) if victim.side != side => {}
            _ => return None,
        }
        if !piece.can_attack(target) {
            return None;
        }

        let target_id = self.id_of(target);
        let captured = self.pieces.remove(&target_id)?;
        let landing = if ranged {
            attacker
        } else {
            self.relocate(attacker, target);
            target
        };

        tracing::debug!(
            "{:?} {} at {} captured {} at {}",
            side,
            self.piece_at(landing).map_or("?", |p| p.spec().name),
            attacker,
            captured.spec().name,
            target
        );

        self.recompute_all();
        self.bump_move_count(landing);
        Some(captured)
    }

    /// Re-derive every piece's paths from the current terrain and occupancy
    pub fn recompute_all(&mut self) {
        tracing::debug!("recomputing paths for {} pieces", self.pieces.len());
        let updates: Vec<(PosId, Paths)> = self
            .pieces
            .iter()
            .map(|(&id, piece)| (id, paths::derive(self, piece)))
            .collect();

        for (id, paths) in updates {
            if let Some(piece) = self.pieces.get_mut(&id) {
                piece.paths = paths;
            }
        }
    }

    pub fn reset_move_counts(&mut self) {
        for piece in self.pieces.values_mut() {
            piece.move_count = 0;
        }
    }

    fn relocate(&mut self, src: Pos, dest: Pos) {
        let src_id = self.id_of(src);
        let dest_id = self.id_of(dest);
        let mut piece = self.pieces.remove(&src_id).expect("No piece at from position");
        piece.pos = dest;
        self.pieces.insert(dest_id, piece);
    }

    fn bump_move_count(&mut self, pos: Pos) {
        let id = self.id_of(pos);
        if let Some(piece) = self.pieces.get_mut(&id) {
            piece.move_count += 1;
        }
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let dim = self.dimension() as i32;
        for y in 0..dim {
            for x in 0..dim {
                let pos = Pos::new(x, y);
                let glyph = match self.piece_at(pos) {
                    Some(piece) => piece.glyph(),
                    None => match self.terrain(pos) {
                        Terrain::Open => '.',
                        Terrain::Rough => ':',
                        Terrain::Fortress => '#',
                    },
                };
                if x > 0 {
                    write!(f, " ")?;
                }
                write!(f, "{}", glyph)?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_consistent(board: &Board) {
        for piece in board.pieces() {
            assert_eq!(board.piece_at(piece.pos).map(|p| p.pos), Some(piece.pos));
        }
        for castle in board.castles() {
            assert_eq!(board.terrain(castle.pos), Terrain::Fortress);
            assert_eq!(board.terrain(castle.entrance_point()), Terrain::Rough);
        }
    }

    #[test]
    fn test_add_piece_rejects_occupied() {
        let mut board = Board::new(8);
        board.add_piece(PieceKind::King, Side::A, Pos::new(1, 1)).unwrap();
        assert_eq!(
            board.add_piece(PieceKind::Knight, Side::B, Pos::new(1, 1)),
            Err(SetupError::Occupied(Pos::new(1, 1)))
        );
        assert_eq!(
            board.add_piece(PieceKind::Knight, Side::B, Pos::new(8, 1)),
            Err(SetupError::OutOfBounds(Pos::new(8, 1)))
        );
        assert_eq!(board.piece_count(), 1);
    }

    #[test]
    fn test_add_castle_marks_terrain() {
        let mut board = Board::new(8);
        board.add_castle(Side::A, Pos::new(2, 2), Entrance::East).unwrap();
        assert_eq!(board.terrain(Pos::new(2, 2)), Terrain::Fortress);
        assert_eq!(board.terrain(Pos::new(3, 2)), Terrain::Rough);
        assert!(board.is_castle(Pos::new(2, 2)));
        assert!(!board.is_castle(Pos::new(3, 2)));
        assert_eq!(
            board.add_castle(Side::A, Pos::new(5, 5), Entrance::East),
            Err(SetupError::CastleExists(Side::A))
        );
        assert_eq!(
            board.add_castle(Side::B, Pos::new(0, 5), Entrance::West),
            Err(SetupError::GreenOffBoard(Pos::new(-1, 5)))
        );
        assert_eq!(
            board.add_castle(Side::B, Pos::new(4, 2), Entrance::West),
            Err(SetupError::CastleOverlap(Pos::new(4, 2)))
        );
        assert!(board.castle_of(Side::B).is_none());
        assert_consistent(&board);
    }

    #[test]
    fn test_free_move() {
        let mut board = Board::new(8);
        board.set_terrain(Pos::new(4, 4), Terrain::Rough);
        board.add_piece(PieceKind::Knight, Side::A, Pos::new(1, 1)).unwrap();
        board.add_piece(PieceKind::Knight, Side::A, Pos::new(2, 2)).unwrap();

        assert!(!board.free_move(Pos::new(1, 1), Pos::new(1, 1)));
        assert!(!board.free_move(Pos::new(1, 1), Pos::new(4, 4)));
        assert!(!board.free_move(Pos::new(1, 1), Pos::new(2, 2)));
        assert!(board.free_move(Pos::new(1, 1), Pos::new(6, 0)));

        assert!(board.piece_at(Pos::new(1, 1)).is_none());
        assert_eq!(board.piece_at(Pos::new(6, 0)).unwrap().pos, Pos::new(6, 0));
        // Provisional: paths still describe the old square
        assert!(board.piece_at(Pos::new(6, 0)).unwrap().can_reach(Pos::new(1, 0)));
        assert_consistent(&board);
    }

    #[test]
    fn test_free_move_castle() {
        let mut board = Board::new(8);
        board.add_castle(Side::A, Pos::new(3, 3), Entrance::West).unwrap();

        // Own green
        assert!(!board.free_move_castle(Side::A, Pos::new(2, 3)));
        // Green would land at x = -1
        assert!(!board.free_move_castle(Side::A, Pos::new(0, 5)));
        assert_eq!(board.terrain(Pos::new(3, 3)), Terrain::Fortress);
        assert_eq!(board.terrain(Pos::new(2, 3)), Terrain::Rough);
        assert_eq!(board.terrain(Pos::new(0, 5)), Terrain::Open);

        assert!(board.free_move_castle(Side::A, Pos::new(6, 6)));
        assert_eq!(board.terrain(Pos::new(3, 3)), Terrain::Open);
        assert_eq!(board.terrain(Pos::new(2, 3)), Terrain::Open);
        assert_eq!(board.terrain(Pos::new(6, 6)), Terrain::Fortress);
        assert_eq!(board.terrain(Pos::new(5, 6)), Terrain::Rough);
        assert_eq!(board.castle_of(Side::A).unwrap().pos, Pos::new(6, 6));
        assert_consistent(&board);
    }

    #[test]
    fn test_free_move_castle_onto_old_body() {
        let mut board = Board::new(8);
        board.add_castle(Side::B, Pos::new(3, 3), Entrance::North).unwrap();
        // New green lands where the body stood
        assert!(board.free_move_castle(Side::B, Pos::new(3, 4)));
        assert_eq!(board.terrain(Pos::new(3, 4)), Terrain::Fortress);
        assert_eq!(board.terrain(Pos::new(3, 3)), Terrain::Rough);
        assert_eq!(board.terrain(Pos::new(3, 2)), Terrain::Open);
        assert_consistent(&board);
    }

    #[test]
    fn test_free_move_castle_keeps_off_rough() {
        let mut board = Board::new(8);
        board.set_terrain(Pos::new(5, 5), Terrain::Rough);
        board.set_terrain(Pos::new(1, 6), Terrain::Rough);
        board.add_castle(Side::A, Pos::new(2, 2), Entrance::South).unwrap();
        let before = board.terrain_cells().to_vec();

        // Body onto rough, then green onto rough
        assert!(!board.free_move_castle(Side::A, Pos::new(5, 5)));
        assert!(!board.free_move_castle(Side::A, Pos::new(1, 5)));
        assert_eq!(board.terrain_cells(), before.as_slice());
        assert_eq!(board.castle_of(Side::A).unwrap().pos, Pos::new(2, 2));

        assert!(board.free_move_castle(Side::A, Pos::new(4, 4)));
        assert!(board.free_move_castle(Side::A, Pos::new(6, 1)));
        // The rough tiers survive the castle passing by
        assert_eq!(board.terrain(Pos::new(5, 5)), Terrain::Rough);
        assert_eq!(board.terrain(Pos::new(1, 6)), Terrain::Rough);
        assert_consistent(&board);
    }

    #[test]
    fn test_targets_of() {
        let mut board = Board::new(8);
        board.add_piece(PieceKind::Archer, Side::A, Pos::new(2, 2)).unwrap();
        board.add_piece(PieceKind::Knight, Side::B, Pos::new(2, 4)).unwrap();

        assert_eq!(board.targets_of(Pos::new(2, 2)), Some(vec![2 + 8 * 4]));
        assert_eq!(board.targets_of(Pos::new(2, 4)), Some(vec![]));
        assert_eq!(board.targets_of(Pos::new(0, 0)), None);
    }

    #[test]
    fn test_castle_green_entry_scenario() {
        let mut board = Board::new(8);
        board.add_castle(Side::A, Pos::new(3, 3), Entrance::East).unwrap();
        board.add_piece(PieceKind::Sergeant, Side::A, Pos::new(4, 3)).unwrap();

        assert!(board.ruled_move(Pos::new(4, 3), Pos::new(3, 3)));
        assert_eq!(board.reach_of(Pos::new(3, 3)), Some(vec![4 + 8 * 3]));

        assert!(board.ruled_move(Pos::new(3, 3), Pos::new(4, 3)));
        assert!(board.ruled_move(Pos::new(4, 3), Pos::new(5, 3)));
        assert!(!board.ruled_move(Pos::new(5, 3), Pos::new(3, 3)));
        assert_eq!(board.piece_at(Pos::new(5, 3)).unwrap().move_count, 3);
        assert_consistent(&board);
    }

    #[test]
    fn test_ruled_move_requires_reach() {
        let mut board = Board::new(8);
        board.add_piece(PieceKind::King, Side::A, Pos::new(0, 0)).unwrap();
        board.add_piece(PieceKind::Knight, Side::B, Pos::new(0, 1)).unwrap();

        assert!(!board.ruled_move(Pos::new(0, 0), Pos::new(0, 3)));
        // Occupied: that is an attack, not a move
        assert!(!board.ruled_move(Pos::new(0, 0), Pos::new(0, 1)));
        assert!(board.ruled_move(Pos::new(0, 0), Pos::new(2, 0)));
        assert_eq!(board.piece_at(Pos::new(2, 0)).unwrap().move_count, 1);
    }

    #[test]
    fn test_melee_attack() {
        let mut board = Board::new(8);
        board.add_piece(PieceKind::Knight, Side::A, Pos::new(0, 0)).unwrap();
        board.add_piece(PieceKind::Pikeman, Side::B, Pos::new(0, 5)).unwrap();

        let captured = board.attack(Pos::new(0, 0), Pos::new(0, 5)).unwrap();
        assert_eq!(captured.kind, PieceKind::Pikeman);
        assert!(board.piece_at(Pos::new(0, 0)).is_none());
        let knight = board.piece_at(Pos::new(0, 5)).unwrap();
        assert_eq!(knight.side, Side::A);
        assert_eq!(knight.move_count, 1);
        assert_eq!(board.piece_count(), 1);
    }

    #[test]
    fn test_ranged_attack_stays_put() {
        let mut board = Board::new(8);
        board.add_piece(PieceKind::Archer, Side::A, Pos::new(2, 2)).unwrap();
        board.add_piece(PieceKind::Duke, Side::B, Pos::new(5, 5)).unwrap();

        assert!(board.attack(Pos::new(2, 2), Pos::new(5, 5)).is_some());
        assert!(board.piece_at(Pos::new(5, 5)).is_none());
        let archer = board.piece_at(Pos::new(2, 2)).unwrap();
        assert_eq!(archer.move_count, 1);
        // The lane is free again
        assert!(archer.can_reach(Pos::new(5, 5)));
    }

    #[test]
    fn test_illegal_attacks() {
        let mut board = Board::new(8);
        board.add_piece(PieceKind::King, Side::A, Pos::new(0, 0)).unwrap();
        board.add_piece(PieceKind::Pikeman, Side::A, Pos::new(1, 0)).unwrap();
        board.add_piece(PieceKind::Pikeman, Side::B, Pos::new(5, 5)).unwrap();

        assert!(board.attack(Pos::new(0, 0), Pos::new(1, 0)).is_none());
        assert!(board.attack(Pos::new(0, 0), Pos::new(5, 5)).is_none());
        assert!(board.attack(Pos::new(0, 0), Pos::new(0, 1)).is_none());
        assert_eq!(board.piece_count(), 3);
    }

    #[test]
    fn test_capture_opens_distant_lane() {
        let mut board = Board::new(8);
        board.add_piece(PieceKind::Knight, Side::A, Pos::new(0, 7)).unwrap();
        board.add_piece(PieceKind::Pikeman, Side::B, Pos::new(3, 7)).unwrap();
        board.add_piece(PieceKind::Archer, Side::A, Pos::new(3, 4)).unwrap();

        assert!(!board.piece_at(Pos::new(0, 7)).unwrap().can_reach(Pos::new(5, 7)));
        board.attack(Pos::new(3, 4), Pos::new(3, 7)).unwrap();
        assert!(board.piece_at(Pos::new(0, 7)).unwrap().can_reach(Pos::new(5, 7)));
    }

    #[test]
    #[should_panic]
    fn test_move_from_empty_cell_panics() {
        let mut board = Board::new(8);
        board.ruled_move(Pos::new(0, 0), Pos::new(1, 1));
    }

    #[test]
    fn test_display() {
        let mut board = Board::new(3);
        board.add_castle(Side::A, Pos::new(0, 0), Entrance::South).unwrap();
        board.add_piece(PieceKind::King, Side::A, Pos::new(2, 0)).unwrap();
        board.add_piece(PieceKind::Knight, Side::B, Pos::new(1, 2)).unwrap();
        assert_eq!(board.to_string(), "# . K\n: . .\n. n .\n");
    }
}
