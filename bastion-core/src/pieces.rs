//! Piece archetypes and their raw ray templates

use crate::grid::{Direction, Pos, Side};
use crate::paths::Paths;
use serde::{Deserialize, Serialize};

/// Number of rays in every template
pub const RAY_COUNT: usize = 8;

/// Fixed depth of the pike and line infantry long rays
const INFANTRY_REACH: u8 = 12;

/// Threshold compared against terrain tier when walking a ray
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Durability {
    Mounted = 0,
    Footman = 1,
}

impl Durability {
    pub fn tier(self) -> u8 {
        self as u8
    }
}

/// How far a ray extends
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Extent {
    Steps(u8),
    /// As many cells as the board is wide
    Board,
}

impl Extent {
    fn cells(self, dimension: usize) -> i32 {
        match self {
            Extent::Steps(n) => n as i32,
            Extent::Board => dimension as i32,
        }
    }
}

/// Movement geometry
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Reach {
    /// Straight rays in all eight compass directions
    Rays { orthogonal: Extent, diagonal: Extent },
    /// Eight two-segment "L" rays, only the last cell is a landing cell
    Leap,
}

/// Leap rays as offsets from the piece, nearest first
pub const LEAPS: [[(i32, i32); 3]; RAY_COUNT] = [
    [(0, -1), (0, -2), (-1, -2)], // north, then west
    [(0, -1), (0, -2), (1, -2)],  // north, then east
    [(0, 1), (0, 2), (-1, 2)],    // south, then west
    [(0, 1), (0, 2), (1, 2)],     // south, then east
    [(-1, 0), (-2, 0), (-2, -1)], // west, then north
    [(-1, 0), (-2, 0), (-2, 1)],  // west, then south
    [(1, 0), (2, 0), (2, -1)],    // east, then north
    [(1, 0), (2, 0), (2, 1)],     // east, then south
];

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PieceKind {
    King,
    Duke,
    Prince,
    Knight,
    Archer,
    Pikeman,
    Sergeant,
    Squire,
}

/// Immutable per-kind attributes
#[derive(Clone, Debug)]
pub struct PieceSpec {
    pub kind: PieceKind,
    pub name: &'static str,
    pub letter: char,
    pub durability: Durability,
    pub ranged: bool,
    pub royal: bool,
    pub siegeable: bool,
    pub reach: Reach,
}

impl PieceSpec {
    #[allow(clippy::too_many_arguments)]
    const fn new(
        kind: PieceKind,
        name: &'static str,
        letter: char,
        durability: Durability,
        ranged: bool,
        royal: bool,
        siegeable: bool,
        reach: Reach,
    ) -> Self {
        Self {
            kind,
            name,
            letter,
            durability,
            ranged,
            royal,
            siegeable,
            reach,
        }
    }
}

const fn rays(orthogonal: Extent, diagonal: Extent) -> Reach {
    Reach::Rays { orthogonal, diagonal }
}

const ALL_BOARD: Reach = rays(Extent::Board, Extent::Board);

pub static PIECE_SPECS: [PieceSpec; 8] = [
    PieceSpec::new(PieceKind::King, "King", 'K', Durability::Footman, false, true, true, rays(Extent::Steps(2), Extent::Steps(2))),
    PieceSpec::new(PieceKind::Duke, "Duke", 'D', Durability::Mounted, false, true, true, ALL_BOARD),
    PieceSpec::new(PieceKind::Prince, "Prince", 'P', Durability::Mounted, false, true, true, ALL_BOARD),
    PieceSpec::new(PieceKind::Knight, "Knight", 'N', Durability::Mounted, false, false, true, ALL_BOARD),
    PieceSpec::new(PieceKind::Archer, "Archer", 'A', Durability::Footman, true, false, false, rays(Extent::Steps(3), Extent::Steps(3))),
    PieceSpec::new(PieceKind::Pikeman, "Pikeman", 'M', Durability::Footman, false, false, true, rays(Extent::Steps(INFANTRY_REACH), Extent::Steps(1))),
    PieceSpec::new(PieceKind::Sergeant, "Sergeant", 'S', Durability::Footman, false, false, true, rays(Extent::Steps(1), Extent::Steps(INFANTRY_REACH))),
    PieceSpec::new(PieceKind::Squire, "Squire", 'Q', Durability::Footman, false, false, false, Reach::Leap),
];

impl PieceKind {
    pub const ALL: [PieceKind; 8] = [
        PieceKind::King,
        PieceKind::Duke,
        PieceKind::Prince,
        PieceKind::Knight,
        PieceKind::Archer,
        PieceKind::Pikeman,
        PieceKind::Sergeant,
        PieceKind::Squire,
    ];

    pub fn spec(self) -> &'static PieceSpec {
        &PIECE_SPECS[self as usize]
    }

    pub fn from_letter(letter: char) -> Option<Self> {
        let upper = letter.to_ascii_uppercase();
        PIECE_SPECS.iter().find(|s| s.letter == upper).map(|s| s.kind)
    }

    /// Unverified rays from `from`, nearest cell first. Cells may lie off the board.
    pub fn sketch(self, from: Pos, dimension: usize) -> [Vec<Pos>; RAY_COUNT] {
        match self.spec().reach {
            Reach::Rays { orthogonal, diagonal } => Direction::ALL.map(|dir| {
                let extent = if dir.is_diagonal() { diagonal } else { orthogonal };
                (1..=extent.cells(dimension))
                    .map(|distance| from.step(dir, distance))
                    .collect()
            }),
            Reach::Leap => LEAPS.map(|ray| ray.iter().map(|&d| from.offset(d)).collect()),
        }
    }
}

/// A piece on the board
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Piece {
    pub kind: PieceKind,
    pub side: Side,
    pub pos: Pos,
    /// Actions taken this turn
    pub move_count: u32,
    pub paths: Paths,
}

impl Piece {
    pub fn new(kind: PieceKind, side: Side, pos: Pos) -> Self {
        Self {
            kind,
            side,
            pos,
            move_count: 0,
            paths: Paths::default(),
        }
    }

    pub fn spec(&self) -> &'static PieceSpec {
        self.kind.spec()
    }

    pub fn durability(&self) -> Durability {
        self.spec().durability
    }

    pub fn is_ranged(&self) -> bool {
        self.spec().ranged
    }

    pub fn is_royal(&self) -> bool {
        self.spec().royal
    }

    pub fn is_siegeable(&self) -> bool {
        self.spec().siegeable
    }

    pub fn can_reach(&self, pos: Pos) -> bool {
        self.paths.reaches(pos)
    }

    /// Melee pieces attack what they reach, ranged pieces only their targets
    pub fn can_attack(&self, pos: Pos) -> bool {
        if self.is_ranged() {
            self.paths.targets(pos)
        } else {
            self.can_reach(pos)
        }
    }

    /// Board letter, uppercase for side A and lowercase for side B
    pub fn glyph(&self) -> char {
        match self.side {
            Side::A => self.spec().letter,
            Side::B => self.spec().letter.to_ascii_lowercase(),
        }
    }
}
