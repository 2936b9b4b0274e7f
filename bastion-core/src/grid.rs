//! Square grid geometry and the terrain store

use serde::{Deserialize, Serialize};
use std::fmt;

/// Flattened row-major cell index: `x + dimension * y`
pub type PosId = usize;

/// Grid coordinates. Signed so that raw rays may run off the board
/// before verification trims them.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Pos {
    pub x: i32,
    pub y: i32,
}

impl Pos {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Decode a position id
    pub fn from_id(id: PosId, dimension: usize) -> Self {
        let x = id % dimension;
        let y = (id - x) / dimension;
        Self::new(x as i32, y as i32)
    }

    /// Encode as a position id. Panics when the cell is off the grid.
    pub fn id(&self, dimension: usize) -> PosId {
        assert!(
            self.in_bounds(dimension),
            "cell ({}, {}) is outside a {}x{} grid",
            self.x,
            self.y,
            dimension,
            dimension
        );
        self.x as usize + dimension * self.y as usize
    }

    pub fn in_bounds(&self, dimension: usize) -> bool {
        let dim = dimension as i32;
        self.x >= 0 && self.y >= 0 && self.x < dim && self.y < dim
    }

    /// Offset by a (dx, dy) vector
    pub fn offset(&self, (dx, dy): (i32, i32)) -> Pos {
        Pos::new(self.x + dx, self.y + dy)
    }

    /// Step `distance` cells in a compass direction
    pub fn step(&self, direction: Direction, distance: i32) -> Pos {
        let (dx, dy) = direction.vector();
        Pos::new(self.x + dx * distance, self.y + dy * distance)
    }

    /// Chebyshev (king-move) distance
    pub fn chebyshev(&self, other: Pos) -> i32 {
        (self.x - other.x).abs().max((self.y - other.y).abs())
    }
}

impl fmt::Display for Pos {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// Compass directions, in ray order. North is towards y = 0.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    North,
    South,
    West,
    East,
    NorthWest,
    NorthEast,
    SouthWest,
    SouthEast,
}

impl Direction {
    pub const ALL: [Direction; 8] = [
        Direction::North,
        Direction::South,
        Direction::West,
        Direction::East,
        Direction::NorthWest,
        Direction::NorthEast,
        Direction::SouthWest,
        Direction::SouthEast,
    ];

    pub fn vector(self) -> (i32, i32) {
        match self {
            Direction::North => (0, -1),
            Direction::South => (0, 1),
            Direction::West => (-1, 0),
            Direction::East => (1, 0),
            Direction::NorthWest => (-1, -1),
            Direction::NorthEast => (1, -1),
            Direction::SouthWest => (-1, 1),
            Direction::SouthEast => (1, 1),
        }
    }

    pub fn is_diagonal(self) -> bool {
        let (dx, dy) = self.vector();
        dx != 0 && dy != 0
    }

    /// Index into a piece's ray table
    pub fn index(self) -> usize {
        self as usize
    }
}

/// Terrain tier of a cell
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum Terrain {
    /// Passable by every piece
    #[default]
    Open = 0,
    /// Halts footmen, blocks mounted pieces except at a castle green
    Rough = 1,
    /// Castle body
    Fortress = 2,
}

impl Terrain {
    pub fn tier(self) -> u8 {
        self as u8
    }

    pub fn from_tier(tier: u8) -> Option<Self> {
        match tier {
            0 => Some(Terrain::Open),
            1 => Some(Terrain::Rough),
            2 => Some(Terrain::Fortress),
            _ => None,
        }
    }

    pub fn is_open(self) -> bool {
        self == Terrain::Open
    }
}

/// Owning side
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Side {
    A = 0,
    B = 1,
}

impl Side {
    pub fn opponent(self) -> Self {
        match self {
            Side::A => Side::B,
            Side::B => Side::A,
        }
    }

    pub fn index(self) -> usize {
        self as usize
    }
}

/// dim x dim terrain tiers, row-major by position id
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TerrainGrid {
    dimension: usize,
    cells: Vec<Terrain>,
}

impl TerrainGrid {
    pub fn new(dimension: usize) -> Self {
        Self {
            dimension,
            cells: vec![Terrain::Open; dimension * dimension],
        }
    }

    pub fn dimension(&self) -> usize {
        self.dimension
    }

    pub fn in_bounds(&self, pos: Pos) -> bool {
        pos.in_bounds(self.dimension)
    }

    /// Terrain at `pos`. Panics off the grid.
    pub fn get(&self, pos: Pos) -> Terrain {
        self.cells[pos.id(self.dimension)]
    }

    pub fn set(&mut self, pos: Pos, terrain: Terrain) {
        let id = pos.id(self.dimension);
        self.cells[id] = terrain;
    }

    pub fn get_id(&self, id: PosId) -> Terrain {
        self.cells[id]
    }

    pub fn set_id(&mut self, id: PosId, terrain: Terrain) {
        self.cells[id] = terrain;
    }

    pub fn cells(&self) -> &[Terrain] {
        &self.cells
    }
}
