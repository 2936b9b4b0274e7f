//! Castles and their entrance ("green") cell

use crate::grid::{Direction, Pos, Side};
use serde::{Deserialize, Serialize};

/// The side of a castle its single entrance opens onto
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Entrance {
    West,
    North,
    East,
    South,
}

impl Entrance {
    pub fn direction(self) -> Direction {
        match self {
            Entrance::West => Direction::West,
            Entrance::North => Direction::North,
            Entrance::East => Direction::East,
            Entrance::South => Direction::South,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Castle {
    pub side: Side,
    pub pos: Pos,
    pub entrance: Entrance,
}

impl Castle {
    pub fn new(side: Side, pos: Pos, entrance: Entrance) -> Self {
        Self { side, pos, entrance }
    }

    /// The green cell, which may lie off the grid for an unplaced castle
    pub fn entrance_point(&self) -> Pos {
        self.green_for(self.pos)
    }

    /// Where the green would sit if the castle stood at `pos`
    pub fn green_for(&self, pos: Pos) -> Pos {
        pos.step(self.entrance.direction(), 1)
    }

    pub fn is_green(&self, pos: Pos) -> bool {
        self.entrance_point() == pos
    }

    /// True if `pos` is the body or the green of this castle
    pub fn covers(&self, pos: Pos) -> bool {
        self.pos == pos || self.is_green(pos)
    }
}
