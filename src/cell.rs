use itertools::Itertools;
use strum::FromRepr;

use crate::location::Location;
use crate::shape::Direction;

/// Pearl colors, numbered as in puzzle definition files.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, FromRepr)]
#[repr(u8)]
pub enum Pearl {
    /// The loop goes straight through and turns in at least one of the two neighboring cells.
    White = 1,
    /// The loop turns here and goes straight through both cells on each side of the turn.
    Black = 2,
}

/// A single grid cell and the drawn edges incident to it.
///
/// Neighbors are kept as [`Location`]s into the owning [`Board`](crate::Board), never as references.
/// The degree of a node is the length of its neighbor list.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Node {
    pub(crate) location: Location,
    pub(crate) pearl: Option<Pearl>,
    neighbors: Vec<Location>,
}

impl Node {
    pub(crate) fn new(location: Location, pearl: Option<Pearl>) -> Self {
        Self {
            location,
            pearl,
            neighbors: Vec::with_capacity(2),
        }
    }

    /// Where this cell sits on its board.
    pub fn location(&self) -> Location {
        self.location
    }

    /// The pearl on this cell, if any.
    pub fn pearl(&self) -> Option<Pearl> {
        self.pearl
    }

    /// Number of drawn edges at this cell.
    pub fn degree(&self) -> usize {
        self.neighbors.len()
    }

    /// Cells joined to this one by a drawn edge, in the order the edges were drawn.
    pub fn neighbors(&self) -> &[Location] {
        &self.neighbors
    }

    /// A drawn edge joins this cell to `other`.
    pub fn is_adjacent_to(&self, other: Location) -> bool {
        self.neighbors.contains(&other)
    }

    /// A cell carries at most two drawn edges.
    pub fn has_capacity(&self) -> bool {
        self.degree() < 2
    }

    /// Directions in which a drawn edge leaves this cell.
    pub fn exits(&self) -> Vec<Direction> {
        self.neighbors.iter()
            .filter_map(|n| Direction::direction_to(self.location, *n))
            .collect_vec()
    }

    // the board is responsible for calling this on both endpoints
    pub(crate) fn add_adjacent(&mut self, other: Location) -> bool {
        if self.is_adjacent_to(other) {
            return false;
        }

        self.neighbors.push(other);
        true
    }

    pub(crate) fn remove_adjacent(&mut self, other: Location) -> bool {
        match self.neighbors.iter().position(|n| *n == other) {
            Some(index) => {
                // order-preserving, so add then remove restores the exact list
                self.neighbors.remove(index);
                true
            }
            None => false,
        }
    }

    pub(crate) fn clear(&mut self) {
        self.neighbors.clear();
    }

    pub(crate) fn glyph(&self) -> char {
        match self.pearl {
            Some(Pearl::White) => 'W',
            Some(Pearl::Black) => 'B',
            None => match self.exits()[..] {
                [] => '.',
                [a, b] if a == b.invert() => if a.is_vertical() { '|' } else { '-' },
                [a, b] if a.is_perpendicular_to(b) => '+',
                _ => '#',
            }
        }
    }
}
