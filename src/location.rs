use std::fmt::{Display, Formatter};
use std::num::NonZero;

use ndarray::Ix;
use unordered_pair::UnorderedPair;

pub(crate) type Coord = usize;
/// Side length of a (square) board.
pub type Dimension = NonZero<Coord>;

/// An undirected edge between two cells. Built through [`line`], so `.0 <= .1`.
pub type Line = UnorderedPair<Location>;

#[derive(Clone, Eq, Hash, Copy, PartialEq, Ord, PartialOrd, Debug)]
/// A location `(row, col)` on a board. The top left corner is `Location(0, 0)`.
///
/// Displayed 1-based, matching puzzle definition files.
pub struct Location(
    /// Row, from the top.
    pub Coord,
    /// Column, from the left.
    pub Coord,
);

impl Location {
    /// Convert from the 1-based coordinates used in puzzle files, if both are nonzero.
    pub fn from_one_based(row: Coord, col: Coord) -> Option<Self> {
        Some(Self(row.checked_sub(1)?, col.checked_sub(1)?))
    }

    pub(crate) fn as_index(&self) -> (Coord, Coord) {
        (self.0, self.1)
    }

    // wraps on underflow; the wrapped location is out of bounds on every board
    pub(crate) fn offset_by(self, rhs: (isize, isize)) -> Self {
        Self(self.0.wrapping_add_signed(rhs.0), self.1.wrapping_add_signed(rhs.1))
    }

    pub(crate) fn distance(&self, other: Location) -> Coord {
        self.0.abs_diff(other.0) + self.1.abs_diff(other.1)
    }
}

impl From<(Ix, Ix)> for Location {
    fn from(value: (Ix, Ix)) -> Self {
        Self(value.0, value.1)
    }
}

impl Display for Location {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.0 + 1, self.1 + 1)
    }
}

/// Normalized [`Line`] between `a` and `b`.
pub fn line(a: Location, b: Location) -> Line {
    if a <= b {
        UnorderedPair(a, b)
    } else {
        UnorderedPair(b, a)
    }
}
