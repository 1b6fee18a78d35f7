//! Directions of travel between grid-adjacent cells.

use strum::VariantArray;

use crate::location::Location;

/// The four ways a line may leave a square cell.
#[derive(Copy, Clone, VariantArray, Eq, PartialEq, Hash, Debug, Ord, PartialOrd)]
pub enum Direction {
    /// Toward row 0.
    Up,
    /// Toward the last row.
    Down,
    /// Toward column 0.
    Left,
    /// Toward the last column.
    Right,
}

impl Direction {
    /// Forward directions are those which, stepping from one location to another, lead to a location indexed higher in row-major order.
    ///
    /// Every edge of the grid is reached exactly once by stepping forward from each cell.
    pub const FORWARD_VARIANTS: &'static [Self] = &[Self::Right, Self::Down];

    /// Order in which the free-cell search tries neighbors.
    pub(crate) const SEARCH_ORDER: [Self; 4] = [Self::Up, Self::Left, Self::Right, Self::Down];

    /// Attempt the step from `location` in the direction specified by `self` and return the resultant [`Location`].
    ///
    /// Stepping off the top or left edge wraps around to a location no board contains.
    pub fn attempt_from(&self, location: Location) -> Location {
        match self {
            Self::Up => location.offset_by((-1, 0)),
            Self::Down => location.offset_by((1, 0)),
            Self::Left => location.offset_by((0, -1)),
            Self::Right => location.offset_by((0, 1)),
        }
    }

    /// Invert the direction specified by `self`.
    pub fn invert(&self) -> Self {
        match self {
            Self::Up => Self::Down,
            Self::Down => Self::Up,
            Self::Left => Self::Right,
            Self::Right => Self::Left,
        }
    }

    /// Up or down.
    pub fn is_vertical(&self) -> bool {
        matches!(self, Self::Up | Self::Down)
    }

    /// One of `self` and `other` is vertical and the other horizontal.
    pub fn is_perpendicular_to(&self, other: Self) -> bool {
        self.is_vertical() != other.is_vertical()
    }

    /// The two directions at a right angle to `self`.
    pub fn perpendiculars(&self) -> [Self; 2] {
        if self.is_vertical() {
            [Self::Left, Self::Right]
        } else {
            [Self::Up, Self::Down]
        }
    }

    /// Determine the direction from `a` to `b` by calling [`attempt_from`](Self::attempt_from) until one works.
    ///
    /// Returns [`None`] unless `a` and `b` are grid-adjacent.
    pub fn direction_to(a: Location, b: Location) -> Option<Self> {
        Self::VARIANTS.iter().copied().find(|dir| dir.attempt_from(a) == b)
    }
}
