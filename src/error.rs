use thiserror::Error;

use crate::location::Location;

/// Reasons a puzzle definition could not be loaded.
#[derive(Debug, Error)]
pub enum PuzzleError {
    /// The definition file could not be read.
    #[error("could not read puzzle definition: {0}")]
    Io(#[from] std::io::Error),
    /// The definition was read but is not a valid puzzle. `line` is 1-based.
    #[error("malformed puzzle definition on line {line}: {reason}")]
    Malformed {
        /// 1-based line number in the definition.
        line: usize,
        /// What was wrong with that line.
        reason: MalformedReason,
    },
}

/// What exactly was wrong with a malformed definition.
#[derive(Clone, Copy, Debug, Error, Eq, PartialEq)]
pub enum MalformedReason {
    /// The input holds no dimension line at all.
    #[error("missing dimension line")]
    MissingDimension,
    /// The dimension line is not a positive integer no larger than [`MAX_DIMENSION`](crate::MAX_DIMENSION).
    #[error("the dimension must be a positive integer no larger than {}", crate::MAX_DIMENSION)]
    BadDimension,
    /// A pearl line does not have exactly three comma-separated fields.
    #[error("expected `row,col,color`")]
    WrongArity,
    /// A pearl field is not an integer.
    #[error("field is not an integer")]
    NotAnInteger,
    /// The color field is neither 1 (white) nor 2 (black).
    #[error("unknown pearl color")]
    UnknownColor,
    /// The row or column lies outside `1..=N`.
    #[error("coordinate out of range")]
    OutOfRange,
    /// Another pearl was already placed at this coordinate.
    #[error("duplicate pearl")]
    Duplicate,
}

/// Reasons an edge mutation was rejected. A rejected mutation leaves the board untouched.
#[derive(Clone, Copy, Debug, Error, Eq, PartialEq)]
pub enum IllegalMove {
    /// The location is not on the board.
    #[error("{0} lies outside the board")]
    OutOfBounds(Location),
    /// The two cells do not share a side.
    #[error("{0} and {1} are not adjacent")]
    NotAdjacent(Location, Location),
}
