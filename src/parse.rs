use std::fs;
use std::num::NonZero;
use std::path::Path;
use std::str::FromStr;

use itertools::Itertools;
use log::debug;

use crate::board::Board;
use crate::builder::{BoardBuilder, BuilderInvalidReason};
use crate::cell::Pearl;
use crate::error::{MalformedReason, PuzzleError};
use crate::location::Location;

/// Largest side length a definition may declare. Bigger boards are rejected before anything is allocated.
pub const MAX_DIMENSION: usize = 1024;

fn malformed(line: usize, reason: MalformedReason) -> PuzzleError {
    PuzzleError::Malformed { line, reason }
}

fn parse_pearl(text: &str) -> Result<(usize, usize, Pearl), MalformedReason> {
    let Some((row, col, color)) = text.split(',').map(str::trim).collect_tuple() else {
        return Err(MalformedReason::WrongArity);
    };

    let [row, col] = [row, col].map(|field| field.parse::<usize>());
    let (row, col) = (row.map_err(|_| MalformedReason::NotAnInteger)?, col.map_err(|_| MalformedReason::NotAnInteger)?);
    let color = color.parse::<u8>().map_err(|_| MalformedReason::NotAnInteger)?;
    let pearl = Pearl::from_repr(color).ok_or(MalformedReason::UnknownColor)?;

    Ok((row, col, pearl))
}

/// Parses the puzzle definition format: a line holding the side length `N`,
/// then one `row,col,color` line per pearl with 1-based coordinates and `1` for white, `2` for black.
///
/// Blank lines are skipped. Any other deviation fails the whole load.
impl FromStr for Board {
    type Err = PuzzleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut lines = s.lines()
            .enumerate()
            .map(|(index, text)| (index + 1, text.trim()))
            .filter(|(_, text)| !text.is_empty());

        let (dimension_line, dimension) = lines.next()
            .ok_or(malformed(1, MalformedReason::MissingDimension))?;
        let size = dimension.parse::<usize>().ok()
            .filter(|n| *n <= MAX_DIMENSION && n.checked_mul(*n).is_some())
            .and_then(NonZero::new)
            .ok_or(malformed(dimension_line, MalformedReason::BadDimension))?;

        let mut builder = BoardBuilder::with_size(size);
        for (line, text) in lines {
            let (row, col, pearl) = parse_pearl(text).map_err(|reason| malformed(line, reason))?;
            let location = Location::from_one_based(row, col)
                .ok_or(malformed(line, MalformedReason::OutOfRange))?;

            builder.add_pearl(pearl, location);
            if let Some(reasons) = builder.is_valid() {
                return Err(malformed(line, match reasons.last() {
                    Some(BuilderInvalidReason::DuplicatePearl) => MalformedReason::Duplicate,
                    _ => MalformedReason::OutOfRange,
                }));
            }
        }

        let board = builder.build()
            .map_err(|_| malformed(dimension_line, MalformedReason::BadDimension))?;
        debug!("loaded {}x{} board with {} pearls", board.size(), board.size(), board.pearls().len());
        Ok(board)
    }
}

impl Board {
    /// Read and parse a puzzle definition file. See the [`FromStr`] implementation for the format.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, PuzzleError> {
        fs::read_to_string(path)?.parse()
    }
}
