//! Local line shapes around pearls, and the narrowing of those shapes as lines get drawn.
//!
//! Every pearl starts with the shapes its color allows that fit on the board:
//! four for a black pearl (a turn with a two-cell arm on each side) and eight for a white pearl
//! (straight through, turning at one chosen end). Each time the search draws lines, the remaining shapes
//! of undecided pearls are filtered against the board with [`validate_new_moves`].

use itertools::Itertools;
use strum::VariantArray;

use crate::board::Board;
use crate::cell::Pearl;
use crate::location::{line, Line, Location};
use crate::shape::Direction;

/// One way the loop may pass a pearl, as the walk of cells it draws.
#[derive(Clone, Debug, Eq, PartialEq)]
pub(crate) struct Candidate {
    path: Vec<Location>,
}

/// Remaining candidates per undecided pearl, in a stable order.
pub(crate) type CandidateMap = Vec<(Location, Vec<Candidate>)>;

impl Candidate {
    pub(crate) fn lines(&self) -> impl Iterator<Item=Line> + '_ {
        self.path.iter().tuple_windows().map(|(a, b)| line(*a, *b))
    }

    pub(crate) fn cells(&self) -> &[Location] {
        &self.path
    }

    /// Every line of this shape is already on the board.
    fn is_drawn(&self, board: &Board) -> bool {
        self.lines().all(|l| board.edge_exists(l.0, l.1))
    }

    /// This shape passes through every cell the pearl is already joined to.
    fn follows(&self, board: &Board, pearl: Location) -> bool {
        board[pearl].neighbors().iter().all(|n| self.cells().contains(n))
    }

    /// Drawing this shape would give some cell a third line.
    fn overloads(&self, board: &Board) -> bool {
        self.cells().iter().any(|cell| {
            let added = self.lines()
                .filter(|l| (l.0 == *cell || l.1 == *cell) && !board.edge_exists(l.0, l.1))
                .count();
            board[*cell].degree() + added > 2
        })
    }
}

fn black_candidates(board: &Board, pearl: Location) -> Vec<Candidate> {
    [Direction::Up, Direction::Down].into_iter()
        .cartesian_product([Direction::Left, Direction::Right])
        .filter_map(|(vertical, horizontal)| {
            let near_h = horizontal.attempt_from(pearl);
            let near_v = vertical.attempt_from(pearl);
            let path = vec![
                horizontal.attempt_from(near_h),
                near_h,
                pearl,
                near_v,
                vertical.attempt_from(near_v),
            ];

            if !path.iter().all(|cell| board.contains(*cell)) {
                return None;
            }

            // a black pearl right next to this one would have to go straight
            if [near_h, near_v].iter().any(|cell| board[*cell].pearl == Some(Pearl::Black)) {
                return None;
            }

            Some(Candidate { path })
        })
        .collect_vec()
}

fn white_candidates(board: &Board, pearl: Location) -> Vec<Candidate> {
    Direction::VARIANTS.iter()
        .flat_map(|through| through.perpendiculars().map(|turn| (*through, turn)))
        .filter_map(|(through, turn)| {
            let far = through.attempt_from(pearl);
            let path = vec![
                through.invert().attempt_from(pearl),
                pearl,
                far,
                turn.attempt_from(far),
            ];

            path.iter().all(|cell| board.contains(*cell)).then_some(Candidate { path })
        })
        .collect_vec()
}

/// All shapes the pearl at `pearl` could take on an empty board.
pub(crate) fn candidates_for(board: &Board, pearl: Location) -> Vec<Candidate> {
    match board[pearl].pearl {
        Some(Pearl::Black) => black_candidates(board, pearl),
        Some(Pearl::White) => white_candidates(board, pearl),
        None => Vec::new(),
    }
}

/// Candidates for every pearl on the board, black pearls first, each in row-major order.
pub(crate) fn initial_candidates(board: &Board) -> CandidateMap {
    let (black, white): (Vec<Location>, Vec<Location>) = board.pearls().iter()
        .partition(|pearl| board[**pearl].pearl == Some(Pearl::Black));

    black.into_iter()
        .chain(white)
        .map(|pearl| (pearl, candidates_for(board, pearl)))
        .collect_vec()
}

/// Re-derive each pearl's candidates from the lines now on the board.
///
/// A pearl whose shape is already fully drawn keeps only the drawn shapes.
/// Otherwise it keeps the shapes that pass through every cell it is joined to
/// and that would not push any cell past two lines.
pub(crate) fn validate_new_moves(board: &Board, moves: &CandidateMap) -> CandidateMap {
    moves.iter()
        .map(|(pearl, candidates)| {
            let drawn = candidates.iter().filter(|c| c.is_drawn(board)).cloned().collect_vec();
            if !drawn.is_empty() {
                return (*pearl, drawn);
            }

            let remaining = candidates.iter()
                .filter(|c| c.follows(board, *pearl) && !c.overloads(board))
                .cloned()
                .collect_vec();
            (*pearl, remaining)
        })
        .collect_vec()
}
