use std::fmt::{Display, Formatter};
use std::path::Path;

use log::debug;

use crate::board::Board;
use crate::error::{IllegalMove, PuzzleError};
use crate::location::{line, Location};
use crate::solver::{Solution, SolverConfig, SolverFailure};

/// Who drew a line.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq)]
pub enum Origin {
    /// Entered through [`Game::make_move`].
    #[default]
    Player,
    /// Replayed by an [`Autoplayer`](crate::Autoplayer).
    Autoplayer,
}

/// A line drawn between two cells, and who drew it.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub struct Move {
    /// The cell the line starts from.
    pub from: Location,
    /// The cell the line ends at.
    pub to: Location,
    /// Who drew the line.
    pub origin: Origin,
}

impl Move {
    /// A move made by the player.
    pub fn new(from: Location, to: Location) -> Self {
        Self { from, to, origin: Origin::Player }
    }

    pub(crate) fn autoplayed(from: Location, to: Location) -> Self {
        Self { from, to, origin: Origin::Autoplayer }
    }

    /// Whether `self` and `other` draw the same line, in either direction.
    pub fn same_line(&self, other: &Move) -> bool {
        line(self.from, self.to) == line(other.from, other.to)
    }
}

impl Display for Move {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} -> {}", self.from, self.to)
    }
}

/// What is known about the puzzle's solvability.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub enum SolveStatus {
    /// No solve has finished yet.
    #[default]
    NotAttempted,
    /// The solver found this loop.
    Solved(Solution),
    /// The search was exhausted without finding a loop.
    Unsolvable,
}

/// A play session over one [`Board`].
///
/// Moves go straight through to the board. The session adds the one history of drawn lines,
/// tagged with their [`Origin`], and remembers what the solver found.
#[derive(Clone, Debug)]
pub struct Game {
    board: Board,
    history: Vec<Move>,
    status: SolveStatus,
}

impl Game {
    /// Start a session on `board`, keeping any lines already drawn on it.
    pub fn new(board: Board) -> Self {
        Self {
            board,
            history: Vec::new(),
            status: SolveStatus::NotAttempted,
        }
    }

    /// Start a session on the puzzle definition at `path`.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, PuzzleError> {
        Ok(Self::new(Board::load(path)?))
    }

    /// Side length of the board, for layout.
    pub fn size(&self) -> usize {
        self.board.size()
    }

    /// The board as it currently stands.
    pub fn board(&self) -> &Board {
        &self.board
    }

    /// Draw a line. Returns whether the board changed; only lines that changed it enter the history.
    pub fn make_move(&mut self, from: Location, to: Location) -> Result<bool, IllegalMove> {
        self.record(Move::new(from, to))
    }

    pub(crate) fn record(&mut self, m: Move) -> Result<bool, IllegalMove> {
        let added = self.board.add_edge(m.from, m.to)?;
        if added {
            self.history.push(m);
        }

        Ok(added)
    }

    /// Erase a line, wherever it sits in the history.
    pub fn undo_move(&mut self, from: Location, to: Location) -> Result<bool, IllegalMove> {
        let removed = self.board.remove_edge(from, to)?;
        if removed {
            let erased = Move::new(from, to);
            if let Some(index) = self.history.iter().rposition(|m| m.same_line(&erased)) {
                self.history.remove(index);
            }
        }

        Ok(removed)
    }

    /// Erase the most recently drawn line still on the board.
    pub fn undo_last(&mut self) -> Option<Move> {
        let last = self.history.pop()?;
        self.board.unlink(line(last.from, last.to));
        debug!("took back {}", last);
        Some(last)
    }

    /// Erase the most recent line drawn by `origin` that is still on the board.
    pub(crate) fn undo_latest_from(&mut self, origin: Origin) -> Option<Move> {
        let index = self.history.iter().rposition(|m| m.origin == origin)?;
        let last = self.history.remove(index);
        self.board.unlink(line(last.from, last.to));
        Some(last)
    }

    /// Lines drawn in this session, oldest first.
    pub fn history(&self) -> &[Move] {
        &self.history
    }

    /// Whether the lines on the board solve the puzzle. Callable at any time.
    pub fn check_solved(&self) -> bool {
        self.board.check_win()
    }

    /// Solve the puzzle from an empty board, leaving the player's lines as they are.
    ///
    /// The outcome is also remembered in [`status`](Self::status);
    /// a run cut short by the step limit leaves the status untouched.
    pub fn solve(&mut self, config: &SolverConfig) -> Result<Solution, SolverFailure> {
        let mut scratch = self.board.clone();
        scratch.clear_lines();

        let result = scratch.solve_with(config);
        match &result {
            Ok(solution) => self.status = SolveStatus::Solved(solution.clone()),
            Err(SolverFailure::NoSolutionFound) => self.status = SolveStatus::Unsolvable,
            Err(_) => {}
        }

        result
    }

    /// What the last finished solve found.
    pub fn status(&self) -> &SolveStatus {
        &self.status
    }

    /// Erase every line and forget the history.
    pub fn reset(&mut self) {
        self.board.clear_lines();
        self.history.clear();
    }
}

impl Display for Game {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.board)
    }
}
