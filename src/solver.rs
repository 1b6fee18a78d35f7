use std::collections::HashMap;

use itertools::Itertools;
use log::{debug, info, trace};
use strum::{Display, EnumString};
use thiserror::Error;

use crate::board::Board;
use crate::candidate::{initial_candidates, validate_new_moves, CandidateMap};
use crate::cell::Node;
use crate::error::IllegalMove;
use crate::location::{line, Line, Location};
use crate::sat;
use crate::shape::Direction;

/// Reasons a solve may fail.
#[derive(Clone, Copy, Debug, Error, Eq, PartialEq)]
pub enum SolverFailure {
    /// Every branch was explored and none closed a valid loop, i.e. the puzzle as stated is unsolvable.
    /// Boards without pearls always end here, since nothing seeds the search.
    #[error("no solution found")]
    NoSolutionFound,
    /// The configured step limit ran out before the search finished. The board is left as it was.
    #[error("search abandoned after {0} steps")]
    StepLimitReached(u64),
    /// The SAT backend reported an internal error.
    /// This should probably never happen.
    #[error("the SAT backend failed")]
    Backend,
}

/// Which algorithm [`Board::solve_with`] runs.
#[derive(Clone, Copy, Debug, Default, Display, EnumString, Eq, PartialEq)]
#[strum(serialize_all = "lowercase")]
pub enum Strategy {
    /// Constraint propagation over pearl shapes, then exhaustive free-cell search, with backtracking.
    #[default]
    Backtrack,
    /// Local rules as a SAT formula, re-solved until the lines form a single loop.
    Sat,
}

/// Knobs for [`Board::solve_with`].
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct SolverConfig {
    /// The algorithm to run.
    pub strategy: Strategy,
    /// Give up after this many search steps. Only the backtracking strategy counts steps.
    pub step_limit: Option<u64>,
}

/// A loop found by a solver, as the list of lines it draws.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Solution {
    lines: Vec<Line>,
}

impl Solution {
    pub(crate) fn from_board(board: &Board) -> Self {
        Self { lines: board.lines() }
    }

    /// Every line once, ordered by its lower endpoint.
    pub fn lines(&self) -> &[Line] {
        &self.lines
    }

    /// The lines flattened to consecutive endpoint pairs, as a renderer consumes them.
    pub fn draw_lines(&self) -> Vec<Location> {
        self.lines.iter().flat_map(|l| [l.0, l.1]).collect_vec()
    }

    /// The cells of the loop in walking order, starting from its top-left-most cell.
    pub fn tour(&self) -> Vec<Location> {
        let mut adjacent: HashMap<Location, Vec<Location>> = HashMap::new();
        for l in &self.lines {
            adjacent.entry(l.0).or_default().push(l.1);
            adjacent.entry(l.1).or_default().push(l.0);
        }

        let Some(start) = self.lines.first().map(|l| l.0) else {
            return Vec::new();
        };

        let mut tour = vec![start];
        let mut previous = None;
        let mut current = start;
        while let Some(next) = adjacent.get(&current)
            .and_then(|ns| ns.iter().copied().find(|n| Some(*n) != previous)) {
            if next == start || tour.len() > self.lines.len() {
                break;
            }

            tour.push(next);
            previous = Some(current);
            current = next;
        }

        tour
    }

    /// Draw every line of this solution onto `board`.
    ///
    /// Nothing is drawn unless every line is legal on that board.
    pub fn apply_to(&self, board: &mut Board) -> Result<(), IllegalMove> {
        for l in &self.lines {
            board.check_move(l.0, l.1)?;
        }

        for l in &self.lines {
            board.link(*l);
        }
        Ok(())
    }
}

impl Board {
    /// Solve this board with the default [`SolverConfig`], drawing the loop onto `self`.
    ///
    /// Returns according to [`Self::solve_with`].
    pub fn solve(&mut self) -> Result<Solution, SolverFailure> {
        self.solve_with(&SolverConfig::default())
    }

    /// Solve this board, starting from whatever lines are already drawn.
    ///
    /// On success the board holds the solved loop and the same lines are returned as a [`Solution`].
    /// On failure the board is restored to exactly the state it was in.
    pub fn solve_with(&mut self, config: &SolverConfig) -> Result<Solution, SolverFailure> {
        info!("solving {}x{} board with {} pearls ({})", self.size(), self.size(), self.pearls.len(), config.strategy);

        if self.pearls.is_empty() {
            info!("no pearls to seed the search");
            return Err(SolverFailure::NoSolutionFound);
        }

        let result = match config.strategy {
            Strategy::Backtrack => Backtracker::new(self, config.step_limit).run(),
            Strategy::Sat => sat::solve(self),
        };

        match &result {
            Ok(solution) => info!("solved with {} lines", solution.lines().len()),
            Err(failure) => info!("{}", failure),
        }
        result
    }
}

/// One level of the search: the alternative line batches to try, and what the current one drew.
struct Frame {
    branches: Vec<Vec<Line>>,
    next: usize,
    // only lines this branch actually added, so undoing never erases earlier lines
    applied: Vec<Line>,
    // pearls still to place after a branch; `None` once in the free-cell phase
    pending: Option<CandidateMap>,
}

impl Frame {
    fn new(branches: Vec<Vec<Line>>, pending: Option<CandidateMap>) -> Self {
        Self {
            branches,
            next: 0,
            applied: Vec::new(),
            pending,
        }
    }
}

enum Expansion {
    Solved,
    Branch(Frame),
}

/// Depth-first search over pearl shapes and then single free lines, kept on an explicit stack of [`Frame`]s.
struct Backtracker<'a> {
    board: &'a mut Board,
    step_limit: Option<u64>,
    steps: u64,
}

impl<'a> Backtracker<'a> {
    fn new(board: &'a mut Board, step_limit: Option<u64>) -> Self {
        Self {
            board,
            step_limit,
            steps: 0,
        }
    }

    fn run(mut self) -> Result<Solution, SolverFailure> {
        let initial = validate_new_moves(self.board, &initial_candidates(self.board));
        let mut stack = match self.expand(Some(initial)) {
            Expansion::Solved => return Ok(Solution::from_board(self.board)),
            Expansion::Branch(frame) => vec![frame],
        };

        loop {
            let depth = stack.len();
            let Some(frame) = stack.last_mut() else {
                break;
            };

            for l in frame.applied.drain(..).rev() {
                self.board.unlink(l);
            }

            let Some(branch) = frame.branches.get(frame.next).cloned() else {
                stack.pop();
                continue;
            };
            frame.next += 1;

            if self.step_limit.is_some_and(|limit| self.steps >= limit) {
                Self::unwind(self.board, &mut stack);
                return Err(SolverFailure::StepLimitReached(self.steps));
            }
            self.steps += 1;
            trace!("step {} at depth {}: drawing {} lines", self.steps, depth, branch.len());

            for l in &branch {
                if self.board.link(*l) {
                    frame.applied.push(*l);
                }
            }

            if !self.consistent(&branch) {
                continue;
            }

            let pending = frame.pending.as_ref().map(|moves| validate_new_moves(self.board, moves));
            match self.expand(pending) {
                Expansion::Solved => return Ok(Solution::from_board(self.board)),
                Expansion::Branch(child) => stack.push(child),
            }
        }

        Err(SolverFailure::NoSolutionFound)
    }

    fn unwind(board: &mut Board, stack: &mut [Frame]) {
        for frame in stack.iter_mut().rev() {
            for l in frame.applied.drain(..).rev() {
                board.unlink(l);
            }
        }
    }

    /// Cheap checks that the lines just drawn can still be part of a solution.
    fn consistent(&self, branch: &[Line]) -> bool {
        let touched = branch.iter().flat_map(|l| [l.0, l.1]).unique().collect_vec();

        if touched.iter().any(|cell| self.board[*cell].degree() > 2) {
            return false;
        }

        let contradiction = self.board.pearls().iter()
            .filter(|pearl| touched.iter().any(|cell| cell.distance(**pearl) <= 2))
            .any(|pearl| self.board.contradicts(*pearl));
        if contradiction {
            return false;
        }

        // a closed loop can never grow, so it must already be the answer
        !touched.iter().any(|cell| self.board.on_closed_loop(*cell)) || self.board.check_win()
    }

    fn expand(&self, pending: Option<CandidateMap>) -> Expansion {
        match pending {
            Some(mut moves) if !moves.is_empty() => {
                moves.sort_by_key(|(_, candidates)| candidates.len());

                if moves[0].1.len() == 1 {
                    let forced = moves.iter().take_while(|(_, candidates)| candidates.len() == 1).count();
                    debug!("committing {} forced pearl shapes", forced);

                    let batch = moves.drain(..forced)
                        .flat_map(|(_, candidates)| candidates.iter().flat_map(|c| c.lines().collect_vec()).collect_vec())
                        .collect_vec();
                    Expansion::Branch(Frame::new(vec![batch], Some(moves)))
                } else {
                    let (pearl, candidates) = moves.remove(0);
                    debug!("branching on {} shapes for the pearl at {}", candidates.len(), pearl);

                    let branches = candidates.iter().map(|c| c.lines().collect_vec()).collect_vec();
                    Expansion::Branch(Frame::new(branches, Some(moves)))
                }
            }
            _ => {
                if self.board.check_win() {
                    return Expansion::Solved;
                }

                let branches = match self.free_cell() {
                    Some(cell) => Direction::SEARCH_ORDER.iter()
                        .map(|direction| direction.attempt_from(cell))
                        .filter(|other| self.board.node(*other).is_some_and(Node::has_capacity))
                        .filter(|other| !self.board.edge_exists(cell, *other))
                        .map(|other| vec![line(cell, other)])
                        .collect_vec(),
                    None => Vec::new(),
                };
                Expansion::Branch(Frame::new(branches, None))
            }
        }
    }

    /// The cell the free-cell search extends next: the first loose end, else the first pearl not yet on any line.
    fn free_cell(&self) -> Option<Location> {
        self.board.cells.iter()
            .find(|node| node.degree() == 1)
            .map(|node| node.location)
            .or_else(|| self.board.pearls().iter().copied().find(|pearl| self.board[*pearl].degree() == 0))
    }
}
