#![warn(missing_docs)]

//! # `masyu`
//!
//! Move validation, win detection and solving for [Masyu](https://en.wikipedia.org/wiki/Masyu) loop puzzles.
//! Build a board with a [`BoardBuilder`](builder::BoardBuilder) or parse one from a puzzle definition
//! (see [`Board::load`]), then draw lines with [`add_edge`](Board::add_edge) or let [`solve()`](Board::solve) find the loop.
//!
//! The rules: draw a single closed loop through the centers of cells, entering and leaving each visited cell once.
//! The loop passes through every pearl.
//! At a white pearl it goes straight, and turns in at least one of the two cells next to it along the loop.
//! At a black pearl it turns, and goes straight through both cells on each side of the turn.
//!
//! # Internals
//! The default solver is a backtracking search kept on an explicit stack, so deep searches never exhaust the call stack.
//! Each pearl starts with the few local shapes its color allows; pearls left with one shape are drawn together as a batch,
//! otherwise the search branches on the pearl with the fewest shapes left, narrowing the others after every step.
//! Once every pearl has its shape, the remaining gaps are closed by extending loose ends one line at a time.
//! Every speculative line is undone on failure, so a failed solve leaves the board exactly as it was.
//!
//! An alternative [`Strategy::Sat`] encodes the local rules as a Boolean satisfiability problem
//! and rules out disconnected loops one at a time until a single loop remains.
//!
//! A [`Game`] wraps a board with a move history for interactive play, and an [`Autoplayer`] replays a found
//! [`Solution`] onto it move by move.

pub use board::Board;
pub use builder::BoardBuilder;
pub use cell::{Node, Pearl};
pub use driver::Autoplayer;
pub use error::{IllegalMove, MalformedReason, PuzzleError};
pub use game::{Game, Move, Origin, SolveStatus};
pub use location::{line, Dimension, Line, Location};
pub use parse::MAX_DIMENSION;
pub use solver::{Solution, SolverConfig, SolverFailure, Strategy};

pub(crate) mod board;
pub mod builder;
pub(crate) mod candidate;
pub(crate) mod cell;
pub(crate) mod driver;
pub(crate) mod error;
pub(crate) mod game;
pub(crate) mod location;
pub(crate) mod logic;
pub(crate) mod parse;
pub(crate) mod rules;
pub(crate) mod sat;
pub mod shape;
pub(crate) mod solver;
mod tests;
#[cfg(feature = "wasm")]
pub mod wasm;
