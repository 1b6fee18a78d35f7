use itertools::Itertools;
use log::trace;

use crate::error::IllegalMove;
use crate::game::{Game, Move, Origin};
use crate::solver::Solution;

/// Replays a [`Solution`] onto a [`Game`] one line at a time, walking around the loop.
///
/// Every line it draws enters the game's history tagged [`Origin::Autoplayer`], and [`undo`](Self::undo)
/// takes back the most recent such line still in that history, never a line the player drew.
#[derive(Clone, Debug)]
pub struct Autoplayer {
    moves: Vec<Move>,
    cursor: usize,
}

impl Autoplayer {
    /// Prepare a replay of `solution`, starting from its top-left-most cell.
    pub fn new(solution: &Solution) -> Self {
        let tour = solution.tour();
        let moves = match tour.first() {
            Some(first) => tour.iter()
                .chain([first])
                .tuple_windows()
                .map(|(from, to)| Move::autoplayed(*from, *to))
                .collect_vec(),
            None => Vec::new(),
        };

        Self { moves, cursor: 0 }
    }

    /// Every move of the replay, in order.
    pub fn moves(&self) -> &[Move] {
        &self.moves
    }

    /// Whether every move has been played.
    pub fn is_finished(&self) -> bool {
        self.cursor == self.moves.len()
    }

    /// Play the next move. Returns `None` once the replay is finished.
    ///
    /// A line that is already drawn is passed over without entering the history.
    pub fn step(&mut self, game: &mut Game) -> Result<Option<Move>, IllegalMove> {
        let Some(next) = self.moves.get(self.cursor).copied() else {
            return Ok(None);
        };

        game.record(next)?;
        trace!("autoplay {}", next);

        self.cursor += 1;
        Ok(Some(next))
    }

    /// Take back the most recent autoplayed line still on the board, rewinding the replay to it.
    pub fn undo(&mut self, game: &mut Game) -> Option<Move> {
        let last = game.undo_latest_from(Origin::Autoplayer)?;
        if let Some(position) = self.moves.iter().position(|m| m.same_line(&last)) {
            self.cursor = position;
        }

        Some(last)
    }

    /// Play every remaining move. Returns how many lines were drawn.
    pub fn play_all(&mut self, game: &mut Game) -> Result<usize, IllegalMove> {
        let before = game.history().len();
        while self.step(game)?.is_some() {}
        Ok(game.history().len() - before)
    }
}
