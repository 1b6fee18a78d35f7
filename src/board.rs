use std::fmt::{Display, Formatter};
use std::ops::Index;

use itertools::Itertools;
use ndarray::Array2;
use petgraph::graphmap::UnGraphMap;

use crate::cell::Node;
use crate::error::IllegalMove;
use crate::location::{line, Dimension, Line, Location};
use crate::shape::Direction;

/// A square Masyu board: its pearls and the lines currently drawn between cells.
///
/// [`Board`]s are built with a [`BoardBuilder`](crate::builder::BoardBuilder) or parsed from a puzzle definition,
/// see [`Board::load`] and the [`FromStr`](std::str::FromStr) implementation.
/// Lines are only ever changed through [`add_edge`](Self::add_edge) and [`remove_edge`](Self::remove_edge),
/// by players and by the solver alike.
#[derive(Clone, Debug)]
pub struct Board {
    pub(crate) cells: Array2<Node>,
    // every pair of cells a line may join, weighted by the forward direction between them
    pub(crate) grid: UnGraphMap<Location, Direction>,
    pub(crate) pearls: Vec<Location>,
    pub(crate) size: Dimension,
}

impl Board {
    /// Side length of the board.
    pub fn size(&self) -> usize {
        self.size.get()
    }

    /// `location` lies on the board.
    pub fn contains(&self, location: Location) -> bool {
        location.0 < self.size() && location.1 < self.size()
    }

    /// The cell at `location`, if it is on the board.
    pub fn node(&self, location: Location) -> Option<&Node> {
        self.cells.get(location.as_index())
    }

    /// Locations of every pearl, in row-major order.
    pub fn pearls(&self) -> &[Location] {
        &self.pearls
    }

    pub(crate) fn check_move(&self, a: Location, b: Location) -> Result<(), IllegalMove> {
        for location in [a, b] {
            if !self.contains(location) {
                return Err(IllegalMove::OutOfBounds(location));
            }
        }

        if !self.grid.contains_edge(a, b) {
            return Err(IllegalMove::NotAdjacent(a, b));
        }

        Ok(())
    }

    /// Draw a line between two grid-adjacent cells.
    ///
    /// Returns whether the board changed; drawing an existing line is a no-op.
    pub fn add_edge(&mut self, a: Location, b: Location) -> Result<bool, IllegalMove> {
        self.check_move(a, b)?;
        Ok(self.link(line(a, b)))
    }

    /// Erase the line between two grid-adjacent cells.
    ///
    /// Returns whether the board changed; erasing a missing line is a no-op.
    pub fn remove_edge(&mut self, a: Location, b: Location) -> Result<bool, IllegalMove> {
        self.check_move(a, b)?;
        Ok(self.unlink(line(a, b)))
    }

    /// A line is drawn between `a` and `b`.
    pub fn edge_exists(&self, a: Location, b: Location) -> bool {
        self.node(a).is_some_and(|node| node.is_adjacent_to(b))
    }

    // callers guarantee both endpoints are on the board
    pub(crate) fn link(&mut self, line: Line) -> bool {
        if self.edge_exists(line.0, line.1) {
            return false;
        }

        self.cells[line.0.as_index()].add_adjacent(line.1);
        self.cells[line.1.as_index()].add_adjacent(line.0);
        true
    }

    pub(crate) fn unlink(&mut self, line: Line) -> bool {
        if !self.edge_exists(line.0, line.1) {
            return false;
        }

        self.cells[line.0.as_index()].remove_adjacent(line.1);
        self.cells[line.1.as_index()].remove_adjacent(line.0);
        true
    }

    /// Erase every line on the board.
    pub fn clear_lines(&mut self) {
        self.cells.iter_mut().for_each(Node::clear);
    }

    /// Cells with at least one line, in row-major order.
    pub fn connected_nodes(&self) -> Vec<Location> {
        self.cells.iter()
            .filter(|node| node.degree() > 0)
            .map(|node| node.location)
            .collect_vec()
    }

    /// Every drawn line once, ordered by its lower endpoint.
    pub fn lines(&self) -> Vec<Line> {
        self.cells.iter()
            .flat_map(|node| node.neighbors().iter()
                .filter(move |other| node.location < **other)
                .map(move |other| line(node.location, *other)))
            .collect_vec()
    }

    /// No cell has more than two lines. Any other state is never part of a solution.
    pub fn all_degrees_valid(&self) -> bool {
        self.cells.iter().all(|node| node.degree() <= 2)
    }

    /// Follow the line from `location`; true if it comes back around to `location`.
    pub(crate) fn on_closed_loop(&self, location: Location) -> bool {
        let Some(start) = self.node(location) else {
            return false;
        };
        if start.degree() != 2 {
            return false;
        }

        let mut previous = location;
        let mut current = start.neighbors()[0];
        for _ in 0..self.cells.len() {
            if current == location {
                return true;
            }

            let node = &self[current];
            if node.degree() != 2 {
                return false;
            }

            let next = if node.neighbors()[0] == previous { node.neighbors()[1] } else { node.neighbors()[0] };
            previous = current;
            current = next;
        }

        false
    }
}

impl Index<Location> for Board {
    type Output = Node;

    fn index(&self, location: Location) -> &Self::Output {
        &self.cells[location.as_index()]
    }
}

impl Display for Board {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let mut out = String::with_capacity(self.cells.nrows() * (self.cells.ncols() + 1));

        for row in self.cells.rows() {
            for node in row {
                out.push(node.glyph());
            }
            out.push('\n');
        }

        write!(f, "{}", out)
    }
}
