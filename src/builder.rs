//! Construction of [`Board`]s from pearl placements.

use std::num::NonZero;
use std::ops::IndexMut;

use itertools::Itertools;
use ndarray::{Array2, AssignElem};
use petgraph::graphmap::UnGraphMap;

use crate::board::Board;
use crate::cell::{Node, Pearl};
use crate::location::{Dimension, Location};
use crate::shape::Direction;

/// Reasons a builder may become invalid while building.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum BuilderInvalidReason {
    /// A pearl was placed outside the bounds of the board.
    FeatureOutOfBounds,
    /// A pearl was placed on a cell already holding one.
    DuplicatePearl,
}

/// A builder for square Masyu boards.
///
/// Builders mutate themselves while building but can be [`Clone`]d to save their state at some point.
/// Once a builder becomes invalid, further calls do nothing and [`build`](Self::build) reports why.
#[derive(Clone)]
pub struct BoardBuilder {
    size: Dimension,
    pearls: Array2<Option<Pearl>>,
    invalid_reasons: Vec<BuilderInvalidReason>,
}

impl Default for BoardBuilder {
    fn default() -> Self {
        Self::with_size(NonZero::new(5).unwrap())
    }
}

impl BoardBuilder {
    /// Construct a new [`Self`] for a `size` by `size` board.
    pub fn with_size(size: Dimension) -> Self {
        Self {
            size,
            pearls: Array2::from_elem((size.get(), size.get()), None),
            invalid_reasons: Default::default(),
        }
    }

    fn in_bounds(&self, location: Location) -> bool {
        location.0 < self.size.get() && location.1 < self.size.get()
    }

    /// Place a pearl.
    ///
    /// May cause the builder to enter a [`FeatureOutOfBounds`](BuilderInvalidReason::FeatureOutOfBounds) invalid state if `location` is out of bounds,
    /// or a [`DuplicatePearl`](BuilderInvalidReason::DuplicatePearl) invalid state if a pearl is already there.
    pub fn add_pearl(&mut self, pearl: Pearl, location: Location) -> &mut Self {
        if !self.invalid_reasons.is_empty() {
            return self;
        }

        if !self.in_bounds(location) {
            self.invalid_reasons.push(BuilderInvalidReason::FeatureOutOfBounds);
            return self;
        }

        let slot = self.pearls.index_mut(location.as_index());
        if slot.is_some() {
            self.invalid_reasons.push(BuilderInvalidReason::DuplicatePearl);
            return self;
        }

        slot.assign_elem(Some(pearl));
        self
    }

    /// Shorthand for [`Self::add_pearl`] with a white pearl.
    pub fn add_white(&mut self, location: Location) -> &mut Self {
        self.add_pearl(Pearl::White, location)
    }

    /// Shorthand for [`Self::add_pearl`] with a black pearl.
    pub fn add_black(&mut self, location: Location) -> &mut Self {
        self.add_pearl(Pearl::Black, location)
    }

    /// Remove whatever pearl is at `location`.
    ///
    /// If the builder is in an invalid state or `location` is out of bounds, this function does nothing.
    pub fn remove_pearl(&mut self, location: Location) -> &mut Self {
        if self.invalid_reasons.is_empty() && self.in_bounds(location) {
            self.pearls.index_mut(location.as_index()).assign_elem(None);
        }

        self
    }

    /// Check the validity of this builder, ensuring no [`BuilderInvalidReason`] condition has arisen.
    ///
    /// Returns `None` if the builder is valid, `Some(&Vec<BuilderInvalidReason>)` otherwise.
    pub fn is_valid(&self) -> Option<&Vec<BuilderInvalidReason>> {
        if self.invalid_reasons.is_empty() {
            None
        } else {
            Some(&self.invalid_reasons)
        }
    }

    /// Convert the state of this builder into a [`Board`] with no lines drawn.
    /// If the builder is invalid for any reason, a reference to a [`Vec`] of [`BuilderInvalidReason`] will indicate why.
    pub fn build(&self) -> Result<Board, &Vec<BuilderInvalidReason>> {
        if !self.invalid_reasons.is_empty() {
            return Err(&self.invalid_reasons);
        }

        let n = self.size.get();
        let cells = Array2::from_shape_fn(self.pearls.raw_dim(), |ind| Node::new(Location::from(ind), self.pearls[ind]));

        let mut grid = UnGraphMap::with_capacity(
            cells.len(),
            // horizontal plus vertical edges
            2 * n * (n - 1),
        );

        for location in cells.indexed_iter().map(|(ind, _)| Location::from(ind)) {
            grid.add_node(location);
            // add edges down and to the right, if possible
            for direction in Direction::FORWARD_VARIANTS {
                let other = direction.attempt_from(location);
                if other.0 < n && other.1 < n {
                    grid.add_edge(location, other, *direction);
                }
            }
        }

        let pearls = cells.iter()
            .filter(|node| node.pearl.is_some())
            .map(|node| node.location)
            .collect_vec();

        Ok(Board {
            cells,
            grid,
            pearls,
            size: self.size,
        })
    }
}
