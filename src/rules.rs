use std::collections::HashSet;

use itertools::Itertools;
use strum::VariantArray;

use crate::board::Board;
use crate::cell::Pearl;
use crate::location::Location;
use crate::shape::Direction;

/// Outcome of visiting one node during the win-check traversal.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) enum Visit {
    /// Nothing decided yet.
    Continue,
    /// A pearl on the traversal breaks its color rule; the board cannot be won.
    Invalid,
    /// The traversal closed a cycle.
    CycleFound { all_pearls: bool },
}

impl Board {
    /// The line leaves `location` heading `direction` and keeps going straight for `steps` edges.
    fn runs(&self, location: Location, direction: Direction, steps: usize) -> bool {
        let mut here = location;
        for _ in 0..steps {
            let next = direction.attempt_from(here);
            if !self.edge_exists(here, next) {
                return false;
            }
            here = next;
        }

        true
    }

    /// The line through `location`, entered heading `heading`, leaves it at a right angle.
    fn turns_at(&self, location: Location, heading: Direction) -> bool {
        heading.perpendiculars().iter()
            .any(|side| self.edge_exists(location, side.attempt_from(location)))
    }

    /// A black pearl is valid when exactly two of its four directions carry a straight two-edge arm
    /// and those two directions are at a right angle, i.e. the loop turns here.
    pub fn is_valid_black(&self, location: Location) -> bool {
        match self.node(location) {
            Some(node) if node.pearl == Some(Pearl::Black) && node.degree() == 2 => {}
            _ => return false,
        }

        let arms = Direction::VARIANTS.iter()
            .copied()
            .filter(|direction| self.runs(location, *direction, 2))
            .collect_vec();

        matches!(arms[..], [a, b] if a.is_perpendicular_to(b))
    }

    /// A white pearl is valid when the loop goes straight through it
    /// and turns in at least one of the two cells it passes into.
    pub fn is_valid_white(&self, location: Location) -> bool {
        let exits = match self.node(location) {
            Some(node) if node.pearl == Some(Pearl::White) => node.exits(),
            _ => return false,
        };

        match exits[..] {
            [a, b] if a == b.invert() => [a, b].iter()
                .any(|direction| self.turns_at(direction.attempt_from(location), *direction)),
            _ => false,
        }
    }

    fn pearl_valid(&self, location: Location) -> bool {
        match self[location].pearl {
            Some(Pearl::White) => self.is_valid_white(location),
            Some(Pearl::Black) => self.is_valid_black(location),
            None => true,
        }
    }

    /// The pearl at `location` can no longer be made valid by drawing more lines.
    ///
    /// Only looks at lines already drawn near the pearl, so it is cheap enough to run after every search step.
    pub(crate) fn contradicts(&self, location: Location) -> bool {
        let Some(node) = self.node(location) else {
            return false;
        };
        let exits = node.exits();

        match node.pearl {
            Some(Pearl::White) => {
                if exits.iter().tuple_combinations().any(|(a, b)| a.is_perpendicular_to(*b)) {
                    return true;
                }

                // straight through, and neither neighbor can turn anymore
                exits.iter().any(|a| exits.contains(&a.invert()))
                    && exits.iter().all(|direction| self.runs(direction.attempt_from(location), *direction, 1))
            }
            Some(Pearl::Black) => {
                if exits.iter().any(|a| exits.contains(&a.invert())) {
                    return true;
                }

                exits.iter().any(|direction| {
                    let arm = direction.attempt_from(location);
                    !self.contains(direction.attempt_from(arm)) || self.turns_at(arm, *direction)
                })
            }
            None => false,
        }
    }

    /// Walk the drawn lines from `start` with an explicit stack, validating every pearl reached.
    ///
    /// Returns the traversal outcome and the number of nodes reached.
    pub(crate) fn traverse(&self, start: Location) -> (Visit, usize) {
        let mut visited = HashSet::from([start]);
        let mut pearls_seen = 0;

        let visit = |location: Location, pearls_seen: &mut usize| {
            if self[location].pearl.is_some() {
                *pearls_seen += 1;
                if !self.pearl_valid(location) {
                    return Visit::Invalid;
                }
            }
            Visit::Continue
        };

        if visit(start, &mut pearls_seen) == Visit::Invalid {
            return (Visit::Invalid, visited.len());
        }

        let mut stack: Vec<(Location, Option<Location>)> = vec![(start, None)];
        let mut cycle = false;
        while let Some((here, parent)) = stack.pop() {
            for next in self[here].neighbors() {
                if Some(*next) == parent {
                    continue;
                }

                if !visited.insert(*next) {
                    cycle = true;
                    continue;
                }

                if visit(*next, &mut pearls_seen) == Visit::Invalid {
                    return (Visit::Invalid, visited.len());
                }

                stack.push((*next, Some(here)));
            }
        }

        let outcome = match cycle {
            true => Visit::CycleFound { all_pearls: pearls_seen == self.pearls.len() },
            false => Visit::Continue,
        };

        (outcome, visited.len())
    }

    /// Whether the drawn lines solve the puzzle: every cell has at most two lines,
    /// the drawn cells form exactly one simple loop, every pearl is on it, and every pearl obeys its color rule.
    ///
    /// Never mutates the board; safe to call at any time.
    pub fn check_win(&self) -> bool {
        if !self.all_degrees_valid() {
            return false;
        }

        let connected = self.connected_nodes();
        let Some(start) = connected.first() else {
            return false;
        };

        match self.traverse(*start) {
            (Visit::CycleFound { all_pearls: true }, reached) => reached == connected.len(),
            _ => false,
        }
    }
}
