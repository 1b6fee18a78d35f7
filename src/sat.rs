//! Solving by Boolean satisfiability.
//!
//! Every edge of the grid becomes one variable, true when a line is drawn there.
//! The local rules are plain clauses:
//! 1. No cell has three or more lines, and no cell has exactly one (`at_most_two` and `never_exactly_one`).
//! 2. Every pearl has a line.
//! 3. A black pearl never goes straight through, and each line leaving it continues straight for a second edge.
//! 4. A white pearl never turns, and it is not straight for three edges on both sides at once.
//!
//! Connectivity is not expressible locally, so the model may come back as several disjoint loops.
//! Each such loop is then forbidden with a clause stating not all of its edges are drawn, and the formula is solved again.

use std::collections::{HashMap, HashSet};

use itertools::Itertools;
use log::debug;
use petgraph::graphmap::UnGraphMap;
use petgraph::visit::Dfs;
use strum::VariantArray;
use varisat::{CnfFormula, Lit, Solver, Var};

use crate::board::Board;
use crate::cell::Pearl;
use crate::location::{line, Line, Location};
use crate::logic::{at_most_two, never_exactly_one, not_all};
use crate::shape::Direction;
use crate::solver::{Solution, SolverFailure};

struct Encoding {
    edges: Vec<Line>,
    vars: HashMap<Line, Var>,
}

impl Encoding {
    fn new(board: &Board) -> Self {
        let edges = board.grid.all_edges()
            .map(|(a, b, _)| line(a, b))
            .collect_vec();
        let vars = edges.iter()
            .enumerate()
            .map(|(index, edge)| (*edge, Var::from_index(index)))
            .collect();

        Self { edges, vars }
    }

    /// The variable for the edge between `a` and `b`, if that edge is on the grid.
    fn var(&self, a: Location, b: Location) -> Option<Var> {
        self.vars.get(&line(a, b)).copied()
    }

    /// The variable for the edge leaving `location` heading `direction`.
    fn step(&self, location: Location, direction: Direction) -> Option<Var> {
        self.var(location, direction.attempt_from(location))
    }

    /// The variable for the edge one cell further out, continuing straight from `location` heading `direction`.
    fn second_step(&self, location: Location, direction: Direction) -> Option<Var> {
        self.step(direction.attempt_from(location), direction)
    }

    fn black_clauses(&self, here: Location) -> Vec<Vec<Lit>> {
        let mut clauses = Vec::new();

        for direction in Direction::VARIANTS {
            let Some(arm) = self.step(here, *direction) else {
                continue;
            };

            // never straight through
            if let Some(opposite) = self.step(here, direction.invert()) {
                clauses.push(vec![arm.negative(), opposite.negative()]);
            }

            // an arm runs straight for two edges
            match self.second_step(here, *direction) {
                Some(far) => clauses.push(vec![arm.negative(), far.positive()]),
                None => clauses.push(vec![arm.negative()]),
            }
        }

        clauses
    }

    fn white_clauses(&self, here: Location) -> Vec<Vec<Lit>> {
        let mut clauses = Direction::VARIANTS.iter()
            .tuple_combinations()
            .filter(|(a, b)| a.is_perpendicular_to(**b))
            .filter_map(|(a, b)| Some(vec![self.step(here, *a)?.negative(), self.step(here, *b)?.negative()]))
            .collect_vec();

        // A => !(B and C and D) where A and B pass straight through, C and D continue straight past both neighbors
        for axis in [Direction::Up, Direction::Left] {
            let straight = [
                self.step(here, axis),
                self.step(here, axis.invert()),
                self.second_step(here, axis),
                self.second_step(here, axis.invert()),
            ];

            if let [Some(a), Some(b), Some(c), Some(d)] = straight {
                clauses.push(not_all(&[a.positive(), b.positive(), c.positive(), d.positive()]));
            }
        }

        clauses
    }

    fn formulae(&self, board: &Board) -> Vec<CnfFormula> {
        let mut formulae = Vec::new();

        for node in board.cells.iter() {
            let here = node.location;
            let incident = Direction::VARIANTS.iter()
                .filter_map(|direction| self.step(here, *direction))
                .map(Var::positive)
                .collect_vec();

            formulae.push(CnfFormula::from(at_most_two(&incident)));
            formulae.push(CnfFormula::from(never_exactly_one(&incident)));

            let Some(pearl) = node.pearl else {
                continue;
            };

            // the loop passes every pearl
            formulae.push(CnfFormula::from(vec![incident]));
            formulae.push(CnfFormula::from(match pearl {
                Pearl::Black => self.black_clauses(here),
                Pearl::White => self.white_clauses(here),
            }));
        }

        // lines already drawn stay drawn
        formulae.push(CnfFormula::from(board.lines().iter()
            .filter_map(|drawn| self.vars.get(drawn))
            .map(|var| vec![var.positive()])
            .collect_vec()));

        formulae
    }

    fn chosen(&self, model: &[Lit]) -> Vec<Line> {
        let truths: HashSet<Var> = model.iter()
            .filter(|lit| lit.is_positive())
            .map(|lit| lit.var())
            .collect();

        self.edges.iter()
            .filter(|edge| truths.contains(&self.vars[*edge]))
            .copied()
            .collect_vec()
    }
}

/// Split `lines` into the edge sets of their connected components.
fn components(lines: &[Line]) -> Vec<Vec<Line>> {
    let graph: UnGraphMap<Location, ()> = UnGraphMap::from_edges(lines.iter().map(|l| (l.0, l.1)));
    let mut seen = HashSet::new();
    let mut components = Vec::new();

    for start in graph.nodes() {
        if seen.contains(&start) {
            continue;
        }

        let mut dfs = Dfs::new(&graph, start);
        let mut cells = HashSet::new();
        while let Some(cell) = dfs.next(&graph) {
            seen.insert(cell);
            cells.insert(cell);
        }

        components.push(lines.iter().filter(|l| cells.contains(&l.0)).copied().collect_vec());
    }

    components
}

/// Solve `board` by SAT, drawing the loop onto it on success.
pub(crate) fn solve(board: &mut Board) -> Result<Solution, SolverFailure> {
    let encoding = Encoding::new(board);

    let mut solver = Solver::new();
    encoding.formulae(board).iter().for_each(|formula| solver.add_formula(formula));

    let mut rounds = 0usize;
    loop {
        rounds += 1;
        if !solver.solve().map_err(|_| SolverFailure::Backend)? {
            debug!("formula unsatisfiable after {} rounds", rounds);
            return Err(SolverFailure::NoSolutionFound);
        }

        let model = solver.model().ok_or(SolverFailure::Backend)?;
        let chosen = encoding.chosen(&model);
        if chosen.is_empty() {
            return Err(SolverFailure::NoSolutionFound);
        }

        let loops = components(&chosen);
        if loops.len() == 1 {
            let mut attempt = board.clone();
            attempt.clear_lines();
            chosen.iter().for_each(|l| {
                attempt.link(*l);
            });

            if attempt.check_win() {
                debug!("single loop of {} lines after {} rounds", chosen.len(), rounds);
                chosen.iter().for_each(|l| {
                    board.link(*l);
                });
                return Ok(Solution::from_board(board));
            }
        }

        debug!("round {}: blocking {} separate loops", rounds, loops.len());
        for cycle in loops {
            let lits = cycle.iter().map(|l| encoding.vars[l].positive()).collect_vec();
            solver.add_formula(&CnfFormula::from(vec![not_all(&lits)]));
        }
    }
}
