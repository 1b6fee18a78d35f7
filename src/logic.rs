use itertools::Itertools;
use varisat::Lit;

fn invert(lit: Lit) -> Lit {
    match lit.is_negative() {
        true => lit.var().positive(),
        false => lit.var().negative(),
    }
}

/// Clauses stating that no three of `lits` hold at once.
pub(crate) fn at_most_two(lits: &[Lit]) -> Vec<Vec<Lit>> {
    // for any choice of 3 (A, B, C), at least one is false; !A + !B + !C
    lits.iter()
        .combinations(3)
        .map(|triple| triple.into_iter().map(|lit| invert(*lit)).collect_vec())
        .collect_vec()
}

/// Clauses stating that if any of `lits` holds, another one does too.
pub(crate) fn never_exactly_one(lits: &[Lit]) -> Vec<Vec<Lit>> {
    // X => Y + Z + ...
    // = !X + Y + Z + ...
    lits.iter()
        .map(|x| lits.iter()
            .map(|other| if other == x { invert(*other) } else { *other })
            .collect_vec())
        .collect_vec()
}

/// Clause stating that not all of `lits` hold.
pub(crate) fn not_all(lits: &[Lit]) -> Vec<Lit> {
    lits.iter().map(|lit| invert(*lit)).collect_vec()
}
