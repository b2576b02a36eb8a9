//! Single-match crew reassignment move.
//!
//! Grounded on `transfer.rs` in the teacher's `solver-core/src/solver/moves/`
//! (moving one person to a different group) — here the "group" is the crew
//! serving one match.

use super::Undo;
use crate::solver::State;
use rand::seq::SliceRandom;
use rand::Rng;

/// Picks a random non-fixed match with at least one alternative eligible
/// crew and reassigns it, returning an undo token. Returns `None` if no
/// such match exists (e.g. every match is locked or has a single eligible
/// crew).
pub fn propose(state: &mut State, rng: &mut impl Rng) -> Option<Undo> {
    let candidates: Vec<usize> = (0..state.num_matches())
        .filter(|&pos| !state.fixed[pos] && state.eligible[pos].len() > 1)
        .collect();
    let &pos = candidates.choose(rng)?;
    let current = state.assignment[pos];
    let alternatives: Vec<usize> = state.eligible[pos].iter().copied().filter(|&c| c != current).collect();
    let &new_crew = alternatives.choose(rng)?;
    state.assignment[pos] = new_crew;
    Some(Undo::Reassign { pos, prev: current })
}
