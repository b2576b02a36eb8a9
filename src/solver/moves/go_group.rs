//! Atomic GO-chain relocation move.
//!
//! U6 requires the "must share a crew" portion of same-day GO matches (see
//! `crate::solver::go_grouping`) to actually share one crew. A plain
//! reassignment can only ever move one match at a time, so it can't get from
//! one valid all-sharing-one-crew state to another without passing through
//! an intermediate state that violates U6. This move relocates the whole
//! linked chain atomically, grounded on `clique_swap.rs` in the teacher's
//! `solver-core/src/solver/moves/`, which solves the same problem for groups
//! of people that must stay together.

use super::Undo;
use crate::solver::{go_grouping, State};
use rand::seq::SliceRandom;
use rand::Rng;

/// Picks a random day with a GO chain of at least 2 matches and reassigns
/// every match in the "must share a crew" portion of that chain (see
/// [`go_grouping`]) to a single new crew eligible for all of them. The match
/// (if any) that must instead *differ* from the chain is left untouched.
/// Returns `None` if no day has such a chain, or no common eligible crew
/// exists.
pub fn propose(state: &mut State, rng: &mut impl Rng) -> Option<Undo> {
    let day_positions: Vec<usize> = (0..state.normalized.days.len())
        .filter(|&d| go_grouping(state, d).is_some_and(|g| g.equal.len() >= 2))
        .collect();
    let &day_pos = day_positions.choose(rng)?;
    let chain = go_grouping(state, day_pos)?.equal;

    let mut common: Option<std::collections::HashSet<usize>> = None;
    for &pos in &chain {
        let elig: std::collections::HashSet<usize> = state.eligible[pos].iter().copied().collect();
        common = Some(match common {
            None => elig,
            Some(prev) => prev.intersection(&elig).copied().collect(),
        });
    }
    let common = common?;
    if common.is_empty() {
        return None;
    }
    let current_shared = state.assignment[chain[0]];
    // `HashSet` iteration order depends on the process's randomly-seeded
    // hasher; sort before choosing so the move stays deterministic given a
    // seed (spec.md §5), independent of hash-seed.
    let mut choices: Vec<usize> = common.into_iter().filter(|&c| c != current_shared).collect();
    choices.sort_unstable();
    if choices.is_empty() {
        return None;
    }
    let &new_crew = choices.choose(rng)?;

    let prev: Vec<usize> = chain.iter().map(|&p| state.assignment[p]).collect();
    for &p in &chain {
        if !state.fixed[p] {
            state.assignment[p] = new_crew;
        }
    }
    Some(Undo::GoGroup { positions: chain, prev })
}
