//! Two-match crew swap move.
//!
//! Grounded on `swap.rs` in the teacher's `solver-core/src/solver/moves/`
//! (exchanging two people between groups instead of moving one at a time,
//! which reaches states a single reassignment can't without passing through
//! a worse intermediate state).

use super::Undo;
use crate::solver::State;
use rand::seq::SliceRandom;
use rand::Rng;

/// Picks two random non-fixed matches and exchanges their crews, provided
/// each crew remains eligible for the other's match. Returns `None` if no
/// eligible pair is found within a small number of attempts.
pub fn propose(state: &mut State, rng: &mut impl Rng) -> Option<Undo> {
    let candidates: Vec<usize> = (0..state.num_matches()).filter(|&pos| !state.fixed[pos]).collect();
    if candidates.len() < 2 {
        return None;
    }
    for _ in 0..8 {
        let pos_a = *candidates.choose(rng)?;
        let pos_b = *candidates.choose(rng)?;
        if pos_a == pos_b {
            continue;
        }
        let crew_a = state.assignment[pos_a];
        let crew_b = state.assignment[pos_b];
        if crew_a == crew_b {
            continue;
        }
        if state.eligible[pos_a].contains(&crew_b) && state.eligible[pos_b].contains(&crew_a) {
            state.assignment[pos_a] = crew_b;
            state.assignment[pos_b] = crew_a;
            return Some(Undo::Swap {
                pos_a,
                pos_b,
                prev_a: crew_a,
                prev_b: crew_b,
            });
        }
    }
    None
}
