//! Search moves: the local-search analogue of CP-SAT's own branching
//! heuristics (`SPEC_FULL.md` §2), grounded on
//! `examples/guwidoe-GroupMixer/solver-core/src/solver/moves/`.
//!
//! Every move mutates [`State::assignment`] in place and returns an undo
//! token so the caller (the simulated-annealing driver in
//! `crate::algorithms::simulated_annealing`) can revert a rejected move
//! without re-deriving the previous state.

pub mod go_group;
pub mod reassign;
pub mod swap;

use super::State;

/// What changed, so a rejected move can be undone exactly.
#[derive(Debug, Clone)]
pub enum Undo {
    Reassign { pos: usize, prev: usize },
    Swap { pos_a: usize, pos_b: usize, prev_a: usize, prev_b: usize },
    GoGroup { positions: Vec<usize>, prev: Vec<usize> },
}

pub fn revert(state: &mut State, undo: Undo) {
    match undo {
        Undo::Reassign { pos, prev } => state.assignment[pos] = prev,
        Undo::Swap { pos_a, pos_b, prev_a, prev_b } => {
            state.assignment[pos_a] = prev_a;
            state.assignment[pos_b] = prev_b;
        }
        Undo::GoGroup { positions, prev } => {
            for (pos, crew) in positions.into_iter().zip(prev) {
                state.assignment[pos] = crew;
            }
        }
    }
}
