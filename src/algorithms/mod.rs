//! The Solver Driver's search abstraction.
//!
//! The teacher's `solver-core/src/lib.rs` calls into
//! `algorithms::simulated_annealing::SimulatedAnnealing` through an
//! `algorithms::Solver` trait that isn't present in this pack's retrieval
//! (only the call site survived). This module reconstructs that seam from
//! the call site's shape, since a from-scratch local search still benefits
//! from the same separation the teacher intended: `lib.rs` depends on the
//! trait, not on simulated annealing specifically, so a different search
//! strategy could be dropped in without touching the public `solve` entry
//! point.

pub mod simulated_annealing;

use crate::solver::scoring::Score;
use crate::solver::State;
use std::time::Duration;

/// What a [`Solver`] run found, independent of which search strategy
/// produced it.
#[derive(Debug, Clone, Copy)]
pub struct SolverOutcome {
    pub best_score: Score,
    /// Moves evaluated — the local-search analogue of CP-SAT's branch count.
    pub branches: u64,
    /// Moves rejected for introducing a new hard violation — the local
    /// search analogue of CP-SAT's conflict count.
    pub conflicts: u64,
    pub elapsed: Duration,
    /// Whether the search proved no improving move exists at all (as
    /// opposed to simply running out of time).
    pub exhausted: bool,
    /// Whether the search stopped because it converged (no improvement for
    /// the configured number of iterations) rather than being cut off by
    /// the wall-clock limit. Used to distinguish `Optimal` from `Feasible` —
    /// note that for a local search this is "no improving move found after
    /// an extended neighborhood search," not a proof that no better
    /// assignment exists (`SPEC_FULL.md` §4.5).
    pub converged: bool,
}

/// A search strategy over a [`State`]'s assignment vector.
///
/// `solve` mutates `state.assignment` in place, leaving it at the best
/// score found, and reports what happened via [`SolverOutcome`].
pub trait Solver {
    fn solve(&self, state: &mut State) -> SolverOutcome;
}
