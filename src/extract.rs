//! Solution Extractor: materializes a solved [`State`] into an ordered
//! [`SolveResult`].
//!
//! Grounded on `to_solver_result` in
//! `examples/guwidoe-GroupMixer/solver-core/src/solver/mod.rs`, which
//! performs the same "internal arrays -> public result type" translation
//! for its own domain.

use crate::error::EngineError;
use crate::models::{Assignment, ConflictHint, CrewId, Origin, SolveResult, SolveStatus, SolverStats, STATIC_CREW_ID};
use crate::solver::scoring::ScoreDetail;
use crate::solver::{validation, State};

pub fn extract(
    state: &State,
    detail: &ScoreDetail,
    status: SolveStatus,
    solver_stats: SolverStats,
    conflict_hint: Option<ConflictHint>,
) -> Result<SolveResult, EngineError> {
    let problems = validation::check_invariants(state);
    if !problems.is_empty() {
        return Err(EngineError::InternalInvariantViolation(problems.join("; ")));
    }

    // `state.normalized.matches` is already in I6 order (start timestamp,
    // then match id) from the Normalizer.
    let mut assignments = Vec::with_capacity(state.num_matches());
    for pos in 0..state.num_matches() {
        let m = &state.normalized.matches[pos];
        let slot = state.assignment[pos];
        let crew_id: CrewId = state.crew_id_at(slot);
        let points = points_for(state, pos);
        let origin = if m.locked_crew_id.is_some() {
            Origin::Locked
        } else if crew_id == STATIC_CREW_ID {
            Origin::Static
        } else {
            Origin::Solver
        };
        assignments.push(Assignment {
            match_id: m.id,
            crew_id,
            points,
            origin,
        });
    }

    Ok(SolveResult {
        status,
        assignments,
        per_crew_points: detail.per_crew_points.clone(),
        spread: detail.spread,
        objective_value: detail.score.soft.round() as i64,
        solver_stats,
        conflict_hint,
    })
}

fn points_for(state: &State, pos: usize) -> i64 {
    let n = state.num_matches();
    if pos == 0 || pos + 1 == n {
        state.normalized.config.points_first_last
    } else {
        state.normalized.config.points_regular
    }
}
