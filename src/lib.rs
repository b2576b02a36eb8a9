//! Constraint-based jury (table-officiating crew) assignment engine.
//!
//! The crate exposes one operation, [`solve`], which runs the full
//! pipeline from `spec.md` §2: normalize the input, compile its rules,
//! build the model, search for an assignment, and extract the result.
//! Everything else in this crate is a named implementation detail of that
//! one call.
//!
//! Grounded on `run_solver` in
//! `examples/guwidoe-GroupMixer/solver-core/src/lib.rs`, adapted to this
//! crate's own pipeline stages and to logging directly via the `log`
//! crate rather than through a progress-callback, since there is no CLI
//! here to render one (`SPEC_FULL.md` §6).

pub mod algorithms;
pub mod error;
pub mod extract;
pub mod models;
pub mod normalize;
pub mod rules;
pub mod solver;

use algorithms::simulated_annealing::SimulatedAnnealing;
use algorithms::Solver;
use error::EngineError;
use models::{ConflictHint, Problem, SolveResult, SolveStatus, SolverStats};
use std::time::{Duration, Instant};

/// Runs the assignment engine over `problem` and returns a typed result.
///
/// `InvalidInput` and `RuleCompilationError` are the only error cases
/// (`spec.md` §7); every other outcome, including infeasibility and
/// running out of time, comes back as a `SolveResult` with the
/// appropriate `status`.
pub fn solve(problem: &Problem) -> Result<SolveResult, EngineError> {
    let start = Instant::now();
    log::info!(
        "solve: {} matches, {} crews, {} rules, seed={}",
        problem.matches.len(),
        problem.crews.len(),
        problem.rules.len(),
        problem.config.seed
    );

    let normalized = normalize::normalize(problem)?;
    let compiled = rules::compile(&problem.rules, &normalized)?;
    let mut state = solver::State::new(normalized, compiled)?;
    solver::construction::construct(&mut state, problem.config.seed);

    let driver = SimulatedAnnealing::new(problem.config.seed, problem.config.time_limit_seconds);
    let outcome = driver.solve(&mut state);

    let mut detail = solver::scoring::compute(&state, problem.config.seed);
    let mut conflict_hint = None;
    let status = if detail.score.is_feasible() {
        if outcome.converged {
            // "Optimal" here means the local search converged (no improving
            // move found after an extended neighborhood search), not a
            // proved global optimum — see SPEC_FULL.md §4.5.
            SolveStatus::Optimal
        } else {
            SolveStatus::Feasible
        }
    } else {
        let remaining = problem
            .config
            .time_limit_seconds
            .saturating_sub(start.elapsed().as_secs());
        let diagnostic_budget = Duration::from_secs(remaining.min(5).max(1));
        log::warn!(
            "solve: {} hard violations remain, re-running with soft penalties disabled to classify infeasibility",
            detail.score.hard
        );
        let diagnosis = driver.diagnose(&mut state, diagnostic_budget);
        detail = solver::scoring::compute(&state, problem.config.seed);
        if diagnosis.best_score.hard == 0 {
            conflict_hint = Some(ConflictHint::NoFeasibleWithinTime);
            SolveStatus::Unknown
        } else {
            conflict_hint = Some(ConflictHint::HardRulesContradict);
            SolveStatus::Infeasible
        }
    };

    let solver_stats = SolverStats {
        wall_time_seconds: start.elapsed().as_secs_f64(),
        branches: outcome.branches,
        conflicts: outcome.conflicts,
    };

    log::info!(
        "solve: status={:?} hard={} soft={:.2} spread={} elapsed={:.2}s",
        status,
        detail.score.hard,
        detail.score.soft,
        detail.spread,
        solver_stats.wall_time_seconds
    );

    match status {
        SolveStatus::Infeasible => Ok(SolveResult {
            status,
            assignments: Vec::new(),
            per_crew_points: Default::default(),
            spread: 0,
            objective_value: 0,
            solver_stats,
            conflict_hint,
        }),
        _ => extract::extract(&state, &detail, status, solver_stats, conflict_hint),
    }
}
