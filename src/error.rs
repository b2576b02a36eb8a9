//! Error taxonomy for the jury assignment engine.
//!
//! `InvalidInput` and `RuleCompilationError` are fail-fast: they are raised
//! before a solve ever starts. Solver outcomes (infeasible, timed out) are
//! never errors — see [`crate::models::SolveStatus`] — so that callers can
//! distinguish "the rules contradict each other" from "we didn't have time
//! to find a good solution" without catching an exception.

use thiserror::Error;

/// Errors that can occur while constructing or compiling a [`crate::models::Problem`].
#[derive(Error, Debug, Clone, PartialEq)]
pub enum EngineError {
    /// The problem itself is malformed: an unknown id reference, a match
    /// missing required fields, overlapping locks, or misuse of the
    /// reserved `STATIC` crew id.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// A rule could not be expressed against the compiled model.
    #[error("rule {rule_id} could not be compiled: {reason}")]
    RuleCompilationError {
        /// Index of the offending rule within `Problem::rules`.
        rule_id: usize,
        /// Human-readable reason, included in logs and propagated to callers.
        reason: String,
    },

    /// A solved model violated an invariant that should be structurally
    /// unreachable (e.g. two crews both marked chosen for one match). This
    /// indicates a bug in the engine itself, not a bad input.
    #[error("internal invariant violated: {0}")]
    InternalInvariantViolation(String),
}
