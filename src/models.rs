//! Data model and types for the jury assignment engine.
//!
//! This module contains the public data structures used to describe a
//! season's jury-assignment problem, configure the solver, and read back
//! results. Every type here derives `Serialize`/`Deserialize` so that
//! external collaborators (the Flask API, CLI, storage layer mentioned in
//! the project's design notes) can move these values across a process
//! boundary; the engine itself never does any I/O with them.

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Identifier for a jury team ("crew"). Crew ids are unique within a
/// [`Problem`]; see [`STATIC_CREW_ID`] for the one reserved value.
pub type CrewId = i64;

/// Identifier for a match. Match ids are unique within a [`Problem`].
pub type MatchId = i64;

/// Reserved crew id for externally pre-known "static" crews (see
/// [`Problem::static_assignments`]). Never produced by the solver itself.
pub const STATIC_CREW_ID: CrewId = 99;

/// Sentinel rule weight requesting hard enforcement, used by
/// [`crate::rules::Rule::MaxDutiesPerPeriod`] (`spec.md` §4.2:
/// "Hard if weight = FORBIDDEN else soft").
pub const FORBIDDEN_WEIGHT: i64 = i64::MIN;

fn default_true() -> bool {
    true
}

/// A jury team available to officiate matches.
///
/// Immutable within one solve. `dedicated_to_team`, when set, doesn't by
/// itself restrict assignment — that restriction is expressed by a
/// [`crate::rules::Rule::DedicatedCrew`] rule naming this crew; the
/// field here is only a convenience the rule compiler may cross-check
/// against.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct JuryTeam {
    pub id: CrewId,
    pub name: String,
    #[serde(default = "default_true")]
    pub active: bool,
    #[serde(default)]
    pub dedicated_to_team: Option<String>,
    #[serde(default = "default_capacity_weight")]
    pub capacity_weight: f64,
}

fn default_capacity_weight() -> f64 {
    1.0
}

/// A home match requiring one jury crew.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Match {
    pub id: MatchId,
    pub start: NaiveDateTime,
    pub home_team: String,
    pub away_team: String,
    pub competition: String,
    pub venue: String,
    /// If set, the solver must return this crew for this match (I3).
    #[serde(default)]
    pub locked_crew_id: Option<CrewId>,
}

impl Match {
    /// Whether this match's competition label marks it as a "GO"
    /// (youth-series) match — case-insensitive substring match on "go",
    /// per `spec.md` §4.3 (U6).
    pub fn is_go_match(&self) -> bool {
        self.competition.to_lowercase().contains("go")
    }

    /// `true` if `team_name` is either side of this match.
    pub fn involves_team(&self, team_name: &str) -> bool {
        self.home_team == team_name || self.away_team == team_name
    }
}

/// Inclusive planning window.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct Window {
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
}

/// Solver configuration. Field defaults match `spec.md` §6.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Config {
    #[serde(default = "default_time_limit")]
    pub time_limit_seconds: u64,
    #[serde(default)]
    pub seed: u64,
    #[serde(default = "default_max_duties_per_day")]
    pub default_max_duties_per_day: u32,
    #[serde(default = "default_points_first_last")]
    pub points_first_last: i64,
    #[serde(default = "default_points_regular")]
    pub points_regular: i64,
}

fn default_time_limit() -> u64 {
    300
}
fn default_max_duties_per_day() -> u32 {
    3
}
fn default_points_first_last() -> i64 {
    15
}
fn default_points_regular() -> i64 {
    10
}

impl Default for Config {
    fn default() -> Self {
        Config {
            time_limit_seconds: default_time_limit(),
            seed: 0,
            default_max_duties_per_day: default_max_duties_per_day(),
            points_first_last: default_points_first_last(),
            points_regular: default_points_regular(),
        }
    }
}

/// The complete, immutable input to one [`crate::solve`] call.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Problem {
    pub window: Window,
    pub crews: Vec<JuryTeam>,
    pub matches: Vec<Match>,
    /// home-team display name → `STATIC_CREW_ID` (always `STATIC_CREW_ID`;
    /// kept as a map rather than a set so that a malformed value pointing
    /// elsewhere can be rejected by the Normalizer instead of silently
    /// coerced).
    #[serde(default)]
    pub static_assignments: HashMap<String, CrewId>,
    #[serde(default)]
    pub rules: Vec<crate::rules::Rule>,
    #[serde(default)]
    pub config: Config,
}

/// Where a returned [`Assignment`] came from.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Origin {
    Solver,
    Locked,
    Static,
}

/// One (match, crew) binding in a [`SolveResult`].
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Assignment {
    pub match_id: MatchId,
    pub crew_id: CrewId,
    pub points: i64,
    pub origin: Origin,
}

/// Outcome of a solve attempt, mirroring CP-SAT's own status vocabulary.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum SolveStatus {
    /// The search converged: no improving move was found after an extended
    /// neighborhood search. For this engine's local-search solver that is a
    /// convergence signal, not a proof that no better assignment exists
    /// (`SPEC_FULL.md` §4.5).
    Optimal,
    /// A hard-rule-respecting solution was found but the time limit expired
    /// before optimality could be confirmed.
    Feasible,
    /// No hard-rule-respecting solution exists.
    Infeasible,
    /// The time limit expired before any hard-rule-respecting solution was
    /// found (search may resume with more time; `assignments` may be empty).
    Unknown,
}

/// Distinguishes *why* a solve came back infeasible, per `spec.md` §4.5.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ConflictHint {
    /// Even with every soft penalty disabled, no assignment satisfies every
    /// hard rule: the hard rules themselves contradict.
    HardRulesContradict,
    /// A hard-rule-respecting solution likely exists, but the search
    /// couldn't find one (or confirm there isn't one) within the time
    /// limit.
    NoFeasibleWithinTime,
}

/// Solver diagnostics, analogous to CP-SAT's own solve statistics.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct SolverStats {
    pub wall_time_seconds: f64,
    /// Candidate moves evaluated during search — the local-search analogue
    /// of CP-SAT's branch count (see `SPEC_FULL.md` §4.5).
    pub branches: u64,
    /// Moves rejected because they would introduce a hard-rule violation —
    /// the local-search analogue of CP-SAT's conflict count.
    pub conflicts: u64,
}

/// Result of a [`crate::solve`] call.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SolveResult {
    pub status: SolveStatus,
    /// Ordered by (match start timestamp, match id) — invariant I6.
    pub assignments: Vec<Assignment>,
    pub per_crew_points: HashMap<CrewId, i64>,
    pub spread: i64,
    pub objective_value: i64,
    pub solver_stats: SolverStats,
    #[serde(default)]
    pub conflict_hint: Option<ConflictHint>,
}
