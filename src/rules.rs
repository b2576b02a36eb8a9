//! Rule Compiler: expands the closed, tagged [`Rule`] variants into the
//! constraint/objective data consumed by the Model Builder (`src/solver/`).
//!
//! Unlike the Python predecessor's free-form `constraint_type: String`
//! dispatch (`examples/original_source/planning_engine/rule_manager.py`),
//! `Rule` is a closed enum: an unrecognized rule can't reach this stage at
//! all, it is rejected by serde at deserialization time. What remains to
//! compile here is "is this particular rule internally consistent" (e.g.
//! `period_days > 0`), not "is this a rule we understand." A rule naming an
//! unknown crew or team is a different kind of problem — malformed input,
//! not an uncompilable rule — so those checks raise `InvalidInput` rather
//! than `RuleCompilationError` (see `require_known_crew`).
//!
//! `weight` and `active` are inlined directly on the variants that use
//! them, the way the teacher's own `Constraint` enum inlines
//! `penalty_weight` on `ShouldStayTogether`/`ShouldNotBeTogether` rather
//! than hoisting it into a wrapper struct flattened over the tag
//! (`examples/guwidoe-GroupMixer/solver-core/src/models.rs`). A wrapper
//! struct flattening an internally-tagged enum is a fragile serde
//! combination; following the teacher's precedent avoids it entirely.

use crate::error::EngineError;
use crate::models::CrewId;
use crate::normalize::NormalizedProblem;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

fn default_weight() -> i64 {
    1
}

fn default_true() -> bool {
    true
}

fn default_strength() -> f64 {
    1.0
}

/// One rule, tagged by `type` in serialized form.
///
/// Variants that are always hard or always soft (per the table in
/// `spec.md` §4.2) carry only `active`. `MaxDutiesPerPeriod` carries
/// `weight` as well: `weight == `[`crate::models::FORBIDDEN_WEIGHT`]
/// requests hard enforcement, any other value makes it a soft penalty of
/// that magnitude. The remaining soft-only kinds (`AvoidDates`,
/// `PreferDates`, `AvoidOpponent`, `AvoidConsecutiveMatches`) carry
/// `weight` as their penalty scale.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type")]
pub enum Rule {
    CrewUnavailable {
        crew: CrewId,
        date: NaiveDate,
        #[serde(default)]
        note: Option<String>,
        #[serde(default = "default_true")]
        active: bool,
    },
    MaxDutiesPerPeriod {
        crew: CrewId,
        max: u32,
        period_days: u32,
        #[serde(default = "default_weight")]
        weight: i64,
        #[serde(default = "default_true")]
        active: bool,
    },
    RestBetweenMatches {
        #[serde(default)]
        crew: Option<CrewId>,
        min_rest_days: u32,
        #[serde(default = "default_true")]
        active: bool,
    },
    DedicatedCrew {
        crew: CrewId,
        serves_team: String,
        #[serde(default)]
        last_match_exception: bool,
        #[serde(default = "default_true")]
        active: bool,
    },
    /// Retained for schema completeness; see `compile` for why this is a
    /// no-op against the current data model (`Match` carries no duty type).
    PreferredDuty {
        crew: CrewId,
        duty: String,
        #[serde(default = "default_strength")]
        strength: f64,
        #[serde(default = "default_true")]
        active: bool,
    },
    AvoidDates {
        crew: CrewId,
        dates: Vec<NaiveDate>,
        #[serde(default)]
        note: Option<String>,
        #[serde(default = "default_weight")]
        weight: i64,
        #[serde(default = "default_true")]
        active: bool,
    },
    PreferDates {
        crew: CrewId,
        dates: Vec<NaiveDate>,
        #[serde(default)]
        note: Option<String>,
        #[serde(default = "default_weight")]
        weight: i64,
        #[serde(default = "default_true")]
        active: bool,
    },
    AvoidOpponent {
        crew: CrewId,
        opponent_team: String,
        #[serde(default)]
        note: Option<String>,
        #[serde(default = "default_weight")]
        weight: i64,
        #[serde(default = "default_true")]
        active: bool,
    },
    AvoidConsecutiveMatches {
        #[serde(default)]
        crew: Option<CrewId>,
        max_consecutive: u32,
        #[serde(default = "default_weight")]
        weight: i64,
        #[serde(default = "default_true")]
        active: bool,
    },
}

impl Rule {
    /// Whether this rule participates in compilation at all. Inactive
    /// rules are skipped by [`compile`] rather than compiled and then
    /// filtered, so they can never leak into `CompiledRules`.
    pub fn active(&self) -> bool {
        match self {
            Rule::CrewUnavailable { active, .. }
            | Rule::MaxDutiesPerPeriod { active, .. }
            | Rule::RestBetweenMatches { active, .. }
            | Rule::DedicatedCrew { active, .. }
            | Rule::PreferredDuty { active, .. }
            | Rule::AvoidDates { active, .. }
            | Rule::PreferDates { active, .. }
            | Rule::AvoidOpponent { active, .. }
            | Rule::AvoidConsecutiveMatches { active, .. } => *active,
        }
    }
}

/// A rolling-window duty cap, hard or soft per §4.2.
#[derive(Debug, Clone)]
pub struct MaxDutiesRule {
    pub crew: CrewId,
    pub max: u32,
    pub period_days: u32,
    pub hard: bool,
    pub weight: i64,
}

#[derive(Debug, Clone)]
pub struct RestRule {
    pub crew: Option<CrewId>,
    pub min_rest_days: u32,
}

#[derive(Debug, Clone)]
pub struct DedicatedCrewRule {
    pub crew: CrewId,
    pub serves_team: String,
    pub last_match_exception: bool,
}

#[derive(Debug, Clone)]
pub struct WeightedDates {
    pub crew: CrewId,
    pub dates: HashSet<NaiveDate>,
    pub weight: i64,
}

#[derive(Debug, Clone)]
pub struct AvoidOpponentRule {
    pub crew: CrewId,
    pub opponent_team: String,
    pub weight: i64,
}

#[derive(Debug, Clone)]
pub struct AvoidConsecutiveRule {
    pub crew: Option<CrewId>,
    pub max_consecutive: u32,
    pub weight: i64,
}

/// Output of [`compile`]: every active rule, sorted into the shape the
/// Model Builder and scorer consume directly.
#[derive(Debug, Clone, Default)]
pub struct CompiledRules {
    /// crew -> dates it cannot jury at all.
    pub crew_unavailable: HashMap<CrewId, HashSet<NaiveDate>>,
    pub max_duties: Vec<MaxDutiesRule>,
    pub rest_between: Vec<RestRule>,
    pub dedicated_crew: Vec<DedicatedCrewRule>,
    pub avoid_dates: Vec<WeightedDates>,
    pub prefer_dates: Vec<WeightedDates>,
    pub avoid_opponent: Vec<AvoidOpponentRule>,
    pub avoid_consecutive: Vec<AvoidConsecutiveRule>,
}

/// Compiles `rules` against an already-normalized problem.
///
/// Fails fast with [`EngineError::RuleCompilationError`] rather than
/// dropping a malformed rule silently (§4.2: "the engine aborts rather than
/// silently dropping a hard rule").
pub fn compile(rules: &[Rule], normalized: &NormalizedProblem) -> Result<CompiledRules, EngineError> {
    let mut out = CompiledRules::default();

    for (rule_id, rule) in rules.iter().enumerate() {
        if !rule.active() {
            continue;
        }
        match rule {
            Rule::CrewUnavailable { crew, date, .. } => {
                require_known_crew(normalized, rule_id, *crew)?;
                out.crew_unavailable.entry(*crew).or_default().insert(*date);
            }
            Rule::MaxDutiesPerPeriod {
                crew,
                max,
                period_days,
                weight,
                ..
            } => {
                require_known_crew(normalized, rule_id, *crew)?;
                if *period_days == 0 {
                    return Err(EngineError::RuleCompilationError {
                        rule_id,
                        reason: "period_days must be positive".to_string(),
                    });
                }
                let hard = *weight == crate::models::FORBIDDEN_WEIGHT;
                if !hard {
                    log::warn!(
                        "rule {rule_id}: MaxDutiesPerPeriod for crew {crew} compiled as soft (weight {weight})"
                    );
                }
                out.max_duties.push(MaxDutiesRule {
                    crew: *crew,
                    max: *max,
                    period_days: *period_days,
                    hard,
                    weight: *weight,
                });
            }
            Rule::RestBetweenMatches { crew, min_rest_days, .. } => {
                if let Some(c) = crew {
                    require_known_crew(normalized, rule_id, *c)?;
                }
                out.rest_between.push(RestRule {
                    crew: *crew,
                    min_rest_days: *min_rest_days,
                });
            }
            Rule::DedicatedCrew {
                crew,
                serves_team,
                last_match_exception,
                ..
            } => {
                require_known_crew(normalized, rule_id, *crew)?;
                if !normalized.known_teams.contains(serves_team) {
                    return Err(EngineError::InvalidInput(format!(
                        "rule {rule_id} references unknown team '{serves_team}'"
                    )));
                }
                out.dedicated_crew.push(DedicatedCrewRule {
                    crew: *crew,
                    serves_team: serves_team.clone(),
                    last_match_exception: *last_match_exception,
                });
            }
            Rule::PreferredDuty { crew, .. } => {
                require_known_crew(normalized, rule_id, *crew)?;
                // `Match` carries no per-duty-type distinction in this data
                // model (spec.md §4.2: "retained only if duty distinctions
                // exist in the input"). There are none, so this compiles to
                // a no-op rather than inventing a duty taxonomy nothing else
                // in the model uses.
                log::debug!("rule {rule_id}: PreferredDuty has no effect, matches carry no duty type");
            }
            Rule::AvoidDates { crew, dates, weight, .. } => {
                require_known_crew(normalized, rule_id, *crew)?;
                out.avoid_dates.push(WeightedDates {
                    crew: *crew,
                    dates: dates.iter().copied().collect(),
                    weight: *weight,
                });
            }
            Rule::PreferDates { crew, dates, weight, .. } => {
                require_known_crew(normalized, rule_id, *crew)?;
                out.prefer_dates.push(WeightedDates {
                    crew: *crew,
                    dates: dates.iter().copied().collect(),
                    weight: *weight,
                });
            }
            Rule::AvoidOpponent {
                crew,
                opponent_team,
                weight,
                ..
            } => {
                require_known_crew(normalized, rule_id, *crew)?;
                out.avoid_opponent.push(AvoidOpponentRule {
                    crew: *crew,
                    opponent_team: opponent_team.clone(),
                    weight: *weight,
                });
            }
            Rule::AvoidConsecutiveMatches {
                crew,
                max_consecutive,
                weight,
                ..
            } => {
                if let Some(c) = crew {
                    require_known_crew(normalized, rule_id, *c)?;
                }
                out.avoid_consecutive.push(AvoidConsecutiveRule {
                    crew: *crew,
                    max_consecutive: *max_consecutive,
                    weight: *weight,
                });
            }
        }
    }

    Ok(out)
}

/// A rule naming an unknown crew is a malformed-input problem, not a rule
/// the compiler can't express (`spec.md` §4.1: "Fails with `InvalidInput`
/// if any rule references an unknown crew or team" — the Input Normalizer's
/// documented responsibility, not the Rule Compiler's).
fn require_known_crew(normalized: &NormalizedProblem, rule_id: usize, crew: CrewId) -> Result<(), EngineError> {
    if normalized.crew_index.contains_key(&crew) {
        Ok(())
    } else {
        Err(EngineError::InvalidInput(format!("rule {rule_id} references unknown crew id {crew}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::*;

    fn base_problem() -> Problem {
        Problem {
            window: Window {
                start_date: NaiveDate::from_ymd_opt(2025, 1, 1).unwrap(),
                end_date: NaiveDate::from_ymd_opt(2025, 1, 31).unwrap(),
            },
            crews: vec![JuryTeam {
                id: 1,
                name: "Lions".to_string(),
                active: true,
                dedicated_to_team: None,
                capacity_weight: 1.0,
            }],
            matches: vec![],
            static_assignments: HashMap::new(),
            rules: vec![],
            config: Config::default(),
        }
    }

    #[test]
    fn rejects_non_positive_period_days() {
        let problem = base_problem();
        let normalized = crate::normalize::normalize(&problem).unwrap();
        let rules = vec![Rule::MaxDutiesPerPeriod {
            crew: 1,
            max: 2,
            period_days: 0,
            weight: 1,
            active: true,
        }];
        let err = compile(&rules, &normalized).unwrap_err();
        assert!(matches!(err, EngineError::RuleCompilationError { rule_id: 0, .. }));
    }

    #[test]
    fn rejects_unknown_crew() {
        let problem = base_problem();
        let normalized = crate::normalize::normalize(&problem).unwrap();
        let rules = vec![Rule::CrewUnavailable {
            crew: 999,
            date: NaiveDate::from_ymd_opt(2025, 1, 4).unwrap(),
            note: None,
            active: true,
        }];
        let err = compile(&rules, &normalized).unwrap_err();
        assert!(matches!(err, EngineError::InvalidInput(_)));
    }

    #[test]
    fn rejects_unknown_served_team() {
        let problem = base_problem();
        let normalized = crate::normalize::normalize(&problem).unwrap();
        let rules = vec![Rule::DedicatedCrew {
            crew: 1,
            serves_team: "Unknown Team".to_string(),
            last_match_exception: false,
            active: true,
        }];
        let err = compile(&rules, &normalized).unwrap_err();
        assert!(matches!(err, EngineError::InvalidInput(_)));
    }

    #[test]
    fn inactive_rules_are_skipped() {
        let problem = base_problem();
        let normalized = crate::normalize::normalize(&problem).unwrap();
        let rules = vec![Rule::CrewUnavailable {
            crew: 1,
            date: NaiveDate::from_ymd_opt(2025, 1, 4).unwrap(),
            note: None,
            active: false,
        }];
        let compiled = compile(&rules, &normalized).unwrap();
        assert!(compiled.crew_unavailable.is_empty());
    }

    #[test]
    fn max_duties_forbidden_weight_compiles_hard() {
        let problem = base_problem();
        let normalized = crate::normalize::normalize(&problem).unwrap();
        let rules = vec![Rule::MaxDutiesPerPeriod {
            crew: 1,
            max: 2,
            period_days: 7,
            weight: FORBIDDEN_WEIGHT,
            active: true,
        }];
        let compiled = compile(&rules, &normalized).unwrap();
        assert!(compiled.max_duties[0].hard);
    }
}
