//! Model Builder: decision variables, eligibility, and the universal
//! structural constraints U1–U7.
//!
//! Grounded on the `State` struct in
//! `examples/guwidoe-GroupMixer/solver-core/src/solver/mod.rs` (ID-mapped
//! arrays rather than hash lookups in the hot path) and on the GO/day-cap
//! branches read out of `examples/original_source/wp-juryv1.0.py`.
//!
//! Decision variables `x[m, c]` (spec.md §4.3) are represented implicitly:
//! `State::assignment[m]` holds the single crew slot index serving match
//! `m`, which structurally guarantees U1 instead of needing an explicit
//! "exactly one" constraint (see `SPEC_FULL.md` §2).

pub mod construction;
pub mod display;
pub mod moves;
pub mod scoring;
pub mod validation;

use crate::error::EngineError;
use crate::models::{CrewId, STATIC_CREW_ID};
use crate::normalize::NormalizedProblem;
use crate::rules::CompiledRules;

/// Per-match eligibility plus the current (mutable) assignment vector.
///
/// `eligible[m]` and `fixed[m]` never change after construction; only
/// `assignment` is mutated by search moves, and only at positions where
/// `fixed[m]` is `false`.
#[derive(Debug, Clone)]
pub struct State {
    pub normalized: NormalizedProblem,
    pub compiled: CompiledRules,
    /// Crew slot indices eligible for each match, by match position.
    pub eligible: Vec<Vec<usize>>,
    /// Chosen crew slot index for each match position.
    pub assignment: Vec<usize>,
    /// `true` where the match is locked or statically assigned: moves must
    /// never touch these positions.
    pub fixed: Vec<bool>,
}

impl State {
    pub fn new(normalized: NormalizedProblem, compiled: CompiledRules) -> Result<Self, EngineError> {
        let eligible = compute_eligibility(&normalized, &compiled)?;
        let n = normalized.matches.len();
        for (pos, elig) in eligible.iter().enumerate() {
            if elig.is_empty() {
                return Err(EngineError::InvalidInput(format!(
                    "match {} (position {pos}) has no eligible crew under the given rules",
                    normalized.matches[pos].id
                )));
            }
        }
        let assignment = vec![0usize; n];
        let fixed: Vec<bool> = (0..n).map(|pos| match_is_fixed(&normalized, pos)).collect();
        Ok(State {
            normalized,
            compiled,
            eligible,
            assignment,
            fixed,
        })
    }

    pub fn num_matches(&self) -> usize {
        self.normalized.matches.len()
    }

    pub fn crew_id_at(&self, crew_slot: usize) -> CrewId {
        self.normalized.crew_ids[crew_slot]
    }

    pub fn is_static_slot(&self, crew_slot: usize) -> bool {
        self.normalized.crew_ids[crew_slot] == STATIC_CREW_ID
    }
}

/// `true` if the match at `pos` is locked (I3) or statically assigned (I4),
/// i.e. its crew is fixed and no search move may touch it.
pub fn match_is_fixed(normalized: &NormalizedProblem, pos: usize) -> bool {
    let m = &normalized.matches[pos];
    m.locked_crew_id.is_some()
        || normalized.static_assignments.get(&m.home_team) == Some(&STATIC_CREW_ID)
}

/// Sibling D1/D2 team name, if `name` ends in " Da1" or " Da2" (U7).
pub(crate) fn d_sibling(name: &str) -> Option<String> {
    if let Some(base) = name.strip_suffix(" Da1") {
        Some(format!("{base} Da2"))
    } else {
        name.strip_suffix(" Da2").map(|base| format!("{base} Da1"))
    }
}

/// U6 GO-match grouping for one day: the match positions that must share one
/// crew, and, for the configurations that call for it, the position whose
/// crew must differ from that shared crew.
///
/// Grounded on `add_go_matches_constraint` in
/// `examples/original_source/wp-juryv1.0.py`, which keys every branch off
/// contiguous runs of GO matches sharing an identical start time rather than
/// "any day with 2-4 GO matches": a chain is only formed where an actual
/// same-time adjacency exists, and some configurations (e.g. three GO
/// matches at three distinct times) impose no constraint at all.
pub(crate) struct GoGrouping {
    pub equal: Vec<usize>,
    pub differs_from_equal: Option<usize>,
}

pub(crate) fn go_grouping(state: &State, day_pos: usize) -> Option<GoGrouping> {
    let positions = &state.normalized.days[day_pos].match_positions;
    let go_positions: Vec<usize> = positions
        .iter()
        .copied()
        .filter(|&p| state.normalized.matches[p].is_go_match())
        .collect();
    let k = go_positions.len();
    if k < 2 {
        return None;
    }

    let time = |i: usize| state.normalized.matches[go_positions[i]].start;
    let groups = contiguous_time_groups(state, &go_positions);

    match k {
        2 => Some(GoGrouping { equal: go_positions, differs_from_equal: None }),
        3 => {
            if groups.len() == 3 {
                // All three at distinct start times: no adjacency to chain on.
                None
            } else {
                Some(GoGrouping { equal: go_positions, differs_from_equal: None })
            }
        }
        4 => {
            if groups.len() == 2 && groups[0].len() == 2 && groups[1].len() == 2 {
                // Two same-start pairs: the whole day shares one crew.
                Some(GoGrouping { equal: go_positions, differs_from_equal: None })
            } else if groups.len() == 3 && groups[0].len() == 2 {
                // Only the first pair shares a start time: chain through the
                // third match, and the fourth must go to a different crew.
                Some(GoGrouping {
                    equal: vec![go_positions[0], go_positions[1], go_positions[2]],
                    differs_from_equal: Some(go_positions[3]),
                })
            } else {
                None
            }
        }
        _ => {
            // k >= 5.
            if groups.len() >= 2 && groups[0].len() == 2 && groups[1].len() == 2 {
                // go0==go1 and go2==go3: chain the first four, fifth differs.
                Some(GoGrouping {
                    equal: go_positions[0..4].to_vec(),
                    differs_from_equal: Some(go_positions[4]),
                })
            } else if (time(0) == time(1) && time(2) != time(3))
                || (time(0) != time(1) && time(2) == time(3))
                || (time(0) != time(1) && time(1) == time(2))
            {
                Some(GoGrouping { equal: go_positions[0..4].to_vec(), differs_from_equal: None })
            } else {
                None
            }
        }
    }
}

/// Partitions `go_positions` (already in start-time order) into maximal runs
/// of consecutive matches sharing an identical start time.
fn contiguous_time_groups(state: &State, go_positions: &[usize]) -> Vec<Vec<usize>> {
    let mut groups: Vec<Vec<usize>> = Vec::new();
    for &pos in go_positions {
        let t = state.normalized.matches[pos].start;
        let same_as_last = groups
            .last()
            .and_then(|g| g.last())
            .is_some_and(|&last_pos| state.normalized.matches[last_pos].start == t);
        if same_as_last {
            groups.last_mut().unwrap().push(pos);
        } else {
            groups.push(vec![pos]);
        }
    }
    groups
}

/// Computes the per-match eligible crew-slot list: I2 (own match), I3
/// (locked), I4 (static), U7 (D1/D2 exclusion).
///
/// These four are structural properties of the model itself — whether a
/// crew is one of the two teams in a match is fixed independently of any
/// user-supplied rule — so a match with zero eligible slots here means the
/// model as stated has no valid crew at all, and `State::new` fails fast
/// with `InvalidInput` (`spec.md` §7: "malformed match").
///
/// `CrewUnavailable` and `DedicatedCrew`, by contrast, are ordinary rules a
/// caller supplies and can get wrong: a match with no crew satisfying them
/// is a *solver*-level infeasibility (`spec.md` §8, scenario 6), not a
/// malformed model, so they are scored as hard violations in `scoring.rs`
/// alongside U2–U6, `RestBetweenMatches`, and `MaxDutiesPerPeriod` instead
/// of being pre-filtered out of eligibility here.
fn compute_eligibility(
    normalized: &NormalizedProblem,
    _compiled: &CompiledRules,
) -> Result<Vec<Vec<usize>>, EngineError> {
    let n = normalized.matches.len();
    let num_crews = normalized.crew_ids.len();
    let static_slot = normalized.static_index();

    let mut eligible: Vec<Vec<usize>> = Vec::with_capacity(n);

    for m in normalized.matches.iter() {
        if let Some(locked) = m.locked_crew_id {
            let slot = *normalized.crew_index.get(&locked).ok_or_else(|| {
                EngineError::InvalidInput(format!("match {} locked to unknown crew {locked}", m.id))
            })?;
            eligible.push(vec![slot]);
            continue;
        }
        if normalized.static_assignments.get(&m.home_team) == Some(&crate::models::STATIC_CREW_ID) {
            eligible.push(vec![static_slot]);
            continue;
        }

        let mut slots = Vec::with_capacity(num_crews);
        for (slot, crew) in normalized.crews.iter().enumerate() {
            // I2: crew cannot jury its own match.
            if m.involves_team(&crew.name) {
                continue;
            }
            // U7: D1/D2 sibling exclusion.
            if let Some(sibling) = d_sibling(&crew.name) {
                if m.involves_team(&sibling) {
                    continue;
                }
            }
            slots.push(slot);
        }
        eligible.push(slots);
    }

    Ok(eligible)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::*;
    use crate::normalize::normalize;
    use crate::rules::compile;
    use std::collections::HashMap;

    #[test]
    fn d_sibling_round_trips() {
        assert_eq!(d_sibling("Lions Da1").as_deref(), Some("Lions Da2"));
        assert_eq!(d_sibling("Lions Da2").as_deref(), Some("Lions Da1"));
        assert_eq!(d_sibling("Lions"), None);
    }

    fn go_match(id: i64, time: &str, home: &str, away: &str) -> Match {
        Match {
            id,
            start: format!("2025-01-04T{time}:00").parse().unwrap(),
            home_team: home.to_string(),
            away_team: away.to_string(),
            competition: "GO Youth Cup".to_string(),
            venue: "A".to_string(),
            locked_crew_id: None,
        }
    }

    fn state_for(matches: Vec<Match>) -> State {
        let problem = Problem {
            window: Window {
                start_date: "2025-01-01".parse().unwrap(),
                end_date: "2025-01-31".parse().unwrap(),
            },
            crews: (1..=4)
                .map(|id| JuryTeam {
                    id,
                    name: format!("Crew{id}"),
                    active: true,
                    dedicated_to_team: None,
                    capacity_weight: 1.0,
                })
                .collect(),
            matches,
            static_assignments: HashMap::new(),
            rules: vec![],
            config: Config::default(),
        };
        let normalized = normalize(&problem).unwrap();
        let compiled = compile(&problem.rules, &normalized).unwrap();
        State::new(normalized, compiled).unwrap()
    }

    #[test]
    fn three_go_matches_at_distinct_times_have_no_grouping() {
        let state = state_for(vec![
            go_match(1, "10:00", "A", "B"),
            go_match(2, "11:00", "C", "D"),
            go_match(3, "12:00", "E", "F"),
        ]);
        assert!(go_grouping(&state, 0).is_none());
    }

    #[test]
    fn three_go_matches_with_one_shared_start_chain_all_three() {
        let state = state_for(vec![
            go_match(1, "10:00", "A", "B"),
            go_match(2, "10:00", "C", "D"),
            go_match(3, "12:00", "E", "F"),
        ]);
        let grouping = go_grouping(&state, 0).unwrap();
        assert_eq!(grouping.equal.len(), 3);
        assert_eq!(grouping.differs_from_equal, None);
    }

    #[test]
    fn four_go_matches_two_same_start_pairs_chain_all_four() {
        let state = state_for(vec![
            go_match(1, "10:00", "A", "B"),
            go_match(2, "10:00", "C", "D"),
            go_match(3, "12:00", "E", "F"),
            go_match(4, "12:00", "G", "H"),
        ]);
        let grouping = go_grouping(&state, 0).unwrap();
        assert_eq!(grouping.equal.len(), 4);
        assert_eq!(grouping.differs_from_equal, None);
    }

    #[test]
    fn four_go_matches_one_shared_pair_chains_three_and_last_must_differ() {
        let state = state_for(vec![
            go_match(1, "10:00", "A", "B"),
            go_match(2, "10:00", "C", "D"),
            go_match(3, "11:00", "E", "F"),
            go_match(4, "12:00", "G", "H"),
        ]);
        let grouping = go_grouping(&state, 0).unwrap();
        assert_eq!(grouping.equal.len(), 3);
        assert_eq!(grouping.differs_from_equal, Some(3));
    }
}
