//! Initial assignment construction.
//!
//! Grounded on `State::new`'s construction pass in
//! `examples/guwidoe-GroupMixer/solver-core/src/solver/construction.rs`,
//! which seeds every person into a starting group via a seeded shuffle
//! before local search begins; here every match gets a uniformly random
//! eligible crew, seeded the same way, so that `solve()` is deterministic
//! given a seed (spec.md §5) from the very first state onward.

use super::State;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

/// Fills `state.assignment` for every position: the single eligible slot
/// for fixed (locked/static) positions, and a seeded-random eligible slot
/// for every other position.
pub fn construct(state: &mut State, seed: u64) {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    for pos in 0..state.num_matches() {
        let choices = &state.eligible[pos];
        let chosen = if state.fixed[pos] {
            choices[0]
        } else {
            *choices.choose(&mut rng).expect("eligibility is validated non-empty in State::new")
        };
        state.assignment[pos] = chosen;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::*;
    use crate::normalize::normalize;
    use crate::rules::compile;
    use chrono::NaiveDate;
    use std::collections::HashMap;

    #[test]
    fn construction_is_deterministic_given_seed() {
        let problem = Problem {
            window: Window {
                start_date: NaiveDate::from_ymd_opt(2025, 1, 1).unwrap(),
                end_date: NaiveDate::from_ymd_opt(2025, 1, 31).unwrap(),
            },
            crews: vec![
                JuryTeam {
                    id: 1,
                    name: "Lions".to_string(),
                    active: true,
                    dedicated_to_team: None,
                    capacity_weight: 1.0,
                },
                JuryTeam {
                    id: 2,
                    name: "Eagles".to_string(),
                    active: true,
                    dedicated_to_team: None,
                    capacity_weight: 1.0,
                },
            ],
            matches: vec![Match {
                id: 1,
                start: "2025-01-04T10:00:00".parse::<chrono::NaiveDateTime>().unwrap(),
                home_team: "Tigers".to_string(),
                away_team: "Bears".to_string(),
                competition: "League".to_string(),
                venue: "A".to_string(),
                locked_crew_id: None,
            }],
            static_assignments: HashMap::new(),
            rules: vec![],
            config: Config::default(),
        };
        let normalized = normalize(&problem).unwrap();
        let compiled = compile(&problem.rules, &normalized).unwrap();

        let mut a = State::new(normalized.clone(), compiled.clone()).unwrap();
        let mut b = State::new(normalized, compiled).unwrap();
        construct(&mut a, 42);
        construct(&mut b, 42);
        assert_eq!(a.assignment, b.assignment);
    }
}
