//! Debug invariant checks.
//!
//! Grounded on `validation.rs` in the teacher's `solver-core/src/solver/`:
//! re-derive the properties the rest of the model assumes hold and report
//! every violation found, rather than stopping at the first one — useful
//! for tracking down which invariant a move implementation broke.

use super::State;
use crate::models::STATIC_CREW_ID;

/// Returns one message per violated invariant. An empty vec means the
/// current `state.assignment` is consistent with I2, I3, I4, and U7 — the
/// invariants baked into eligibility at construction time, so a non-empty
/// result here indicates a bug in a move implementation, not a bad input.
pub fn check_invariants(state: &State) -> Vec<String> {
    let mut problems = Vec::new();

    for (pos, m) in state.normalized.matches.iter().enumerate() {
        let slot = state.assignment[pos];
        let crew_id = state.crew_id_at(slot);

        if let Some(locked) = m.locked_crew_id {
            if crew_id != locked {
                problems.push(format!(
                    "I3 violated: match {} locked to {locked} but assigned {crew_id}",
                    m.id
                ));
            }
        }

        if state.normalized.static_assignments.get(&m.home_team) == Some(&STATIC_CREW_ID)
            && crew_id != STATIC_CREW_ID
        {
            problems.push(format!(
                "I4 violated: match {} is statically assigned but crew {crew_id} was returned",
                m.id
            ));
        }

        if crew_id != STATIC_CREW_ID {
            if let Some(crew) = state.normalized.crews.get(slot) {
                if m.involves_team(&crew.name) {
                    problems.push(format!(
                        "I2 violated: crew {} assigned to its own match {}",
                        crew.name, m.id
                    ));
                }
                if let Some(sibling) = super::d_sibling(&crew.name) {
                    if m.involves_team(&sibling) {
                        problems.push(format!(
                            "U7 violated: crew {} assigned to sibling team {sibling}'s match {}",
                            crew.name, m.id
                        ));
                    }
                }
            }
        }
    }

    problems
}

/// Logs every violation found by [`check_invariants`] at `error` level and
/// returns whether the state was consistent.
pub fn debug_assert_consistent(state: &State) -> bool {
    let problems = check_invariants(state);
    for p in &problems {
        log::error!("{p}");
    }
    problems.is_empty()
}
