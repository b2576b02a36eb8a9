//! Concrete scenario tests (spec.md §8's six literal-input cases).

mod common;

use common::*;
use jury_engine::models::{ConflictHint, Match, SolveStatus};
use jury_engine::rules::Rule;

#[test]
fn trivial_feasibility() {
    let p = problem(
        "2025-01-01",
        "2025-01-31",
        vec![crew(1, "C1"), crew(2, "C2")],
        vec![jmatch(1, "2025-01-04", "10:00", "Home", "Away")],
        vec![],
        7,
    );
    let result = jury_engine::solve(&p).unwrap();
    assert_eq!(result.status, SolveStatus::Optimal);
    assert_eq!(result.assignments.len(), 1);
    assert!([1, 2].contains(&result.assignments[0].crew_id));
}

#[test]
fn own_match_exclusion() {
    let p = problem(
        "2025-01-01",
        "2025-01-31",
        vec![crew(1, "Lions"), crew(2, "Tigers"), crew(3, "Eagles")],
        vec![jmatch(1, "2025-01-04", "10:00", "Lions", "Tigers")],
        vec![],
        3,
    );
    let result = jury_engine::solve(&p).unwrap();
    assert_eq!(result.assignments[0].crew_id, 3);
}

#[test]
fn locked_honored() {
    let p = problem(
        "2025-01-01",
        "2025-01-31",
        vec![crew(1, "Zebras"), crew(2, "Panthers")],
        vec![
            Match {
                locked_crew_id: Some(1),
                ..jmatch(1, "2025-01-04", "10:00", "Home1", "Away1")
            },
            jmatch(2, "2025-01-04", "12:00", "Home2", "Away2"),
        ],
        vec![],
        11,
    );
    let result = jury_engine::solve(&p).unwrap();
    let m1 = result.assignments.iter().find(|a| a.match_id == 1).unwrap();
    let m2 = result.assignments.iter().find(|a| a.match_id == 2).unwrap();
    assert_eq!(m1.crew_id, 1);
    assert_eq!(m2.crew_id, 1, "same-day contiguity (U5) should force the neighbor onto crew 1");
}

#[test]
fn weekend_exclusion() {
    // 2025-01-04 is a Saturday, 2025-01-05 the following Sunday.
    let p = problem(
        "2025-01-01",
        "2025-01-31",
        vec![crew(1, "C1"), crew(2, "C2"), crew(3, "C3")],
        vec![
            jmatch(1, "2025-01-04", "10:00", "HomeA", "AwayA"),
            jmatch(2, "2025-01-05", "10:00", "HomeB", "AwayB"),
        ],
        vec![],
        5,
    );
    let result = jury_engine::solve(&p).unwrap();
    assert_eq!(result.status, SolveStatus::Optimal);
    let sat_crew = result.assignments.iter().find(|a| a.match_id == 1).unwrap().crew_id;
    let sun_crew = result.assignments.iter().find(|a| a.match_id == 2).unwrap().crew_id;
    assert_ne!(sat_crew, sun_crew, "U4: the same crew may not jury both days of one weekend");
}

#[test]
fn go_pairing_four_matches_share_one_crew() {
    let matches: Vec<Match> = vec![
        go_match(1, "2025-01-04", "10:00", "A", "B"),
        go_match(2, "2025-01-04", "10:00", "C", "D"),
        go_match(3, "2025-01-04", "12:00", "E", "F"),
        go_match(4, "2025-01-04", "12:00", "G", "H"),
    ];
    let p = problem(
        "2025-01-01",
        "2025-01-31",
        vec![crew(1, "C1"), crew(2, "C2"), crew(3, "C3")],
        matches,
        vec![],
        13,
    );
    let result = jury_engine::solve(&p).unwrap();
    assert_eq!(result.status, SolveStatus::Optimal);
    let crews: Vec<i64> = (1..=4)
        .map(|id| result.assignments.iter().find(|a| a.match_id == id).unwrap().crew_id)
        .collect();
    assert!(crews.iter().all(|&c| c == crews[0]), "U6: all four GO matches must share one crew, got {crews:?}");
}

#[test]
fn infeasibility_reports_hard_rules_contradict() {
    let p = problem(
        "2025-01-01",
        "2025-01-31",
        vec![crew(1, "Lions"), crew(2, "Tigers"), crew(3, "Eagles")],
        vec![jmatch(1, "2025-01-04", "10:00", "Lions", "Tigers")],
        vec![Rule::CrewUnavailable {
            crew: 3,
            date: date("2025-01-04"),
            note: None,
            active: true,
        }],
        17,
    );
    let result = jury_engine::solve(&p).unwrap();
    assert_eq!(result.status, SolveStatus::Infeasible);
    assert_eq!(result.conflict_hint, Some(ConflictHint::HardRulesContradict));
    assert!(result.assignments.is_empty());
}
