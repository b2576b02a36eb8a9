//! Input Normalizer: validates a raw [`Problem`](crate::models::Problem) and
//! groups it into the shape the rest of the pipeline consumes.
//!
//! Grounded on the ID-mapping/preprocessing pass in
//! `examples/guwidoe-GroupMixer/solver-core/src/solver/construction.rs`
//! (`State::new`): external ids are validated once here and turned into
//! dense indices so every downstream module works with `usize` indices
//! instead of re-hashing ids on every access.

use crate::error::EngineError;
use crate::models::{Config, CrewId, JuryTeam, Match, MatchId, Problem, Window, STATIC_CREW_ID};
use chrono::{Datelike, NaiveDate, Weekday};
use std::collections::{HashMap, HashSet};

/// All matches sharing one calendar date, sorted by start time.
#[derive(Debug, Clone)]
pub struct DayGroup {
    pub date: NaiveDate,
    /// ISO (year, week) — Monday-start, so a Saturday and the following
    /// Sunday always share one key (used by U4).
    pub weekend_group: (i32, u32),
    /// Indices into `NormalizedProblem::matches`, sorted by start time.
    pub match_positions: Vec<usize>,
    /// Union of home-team names playing this day (spec.md §4.1).
    pub playing_teams: HashSet<String>,
}

/// A [`Problem`] after validation, filtering, and grouping.
#[derive(Debug, Clone)]
pub struct NormalizedProblem {
    pub window: Window,
    pub config: Config,
    pub crews: Vec<JuryTeam>,
    /// Dense crew id list used for index assignment. Always contains
    /// [`STATIC_CREW_ID`], appended if no input crew declared it, so every
    /// eligibility/assignment array can treat STATIC as an ordinary slot
    /// that happens to be excluded from fairness accounting (I5).
    pub crew_ids: Vec<CrewId>,
    pub crew_index: HashMap<CrewId, usize>,
    /// Matches in full planning-window order (I6: start timestamp, then id).
    pub matches: Vec<Match>,
    pub match_index: HashMap<MatchId, usize>,
    pub known_teams: HashSet<String>,
    /// Day groups in date order.
    pub days: Vec<DayGroup>,
    pub day_index: HashMap<NaiveDate, usize>,
    pub static_assignments: HashMap<String, CrewId>,
}

impl NormalizedProblem {
    pub fn static_index(&self) -> usize {
        self.crew_index[&STATIC_CREW_ID]
    }

    pub fn day_of(&self, match_pos: usize) -> usize {
        self.day_index[&self.matches[match_pos].start.date()]
    }
}

pub fn normalize(problem: &Problem) -> Result<NormalizedProblem, EngineError> {
    let window = problem.window;
    if window.start_date > window.end_date {
        return Err(EngineError::InvalidInput(
            "window.start_date must be <= window.end_date".to_string(),
        ));
    }

    let mut crew_ids: Vec<CrewId> = Vec::with_capacity(problem.crews.len() + 1);
    let mut crew_index: HashMap<CrewId, usize> = HashMap::new();
    for crew in &problem.crews {
        if crew_index.insert(crew.id, crew_ids.len()).is_some() {
            return Err(EngineError::InvalidInput(format!("duplicate crew id {}", crew.id)));
        }
        crew_ids.push(crew.id);
    }
    if !crew_index.contains_key(&STATIC_CREW_ID) {
        crew_index.insert(STATIC_CREW_ID, crew_ids.len());
        crew_ids.push(STATIC_CREW_ID);
    }

    // Filter to window, validate required fields, then impose I6 ordering.
    let mut matches: Vec<Match> = Vec::new();
    for m in &problem.matches {
        let day = m.start.date();
        if day < window.start_date || day > window.end_date {
            continue;
        }
        if m.home_team.trim().is_empty() {
            return Err(EngineError::InvalidInput(format!("match {} has no home team", m.id)));
        }
        if m.away_team.trim().is_empty() {
            return Err(EngineError::InvalidInput(format!("match {} has no away team", m.id)));
        }
        matches.push(m.clone());
    }
    matches.sort_by(|a, b| a.start.cmp(&b.start).then(a.id.cmp(&b.id)));

    let mut match_index: HashMap<MatchId, usize> = HashMap::new();
    for (pos, m) in matches.iter().enumerate() {
        if match_index.insert(m.id, pos).is_some() {
            return Err(EngineError::InvalidInput(format!("duplicate match id {}", m.id)));
        }
    }

    let mut known_teams: HashSet<String> = HashSet::new();
    for m in &matches {
        known_teams.insert(m.home_team.clone());
        known_teams.insert(m.away_team.clone());
    }

    for (team, crew) in &problem.static_assignments {
        if *crew != STATIC_CREW_ID {
            return Err(EngineError::InvalidInput(format!(
                "static_assignments['{team}'] must map to STATIC ({STATIC_CREW_ID}), got {crew}"
            )));
        }
        if !known_teams.contains(team) {
            return Err(EngineError::InvalidInput(format!(
                "static_assignments references unknown team '{team}'"
            )));
        }
    }

    for m in &matches {
        if let Some(locked) = m.locked_crew_id {
            if !crew_index.contains_key(&locked) {
                return Err(EngineError::InvalidInput(format!(
                    "match {} is locked to unknown crew {locked}",
                    m.id
                )));
            }
            if problem.static_assignments.get(&m.home_team) == Some(&STATIC_CREW_ID) && locked != STATIC_CREW_ID {
                return Err(EngineError::InvalidInput(format!(
                    "match {} is both locked to crew {locked} and statically assigned to STATIC",
                    m.id
                )));
            }
        }
    }

    // Group by calendar day, in date order, matches within a day sorted by
    // start time (already guaranteed by the global sort above).
    let mut days: Vec<DayGroup> = Vec::new();
    let mut day_index: HashMap<NaiveDate, usize> = HashMap::new();
    for (pos, m) in matches.iter().enumerate() {
        let date = m.start.date();
        let group_pos = *day_index.entry(date).or_insert_with(|| {
            let iso = date.iso_week();
            days.push(DayGroup {
                date,
                weekend_group: (iso.year(), iso.week()),
                match_positions: Vec::new(),
                playing_teams: HashSet::new(),
            });
            days.len() - 1
        });
        days[group_pos].match_positions.push(pos);
        days[group_pos].playing_teams.insert(m.home_team.clone());
    }
    days.sort_by_key(|d| d.date);
    // `day_index` values may now be stale after the sort; rebuild.
    day_index.clear();
    for (pos, day) in days.iter().enumerate() {
        day_index.insert(day.date, pos);
    }

    Ok(NormalizedProblem {
        window,
        config: problem.config.clone(),
        crews: problem.crews.clone(),
        crew_ids,
        crew_index,
        matches,
        match_index,
        known_teams,
        days,
        day_index,
        static_assignments: problem.static_assignments.clone(),
    })
}

/// `true` if `date` falls on a Saturday or Sunday (used by U4).
pub fn is_weekend_day(date: NaiveDate) -> bool {
    matches!(date.weekday(), Weekday::Sat | Weekday::Sun)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::*;
    use chrono::NaiveDateTime;

    fn dt(s: &str) -> NaiveDateTime {
        NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M").unwrap()
    }

    #[test]
    fn rejects_inverted_window() {
        let problem = Problem {
            window: Window {
                start_date: NaiveDate::from_ymd_opt(2025, 2, 1).unwrap(),
                end_date: NaiveDate::from_ymd_opt(2025, 1, 1).unwrap(),
            },
            crews: vec![],
            matches: vec![],
            static_assignments: HashMap::new(),
            rules: vec![],
            config: Config::default(),
        };
        assert!(normalize(&problem).is_err());
    }

    #[test]
    fn always_contains_static_slot() {
        let problem = Problem {
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
        };
        let normalized = normalize(&problem).unwrap();
        assert!(normalized.crew_index.contains_key(&STATIC_CREW_ID));
    }

    #[test]
    fn groups_matches_by_day_in_order() {
        let problem = Problem {
            window: Window {
                start_date: NaiveDate::from_ymd_opt(2025, 1, 1).unwrap(),
                end_date: NaiveDate::from_ymd_opt(2025, 1, 31).unwrap(),
            },
            crews: vec![],
            matches: vec![
                Match {
                    id: 2,
                    start: dt("2025-01-04 12:00"),
                    home_team: "Lions".to_string(),
                    away_team: "Tigers".to_string(),
                    competition: "League".to_string(),
                    venue: "A".to_string(),
                    locked_crew_id: None,
                },
                Match {
                    id: 1,
                    start: dt("2025-01-04 10:00"),
                    home_team: "Eagles".to_string(),
                    away_team: "Hawks".to_string(),
                    competition: "League".to_string(),
                    venue: "A".to_string(),
                    locked_crew_id: None,
                },
            ],
            static_assignments: HashMap::new(),
            rules: vec![],
            config: Config::default(),
        };
        let normalized = normalize(&problem).unwrap();
        assert_eq!(normalized.matches[0].id, 1);
        assert_eq!(normalized.matches[1].id, 2);
        assert_eq!(normalized.days.len(), 1);
        assert_eq!(normalized.days[0].match_positions, vec![0, 1]);
    }
}
