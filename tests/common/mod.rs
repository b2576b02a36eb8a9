//! Shared test utilities for jury-engine integration tests.
//!
//! Grounded on `tests/common/mod.rs` in the teacher's `solver-core`: small
//! builder functions over the public model types, kept here rather than
//! repeated per test file.

use chrono::{NaiveDate, NaiveDateTime};
use jury_engine::models::{Config, JuryTeam, Match, Problem, Window};
use jury_engine::rules::Rule;
use std::collections::HashMap;

#[allow(dead_code)]
pub fn dt(date: &str, time: &str) -> NaiveDateTime {
    NaiveDateTime::parse_from_str(&format!("{date} {time}"), "%Y-%m-%d %H:%M").unwrap()
}

#[allow(dead_code)]
pub fn date(s: &str) -> NaiveDate {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
}

/// Crew named `name` with id `id`, active, undedicated.
#[allow(dead_code)]
pub fn crew(id: i64, name: &str) -> JuryTeam {
    JuryTeam {
        id,
        name: name.to_string(),
        active: true,
        dedicated_to_team: None,
        capacity_weight: 1.0,
    }
}

/// A league match at `date date, time time` between `home` and `away`.
#[allow(dead_code)]
pub fn jmatch(id: i64, date: &str, time: &str, home: &str, away: &str) -> Match {
    Match {
        id,
        start: dt(date, time),
        home_team: home.to_string(),
        away_team: away.to_string(),
        competition: "League".to_string(),
        venue: "Main Pool".to_string(),
        locked_crew_id: None,
    }
}

/// A GO (youth-series) match, otherwise identical to [`jmatch`].
#[allow(dead_code)]
pub fn go_match(id: i64, date: &str, time: &str, home: &str, away: &str) -> Match {
    Match {
        competition: "GO Youth Cup".to_string(),
        ..jmatch(id, date, time, home, away)
    }
}

/// A quick-converging config: short time limit, small day cap, fixed seed.
#[allow(dead_code)]
pub fn fast_config(seed: u64) -> Config {
    Config {
        time_limit_seconds: 2,
        seed,
        default_max_duties_per_day: 3,
        points_first_last: 15,
        points_regular: 10,
    }
}

/// Assembles a [`Problem`] spanning `window_start`..`window_end` inclusive.
#[allow(dead_code)]
pub fn problem(
    window_start: &str,
    window_end: &str,
    crews: Vec<JuryTeam>,
    matches: Vec<Match>,
    rules: Vec<Rule>,
    seed: u64,
) -> Problem {
    Problem {
        window: Window {
            start_date: date(window_start),
            end_date: date(window_end),
        },
        crews,
        matches,
        static_assignments: HashMap::new(),
        rules,
        config: fast_config(seed),
    }
}
