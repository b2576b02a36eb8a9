//! Human-readable solution dump, used by tests and by callers debugging a
//! solve interactively (e.g. in a REPL or a failing test assertion).
//!
//! Grounded on `display.rs` in the teacher's `solver-core/src/solver/`,
//! which renders a `State` as one line per assignment grouped by day for
//! the same reason: a raw `Vec<usize>` of crew slots means nothing to a
//! human without the day grouping and crew names restored.

use super::scoring::ScoreDetail;
use super::State;
use std::fmt::Write as _;

pub fn render(state: &State, detail: &ScoreDetail) -> String {
    let mut out = String::new();
    for day in &state.normalized.days {
        let _ = writeln!(out, "{}", day.date);
        for &pos in &day.match_positions {
            let m = &state.normalized.matches[pos];
            let slot = state.assignment[pos];
            let crew_id = state.crew_id_at(slot);
            let crew_name = state
                .normalized
                .crews
                .get(slot)
                .map(|c| c.name.as_str())
                .unwrap_or("STATIC");
            let _ = writeln!(
                out,
                "  {:>5}  {} vs {} [{}] -> {} (crew {})",
                m.start.format("%H:%M"),
                m.home_team,
                m.away_team,
                m.competition,
                crew_name,
                crew_id
            );
        }
    }
    let _ = writeln!(
        out,
        "score: hard={} soft={:.2} spread={}",
        detail.score.hard, detail.score.soft, detail.spread
    );
    out
}
