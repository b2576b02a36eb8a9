//! Score computation: hard-violation counting, the fairness objective, and
//! every soft penalty term from `spec.md` §4.3–§4.4.
//!
//! `Score` plays the role CP-SAT's objective + infeasibility reporting
//! would play (`SPEC_FULL.md` §2), named after the `HardSoftScore` pattern
//! in `examples/SolverForge-solverforge/crates/solverforge-core/src/score/hard_soft.rs`:
//! hard dominates soft when comparing two scores, but both are tracked
//! separately so `SolveStatus` can be read straight off `hard == 0`.
//!
//! `CrewUnavailable` and `DedicatedCrew` are counted here rather than
//! pre-filtered out of eligibility in `solver::State` — see that module's
//! doc comment for why.

use super::State;
use crate::models::{CrewId, MatchId, STATIC_CREW_ID};
use crate::normalize::is_weekend_day;
use std::collections::HashMap;

/// Lower is better in both fields; `hard` is compared first.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Score {
    pub hard: i64,
    pub soft: f64,
}

impl Score {
    pub const ZERO: Score = Score { hard: 0, soft: 0.0 };

    pub fn is_feasible(&self) -> bool {
        self.hard == 0
    }

    /// A single scalar for simulated-annealing acceptance only; `hard` is
    /// weighted far above any plausible `soft` total so a move can never
    /// trade a hard violation for a soft improvement.
    pub fn scalar(&self) -> f64 {
        self.hard as f64 * 1_000_000.0 + self.soft
    }

    pub fn is_better_than(&self, other: &Score) -> bool {
        (self.hard, ordered_float(self.soft)) < (other.hard, ordered_float(other.soft))
    }
}

fn ordered_float(f: f64) -> i64 {
    (f * 1000.0).round() as i64
}

/// Everything the Extractor and the public [`crate::models::SolveResult`]
/// need, computed together so callers never pay for two full passes.
#[derive(Debug, Clone)]
pub struct ScoreDetail {
    pub score: Score,
    pub per_crew_points: HashMap<CrewId, i64>,
    pub spread: i64,
}

/// Deterministic per-(match, crew) random tiebreak weight in `[1, 10]`,
/// stable across repeated scoring calls regardless of search order —
/// unlike drawing from the search RNG, which would make score depend on
/// how many times a state had been scored before.
fn tiebreak_weight(seed: u64, match_id: MatchId, crew_id: CrewId) -> u64 {
    let mut x = seed
        ^ (match_id as u64).wrapping_mul(0x9E37_79B9_7F4A_7C15)
        ^ (crew_id as u64).wrapping_mul(0xBF58_476D_1CE4_E5B9);
    x ^= x >> 30;
    x = x.wrapping_mul(0xBF58_476D_1CE4_E5B9);
    x ^= x >> 27;
    x = x.wrapping_mul(0x94D0_49BB_1331_11EB);
    x ^= x >> 31;
    1 + (x % 10)
}

fn points_for(position_in_plan: usize, plan_len: usize, state: &State) -> i64 {
    if position_in_plan == 0 || position_in_plan + 1 == plan_len {
        state.normalized.config.points_first_last
    } else {
        state.normalized.config.points_regular
    }
}

pub fn compute(state: &State, seed: u64) -> ScoreDetail {
    let mut hard = 0i64;
    let mut soft_penalties = 0.0f64; // the ×100 bucket
    let mut proximity_penalty = 0.0f64; // ×1
    let mut tiebreak = 0.0f64; // ×0.5

    let n = state.num_matches();
    let static_slot = state.normalized.static_index();

    // Fairness: points and per-crew totals.
    let mut per_crew_points: HashMap<CrewId, i64> = HashMap::new();
    for slot in &state.normalized.crew_ids {
        if *slot != STATIC_CREW_ID {
            per_crew_points.insert(*slot, 0);
        }
    }
    for pos in 0..n {
        let slot = state.assignment[pos];
        let crew_id = state.crew_id_at(slot);
        let pts = points_for(pos, n, state);
        if slot != static_slot {
            *per_crew_points.entry(crew_id).or_insert(0) += pts;
        }
        tiebreak += tiebreak_weight(seed, state.normalized.matches[pos].id, crew_id) as f64;
    }
    let spread = if per_crew_points.is_empty() {
        0
    } else {
        let min = *per_crew_points.values().min().unwrap();
        let max = *per_crew_points.values().max().unwrap();
        max - min
    };

    // U2 same-day cap, U3 back-to-back day, U5 contiguity, U6 GO-pairing,
    // consecutive/two-matches rewards, quiet-day, home-playing preference,
    // weekend coupling, proximity: all computed per day group.
    for (day_pos, day) in state.normalized.days.iter().enumerate() {
        let positions = &day.match_positions;

        // U2: per-crew same-day cap, with GO-driven relaxation.
        let mut per_crew_count: HashMap<usize, u32> = HashMap::new();
        let mut per_crew_go_count: HashMap<usize, u32> = HashMap::new();
        let mut day_go_count = 0u32;
        for &pos in positions {
            let slot = state.assignment[pos];
            if slot == static_slot {
                continue;
            }
            *per_crew_count.entry(slot).or_insert(0) += 1;
            if state.normalized.matches[pos].is_go_match() {
                day_go_count += 1;
                *per_crew_go_count.entry(slot).or_insert(0) += 1;
            }
        }
        let base_k = state.normalized.config.default_max_duties_per_day;
        for (&slot, &count) in &per_crew_count {
            let go_count = *per_crew_go_count.get(&slot).unwrap_or(&0);
            let k = if day_go_count == 4 && go_count == 4 {
                4
            } else if positions.len() % 2 == 1 && go_count == 2 {
                base_k + 1
            } else {
                base_k
            };
            if count > k {
                hard += (count - k) as i64;
            }
        }

        // U5: same-day contiguity ("forbid 2nd block"), excluding STATIC.
        if positions.len() >= 2 {
            for (i, &pos) in positions.iter().enumerate() {
                let slot = state.assignment[pos];
                if slot == static_slot {
                    continue;
                }
                let prev_match = i.checked_sub(1).map(|j| state.assignment[positions[j]] == slot);
                let next_match = positions.get(i + 1).map(|&p| state.assignment[p] == slot);
                let satisfied = match (prev_match, next_match) {
                    (Some(p), Some(nx)) => p || nx,
                    (Some(p), None) => p,
                    (None, Some(nx)) => nx,
                    (None, None) => true, // single-match day, unreachable here
                };
                if !satisfied {
                    hard += 1;
                }
            }
        }

        // U6: GO-pairing.
        if let Some(grouping) = super::go_grouping(state, day_pos) {
            let shared = state.assignment[grouping.equal[0]];
            for &p in &grouping.equal[1..] {
                if state.assignment[p] != shared {
                    hard += 1;
                }
            }
            if let Some(differs_pos) = grouping.differs_from_equal {
                if state.assignment[differs_pos] == shared {
                    hard += 1;
                }
            }
        }

        // consecutive_reward: contiguous same-crew runs (excluding STATIC).
        let mut i = 0;
        while i < positions.len() {
            let slot = state.assignment[positions[i]];
            let mut j = i + 1;
            while j < positions.len() && state.assignment[positions[j]] == slot {
                j += 1;
            }
            let run_len = j - i;
            if slot != static_slot {
                match run_len {
                    1 if positions.len() >= 4 => soft_penalties += 2.0,
                    2 => soft_penalties -= 1.0,
                    3 => soft_penalties -= 1.0,
                    _ => {}
                }
            }
            i = j;
        }

        // two_matches_reward.
        if positions.len() == 2 {
            let a = state.assignment[positions[0]];
            let b = state.assignment[positions[1]];
            if a == b && a != static_slot {
                soft_penalties -= 1.0;
            }
        } else if positions.len() == 3 {
            let mut freq: HashMap<usize, u32> = HashMap::new();
            for &pos in positions {
                let slot = state.assignment[pos];
                if slot != static_slot {
                    *freq.entry(slot).or_insert(0) += 1;
                }
            }
            if freq.values().any(|&c| c >= 2) {
                soft_penalties -= 1.0;
            }
        }

        // quiet_day_penalty (§4.4).
        soft_penalties += quiet_day_penalty(state, day_pos);

        // home_playing_preference and weekend coupling.
        for &pos in positions {
            let slot = state.assignment[pos];
            if slot == static_slot {
                continue;
            }
            let crew_name = &state.normalized.crews[slot].name;
            if !day.playing_teams.contains(crew_name) {
                soft_penalties += 1.0;
            }
            if is_weekend_day(day.date) && weekend_coupling_violated(state, day_pos, slot, crew_name) {
                soft_penalties += 1000.0;
            }
        }

        // proximity_penalty: all same-crew pairs within the day.
        let mut by_crew: HashMap<usize, Vec<usize>> = HashMap::new();
        for (idx, &pos) in positions.iter().enumerate() {
            let slot = state.assignment[pos];
            if slot != static_slot {
                by_crew.entry(slot).or_default().push(idx);
            }
        }
        for idxs in by_crew.values() {
            for a in 0..idxs.len() {
                for b in (a + 1)..idxs.len() {
                    let gap = (idxs[b] as i64 - idxs[a] as i64 - 1).max(0);
                    proximity_penalty += gap as f64 * 10.0;
                }
            }
        }
    }

    // U4: no double-weekend.
    let mut weekend_days: HashMap<(i32, u32), Vec<usize>> = HashMap::new();
    for (day_pos, day) in state.normalized.days.iter().enumerate() {
        if is_weekend_day(day.date) {
            weekend_days.entry(day.weekend_group).or_default().push(day_pos);
        }
    }
    for day_positions in weekend_days.values() {
        if day_positions.len() < 2 {
            continue;
        }
        for i in 0..day_positions.len() {
            for j in (i + 1)..day_positions.len() {
                let crews_i = crews_present(state, day_positions[i]);
                let crews_j = crews_present(state, day_positions[j]);
                for c in crews_i.intersection(&crews_j) {
                    if *c != static_slot {
                        hard += 1;
                    }
                }
            }
        }
    }

    // U3: no back-to-back calendar days.
    for w in state.normalized.days.windows(2) {
        let (d0, d1) = (&w[0], &w[1]);
        if (d1.date - d0.date).num_days() != 1 {
            continue;
        }
        if let (Some(&last0), Some(&first1)) = (d0.match_positions.last(), d1.match_positions.first()) {
            let a = state.assignment[last0];
            let b = state.assignment[first1];
            if a == b && a != static_slot {
                hard += 1;
            }
        }
    }

    // CrewUnavailable: a rule the assigned crew may violate, not an
    // eligibility pre-filter (see `solver::compute_eligibility`) — a match
    // with no crew satisfying it is a solver-level infeasibility.
    for pos in 0..n {
        let slot = state.assignment[pos];
        if slot == static_slot {
            continue;
        }
        let crew_id = state.crew_id_at(slot);
        if let Some(dates) = state.compiled.crew_unavailable.get(&crew_id) {
            if dates.contains(&state.normalized.matches[pos].start.date()) {
                hard += 1;
            }
        }
    }

    // DedicatedCrew: the assigned crew may only serve matches involving its
    // team on a day that team plays, or (with `last_match_exception`) the
    // day's last match when it doesn't.
    for rule in &state.compiled.dedicated_crew {
        let slot = state.normalized.crew_index[&rule.crew];
        for pos in 0..n {
            if state.assignment[pos] != slot {
                continue;
            }
            let day_pos = state.normalized.day_of(pos);
            let day = &state.normalized.days[day_pos];
            let qualifying: Vec<usize> = day
                .match_positions
                .iter()
                .copied()
                .filter(|&mp| state.normalized.matches[mp].involves_team(&rule.serves_team))
                .collect();
            let allowed = if !qualifying.is_empty() {
                qualifying.contains(&pos)
            } else if rule.last_match_exception {
                day.match_positions.last() == Some(&pos)
            } else {
                false
            };
            if !allowed {
                hard += 1;
            }
        }
    }

    // RestBetweenMatches.
    for rule in &state.compiled.rest_between {
        let crews_to_check: Vec<usize> = match rule.crew {
            Some(c) => vec![state.normalized.crew_index[&c]],
            None => state
                .normalized
                .crew_ids
                .iter()
                .filter(|&&id| id != STATIC_CREW_ID)
                .map(|id| state.normalized.crew_index[id])
                .collect(),
        };
        for slot in crews_to_check {
            let positions: Vec<usize> = (0..n).filter(|&p| state.assignment[p] == slot).collect();
            for w in positions.windows(2) {
                let gap = (state.normalized.matches[w[1]].start.date() - state.normalized.matches[w[0]].start.date())
                    .num_days();
                if gap < rule.min_rest_days as i64 {
                    hard += 1;
                }
            }
        }
    }

    // MaxDutiesPerPeriod.
    for rule in &state.compiled.max_duties {
        let slot = state.normalized.crew_index[&rule.crew];
        let mut dates: Vec<_> = (0..n)
            .filter(|&p| state.assignment[p] == slot)
            .map(|p| state.normalized.matches[p].start.date())
            .collect();
        dates.sort();
        let mut worst = 0u32;
        for i in 0..dates.len() {
            let window_end = dates[i] + chrono::Duration::days(rule.period_days as i64 - 1);
            let count = dates[i..].iter().take_while(|d| **d <= window_end).count() as u32;
            worst = worst.max(count);
        }
        let excess = worst.saturating_sub(rule.max);
        if excess > 0 {
            if rule.hard {
                hard += excess as i64;
            } else {
                soft_penalties += rule.weight as f64 * excess as f64;
            }
        }
    }

    // AvoidConsecutiveMatches (max back-to-back same-day slots).
    for rule in &state.compiled.avoid_consecutive {
        for day in &state.normalized.days {
            let positions = &day.match_positions;
            let mut i = 0;
            while i < positions.len() {
                let slot = state.assignment[positions[i]];
                if slot == static_slot || rule.crew.is_some_and(|c| state.crew_id_at(slot) != c) {
                    i += 1;
                    continue;
                }
                let mut j = i + 1;
                while j < positions.len() && state.assignment[positions[j]] == slot {
                    j += 1;
                }
                let run_len = (j - i) as u32;
                if run_len > rule.max_consecutive {
                    soft_penalties += (run_len - rule.max_consecutive) as f64 * rule.weight as f64;
                }
                i = j;
            }
        }
    }

    // AvoidDates / PreferDates / AvoidOpponent.
    for rule in &state.compiled.avoid_dates {
        let slot = state.normalized.crew_index[&rule.crew];
        for pos in 0..n {
            if state.assignment[pos] == slot && rule.dates.contains(&state.normalized.matches[pos].start.date()) {
                soft_penalties += rule.weight as f64;
            }
        }
    }
    for rule in &state.compiled.prefer_dates {
        let slot = state.normalized.crew_index[&rule.crew];
        for pos in 0..n {
            if state.assignment[pos] == slot && rule.dates.contains(&state.normalized.matches[pos].start.date()) {
                soft_penalties -= rule.weight as f64;
            }
        }
    }
    for rule in &state.compiled.avoid_opponent {
        let slot = state.normalized.crew_index[&rule.crew];
        for pos in 0..n {
            let m = &state.normalized.matches[pos];
            if state.assignment[pos] == slot
                && (m.home_team == rule.opponent_team || m.away_team == rule.opponent_team)
            {
                soft_penalties += rule.weight as f64;
            }
        }
    }

    let soft = spread as f64 + 100.0 * soft_penalties + proximity_penalty + 0.5 * tiebreak;

    ScoreDetail {
        score: Score { hard, soft },
        per_crew_points,
        spread,
    }
}

fn crews_present(state: &State, day_pos: usize) -> std::collections::HashSet<usize> {
    state.normalized.days[day_pos]
        .match_positions
        .iter()
        .map(|&p| state.assignment[p])
        .collect()
}

fn weekend_coupling_violated(state: &State, day_pos: usize, _slot: usize, crew_name: &str) -> bool {
    let weekend_group = state.normalized.days[day_pos].weekend_group;
    let mut has_away = false;
    let mut has_home_any_day = false;
    for day in &state.normalized.days {
        if day.weekend_group != weekend_group || !is_weekend_day(day.date) {
            continue;
        }
        for &pos in &day.match_positions {
            let m = &state.normalized.matches[pos];
            if m.away_team == crew_name {
                has_away = true;
            }
            if m.home_team == crew_name {
                has_home_any_day = true;
            }
        }
    }
    let has_home_today = state.normalized.days[day_pos]
        .playing_teams
        .contains(crew_name);
    has_away || (!has_home_today && !has_home_any_day)
}

/// Quiet-day heuristic (`spec.md` §4.4): 2-match and 3-match days with
/// enough playing crews get an ideal hand-off pattern; deviating costs a
/// bounded slack penalty.
fn quiet_day_penalty(state: &State, day_pos: usize) -> f64 {
    let day = &state.normalized.days[day_pos];
    let positions = &day.match_positions;

    let playing_crew_slots: Vec<usize> = state
        .normalized
        .crews
        .iter()
        .enumerate()
        .filter(|(_, c)| day.playing_teams.contains(&c.name))
        .map(|(slot, _)| slot)
        .collect();

    if positions.len() == 2 && playing_crew_slots.len() == 2 {
        let (a, b) = (playing_crew_slots[0], playing_crew_slots[1]);
        let got = (state.assignment[positions[0]], state.assignment[positions[1]]);
        let slack_ab = mismatches(&[(got.0, a), (got.1, b)]);
        let slack_ba = mismatches(&[(got.0, b), (got.1, a)]);
        return slack_ab.min(slack_ba) as f64 * 10.0;
    }

    if positions.len() == 3 && playing_crew_slots.len() >= 2 {
        let first_two_home: std::collections::HashSet<&str> = positions[0..2]
            .iter()
            .map(|&p| state.normalized.matches[p].home_team.as_str())
            .collect();
        let crew_x = playing_crew_slots
            .iter()
            .copied()
            .find(|&slot| first_two_home.contains(state.normalized.crews[slot].name.as_str()));
        let crew_y = playing_crew_slots
            .iter()
            .copied()
            .find(|&slot| Some(slot) != crew_x);
        if let (Some(x), Some(y)) = (crew_x, crew_y) {
            let got = (
                state.assignment[positions[0]],
                state.assignment[positions[1]],
                state.assignment[positions[2]],
            );
            let slack = mismatches(&[(got.0, y), (got.1, y), (got.2, x)]);
            return slack as f64 * 50.0;
        }
    }

    0.0
}

fn mismatches(pairs: &[(usize, usize)]) -> usize {
    pairs.iter().filter(|(got, want)| got != want).count()
}
