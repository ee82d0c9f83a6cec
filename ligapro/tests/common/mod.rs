//! Shared fixtures for the engine integration tests.
#![allow(dead_code)]

use ligapro::league::{League, LeagueSnapshot, MatchId, PointsPolicy, Score, Stage, TeamId};
use ligapro::playoff::{HomeAdvances, PlayoffPhase};
use ligapro::season::{self, ScheduleRequest};

/// Empty league with room for `max_teams`
pub fn empty_league(max_teams: u32) -> LeagueSnapshot {
    LeagueSnapshot::new(League::new("Liga de Prueba", PointsPolicy::default(), max_teams))
}

/// League holding the named teams, ids in the given order
pub fn league_with_teams(names: &[&str]) -> (LeagueSnapshot, Vec<TeamId>) {
    let mut snapshot = empty_league(64);
    let ids = names
        .iter()
        .map(|name| add_team(&mut snapshot, name))
        .collect();
    (snapshot, ids)
}

pub fn add_team(snapshot: &mut LeagueSnapshot, name: &str) -> TeamId {
    let (changes, id) = season::admit_team(snapshot, name).expect("team admitted");
    changes.apply(snapshot).expect("team stored");
    id
}

/// Schedule a regular match and record its score
pub fn play(snapshot: &mut LeagueSnapshot, home: TeamId, away: TeamId, h: u32, a: u32) -> MatchId {
    let id = schedule(snapshot, home, away);
    record(snapshot, id, home, away, h, a);
    id
}

pub fn schedule(snapshot: &mut LeagueSnapshot, home: TeamId, away: TeamId) -> MatchId {
    let (changes, id) =
        season::schedule_match(snapshot, &ScheduleRequest::new(home, away)).expect("scheduled");
    changes.apply(snapshot).expect("match stored");
    id
}

pub fn record(
    snapshot: &mut LeagueSnapshot,
    match_id: MatchId,
    home: TeamId,
    away: TeamId,
    h: u32,
    a: u32,
) {
    season::record_result(snapshot, match_id, home, away, Some(Score::new(h, a)))
        .expect("result accepted")
        .apply(snapshot)
        .expect("result stored");
}

/// League of `n` teams whose table order is their creation order.
///
/// Every team beats every team created after it 1-0.
pub fn ranked_league(n: usize) -> (LeagueSnapshot, Vec<TeamId>) {
    let names: Vec<String> = (1..=n).map(|i| format!("Equipo {i:02}")).collect();
    let refs: Vec<&str> = names.iter().map(String::as_str).collect();
    let (mut snapshot, ids) = league_with_teams(&refs);
    for i in 0..n {
        for j in (i + 1)..n {
            play(&mut snapshot, ids[i], ids[j], 1, 0);
        }
    }
    (snapshot, ids)
}

/// Pairings of a stage as (home, away), in creation order
pub fn stage_pairings(snapshot: &LeagueSnapshot, stage: Stage) -> Vec<(TeamId, TeamId)> {
    snapshot
        .matches_in_stage(stage)
        .iter()
        .map(|m| (m.home, m.away))
        .collect()
}

/// Record `h`-`a` for every unplayed match of a stage
pub fn play_stage(snapshot: &mut LeagueSnapshot, stage: Stage, h: u32, a: u32) {
    let pending: Vec<(MatchId, TeamId, TeamId)> = snapshot
        .matches_in_stage(stage)
        .iter()
        .filter(|m| !m.is_completed())
        .map(|m| (m.id, m.home, m.away))
        .collect();
    for (id, home, away) in pending {
        record(snapshot, id, home, away, h, a);
    }
}

pub fn phase(snapshot: &LeagueSnapshot) -> PlayoffPhase {
    PlayoffPhase::observe(snapshot, &HomeAdvances)
}
