//! Season leaderboards and head-to-head counts.

use std::collections::HashMap;

use crate::league::{
    models::{SeasonStat, StatKind, TeamId},
    snapshot::LeagueSnapshot,
};

/// Players with the most goals, best first
pub fn top_scorers(snapshot: &LeagueSnapshot, limit: Option<usize>) -> Vec<&SeasonStat> {
    let mut stats: Vec<&SeasonStat> = snapshot
        .season_stats
        .iter()
        .filter(|s| s.kind == StatKind::Goals)
        .collect();
    stats.sort_by(|a, b| b.value.cmp(&a.value));
    truncate(stats, limit)
}

/// Goalkeepers with the fewest goals conceded, best first
pub fn top_goalkeepers(snapshot: &LeagueSnapshot, limit: Option<usize>) -> Vec<&SeasonStat> {
    let mut stats: Vec<&SeasonStat> = snapshot
        .season_stats
        .iter()
        .filter(|s| s.kind == StatKind::Conceded)
        .collect();
    stats.sort_by_key(|s| s.value);
    truncate(stats, limit)
}

fn truncate(mut stats: Vec<&SeasonStat>, limit: Option<usize>) -> Vec<&SeasonStat> {
    if let Some(limit) = limit {
        stats.truncate(limit);
    }
    stats
}

/// Completed meetings per unordered pair of competing teams.
///
/// Used as a scheduling hint: pairs that already met are listed with their
/// count, pairs that never met are absent.
pub fn head_to_head(snapshot: &LeagueSnapshot) -> HashMap<(TeamId, TeamId), u32> {
    let mut meetings = HashMap::new();
    for m in snapshot.matches.iter().filter(|m| m.is_completed()) {
        let competing = [m.home, m.away].iter().all(|id| {
            snapshot
                .team(*id)
                .is_some_and(|t| t.status.is_competing())
        });
        if competing {
            *meetings.entry(m.pairing()).or_insert(0) += 1;
        }
    }
    meetings
}
