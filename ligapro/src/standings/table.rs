//! League table computed from completed matches.

use log::warn;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::league::{
    models::{Match, Outcome, PointsPolicy, Score, Team, TeamId},
    snapshot::LeagueSnapshot,
};

/// Which completed matches feed the table
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum StandingsScope {
    /// Regular-season matches only; used for seeding
    #[default]
    RegularSeason,
    /// Every completed match, playoffs included
    IncludingPlayoffs,
}

impl StandingsScope {
    fn counts(self, m: &Match) -> bool {
        m.is_completed()
            && match self {
                StandingsScope::RegularSeason => !m.stage.is_playoff(),
                StandingsScope::IncludingPlayoffs => true,
            }
    }
}

/// One team's line in the table
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StandingRow {
    pub team_id: TeamId,
    pub team_name: String,
    pub played: u32,
    pub won: u32,
    pub drawn: u32,
    pub lost: u32,
    pub goals_for: u64,
    pub goals_against: u64,
    pub goal_difference: i64,
    pub points: u64,
}

impl StandingRow {
    fn empty(team: &Team) -> Self {
        Self {
            team_id: team.id,
            team_name: team.name.clone(),
            played: 0,
            won: 0,
            drawn: 0,
            lost: 0,
            goals_for: 0,
            goals_against: 0,
            goal_difference: 0,
            points: 0,
        }
    }

    /// Ranking key, compared descending
    pub fn sort_key(&self) -> (u64, i64, u64) {
        (self.points, self.goal_difference, self.goals_for)
    }

    /// Add one match, `score` seen from this team's side
    fn record(&mut self, score: Score, policy: &PointsPolicy) {
        self.played += 1;
        self.goals_for += u64::from(score.home);
        self.goals_against += u64::from(score.away);
        self.goal_difference += i64::from(score.home) - i64::from(score.away);

        let outcome = score.home_outcome();
        match outcome {
            Outcome::Win => self.won += 1,
            Outcome::Draw => self.drawn += 1,
            Outcome::Loss => self.lost += 1,
        }
        self.points += u64::from(policy.points_for(outcome));
    }
}

/// Build the ranked table.
///
/// One row per competing team, in `teams` order before sorting. The sort is
/// stable and descending by (points, goal difference, goals for); rows equal
/// on all three keep their team order.
pub fn calculate<'a>(
    policy: &PointsPolicy,
    teams: impl IntoIterator<Item = &'a Team>,
    matches: impl IntoIterator<Item = &'a Match>,
    scope: StandingsScope,
) -> Vec<StandingRow> {
    let mut rows: Vec<StandingRow> = teams
        .into_iter()
        .filter(|t| t.status.is_competing())
        .map(StandingRow::empty)
        .collect();
    let index: HashMap<TeamId, usize> = rows
        .iter()
        .enumerate()
        .map(|(i, row)| (row.team_id, i))
        .collect();

    for m in matches.into_iter().filter(|m| scope.counts(m)) {
        let Some(score) = m.score else { continue };
        if m.home == m.away {
            warn!("Match {} lists team {} on both sides, skipped", m.id, m.home);
            continue;
        }
        if let Some(&i) = index.get(&m.home) {
            rows[i].record(score, policy);
        }
        if let Some(&i) = index.get(&m.away) {
            rows[i].record(score.swapped(), policy);
        }
    }

    rows.sort_by(|a, b| b.sort_key().cmp(&a.sort_key()));
    rows
}

/// Table for a whole snapshot
pub fn for_snapshot(snapshot: &LeagueSnapshot, scope: StandingsScope) -> Vec<StandingRow> {
    calculate(
        &snapshot.league.points,
        snapshot.competing_teams(),
        &snapshot.matches,
        scope,
    )
}

/// Seed (0 = best) of every ranked team
pub fn seed_map(rows: &[StandingRow]) -> HashMap<TeamId, usize> {
    rows.iter()
        .enumerate()
        .map(|(seed, row)| (row.team_id, seed))
        .collect()
}
