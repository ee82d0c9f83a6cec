//! Write sets produced by the engine.
//!
//! Engine operations never mutate state. They return a [`Changeset`] that the
//! persistence layer applies in one transaction.

use chrono::{DateTime, Utc};
use log::debug;
use serde::{Deserialize, Serialize};

use super::models::{
    ByeList, CourtId, MatchId, NewMatch, PlayoffMode, PlayoffType, Score, SeasonStat, Team,
    TeamId, TeamStatus,
};
use super::snapshot::LeagueSnapshot;
use crate::season::{SeasonError, SeasonResult};

/// New playoff settings for the league record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum PlayoffUpdate {
    /// A bracket was generated with this mode, type and bye list
    Configure {
        mode: PlayoffMode,
        playoff_type: PlayoffType,
        bye_list: ByeList,
    },
    /// Playoff matches were cleared; mode and bye list go with them
    Clear,
}

/// Score change for an existing match
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreUpdate {
    pub match_id: MatchId,
    /// `None` reverts the match to unplayed
    pub score: Option<Score>,
}

/// Date/court change for an existing match. `None` fields are left untouched.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduleUpdate {
    pub match_id: MatchId,
    pub scheduled_at: Option<DateTime<Utc>>,
    pub court_id: Option<CourtId>,
}

/// Complete write set of one engine invocation.
///
/// Applied in field order: discards, score and schedule updates, match and
/// team inserts, status changes, purges, league settings, statistics.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Changeset {
    pub discard_matches: Vec<MatchId>,
    pub score_updates: Vec<ScoreUpdate>,
    pub schedule_updates: Vec<ScheduleUpdate>,
    pub create_matches: Vec<NewMatch>,
    pub add_teams: Vec<Team>,
    pub status_updates: Vec<(TeamId, TeamStatus)>,
    /// Teams erased permanently; none may still be referenced by a match
    pub purge_teams: Vec<TeamId>,
    pub playoff: Option<PlayoffUpdate>,
    pub discard_season_stats: bool,
    pub add_season_stats: Vec<SeasonStat>,
}

impl Changeset {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }

    /// Apply to an in-memory snapshot.
    ///
    /// All or nothing: on error the snapshot is left as it was.
    pub fn apply(&self, snapshot: &mut LeagueSnapshot) -> SeasonResult<()> {
        let mut next = snapshot.clone();
        let league_id = next.league.id;

        next.matches.retain(|m| !self.discard_matches.contains(&m.id));

        for update in &self.score_updates {
            let m = next
                .matches
                .iter_mut()
                .find(|m| m.id == update.match_id)
                .ok_or(SeasonError::MatchNotFound(update.match_id))?;
            m.score = update.score;
        }

        for update in &self.schedule_updates {
            let m = next
                .matches
                .iter_mut()
                .find(|m| m.id == update.match_id)
                .ok_or(SeasonError::MatchNotFound(update.match_id))?;
            if let Some(at) = update.scheduled_at {
                m.scheduled_at = Some(at);
            }
            if let Some(court) = update.court_id {
                m.court_id = Some(court);
            }
        }

        next.matches.extend(
            self.create_matches
                .iter()
                .cloned()
                .map(|nm| nm.into_match(league_id)),
        );

        next.teams.extend(self.add_teams.iter().cloned());

        for (team_id, status) in &self.status_updates {
            let team = next
                .teams
                .iter_mut()
                .find(|t| t.id == *team_id)
                .ok_or(SeasonError::TeamNotFound(*team_id))?;
            team.status = *status;
        }

        for team_id in &self.purge_teams {
            if let Some(m) = next.matches.iter().find(|m| m.involves(*team_id)) {
                return Err(SeasonError::TeamStillReferenced {
                    team_id: *team_id,
                    match_id: m.id,
                });
            }
            next.teams.retain(|t| t.id != *team_id);
            next.season_stats.retain(|s| s.team_id != *team_id);
        }

        match &self.playoff {
            Some(PlayoffUpdate::Configure {
                mode,
                playoff_type,
                bye_list,
            }) => {
                next.league.playoff_mode = Some(*mode);
                next.league.playoff_type = *playoff_type;
                next.league.bye_list = bye_list.clone();
                next.bye_list_fault = None;
            }
            Some(PlayoffUpdate::Clear) => {
                next.league.playoff_mode = None;
                next.league.bye_list = ByeList::new();
                next.bye_list_fault = None;
            }
            None => {}
        }

        if self.discard_season_stats {
            next.season_stats.clear();
        }
        for stat in &self.add_season_stats {
            if next.team(stat.team_id).is_none() {
                return Err(SeasonError::TeamNotFound(stat.team_id));
            }
            next.season_stats.push(stat.clone());
        }

        debug!(
            "Applied changeset to league {}: -{} +{} matches",
            league_id,
            self.discard_matches.len(),
            self.create_matches.len()
        );

        *snapshot = next;
        Ok(())
    }
}
