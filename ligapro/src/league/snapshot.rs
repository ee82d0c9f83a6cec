//! Consistent in-memory view of one league.

use serde::{Deserialize, Serialize};

use super::models::{League, Match, MatchId, SeasonStat, Stage, Team, TeamId};

/// Everything the engine reads about a league, taken at a single point in time.
///
/// Teams and matches keep the order the persistence layer returned them in;
/// standings ties fall back to team order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LeagueSnapshot {
    pub league: League,
    pub teams: Vec<Team>,
    pub matches: Vec<Match>,
    #[serde(default)]
    pub season_stats: Vec<SeasonStat>,
    /// Why the stored bye list could not be read, when it could not.
    /// `league.bye_list` is empty in that case.
    #[serde(skip)]
    pub bye_list_fault: Option<String>,
}

impl LeagueSnapshot {
    pub fn new(league: League) -> Self {
        Self {
            league,
            teams: Vec::new(),
            matches: Vec::new(),
            season_stats: Vec::new(),
            bye_list_fault: None,
        }
    }

    pub fn team(&self, team_id: TeamId) -> Option<&Team> {
        self.teams.iter().find(|t| t.id == team_id)
    }

    pub fn match_by_id(&self, match_id: MatchId) -> Option<&Match> {
        self.matches.iter().find(|m| m.id == match_id)
    }

    /// Display name of a team, falling back to its id for teams missing from the roster
    pub fn team_name(&self, team_id: TeamId) -> String {
        self.team(team_id)
            .map(|t| t.name.clone())
            .unwrap_or_else(|| team_id.to_string())
    }

    /// Teams that count in standings and brackets
    pub fn competing_teams(&self) -> impl Iterator<Item = &Team> {
        self.teams.iter().filter(|t| t.status.is_competing())
    }

    /// Teams that are not removed (active or hidden)
    pub fn roster_count(&self) -> usize {
        self.teams.iter().filter(|t| !t.status.is_removed()).count()
    }

    pub fn playoff_matches(&self) -> impl Iterator<Item = &Match> {
        self.matches.iter().filter(|m| m.stage.is_playoff())
    }

    pub fn matches_in_stage(&self, stage: Stage) -> Vec<&Match> {
        self.matches.iter().filter(|m| m.stage == stage).collect()
    }

    pub fn has_stage(&self, stage: Stage) -> bool {
        self.matches.iter().any(|m| m.stage == stage)
    }
}
