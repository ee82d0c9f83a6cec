//! Request and report types of the league service.

use serde::{Deserialize, Serialize};

use crate::league::models::{
    ByeList, MatchId, PlayoffMode, PlayoffType, PointsPolicy, SeasonStat, Stage, TeamId,
};
use crate::playoff::PlayoffPhase;

/// Per-league overrides of the configured defaults
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LeagueOptions {
    pub points: Option<PointsPolicy>,
    pub max_teams: Option<u32>,
    pub playoff_type: Option<PlayoffType>,
}

/// First playoff round written by the service
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BracketReport {
    pub stage: Stage,
    pub matches_created: Vec<MatchId>,
    pub byes: ByeList,
}

/// What an advancement call did
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum AdvanceReport {
    NextRound {
        stage: Stage,
        matches_created: Vec<MatchId>,
        /// Qualifiers in seed order
        qualifiers: Vec<TeamId>,
    },
    Champion {
        team_id: TeamId,
        team_name: String,
    },
}

/// Counts of what a season reset erased
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResetReport {
    pub matches_discarded: usize,
    pub teams_purged: usize,
    pub stats_discarded: usize,
}

/// Read-only view of a league's bracket
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayoffStatus {
    pub phase: PlayoffPhase,
    pub mode: Option<PlayoffMode>,
    pub playoff_type: PlayoffType,
    pub byes: ByeList,
}

/// Season leaderboards, best first
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Leaderboards {
    pub scorers: Vec<SeasonStat>,
    pub goalkeepers: Vec<SeasonStat>,
}
