//! Season lifecycle error types.

use thiserror::Error;

use crate::league::models::{MatchId, TeamId};

/// Roster and match editing errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SeasonError {
    /// Team not on the league roster (or already removed)
    #[error("Team not found: {0}")]
    TeamNotFound(TeamId),

    /// Match not found in the league
    #[error("Match not found: {0}")]
    MatchNotFound(MatchId),

    /// Home and away sides must differ
    #[error("A team cannot play against itself")]
    SameTeam,

    /// Hidden or deleted teams cannot be given new fixtures
    #[error("Team {0} is not available for scheduling")]
    TeamNotSchedulable(TeamId),

    /// Played matches are never rescheduled
    #[error("Match {0} has already been played")]
    MatchAlreadyPlayed(MatchId),

    /// League already has its maximum number of teams
    #[error("League is full: at most {max} teams")]
    RosterFull { max: u32 },

    /// Another team on the roster has this name
    #[error("A team named {0:?} already exists")]
    DuplicateTeamName(String),

    /// Team reported as a side of a match it does not play in
    #[error("Team {team_id} does not play in match {match_id}")]
    TeamNotInMatch { team_id: TeamId, match_id: MatchId },

    /// Permanent removal would orphan a match
    #[error("Team {team_id} is still referenced by match {match_id}")]
    TeamStillReferenced { team_id: TeamId, match_id: MatchId },
}

/// Result type for season operations
pub type SeasonResult<T> = Result<T, SeasonError>;
