//! Playoff error types.

use thiserror::Error;

use crate::league::models::Stage;

/// Refusals of bracket generation and advancement.
///
/// Every variant is fixable by the caller (record the missing results, add
/// teams, reset the bracket) and retrying.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PlayoffError {
    /// Not enough competing teams for any bracket
    #[error("At least {needed} teams are needed for playoffs, the league has {have}")]
    InsufficientTeams { needed: usize, have: usize },

    /// Play-in mode needs a larger field at this bracket size
    #[error("Play-in mode needs at least {needed} teams, the league has {have}")]
    PlayInNeedsMoreTeams { needed: usize, have: usize },

    /// Nothing to advance
    #[error("No playoff matches exist")]
    NoPlayoffMatches,

    /// A stage still has unplayed matches
    #[error("Stage {stage} is not complete: {pending} matches pending")]
    StageIncomplete { stage: Stage, pending: usize },

    /// Fewer than two teams came out of the finished stage
    #[error("Not enough qualifiers to continue: {have}")]
    NotEnoughQualifiers { have: usize },

    /// The teams that skipped the play-in round are unknown
    #[error("The stored bye list is unreadable ({0}), reset the playoffs")]
    UnreadableByeList(String),

    /// The next stage exists already
    #[error("Stage {0} has already been generated")]
    NextStageAlreadyGenerated(Stage),
}

/// Result type for playoff operations
pub type PlayoffResult<T> = Result<T, PlayoffError>;
