//! League service error types.

use thiserror::Error;

use crate::db::{bye_list::ByeListError, timeouts::TimedOut};
use crate::league::models::{LeagueId, UnknownTag};
use crate::playoff::PlayoffError;
use crate::season::SeasonError;

/// League service errors
#[derive(Debug, Error)]
pub enum LeagueError {
    /// League not found
    #[error("League not found: {0}")]
    LeagueNotFound(LeagueId),

    /// League name empty after trimming
    #[error("League name must not be empty")]
    InvalidName,

    /// Bracket generation or advancement refused
    #[error(transparent)]
    Playoff(#[from] PlayoffError),

    /// Roster or match edit refused
    #[error(transparent)]
    Season(#[from] SeasonError),

    /// Stored bye list unreadable
    #[error(transparent)]
    ByeList(#[from] ByeListError),

    /// Stored row holds a value the engine does not understand
    #[error("Corrupt data: {0}")]
    CorruptData(String),

    /// Database error
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Database operation timed out
    #[error(transparent)]
    Timeout(#[from] TimedOut),

    /// Snapshot file (de)serialization failed
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Snapshot file I/O failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<UnknownTag> for LeagueError {
    fn from(err: UnknownTag) -> Self {
        LeagueError::CorruptData(err.to_string())
    }
}

impl LeagueError {
    /// Get a client-safe error message that doesn't leak internal details
    ///
    /// Storage-level errors are collapsed into a generic message; engine
    /// refusals are meant for the user and pass through.
    pub fn client_message(&self) -> String {
        match self {
            LeagueError::Database(_)
            | LeagueError::Io(_)
            | LeagueError::Serialization(_)
            | LeagueError::CorruptData(_) => "Internal server error".to_string(),
            LeagueError::ByeList(_) => "Playoff state is unreadable, reset the playoffs".to_string(),
            LeagueError::Timeout(_) => "The league is busy, try again".to_string(),
            LeagueError::LeagueNotFound(_) => "League not found".to_string(),
            _ => self.to_string(),
        }
    }

    /// Whether the caller can fix the problem by changing its request
    pub fn is_refusal(&self) -> bool {
        matches!(
            self,
            LeagueError::Playoff(_)
                | LeagueError::Season(_)
                | LeagueError::ByeList(_)
                | LeagueError::LeagueNotFound(_)
                | LeagueError::InvalidName
        )
    }
}

/// Result type for league operations
pub type LeagueResult<T> = Result<T, LeagueError>;
