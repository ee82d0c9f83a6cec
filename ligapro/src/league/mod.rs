//! League domain: models, snapshots and the changesets engine operations emit.

pub mod changeset;
pub mod models;
pub mod snapshot;

pub use changeset::{Changeset, PlayoffUpdate, ScheduleUpdate, ScoreUpdate};
pub use models::{
    ByeList, CourtId, League, LeagueId, Match, MatchId, NewMatch, Outcome, PlayoffMode,
    PlayoffType, PointsPolicy, Score, SeasonStat, Side, Stage, StatKind, Team, TeamId, TeamStatus,
    UnknownTag,
};
pub use snapshot::LeagueSnapshot;
