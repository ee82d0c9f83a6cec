//! Season lifecycle: team removal, visibility, match editing and resets.
//!
//! Removal is soft during the season and hard at the next reset:
//!
//! ```
//! use ligapro::league::{League, LeagueSnapshot, PointsPolicy, Team, TeamStatus};
//! use ligapro::season;
//!
//! let league = League::new("Liga Barrial", PointsPolicy::default(), 10);
//! let mut snapshot = LeagueSnapshot::new(league.clone());
//! let team = Team::new(league.id, "Deportivo");
//! let team_id = team.id;
//! snapshot.teams.push(team);
//!
//! season::remove_team(&snapshot, team_id)?.apply(&mut snapshot)?;
//! assert_eq!(snapshot.team(team_id).map(|t| t.status), Some(TeamStatus::Deleted));
//!
//! season::reset_season(&snapshot).apply(&mut snapshot)?;
//! assert!(snapshot.team(team_id).is_none());
//! # Ok::<(), ligapro::season::SeasonError>(())
//! ```

pub mod errors;
pub mod lifecycle;

pub use errors::{SeasonError, SeasonResult};
pub use lifecycle::{
    REGULAR_MATCH_NAME, ScheduleRequest, admit_team, delete_match, record_result, record_stat,
    remove_team, reset_playoffs, reset_season, schedule_match, toggle_hidden,
};
