//! # Ligapro
//!
//! A competition engine for round-robin football and futsal leagues and their
//! single- or double-legged playoff brackets.
//!
//! The engine is a set of pure functions over a [`LeagueSnapshot`]: each call
//! reads one consistent view of a league and returns a [`Changeset`] describing
//! every write it wants, or a typed refusal. Storage adapters apply a changeset
//! atomically together with the read it was computed from.
//!
//! ## Architecture
//!
//! - **Standings**: the ranked table, recomputed from completed matches on demand
//! - **Bracket generation**: seeds the first playoff round from the table,
//!   with byes for the top seeds in play-in mode
//! - **Round advancement**: resolves single legs and aggregates, re-seeds the
//!   winners and draws the next stage, or names the champion
//! - **Season lifecycle**: team removal, visibility, match editing and resets
//!
//! ## Core Modules
//!
//! - [`league`]: models, snapshots and changesets
//! - [`standings`]: league table and leaderboards
//! - [`playoff`]: bracket generation, advancement and the tie policy
//! - [`season`]: roster and season transitions
//! - [`db`]: PostgreSQL and in-memory repositories
//! - [`manager`]: async service running engine calls inside transactions
//!
//! ## Example
//!
//! ```
//! use ligapro::league::{League, LeagueSnapshot, PointsPolicy};
//! use ligapro::standings::{self, StandingsScope};
//!
//! let league = League::new("Liga Barrial", PointsPolicy::default(), 10);
//! let mut snapshot = LeagueSnapshot::new(league);
//! for name in ["Norte", "Sur"] {
//!     let (changes, _) = ligapro::season::admit_team(&snapshot, name)?;
//!     changes.apply(&mut snapshot)?;
//! }
//!
//! let table = standings::for_snapshot(&snapshot, StandingsScope::RegularSeason);
//! assert_eq!(table.len(), 2);
//! assert!(table.iter().all(|row| row.points == 0));
//! # Ok::<(), ligapro::season::SeasonError>(())
//! ```

/// League defaults loaded from the environment.
pub mod config;

/// Database connection pool and league repositories.
pub mod db;

/// Competition data model.
pub mod league;
pub use league::{Changeset, LeagueSnapshot};

/// Async league service.
pub mod manager;
pub use manager::{LeagueError, LeagueManager, LeagueResult};

/// Playoff brackets.
pub mod playoff;

/// Season lifecycle rules.
pub mod season;

/// League table and leaderboards.
pub mod standings;
