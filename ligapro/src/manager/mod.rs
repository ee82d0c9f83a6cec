//! League manager: the async service that runs the engine against storage.
//!
//! ## Example
//!
//! ```no_run
//! use ligapro::config::LeagueDefaults;
//! use ligapro::db::{Database, DatabaseConfig};
//! use ligapro::league::PlayoffMode;
//! use ligapro::manager::{LeagueManager, LeagueOptions};
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let db = Database::new(&DatabaseConfig::from_env()?).await?;
//!     let manager = LeagueManager::new(Arc::new(db.leagues()), LeagueDefaults::from_env()?);
//!
//!     let league = manager.create_league("Liga Barrial", LeagueOptions::default()).await?;
//!     for name in ["Norte", "Sur", "Este", "Oeste", "Centro", "Puerto"] {
//!         manager.add_team(league.id, name).await?;
//!     }
//!
//!     let bracket = manager
//!         .generate_playoffs(league.id, PlayoffMode::PlayIn, None)
//!         .await?;
//!     println!("{} matches in {}", bracket.matches_created.len(), bracket.stage);
//!     Ok(())
//! }
//! ```

pub mod errors;
pub mod models;
pub mod service;

pub use errors::{LeagueError, LeagueResult};
pub use models::{
    AdvanceReport, BracketReport, Leaderboards, LeagueOptions, PlayoffStatus, ResetReport,
};
pub use service::LeagueManager;
