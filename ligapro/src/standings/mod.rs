//! Standings: the ranked league table and season leaderboards.
//!
//! Tables are never stored. They are recomputed from the snapshot every time
//! they are needed, including when a bracket is seeded.

pub mod leaderboard;
pub mod table;

pub use leaderboard::{head_to_head, top_goalkeepers, top_scorers};
pub use table::{StandingRow, StandingsScope, calculate, for_snapshot, seed_map};
