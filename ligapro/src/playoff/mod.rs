//! Playoff brackets: generation, advancement and the tie policy.
//!
//! Both [`generate`] and [`advance`] are pure: they read a snapshot and return
//! a changeset for the caller to apply atomically.

pub mod advance;
pub mod bracket;
pub mod errors;
pub mod fixture;
pub mod phase;
pub mod tiebreak;

pub use advance::{AdvanceOutcome, advance};
pub use bracket::{BracketPlan, GeneratedBracket, generate, plan};
pub use errors::{PlayoffError, PlayoffResult};
pub use phase::{PlayoffPhase, StageProgress};
pub use tiebreak::{HomeAdvances, TieBreaker, TiedFixture};
