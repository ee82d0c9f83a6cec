//! Policy for fixtures that end level.

use crate::league::models::{Stage, TeamId};

/// A fixture (single match or both legs) with equal goals on each side
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TiedFixture {
    pub stage: Stage,
    /// Home side of the (first) leg
    pub home: TeamId,
    pub away: TeamId,
    /// Goals per side, summed over all legs
    pub goals: u64,
    pub legs: usize,
}

/// Decides which side of a tied fixture advances.
///
/// There is no penalty shoot-out or away-goals rule; leagues that want one
/// plug it in here.
pub trait TieBreaker: Send + Sync {
    fn resolve(&self, tie: &TiedFixture) -> TeamId;
}

/// Default policy: the home side of the first leg advances.
///
/// This covers every level result, a drawn final and a fixture with only one
/// recorded leg included. Scoring those with a bare `home > away` check would
/// send the away side through instead.
#[derive(Debug, Clone, Copy, Default)]
pub struct HomeAdvances;

impl TieBreaker for HomeAdvances {
    fn resolve(&self, tie: &TiedFixture) -> TeamId {
        tie.home
    }
}

impl<F> TieBreaker for F
where
    F: Fn(&TiedFixture) -> TeamId + Send + Sync,
{
    fn resolve(&self, tie: &TiedFixture) -> TeamId {
        self(tie)
    }
}
