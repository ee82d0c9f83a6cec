//! Where a league's bracket stands.
//!
//! Stages are walked in bracket order. A stage with unplayed matches holds the
//! bracket there; once the final is played the bracket is complete.

use log::warn;
use serde::{Deserialize, Serialize};

use super::{advance::single_leg_winner, tiebreak::TieBreaker};
use crate::league::{
    models::{Stage, TeamId},
    snapshot::LeagueSnapshot,
};

/// Progress through one stage
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StageProgress {
    pub stage: Stage,
    pub completed: usize,
    pub total: usize,
}

impl StageProgress {
    pub fn is_complete(&self) -> bool {
        self.completed == self.total
    }

    pub fn pending(&self) -> usize {
        self.total - self.completed
    }
}

/// Playoff state machine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PlayoffPhase {
    /// No playoff matches
    NotStarted,
    /// A stage is being played, or is played and waiting to be advanced
    InStage(StageProgress),
    /// Final played
    Complete { champion: TeamId },
}

impl PlayoffPhase {
    /// Derive the phase from the playoff matches of a snapshot
    pub fn observe(snapshot: &LeagueSnapshot, tie_breaker: &dyn TieBreaker) -> Self {
        let mut reached = None;

        for stage in Stage::PLAYOFF_ORDER {
            let matches = snapshot.matches_in_stage(stage);
            if matches.is_empty() {
                continue;
            }
            let progress = StageProgress {
                stage,
                completed: matches.iter().filter(|m| m.is_completed()).count(),
                total: matches.len(),
            };
            if !progress.is_complete() {
                return PlayoffPhase::InStage(progress);
            }
            reached = Some(progress);
        }

        match reached {
            None => PlayoffPhase::NotStarted,
            Some(progress) if progress.stage == Stage::Final => {
                let finals = snapshot.matches_in_stage(Stage::Final);
                if finals.len() > 1 {
                    warn!(
                        "League {} has {} final matches, using the first",
                        snapshot.league.id,
                        finals.len()
                    );
                }
                match finals.first().and_then(|m| single_leg_winner(m, tie_breaker)) {
                    Some(champion) => PlayoffPhase::Complete { champion },
                    None => PlayoffPhase::InStage(progress),
                }
            }
            Some(progress) => PlayoffPhase::InStage(progress),
        }
    }

    /// Stage currently being played or waiting to advance
    pub fn stage(&self) -> Option<Stage> {
        match self {
            PlayoffPhase::InStage(progress) => Some(progress.stage),
            PlayoffPhase::Complete { .. } => Some(Stage::Final),
            PlayoffPhase::NotStarted => None,
        }
    }

    pub fn is_ready_to_advance(&self) -> bool {
        matches!(self, PlayoffPhase::InStage(progress) if progress.is_complete())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::league::models::{League, NewMatch, PointsPolicy, Score, Team};
    use crate::playoff::tiebreak::HomeAdvances;

    fn snapshot() -> (LeagueSnapshot, TeamId, TeamId) {
        let league = League::new("Liga", PointsPolicy::default(), 10);
        let mut snapshot = LeagueSnapshot::new(league.clone());
        let a = Team::new(league.id, "A");
        let b = Team::new(league.id, "B");
        let ids = (a.id, b.id);
        snapshot.teams.extend([a, b]);
        (snapshot, ids.0, ids.1)
    }

    fn push(snapshot: &mut LeagueSnapshot, home: TeamId, away: TeamId, stage: Stage, score: Option<Score>) {
        let mut m = NewMatch::new(home, away, stage, "m").into_match(snapshot.league.id);
        m.score = score;
        snapshot.matches.push(m);
    }

    #[test]
    fn test_not_started_without_playoff_matches() {
        let (mut snapshot, a, b) = snapshot();
        push(&mut snapshot, a, b, Stage::Regular, Some(Score::new(1, 0)));
        assert_eq!(PlayoffPhase::observe(&snapshot, &HomeAdvances), PlayoffPhase::NotStarted);
    }

    #[test]
    fn test_incomplete_earlier_stage_holds_bracket() {
        let (mut snapshot, a, b) = snapshot();
        push(&mut snapshot, a, b, Stage::Semifinal, None);
        push(&mut snapshot, a, b, Stage::Final, Some(Score::new(1, 0)));

        let phase = PlayoffPhase::observe(&snapshot, &HomeAdvances);
        assert_eq!(
            phase,
            PlayoffPhase::InStage(StageProgress {
                stage: Stage::Semifinal,
                completed: 0,
                total: 1,
            })
        );
        assert!(!phase.is_ready_to_advance());
    }

    #[test]
    fn test_played_stage_is_ready() {
        let (mut snapshot, a, b) = snapshot();
        push(&mut snapshot, a, b, Stage::Semifinal, Some(Score::new(2, 3)));
        let phase = PlayoffPhase::observe(&snapshot, &HomeAdvances);
        assert!(phase.is_ready_to_advance());
        assert_eq!(phase.stage(), Some(Stage::Semifinal));
    }

    #[test]
    fn test_played_final_names_champion() {
        let (mut snapshot, a, b) = snapshot();
        push(&mut snapshot, a, b, Stage::Final, Some(Score::new(0, 1)));
        assert_eq!(
            PlayoffPhase::observe(&snapshot, &HomeAdvances),
            PlayoffPhase::Complete { champion: b }
        );
    }

    #[test]
    fn test_tied_final_uses_tie_breaker() {
        let (mut snapshot, a, b) = snapshot();
        push(&mut snapshot, a, b, Stage::Final, Some(Score::new(2, 2)));
        assert_eq!(
            PlayoffPhase::observe(&snapshot, &HomeAdvances),
            PlayoffPhase::Complete { champion: a }
        );
        let away = |t: &crate::playoff::tiebreak::TiedFixture| t.away;
        assert_eq!(
            PlayoffPhase::observe(&snapshot, &away),
            PlayoffPhase::Complete { champion: b }
        );
    }
}
