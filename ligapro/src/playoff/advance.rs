//! Moving a bracket from one stage to the next.

use log::{debug, info, warn};
use std::collections::HashMap;

use super::{
    errors::{PlayoffError, PlayoffResult},
    fixture::build_matches,
    phase::PlayoffPhase,
    tiebreak::{TieBreaker, TiedFixture},
};
use crate::league::{
    changeset::Changeset,
    models::{Match, Stage, TeamId},
    snapshot::LeagueSnapshot,
};
use crate::standings::{self, StandingsScope};

/// Result of advancing a bracket
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AdvanceOutcome {
    /// The next stage was drawn
    NextRound {
        stage: Stage,
        /// Qualifiers in seed order
        qualifiers: Vec<TeamId>,
        changes: Changeset,
    },
    /// The final has been played
    Champion { team_id: TeamId },
}

/// Winner of one completed match, `None` while it is unplayed
pub fn single_leg_winner(m: &Match, tie_breaker: &dyn TieBreaker) -> Option<TeamId> {
    let score = m.score?;
    let winner = match score.home.cmp(&score.away) {
        std::cmp::Ordering::Greater => m.home,
        std::cmp::Ordering::Less => m.away,
        std::cmp::Ordering::Equal => tie_breaker.resolve(&TiedFixture {
            stage: m.stage,
            home: m.home,
            away: m.away,
            goals: u64::from(score.home),
            legs: 1,
        }),
    };
    Some(winner)
}

/// Winner of a fixture played over several legs, on aggregate.
///
/// Goals are summed per team across legs; the first leg's home side is the
/// home side of the fixture for tie-breaking.
fn aggregate_winner(legs: &[&Match], tie_breaker: &dyn TieBreaker) -> Option<TeamId> {
    let first = legs.first()?;
    let (home, away) = (first.home, first.away);

    let (mut home_goals, mut away_goals) = (0u64, 0u64);
    for leg in legs {
        let (scored, conceded) = leg.goals_for(home)?;
        home_goals += u64::from(scored);
        away_goals += u64::from(conceded);
    }

    let winner = match home_goals.cmp(&away_goals) {
        std::cmp::Ordering::Greater => home,
        std::cmp::Ordering::Less => away,
        std::cmp::Ordering::Equal => tie_breaker.resolve(&TiedFixture {
            stage: first.stage,
            home,
            away,
            goals: home_goals,
            legs: legs.len(),
        }),
    };
    debug!(
        "Aggregate {}-{} over {} legs, {} advances",
        home_goals,
        away_goals,
        legs.len(),
        winner
    );
    Some(winner)
}

/// Winners of a completed stage, in fixture order.
///
/// In a two-legged stage matches are grouped by the unordered pair of teams;
/// a pair with a single recorded leg is decided on that match alone.
pub fn stage_winners(
    matches: &[&Match],
    two_legged: bool,
    tie_breaker: &dyn TieBreaker,
) -> Vec<TeamId> {
    if !two_legged {
        return matches
            .iter()
            .filter_map(|m| single_leg_winner(m, tie_breaker))
            .collect();
    }

    let mut groups: Vec<((TeamId, TeamId), Vec<&Match>)> = Vec::new();
    for &m in matches {
        match groups.iter_mut().find(|(pair, _)| *pair == m.pairing()) {
            Some((_, legs)) => legs.push(m),
            None => groups.push((m.pairing(), vec![m])),
        }
    }

    groups
        .iter()
        .filter_map(|(_, legs)| match legs.as_slice() {
            [single] => {
                warn!("Fixture {} has a single leg, deciding on it alone", single.id);
                single_leg_winner(single, tie_breaker)
            }
            legs => {
                if legs.len() > 2 {
                    warn!("Fixture has {} legs, summing all of them", legs.len());
                }
                aggregate_winner(legs, tie_breaker)
            }
        })
        .collect()
}

/// Stage drawn for a given number of qualifiers
pub fn next_stage_for(qualifiers: usize) -> Stage {
    match qualifiers {
        0..=2 => Stage::Final,
        3..=4 => Stage::Semifinal,
        _ => Stage::Quarterfinal,
    }
}

/// Order qualifiers by seed; teams without a seed go last, in their given order
pub fn reseed(qualifiers: &[TeamId], seeds: &HashMap<TeamId, usize>) -> Vec<TeamId> {
    let mut seeded = qualifiers.to_vec();
    seeded.sort_by_key(|id| seeds.get(id).copied().unwrap_or(usize::MAX));
    seeded
}

/// Best-versus-worst pairings of seeded teams
pub fn pairings(seeded: &[TeamId]) -> Vec<(TeamId, TeamId)> {
    let n = seeded.len();
    (0..n / 2).map(|i| (seeded[i], seeded[n - 1 - i])).collect()
}

/// Advance the bracket of a snapshot by one stage, or report its champion
pub fn advance(
    snapshot: &LeagueSnapshot,
    tie_breaker: &dyn TieBreaker,
) -> PlayoffResult<AdvanceOutcome> {
    let progress = match PlayoffPhase::observe(snapshot, tie_breaker) {
        PlayoffPhase::NotStarted => return Err(PlayoffError::NoPlayoffMatches),
        PlayoffPhase::Complete { champion } => {
            info!(
                "League {} playoffs complete, champion {}",
                snapshot.league.id,
                snapshot.team_name(champion)
            );
            return Ok(AdvanceOutcome::Champion { team_id: champion });
        }
        PlayoffPhase::InStage(progress) if !progress.is_complete() => {
            return Err(PlayoffError::StageIncomplete {
                stage: progress.stage,
                pending: progress.pending(),
            });
        }
        PlayoffPhase::InStage(progress) => progress,
    };

    let stage = progress.stage;
    let league = &snapshot.league;
    let matches = snapshot.matches_in_stage(stage);
    let mut qualifiers = stage_winners(&matches, league.playoff_type.is_two_legged(stage), tie_breaker);

    if stage == Stage::Repechaje {
        if let Some(fault) = &snapshot.bye_list_fault {
            return Err(PlayoffError::UnreadableByeList(fault.clone()));
        }
        for team_id in league.bye_list.iter() {
            if !qualifiers.contains(team_id) {
                qualifiers.push(*team_id);
            }
        }
    }

    if qualifiers.len() < 2 {
        return Err(PlayoffError::NotEnoughQualifiers {
            have: qualifiers.len(),
        });
    }
    if qualifiers.len() % 2 == 1 {
        warn!(
            "Odd number of qualifiers ({}) in league {}, the middle seed sits out",
            qualifiers.len(),
            league.id
        );
    }

    let rows = standings::for_snapshot(snapshot, StandingsScope::RegularSeason);
    let seeded = reseed(&qualifiers, &standings::seed_map(&rows));

    let next = next_stage_for(seeded.len());
    if snapshot.has_stage(next) {
        return Err(PlayoffError::NextStageAlreadyGenerated(next));
    }

    let create_matches = build_matches(snapshot, next, &pairings(&seeded), league.playoff_type);
    info!(
        "League {} advanced from {} to {}: {} qualifiers, {} matches",
        league.id,
        stage,
        next,
        seeded.len(),
        create_matches.len()
    );

    Ok(AdvanceOutcome::NextRound {
        stage: next,
        qualifiers: seeded,
        changes: Changeset {
            create_matches,
            ..Changeset::default()
        },
    })
}
