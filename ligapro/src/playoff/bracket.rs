//! First-round bracket generation.
//!
//! The bracket size depends on how many teams are ranked:
//!
//! | Teams | Direct cut | Play-in |
//! |---|---|---|
//! | 5-7 | semifinals 1v4, 2v3 | needs 6; seeds 1-2 bye, repechaje 3v6, 4v5 |
//! | 8-15 | quarterfinals 1v8 .. 4v5 | needs 10; seeds 1-6 bye, repechaje 7v10, 8v9 |
//! | 16+ | round of 16, i v 17-i | same as direct cut |

use log::info;
use serde::{Deserialize, Serialize};

use super::{
    errors::{PlayoffError, PlayoffResult},
    fixture::build_matches,
};
use crate::league::{
    changeset::{Changeset, PlayoffUpdate},
    models::{ByeList, PlayoffMode, PlayoffType, Stage, TeamId},
    snapshot::LeagueSnapshot,
};
use crate::standings::{self, StandingsScope};

/// Fewest ranked teams for any bracket
pub const MIN_PLAYOFF_TEAMS: usize = 5;

/// Fewest teams for a quarterfinal bracket
pub const QUARTERFINAL_MIN_TEAMS: usize = 8;

/// Fewest teams for a round-of-16 bracket
pub const ROUND_OF_16_MIN_TEAMS: usize = 16;

/// Play-in minimum for the semifinal-sized bracket
pub const SMALL_PLAY_IN_MIN_TEAMS: usize = 6;

/// Play-in minimum for the quarterfinal-sized bracket
pub const MEDIUM_PLAY_IN_MIN_TEAMS: usize = 10;

/// Seed positions (0 = best) of the first round
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BracketPlan {
    pub stage: Stage,
    /// `(home seed, away seed)` per fixture
    pub fixtures: Vec<(usize, usize)>,
    pub bye_seeds: Vec<usize>,
}

/// Best-versus-worst pairings over the first `n` seeds, offset by `first`
fn fold(first: usize, n: usize) -> Vec<(usize, usize)> {
    (0..n / 2).map(|i| (first + i, first + n - 1 - i)).collect()
}

/// Lay out the first round for `team_count` ranked teams
pub fn plan(team_count: usize, mode: PlayoffMode) -> PlayoffResult<BracketPlan> {
    if team_count < MIN_PLAYOFF_TEAMS {
        return Err(PlayoffError::InsufficientTeams {
            needed: MIN_PLAYOFF_TEAMS,
            have: team_count,
        });
    }

    if team_count >= ROUND_OF_16_MIN_TEAMS {
        return Ok(BracketPlan {
            stage: Stage::RoundOf16,
            fixtures: fold(0, 16),
            bye_seeds: Vec::new(),
        });
    }

    let (direct_stage, direct_size, play_in_min, byes) = if team_count >= QUARTERFINAL_MIN_TEAMS {
        (Stage::Quarterfinal, 8, MEDIUM_PLAY_IN_MIN_TEAMS, 6)
    } else {
        (Stage::Semifinal, 4, SMALL_PLAY_IN_MIN_TEAMS, 2)
    };

    match mode {
        PlayoffMode::DirectCut => Ok(BracketPlan {
            stage: direct_stage,
            fixtures: fold(0, direct_size),
            bye_seeds: Vec::new(),
        }),
        PlayoffMode::PlayIn if team_count < play_in_min => Err(PlayoffError::PlayInNeedsMoreTeams {
            needed: play_in_min,
            have: team_count,
        }),
        PlayoffMode::PlayIn => Ok(BracketPlan {
            stage: Stage::Repechaje,
            fixtures: fold(byes, 4),
            bye_seeds: (0..byes).collect(),
        }),
    }
}

/// A freshly generated first round
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedBracket {
    pub stage: Stage,
    pub byes: ByeList,
    pub changes: Changeset,
}

/// Generate the first playoff round from the current regular-season table.
///
/// Any existing playoff matches are discarded in the same changeset, so
/// generating twice leaves only the second bracket.
pub fn generate(
    snapshot: &LeagueSnapshot,
    mode: PlayoffMode,
    playoff_type: PlayoffType,
) -> PlayoffResult<GeneratedBracket> {
    let rows = standings::for_snapshot(snapshot, StandingsScope::RegularSeason);
    let plan = plan(rows.len(), mode)?;
    let seed = |i: usize| -> TeamId { rows[i].team_id };

    let pairings: Vec<(TeamId, TeamId)> = plan
        .fixtures
        .iter()
        .map(|&(home, away)| (seed(home), seed(away)))
        .collect();
    let byes: ByeList = plan.bye_seeds.iter().map(|&i| seed(i)).collect();

    let create_matches = build_matches(snapshot, plan.stage, &pairings, playoff_type);
    let discard_matches = snapshot.playoff_matches().map(|m| m.id).collect();

    info!(
        "Generated {} bracket for league {} ({}, {}): {} matches, {} byes",
        plan.stage,
        snapshot.league.id,
        mode,
        playoff_type,
        create_matches.len(),
        byes.len()
    );

    Ok(GeneratedBracket {
        stage: plan.stage,
        byes: byes.clone(),
        changes: Changeset {
            discard_matches,
            create_matches,
            playoff: Some(PlayoffUpdate::Configure {
                mode,
                playoff_type,
                bye_list: byes,
            }),
            ..Changeset::default()
        },
    })
}
