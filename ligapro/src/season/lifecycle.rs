//! Roster and season transitions.
//!
//! Every function here is a pure decision over a [`LeagueSnapshot`]; the
//! returned [`Changeset`] carries the writes.

use chrono::{DateTime, Utc};
use log::{debug, info};

use super::errors::{SeasonError, SeasonResult};
use crate::league::{
    changeset::{Changeset, PlayoffUpdate, ScheduleUpdate, ScoreUpdate},
    models::{
        CourtId, MatchId, NewMatch, Score, SeasonStat, Stage, StatKind, Team, TeamId, TeamStatus,
    },
    snapshot::LeagueSnapshot,
};
use uuid::Uuid;

/// Name given to regular-season fixtures created one at a time
pub const REGULAR_MATCH_NAME: &str = "Regular Match";

/// Add a team to the roster.
///
/// Removed teams do not count towards the league's team limit or block
/// their name from being reused.
pub fn admit_team(snapshot: &LeagueSnapshot, name: &str) -> SeasonResult<(Changeset, TeamId)> {
    let max = snapshot.league.max_teams;
    if snapshot.roster_count() >= max as usize {
        return Err(SeasonError::RosterFull { max });
    }
    let taken = snapshot
        .teams
        .iter()
        .any(|t| !t.status.is_removed() && t.name.eq_ignore_ascii_case(name.trim()));
    if taken {
        return Err(SeasonError::DuplicateTeamName(name.trim().to_string()));
    }

    let team = Team::new(snapshot.league.id, name.trim());
    let team_id = team.id;
    Ok((
        Changeset {
            add_teams: vec![team],
            ..Changeset::default()
        },
        team_id,
    ))
}

/// Remove a team from competition.
///
/// Unplayed fixtures involving the team are discarded; played ones stay so
/// the opponents' history is intact. The team record itself survives as
/// `Deleted` until the next season reset.
pub fn remove_team(snapshot: &LeagueSnapshot, team_id: TeamId) -> SeasonResult<Changeset> {
    let team = snapshot
        .team(team_id)
        .filter(|t| !t.status.is_removed())
        .ok_or(SeasonError::TeamNotFound(team_id))?;

    let discard_matches: Vec<MatchId> = snapshot
        .matches
        .iter()
        .filter(|m| m.involves(team_id) && !m.is_completed())
        .map(|m| m.id)
        .collect();

    debug!(
        "Removing team {} ({}): {} unplayed matches discarded",
        team.name,
        team_id,
        discard_matches.len()
    );

    let mut changes = Changeset {
        discard_matches,
        status_updates: vec![(team_id, TeamStatus::Deleted)],
        ..Changeset::default()
    };
    clear_emptied_bracket(snapshot, &mut changes);
    Ok(changes)
}

/// Flip a team between active and hidden, returning the new status
pub fn toggle_hidden(
    snapshot: &LeagueSnapshot,
    team_id: TeamId,
) -> SeasonResult<(Changeset, TeamStatus)> {
    let team = snapshot
        .team(team_id)
        .ok_or(SeasonError::TeamNotFound(team_id))?;

    let status = match team.status {
        TeamStatus::Active => TeamStatus::Hidden,
        TeamStatus::Hidden => TeamStatus::Active,
        TeamStatus::Deleted | TeamStatus::PurgePending => {
            return Err(SeasonError::TeamNotFound(team_id));
        }
    };

    Ok((
        Changeset {
            status_updates: vec![(team_id, status)],
            ..Changeset::default()
        },
        status,
    ))
}

/// Start a new season.
///
/// Discards every match and season statistic, clears playoff state and
/// erases teams that were removed during the season. Matches go first, so no
/// purged team is left referenced.
pub fn reset_season(snapshot: &LeagueSnapshot) -> Changeset {
    let removed: Vec<TeamId> = snapshot
        .teams
        .iter()
        .filter(|t| t.status.is_removed())
        .map(|t| t.id)
        .collect();

    info!(
        "Season reset for league {}: {} matches, {} removed teams",
        snapshot.league.id,
        snapshot.matches.len(),
        removed.len()
    );

    Changeset {
        discard_matches: snapshot.matches.iter().map(|m| m.id).collect(),
        status_updates: removed
            .iter()
            .map(|id| (*id, TeamStatus::PurgePending))
            .collect(),
        purge_teams: removed,
        playoff: Some(PlayoffUpdate::Clear),
        discard_season_stats: true,
        ..Changeset::default()
    }
}

/// Discard the bracket, keeping the regular season untouched
pub fn reset_playoffs(snapshot: &LeagueSnapshot) -> Changeset {
    Changeset {
        discard_matches: snapshot.playoff_matches().map(|m| m.id).collect(),
        playoff: Some(PlayoffUpdate::Clear),
        ..Changeset::default()
    }
}

/// Request to place a regular-season fixture
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScheduleRequest {
    pub home: TeamId,
    pub away: TeamId,
    pub scheduled_at: Option<DateTime<Utc>>,
    pub court_id: Option<CourtId>,
}

impl ScheduleRequest {
    pub fn new(home: TeamId, away: TeamId) -> Self {
        Self {
            home,
            away,
            scheduled_at: None,
            court_id: None,
        }
    }
}

/// Schedule a regular-season fixture.
///
/// An unplayed regular match for the same home/away pairing is updated in
/// place rather than duplicated. Returns the id of the affected match.
pub fn schedule_match(
    snapshot: &LeagueSnapshot,
    request: &ScheduleRequest,
) -> SeasonResult<(Changeset, MatchId)> {
    if request.home == request.away {
        return Err(SeasonError::SameTeam);
    }
    for team_id in [request.home, request.away] {
        let team = snapshot
            .team(team_id)
            .ok_or(SeasonError::TeamNotFound(team_id))?;
        if !team.status.is_competing() {
            return Err(SeasonError::TeamNotSchedulable(team_id));
        }
    }

    let existing = snapshot.matches.iter().find(|m| {
        m.stage == Stage::Regular && m.home == request.home && m.away == request.away
    });

    if let Some(m) = existing {
        if m.is_completed() {
            return Err(SeasonError::MatchAlreadyPlayed(m.id));
        }
        let changes = Changeset {
            schedule_updates: vec![ScheduleUpdate {
                match_id: m.id,
                scheduled_at: request.scheduled_at,
                court_id: request.court_id,
            }],
            ..Changeset::default()
        };
        return Ok((changes, m.id));
    }

    let mut fixture = NewMatch::new(request.home, request.away, Stage::Regular, REGULAR_MATCH_NAME);
    fixture.scheduled_at = request.scheduled_at;
    fixture.court_id = request.court_id;
    let match_id = fixture.id;

    Ok((
        Changeset {
            create_matches: vec![fixture],
            ..Changeset::default()
        },
        match_id,
    ))
}

/// Record (or clear, with `None`) the score of a match.
///
/// `home` and `away` name the sides as the caller sees them. When they are the
/// mirror of the stored pairing the score is swapped before it is stored.
pub fn record_result(
    snapshot: &LeagueSnapshot,
    match_id: MatchId,
    home: TeamId,
    away: TeamId,
    score: Option<Score>,
) -> SeasonResult<Changeset> {
    let m = snapshot
        .match_by_id(match_id)
        .ok_or(SeasonError::MatchNotFound(match_id))?;

    let stored = if (m.home, m.away) == (home, away) {
        score
    } else if (m.home, m.away) == (away, home) {
        debug!("Mirrored result for match {match_id}, swapping score");
        score.map(Score::swapped)
    } else {
        let team_id = if m.involves(home) { away } else { home };
        return Err(SeasonError::TeamNotInMatch { team_id, match_id });
    };

    Ok(Changeset {
        score_updates: vec![ScoreUpdate {
            match_id,
            score: stored,
        }],
        ..Changeset::default()
    })
}

/// Credit a player of a team with a season statistic (goals scored or conceded)
pub fn record_stat(
    snapshot: &LeagueSnapshot,
    team_id: TeamId,
    player_name: &str,
    kind: StatKind,
    value: u32,
) -> SeasonResult<(Changeset, Uuid)> {
    snapshot
        .team(team_id)
        .filter(|t| !t.status.is_removed())
        .ok_or(SeasonError::TeamNotFound(team_id))?;

    let stat = SeasonStat::new(snapshot.league.id, team_id, player_name, kind, value);
    let stat_id = stat.id;
    Ok((
        Changeset {
            add_season_stats: vec![stat],
            ..Changeset::default()
        },
        stat_id,
    ))
}

/// Delete a single match, played or not
pub fn delete_match(snapshot: &LeagueSnapshot, match_id: MatchId) -> SeasonResult<Changeset> {
    snapshot
        .match_by_id(match_id)
        .ok_or(SeasonError::MatchNotFound(match_id))?;

    let mut changes = Changeset {
        discard_matches: vec![match_id],
        ..Changeset::default()
    };
    clear_emptied_bracket(snapshot, &mut changes);
    Ok(changes)
}

/// Drop the playoff mode and bye list once `changes` discards the last
/// playoff match.
fn clear_emptied_bracket(snapshot: &LeagueSnapshot, changes: &mut Changeset) {
    let league = &snapshot.league;
    if league.playoff_mode.is_none() && league.bye_list.is_empty() {
        return;
    }
    let bracket_survives = snapshot
        .playoff_matches()
        .any(|m| !changes.discard_matches.contains(&m.id));
    if !bracket_survives {
        debug!("Last playoff match of league {} discarded, clearing byes", league.id);
        changes.playoff = Some(PlayoffUpdate::Clear);
    }
}
