//! Integration tests for roster removal and season resets.

mod common;

use common::{add_team, league_with_teams, play, play_stage, ranked_league, schedule};
use ligapro::league::{PlayoffMode, PlayoffType, Score, Stage, StatKind, TeamStatus};
use ligapro::playoff;
use ligapro::season::{self, ScheduleRequest, SeasonError};

#[test]
fn test_season_reset_purges_removed_teams() {
    let (mut snapshot, ids) = league_with_teams(&["Activo", "Retirado"]);
    play(&mut snapshot, ids[0], ids[1], 2, 2);
    season::remove_team(&snapshot, ids[1])
        .unwrap()
        .apply(&mut snapshot)
        .unwrap();
    assert_eq!(
        snapshot.team(ids[1]).map(|t| t.status),
        Some(TeamStatus::Deleted)
    );

    season::reset_season(&snapshot).apply(&mut snapshot).unwrap();

    assert!(snapshot.team(ids[1]).is_none());
    assert_eq!(
        snapshot.team(ids[0]).map(|t| t.status),
        Some(TeamStatus::Active)
    );
    assert!(snapshot.matches.is_empty());
    assert_eq!(
        season::remove_team(&snapshot, ids[1]),
        Err(SeasonError::TeamNotFound(ids[1]))
    );
}

#[test]
fn test_season_reset_clears_playoffs_and_stats() {
    let (mut snapshot, ids) = ranked_league(6);
    let bracket = playoff::generate(&snapshot, PlayoffMode::PlayIn, PlayoffType::Double).unwrap();
    bracket.changes.apply(&mut snapshot).unwrap();
    let (changes, _) =
        season::record_stat(&snapshot, ids[0], "Goleador", StatKind::Goals, 12).unwrap();
    changes.apply(&mut snapshot).unwrap();

    season::reset_season(&snapshot).apply(&mut snapshot).unwrap();

    assert!(snapshot.matches.is_empty());
    assert!(snapshot.season_stats.is_empty());
    assert!(snapshot.league.bye_list.is_empty());
    assert_eq!(snapshot.league.playoff_mode, None);
    // The configured leg count is a league setting and survives
    assert_eq!(snapshot.league.playoff_type, PlayoffType::Double);
    assert_eq!(snapshot.teams.len(), 6);
}

#[test]
fn test_reset_is_idempotent() {
    let (mut snapshot, ids) = league_with_teams(&["A", "B", "C"]);
    play(&mut snapshot, ids[0], ids[1], 1, 0);
    season::remove_team(&snapshot, ids[2])
        .unwrap()
        .apply(&mut snapshot)
        .unwrap();

    season::reset_season(&snapshot).apply(&mut snapshot).unwrap();
    let after_first = snapshot.clone();
    let second = season::reset_season(&snapshot);
    assert!(second.purge_teams.is_empty());
    second.apply(&mut snapshot).unwrap();
    assert_eq!(snapshot, after_first);
}

#[test]
fn test_playoff_reset_keeps_regular_season() {
    let (mut snapshot, _) = ranked_league(8);
    let bracket =
        playoff::generate(&snapshot, PlayoffMode::DirectCut, PlayoffType::Single).unwrap();
    bracket.changes.apply(&mut snapshot).unwrap();
    play_stage(&mut snapshot, Stage::Quarterfinal, 1, 0);

    season::reset_playoffs(&snapshot).apply(&mut snapshot).unwrap();

    assert_eq!(snapshot.playoff_matches().count(), 0);
    assert_eq!(snapshot.matches_in_stage(Stage::Regular).len(), 28);
    assert_eq!(snapshot.teams.len(), 8);
}

#[test]
fn test_removal_keeps_played_playoff_history() {
    let (mut snapshot, ids) = ranked_league(8);
    let bracket =
        playoff::generate(&snapshot, PlayoffMode::DirectCut, PlayoffType::Single).unwrap();
    bracket.changes.apply(&mut snapshot).unwrap();
    let quarterfinal = snapshot.matches_in_stage(Stage::Quarterfinal)[0].id;
    common::record(&mut snapshot, quarterfinal, ids[0], ids[7], 0, 1);

    season::remove_team(&snapshot, ids[1])
        .unwrap()
        .apply(&mut snapshot)
        .unwrap();

    assert!(snapshot.match_by_id(quarterfinal).is_some());
    assert_eq!(snapshot.matches_in_stage(Stage::Quarterfinal).len(), 3);
}

#[test]
fn test_roster_limit_and_duplicate_names() {
    let mut snapshot = common::empty_league(2);
    let first = add_team(&mut snapshot, "Halcones");
    assert_eq!(
        season::admit_team(&snapshot, " halcones ").map(|(_, id)| id),
        Err(SeasonError::DuplicateTeamName("halcones".to_string()))
    );
    add_team(&mut snapshot, "Tigres");
    assert_eq!(
        season::admit_team(&snapshot, "Pumas").map(|(_, id)| id),
        Err(SeasonError::RosterFull { max: 2 })
    );

    // A removed team frees its slot and its name
    season::remove_team(&snapshot, first)
        .unwrap()
        .apply(&mut snapshot)
        .unwrap();
    assert!(season::admit_team(&snapshot, "Halcones").is_ok());
}

#[test]
fn test_scheduling_rules() {
    let (mut snapshot, ids) = league_with_teams(&["A", "B", "C"]);

    assert_eq!(
        season::schedule_match(&snapshot, &ScheduleRequest::new(ids[0], ids[0])).map(|(_, id)| id),
        Err(SeasonError::SameTeam)
    );

    let first = schedule(&mut snapshot, ids[0], ids[1]);
    let again = schedule(&mut snapshot, ids[0], ids[1]);
    assert_eq!(first, again);
    assert_eq!(snapshot.matches.len(), 1);

    let reverse = schedule(&mut snapshot, ids[1], ids[0]);
    assert_ne!(first, reverse);

    common::record(&mut snapshot, first, ids[0], ids[1], 1, 0);
    assert_eq!(
        season::schedule_match(&snapshot, &ScheduleRequest::new(ids[0], ids[1])).map(|(_, id)| id),
        Err(SeasonError::MatchAlreadyPlayed(first))
    );

    let (changes, _) = season::toggle_hidden(&snapshot, ids[2]).unwrap();
    changes.apply(&mut snapshot).unwrap();
    assert_eq!(
        season::schedule_match(&snapshot, &ScheduleRequest::new(ids[2], ids[0])).map(|(_, id)| id),
        Err(SeasonError::TeamNotSchedulable(ids[2]))
    );
}

#[test]
fn test_clearing_and_deleting_results() {
    let (mut snapshot, ids) = league_with_teams(&["A", "B", "C"]);
    let played = play(&mut snapshot, ids[0], ids[1], 3, 1);

    season::record_result(&snapshot, played, ids[0], ids[1], None)
        .unwrap()
        .apply(&mut snapshot)
        .unwrap();
    assert!(!snapshot.match_by_id(played).unwrap().is_completed());

    assert_eq!(
        season::record_result(&snapshot, played, ids[0], ids[2], Some(Score::new(1, 0))),
        Err(SeasonError::TeamNotInMatch {
            team_id: ids[2],
            match_id: played,
        })
    );

    season::delete_match(&snapshot, played)
        .unwrap()
        .apply(&mut snapshot)
        .unwrap();
    assert!(snapshot.matches.is_empty());
    assert_eq!(
        season::delete_match(&snapshot, played),
        Err(SeasonError::MatchNotFound(played))
    );
}

#[test]
fn test_emptied_play_in_bracket_drops_its_byes() {
    let (mut snapshot, _) = ranked_league(6);
    playoff::generate(&snapshot, PlayoffMode::PlayIn, PlayoffType::Single)
        .unwrap()
        .changes
        .apply(&mut snapshot)
        .unwrap();
    assert_eq!(snapshot.league.bye_list.len(), 2);

    let repechaje: Vec<_> = snapshot
        .matches_in_stage(Stage::Repechaje)
        .iter()
        .map(|m| m.id)
        .collect();
    for id in repechaje {
        season::delete_match(&snapshot, id)
            .unwrap()
            .apply(&mut snapshot)
            .unwrap();
    }

    assert_eq!(snapshot.playoff_matches().count(), 0);
    assert_eq!(common::phase(&snapshot), ligapro::playoff::PlayoffPhase::NotStarted);
    assert!(snapshot.league.bye_list.is_empty());
    assert_eq!(snapshot.league.playoff_mode, None);
}

#[test]
fn test_removing_play_in_teams_drops_byes_with_the_bracket() {
    let (mut snapshot, ids) = ranked_league(6);
    playoff::generate(&snapshot, PlayoffMode::PlayIn, PlayoffType::Single)
        .unwrap()
        .changes
        .apply(&mut snapshot)
        .unwrap();

    // Seeds 2 and 3 each appear in one of the two play-in fixtures
    for seed in [2, 3] {
        season::remove_team(&snapshot, ids[seed])
            .unwrap()
            .apply(&mut snapshot)
            .unwrap();
    }

    assert_eq!(snapshot.playoff_matches().count(), 0);
    assert!(snapshot.league.bye_list.is_empty());
    assert_eq!(snapshot.league.playoff_mode, None);
}
