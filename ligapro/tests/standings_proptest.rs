/// Property-based tests for the league table and bracket planning using proptest
///
/// Random seasons are played between a random number of teams, with some
/// teams hidden or removed, and the table is checked for the invariants it
/// must hold regardless of the results.
use ligapro::league::{
    League, LeagueSnapshot, NewMatch, PlayoffMode, PointsPolicy, Score, Stage, Team, TeamStatus,
};
use ligapro::playoff::{self, PlayoffError};
use ligapro::standings::{self, StandingsScope};
use proptest::prelude::*;
use std::collections::HashSet;

// Strategy for a team's roster state, mostly active
fn status_strategy() -> impl Strategy<Value = TeamStatus> {
    prop_oneof![
        6 => Just(TeamStatus::Active),
        1 => Just(TeamStatus::Hidden),
        1 => Just(TeamStatus::Deleted),
    ]
}

// Strategy for a season: team statuses plus (home, away, score) triples by team index
fn season_strategy() -> impl Strategy<Value = (Vec<TeamStatus>, Vec<(usize, usize, Option<(u32, u32)>)>)> {
    prop::collection::vec(status_strategy(), 2..=16).prop_flat_map(|statuses| {
        let n = statuses.len();
        let fixture = (0..n, 0..n, prop::option::weighted(0.8, (0u32..8, 0u32..8)))
            .prop_filter("sides differ", |(h, a, _)| h != a);
        (Just(statuses), prop::collection::vec(fixture, 0..60))
    })
}

fn build(
    statuses: &[TeamStatus],
    fixtures: &[(usize, usize, Option<(u32, u32)>)],
) -> LeagueSnapshot {
    let league = League::new("Liga Aleatoria", PointsPolicy::default(), 32);
    let mut snapshot = LeagueSnapshot::new(league.clone());
    for (i, status) in statuses.iter().enumerate() {
        let mut team = Team::new(league.id, format!("Equipo {i}"));
        team.status = *status;
        snapshot.teams.push(team);
    }
    for (home, away, score) in fixtures {
        let mut m = NewMatch::new(
            snapshot.teams[*home].id,
            snapshot.teams[*away].id,
            Stage::Regular,
            "Regular Match",
        )
        .into_match(league.id);
        m.score = score.map(|(h, a)| Score::new(h, a));
        snapshot.matches.push(m);
    }
    snapshot
}

proptest! {
    #[test]
    fn test_one_row_per_competing_team((statuses, fixtures) in season_strategy()) {
        let snapshot = build(&statuses, &fixtures);
        let rows = standings::for_snapshot(&snapshot, StandingsScope::RegularSeason);

        let competing = statuses.iter().filter(|s| **s == TeamStatus::Active).count();
        prop_assert_eq!(rows.len(), competing);

        let ids: HashSet<_> = rows.iter().map(|r| r.team_id).collect();
        prop_assert_eq!(ids.len(), rows.len(), "no team listed twice");
    }

    #[test]
    fn test_results_add_up_to_matches_played((statuses, fixtures) in season_strategy()) {
        let snapshot = build(&statuses, &fixtures);
        let policy = snapshot.league.points;

        for row in standings::for_snapshot(&snapshot, StandingsScope::RegularSeason) {
            prop_assert_eq!(row.won + row.drawn + row.lost, row.played);
            prop_assert_eq!(
                row.goal_difference,
                i64::try_from(row.goals_for).unwrap() - i64::try_from(row.goals_against).unwrap()
            );
            prop_assert_eq!(
                row.points,
                u64::from(row.won * policy.win_points + row.drawn * policy.draw_points)
            );
        }
    }

    #[test]
    fn test_table_is_already_sorted((statuses, fixtures) in season_strategy()) {
        let snapshot = build(&statuses, &fixtures);
        let rows = standings::for_snapshot(&snapshot, StandingsScope::RegularSeason);

        let mut resorted = rows.clone();
        resorted.sort_by(|a, b| b.sort_key().cmp(&a.sort_key()));
        prop_assert_eq!(resorted, rows.clone());

        for pair in rows.windows(2) {
            prop_assert!(pair[0].sort_key() >= pair[1].sort_key());
        }
    }

    #[test]
    fn test_goals_balance_between_active_teams(
        n in 2usize..12,
        results in prop::collection::vec((0u32..6, 0u32..6), 0..40),
    ) {
        // Only active teams: every goal scored is conceded by someone in the table
        let statuses = vec![TeamStatus::Active; n];
        let fixtures: Vec<_> = results
            .iter()
            .enumerate()
            .map(|(i, &(h, a))| (i % n, (i + 1) % n, Some((h, a))))
            .collect();
        let snapshot = build(&statuses, &fixtures);
        let rows = standings::for_snapshot(&snapshot, StandingsScope::RegularSeason);

        let scored: u64 = rows.iter().map(|r| r.goals_for).sum();
        let conceded: u64 = rows.iter().map(|r| r.goals_against).sum();
        prop_assert_eq!(scored, conceded);
        let played: u32 = rows.iter().map(|r| r.played).sum();
        prop_assert_eq!(played as usize, 2 * fixtures.len());
    }

    #[test]
    fn test_bracket_plan_uses_each_seed_once(n in 0usize..40, play_in in any::<bool>()) {
        let mode = if play_in { PlayoffMode::PlayIn } else { PlayoffMode::DirectCut };
        match playoff::plan(n, mode) {
            Ok(plan) => {
                let mut seen = HashSet::new();
                for &(home, away) in &plan.fixtures {
                    prop_assert!(home < away, "better seed plays at home");
                    prop_assert!(away < n, "seed within the table");
                    prop_assert!(seen.insert(home) && seen.insert(away));
                }
                for seed in &plan.bye_seeds {
                    prop_assert!(seen.insert(*seed), "bye seeds never play");
                }
            }
            Err(PlayoffError::InsufficientTeams { have, .. }) => prop_assert!(have < 5),
            Err(PlayoffError::PlayInNeedsMoreTeams { have, .. }) => {
                prop_assert!(play_in);
                prop_assert!(have == 5 || (8..10).contains(&have));
            }
            Err(other) => prop_assert!(false, "unexpected refusal {}", other),
        }
    }
}
