use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use ligapro::{
    league::{League, LeagueSnapshot, NewMatch, PlayoffMode, PlayoffType, PointsPolicy, Score, Stage, Team},
    playoff::{self, HomeAdvances},
    standings::{self, StandingsScope},
};
use std::hint::black_box;

/// Helper to create a league of N teams with a complete double round robin
fn setup_league(n_teams: usize) -> LeagueSnapshot {
    let league = League::new("Liga Benchmark", PointsPolicy::default(), n_teams as u32);
    let mut snapshot = LeagueSnapshot::new(league.clone());
    for i in 0..n_teams {
        snapshot.teams.push(Team::new(league.id, format!("Equipo {i}")));
    }

    let teams = snapshot.teams.clone();
    for (i, home) in teams.iter().enumerate() {
        for (j, away) in teams.iter().enumerate() {
            if i == j {
                continue;
            }
            let mut m = NewMatch::new(home.id, away.id, Stage::Regular, "Regular Match")
                .into_match(league.id);
            m.score = Some(Score::new((i * 7 + j) as u32 % 5, (j * 3 + i) as u32 % 4));
            snapshot.matches.push(m);
        }
    }

    snapshot
}

/// Benchmark the league table for growing leagues
fn bench_standings(c: &mut Criterion) {
    let mut group = c.benchmark_group("standings");
    for n_teams in [6, 12, 20] {
        let snapshot = setup_league(n_teams);
        group.bench_with_input(BenchmarkId::from_parameter(n_teams), &snapshot, |b, snapshot| {
            b.iter(|| standings::for_snapshot(black_box(snapshot), StandingsScope::RegularSeason));
        });
    }
    group.finish();
}

/// Benchmark first-round generation in both modes
fn bench_generate(c: &mut Criterion) {
    let snapshot = setup_league(12);

    c.bench_function("generate_direct_cut_12", |b| {
        b.iter(|| playoff::generate(black_box(&snapshot), PlayoffMode::DirectCut, PlayoffType::Double));
    });

    c.bench_function("generate_play_in_12", |b| {
        b.iter(|| playoff::generate(black_box(&snapshot), PlayoffMode::PlayIn, PlayoffType::Single));
    });
}

/// Benchmark advancing a fully played round of 16
fn bench_advance(c: &mut Criterion) {
    let mut snapshot = setup_league(16);
    let bracket = playoff::generate(&snapshot, PlayoffMode::DirectCut, PlayoffType::Double)
        .expect("16 teams make a bracket");
    let league_id = snapshot.league.id;
    for (i, fixture) in bracket.changes.create_matches.into_iter().enumerate() {
        let mut m = fixture.into_match(league_id);
        m.score = Some(Score::new(i as u32 % 3, 1));
        snapshot.matches.push(m);
    }

    c.bench_function("advance_round_of_16_double", |b| {
        b.iter(|| playoff::advance(black_box(&snapshot), &HomeAdvances));
    });
}

criterion_group!(engine, bench_standings, bench_generate, bench_advance);
criterion_main!(engine);
