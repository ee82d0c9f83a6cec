//! Turning pairings into named match descriptors.

use crate::league::{
    models::{NewMatch, PlayoffType, Stage, TeamId},
    snapshot::LeagueSnapshot,
};

/// Suffix of the first leg of a two-legged fixture
pub const FIRST_LEG: &str = "(Ida)";

/// Suffix of the return leg
pub const SECOND_LEG: &str = "(Vuelta)";

/// Display name of fixture `number` (1-based) of a stage.
///
/// The number is left out when the stage has a single fixture.
pub fn fixture_name(stage: Stage, number: usize, of: usize, home: &str, away: &str) -> String {
    if of > 1 {
        format!("{} {}: {} vs {}", stage.label(), number, home, away)
    } else {
        format!("{}: {} vs {}", stage.label(), home, away)
    }
}

/// Match descriptors for a list of `(home, away)` pairings.
///
/// Two-legged stages get a return leg per pairing with the sides swapped,
/// right after the first leg.
pub fn build_matches(
    snapshot: &LeagueSnapshot,
    stage: Stage,
    pairings: &[(TeamId, TeamId)],
    playoff_type: PlayoffType,
) -> Vec<NewMatch> {
    let two_legged = playoff_type.is_two_legged(stage);
    let mut matches = Vec::with_capacity(pairings.len() * if two_legged { 2 } else { 1 });

    for (i, &(home, away)) in pairings.iter().enumerate() {
        let home_name = snapshot.team_name(home);
        let away_name = snapshot.team_name(away);
        let number = i + 1;

        if two_legged {
            let first = fixture_name(stage, number, pairings.len(), &home_name, &away_name);
            let second = fixture_name(stage, number, pairings.len(), &away_name, &home_name);
            matches.push(NewMatch::new(home, away, stage, format!("{first} {FIRST_LEG}")));
            matches.push(NewMatch::new(away, home, stage, format!("{second} {SECOND_LEG}")));
        } else {
            let name = fixture_name(stage, number, pairings.len(), &home_name, &away_name);
            matches.push(NewMatch::new(home, away, stage, name));
        }
    }

    matches
}
