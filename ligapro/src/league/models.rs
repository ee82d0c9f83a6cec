//! League data models: leagues, teams, matches and their lifecycle tags.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::{cmp::Ordering, fmt, str::FromStr};
use thiserror::Error;
use uuid::Uuid;

/// League ID type
pub type LeagueId = Uuid;

/// Team ID type
pub type TeamId = Uuid;

/// Match ID type
pub type MatchId = Uuid;

/// Court ID type. Courts are owned by the caller; the engine only carries the reference.
pub type CourtId = Uuid;

/// Error returned when a persisted tag does not name a known variant
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown {kind} tag: {tag:?}")]
pub struct UnknownTag {
    pub kind: &'static str,
    pub tag: String,
}

/// Phase a match belongs to.
///
/// `Regular` covers the round-robin season; the remaining variants are playoff
/// stages, declared in bracket order so that `Ord` follows the bracket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    Regular,
    Repechaje,
    RoundOf16,
    Quarterfinal,
    Semifinal,
    Final,
}

impl Stage {
    /// Playoff stages in the order a bracket moves through them
    pub const PLAYOFF_ORDER: [Stage; 5] = [
        Stage::Repechaje,
        Stage::RoundOf16,
        Stage::Quarterfinal,
        Stage::Semifinal,
        Stage::Final,
    ];

    pub fn is_playoff(self) -> bool {
        self != Stage::Regular
    }

    /// Tag stored in the `stage` column
    pub fn as_str(self) -> &'static str {
        match self {
            Stage::Regular => "regular",
            Stage::Repechaje => "repechaje",
            Stage::RoundOf16 => "round_of_16",
            Stage::Quarterfinal => "quarterfinal",
            Stage::Semifinal => "semifinal",
            Stage::Final => "final",
        }
    }

    /// Label used when naming fixtures of this stage
    pub fn label(self) -> &'static str {
        match self {
            Stage::Regular => "Jornada",
            Stage::Repechaje => "Repechaje",
            Stage::RoundOf16 => "Octavo",
            Stage::Quarterfinal => "Cuarto",
            Stage::Semifinal => "Semifinal",
            Stage::Final => "Final",
        }
    }

    /// Parse a persisted tag. Missing and empty tags predate playoffs and mean `Regular`.
    pub fn from_db(tag: Option<&str>) -> Result<Self, UnknownTag> {
        match tag {
            None | Some("") => Ok(Stage::Regular),
            Some(tag) => tag.parse(),
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Stage {
    type Err = UnknownTag;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "regular" => Ok(Stage::Regular),
            "repechaje" => Ok(Stage::Repechaje),
            "round_of_16" => Ok(Stage::RoundOf16),
            "quarterfinal" => Ok(Stage::Quarterfinal),
            "semifinal" => Ok(Stage::Semifinal),
            "final" => Ok(Stage::Final),
            other => Err(UnknownTag {
                kind: "stage",
                tag: other.to_string(),
            }),
        }
    }
}

/// How the first playoff round is drawn
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PlayoffMode {
    /// Top seeds go straight into the bracket
    #[serde(rename = "corte_directo")]
    DirectCut,
    /// Top seeds get a bye while the next seeds play a repechaje round
    #[serde(rename = "con_repechaje")]
    PlayIn,
}

impl PlayoffMode {
    pub fn as_str(self) -> &'static str {
        match self {
            PlayoffMode::DirectCut => "corte_directo",
            PlayoffMode::PlayIn => "con_repechaje",
        }
    }
}

impl fmt::Display for PlayoffMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for PlayoffMode {
    type Err = UnknownTag;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "corte_directo" | "direct" | "direct-cut" => Ok(PlayoffMode::DirectCut),
            "con_repechaje" | "play-in" | "playin" | "repechaje" => Ok(PlayoffMode::PlayIn),
            other => Err(UnknownTag {
                kind: "playoff mode",
                tag: other.to_string(),
            }),
        }
    }
}

/// Number of legs per playoff fixture
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlayoffType {
    #[default]
    Single,
    Double,
}

impl PlayoffType {
    pub fn as_str(self) -> &'static str {
        match self {
            PlayoffType::Single => "single",
            PlayoffType::Double => "double",
        }
    }

    /// Whether fixtures of `stage` are played over two legs. The final never is.
    pub fn is_two_legged(self, stage: Stage) -> bool {
        self == PlayoffType::Double && stage != Stage::Final
    }
}

impl fmt::Display for PlayoffType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for PlayoffType {
    type Err = UnknownTag;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "single" => Ok(PlayoffType::Single),
            "double" => Ok(PlayoffType::Double),
            other => Err(UnknownTag {
                kind: "playoff type",
                tag: other.to_string(),
            }),
        }
    }
}

/// Result of a match from one side's point of view
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Win,
    Draw,
    Loss,
}

/// Points awarded per result.
///
/// `loss_points` is stored with the league but standings never apply it: a loss
/// is always worth zero. Whether it should count is an open product question.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PointsPolicy {
    pub win_points: u32,
    pub draw_points: u32,
    pub loss_points: u32,
}

impl Default for PointsPolicy {
    fn default() -> Self {
        Self {
            win_points: 3,
            draw_points: 1,
            loss_points: 0,
        }
    }
}

impl PointsPolicy {
    pub fn points_for(&self, outcome: Outcome) -> u32 {
        match outcome {
            Outcome::Win => self.win_points,
            Outcome::Draw => self.draw_points,
            Outcome::Loss => 0,
        }
    }
}

/// Teams exempted from the first generated playoff round, in seed order
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ByeList(Vec<TeamId>);

impl ByeList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, team_id: &TeamId) -> bool {
        self.0.contains(team_id)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &TeamId> {
        self.0.iter()
    }

    pub fn as_slice(&self) -> &[TeamId] {
        &self.0
    }
}

impl From<Vec<TeamId>> for ByeList {
    fn from(value: Vec<TeamId>) -> Self {
        Self(value)
    }
}

impl FromIterator<TeamId> for ByeList {
    fn from_iter<I: IntoIterator<Item = TeamId>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// League model
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct League {
    pub id: LeagueId,
    pub name: String,
    pub points: PointsPolicy,
    pub max_teams: u32,
    /// Mode of the current bracket, `None` while no playoffs exist
    pub playoff_mode: Option<PlayoffMode>,
    pub playoff_type: PlayoffType,
    /// Only meaningful while playoff matches exist
    pub bye_list: ByeList,
}

impl League {
    /// Create a league with no playoff state
    pub fn new(name: impl Into<String>, points: PointsPolicy, max_teams: u32) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            points,
            max_teams,
            playoff_mode: None,
            playoff_type: PlayoffType::default(),
            bye_list: ByeList::new(),
        }
    }
}

/// Roster state of a team.
///
/// Removal is two-phase: a removed team is `Deleted` for the rest of the season
/// so its played matches keep their history, and becomes `PurgePending` at a
/// season reset once every match is gone, right before it is erased.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TeamStatus {
    #[default]
    Active,
    /// Temporarily pulled from competition
    Hidden,
    /// Removed from competition, history retained
    Deleted,
    /// Awaiting permanent removal
    PurgePending,
}

impl TeamStatus {
    /// Counted in standings and eligible for brackets
    pub fn is_competing(self) -> bool {
        self == TeamStatus::Active
    }

    pub fn is_removed(self) -> bool {
        matches!(self, TeamStatus::Deleted | TeamStatus::PurgePending)
    }

    /// Build from the `(is_deleted, is_hidden)` column pair
    pub fn from_flags(is_deleted: bool, is_hidden: bool) -> Self {
        match (is_deleted, is_hidden) {
            (true, _) => TeamStatus::Deleted,
            (false, true) => TeamStatus::Hidden,
            (false, false) => TeamStatus::Active,
        }
    }

    /// `(is_deleted, is_hidden)` column pair
    pub fn to_flags(self) -> (bool, bool) {
        match self {
            TeamStatus::Active => (false, false),
            TeamStatus::Hidden => (false, true),
            TeamStatus::Deleted | TeamStatus::PurgePending => (true, false),
        }
    }
}

/// Team model
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Team {
    pub id: TeamId,
    pub league_id: LeagueId,
    pub name: String,
    pub status: TeamStatus,
}

impl Team {
    pub fn new(league_id: LeagueId, name: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            league_id,
            name: name.into(),
            status: TeamStatus::Active,
        }
    }
}

/// Final score of a played match
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Score {
    pub home: u32,
    pub away: u32,
}

impl Score {
    pub fn new(home: u32, away: u32) -> Self {
        Self { home, away }
    }

    /// Outcome for the home side
    pub fn home_outcome(&self) -> Outcome {
        match self.home.cmp(&self.away) {
            Ordering::Greater => Outcome::Win,
            Ordering::Equal => Outcome::Draw,
            Ordering::Less => Outcome::Loss,
        }
    }

    pub fn swapped(self) -> Self {
        Self {
            home: self.away,
            away: self.home,
        }
    }
}

impl fmt::Display for Score {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.home, self.away)
    }
}

/// Side of a match a team played on
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Home,
    Away,
}

/// Match model
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Match {
    pub id: MatchId,
    pub league_id: LeagueId,
    pub home: TeamId,
    pub away: TeamId,
    /// `None` until both scores are recorded
    pub score: Option<Score>,
    pub stage: Stage,
    pub name: Option<String>,
    pub court_id: Option<CourtId>,
    pub scheduled_at: Option<DateTime<Utc>>,
}

impl Match {
    pub fn is_completed(&self) -> bool {
        self.score.is_some()
    }

    pub fn involves(&self, team_id: TeamId) -> bool {
        self.home == team_id || self.away == team_id
    }

    pub fn side_of(&self, team_id: TeamId) -> Option<Side> {
        if self.home == team_id {
            Some(Side::Home)
        } else if self.away == team_id {
            Some(Side::Away)
        } else {
            None
        }
    }

    /// Unordered identity of the two sides, used to pair up legs
    pub fn pairing(&self) -> (TeamId, TeamId) {
        if self.home <= self.away {
            (self.home, self.away)
        } else {
            (self.away, self.home)
        }
    }

    /// Goals `(for, against)` from `team_id`'s perspective, if it played and the match is complete
    pub fn goals_for(&self, team_id: TeamId) -> Option<(u32, u32)> {
        let score = self.score?;
        match self.side_of(team_id)? {
            Side::Home => Some((score.home, score.away)),
            Side::Away => Some((score.away, score.home)),
        }
    }
}

/// Descriptor of a match to be created by the persistence layer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewMatch {
    pub id: MatchId,
    pub home: TeamId,
    pub away: TeamId,
    pub stage: Stage,
    pub name: String,
    /// Left empty by the engine for the caller to fill
    pub court_id: Option<CourtId>,
    pub scheduled_at: Option<DateTime<Utc>>,
}

impl NewMatch {
    pub fn new(home: TeamId, away: TeamId, stage: Stage, name: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            home,
            away,
            stage,
            name: name.into(),
            court_id: None,
            scheduled_at: None,
        }
    }

    pub fn into_match(self, league_id: LeagueId) -> Match {
        Match {
            id: self.id,
            league_id,
            home: self.home,
            away: self.away,
            score: None,
            stage: self.stage,
            name: Some(self.name),
            court_id: self.court_id,
            scheduled_at: self.scheduled_at,
        }
    }
}

/// Kind of individual season statistic
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StatKind {
    /// Goals scored by a player
    Goals,
    /// Goals conceded by a goalkeeper
    Conceded,
}

impl StatKind {
    pub fn as_str(self) -> &'static str {
        match self {
            StatKind::Goals => "goals",
            StatKind::Conceded => "conceded",
        }
    }
}

impl FromStr for StatKind {
    type Err = UnknownTag;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "goals" => Ok(StatKind::Goals),
            "conceded" => Ok(StatKind::Conceded),
            other => Err(UnknownTag {
                kind: "stat",
                tag: other.to_string(),
            }),
        }
    }
}

/// Per-player season statistic (top scorers, goalkeepers)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeasonStat {
    pub id: Uuid,
    pub league_id: LeagueId,
    pub team_id: TeamId,
    pub player_name: String,
    pub kind: StatKind,
    pub value: u32,
}

impl SeasonStat {
    pub fn new(
        league_id: LeagueId,
        team_id: TeamId,
        player_name: impl Into<String>,
        kind: StatKind,
        value: u32,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            league_id,
            team_id,
            player_name: player_name.into(),
            kind,
            value,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stage_tags_round_trip_through_db_parser() {
        for stage in Stage::PLAYOFF_ORDER {
            assert_eq!(Stage::from_db(Some(stage.as_str())), Ok(stage));
        }
        assert_eq!(Stage::from_db(None), Ok(Stage::Regular));
        assert_eq!(Stage::from_db(Some("")), Ok(Stage::Regular));
        assert!(Stage::from_db(Some("group")).is_err());
    }

    #[test]
    fn test_stage_order_follows_bracket() {
        assert!(Stage::Repechaje < Stage::RoundOf16);
        assert!(Stage::Semifinal < Stage::Final);
        assert!(!Stage::Regular.is_playoff());
        assert!(Stage::Final.is_playoff());
    }

    #[test]
    fn test_final_is_never_two_legged() {
        assert!(PlayoffType::Double.is_two_legged(Stage::Semifinal));
        assert!(!PlayoffType::Double.is_two_legged(Stage::Final));
        assert!(!PlayoffType::Single.is_two_legged(Stage::Quarterfinal));
    }

    #[test]
    fn test_playoff_mode_accepts_cli_aliases() {
        assert_eq!("direct".parse(), Ok(PlayoffMode::DirectCut));
        assert_eq!("con_repechaje".parse(), Ok(PlayoffMode::PlayIn));
        assert_eq!("Play-In".parse(), Ok(PlayoffMode::PlayIn));
        assert!("knockout".parse::<PlayoffMode>().is_err());
    }

    #[test]
    fn test_loss_points_never_awarded() {
        let policy = PointsPolicy {
            win_points: 3,
            draw_points: 1,
            loss_points: 2,
        };
        assert_eq!(policy.points_for(Outcome::Loss), 0);
        assert_eq!(policy.points_for(Outcome::Win), 3);
    }

    #[test]
    fn test_team_status_flags() {
        assert_eq!(TeamStatus::from_flags(true, true), TeamStatus::Deleted);
        assert_eq!(TeamStatus::from_flags(false, true), TeamStatus::Hidden);
        assert_eq!(TeamStatus::Hidden.to_flags(), (false, true));
        assert_eq!(TeamStatus::PurgePending.to_flags(), (true, false));
        assert!(TeamStatus::Active.is_competing());
        assert!(!TeamStatus::Hidden.is_competing());
        assert!(TeamStatus::PurgePending.is_removed());
    }

    #[test]
    fn test_match_perspective() {
        let home = Uuid::new_v4();
        let away = Uuid::new_v4();
        let mut m = NewMatch::new(home, away, Stage::Regular, "Regular Match").into_match(Uuid::new_v4());
        assert!(!m.is_completed());
        assert_eq!(m.goals_for(home), None);

        m.score = Some(Score::new(2, 1));
        assert_eq!(m.goals_for(home), Some((2, 1)));
        assert_eq!(m.goals_for(away), Some((1, 2)));
        assert_eq!(m.goals_for(Uuid::new_v4()), None);
        assert_eq!(m.side_of(away), Some(Side::Away));
    }

    #[test]
    fn test_bye_list_serializes_as_plain_array() {
        let a = Uuid::new_v4();
        let list = ByeList::from(vec![a]);
        let json = serde_json::to_string(&list).unwrap();
        assert_eq!(json, format!("[\"{a}\"]"));
    }
}
