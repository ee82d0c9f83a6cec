//! League service: every engine call wrapped in one repository transaction.

use log::info;
use std::{collections::HashMap, sync::Arc};
use uuid::Uuid;

use super::{
    errors::{LeagueError, LeagueResult},
    models::{AdvanceReport, BracketReport, LeagueOptions, Leaderboards, PlayoffStatus, ResetReport},
};
use crate::config::LeagueDefaults;
use crate::db::LeagueRepository;
use crate::league::{
    changeset::Changeset,
    models::{
        League, LeagueId, MatchId, PlayoffMode, PlayoffType, Score, StatKind, TeamId, TeamStatus,
    },
    snapshot::LeagueSnapshot,
};
use crate::playoff::{self, AdvanceOutcome, HomeAdvances, PlayoffPhase, TieBreaker};
use crate::season::{self, ScheduleRequest, SeasonError};
use crate::standings::{self, StandingRow, StandingsScope};

/// League manager
///
/// Reads go straight to the repository; writes run the engine inside
/// [`LeagueRepository::transact`] so a bracket is never observed half built.
pub struct LeagueManager<R> {
    repo: Arc<R>,
    tie_breaker: Arc<dyn TieBreaker>,
    defaults: LeagueDefaults,
}

impl<R> Clone for LeagueManager<R> {
    fn clone(&self) -> Self {
        Self {
            repo: Arc::clone(&self.repo),
            tie_breaker: Arc::clone(&self.tie_breaker),
            defaults: self.defaults.clone(),
        }
    }
}

impl<R: LeagueRepository> LeagueManager<R> {
    /// Create a new league manager
    ///
    /// # Arguments
    ///
    /// * `repo` - League storage
    /// * `defaults` - Settings for leagues created without overrides
    pub fn new(repo: Arc<R>, defaults: LeagueDefaults) -> Self {
        Self {
            repo,
            tie_breaker: Arc::new(HomeAdvances),
            defaults,
        }
    }

    /// Replace the policy used for tied fixtures
    pub fn with_tie_breaker(mut self, tie_breaker: Arc<dyn TieBreaker>) -> Self {
        self.tie_breaker = tie_breaker;
        self
    }

    pub fn repository(&self) -> &R {
        &self.repo
    }

    /// Create a league from the configured defaults and the given overrides
    pub async fn create_league(&self, name: &str, options: LeagueOptions) -> LeagueResult<League> {
        let name = name.trim();
        if name.is_empty() {
            return Err(LeagueError::InvalidName);
        }

        let mut league = League::new(
            name,
            options.points.unwrap_or_else(|| self.defaults.points()),
            options.max_teams.unwrap_or(self.defaults.max_teams),
        );
        league.playoff_type = options.playoff_type.unwrap_or(self.defaults.playoff_type);

        self.repo.create_league(&league).await?;
        info!("League {} created: {}", league.id, league.name);
        Ok(league)
    }

    pub async fn list_leagues(&self) -> LeagueResult<Vec<League>> {
        self.repo.list_leagues().await
    }

    /// Current snapshot of a league
    pub async fn snapshot(&self, league_id: LeagueId) -> LeagueResult<LeagueSnapshot> {
        self.repo.load(league_id).await
    }

    /// Add a team, refusing duplicates and a full roster
    pub async fn add_team(&self, league_id: LeagueId, name: &str) -> LeagueResult<TeamId> {
        let team_id = self
            .repo
            .transact(league_id, |snapshot| Ok(season::admit_team(snapshot, name)?))
            .await?;
        info!("Team {} joined league {}", team_id, league_id);
        Ok(team_id)
    }

    /// Ranked table
    pub async fn standings(
        &self,
        league_id: LeagueId,
        scope: StandingsScope,
    ) -> LeagueResult<Vec<StandingRow>> {
        let snapshot = self.repo.load(league_id).await?;
        Ok(standings::for_snapshot(&snapshot, scope))
    }

    /// Top scorers and goalkeepers
    pub async fn leaderboards(
        &self,
        league_id: LeagueId,
        limit: Option<usize>,
    ) -> LeagueResult<Leaderboards> {
        let snapshot = self.repo.load(league_id).await?;
        Ok(Leaderboards {
            scorers: standings::top_scorers(&snapshot, limit)
                .into_iter()
                .cloned()
                .collect(),
            goalkeepers: standings::top_goalkeepers(&snapshot, limit)
                .into_iter()
                .cloned()
                .collect(),
        })
    }

    /// Completed meetings per pair of competing teams
    pub async fn head_to_head(
        &self,
        league_id: LeagueId,
    ) -> LeagueResult<HashMap<(TeamId, TeamId), u32>> {
        let snapshot = self.repo.load(league_id).await?;
        Ok(standings::head_to_head(&snapshot))
    }

    pub async fn playoff_status(&self, league_id: LeagueId) -> LeagueResult<PlayoffStatus> {
        let snapshot = self.repo.load(league_id).await?;
        Ok(PlayoffStatus {
            phase: PlayoffPhase::observe(&snapshot, self.tie_breaker.as_ref()),
            mode: snapshot.league.playoff_mode,
            playoff_type: snapshot.league.playoff_type,
            byes: snapshot.league.bye_list.clone(),
        })
    }

    /// Draw the first playoff round from the regular-season table.
    ///
    /// Replaces any existing bracket. `playoff_type` falls back to the
    /// league's stored type.
    pub async fn generate_playoffs(
        &self,
        league_id: LeagueId,
        mode: PlayoffMode,
        playoff_type: Option<PlayoffType>,
    ) -> LeagueResult<BracketReport> {
        self.repo
            .transact(league_id, |snapshot| {
                let playoff_type = playoff_type.unwrap_or(snapshot.league.playoff_type);
                let bracket = playoff::generate(snapshot, mode, playoff_type)?;
                let report = BracketReport {
                    stage: bracket.stage,
                    matches_created: created_ids(&bracket.changes),
                    byes: bracket.byes,
                };
                Ok((bracket.changes, report))
            })
            .await
    }

    /// Draw the next playoff round, or name the champion once the final is played
    pub async fn advance_playoffs(&self, league_id: LeagueId) -> LeagueResult<AdvanceReport> {
        let tie_breaker = self.tie_breaker.as_ref();
        self.repo
            .transact(league_id, |snapshot| {
                match playoff::advance(snapshot, tie_breaker)? {
                    AdvanceOutcome::NextRound {
                        stage,
                        qualifiers,
                        changes,
                    } => {
                        let report = AdvanceReport::NextRound {
                            stage,
                            matches_created: created_ids(&changes),
                            qualifiers,
                        };
                        Ok((changes, report))
                    }
                    AdvanceOutcome::Champion { team_id } => Ok((
                        Changeset::default(),
                        AdvanceReport::Champion {
                            team_id,
                            team_name: snapshot.team_name(team_id),
                        },
                    )),
                }
            })
            .await
    }

    /// Withdraw a team for the rest of the season
    pub async fn remove_team(&self, league_id: LeagueId, team_id: TeamId) -> LeagueResult<()> {
        self.repo
            .transact(league_id, |snapshot| {
                Ok((season::remove_team(snapshot, team_id)?, ()))
            })
            .await
    }

    /// Flip a team between active and hidden, returning its new status
    pub async fn toggle_team_visibility(
        &self,
        league_id: LeagueId,
        team_id: TeamId,
    ) -> LeagueResult<TeamStatus> {
        self.repo
            .transact(league_id, |snapshot| {
                Ok(season::toggle_hidden(snapshot, team_id)?)
            })
            .await
    }

    /// Start a new season: no matches, statistics or removed teams survive
    pub async fn reset_season(&self, league_id: LeagueId) -> LeagueResult<ResetReport> {
        let report = self
            .repo
            .transact(league_id, |snapshot| {
                let changes = season::reset_season(snapshot);
                let report = ResetReport {
                    matches_discarded: changes.discard_matches.len(),
                    teams_purged: changes.purge_teams.len(),
                    stats_discarded: snapshot.season_stats.len(),
                };
                Ok((changes, report))
            })
            .await?;
        info!(
            "League {} reset: {} matches, {} teams, {} stats",
            league_id, report.matches_discarded, report.teams_purged, report.stats_discarded
        );
        Ok(report)
    }

    /// Discard the bracket, returning how many playoff matches went with it
    pub async fn reset_playoffs(&self, league_id: LeagueId) -> LeagueResult<usize> {
        self.repo
            .transact(league_id, |snapshot| {
                let changes = season::reset_playoffs(snapshot);
                let discarded = changes.discard_matches.len();
                Ok((changes, discarded))
            })
            .await
    }

    /// Place a regular-season fixture, returning the id of the match
    pub async fn schedule_match(
        &self,
        league_id: LeagueId,
        request: ScheduleRequest,
    ) -> LeagueResult<MatchId> {
        self.repo
            .transact(league_id, |snapshot| {
                Ok(season::schedule_match(snapshot, &request)?)
            })
            .await
    }

    /// Record or clear a score; `home`/`away` may name the sides in either order
    pub async fn record_result(
        &self,
        league_id: LeagueId,
        match_id: MatchId,
        home: TeamId,
        away: TeamId,
        score: Option<Score>,
    ) -> LeagueResult<()> {
        self.repo
            .transact(league_id, |snapshot| {
                Ok((season::record_result(snapshot, match_id, home, away, score)?, ()))
            })
            .await
    }

    pub async fn record_stat(
        &self,
        league_id: LeagueId,
        team_id: TeamId,
        player_name: &str,
        kind: StatKind,
        value: u32,
    ) -> LeagueResult<Uuid> {
        self.repo
            .transact(league_id, |snapshot| {
                Ok(season::record_stat(snapshot, team_id, player_name, kind, value)?)
            })
            .await
    }

    pub async fn delete_match(&self, league_id: LeagueId, match_id: MatchId) -> LeagueResult<()> {
        self.repo
            .transact(league_id, |snapshot| {
                Ok((season::delete_match(snapshot, match_id)?, ()))
            })
            .await
    }

    /// Name of a team, refusing ids the league does not know
    pub async fn team_name(&self, league_id: LeagueId, team_id: TeamId) -> LeagueResult<String> {
        let snapshot = self.repo.load(league_id).await?;
        snapshot
            .team(team_id)
            .map(|t| t.name.clone())
            .ok_or_else(|| SeasonError::TeamNotFound(team_id).into())
    }
}

fn created_ids(changes: &Changeset) -> Vec<MatchId> {
    changes.create_matches.iter().map(|m| m.id).collect()
}
