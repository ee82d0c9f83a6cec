//! League repository: the persistence boundary of the engine.
//!
//! Every mutating engine call goes through [`LeagueRepository::transact`], which
//! reads a snapshot, lets the engine decide, and applies the resulting
//! changeset as one unit.
#![allow(clippy::needless_raw_string_hashes)]

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use log::{debug, info, warn};
use sqlx::{PgConnection, PgPool, Row};

use super::{
    bye_list,
    timeouts::{DEFAULT_QUERY_TIMEOUT, DEFAULT_TRANSACTION_TIMEOUT, with_timeout},
};
use crate::league::{
    changeset::{Changeset, PlayoffUpdate},
    models::{
        ByeList, League, LeagueId, Match, PlayoffType, PointsPolicy, Score, SeasonStat, Stage, Team,
        TeamStatus,
    },
    snapshot::LeagueSnapshot,
};
use crate::manager::{LeagueError, LeagueResult};
use crate::season::SeasonError;

/// Trait for league repository operations
#[async_trait]
pub trait LeagueRepository: Send + Sync {
    /// Read a consistent snapshot of a league
    async fn load(&self, league_id: LeagueId) -> LeagueResult<LeagueSnapshot>;

    /// All leagues, oldest first
    async fn list_leagues(&self) -> LeagueResult<Vec<League>>;

    /// Store a new league
    async fn create_league(&self, league: &League) -> LeagueResult<()>;

    /// Run `decide` against a snapshot and apply the changeset it returns.
    ///
    /// The snapshot read and the writes happen under one lock on the league,
    /// so no concurrent caller can observe or act on a half-applied change.
    /// When `decide` fails nothing is written.
    async fn transact<T, F>(&self, league_id: LeagueId, decide: F) -> LeagueResult<T>
    where
        T: Send,
        F: FnOnce(&LeagueSnapshot) -> LeagueResult<(Changeset, T)> + Send;
}

/// PostgreSQL implementation of the league repository
#[derive(Clone)]
pub struct PgLeagueRepository {
    pool: PgPool,
}

impl PgLeagueRepository {
    /// Create a new PostgreSQL league repository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn to_count(value: i32, column: &str) -> LeagueResult<u32> {
    u32::try_from(value).map_err(|_| LeagueError::CorruptData(format!("negative {column}: {value}")))
}

fn to_int(value: u32, column: &str) -> LeagueResult<i32> {
    i32::try_from(value)
        .map_err(|_| LeagueError::CorruptData(format!("{column} out of range: {value}")))
}

/// League record plus the decode error of its bye list, if the stored value is malformed.
///
/// A malformed bye list is read as empty so that resets and regeneration can
/// still overwrite it; advancing out of a play-in round refuses instead.
fn league_from_row(row: &sqlx::postgres::PgRow) -> LeagueResult<(League, Option<String>)> {
    let id: LeagueId = row.get("id");
    let playoff_mode: Option<String> = row.get("playoff_mode");
    let playoff_type: Option<String> = row.get("playoff_type");
    let bye_teams: Option<String> = row.get("playoff_bye_teams");

    let (bye_list, bye_list_fault) = match bye_list::decode(bye_teams.as_deref()) {
        Ok(list) => (list, None),
        Err(e) => {
            warn!("League {id} has an unreadable bye list: {e}");
            (ByeList::new(), Some(e.to_string()))
        }
    };

    let league = League {
        id,
        name: row.get("name"),
        points: PointsPolicy {
            win_points: to_count(row.get("win_points"), "win_points")?,
            draw_points: to_count(row.get("draw_points"), "draw_points")?,
            loss_points: to_count(row.get("loss_points"), "loss_points")?,
        },
        max_teams: to_count(row.get("max_teams"), "max_teams")?,
        playoff_mode: playoff_mode
            .filter(|m| !m.is_empty())
            .map(|m| m.parse())
            .transpose()?,
        playoff_type: match playoff_type.as_deref() {
            None | Some("") => PlayoffType::default(),
            Some(tag) => tag.parse()?,
        },
        bye_list,
    };
    Ok((league, bye_list_fault))
}

async fn read_snapshot(
    conn: &mut PgConnection,
    league_id: LeagueId,
    for_update: bool,
) -> LeagueResult<LeagueSnapshot> {
    let sql = if for_update {
        r#"
        SELECT id, name, win_points, draw_points, loss_points, max_teams,
               playoff_mode, playoff_type, playoff_bye_teams
        FROM leagues
        WHERE id = $1
        FOR UPDATE
        "#
    } else {
        r#"
        SELECT id, name, win_points, draw_points, loss_points, max_teams,
               playoff_mode, playoff_type, playoff_bye_teams
        FROM leagues
        WHERE id = $1
        "#
    };

    let row = sqlx::query(sql)
        .bind(league_id)
        .fetch_optional(&mut *conn)
        .await?
        .ok_or(LeagueError::LeagueNotFound(league_id))?;
    let (league, bye_list_fault) = league_from_row(&row)?;

    let teams = sqlx::query(
        "SELECT id, league_id, name, is_deleted, is_hidden
         FROM teams WHERE league_id = $1 ORDER BY seq",
    )
    .bind(league_id)
    .fetch_all(&mut *conn)
    .await?
    .iter()
    .map(|r| Team {
        id: r.get("id"),
        league_id: r.get("league_id"),
        name: r.get("name"),
        status: TeamStatus::from_flags(r.get("is_deleted"), r.get("is_hidden")),
    })
    .collect();

    let match_rows = sqlx::query(
        "SELECT id, league_id, home_team_id, away_team_id, home_score, away_score,
                stage, match_name, court_id, match_date
         FROM matches WHERE league_id = $1 ORDER BY seq",
    )
    .bind(league_id)
    .fetch_all(&mut *conn)
    .await?;

    let mut matches = Vec::with_capacity(match_rows.len());
    for r in &match_rows {
        let home_score: Option<i32> = r.get("home_score");
        let away_score: Option<i32> = r.get("away_score");
        let score = match (home_score, away_score) {
            (Some(home), Some(away)) => Some(Score::new(
                to_count(home, "home_score")?,
                to_count(away, "away_score")?,
            )),
            _ => None,
        };
        let stage: Option<String> = r.get("stage");
        matches.push(Match {
            id: r.get("id"),
            league_id: r.get("league_id"),
            home: r.get("home_team_id"),
            away: r.get("away_team_id"),
            score,
            stage: Stage::from_db(stage.as_deref())?,
            name: r.get("match_name"),
            court_id: r.get("court_id"),
            scheduled_at: r.get::<Option<DateTime<Utc>>, _>("match_date"),
        });
    }

    let stat_rows = sqlx::query(
        "SELECT id, league_id, team_id, player_name, stat_type, value
         FROM season_stats WHERE league_id = $1 ORDER BY created_at, id",
    )
    .bind(league_id)
    .fetch_all(&mut *conn)
    .await?;

    let mut season_stats = Vec::with_capacity(stat_rows.len());
    for r in &stat_rows {
        let kind: String = r.get("stat_type");
        season_stats.push(SeasonStat {
            id: r.get("id"),
            league_id: r.get("league_id"),
            team_id: r.get("team_id"),
            player_name: r.get("player_name"),
            kind: kind.parse()?,
            value: to_count(r.get("value"), "value")?,
        });
    }

    Ok(LeagueSnapshot {
        league,
        teams,
        matches,
        season_stats,
        bye_list_fault,
    })
}

async fn write_changeset(
    conn: &mut PgConnection,
    league_id: LeagueId,
    changes: &Changeset,
) -> LeagueResult<()> {
    if !changes.discard_matches.is_empty() {
        sqlx::query("DELETE FROM matches WHERE league_id = $1 AND id = ANY($2)")
            .bind(league_id)
            .bind(&changes.discard_matches)
            .execute(&mut *conn)
            .await?;
    }

    for update in &changes.score_updates {
        let (home, away) = match update.score {
            Some(score) => (
                Some(to_int(score.home, "home_score")?),
                Some(to_int(score.away, "away_score")?),
            ),
            None => (None, None),
        };
        let result = sqlx::query(
            "UPDATE matches
             SET home_score = $1, away_score = $2, is_completed = $3
             WHERE id = $4 AND league_id = $5",
        )
        .bind(home)
        .bind(away)
        .bind(update.score.is_some())
        .bind(update.match_id)
        .bind(league_id)
        .execute(&mut *conn)
        .await?;
        if result.rows_affected() == 0 {
            return Err(SeasonError::MatchNotFound(update.match_id).into());
        }
    }

    for update in &changes.schedule_updates {
        let result = sqlx::query(
            "UPDATE matches
             SET match_date = COALESCE($1, match_date), court_id = COALESCE($2, court_id)
             WHERE id = $3 AND league_id = $4",
        )
        .bind(update.scheduled_at)
        .bind(update.court_id)
        .bind(update.match_id)
        .bind(league_id)
        .execute(&mut *conn)
        .await?;
        if result.rows_affected() == 0 {
            return Err(SeasonError::MatchNotFound(update.match_id).into());
        }
    }

    for m in &changes.create_matches {
        sqlx::query(
            "INSERT INTO matches
                (id, league_id, home_team_id, away_team_id, stage, match_name, court_id, match_date)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8)",
        )
        .bind(m.id)
        .bind(league_id)
        .bind(m.home)
        .bind(m.away)
        .bind(m.stage.as_str())
        .bind(&m.name)
        .bind(m.court_id)
        .bind(m.scheduled_at)
        .execute(&mut *conn)
        .await?;
    }

    for team in &changes.add_teams {
        let (is_deleted, is_hidden) = team.status.to_flags();
        sqlx::query(
            "INSERT INTO teams (id, league_id, name, is_deleted, is_hidden)
             VALUES ($1, $2, $3, $4, $5)",
        )
        .bind(team.id)
        .bind(league_id)
        .bind(&team.name)
        .bind(is_deleted)
        .bind(is_hidden)
        .execute(&mut *conn)
        .await?;
    }

    for (team_id, status) in &changes.status_updates {
        let (is_deleted, is_hidden) = status.to_flags();
        let result = sqlx::query(
            "UPDATE teams SET is_deleted = $1, is_hidden = $2 WHERE id = $3 AND league_id = $4",
        )
        .bind(is_deleted)
        .bind(is_hidden)
        .bind(team_id)
        .bind(league_id)
        .execute(&mut *conn)
        .await?;
        if result.rows_affected() == 0 {
            return Err(SeasonError::TeamNotFound(*team_id).into());
        }
    }

    for team_id in &changes.purge_teams {
        let referenced = sqlx::query(
            "SELECT id FROM matches WHERE home_team_id = $1 OR away_team_id = $1 LIMIT 1",
        )
        .bind(team_id)
        .fetch_optional(&mut *conn)
        .await?;
        if let Some(row) = referenced {
            return Err(SeasonError::TeamStillReferenced {
                team_id: *team_id,
                match_id: row.get("id"),
            }
            .into());
        }
        sqlx::query("DELETE FROM season_stats WHERE team_id = $1")
            .bind(team_id)
            .execute(&mut *conn)
            .await?;
        sqlx::query("DELETE FROM teams WHERE id = $1 AND league_id = $2")
            .bind(team_id)
            .bind(league_id)
            .execute(&mut *conn)
            .await?;
    }

    match &changes.playoff {
        Some(PlayoffUpdate::Configure {
            mode,
            playoff_type,
            bye_list: byes,
        }) => {
            sqlx::query(
                "UPDATE leagues
                 SET playoff_mode = $1, playoff_type = $2, playoff_bye_teams = $3
                 WHERE id = $4",
            )
            .bind(mode.as_str())
            .bind(playoff_type.as_str())
            .bind(bye_list::encode(byes)?)
            .bind(league_id)
            .execute(&mut *conn)
            .await?;
        }
        Some(PlayoffUpdate::Clear) => {
            sqlx::query(
                "UPDATE leagues SET playoff_mode = NULL, playoff_bye_teams = NULL WHERE id = $1",
            )
            .bind(league_id)
            .execute(&mut *conn)
            .await?;
        }
        None => {}
    }

    if changes.discard_season_stats {
        sqlx::query("DELETE FROM season_stats WHERE league_id = $1")
            .bind(league_id)
            .execute(&mut *conn)
            .await?;
    }

    for stat in &changes.add_season_stats {
        sqlx::query(
            "INSERT INTO season_stats (id, league_id, team_id, player_name, stat_type, value)
             VALUES ($1, $2, $3, $4, $5, $6)",
        )
        .bind(stat.id)
        .bind(league_id)
        .bind(stat.team_id)
        .bind(&stat.player_name)
        .bind(stat.kind.as_str())
        .bind(to_int(stat.value, "value")?)
        .execute(&mut *conn)
        .await?;
    }

    Ok(())
}

#[async_trait]
impl LeagueRepository for PgLeagueRepository {
    async fn load(&self, league_id: LeagueId) -> LeagueResult<LeagueSnapshot> {
        with_timeout(DEFAULT_QUERY_TIMEOUT, async {
            // All four reads see the same committed state
            let mut tx = self.pool.begin().await?;
            sqlx::query("SET TRANSACTION ISOLATION LEVEL REPEATABLE READ, READ ONLY")
                .execute(&mut *tx)
                .await?;
            let snapshot = read_snapshot(&mut *tx, league_id, false).await?;
            tx.commit().await?;
            Ok::<LeagueSnapshot, LeagueError>(snapshot)
        })
        .await
    }

    async fn list_leagues(&self) -> LeagueResult<Vec<League>> {
        with_timeout(DEFAULT_QUERY_TIMEOUT, async {
            let rows = sqlx::query(
                r#"
                SELECT id, name, win_points, draw_points, loss_points, max_teams,
                       playoff_mode, playoff_type, playoff_bye_teams
                FROM leagues
                ORDER BY created_at, id
                "#,
            )
            .fetch_all(&self.pool)
            .await?;
            rows.iter()
                .map(|row| league_from_row(row).map(|(league, _)| league))
                .collect::<LeagueResult<Vec<_>>>()
        })
        .await
    }

    async fn create_league(&self, league: &League) -> LeagueResult<()> {
        with_timeout(DEFAULT_QUERY_TIMEOUT, async {
            sqlx::query(
                r#"
                INSERT INTO leagues
                    (id, name, win_points, draw_points, loss_points, max_teams,
                     playoff_mode, playoff_type, playoff_bye_teams)
                VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
                "#,
            )
            .bind(league.id)
            .bind(&league.name)
            .bind(to_int(league.points.win_points, "win_points")?)
            .bind(to_int(league.points.draw_points, "draw_points")?)
            .bind(to_int(league.points.loss_points, "loss_points")?)
            .bind(to_int(league.max_teams, "max_teams")?)
            .bind(league.playoff_mode.map(|m| m.as_str()))
            .bind(league.playoff_type.as_str())
            .bind(bye_list::encode(&league.bye_list)?)
            .execute(&self.pool)
            .await?;

            info!("Created league {} ({})", league.name, league.id);
            Ok::<(), LeagueError>(())
        })
        .await
    }

    async fn transact<T, F>(&self, league_id: LeagueId, decide: F) -> LeagueResult<T>
    where
        T: Send,
        F: FnOnce(&LeagueSnapshot) -> LeagueResult<(Changeset, T)> + Send,
    {
        with_timeout(DEFAULT_TRANSACTION_TIMEOUT, async {
            let mut tx = self.pool.begin().await?;

            let snapshot = read_snapshot(&mut *tx, league_id, true).await?;
            let (changes, output) = decide(&snapshot)?;

            if changes.is_empty() {
                debug!("Nothing to write for league {league_id}");
            } else {
                write_changeset(&mut *tx, league_id, &changes).await?;
            }

            tx.commit().await?;
            Ok::<T, LeagueError>(output)
        })
        .await
    }
}
