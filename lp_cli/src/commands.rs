//! Subcommands: parsing from the argument list and running them against a manager.

use anyhow::{Context, Error, bail};
use chrono::{DateTime, Utc};
use ligapro::{
    db::LeagueRepository,
    league::{LeagueId, MatchId, PlayoffMode, PlayoffType, PointsPolicy, Score, StatKind, TeamId},
    manager::{AdvanceReport, LeagueManager, LeagueOptions},
    playoff::PlayoffPhase,
    season::ScheduleRequest,
    standings::{StandingRow, StandingsScope},
};
use pico_args::Arguments;
use serde_json::json;
use std::fmt::Write as _;
use uuid::Uuid;

/// One parsed subcommand
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    List,
    CreateLeague {
        name: String,
        options: LeagueOptions,
    },
    AddTeam {
        league: LeagueId,
        name: String,
    },
    Standings {
        league: LeagueId,
        scope: StandingsScope,
    },
    Leaders {
        league: LeagueId,
        limit: Option<usize>,
    },
    Status {
        league: LeagueId,
    },
    Schedule {
        league: LeagueId,
        request: ScheduleRequest,
    },
    Result {
        league: LeagueId,
        match_id: MatchId,
        home: TeamId,
        away: TeamId,
        score: Option<Score>,
    },
    Stat {
        league: LeagueId,
        team: TeamId,
        player: String,
        kind: StatKind,
        value: u32,
    },
    Generate {
        league: LeagueId,
        mode: PlayoffMode,
        playoff_type: Option<PlayoffType>,
    },
    Advance {
        league: LeagueId,
    },
    RemoveTeam {
        league: LeagueId,
        team: TeamId,
    },
    ToggleTeam {
        league: LeagueId,
        team: TeamId,
    },
    DeleteMatch {
        league: LeagueId,
        match_id: MatchId,
    },
    ResetPlayoffs {
        league: LeagueId,
    },
    ResetSeason {
        league: LeagueId,
    },
}

/// Parse a `HOME-AWAY` score such as `2-1`
pub fn parse_score(s: &str) -> Result<Score, String> {
    let (home, away) = s
        .split_once('-')
        .ok_or_else(|| format!("expected HOME-AWAY, got {s:?}"))?;
    let home = home.trim().parse().map_err(|_| format!("invalid home score in {s:?}"))?;
    let away = away.trim().parse().map_err(|_| format!("invalid away score in {s:?}"))?;
    Ok(Score::new(home, away))
}

fn parse_points(s: &str) -> Result<PointsPolicy, String> {
    let (win, draw) = s
        .split_once('/')
        .ok_or_else(|| format!("expected WIN/DRAW, got {s:?}"))?;
    Ok(PointsPolicy {
        win_points: win.trim().parse().map_err(|_| format!("invalid win points in {s:?}"))?,
        draw_points: draw.trim().parse().map_err(|_| format!("invalid draw points in {s:?}"))?,
        loss_points: 0,
    })
}

impl Command {
    /// Parse the subcommand and its options from the remaining arguments
    pub fn parse(name: &str, pargs: &mut Arguments) -> Result<Self, Error> {
        let command = match name {
            "list" => Command::List,
            "create-league" => {
                // Options first, the free NAME is whatever remains
                let options = LeagueOptions {
                    points: pargs.opt_value_from_fn("--points", parse_points)?,
                    max_teams: pargs.opt_value_from_str("--max-teams")?,
                    playoff_type: pargs.opt_value_from_str("--type")?,
                };
                Command::CreateLeague {
                    name: pargs.free_from_str().context("create-league needs a NAME")?,
                    options,
                }
            }
            "add-team" => Command::AddTeam {
                league: league(pargs)?,
                name: pargs.free_from_str().context("add-team needs a NAME")?,
            },
            "standings" => Command::Standings {
                league: league(pargs)?,
                scope: if pargs.contains("--with-playoffs") {
                    StandingsScope::IncludingPlayoffs
                } else {
                    StandingsScope::RegularSeason
                },
            },
            "leaders" => Command::Leaders {
                league: league(pargs)?,
                limit: pargs.opt_value_from_str("--limit")?,
            },
            "status" => Command::Status {
                league: league(pargs)?,
            },
            "schedule" => {
                let league = league(pargs)?;
                let mut request = ScheduleRequest::new(
                    pargs.value_from_str("--home")?,
                    pargs.value_from_str("--away")?,
                );
                request.court_id = pargs.opt_value_from_str("--court")?;
                request.scheduled_at = pargs.opt_value_from_str::<_, DateTime<Utc>>("--at")?;
                Command::Schedule { league, request }
            }
            "result" => {
                let league = league(pargs)?;
                let match_id = pargs.value_from_str("--match")?;
                let home = pargs.value_from_str("--home")?;
                let away = pargs.value_from_str("--away")?;
                let clear = pargs.contains("--clear");
                let score = pargs.opt_value_from_fn("--score", parse_score)?;
                if clear == score.is_some() {
                    bail!("result needs exactly one of --score HOME-AWAY or --clear");
                }
                Command::Result {
                    league,
                    match_id,
                    home,
                    away,
                    score,
                }
            }
            "stat" => Command::Stat {
                league: league(pargs)?,
                team: pargs.value_from_str("--team")?,
                player: pargs.value_from_str("--player")?,
                kind: pargs.value_from_str("--kind")?,
                value: pargs.value_from_str("--value")?,
            },
            "generate" => Command::Generate {
                league: league(pargs)?,
                mode: pargs
                    .opt_value_from_str("--mode")?
                    .unwrap_or(PlayoffMode::DirectCut),
                playoff_type: pargs.opt_value_from_str("--type")?,
            },
            "advance" => Command::Advance {
                league: league(pargs)?,
            },
            "remove-team" => Command::RemoveTeam {
                league: league(pargs)?,
                team: pargs.value_from_str("--team")?,
            },
            "toggle-team" => Command::ToggleTeam {
                league: league(pargs)?,
                team: pargs.value_from_str("--team")?,
            },
            "delete-match" => Command::DeleteMatch {
                league: league(pargs)?,
                match_id: pargs.value_from_str("--match")?,
            },
            "reset-playoffs" => Command::ResetPlayoffs {
                league: league(pargs)?,
            },
            "reset-season" => Command::ResetSeason {
                league: league(pargs)?,
            },
            other => bail!("unknown command {other:?}, see --help"),
        };
        Ok(command)
    }

    /// Subcommand name, for logging
    pub fn name(&self) -> &'static str {
        match self {
            Command::List => "list",
            Command::CreateLeague { .. } => "create-league",
            Command::AddTeam { .. } => "add-team",
            Command::Standings { .. } => "standings",
            Command::Leaders { .. } => "leaders",
            Command::Status { .. } => "status",
            Command::Schedule { .. } => "schedule",
            Command::Result { .. } => "result",
            Command::Stat { .. } => "stat",
            Command::Generate { .. } => "generate",
            Command::Advance { .. } => "advance",
            Command::RemoveTeam { .. } => "remove-team",
            Command::ToggleTeam { .. } => "toggle-team",
            Command::DeleteMatch { .. } => "delete-match",
            Command::ResetPlayoffs { .. } => "reset-playoffs",
            Command::ResetSeason { .. } => "reset-season",
        }
    }

    pub fn league(&self) -> Option<LeagueId> {
        match self {
            Command::List | Command::CreateLeague { .. } => None,
            Command::AddTeam { league, .. }
            | Command::Standings { league, .. }
            | Command::Leaders { league, .. }
            | Command::Status { league }
            | Command::Schedule { league, .. }
            | Command::Result { league, .. }
            | Command::Stat { league, .. }
            | Command::Generate { league, .. }
            | Command::Advance { league }
            | Command::RemoveTeam { league, .. }
            | Command::ToggleTeam { league, .. }
            | Command::DeleteMatch { league, .. }
            | Command::ResetPlayoffs { league }
            | Command::ResetSeason { league } => Some(*league),
        }
    }

    /// Whether running the command can change stored data
    pub fn is_mutation(&self) -> bool {
        !matches!(
            self,
            Command::List
                | Command::Standings { .. }
                | Command::Leaders { .. }
                | Command::Status { .. }
        )
    }
}

fn league(pargs: &mut Arguments) -> Result<LeagueId, Error> {
    pargs
        .value_from_str::<_, Uuid>("--league")
        .context("missing or invalid --league ID")
}

/// Run a command and render its output, as text or as JSON
pub async fn run<R: LeagueRepository>(
    manager: &LeagueManager<R>,
    command: Command,
    as_json: bool,
) -> Result<String, ligapro::LeagueError> {
    let output = match command {
        Command::List => {
            let leagues = manager.list_leagues().await?;
            if as_json {
                json!(leagues).to_string()
            } else {
                let mut out = String::new();
                for league in &leagues {
                    let _ = writeln!(
                        out,
                        "{}  {}  (max {} teams, {} playoffs)",
                        league.id, league.name, league.max_teams, league.playoff_type
                    );
                }
                out
            }
        }
        Command::CreateLeague { name, options } => {
            let league = manager.create_league(&name, options).await?;
            render(as_json, json!(league), || format!("{}\n", league.id))
        }
        Command::AddTeam { league, name } => {
            let team_id = manager.add_team(league, &name).await?;
            render(as_json, json!({ "team_id": team_id }), || format!("{team_id}\n"))
        }
        Command::Standings { league, scope } => {
            let rows = manager.standings(league, scope).await?;
            render(as_json, json!(rows), || standings_table(&rows))
        }
        Command::Leaders { league, limit } => {
            let boards = manager.leaderboards(league, limit).await?;
            render(as_json, json!(boards), || {
                let mut out = String::from("Top scorers\n");
                for stat in &boards.scorers {
                    let _ = writeln!(out, "  {:<24} {:>4}", stat.player_name, stat.value);
                }
                out.push_str("Top goalkeepers\n");
                for stat in &boards.goalkeepers {
                    let _ = writeln!(out, "  {:<24} {:>4}", stat.player_name, stat.value);
                }
                out
            })
        }
        Command::Status { league } => {
            let status = manager.playoff_status(league).await?;
            let summary = match status.phase {
                PlayoffPhase::NotStarted => "No playoffs".to_string(),
                PlayoffPhase::InStage(progress) => format!(
                    "{}: {}/{} matches played",
                    progress.stage, progress.completed, progress.total
                ),
                PlayoffPhase::Complete { champion } => {
                    format!("Complete, champion {}", manager.team_name(league, champion).await?)
                }
            };
            render(as_json, json!(status), || format!("{summary}\n"))
        }
        Command::Schedule { league, request } => {
            let match_id = manager.schedule_match(league, request).await?;
            render(as_json, json!({ "match_id": match_id }), || format!("{match_id}\n"))
        }
        Command::Result {
            league,
            match_id,
            home,
            away,
            score,
        } => {
            manager
                .record_result(league, match_id, home, away, score)
                .await?;
            render(as_json, json!({ "match_id": match_id, "score": score }), || {
                "Result recorded\n".to_string()
            })
        }
        Command::Stat {
            league,
            team,
            player,
            kind,
            value,
        } => {
            let stat_id = manager
                .record_stat(league, team, &player, kind, value)
                .await?;
            render(as_json, json!({ "stat_id": stat_id }), || format!("{stat_id}\n"))
        }
        Command::Generate {
            league,
            mode,
            playoff_type,
        } => {
            let report = manager.generate_playoffs(league, mode, playoff_type).await?;
            render(as_json, json!(report), || {
                format!(
                    "{}: {} matches, {} byes\n",
                    report.stage,
                    report.matches_created.len(),
                    report.byes.len()
                )
            })
        }
        Command::Advance { league } => {
            let report = manager.advance_playoffs(league).await?;
            render(as_json, json!(report), || match &report {
                AdvanceReport::NextRound {
                    stage,
                    matches_created,
                    qualifiers,
                } => format!(
                    "{}: {} matches for {} qualifiers\n",
                    stage,
                    matches_created.len(),
                    qualifiers.len()
                ),
                AdvanceReport::Champion { team_name, .. } => format!("Champion: {team_name}\n"),
            })
        }
        Command::RemoveTeam { league, team } => {
            manager.remove_team(league, team).await?;
            render(as_json, json!({ "removed": team }), || "Team removed\n".to_string())
        }
        Command::ToggleTeam { league, team } => {
            let status = manager.toggle_team_visibility(league, team).await?;
            render(as_json, json!({ "team_id": team, "status": status }), || {
                format!("Team is now {status:?}\n")
            })
        }
        Command::DeleteMatch { league, match_id } => {
            manager.delete_match(league, match_id).await?;
            render(as_json, json!({ "deleted": match_id }), || "Match deleted\n".to_string())
        }
        Command::ResetPlayoffs { league } => {
            let discarded = manager.reset_playoffs(league).await?;
            render(as_json, json!({ "matches_discarded": discarded }), || {
                format!("{discarded} playoff matches discarded\n")
            })
        }
        Command::ResetSeason { league } => {
            let report = manager.reset_season(league).await?;
            render(as_json, json!(report), || {
                format!(
                    "{} matches, {} teams and {} stats discarded\n",
                    report.matches_discarded, report.teams_purged, report.stats_discarded
                )
            })
        }
    };
    Ok(output)
}

fn render(as_json: bool, value: serde_json::Value, text: impl FnOnce() -> String) -> String {
    if as_json {
        format!("{value}\n")
    } else {
        text()
    }
}

fn standings_table(rows: &[StandingRow]) -> String {
    let mut out = format!(
        "{:>3}  {:<24} {:>3} {:>3} {:>3} {:>3} {:>4} {:>4} {:>5} {:>4}\n",
        "#", "Team", "PJ", "G", "E", "P", "GF", "GC", "DG", "Pts"
    );
    for (i, row) in rows.iter().enumerate() {
        let _ = writeln!(
            out,
            "{:>3}  {:<24} {:>3} {:>3} {:>3} {:>3} {:>4} {:>4} {:>+5} {:>4}",
            i + 1,
            row.team_name,
            row.played,
            row.won,
            row.drawn,
            row.lost,
            row.goals_for,
            row.goals_against,
            row.goal_difference,
            row.points
        );
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::ffi::OsString;

    fn parse(args: &[&str]) -> Result<Command, Error> {
        let mut pargs = Arguments::from_vec(args.iter().map(OsString::from).collect());
        let name: String = pargs.subcommand()?.unwrap_or_default();
        Command::parse(&name, &mut pargs)
    }

    #[test]
    fn test_parse_score() {
        assert_eq!(parse_score("2-1"), Ok(Score::new(2, 1)));
        assert_eq!(parse_score(" 0 - 3 "), Ok(Score::new(0, 3)));
        assert!(parse_score("2:1").is_err());
        assert!(parse_score("a-1").is_err());
    }

    #[test]
    fn test_parse_generate_defaults_to_direct_cut() {
        let id = Uuid::new_v4();
        let league = id.to_string();
        let command = parse(&["generate", "--league", league.as_str()]).unwrap();
        assert_eq!(
            command,
            Command::Generate {
                league: id,
                mode: PlayoffMode::DirectCut,
                playoff_type: None,
            }
        );
        assert!(command.is_mutation());
        assert_eq!(command.league(), Some(id));
    }

    #[test]
    fn test_parse_create_league_options() {
        let command = parse(&[
            "create-league",
            "--points",
            "2/1",
            "--type",
            "double",
            "Liga Sur",
        ])
        .unwrap();
        let Command::CreateLeague { name, options } = command else {
            panic!("expected create-league");
        };
        assert_eq!(name, "Liga Sur");
        assert_eq!(options.playoff_type, Some(PlayoffType::Double));
        assert_eq!(options.points.map(|p| p.win_points), Some(2));
    }

    #[test]
    fn test_result_needs_score_or_clear() {
        let ids: Vec<String> = (0..4).map(|_| Uuid::new_v4().to_string()).collect();
        let base = [
            "result",
            "--league",
            ids[0].as_str(),
            "--match",
            ids[1].as_str(),
            "--home",
            ids[2].as_str(),
            "--away",
            ids[3].as_str(),
        ];
        assert!(parse(&base).is_err());

        let mut cleared = base.to_vec();
        cleared.push("--clear");
        let Command::Result { score, .. } = parse(&cleared).unwrap() else {
            panic!("expected result");
        };
        assert_eq!(score, None);
    }

    #[test]
    fn test_unknown_command() {
        assert!(parse(&["promote"]).is_err());
        assert!(parse(&["status"]).is_err());
    }

    #[test]
    fn test_standings_table_layout() {
        let rows = vec![StandingRow {
            team_id: Uuid::new_v4(),
            team_name: "Norte".to_string(),
            played: 2,
            won: 1,
            drawn: 1,
            lost: 0,
            goals_for: 3,
            goals_against: 1,
            goal_difference: 2,
            points: 4,
        }];
        let table = standings_table(&rows);
        let line = table.lines().nth(1).unwrap();
        assert!(line.contains("Norte"));
        assert!(line.contains("+2"));
        assert!(line.trim_end().ends_with('4'));
    }
}
