//! Operator command line for ligapro leagues.
//!
//! Every invocation runs one command against either a PostgreSQL database or
//! a JSON snapshot file, then exits.

mod commands;
mod config;
mod logging;

use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use std::time::Instant;

use anyhow::{Context, Error};
use log::info;
use ligapro::{
    LeagueError, LeagueManager,
    config::LeagueDefaults,
    db::{Database, LeagueRepository, MemoryLeagueRepository},
};
use pico_args::Arguments;

use crate::commands::Command;
use crate::config::{CliConfig, DataSource};

const HELP: &str = "\
Manage round-robin leagues and their playoff brackets

USAGE:
  lp_cli [OPTIONS] <COMMAND> [ARGS]

COMMANDS:
  list
  create-league NAME [--points WIN/DRAW] [--max-teams N] [--type single|double]
  add-team      --league ID NAME
  standings     --league ID [--with-playoffs]
  leaders       --league ID [--limit N]
  status        --league ID
  schedule      --league ID --home TEAM --away TEAM [--court ID] [--at RFC3339]
  result        --league ID --match ID --home TEAM --away TEAM (--score H-A | --clear)
  stat          --league ID --team TEAM --player NAME --kind goals|conceded --value N
  generate      --league ID [--mode corte_directo|con_repechaje] [--type single|double]
  advance       --league ID
  remove-team   --league ID --team TEAM
  toggle-team   --league ID --team TEAM
  delete-match  --league ID --match ID
  reset-playoffs --league ID
  reset-season  --league ID

OPTIONS:
  --db-url     URL         Database connection string  [default: env DATABASE_URL]
  --snapshot   FILE        Use a JSON snapshot file instead of a database  [default: env LIGAPRO_SNAPSHOT]

FLAGS:
  --json                   Print machine readable output
  -v, --verbose            Log progress to stderr
  -h, --help               Print help information

ENVIRONMENT:
  DATABASE_URL             PostgreSQL connection string
  LIGAPRO_SNAPSHOT         Snapshot file path
  LEAGUE_WIN_POINTS        Points for a win in new leagues  [default: 3]
  LEAGUE_DRAW_POINTS       Points for a draw in new leagues  [default: 1]
  LEAGUE_LOSS_POINTS       Points for a loss in new leagues  [default: 0]
  LEAGUE_MAX_TEAMS         Roster limit for new leagues  [default: 10]
  LEAGUE_PLAYOFF_TYPE      single or double legs for new leagues  [default: single]
  RUST_LOG                 Log filter  [default: warn]
";

struct Args {
    database_url: Option<String>,
    snapshot: Option<PathBuf>,
    json: bool,
    verbose: bool,
    command: Command,
}

fn parse_args() -> Result<Args, Error> {
    let mut pargs = Arguments::from_env();

    // Help has a higher priority and should be handled separately.
    if pargs.contains(["-h", "--help"]) {
        print!("{HELP}");
        std::process::exit(0);
    }

    let database_url = pargs.opt_value_from_str("--db-url")?;
    let snapshot: Option<PathBuf> = pargs.opt_value_from_str("--snapshot")?;
    let json = pargs.contains("--json");
    let verbose = pargs.contains(["-v", "--verbose"]);

    let name: String = pargs
        .subcommand()?
        .context("no command given, see --help")?;
    let command = Command::parse(&name, &mut pargs)?;

    let remaining = pargs.finish();
    if !remaining.is_empty() {
        anyhow::bail!("unexpected arguments: {remaining:?}");
    }

    Ok(Args {
        database_url,
        snapshot,
        json,
        verbose,
        command,
    })
}

async fn execute<R: LeagueRepository>(
    repo: Arc<R>,
    defaults: LeagueDefaults,
    command: Command,
    json: bool,
) -> Result<String, LeagueError> {
    let manager = LeagueManager::new(repo, defaults);
    commands::run(&manager, command, json).await
}

#[tokio::main]
async fn main() -> Result<ExitCode, Error> {
    // Load .env file if it exists
    let _ = dotenvy::dotenv();

    let args = match parse_args() {
        Ok(args) => args,
        Err(e) => {
            eprintln!("error: {e}");
            return Ok(ExitCode::from(2));
        }
    };

    logging::init(args.verbose);

    let config = CliConfig::from_env(args.database_url, args.snapshot)?;
    let command_name = args.command.name();
    let league_id = args.command.league().map(|id| id.to_string());
    let mutates = args.command.is_mutation();
    let started = Instant::now();

    let outcome = match &config.source {
        DataSource::Database(db_config) => {
            info!("Connecting to database");
            let db = Database::new(db_config)
                .await
                .context("Failed to connect to database")?;
            db.migrate().await.context("Failed to run migrations")?;

            let outcome = execute(
                Arc::new(db.leagues()),
                config.defaults.clone(),
                args.command,
                args.json,
            )
            .await;
            db.close().await;
            outcome
        }
        DataSource::Snapshot(path) => {
            let repo = Arc::new(MemoryLeagueRepository::load_json(path).await?);
            let outcome = execute(
                Arc::clone(&repo),
                config.defaults.clone(),
                args.command,
                args.json,
            )
            .await;
            if outcome.is_ok() && mutates {
                repo.save_json(path)
                    .await
                    .with_context(|| format!("Failed to write {}", path.display()))?;
            }
            outcome
        }
    };

    logging::log_operation(
        command_name,
        league_id.as_deref(),
        started.elapsed(),
        outcome.is_ok(),
    );

    match outcome {
        Ok(output) => {
            print!("{output}");
            Ok(ExitCode::SUCCESS)
        }
        Err(e) if e.is_refusal() => {
            eprintln!("{}", e.client_message());
            Ok(ExitCode::FAILURE)
        }
        Err(e) => Err(e.into()),
    }
}
