//! Command-line probe for `litestore_core`.
//!
//! # Responsibility
//! - Keep the `ping` smoke check for core crate linkage.
//! - Run one raw statement against a database file and print JSON.
//!
//! # Invariants
//! - Results go to stdout as JSON; errors go to stderr with exit code 1.
//! - Existing data is only deleted when `--truncate` is passed.

use clap::{Args, Parser, Subcommand};
use litestore_core::{default_log_level, init_logging, DataStore, LogLevel, StoreConfig};
use log::debug;
use std::error::Error;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

#[derive(Debug, Parser)]
#[command(name = "litestore", version, about = "Run raw SQL against an embedded SQLite file")]
struct Cli {
    /// Log verbosity: trace|debug|info|warn|error.
    #[arg(long, global = true, value_parser = parse_log_level)]
    log_level: Option<LogLevel>,

    /// Directory for rotating log files. Logging stays off without it.
    #[arg(long, global = true, value_name = "DIR")]
    log_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Print core ping and version.
    Ping,
    /// Run a read statement and print its rows.
    Query(QueryArgs),
    /// Run statements that return no rows and print change statistics.
    Exec(StatementArgs),
}

#[derive(Debug, Args)]
struct StatementArgs {
    /// Database file path.
    db: PathBuf,

    /// Raw SQL statement text.
    sql: String,

    /// Delete any existing database file before opening.
    #[arg(long)]
    truncate: bool,
}

#[derive(Debug, Args)]
struct QueryArgs {
    #[command(flatten)]
    statement: StatementArgs,

    /// Print typed JSON values instead of text.
    #[arg(long)]
    typed: bool,
}

impl StatementArgs {
    fn open(&self) -> Result<DataStore, Box<dyn Error>> {
        let config = StoreConfig::file(&self.db).with_truncate_on_open(self.truncate);
        Ok(DataStore::open(&config)?)
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<(), Box<dyn Error>> {
    if let Some(dir) = &cli.log_dir {
        let level = cli.log_level.unwrap_or_else(default_log_level);
        init_logging(level, &absolute_dir(dir)?)?;
    }

    match cli.command {
        Command::Ping => {
            println!("litestore_core ping={}", litestore_core::ping());
            println!("litestore_core version={}", litestore_core::core_version());
        }
        Command::Query(QueryArgs { statement, typed }) => {
            let store = statement.open()?;
            let output = if typed {
                serde_json::to_string_pretty(&store.query_typed(&statement.sql)?)?
            } else {
                serde_json::to_string_pretty(&store.query(&statement.sql)?)?
            };
            println!("{output}");
            store.close()?;
        }
        Command::Exec(args) => {
            let store = args.open()?;
            let summary = store.execute(&args.sql)?;
            debug!(
                "event=cli_exec module=cli status=ok rows_affected={}",
                summary.rows_affected
            );
            println!("{}", serde_json::to_string_pretty(&summary)?);
            store.close()?;
        }
    }
    Ok(())
}

fn parse_log_level(value: &str) -> Result<LogLevel, String> {
    value.parse().map_err(|err: litestore_core::LoggingError| err.to_string())
}

fn absolute_dir(dir: &Path) -> std::io::Result<PathBuf> {
    if dir.is_absolute() {
        Ok(dir.to_path_buf())
    } else {
        Ok(std::env::current_dir()?.join(dir))
    }
}

#[cfg(test)]
mod tests {
    use super::{Cli, Command};
    use clap::{CommandFactory, Parser};
    use litestore_core::LogLevel;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn query_arguments_parse_with_global_flags() {
        let cli = Cli::try_parse_from([
            "litestore",
            "query",
            "app.db",
            "SELECT 1",
            "--truncate",
            "--log-level",
            "warn",
        ])
        .unwrap();

        assert_eq!(cli.log_level, Some(LogLevel::Warn));
        match cli.command {
            Command::Query(args) => {
                assert_eq!(args.statement.db.to_str(), Some("app.db"));
                assert_eq!(args.statement.sql, "SELECT 1");
                assert!(args.statement.truncate);
                assert!(!args.typed);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn typed_flag_is_accepted_by_query_only() {
        let cli = Cli::try_parse_from(["litestore", "query", "app.db", "SELECT 1", "--typed"])
            .unwrap();
        assert!(matches!(cli.command, Command::Query(ref args) if args.typed));

        let result =
            Cli::try_parse_from(["litestore", "exec", "app.db", "DELETE FROM t", "--typed"]);
        assert!(result.is_err());
    }

    #[test]
    fn unknown_log_level_is_rejected() {
        let result = Cli::try_parse_from(["litestore", "--log-level", "loud", "ping"]);
        assert!(result.is_err());
    }
}
