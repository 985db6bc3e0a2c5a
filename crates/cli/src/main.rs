//! Command-line front end for the moveset editor.
//!
//! Run with: `moveset <command>`. Configuration comes from `MOVESET_*`
//! environment variables, optionally loaded from a `.env` file.
mod commands;
mod context;

use anyhow::{Context, Result};
use clap::Parser;
use commands::{Apply, Export, Shard, Show, TeamId};
use moveset_runtime::RuntimeConfig;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

/// Edit creature movesets stored in SQLite
#[derive(Debug, Parser)]
#[command(name = "moveset")]
#[command(about = "Moveset editing tools", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Parser)]
enum Command {
    /// Apply a JSON change batch to a creature's moveset
    Apply(Apply),

    /// Print a creature's stored moveset
    Show(Show),

    /// Print the shard of each creature id
    Shard(Shard),

    /// Write a creature's moveset into its shard file
    Export(Export),

    /// Generate an id for a new trainer team member
    TeamId(TeamId),
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if it exists (silently ignore if not found)
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();

    let config = RuntimeConfig::from_env();
    let _guard = setup_logging(&config)?;

    match cli.command {
        Command::Apply(cmd) => cmd.execute(config).await,
        Command::Show(cmd) => cmd.execute(config).await,
        Command::Shard(cmd) => cmd.execute(),
        Command::Export(cmd) => cmd.execute(config).await,
        Command::TeamId(cmd) => cmd.execute(config),
    }
}

/// Log to `MOVESET_LOG_DIR/moveset.log` when configured, otherwise stderr.
///
/// The returned guard flushes the file writer on drop.
fn setup_logging(config: &RuntimeConfig) -> Result<Option<WorkerGuard>> {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    match &config.log_dir {
        Some(log_dir) => {
            std::fs::create_dir_all(log_dir)
                .with_context(|| format!("failed to create log dir {}", log_dir.display()))?;

            let file_appender = tracing_appender::rolling::never(log_dir, "moveset.log");
            let (non_blocking_file, guard) = tracing_appender::non_blocking(file_appender);

            let file_layer = tracing_subscriber::fmt::layer()
                .with_writer(non_blocking_file)
                .with_ansi(false);

            tracing_subscriber::registry()
                .with(env_filter)
                .with(file_layer)
                .init();

            tracing::info!("Log file: {}/moveset.log", log_dir.display());
            Ok(Some(guard))
        }
        None => {
            let stderr_layer = tracing_subscriber::fmt::layer().with_writer(std::io::stderr);

            tracing_subscriber::registry()
                .with(env_filter)
                .with(stderr_layer)
                .init();

            Ok(None)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_apply_with_moveset_file() {
        let cli = Cli::try_parse_from([
            "moveset",
            "apply",
            "--creature",
            "7",
            "--batch",
            "batch.json",
            "--moveset",
            "squirtle.json",
        ])
        .unwrap();
        assert!(matches!(cli.command, Command::Apply(_)));
    }

    #[test]
    fn test_parse_shard_and_team_id() {
        let cli = Cli::try_parse_from(["moveset", "shard", "1", "205", "950"]).unwrap();
        assert!(matches!(cli.command, Command::Shard(_)));

        let cli = Cli::try_parse_from([
            "moveset",
            "team-id",
            "-t",
            "blue",
            "-s",
            "charmander",
            "--species-catalog",
            "species.json",
        ])
        .unwrap();
        assert!(matches!(cli.command, Command::TeamId(_)));
    }

    #[test]
    fn test_missing_required_arguments_are_rejected() {
        let err = Cli::try_parse_from(["moveset", "apply", "--creature", "7"]).unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::MissingRequiredArgument);

        let err = Cli::try_parse_from(["moveset", "shard"]).unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::MissingRequiredArgument);

        let err = Cli::try_parse_from(["moveset", "apply", "-c", "seven", "-b", "b.json"]).unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::ValueValidation);
    }
}
