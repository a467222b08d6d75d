use crate::{
    commands::Commands,
    config::AppConfig,
    env::EnvManager,
    error::CliError,
    shutdown::{ExitCode, ShutdownCoordinator},
};
use clap::Parser;
use connectors::provider::ConnectionProvider;
use engine::runner::BatchRunner;
use notify::Notifier;
use std::path::Path;
use tokio_util::sync::CancellationToken;
use tracing::error;
use tracing_subscriber::EnvFilter;

mod commands;
mod config;
mod env;
mod error;
mod shutdown;

#[derive(Parser)]
#[command(
    name = "cloudsync",
    version = "0.1.0",
    about = "One-way scheduled replication from the on-prem ERP database to its cloud mirror"
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Env file to load before resolving configuration (defaults to ./.env
    /// when present)
    #[arg(long, global = true)]
    env_file: Option<String>,
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    let cancel = CancellationToken::new();
    let shutdown = ShutdownCoordinator::new(cancel.clone());
    shutdown.register_handlers();

    let code = match run(cli, &shutdown).await {
        Ok(()) => ExitCode::Success,
        Err(CliError::Sync(engine::error::SyncError::ShutdownRequested)) => {
            ExitCode::ShutdownRequested
        }
        Err(err) => {
            error!("{err}");
            if shutdown.is_shutdown_requested() {
                ExitCode::ShutdownRequested
            } else {
                ExitCode::GeneralError
            }
        }
    };

    std::process::exit(code.as_i32());
}

async fn run(cli: Cli, shutdown: &ShutdownCoordinator) -> Result<(), CliError> {
    let mut env = EnvManager::new();
    match &cli.env_file {
        Some(path) => env.load_from_file(path)?,
        None if Path::new(".env").exists() => env.load_from_file(".env")?,
        None => {}
    }

    let config = AppConfig::from_env(&env)?;
    let provider = ConnectionProvider::new(config.source, config.target);
    let notifier = Notifier::new(config.notify);
    let runner = BatchRunner::new(
        provider,
        notifier,
        config.days_back,
        shutdown.cancel_token(),
    );

    match cli.command.unwrap_or(Commands::Sync) {
        command @ (Commands::Sync | Commands::SyncMain) => {
            runner.test_connections().await?;
            runner
                .run("Main sync", &command.descriptors(), false)
                .await?;
        }
        command @ Commands::SyncBulk => {
            runner.test_connections().await?;
            runner.run("Bulk sync", &command.descriptors(), true).await?;
        }
        Commands::TestConn => {
            runner.test_connections().await?;
        }
    }

    Ok(())
}
