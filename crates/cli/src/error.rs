use engine::error::SyncError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CliError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Sync run failed: {0}")]
    Sync(#[from] SyncError),
}
