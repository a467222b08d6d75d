use connectors::sql::base::error::{ConnectorError, DbError};
use thiserror::Error;

/// Top-level errors of a replication run. Row-level write failures never
/// surface here; anything that does aborts the remaining task sequence.
#[derive(Debug, Error)]
pub enum SyncError {
    /// Could not establish a link to an endpoint.
    #[error("Connection error: {0}")]
    Connector(#[from] ConnectorError),

    /// A select-phase statement or the connection underneath it failed.
    #[error("Database error: {0}")]
    Database(#[from] DbError),

    /// The operator requested termination; the run stopped at a task
    /// boundary.
    #[error("Shutdown requested")]
    ShutdownRequested,
}
