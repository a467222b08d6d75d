use thiserror::Error;

/// All errors coming from the database/query layer. Inside a sync task these
/// are contained per row; raised by the bulk select they are fatal to the
/// task.
#[derive(Debug, Error)]
pub enum DbError {
    /// PostgreSQL driver error.
    #[error("Postgres error: {0}")]
    Postgres(#[from] tokio_postgres::Error),

    /// MySQL driver error.
    #[error("MySQL error: {0}")]
    MySql(#[from] mysql_async::Error),

    /// Writing a row to the target failed at the application level.
    #[error("Write error: {0}")]
    Write(String),

    #[error("Unknown error: {0}")]
    Unknown(String),
}

/// Errors happening while establishing a connection to an endpoint. Always
/// fatal to the current run; the caller must not assume a retry happened.
#[derive(Debug, Error)]
pub enum ConnectorError {
    #[error("TLS setup failed: {0}")]
    Tls(#[from] native_tls::Error),

    #[error("Postgres connection failed: {0}")]
    Postgres(#[from] tokio_postgres::Error),

    #[error("MySQL connection failed: {0}")]
    MySql(#[from] mysql_async::Error),
}
