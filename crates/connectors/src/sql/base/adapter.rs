use crate::sql::base::error::DbError;
use async_trait::async_trait;
use model::{core::value::Value, records::row::RowData};
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DatabaseKind {
    MySql,
    Postgres,
}

impl FromStr for DatabaseKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "mysql" | "mariadb" => Ok(DatabaseKind::MySql),
            "pg" | "postgres" | "postgresql" => Ok(DatabaseKind::Postgres),
            other => Err(format!("Unknown database kind: {other}")),
        }
    }
}

/// Uniform surface over one database endpoint. Construction is an inherent
/// method on each adapter (the endpoint knows which one to build) so the
/// trait stays object-safe behind `Arc<dyn SqlAdapter>`.
#[async_trait]
pub trait SqlAdapter: Send + Sync {
    /// Executes a single statement with bound parameters, returning the
    /// affected row count. Values are always bound, never interpolated.
    async fn exec_params(&self, sql: &str, params: Vec<Value>) -> Result<u64, DbError>;

    /// Runs a SELECT and decodes every returned row into a `RowData` tagged
    /// with `table`, preserving the result set's column order.
    async fn query_rows(
        &self,
        table: &str,
        sql: &str,
        params: Vec<Value>,
    ) -> Result<Vec<RowData>, DbError>;

    /// Runs a scalar count query and returns its single value.
    async fn count(&self, sql: &str, params: Vec<Value>) -> Result<i64, DbError>;

    /// Round-trips a trivial query to verify the link is alive.
    async fn ping(&self) -> Result<(), DbError>;

    /// Releases the underlying connection. Safe to call once per handle at
    /// the end of a run.
    async fn close(&self) -> Result<(), DbError>;

    fn kind(&self) -> DatabaseKind;
}
