use crate::sql::{
    base::{
        adapter::{DatabaseKind, SqlAdapter},
        error::{ConnectorError, DbError},
        row::DbRow,
    },
    mysql::params::MySqlParamStore,
};
use async_trait::async_trait;
use model::{core::value::Value, records::row::RowData};
use mysql_async::prelude::Queryable;
use mysql_common::params::Params;

#[derive(Clone)]
pub struct MySqlAdapter {
    pool: mysql_async::Pool,
}

impl MySqlAdapter {
    pub async fn connect(opts: mysql_async::Opts) -> Result<Self, ConnectorError> {
        let pool = mysql_async::Pool::new(opts);
        // Fail at connect time rather than on the first query.
        let conn = pool.get_conn().await?;
        drop(conn);
        Ok(MySqlAdapter { pool })
    }
}

fn positional(params: &[Value]) -> Params {
    if params.is_empty() {
        Params::Empty
    } else {
        MySqlParamStore::from_values(params).params()
    }
}

#[async_trait]
impl SqlAdapter for MySqlAdapter {
    async fn exec_params(&self, sql: &str, params: Vec<Value>) -> Result<u64, DbError> {
        let mut conn = self.pool.get_conn().await?;
        conn.exec_drop(sql, positional(&params)).await?;
        Ok(conn.affected_rows())
    }

    async fn query_rows(
        &self,
        table: &str,
        sql: &str,
        params: Vec<Value>,
    ) -> Result<Vec<RowData>, DbError> {
        let mut conn = self.pool.get_conn().await?;
        let rows: Vec<mysql_async::Row> = conn.exec(sql, positional(&params)).await?;
        Ok(rows
            .iter()
            .map(|row| DbRow::MySql(row).to_row_data(table))
            .collect())
    }

    async fn count(&self, sql: &str, params: Vec<Value>) -> Result<i64, DbError> {
        let mut conn = self.pool.get_conn().await?;
        let count: Option<i64> = conn.exec_first(sql, positional(&params)).await?;
        count.ok_or_else(|| DbError::Unknown("count query returned no rows".to_string()))
    }

    async fn ping(&self) -> Result<(), DbError> {
        let mut conn = self.pool.get_conn().await?;
        let value: Option<i32> = conn.query_first("SELECT 1").await?;
        match value {
            Some(1) => Ok(()),
            other => Err(DbError::Unknown(format!(
                "MySQL ping returned unexpected result: {other:?}"
            ))),
        }
    }

    async fn close(&self) -> Result<(), DbError> {
        self.pool.clone().disconnect().await?;
        Ok(())
    }

    fn kind(&self) -> DatabaseKind {
        DatabaseKind::MySql
    }
}
