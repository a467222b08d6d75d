use crate::sql::{
    base::{
        adapter::{DatabaseKind, SqlAdapter},
        error::{ConnectorError, DbError},
        row::DbRow,
    },
    postgres::{connect::connect_client, params::PgParamStore},
};
use async_trait::async_trait;
use model::{core::value::Value, records::row::RowData};
use std::sync::Arc;
use tokio::sync::RwLock;
use tokio_postgres::{Client, Config};

#[derive(Clone)]
pub struct PgAdapter {
    client: Arc<RwLock<Client>>,
}

impl PgAdapter {
    pub async fn connect(config: Config) -> Result<Self, ConnectorError> {
        let client = connect_client(config).await?;
        Ok(PgAdapter {
            client: Arc::new(RwLock::new(client)),
        })
    }
}

#[async_trait]
impl SqlAdapter for PgAdapter {
    async fn exec_params(&self, sql: &str, params: Vec<Value>) -> Result<u64, DbError> {
        let bindings = PgParamStore::from_values(params);
        let client = self.client.write().await;
        let affected = client.execute(sql, &bindings.as_refs()).await?;
        Ok(affected)
    }

    async fn query_rows(
        &self,
        table: &str,
        sql: &str,
        params: Vec<Value>,
    ) -> Result<Vec<RowData>, DbError> {
        let bindings = PgParamStore::from_values(params);
        let client = self.client.read().await;
        let rows = client.query(sql, &bindings.as_refs()).await?;
        Ok(rows
            .iter()
            .map(|row| DbRow::Postgres(row).to_row_data(table))
            .collect())
    }

    async fn count(&self, sql: &str, params: Vec<Value>) -> Result<i64, DbError> {
        let bindings = PgParamStore::from_values(params);
        let client = self.client.read().await;
        let row = client.query_one(sql, &bindings.as_refs()).await?;
        Ok(row.try_get::<_, i64>(0)?)
    }

    async fn ping(&self) -> Result<(), DbError> {
        let client = self.client.read().await;
        let row = client.query_one("SELECT 1", &[]).await?;
        let value: i32 = row.try_get(0)?;
        if value != 1 {
            return Err(DbError::Unknown(format!(
                "Postgres ping returned unexpected result: {value}"
            )));
        }
        Ok(())
    }

    async fn close(&self) -> Result<(), DbError> {
        // The connection task finishes once the last client handle drops;
        // there is no explicit shutdown call in tokio-postgres.
        Ok(())
    }

    fn kind(&self) -> DatabaseKind {
        DatabaseKind::Postgres
    }
}
