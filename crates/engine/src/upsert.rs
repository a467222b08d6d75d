use connectors::sql::base::{adapter::SqlAdapter, error::DbError, query};
use model::{core::value::Value, records::row::RowData};
use std::sync::Arc;
use tracing::debug;

/// How a row was written to the target.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpsertAction {
    Inserted,
    Updated,
}

/// The generic insert-or-update engine. Given a table, its primary-key
/// column and a row of arbitrary shape, it checks key existence in the
/// target and issues exactly one write statement built from the row's own
/// column set.
pub struct UpsertEngine {
    target: Arc<dyn SqlAdapter>,
}

impl UpsertEngine {
    pub fn new(target: Arc<dyn SqlAdapter>) -> Self {
        UpsertEngine { target }
    }

    /// True iff a row with this primary-key value exists in the target.
    pub async fn exists(
        &self,
        table: &str,
        primary_key: &str,
        key: &Value,
    ) -> Result<bool, DbError> {
        let sql = query::count_by_key(table, primary_key, self.target.kind());
        let count = self.target.count(&sql, vec![key.clone()]).await?;
        Ok(count > 0)
    }

    /// Classifies the row as insert-or-update based on the existence check
    /// run immediately before the write, then executes the one statement.
    /// The check and the write are not wrapped in a transaction; a race with
    /// a concurrent writer against the target is an accepted limitation of
    /// the single-writer deployment.
    pub async fn upsert(
        &self,
        table: &str,
        primary_key: &str,
        row: &RowData,
    ) -> Result<UpsertAction, DbError> {
        let key = row.get_value(primary_key);
        if key.is_null() {
            return Err(DbError::Write(format!(
                "row in {table} carries no {primary_key} value"
            )));
        }

        if self.exists(table, primary_key, &key).await? {
            self.update(table, primary_key, &key, row).await
        } else {
            self.insert(table, row).await
        }
    }

    async fn insert(&self, table: &str, row: &RowData) -> Result<UpsertAction, DbError> {
        let columns = row.column_names();
        let sql = query::insert(table, &columns, self.target.kind());
        let params = row
            .field_values
            .iter()
            .map(|f| f.value.clone().unwrap_or(Value::Null))
            .collect();
        self.target.exec_params(&sql, params).await?;
        Ok(UpsertAction::Inserted)
    }

    async fn update(
        &self,
        table: &str,
        primary_key: &str,
        key: &Value,
        row: &RowData,
    ) -> Result<UpsertAction, DbError> {
        let set_fields: Vec<_> = row
            .field_values
            .iter()
            .filter(|f| !f.name.eq_ignore_ascii_case(primary_key))
            .collect();

        // A row whose only column is the key would render an empty SET list,
        // which is invalid SQL. Nothing besides the key can have changed, so
        // count it as updated without touching the target.
        if set_fields.is_empty() {
            debug!("{table}: row {key} has no non-key columns, skipping write");
            return Ok(UpsertAction::Updated);
        }

        let columns: Vec<&str> = set_fields.iter().map(|f| f.name.as_str()).collect();
        let sql = query::update(table, &columns, primary_key, self.target.kind());
        let mut params: Vec<Value> = set_fields
            .iter()
            .map(|f| f.value.clone().unwrap_or(Value::Null))
            .collect();
        params.push(key.clone());
        self.target.exec_params(&sql, params).await?;
        Ok(UpsertAction::Updated)
    }
}
