use crate::{
    error::SyncError,
    runner::run_tasks,
    task::TableSyncTask,
    upsert::{UpsertAction, UpsertEngine},
};
use async_trait::async_trait;
use connectors::sql::base::{
    adapter::{DatabaseKind, SqlAdapter},
    error::DbError,
};
use model::{
    core::value::{FieldValue, Value},
    descriptor::{SelectFilter, TableDescriptor},
    records::row::RowData,
};
use std::{
    collections::{HashMap, HashSet},
    sync::{Arc, Mutex},
};
use tokio_util::sync::CancellationToken;

const RECENCY: SelectFilter = SelectFilter::Recency {
    created_at: "EKLEMEZAMANI",
    modified_at: "DEGISTIRMEZAMANI",
};

fn stok_descriptor() -> TableDescriptor {
    TableDescriptor {
        label: "Stock cards",
        table: "STOKKARTI",
        primary_key: "STOKKARTIID",
        filter: RECENCY,
    }
}

fn row(table: &str, pk: &str, key: i64, extra: &[(&str, Value)]) -> RowData {
    let mut fields = vec![FieldValue::new(pk, Some(Value::Int(key)))];
    for (name, value) in extra {
        fields.push(FieldValue::new(name, Some(value.clone())));
    }
    RowData::new(table, fields)
}

/// Plays the source role: serves canned rows per table and records which
/// tables were selected from.
struct MockSource {
    rows: HashMap<String, Vec<RowData>>,
    fail_tables: HashSet<String>,
    queried: Mutex<Vec<String>>,
}

impl MockSource {
    fn new(rows: HashMap<String, Vec<RowData>>) -> Self {
        MockSource {
            rows,
            fail_tables: HashSet::new(),
            queried: Mutex::new(Vec::new()),
        }
    }

    fn failing_on(mut self, table: &str) -> Self {
        self.fail_tables.insert(table.to_string());
        self
    }

    fn queried_tables(&self) -> Vec<String> {
        self.queried.lock().unwrap().clone()
    }
}

#[async_trait]
impl SqlAdapter for MockSource {
    async fn exec_params(&self, _sql: &str, _params: Vec<Value>) -> Result<u64, DbError> {
        Err(DbError::Unknown("source is read-only".into()))
    }

    async fn query_rows(
        &self,
        table: &str,
        _sql: &str,
        _params: Vec<Value>,
    ) -> Result<Vec<RowData>, DbError> {
        self.queried.lock().unwrap().push(table.to_string());
        if self.fail_tables.contains(table) {
            return Err(DbError::Unknown(format!("select failed for {table}")));
        }
        Ok(self.rows.get(table).cloned().unwrap_or_default())
    }

    async fn count(&self, _sql: &str, _params: Vec<Value>) -> Result<i64, DbError> {
        Err(DbError::Unknown("source is never counted".into()))
    }

    async fn ping(&self) -> Result<(), DbError> {
        Ok(())
    }

    async fn close(&self) -> Result<(), DbError> {
        Ok(())
    }

    fn kind(&self) -> DatabaseKind {
        DatabaseKind::Postgres
    }
}

/// Plays the target role: tracks which keys exist, applies writes, and can
/// simulate a constraint violation on selected keys.
struct MockTarget {
    existing: Mutex<HashSet<String>>,
    fail_keys: HashSet<String>,
    insert_sql: Mutex<Vec<String>>,
    inserted_keys: Mutex<Vec<String>>,
    updated_keys: Mutex<Vec<String>>,
}

impl MockTarget {
    fn with_existing(keys: &[i64]) -> Self {
        MockTarget {
            existing: Mutex::new(keys.iter().map(|k| k.to_string()).collect()),
            fail_keys: HashSet::new(),
            insert_sql: Mutex::new(Vec::new()),
            inserted_keys: Mutex::new(Vec::new()),
            updated_keys: Mutex::new(Vec::new()),
        }
    }

    fn failing_on(mut self, key: i64) -> Self {
        self.fail_keys.insert(key.to_string());
        self
    }

    fn inserted(&self) -> Vec<String> {
        self.inserted_keys.lock().unwrap().clone()
    }

    fn updated(&self) -> Vec<String> {
        self.updated_keys.lock().unwrap().clone()
    }

    fn insert_statements(&self) -> Vec<String> {
        self.insert_sql.lock().unwrap().clone()
    }
}

#[async_trait]
impl SqlAdapter for MockTarget {
    async fn exec_params(&self, sql: &str, params: Vec<Value>) -> Result<u64, DbError> {
        // INSERT binds the key first (the row carries it first), UPDATE last.
        let key = if sql.starts_with("INSERT") {
            params.first().cloned()
        } else {
            params.last().cloned()
        }
        .map(|v| v.to_string())
        .unwrap_or_default();

        if self.fail_keys.contains(&key) {
            return Err(DbError::Write(format!("constraint violation on {key}")));
        }

        if sql.starts_with("INSERT") {
            self.insert_sql.lock().unwrap().push(sql.to_string());
            self.inserted_keys.lock().unwrap().push(key.clone());
            self.existing.lock().unwrap().insert(key);
        } else {
            self.updated_keys.lock().unwrap().push(key);
        }
        Ok(1)
    }

    async fn query_rows(
        &self,
        _table: &str,
        _sql: &str,
        _params: Vec<Value>,
    ) -> Result<Vec<RowData>, DbError> {
        Err(DbError::Unknown("target is never selected from".into()))
    }

    async fn count(&self, _sql: &str, params: Vec<Value>) -> Result<i64, DbError> {
        let key = params
            .first()
            .map(|v| v.to_string())
            .ok_or_else(|| DbError::Unknown("count without key".into()))?;
        Ok(if self.existing.lock().unwrap().contains(&key) {
            1
        } else {
            0
        })
    }

    async fn ping(&self) -> Result<(), DbError> {
        Ok(())
    }

    async fn close(&self) -> Result<(), DbError> {
        Ok(())
    }

    fn kind(&self) -> DatabaseKind {
        DatabaseKind::Postgres
    }
}

fn stok_rows() -> Vec<RowData> {
    [1, 2, 3]
        .iter()
        .map(|key| {
            row(
                "STOKKARTI",
                "STOKKARTIID",
                *key,
                &[("ADI", Value::String(format!("item-{key}")))],
            )
        })
        .collect()
}

fn source_with(rows: Vec<RowData>) -> Arc<MockSource> {
    Arc::new(MockSource::new(HashMap::from([(
        "STOKKARTI".to_string(),
        rows,
    )])))
}

#[tokio::test]
async fn missing_keys_insert_and_present_keys_update() {
    let source = source_with(stok_rows());
    let target = Arc::new(MockTarget::with_existing(&[1]));
    let engine = UpsertEngine::new(target.clone());

    let outcome = TableSyncTask::new(stok_descriptor())
        .run(source, &engine, 15)
        .await
        .unwrap();

    assert_eq!(outcome.inserted, 2);
    assert_eq!(outcome.updated, 1);
    assert_eq!(outcome.errors, 0);
    assert_eq!(outcome.processed(), 3);
    assert_eq!(target.inserted(), vec!["2", "3"]);
    assert_eq!(target.updated(), vec!["1"]);
}

#[tokio::test]
async fn second_run_against_unchanged_source_inserts_nothing() {
    let source = source_with(stok_rows());
    let target = Arc::new(MockTarget::with_existing(&[]));
    let engine = UpsertEngine::new(target.clone());
    let task = TableSyncTask::new(stok_descriptor());

    let first = task.run(source.clone(), &engine, 15).await.unwrap();
    assert_eq!(first.inserted, 3);

    let second = task.run(source, &engine, 15).await.unwrap();
    assert_eq!(second.inserted, 0);
    assert_eq!(second.updated, 3);
    assert_eq!(second.errors, 0);
}

#[tokio::test]
async fn every_row_lands_in_exactly_one_bucket() {
    let source = source_with(stok_rows());
    let target = Arc::new(MockTarget::with_existing(&[3]).failing_on(2));
    let engine = UpsertEngine::new(target);

    let outcome = TableSyncTask::new(stok_descriptor())
        .run(source, &engine, 15)
        .await
        .unwrap();

    assert_eq!(outcome.total(), 3);
}

#[tokio::test]
async fn row_failure_does_not_stop_later_rows() {
    let source = source_with(stok_rows());
    let target = Arc::new(MockTarget::with_existing(&[]).failing_on(2));
    let engine = UpsertEngine::new(target.clone());

    let outcome = TableSyncTask::new(stok_descriptor())
        .run(source, &engine, 15)
        .await
        .unwrap();

    assert_eq!(outcome.inserted, 2);
    assert_eq!(outcome.errors, 1);
    // Row 3 was still attempted after row 2 blew up.
    assert_eq!(target.inserted(), vec!["1", "3"]);
}

#[tokio::test]
async fn insert_columns_match_each_rows_own_shape() {
    let rows = vec![
        row(
            "STOKKARTI",
            "STOKKARTIID",
            1,
            &[
                ("ADI", Value::String("full".into())),
                ("ACIKLAMA", Value::String("desc".into())),
            ],
        ),
        row(
            "STOKKARTI",
            "STOKKARTIID",
            2,
            &[("ADI", Value::String("sparse".into()))],
        ),
    ];
    let source = source_with(rows);
    let target = Arc::new(MockTarget::with_existing(&[]));
    let engine = UpsertEngine::new(target.clone());

    TableSyncTask::new(stok_descriptor())
        .run(source, &engine, 15)
        .await
        .unwrap();

    let statements = target.insert_statements();
    assert_eq!(statements.len(), 2);
    assert!(statements[0].contains("(\"STOKKARTIID\", \"ADI\", \"ACIKLAMA\")"));
    assert!(statements[1].contains("(\"STOKKARTIID\", \"ADI\")"));
}

#[tokio::test]
async fn key_only_row_counts_as_update_without_a_write() {
    let target = Arc::new(MockTarget::with_existing(&[5]));
    let engine = UpsertEngine::new(target.clone());

    let key_only = row("STOKKARTI", "STOKKARTIID", 5, &[]);
    let action = engine
        .upsert("STOKKARTI", "STOKKARTIID", &key_only)
        .await
        .unwrap();

    assert_eq!(action, UpsertAction::Updated);
    assert!(target.updated().is_empty());
}

#[tokio::test]
async fn row_without_a_key_value_is_counted_as_error() {
    let mut keyless = row("STOKKARTI", "STOKKARTIID", 9, &[]);
    keyless.field_values[0].value = None;
    let source = source_with(vec![keyless]);
    let target = Arc::new(MockTarget::with_existing(&[]));
    let engine = UpsertEngine::new(target);

    let outcome = TableSyncTask::new(stok_descriptor())
        .run(source, &engine, 15)
        .await
        .unwrap();

    assert_eq!(outcome.errors, 1);
    assert_eq!(outcome.total(), 1);
}

#[tokio::test]
async fn failing_select_aborts_the_remaining_sequence() {
    let first = TableDescriptor {
        label: "Stock categories",
        table: "STOKKATEGORI",
        primary_key: "STOKKATEGORIID",
        filter: RECENCY,
    };
    let second = stok_descriptor();
    let source = Arc::new(
        MockSource::new(HashMap::from([(
            "STOKKARTI".to_string(),
            stok_rows(),
        )]))
        .failing_on("STOKKATEGORI"),
    );
    let target = Arc::new(MockTarget::with_existing(&[]));
    let engine = UpsertEngine::new(target.clone());

    let result = run_tasks(
        source.clone(),
        &engine,
        &[first, second],
        15,
        &CancellationToken::new(),
    )
    .await;

    assert!(matches!(result, Err(SyncError::Database(_))));
    assert_eq!(source.queried_tables(), vec!["STOKKATEGORI"]);
    assert!(target.inserted().is_empty());
}

#[tokio::test]
async fn cancelled_run_stops_before_the_next_task() {
    let source = source_with(stok_rows());
    let target = Arc::new(MockTarget::with_existing(&[]));
    let engine = UpsertEngine::new(target);
    let cancel = CancellationToken::new();
    cancel.cancel();

    let result = run_tasks(source.clone(), &engine, &[stok_descriptor()], 15, &cancel).await;

    assert!(matches!(result, Err(SyncError::ShutdownRequested)));
    assert!(source.queried_tables().is_empty());
}
