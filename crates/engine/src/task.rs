use crate::{
    error::SyncError,
    upsert::{UpsertAction, UpsertEngine},
};
use connectors::sql::base::{adapter::SqlAdapter, query};
use model::{descriptor::TableDescriptor, report::SyncOutcome};
use std::sync::Arc;
use tracing::{error, info};

/// Per-entity orchestration: select the changed rows from the source, feed
/// each through the upsert engine, and keep counting past row-level
/// failures. Only a select-phase failure aborts the task.
pub struct TableSyncTask {
    descriptor: TableDescriptor,
}

impl TableSyncTask {
    pub fn new(descriptor: TableDescriptor) -> Self {
        TableSyncTask { descriptor }
    }

    pub async fn run(
        &self,
        source: Arc<dyn SqlAdapter>,
        engine: &UpsertEngine,
        days_back: u32,
    ) -> Result<SyncOutcome, SyncError> {
        let desc = &self.descriptor;
        info!("{}: starting sync", desc.label);

        let (sql, params) = query::select_changed(desc, days_back, source.kind());
        let rows = source.query_rows(desc.table, &sql, params).await?;
        info!("{}: {} changed rows to sync", desc.label, rows.len());

        let mut outcome = SyncOutcome::default();
        for row in &rows {
            match engine.upsert(desc.table, desc.primary_key, row).await {
                Ok(UpsertAction::Inserted) => outcome.inserted += 1,
                Ok(UpsertAction::Updated) => outcome.updated += 1,
                Err(err) => {
                    outcome.errors += 1;
                    error!(
                        "{}: upsert failed for {} = {}: {}",
                        desc.label,
                        desc.primary_key,
                        row.get_value(desc.primary_key),
                        err
                    );
                }
            }
        }

        info!(
            "{}: sync finished, {} processed ({} inserted, {} updated), errors {}",
            desc.label,
            outcome.processed(),
            outcome.inserted,
            outcome.updated,
            outcome.errors
        );
        Ok(outcome)
    }
}
