use crate::{error::SyncError, task::TableSyncTask, upsert::UpsertEngine};
use chrono::Utc;
use connectors::{provider::ConnectionProvider, sql::base::adapter::SqlAdapter};
use model::{
    descriptor::TableDescriptor,
    report::{RunReport, TaskReport},
};
use notify::Notifier;
use std::{sync::Arc, time::Instant};
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};

/// Sequences the table sync tasks of one run in their declared order,
/// aggregates their outcomes into a run report, and triggers the
/// failure/success notification. A propagated task failure aborts the
/// remaining sequence; connections are released on every exit path.
pub struct BatchRunner {
    provider: ConnectionProvider,
    notifier: Notifier,
    days_back: u32,
    cancel: CancellationToken,
}

impl BatchRunner {
    pub fn new(
        provider: ConnectionProvider,
        notifier: Notifier,
        days_back: u32,
        cancel: CancellationToken,
    ) -> Self {
        BatchRunner {
            provider,
            notifier,
            days_back,
            cancel,
        }
    }

    /// Runs every descriptor in order. `notify_success` selects between the
    /// two run modes: the bulk schedule ships a success report, the main
    /// schedule only logs completion.
    pub async fn run(
        &self,
        label: &str,
        descriptors: &[TableDescriptor],
        notify_success: bool,
    ) -> Result<RunReport, SyncError> {
        let started_at = Utc::now();
        let started = Instant::now();
        info!("{label}: run starting, {} tables", descriptors.len());

        let result = self.execute(descriptors).await;
        self.provider.close().await;

        match result {
            Ok(tasks) => {
                let report = RunReport::new(started_at, started.elapsed(), tasks);
                info!(
                    "{label}: run completed in {:.1}s, {} rows processed ({} inserted, {} updated), row errors {}",
                    report.duration_secs,
                    report.total_processed(),
                    report.total_inserted,
                    report.total_updated,
                    report.total_errors
                );
                if notify_success {
                    self.notifier.report_success(&report).await;
                }
                Ok(report)
            }
            Err(err) => {
                error!("{label}: run failed: {err}");
                self.notifier.alert_failure(label, &err.to_string()).await;
                Err(err)
            }
        }
    }

    async fn execute(&self, descriptors: &[TableDescriptor]) -> Result<Vec<TaskReport>, SyncError> {
        let source = self.provider.source().await?;
        let target = self.provider.target().await?;
        let engine = UpsertEngine::new(target);
        run_tasks(source, &engine, descriptors, self.days_back, &self.cancel).await
    }

    /// Pings source, target and reports notifier state; used by the
    /// connectivity test command and before a bulk run.
    pub async fn test_connections(&self) -> Result<(), SyncError> {
        let outcome = self.ping_endpoints().await;
        self.provider.close().await;
        if let Err(err) = &outcome {
            self.notifier
                .alert_failure("Connectivity test", &err.to_string())
                .await;
        }
        outcome
    }

    async fn ping_endpoints(&self) -> Result<(), SyncError> {
        self.provider.source().await?.ping().await?;
        info!("Source database ping succeeded");
        self.provider.target().await?.ping().await?;
        info!("Target database ping succeeded");
        if self.notifier.is_enabled() {
            info!("Notification webhook configured");
        } else {
            warn!("Notification webhook not configured; alerts are disabled");
        }
        Ok(())
    }
}

/// Sequential task loop, shared by the runner and the engine tests. Order
/// is a correctness requirement: dependent tables are declared after their
/// referents, so a failing task must stop everything behind it.
pub(crate) async fn run_tasks(
    source: Arc<dyn SqlAdapter>,
    engine: &UpsertEngine,
    descriptors: &[TableDescriptor],
    days_back: u32,
    cancel: &CancellationToken,
) -> Result<Vec<TaskReport>, SyncError> {
    let mut tasks = Vec::with_capacity(descriptors.len());
    for descriptor in descriptors {
        if cancel.is_cancelled() {
            warn!(
                "Shutdown requested before starting task '{}', stopping run",
                descriptor.label
            );
            return Err(SyncError::ShutdownRequested);
        }
        let outcome = TableSyncTask::new(*descriptor)
            .run(source.clone(), engine, days_back)
            .await?;
        tasks.push(TaskReport {
            label: descriptor.label.to_string(),
            outcome,
        });
    }
    Ok(tasks)
}
