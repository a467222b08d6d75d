use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Counts produced by one table sync task. Every selected row lands in
/// exactly one bucket, so `inserted + updated + errors` equals the number of
/// rows the select returned.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct SyncOutcome {
    pub inserted: u64,
    pub updated: u64,
    pub errors: u64,
}

impl SyncOutcome {
    pub fn processed(&self) -> u64 {
        self.inserted + self.updated
    }

    pub fn total(&self) -> u64 {
        self.inserted + self.updated + self.errors
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaskReport {
    pub label: String,
    pub outcome: SyncOutcome,
}

/// Aggregated result of one full run, serialized as-is into the success
/// notification payload.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunReport {
    pub started_at: DateTime<Utc>,
    pub duration_secs: f64,
    pub tasks: Vec<TaskReport>,
    pub total_inserted: u64,
    pub total_updated: u64,
    pub total_errors: u64,
}

impl RunReport {
    pub fn new(started_at: DateTime<Utc>, duration: Duration, tasks: Vec<TaskReport>) -> Self {
        let total_inserted = tasks.iter().map(|t| t.outcome.inserted).sum();
        let total_updated = tasks.iter().map(|t| t.outcome.updated).sum();
        let total_errors = tasks.iter().map(|t| t.outcome.errors).sum();
        RunReport {
            started_at,
            duration_secs: duration.as_secs_f64(),
            tasks,
            total_inserted,
            total_updated,
            total_errors,
        }
    }

    pub fn total_processed(&self) -> u64 {
        self.total_inserted + self.total_updated
    }
}
