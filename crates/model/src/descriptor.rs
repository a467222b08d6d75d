/// Row-selection policy for one table. Tables replicate rows touched within
/// the run's `days_back` window; a descriptor may instead pin a static
/// predicate (per-table policy, never derived at runtime).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectFilter {
    Recency {
        created_at: &'static str,
        modified_at: &'static str,
    },
    Predicate(&'static str),
}

/// Static per-entity configuration driving the generic upsert engine. One
/// descriptor replaces what used to be a dedicated module per table.
#[derive(Debug, Clone, Copy)]
pub struct TableDescriptor {
    /// Human-readable name used in logs and reports.
    pub label: &'static str,
    pub table: &'static str,
    pub primary_key: &'static str,
    pub filter: SelectFilter,
}
