use crate::sql::base::adapter::DatabaseKind;
use model::{
    core::value::Value,
    descriptor::{SelectFilter, TableDescriptor},
};

/// Builds the changed-rows select for one table. The recency window is bound
/// as a parameter; predicate filters are static per-table policy baked into
/// the descriptor, so they carry no parameters.
pub fn select_changed(
    descriptor: &TableDescriptor,
    days_back: u32,
    kind: DatabaseKind,
) -> (String, Vec<Value>) {
    let table = kind.quote(descriptor.table);
    let pk = kind.quote(descriptor.primary_key);

    match descriptor.filter {
        SelectFilter::Recency {
            created_at,
            modified_at,
        } => {
            let sql = format!(
                "SELECT * FROM {table} WHERE {created} > {cutoff_a} OR {modified} > {cutoff_b} ORDER BY {pk}",
                created = kind.quote(created_at),
                modified = kind.quote(modified_at),
                cutoff_a = kind.recency_cutoff(1),
                cutoff_b = kind.recency_cutoff(2),
            );
            let days = Value::Int(days_back as i64);
            (sql, vec![days.clone(), days])
        }
        SelectFilter::Predicate(predicate) => {
            let sql = format!("SELECT * FROM {table} WHERE {predicate} ORDER BY {pk}");
            (sql, Vec::new())
        }
    }
}

/// Count query used for the per-row existence check, filtered on the primary
/// key bound at position 1.
pub fn count_by_key(table: &str, primary_key: &str, kind: DatabaseKind) -> String {
    format!(
        "SELECT COUNT(*) FROM {} WHERE {} = {}",
        kind.quote(table),
        kind.quote(primary_key),
        kind.placeholder(1),
    )
}

/// INSERT listing exactly the columns present in the row being written, in
/// the row's own order. One placeholder per column.
pub fn insert(table: &str, columns: &[&str], kind: DatabaseKind) -> String {
    let column_list = columns
        .iter()
        .map(|c| kind.quote(c))
        .collect::<Vec<_>>()
        .join(", ");
    let value_list = (1..=columns.len())
        .map(|i| kind.placeholder(i))
        .collect::<Vec<_>>()
        .join(", ");
    format!(
        "INSERT INTO {} ({column_list}) VALUES ({value_list})",
        kind.quote(table),
    )
}

/// UPDATE setting every non-key column of the row, filtered by primary-key
/// equality. The key is bound last, after the SET parameters. Callers must
/// not pass an empty `set_columns` slice; the upsert engine guards that case
/// before building any SQL.
pub fn update(table: &str, set_columns: &[&str], primary_key: &str, kind: DatabaseKind) -> String {
    let assignments = set_columns
        .iter()
        .enumerate()
        .map(|(i, c)| format!("{} = {}", kind.quote(c), kind.placeholder(i + 1)))
        .collect::<Vec<_>>()
        .join(", ");
    format!(
        "UPDATE {} SET {assignments} WHERE {} = {}",
        kind.quote(table),
        kind.quote(primary_key),
        kind.placeholder(set_columns.len() + 1),
    )
}
