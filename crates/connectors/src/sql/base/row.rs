use bigdecimal::BigDecimal;
use model::{
    core::value::{FieldValue, Value},
    records::row::RowData,
};
use mysql_async::Row as MySqlRow;
use mysql_async::consts::{ColumnFlags, ColumnType};
use std::str::FromStr;
use tokio_postgres::Row as PgRow;
use tokio_postgres::types::Json as PgJson;
use tracing::warn;

/// A driver row from either backend, decoded column by column into the
/// driver-neutral `RowData`. Unknown column types fall back to a string read
/// so an exotic column degrades to text instead of aborting the row.
pub enum DbRow<'a> {
    MySql(&'a MySqlRow),
    Postgres(&'a PgRow),
}

impl DbRow<'_> {
    pub fn to_row_data(&self, table: &str) -> RowData {
        let field_values = match self {
            DbRow::MySql(row) => mysql_fields(row),
            DbRow::Postgres(row) => postgres_fields(row),
        };
        RowData::new(table, field_values)
    }
}

fn postgres_fields(row: &PgRow) -> Vec<FieldValue> {
    row.columns()
        .iter()
        .enumerate()
        .map(|(idx, col)| FieldValue::new(col.name(), postgres_value(row, idx, col.type_().name())))
        .collect()
}

fn postgres_value(row: &PgRow, idx: usize, type_name: &str) -> Option<Value> {
    match type_name {
        "int2" => get_pg::<i16>(row, idx).map(|v| Value::Int(v as i64)),
        "int4" => get_pg::<i32>(row, idx).map(|v| Value::Int(v as i64)),
        "int8" => get_pg::<i64>(row, idx).map(Value::Int),
        "float4" => get_pg::<f32>(row, idx).map(|v| Value::Float(v as f64)),
        "float8" => get_pg::<f64>(row, idx).map(Value::Float),
        "numeric" => get_pg::<rust_decimal::Decimal>(row, idx)
            .and_then(|v| BigDecimal::from_str(&v.to_string()).ok())
            .map(Value::Decimal),
        "bool" => get_pg::<bool>(row, idx).map(Value::Boolean),
        "bytea" => get_pg::<Vec<u8>>(row, idx).map(Value::Bytes),
        "date" => get_pg::<chrono::NaiveDate>(row, idx).map(Value::Date),
        "timestamp" => get_pg::<chrono::NaiveDateTime>(row, idx).map(Value::TimestampNaive),
        "timestamptz" => get_pg::<chrono::DateTime<chrono::Utc>>(row, idx).map(Value::Timestamp),
        "uuid" => get_pg::<uuid::Uuid>(row, idx).map(Value::Uuid),
        "json" | "jsonb" => get_pg::<PgJson<serde_json::Value>>(row, idx).map(|v| Value::Json(v.0)),
        other => {
            let value = get_pg::<String>(row, idx).map(Value::String);
            if value.is_none() {
                warn!("Unreadable Postgres column type '{}' read as NULL", other);
            }
            value
        }
    }
}

fn get_pg<'a, T>(row: &'a PgRow, idx: usize) -> Option<T>
where
    T: tokio_postgres::types::FromSql<'a>,
{
    row.try_get::<_, Option<T>>(idx).ok().flatten()
}

fn mysql_fields(row: &MySqlRow) -> Vec<FieldValue> {
    row.columns_ref()
        .iter()
        .enumerate()
        .map(|(idx, col)| {
            let name = col.name_str().into_owned();
            let value = mysql_value(row, idx, col.column_type(), col.flags());
            FieldValue::new(&name, value)
        })
        .collect()
}

fn mysql_value(
    row: &MySqlRow,
    idx: usize,
    column_type: ColumnType,
    flags: ColumnFlags,
) -> Option<Value> {
    match column_type {
        ColumnType::MYSQL_TYPE_TINY
        | ColumnType::MYSQL_TYPE_SHORT
        | ColumnType::MYSQL_TYPE_INT24
        | ColumnType::MYSQL_TYPE_LONG
        | ColumnType::MYSQL_TYPE_LONGLONG
        | ColumnType::MYSQL_TYPE_YEAR => get_mysql::<i64>(row, idx).map(Value::Int),
        ColumnType::MYSQL_TYPE_FLOAT | ColumnType::MYSQL_TYPE_DOUBLE => {
            get_mysql::<f64>(row, idx).map(Value::Float)
        }
        ColumnType::MYSQL_TYPE_DECIMAL | ColumnType::MYSQL_TYPE_NEWDECIMAL => {
            get_mysql::<BigDecimal>(row, idx).map(Value::Decimal)
        }
        ColumnType::MYSQL_TYPE_DATE => get_mysql::<chrono::NaiveDate>(row, idx).map(Value::Date),
        ColumnType::MYSQL_TYPE_DATETIME | ColumnType::MYSQL_TYPE_TIMESTAMP => {
            get_mysql::<chrono::NaiveDateTime>(row, idx).map(Value::TimestampNaive)
        }
        ColumnType::MYSQL_TYPE_JSON => get_mysql::<serde_json::Value>(row, idx).map(Value::Json),
        ColumnType::MYSQL_TYPE_TINY_BLOB
        | ColumnType::MYSQL_TYPE_MEDIUM_BLOB
        | ColumnType::MYSQL_TYPE_LONG_BLOB
        | ColumnType::MYSQL_TYPE_BLOB
        | ColumnType::MYSQL_TYPE_STRING
        | ColumnType::MYSQL_TYPE_VAR_STRING
        | ColumnType::MYSQL_TYPE_VARCHAR => {
            if flags.contains(ColumnFlags::BINARY_FLAG) {
                get_mysql::<Vec<u8>>(row, idx).map(Value::Bytes)
            } else {
                get_mysql::<String>(row, idx).map(Value::String)
            }
        }
        other => {
            let value = get_mysql::<String>(row, idx).map(Value::String);
            if value.is_none() {
                warn!("Unreadable MySQL column type {:?} read as NULL", other);
            }
            value
        }
    }
}

fn get_mysql<T>(row: &MySqlRow, idx: usize) -> Option<T>
where
    T: mysql_async::prelude::FromValue,
{
    row.get_opt::<Option<T>, _>(idx).and_then(|r| r.ok()).flatten()
}
