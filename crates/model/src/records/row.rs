use crate::core::value::{FieldValue, Value};
use serde::{Deserialize, Serialize};

/// One row read from a table, with its columns in the order the source
/// returned them. The column set is whatever `SELECT *` produced at read
/// time; nothing in the replicator assumes a fixed schema.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RowData {
    pub table: String,
    pub field_values: Vec<FieldValue>,
}

impl RowData {
    pub fn new(table: &str, field_values: Vec<FieldValue>) -> Self {
        RowData {
            table: table.to_string(),
            field_values,
        }
    }

    pub fn get(&self, field: &str) -> Option<&FieldValue> {
        self.field_values
            .iter()
            .find(|f| f.name.eq_ignore_ascii_case(field))
    }

    pub fn get_value(&self, field: &str) -> Value {
        self.get(field)
            .and_then(|f| f.value.clone())
            .unwrap_or(Value::Null)
    }

    pub fn column_names(&self) -> Vec<&str> {
        self.field_values.iter().map(|f| f.name.as_str()).collect()
    }

    pub fn len(&self) -> usize {
        self.field_values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.field_values.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row() -> RowData {
        RowData::new(
            "FIRMALAR",
            vec![
                FieldValue::new("FIRMAID", Some(Value::Int(7))),
                FieldValue::new("UNVANI", Some(Value::String("Acme".into()))),
                FieldValue::new("FAX", None),
            ],
        )
    }

    #[test]
    fn lookup_is_case_insensitive() {
        assert_eq!(row().get_value("firmaid"), Value::Int(7));
    }

    #[test]
    fn null_and_missing_columns_read_as_null() {
        assert_eq!(row().get_value("FAX"), Value::Null);
        assert_eq!(row().get_value("NO_SUCH_COLUMN"), Value::Null);
    }

    #[test]
    fn column_order_is_preserved() {
        assert_eq!(row().column_names(), vec!["FIRMAID", "UNVANI", "FAX"]);
    }
}
