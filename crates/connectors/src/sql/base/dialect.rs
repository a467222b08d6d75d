use crate::sql::base::adapter::DatabaseKind;

impl DatabaseKind {
    /// Parameter placeholder for the 1-based position `index`.
    pub fn placeholder(self, index: usize) -> String {
        match self {
            DatabaseKind::MySql => "?".to_string(),
            DatabaseKind::Postgres => format!("${index}"),
        }
    }

    /// Quotes an identifier so legacy column names survive verbatim.
    pub fn quote(self, ident: &str) -> String {
        match self {
            DatabaseKind::MySql => format!("`{ident}`"),
            DatabaseKind::Postgres => format!("\"{ident}\""),
        }
    }

    /// Expression for "now minus N days", with N bound at the 1-based
    /// position `index`.
    pub fn recency_cutoff(self, index: usize) -> String {
        match self {
            DatabaseKind::MySql => "DATE_SUB(NOW(), INTERVAL ? DAY)".to_string(),
            DatabaseKind::Postgres => format!("now() - (${index}::int * INTERVAL '1 day')"),
        }
    }
}
