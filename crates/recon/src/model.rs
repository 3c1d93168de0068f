use serde::Serialize;

use crate::error::ReconError;
use crate::normalize::normalize;

// ---------------------------------------------------------------------------
// Schema + rows
// ---------------------------------------------------------------------------

/// Ordered column list of the reference table. Fixed at load time; the
/// first column is always the code column.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Schema {
    columns: Vec<String>,
}

impl Schema {
    pub fn new<I, S>(columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            columns: columns.into_iter().map(Into::into).collect(),
        }
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    /// Column position by name, case-insensitive and trimmed.
    pub fn index_of(&self, name: &str) -> Option<usize> {
        let wanted = name.trim().to_lowercase();
        self.columns
            .iter()
            .position(|c| c.trim().to_lowercase() == wanted)
    }

    /// The join-key column. Always the first column of the schema.
    pub fn code_column(&self) -> &str {
        &self.columns[0]
    }
}

/// One result or reference row, values aligned to a `Schema`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Row {
    values: Vec<String>,
}

impl Row {
    pub fn new(values: Vec<String>) -> Self {
        Self { values }
    }

    pub fn values(&self) -> &[String] {
        &self.values
    }

    pub fn get<'a>(&'a self, schema: &Schema, column: &str) -> Option<&'a str> {
        schema
            .index_of(column)
            .and_then(|i| self.values.get(i))
            .map(String::as_str)
    }

    /// The row's code cell (first column).
    pub fn code(&self) -> &str {
        self.values.first().map(String::as_str).unwrap_or("")
    }

    /// Digits-only join key of the code cell.
    pub fn key(&self) -> String {
        normalize(self.code())
    }
}

// ---------------------------------------------------------------------------
// Reference table
// ---------------------------------------------------------------------------

/// The fixed lookup dataset, loaded once per session and immutable
/// afterward. Rows are kept in source order; duplicate codes on the
/// reference side are preserved (both match).
#[derive(Debug, Clone)]
pub struct ReferenceTable {
    schema: Schema,
    rows: Vec<Row>,
}

impl ReferenceTable {
    pub fn new(schema: Schema, rows: Vec<Row>) -> Self {
        Self { schema, rows }
    }

    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Fail-fast precondition check: at least one row, every row as wide
    /// as the schema.
    pub fn validate(&self) -> Result<(), ReconError> {
        if self.rows.is_empty() {
            return Err(ReconError::EmptyReference);
        }
        for (i, row) in self.rows.iter().enumerate() {
            if row.values().len() != self.schema.len() {
                return Err(ReconError::RowWidth {
                    row: i,
                    expected: self.schema.len(),
                    found: row.values().len(),
                });
            }
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Reconciliation output
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize)]
pub struct ReconSummary {
    pub matched: usize,
    pub unmatched: usize,
    pub total: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct ReconMeta {
    pub profile: String,
    pub engine_version: String,
    pub run_at: String,
}

/// Full output of one processing run: matched reference rows (reference
/// order) followed by synthesized not-found rows (extraction order).
/// Built fresh on every run; replaces any prior result set wholesale.
#[derive(Debug, Clone, Serialize)]
pub struct ReconResult {
    pub meta: ReconMeta,
    pub summary: ReconSummary,
    pub schema: Schema,
    pub rows: Vec<Row>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn schema_index_is_case_insensitive() {
        let schema = Schema::new(["CNAE", "DESCRICAO", "GRAU_RISCO"]);
        assert_eq!(schema.index_of("cnae"), Some(0));
        assert_eq!(schema.index_of(" grau_risco "), Some(2));
        assert_eq!(schema.index_of("nope"), None);
    }

    #[test]
    fn row_key_normalizes_code() {
        let schema = Schema::new(["CNAE", "descricao"]);
        let row = Row::new(vec!["4721-1/02".into(), "Padaria".into()]);
        assert_eq!(row.key(), "4721102");
        assert_eq!(row.get(&schema, "descricao"), Some("Padaria"));
    }

    #[test]
    fn validate_rejects_empty_table() {
        let table = ReferenceTable::new(Schema::new(["CNAE", "descricao"]), vec![]);
        assert!(matches!(table.validate(), Err(ReconError::EmptyReference)));
    }

    #[test]
    fn validate_rejects_short_rows() {
        let table = ReferenceTable::new(
            Schema::new(["CNAE", "descricao"]),
            vec![Row::new(vec!["4721-1/02".into()])],
        );
        assert!(matches!(
            table.validate(),
            Err(ReconError::RowWidth { row: 0, expected: 2, found: 1 })
        ));
    }
}
