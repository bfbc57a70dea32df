//! The data-table widget.

use serde::Serialize;
use serde_json::Value;

use crate::column::{value_text, Column};
use crate::render::RenderedTable;

/// A filterable table over serializable records.
///
/// The widget owns its records and the current search text. Filtering is
/// recomputed from scratch over every record on each render.
pub struct DataTable<T: Serialize> {
    columns: Vec<Column<T>>,
    rows: Vec<T>,
    search: String,
}

impl<T: Serialize> DataTable<T> {
    /// Create a table with the given columns and records.
    #[must_use]
    pub fn new(columns: Vec<Column<T>>, rows: Vec<T>) -> Self {
        Self {
            columns,
            rows,
            search: String::new(),
        }
    }

    /// Replace the records.
    pub fn set_rows(&mut self, rows: Vec<T>) {
        self.rows = rows;
    }

    /// Set the free-text search term. An empty term shows every row.
    pub fn set_search(&mut self, term: impl Into<String>) {
        self.search = term.into();
    }

    /// The current search term.
    #[must_use]
    pub fn search(&self) -> &str {
        &self.search
    }

    /// The columns of this table.
    #[must_use]
    pub fn columns(&self) -> &[Column<T>] {
        &self.columns
    }

    /// All records, ignoring the search term.
    #[must_use]
    pub fn rows(&self) -> &[T] {
        &self.rows
    }

    /// Records matching the current search term, in their original order.
    #[must_use]
    pub fn visible_rows(&self) -> Vec<&T> {
        let needle = self.search.to_lowercase();
        self.rows
            .iter()
            .filter(|row| needle.is_empty() || matches(&serialize(*row), &needle))
            .collect()
    }

    /// Render the matching records into cell text.
    #[must_use]
    pub fn render(&self) -> RenderedTable {
        let needle = self.search.to_lowercase();
        let rows = self
            .rows
            .iter()
            .map(|row| (row, serialize(row)))
            .filter(|(_, value)| needle.is_empty() || matches(value, &needle))
            .map(|(row, value)| {
                self.columns
                    .iter()
                    .map(|column| column.cell(row, &value))
                    .collect()
            })
            .collect();

        RenderedTable {
            headers: self.columns.iter().map(|c| c.header().to_string()).collect(),
            rows,
        }
    }
}

/// Serialize a record; a record that cannot be serialized has no fields.
fn serialize<T: Serialize>(row: &T) -> Value {
    serde_json::to_value(row).unwrap_or(Value::Null)
}

/// Whether any top-level field contains the lowercase needle.
fn matches(value: &Value, needle: &str) -> bool {
    let contains = |v: &Value| value_text(v).to_lowercase().contains(needle);
    match value {
        Value::Object(fields) => fields.values().any(contains),
        Value::Null => false,
        other => contains(other),
    }
}
