//! Column descriptors.

use std::fmt;

use serde_json::Value;

/// Custom cell renderer: receives the record and returns the cell text.
pub type Renderer<T> = Box<dyn Fn(&T) -> String + Send + Sync>;

/// A column of a [`DataTable`](crate::DataTable).
///
/// The accessor names a top-level field of the record's serialized form.
/// Without a renderer the cell shows that field as text.
pub struct Column<T> {
    header: String,
    accessor: String,
    renderer: Option<Renderer<T>>,
}

impl<T> Column<T> {
    /// Create a column showing the field `accessor` under `header`.
    #[must_use]
    pub fn new(header: impl Into<String>, accessor: impl Into<String>) -> Self {
        Self {
            header: header.into(),
            accessor: accessor.into(),
            renderer: None,
        }
    }

    /// Replace the default cell text with a custom renderer.
    #[must_use]
    pub fn render_with<F>(mut self, renderer: F) -> Self
    where
        F: Fn(&T) -> String + Send + Sync + 'static,
    {
        self.renderer = Some(Box::new(renderer));
        self
    }

    /// The column header.
    #[must_use]
    pub fn header(&self) -> &str {
        &self.header
    }

    /// The field this column reads.
    #[must_use]
    pub fn accessor(&self) -> &str {
        &self.accessor
    }

    pub(crate) fn cell(&self, record: &T, serialized: &Value) -> String {
        match &self.renderer {
            Some(render) => render(record),
            None => serialized
                .get(&self.accessor)
                .map(value_text)
                .unwrap_or_default(),
        }
    }
}

impl<T> fmt::Debug for Column<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Column")
            .field("header", &self.header)
            .field("accessor", &self.accessor)
            .field("custom_renderer", &self.renderer.is_some())
            .finish()
    }
}

/// Text form of a field value: strings raw, `null` empty, anything else as JSON.
#[must_use]
pub fn value_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn value_text_forms() {
        assert_eq!(value_text(&json!("Lagos")), "Lagos");
        assert_eq!(value_text(&json!(null)), "");
        assert_eq!(value_text(&json!(42)), "42");
        assert_eq!(value_text(&json!(true)), "true");
        assert_eq!(value_text(&json!(["a", "b"])), r#"["a","b"]"#);
    }

    #[test]
    fn default_cell_reads_field() {
        let column: Column<Value> = Column::new("City", "city");
        let row = json!({"city": "Accra"});
        assert_eq!(column.cell(&row, &row), "Accra");

        let missing = json!({"name": "Bob"});
        assert_eq!(column.cell(&missing, &missing), "");
    }

    #[test]
    fn renderer_overrides_field() {
        let column: Column<Value> = Column::new("Name", "name")
            .render_with(|row: &Value| row["name"].as_str().unwrap_or("").to_uppercase());
        let row = json!({"name": "Alice"});
        assert_eq!(column.cell(&row, &row), "ALICE");
    }
}
