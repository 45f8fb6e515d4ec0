//! Ordered row-to-document conversion.

use crate::catalog::TableSchema;
use crate::source::SourceRow;
use crate::value::{coerce, RawValue, Scalar};

/// Ordered key-value representation of one source row.
///
/// The key sequence is exactly the owning table's column-name sequence:
/// same order, same cardinality. Documents are ephemeral; they are built
/// per row and discarded once handed to the sinks.
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    fields: Vec<(String, Scalar)>,
}

impl Document {
    /// Build a document from a raw row and its table's schema.
    ///
    /// Emits one `(name, scalar)` pair per column descriptor, in schema
    /// order. A cell missing from the row counts as an absent value and
    /// picks up the default substitution during coercion.
    pub fn from_row(row: &SourceRow, schema: &TableSchema) -> Self {
        let mut fields = Vec::with_capacity(schema.columns.len());
        for column in &schema.columns {
            let raw = row.get(&column.name).unwrap_or(&RawValue::Null);
            fields.push((column.name.clone(), coerce(raw, &column.declared_type)));
        }
        Self { fields }
    }

    /// Fields in schema order.
    pub fn fields(&self) -> impl Iterator<Item = (&str, &Scalar)> {
        self.fields.iter().map(|(key, value)| (key.as_str(), value))
    }

    /// Number of fields.
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Whether the document holds no fields.
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}
