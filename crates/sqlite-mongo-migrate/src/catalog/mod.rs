//! Source schema metadata: tables, columns, and the catalog snapshot.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::{MigrateError, Result};
use crate::source::SourceReader;

/// Column metadata: name plus the free-form declared type from the source
/// schema (e.g. "INTEGER", "TEXT", "REAL", or empty).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnDescriptor {
    /// Column name.
    pub name: String,

    /// Declared type label, as written in the source schema.
    pub declared_type: String,
}

/// Table metadata: name plus columns in declaration order.
///
/// Declaration order is authoritative for document field order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableSchema {
    /// Table name.
    pub name: String,

    /// Column definitions in declaration order.
    pub columns: Vec<ColumnDescriptor>,
}

impl TableSchema {
    /// Column names in declaration order.
    pub fn column_names(&self) -> impl Iterator<Item = &str> {
        self.columns.iter().map(|c| c.name.as_str())
    }
}

/// Full schema snapshot of the source, built once per run and immutable
/// thereafter. Tables enumerate in lexicographic name order.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    tables: BTreeMap<String, TableSchema>,
}

impl Catalog {
    /// Read the full catalog from the source.
    ///
    /// Fails with a schema error before any row processing if the source
    /// metadata is unreachable or malformed; no partial catalog is surfaced.
    pub async fn load(source: &dyn SourceReader) -> Result<Self> {
        let mut tables = BTreeMap::new();

        for name in source.list_tables().await? {
            let columns = source.describe_table(&name).await?;
            if columns.is_empty() {
                return Err(MigrateError::schema(format!(
                    "table {} has no column metadata",
                    name
                )));
            }
            debug!("Loaded {} columns for {}", columns.len(), name);
            tables.insert(name.clone(), TableSchema { name, columns });
        }

        info!("Discovered {} tables in source catalog", tables.len());
        Ok(Self { tables })
    }

    /// Table names in lexicographic order.
    pub fn table_names(&self) -> impl Iterator<Item = &str> {
        self.tables.keys().map(String::as_str)
    }

    /// Table schemas in lexicographic name order.
    pub fn tables(&self) -> impl Iterator<Item = &TableSchema> {
        self.tables.values()
    }

    /// Look up one table's schema.
    pub fn get(&self, name: &str) -> Option<&TableSchema> {
        self.tables.get(name)
    }

    /// Number of tables in the catalog.
    pub fn len(&self) -> usize {
        self.tables.len()
    }

    /// Whether the catalog holds no tables.
    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }
}
