//! SQLite source database operations.

use std::sync::{Arc, Mutex, MutexGuard};

use async_trait::async_trait;
use rusqlite::types::ValueRef;
use rusqlite::Connection;
use tokio::sync::mpsc;
use tokio::task;
use tracing::{debug, info};

use crate::catalog::{ColumnDescriptor, TableSchema};
use crate::config::SourceConfig;
use crate::error::Result;
use crate::value::RawValue;

/// Bound on in-flight rows between the scan task and the consumer.
const ROW_CHANNEL_CAPACITY: usize = 256;

/// One source row, addressable by column name.
///
/// Cells keep the source column order, so iteration is deterministic even
/// though lookups go by name.
#[derive(Debug, Clone, Default)]
pub struct SourceRow {
    cells: Vec<(String, RawValue)>,
}

impl SourceRow {
    /// Create an empty row.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a named cell, keeping insertion order.
    pub fn push(&mut self, column: impl Into<String>, value: RawValue) {
        self.cells.push((column.into(), value));
    }

    /// Look up a cell by column name.
    pub fn get(&self, column: &str) -> Option<&RawValue> {
        self.cells
            .iter()
            .find(|(name, _)| name == column)
            .map(|(_, value)| value)
    }

    /// Number of cells in the row.
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    /// Whether the row holds no cells.
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }
}

impl FromIterator<(String, RawValue)> for SourceRow {
    fn from_iter<I: IntoIterator<Item = (String, RawValue)>>(iter: I) -> Self {
        Self {
            cells: iter.into_iter().collect(),
        }
    }
}

/// Trait for source database operations.
#[async_trait]
pub trait SourceReader: Send + Sync {
    /// List table names in lexicographic order.
    async fn list_tables(&self) -> Result<Vec<String>>;

    /// Describe one table's columns, in declaration order.
    async fn describe_table(&self, table: &str) -> Result<Vec<ColumnDescriptor>>;

    /// Start streaming all rows of a table, in source default order.
    ///
    /// Returns a channel receiver fed by a background task; the bounded
    /// channel provides backpressure when the consumer falls behind.
    fn read_table(&self, schema: &TableSchema) -> mpsc::Receiver<Result<SourceRow>>;
}

/// SQLite source backed by a single shared connection.
#[derive(Debug)]
pub struct SqliteSource {
    conn: Arc<Mutex<Connection>>,
    path: String,
}

impl SqliteSource {
    /// Open the SQLite database and verify it is readable.
    pub fn open(config: &SourceConfig) -> Result<Self> {
        let conn = Connection::open(&config.path)?;

        // Probe the schema table so an unreadable or non-database file
        // fails here rather than mid-transfer.
        let tables: i64 =
            conn.query_row("SELECT count(*) FROM sqlite_master", [], |row| row.get(0))?;

        let path = config.path.display().to_string();
        info!("Opened SQLite source: {} ({} schema objects)", path, tables);

        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
            path,
        })
    }
}

/// A poisoned lock means a previous scan task panicked; the connection
/// itself is still valid for further statements.
fn lock_conn(conn: &Mutex<Connection>) -> MutexGuard<'_, Connection> {
    conn.lock().unwrap_or_else(|e| e.into_inner())
}

/// Quote an identifier for use in SQLite SQL text.
fn quote_ident(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}

/// Convert one SQLite cell into a raw value.
fn raw_value(value: ValueRef<'_>) -> RawValue {
    match value {
        ValueRef::Null => RawValue::Null,
        ValueRef::Integer(v) => RawValue::Integer(v),
        ValueRef::Real(v) => RawValue::Real(v),
        ValueRef::Text(t) => RawValue::Text(String::from_utf8_lossy(t).into_owned()),
        ValueRef::Blob(b) => RawValue::Blob(b.to_vec()),
    }
}

/// Full scan of one table, pushing rows into the channel.
///
/// Stops early without error if the receiver is dropped.
fn scan_table(
    conn: &Mutex<Connection>,
    table: &str,
    tx: &mpsc::Sender<Result<SourceRow>>,
) -> Result<()> {
    let conn = lock_conn(conn);
    let mut stmt = conn.prepare(&format!("SELECT * FROM {}", quote_ident(table)))?;
    let column_names: Vec<String> = stmt.column_names().iter().map(|s| s.to_string()).collect();

    let mut rows = stmt.query([])?;
    let mut count = 0u64;
    while let Some(row) = rows.next()? {
        let mut out = SourceRow::new();
        for (idx, name) in column_names.iter().enumerate() {
            out.push(name.clone(), raw_value(row.get_ref(idx)?));
        }
        if tx.blocking_send(Ok(out)).is_err() {
            return Ok(());
        }
        count += 1;
    }

    debug!("Scanned {} rows from {}", count, table);
    Ok(())
}

#[async_trait]
impl SourceReader for SqliteSource {
    async fn list_tables(&self) -> Result<Vec<String>> {
        let conn = lock_conn(&self.conn);
        let mut stmt =
            conn.prepare("SELECT name FROM sqlite_master WHERE type = 'table' ORDER BY name")?;
        let names = stmt
            .query_map([], |row| row.get::<_, String>(0))?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        debug!("Found {} tables in {}", names.len(), self.path);
        Ok(names)
    }

    async fn describe_table(&self, table: &str) -> Result<Vec<ColumnDescriptor>> {
        let conn = lock_conn(&self.conn);
        let mut stmt = conn.prepare(&format!("PRAGMA table_info({})", quote_ident(table)))?;
        let columns = stmt
            .query_map([], |row| {
                Ok(ColumnDescriptor {
                    name: row.get(1)?,
                    declared_type: row.get(2)?,
                })
            })?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(columns)
    }

    fn read_table(&self, schema: &TableSchema) -> mpsc::Receiver<Result<SourceRow>> {
        let (tx, rx) = mpsc::channel(ROW_CHANNEL_CAPACITY);
        let conn = Arc::clone(&self.conn);
        let table = schema.name.clone();

        task::spawn_blocking(move || {
            if let Err(e) = scan_table(&conn, &table, &tx) {
                // Best effort: the receiver may already be gone.
                let _ = tx.blocking_send(Err(e));
            }
        });

        rx
    }
}
