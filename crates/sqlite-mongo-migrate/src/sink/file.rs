//! Durable textual dump: one `.tbl` file per table, one block per document.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::PathBuf;

use async_trait::async_trait;
use tracing::debug;

use crate::document::Document;
use crate::error::{MigrateError, Result};
use crate::sink::DocumentSink;

/// File extension for per-table dumps.
const TABLE_FILE_EXT: &str = "tbl";

/// Sink writing each table to `<out_dir>/<table>.tbl` as brace-delimited
/// text blocks, one `"key": value` pair per line, blocks separated by a
/// blank line.
pub struct FileSink {
    out_dir: PathBuf,
    open: Option<OpenTable>,
}

struct OpenTable {
    table: String,
    writer: BufWriter<File>,
}

impl FileSink {
    /// Create a sink writing under `out_dir`.
    ///
    /// The directory must already exist; creating it is the caller's
    /// concern.
    pub fn new(out_dir: impl Into<PathBuf>) -> Self {
        Self {
            out_dir: out_dir.into(),
            open: None,
        }
    }

    /// Open a fresh dump file for `table` unless it is already open.
    fn ensure_open(&mut self, table: &str) -> Result<()> {
        if matches!(&self.open, Some(open) if open.table == table) {
            return Ok(());
        }

        let path = self.out_dir.join(format!("{}.{}", table, TABLE_FILE_EXT));
        let file = File::create(&path).map_err(|e| {
            MigrateError::sink(table, format!("cannot create {}: {}", path.display(), e))
        })?;

        debug!("Opened table dump {}", path.display());
        self.open = Some(OpenTable {
            table: table.to_string(),
            writer: BufWriter::new(file),
        });
        Ok(())
    }
}

/// Serialize one document as a text block followed by a blank line.
fn write_block(writer: &mut impl Write, document: &Document) -> Result<()> {
    writer.write_all(b"{")?;
    for (idx, (key, value)) in document.fields().enumerate() {
        if idx > 0 {
            writer.write_all(b",")?;
        }
        write!(
            writer,
            "\n\t{}: {}",
            serde_json::to_string(key)?,
            value.to_json_literal()
        )?;
    }
    writer.write_all(b"\n}\n\n")?;
    Ok(())
}

#[async_trait]
impl DocumentSink for FileSink {
    async fn accept(&mut self, table: &str, document: &Document) -> Result<()> {
        self.ensure_open(table)?;
        if let Some(open) = self.open.as_mut() {
            write_block(&mut open.writer, document)?;
        }
        Ok(())
    }

    async fn finish_table(&mut self, table: &str) -> Result<()> {
        // A table with zero rows still gets its (empty) dump file.
        self.ensure_open(table)?;
        if let Some(mut open) = self.open.take() {
            open.writer.flush()?;
            debug!("Closed table dump for {}", table);
        }
        Ok(())
    }
}
