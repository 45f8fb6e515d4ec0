//! Run coordination: catalog load, destination reset, table transfer.

use std::sync::Arc;
use std::time::Instant;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};
use uuid::Uuid;

use crate::catalog::{Catalog, TableSchema};
use crate::config::Config;
use crate::document::Document;
use crate::error::Result;
use crate::sink::{BulkLoaderSink, DocumentSink, FileSink};
use crate::source::{SourceReader, SqliteSource};
use crate::target::{MongoTarget, TargetStore};

/// Outcome of a completed migration run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MigrationResult {
    /// Unique identifier for this run.
    pub run_id: String,

    /// When the run started.
    pub started_at: DateTime<Utc>,

    /// When the run completed.
    pub completed_at: DateTime<Utc>,

    /// Wall-clock duration in seconds.
    pub duration_seconds: f64,

    /// Number of tables transferred.
    pub tables_total: usize,

    /// Total documents delivered across all tables.
    pub documents_transferred: u64,

    /// Throughput over the whole run.
    pub documents_per_second: f64,
}

impl MigrationResult {
    /// Pretty-printed JSON rendering, for `--output-json`.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// Coordinates one migration run end to end.
///
/// Tables move strictly one at a time, and within a table rows move
/// strictly one at a time through every sink. The first error aborts the
/// run; work already delivered to a sink stays delivered.
pub struct Orchestrator {
    config: Config,
    source: Arc<dyn SourceReader>,
    target: Arc<dyn TargetStore>,
}

impl Orchestrator {
    /// Open the source and connect to the destination.
    pub async fn connect(config: Config) -> Result<Self> {
        config.validate()?;

        let source = SqliteSource::open(&config.source)?;
        let target = MongoTarget::connect(&config.target).await?;

        Ok(Self {
            config,
            source: Arc::new(source),
            target: Arc::new(target),
        })
    }

    /// Build an orchestrator around existing collaborators.
    pub fn with_collaborators(
        config: Config,
        source: Arc<dyn SourceReader>,
        target: Arc<dyn TargetStore>,
    ) -> Self {
        Self {
            config,
            source,
            target,
        }
    }

    /// Execute the migration.
    pub async fn run(&self) -> Result<MigrationResult> {
        let run_id = Uuid::new_v4().to_string();
        let started_at = Utc::now();
        let start = Instant::now();

        info!("Starting migration run {}", run_id);

        info!("Phase 1: Reading source catalog");
        let catalog = Catalog::load(self.source.as_ref()).await?;

        info!("Phase 2: Resetting destination database");
        self.target.drop_database().await?;

        info!("Phase 3: Transferring {} tables", catalog.len());
        let mut sinks: Vec<Box<dyn DocumentSink>> = vec![
            Box::new(FileSink::new(self.config.output.dir.clone())),
            Box::new(BulkLoaderSink::new(Arc::clone(&self.target))),
        ];

        let mut documents_transferred = 0u64;
        for schema in catalog.tables() {
            documents_transferred += self.transfer_table(schema, &mut sinks).await?;
        }

        let completed_at = Utc::now();
        let duration_seconds = start.elapsed().as_secs_f64();
        let documents_per_second = if duration_seconds > 0.0 {
            documents_transferred as f64 / duration_seconds
        } else {
            0.0
        };

        info!(
            "Migration run {} complete: {} tables, {} documents in {:.2}s",
            run_id,
            catalog.len(),
            documents_transferred,
            duration_seconds
        );

        Ok(MigrationResult {
            run_id,
            started_at,
            completed_at,
            duration_seconds,
            tables_total: catalog.len(),
            documents_transferred,
            documents_per_second,
        })
    }

    /// Stream one table through every sink, then signal completion.
    async fn transfer_table(
        &self,
        schema: &TableSchema,
        sinks: &mut [Box<dyn DocumentSink>],
    ) -> Result<u64> {
        debug!("Transferring table {}", schema.name);

        let mut rows = self.source.read_table(schema);
        let mut count = 0u64;
        while let Some(row) = rows.recv().await {
            let document = Document::from_row(&row?, schema);
            for sink in sinks.iter_mut() {
                sink.accept(&schema.name, &document).await?;
            }
            count += 1;
        }

        for sink in sinks.iter_mut() {
            sink.finish_table(&schema.name).await?;
        }

        info!("{}: transferred {} documents", schema.name, count);
        Ok(count)
    }
}
