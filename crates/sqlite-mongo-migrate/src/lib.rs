//! # sqlite-mongo-migrate
//!
//! Relational-to-document migration engine: reads every table of a SQLite
//! database and delivers each row, converted to an ordered two-kind
//! document, to a MongoDB collection and a per-table text dump file.
//!
//! ## Example
//!
//! ```no_run
//! use sqlite_mongo_migrate::{Config, Orchestrator, SourceConfig, TargetConfig};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = Config {
//!     source: SourceConfig {
//!         path: "mtg.db".into(),
//!     },
//!     target: TargetConfig {
//!         database: "mtg".to_string(),
//!         host: "localhost".to_string(),
//!         port: 27017,
//!     },
//!     output: Default::default(),
//! };
//!
//! let result = Orchestrator::connect(config).await?.run().await?;
//! println!("{} documents transferred", result.documents_transferred);
//! # Ok(())
//! # }
//! ```

pub mod catalog;
pub mod config;
pub mod document;
pub mod error;
pub mod orchestrator;
pub mod sink;
pub mod source;
pub mod target;
pub mod value;

pub use catalog::{Catalog, ColumnDescriptor, TableSchema};
pub use config::{Config, OutputConfig, SourceConfig, TargetConfig};
pub use document::Document;
pub use error::{MigrateError, Result};
pub use orchestrator::{MigrationResult, Orchestrator};
pub use sink::{BulkLoaderSink, DocumentSink, FileSink};
pub use source::{SourceReader, SourceRow, SqliteSource};
pub use target::{MongoTarget, TargetStore};
pub use value::{coerce, Number, RawValue, Scalar};
