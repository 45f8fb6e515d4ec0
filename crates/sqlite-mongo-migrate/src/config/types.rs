//! Configuration type definitions.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Root configuration: the resolved parameters for one migration run.
///
/// Argument parsing is the CLI's concern; the engine only sees these
/// resolved values.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Source database (SQLite) configuration.
    pub source: SourceConfig,

    /// Destination database (MongoDB) configuration.
    pub target: TargetConfig,

    /// Per-table file dump configuration.
    #[serde(default)]
    pub output: OutputConfig,
}

/// Source database (SQLite) configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceConfig {
    /// Path to the SQLite database file.
    pub path: PathBuf,
}

/// Destination database (MongoDB) configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TargetConfig {
    /// Destination database name.
    pub database: String,

    /// Database host (default: "localhost").
    #[serde(default = "default_host")]
    pub host: String,

    /// Database port (default: 27017).
    #[serde(default = "default_port")]
    pub port: u16,
}

/// Per-table file dump configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Directory receiving one `<table>.tbl` file per table.
    #[serde(default = "default_out_dir")]
    pub dir: PathBuf,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            dir: default_out_dir(),
        }
    }
}

// Default value functions for serde
fn default_host() -> String {
    "localhost".to_string()
}

fn default_port() -> u16 {
    27017
}

fn default_out_dir() -> PathBuf {
    PathBuf::from("outFiles")
}
