//! Error types for the migration library.

use thiserror::Error;

/// Main error type for migration operations.
#[derive(Error, Debug)]
pub enum MigrateError {
    /// Configuration error (missing fields, invalid values, etc.)
    #[error("Configuration error: {0}")]
    Config(String),

    /// Source database connection or query error
    #[error("Source database error: {0}")]
    Source(#[from] rusqlite::Error),

    /// Destination database connection or write error
    #[error("Destination database error: {0}")]
    Target(#[from] mongodb::error::Error),

    /// Schema discovery failed (unreachable source or malformed metadata)
    #[error("Schema discovery failed: {0}")]
    Schema(String),

    /// A sink failed while accepting or completing a table
    #[error("Sink failure for table {table}: {message}")]
    Sink { table: String, message: String },

    /// IO error (file sink, output directory)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl MigrateError {
    /// Create a Schema error.
    pub fn schema(message: impl Into<String>) -> Self {
        MigrateError::Schema(message.into())
    }

    /// Create a Sink error with table context.
    pub fn sink(table: impl Into<String>, message: impl Into<String>) -> Self {
        MigrateError::Sink {
            table: table.into(),
            message: message.into(),
        }
    }

    /// Format error with full details including error chain.
    pub fn format_detailed(&self) -> String {
        let mut output = format!("Error: {}\n", self);

        let mut source = std::error::Error::source(self);
        let mut depth = 1;
        while let Some(err) = source {
            output.push_str(&format!("\nCaused by:\n  {}: {}", depth, err));
            source = err.source();
            depth += 1;
        }

        output
    }

    /// Process exit code for this error, used by the CLI.
    pub fn exit_code(&self) -> u8 {
        match self {
            MigrateError::Config(_) => 1,
            MigrateError::Source(_) => 2,
            MigrateError::Target(_) => 3,
            MigrateError::Schema(_) => 4,
            MigrateError::Sink { .. } => 5,
            MigrateError::Json(_) => 6,
            MigrateError::Io(_) => 7,
        }
    }
}

/// Result type alias for migration operations.
pub type Result<T> = std::result::Result<T, MigrateError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sink_error_carries_table_context() {
        let err = MigrateError::sink("users", "disk full");
        assert_eq!(err.to_string(), "Sink failure for table users: disk full");
        assert_eq!(err.exit_code(), 5);
    }

    #[test]
    fn test_format_detailed_includes_chain() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "no such file");
        let err = MigrateError::Io(io);
        let detailed = err.format_detailed();
        assert!(detailed.starts_with("Error: IO error:"));
        assert!(detailed.contains("Caused by:"));
    }
}
