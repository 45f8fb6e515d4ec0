//! Configuration validation and connection strings.

mod types;

pub use types::*;

use crate::error::{MigrateError, Result};

impl Config {
    /// Validate the configuration.
    pub fn validate(&self) -> Result<()> {
        if self.source.path.as_os_str().is_empty() {
            return Err(MigrateError::Config(
                "source path must not be empty".to_string(),
            ));
        }
        if self.target.database.is_empty() {
            return Err(MigrateError::Config(
                "destination database name must not be empty".to_string(),
            ));
        }
        if self.target.port == 0 {
            return Err(MigrateError::Config(
                "destination port must not be 0".to_string(),
            ));
        }
        Ok(())
    }
}

impl TargetConfig {
    /// Build a connection string for the MongoDB driver.
    pub fn connection_string(&self) -> String {
        format!("mongodb://{}:{}", self.host, self.port)
    }
}
