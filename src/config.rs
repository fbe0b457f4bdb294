//! Engine configuration.
//!
//! Loaded from a TOML file; every field has a default so an empty file (or
//! no file at all) yields a working engine.
//!
//! ```toml
//! [engine]
//! book_capacity = 1024
//! intake_buffer = 0
//! result_buffer = 0
//! thread_name = "matching-core"
//!
//! [logging]
//! filter = "info"
//! ```

use std::path::Path;

use serde::Deserialize;

use crate::error::ConfigError;

/// Matching thread and channel settings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Order slots pre-allocated for each new asset book
    pub book_capacity: usize,

    /// Intake channel capacity. 0 makes `submit` a rendezvous with the
    /// matching thread.
    pub intake_buffer: usize,

    /// Result channel capacity. 0 makes every publication block until a
    /// consumer takes it.
    pub result_buffer: usize,

    /// Name of the matching thread
    pub thread_name: String,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            book_capacity: 1024,
            intake_buffer: 0,
            result_buffer: 0,
            thread_name: "matching-core".to_string(),
        }
    }
}

impl EngineConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.book_capacity == 0 {
            return Err(ConfigError::Invalid("book_capacity must be positive".into()));
        }
        if self.thread_name.trim().is_empty() {
            return Err(ConfigError::Invalid("thread_name is empty".into()));
        }
        Ok(())
    }
}

/// Log filter used when `RUST_LOG` is unset.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub filter: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: "info".to_string(),
        }
    }
}

/// Top-level config file structure.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub engine: EngineConfig,
    pub logging: LoggingConfig,
}

impl AppConfig {
    /// Parse and validate a TOML document
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let config: AppConfig = toml::from_str(content)?;
        config.engine.validate()?;
        Ok(config)
    }

    /// Load config from the given TOML file path.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    /// Load from `path` if it exists, otherwise fall back to defaults.
    ///
    /// A file that exists but fails to parse is still an error.
    pub fn load_or_default(path: &Path) -> Result<Self, ConfigError> {
        if path.exists() {
            let config = Self::load(path)?;
            tracing::info!(path = %path.display(), "loaded config");
            Ok(config)
        } else {
            tracing::info!(path = %path.display(), "config not found, using defaults");
            Ok(Self::default())
        }
    }
}
