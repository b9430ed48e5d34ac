//! Configuration system for expertrank.
//!
//! Supports loading configuration from multiple sources (defaults, a TOML
//! file, environment variables) with validation. Scoring constants are
//! never read from ambient state at ranking time — they are loaded here
//! once and handed to the pipeline at construction.

mod loader;
mod models;
mod validation;

pub use loader::ConfigLoader;
pub use models::*;
pub use validation::validate_config;

/// Default configuration file names that the system will look for
pub const DEFAULT_CONFIG_FILES: &[&str] = &[
    "expertrank.toml",
    ".expertrank/config.toml",
];

/// Environment variable prefix for expertrank configuration
pub const ENV_PREFIX: &str = "EXPERTRANK_";

/// Configuration error type
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Error occurred during file loading
    #[error("Failed to load configuration file: {0}")]
    FileLoadError(String),

    /// Error occurred during validation
    #[error("Configuration validation error: {0}")]
    ValidationError(String),

    /// Error occurred during parsing
    #[error("Configuration parsing error: {0}")]
    ParseError(String),
}

/// Result type for configuration operations
pub type Result<T> = std::result::Result<T, ConfigError>;
