//! Configuration validation

use super::models::ExpertRankConfig;
use super::{ConfigError, Result};

/// Validate a loaded configuration before the pipeline is built from it.
pub fn validate_config(config: &ExpertRankConfig) -> Result<()> {
    config
        .scoring
        .validate()
        .map_err(ConfigError::ValidationError)?;

    Ok(())
}
