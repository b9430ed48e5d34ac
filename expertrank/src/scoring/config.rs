//! Scoring configuration
//!
//! All scoring constants live in one immutable value handed to the
//! composite scorer and the rating translator at construction time; nothing
//! is read from ambient state.

use serde::{Deserialize, Serialize};

/// Configuration for composite scoring and rating translation
///
/// # Example
///
/// ```
/// use expertrank::scoring::ScoringConfig;
///
/// let config = ScoringConfig {
///     accepted_bonus: 0.5,
///     sentiment_factor: 0.7,
///     cutoff_percentile: 75.0,
///     n_stars: 5,
/// };
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ScoringConfig {
    /// Multiplicative bonus applied to an accepted answer's composite score
    ///
    /// The final composite is scaled by `1 + accepted_bonus` when the
    /// answer is accepted. Default: 0.5
    pub accepted_bonus: f64,

    /// Weight of comment sentiment relative to a real vote
    ///
    /// The summed comment polarity is folded into the vote score as
    /// `sentiment * sentiment_factor` before percentile normalization.
    /// Default: 0.7
    pub sentiment_factor: f64,

    /// Minimum percentile rank a user must reach to appear in results
    ///
    /// Users whose total-score percentile falls below this cutoff are
    /// dropped from the final list. Default: 75
    pub cutoff_percentile: f64,

    /// Number of star buckets the surviving percentile range is split into
    ///
    /// Default: 5
    pub n_stars: u32,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            accepted_bonus: 0.5,
            sentiment_factor: 0.7,
            cutoff_percentile: 75.0,
            n_stars: 5,
        }
    }
}

impl ScoringConfig {
    /// Create a new scoring configuration with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a scoring config that keeps most scored users
    ///
    /// Useful for small or niche corpora where the default cutoff would
    /// leave too few experts to show.
    pub fn inclusive() -> Self {
        Self {
            cutoff_percentile: 50.0,
            ..Default::default()
        }
    }

    /// Create a scoring config that only surfaces the top decile
    ///
    /// Useful for large corpora where the default cutoff still yields an
    /// unwieldy expert list.
    pub fn elite() -> Self {
        Self {
            cutoff_percentile: 90.0,
            ..Default::default()
        }
    }

    /// Validate the configuration
    ///
    /// Returns an error if any parameters are invalid:
    /// - `accepted_bonus` and `sentiment_factor` must be >= 0.0
    /// - `cutoff_percentile` must lie in `[0, 100)`
    /// - `n_stars` must be >= 1
    pub fn validate(&self) -> Result<(), String> {
        if self.accepted_bonus < 0.0 {
            return Err("accepted_bonus must be >= 0.0".to_string());
        }
        if self.sentiment_factor < 0.0 {
            return Err("sentiment_factor must be >= 0.0".to_string());
        }
        if !(0.0..100.0).contains(&self.cutoff_percentile) {
            return Err("cutoff_percentile must lie in [0, 100)".to_string());
        }
        if self.n_stars == 0 {
            return Err("n_stars must be >= 1".to_string());
        }

        Ok(())
    }
}
