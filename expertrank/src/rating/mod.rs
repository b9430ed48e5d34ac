//! Rating translation: from per-user totals to a star-rated expert list
//!
//! This is the second pass of the ranking process. It runs only once every
//! [`UserAggregate`] for the query exists, because each user's percentile
//! rank is relative to all of the others.

use crate::models::{RankedExpert, UserAggregate};
use crate::scoring::{percentile_rank, ScoringConfig, TiePolicy};

/// Convert a percentile rank into a star rating.
///
/// The surviving percentile range `(cutoff, 100]` is split into `n_stars`
/// equal-width buckets, offset by one so a rank right at the cutoff floor
/// lands on a low star count and the true maximum lands on `n_stars`:
///
/// ```text
/// stars = clamp(1 + floor((rank - cutoff - 1) / ((100 - cutoff) / n_stars)),
///               0, n_stars)
/// ```
///
/// Floor division, not rounding; the clamp guards against boundary ranks
/// that drift past the cutoff or 100 through floating-point comparison.
pub fn star_rating(percentile_rank: f64, cutoff_percentile: f64, n_stars: u32) -> u32 {
    let bucket_width = (100.0 - cutoff_percentile) / n_stars as f64;
    let raw = 1.0 + ((percentile_rank - cutoff_percentile - 1.0) / bucket_width).floor();
    raw.clamp(0.0, n_stars as f64) as u32
}

/// Maps user aggregates to their percentile rank, filters by the cutoff,
/// and emits the final ordered, star-rated expert list
pub struct RatingTranslator {
    config: ScoringConfig,
}

impl RatingTranslator {
    /// Create a new rating translator with the given configuration
    ///
    /// # Panics
    ///
    /// Panics if the configuration is invalid.
    pub fn new(config: ScoringConfig) -> Self {
        if let Err(e) = config.validate() {
            panic!("Invalid scoring config: {}", e);
        }
        Self { config }
    }

    /// Create a rating translator, returning an error if the configuration
    /// is invalid
    pub fn try_new(config: ScoringConfig) -> Result<Self, String> {
        config.validate()?;
        Ok(Self { config })
    }

    /// Get reference to the configuration
    pub fn config(&self) -> &ScoringConfig {
        &self.config
    }

    /// Rank the full aggregate batch for one query.
    ///
    /// Each user's total score is percentile-ranked against all totals;
    /// users below the cutoff are dropped; survivors are ordered by total
    /// score descending with ascending user id as the deterministic
    /// tiebreak. An empty batch yields an empty list, never an error.
    pub fn rate(&self, aggregates: Vec<UserAggregate>) -> crate::Result<Vec<RankedExpert>> {
        if aggregates.is_empty() {
            return Ok(Vec::new());
        }

        let totals: Vec<f64> = aggregates.iter().map(|a| a.total_score).collect();
        let cutoff = self.config.cutoff_percentile;

        let mut experts = Vec::with_capacity(aggregates.len());
        for aggregate in aggregates {
            let rank = percentile_rank(&totals, aggregate.total_score, TiePolicy::Strict)?;
            if rank < cutoff {
                tracing::debug!(
                    user_id = aggregate.user_id,
                    percentile_rank = rank,
                    "user below cutoff, dropped"
                );
                continue;
            }
            let stars = star_rating(rank, cutoff, self.config.n_stars);
            experts.push(RankedExpert::new(aggregate, rank, stars));
        }

        experts.sort_by(|a, b| {
            b.total_score
                .total_cmp(&a.total_score)
                .then(a.user_id.cmp(&b.user_id))
        });

        Ok(experts)
    }
}
