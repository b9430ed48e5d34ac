//! Percentile ranking of a value within a reference population
//!
//! Used twice per query: once to normalize each engagement metric against
//! the batch of scored answers, and once to rank per-user totals against
//! the batch of scored users.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::{ExpertRankError, Result};

/// How ties between the value and population members are counted
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum TiePolicy {
    /// Count only population members strictly below the value. The minimum
    /// of a population ranks 0; a unique maximum of a population of size N
    /// ranks `100 * (N - 1) / N`.
    #[default]
    Strict,

    /// Conventional percentile-of-score ranking: the midpoint of the
    /// strict and weak counts, counting the value itself once when present.
    Rank,
}

impl fmt::Display for TiePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Strict => write!(f, "strict"),
            Self::Rank => write!(f, "rank"),
        }
    }
}

/// Percentile rank of `value` within `population`, in `[0, 100]`.
///
/// Deterministic for a fixed population and value, and well-defined for
/// populations with duplicates. A population of size 1 ranks its own value
/// 0 under [`TiePolicy::Strict`].
///
/// # Errors
///
/// Returns [`ExpertRankError::EmptyPopulation`] for an empty population.
/// That is a contract violation: callers are expected to short-circuit
/// empty batches before normalizing.
pub fn percentile_rank(population: &[f64], value: f64, tie_policy: TiePolicy) -> Result<f64> {
    if population.is_empty() {
        return Err(ExpertRankError::EmptyPopulation);
    }

    let n = population.len() as f64;
    let below = population.iter().filter(|x| **x < value).count() as f64;
    match tie_policy {
        TiePolicy::Strict => Ok(below * 100.0 / n),
        TiePolicy::Rank => {
            let at_or_below = population.iter().filter(|x| **x <= value).count() as f64;
            let in_population = if at_or_below > below { 1.0 } else { 0.0 };
            Ok((below + at_or_below + in_population) * 50.0 / n)
        }
    }
}

/// Strict percentile rank as a fraction in `[0, 1]`, for use as a score
/// multiplier. The caller guarantees a non-empty population.
pub(crate) fn strict_fraction(population: &[f64], value: f64) -> f64 {
    debug_assert!(!population.is_empty());
    let below = population.iter().filter(|x| **x < value).count() as f64;
    below / population.len() as f64
}
