//! Composite answer scoring and per-user aggregation
//!
//! The composite score multiplies relevance by percentile-normalized
//! engagement factors, so a zero-relevance answer scores zero no matter how
//! popular it is, while each engagement signal can at most double the
//! score. Normalization is batch-relative: percentiles only make sense once
//! the whole candidate batch for the query is in memory, so scoring is a
//! two-pass sweep over an immutable snapshot of that batch.

use std::collections::{BTreeMap, HashMap};

use crate::models::{AnswerRecord, ContributionDetail, UserAggregate, UserId, ANSWER_RELEVANCE};

use super::config::ScoringConfig;
use super::percentile::strict_fraction;

/// An answer record paired with its composite score
#[derive(Debug, Clone, PartialEq)]
pub struct ScoredAnswer {
    /// The scored record
    pub record: AnswerRecord,

    /// Composite quality score
    pub score: f64,
}

/// Combines relevance, normalized engagement metrics, acceptance, and
/// sentiment into one scalar per answer, and rolls answer scores up per
/// user
pub struct CompositeScorer {
    config: ScoringConfig,
}

impl CompositeScorer {
    /// Create a new composite scorer with the given configuration
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

    /// Create a composite scorer, returning an error if the configuration
    /// is invalid
    pub fn try_new(config: ScoringConfig) -> Result<Self, String> {
        config.validate()?;
        Ok(Self { config })
    }

    /// Get reference to the configuration
    pub fn config(&self) -> &ScoringConfig {
        &self.config
    }

    /// Vote score with sentiment folded in, fed into percentile
    /// normalization.
    ///
    /// An accepted answer with a zero vote score gets a one-vote bump so
    /// acceptance alone lifts it off the floor; sentiment is weighted down
    /// to a fraction of a real vote.
    fn effective_score(&self, record: &AnswerRecord) -> f64 {
        let accepted_bump = if record.metrics.accepted && record.metrics.raw_score == 0 {
            1.0
        } else {
            0.0
        };
        record.metrics.raw_score as f64
            + accepted_bump
            + record.sentiment_score as f64 * self.config.sentiment_factor
    }

    /// Score a whole candidate batch.
    ///
    /// Each engagement metric is percentile-ranked against the full batch,
    /// then combined:
    ///
    /// ```text
    /// score = relevance
    ///       * (1 + pct(effective_score))
    ///       * (1 + pct(favorites))
    ///       * (1 + pct(views))
    ///       * (1 + accepted_bonus * accepted)
    /// ```
    ///
    /// An empty batch produces an empty result, not an error. Output order
    /// matches input order.
    pub fn score_batch(&self, records: Vec<AnswerRecord>) -> Vec<ScoredAnswer> {
        if records.is_empty() {
            return Vec::new();
        }

        let effective: Vec<f64> = records.iter().map(|r| self.effective_score(r)).collect();
        let favorites: Vec<f64> = records.iter().map(|r| r.metrics.favorites as f64).collect();
        let views: Vec<f64> = records.iter().map(|r| r.metrics.views as f64).collect();

        tracing::debug!(batch_size = records.len(), "scoring candidate batch");

        records
            .into_iter()
            .enumerate()
            .map(|(i, record)| {
                let pct_effective = strict_fraction(&effective, effective[i]);
                let pct_favorites = strict_fraction(&favorites, favorites[i]);
                let pct_views = strict_fraction(&views, views[i]);
                let accepted_factor = if record.metrics.accepted {
                    1.0 + self.config.accepted_bonus
                } else {
                    1.0
                };

                let score = record.relevance()
                    * (1.0 + pct_effective)
                    * (1.0 + pct_favorites)
                    * (1.0 + pct_views)
                    * accepted_factor;

                ScoredAnswer { record, score }
            })
            .collect()
    }

    /// Roll scored answers up into one aggregate per credited user.
    ///
    /// Grouping and summation both run in deterministic order (batch order
    /// within a user, ascending user id across users), so re-scoring a
    /// frozen batch reproduces bit-identical totals. Users absent from
    /// `display_names` get an empty display name.
    pub fn aggregate(
        &self,
        scored: &[ScoredAnswer],
        display_names: &HashMap<UserId, String>,
    ) -> Vec<UserAggregate> {
        let mut groups: BTreeMap<UserId, (f64, f64, Vec<ContributionDetail>)> = BTreeMap::new();

        for answer in scored {
            let entry = groups
                .entry(answer.record.owner_id)
                .or_insert_with(|| (0.0, 0.0, Vec::new()));
            entry.0 += answer.score;
            entry.1 += answer.record.relevance();
            entry.2.push(ContributionDetail {
                question_id: answer.record.question_id,
                answer_id: answer.record.answer_id,
                question_title: answer.record.question_title.clone(),
                question_relevance: answer.record.question_relevance,
                answer_relevance: ANSWER_RELEVANCE,
            });
        }

        groups
            .into_iter()
            .map(|(user_id, (total_score, relevance_sum, contributions))| UserAggregate {
                user_id,
                display_name: display_names.get(&user_id).cloned().unwrap_or_default(),
                total_score,
                mean_relevance: relevance_sum / contributions.len() as f64,
                contributions,
            })
            .collect()
    }
}
