//! Per-user rollups and the final rated expert record
//!
//! Ranking is a two-pass process: [`UserAggregate`] is the first-pass rollup
//! of a user's composite scores, and [`RankedExpert`] is the second-pass
//! output once the whole batch is known. The percentile rank and star rating
//! only exist on the second-pass type, so a half-ranked record cannot be
//! observed.

use serde::{Deserialize, Serialize};

use super::answer::{AnswerId, QuestionId, UserId};

/// One contributing answer inside a user's rollup, kept for display and
/// drill-down
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContributionDetail {
    /// Parent question of the contributing answer
    pub question_id: QuestionId,

    /// The contributing answer
    pub answer_id: AnswerId,

    /// Title of the parent question
    pub question_title: Option<String>,

    /// Relevance of the parent question to the query
    pub question_relevance: f64,

    /// Answer-level relevance multiplier that was applied
    pub answer_relevance: f64,
}

/// First-pass rollup of one user's contributions for a single query.
///
/// A `UserAggregate` only materializes for users with at least one
/// qualifying answer, so `contributions` is never empty.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserAggregate {
    /// The credited user
    pub user_id: UserId,

    /// Display name of the user; empty if the directory had no entry
    pub display_name: String,

    /// Sum of composite per-answer scores for this user
    pub total_score: f64,

    /// Arithmetic mean of relevance across the contributing answers
    pub mean_relevance: f64,

    /// The rolled-up answers, in batch order
    pub contributions: Vec<ContributionDetail>,
}

impl UserAggregate {
    /// Ids of the contributing answers, in batch order
    pub fn contributing_answer_ids(&self) -> Vec<AnswerId> {
        self.contributions.iter().map(|c| c.answer_id).collect()
    }

    /// Number of contributing answers
    pub fn answer_count(&self) -> usize {
        self.contributions.len()
    }
}

/// Second-pass output: a user aggregate that survived the percentile cutoff,
/// with its rank and star rating attached
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankedExpert {
    /// The credited user
    pub user_id: UserId,

    /// Display name of the user; empty if the directory had no entry
    pub display_name: String,

    /// Sum of composite per-answer scores for this user
    pub total_score: f64,

    /// Arithmetic mean of relevance across the contributing answers
    pub mean_relevance: f64,

    /// The rolled-up answers, in batch order
    pub contributions: Vec<ContributionDetail>,

    /// Percentile rank of `total_score` among all scored users for the query
    pub percentile_rank: f64,

    /// Star rating derived from the percentile rank, in `[0, n_stars]`
    pub stars: u32,
}

impl RankedExpert {
    /// Attach second-pass results to a first-pass aggregate
    pub fn new(aggregate: UserAggregate, percentile_rank: f64, stars: u32) -> Self {
        Self {
            user_id: aggregate.user_id,
            display_name: aggregate.display_name,
            total_score: aggregate.total_score,
            mean_relevance: aggregate.mean_relevance,
            contributions: aggregate.contributions,
            percentile_rank,
            stars,
        }
    }

    /// Ids of the contributing answers, in batch order
    pub fn contributing_answer_ids(&self) -> Vec<AnswerId> {
        self.contributions.iter().map(|c| c.answer_id).collect()
    }

    /// Number of contributing answers
    pub fn answer_count(&self) -> usize {
        self.contributions.len()
    }
}
