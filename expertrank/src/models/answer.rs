//! Per-answer records and the credit-resolution rule

use serde::{Deserialize, Serialize};

/// Identifier of an answer post in the corpus
pub type AnswerId = i64;

/// Identifier of a question post in the corpus
pub type QuestionId = i64;

/// Identifier of a contributor
pub type UserId = i64;

/// Answer-level relevance multiplier.
///
/// Per-answer similarity against the query is not computed; every answer
/// inherits its parent question's relevance scaled by this constant.
pub const ANSWER_RELEVANCE: f64 = 1.0;

/// One retrieval result: a question and its similarity to the query
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RetrievalHit {
    /// Question the retrieval collaborator matched
    pub question_id: QuestionId,

    /// Similarity of the question to the query, in `[0, 1]`
    pub relevance: f64,
}

impl RetrievalHit {
    /// Create a retrieval hit
    pub fn new(question_id: QuestionId, relevance: f64) -> Self {
        Self {
            question_id,
            relevance,
        }
    }
}

/// Resolve the user an answer is credited to.
///
/// Precedence: the answer's owner, then its last editor. Answers with
/// neither cannot be credited and are excluded from scoring entirely; that
/// exclusion is silent, not an error.
pub fn resolve_credited_user(
    owner_user_id: Option<UserId>,
    last_editor_user_id: Option<UserId>,
) -> Option<UserId> {
    owner_user_id.or(last_editor_user_id)
}

/// Persisted engagement metrics for one answer, as read from the signal
/// store. Missing numeric fields have already been coalesced to 0 and a
/// missing accepted flag to `false` at the store boundary.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct AnswerMetrics {
    /// Age of the answer in days at the corpus snapshot instant
    pub age_days: i64,

    /// Raw vote score of the answer
    pub raw_score: i64,

    /// Favorite count of the parent question
    pub favorites: i64,

    /// View count of the parent question
    pub views: i64,

    /// Whether this answer is the question's accepted answer
    pub accepted: bool,
}

impl AnswerMetrics {
    /// Metrics for an answer with no backing row: all zeros, not accepted
    pub fn absent() -> Self {
        Self::default()
    }
}

/// A resolved candidate: an answer joined to its parent retrieval hit, with
/// the credited user already decided. Produced by the candidate resolver;
/// engagement metrics are attached in a later stage.
#[derive(Debug, Clone, PartialEq)]
pub struct Candidate {
    /// Answer being scored
    pub answer_id: AnswerId,

    /// Parent question of the answer
    pub question_id: QuestionId,

    /// User this answer is credited to
    pub owner_id: UserId,

    /// Title of the parent question, for display
    pub question_title: Option<String>,

    /// Relevance of the parent question to the query, in `[0, 1]`
    pub question_relevance: f64,
}

/// One scored contribution: a candidate answer with its engagement metrics
/// and sentiment aggregate attached. Constructed fresh per query from
/// joined reads and discarded once the response is produced.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnswerRecord {
    /// Answer being scored
    pub answer_id: AnswerId,

    /// Parent question of the answer
    pub question_id: QuestionId,

    /// User this answer is credited to (owner, else last editor)
    pub owner_id: UserId,

    /// Title of the parent question, for display
    pub question_title: Option<String>,

    /// Relevance of the parent question to the query, in `[0, 1]`
    pub question_relevance: f64,

    /// Engagement metrics read from the signal store
    pub metrics: AnswerMetrics,

    /// Sum of classified-comment polarities attached to this answer;
    /// 0 if none were classified
    pub sentiment_score: i64,
}

impl AnswerRecord {
    /// Build a record from a resolved candidate plus its signal store reads
    pub fn new(candidate: Candidate, metrics: AnswerMetrics, sentiment_score: i64) -> Self {
        Self {
            answer_id: candidate.answer_id,
            question_id: candidate.question_id,
            owner_id: candidate.owner_id,
            question_title: candidate.question_title,
            question_relevance: candidate.question_relevance,
            metrics,
            sentiment_score,
        }
    }

    /// Relevance of this answer to the query: the parent question's
    /// relevance scaled by the constant answer-level multiplier.
    pub fn relevance(&self) -> f64 {
        self.question_relevance * ANSWER_RELEVANCE
    }
}
