//! Trait definitions for the collaborator stores the pipeline reads from
//!
//! The pipeline issues a small, bounded number of batched reads per query.
//! All operations here are read-only: implementations must not mutate the
//! corpus on behalf of this crate.

use std::collections::HashMap;

use async_trait::async_trait;

use crate::models::{AnswerId, AnswerMetrics, QuestionId, UserId};
use crate::storage::errors::StoreResult;

/// One answer row as produced by the question/answer join, before credit
/// resolution
#[derive(Debug, Clone, PartialEq)]
pub struct AnswerRow {
    /// The answer post
    pub answer_id: AnswerId,

    /// Parent question of the answer
    pub question_id: QuestionId,

    /// The answer's owner, if the corpus records one
    pub owner_user_id: Option<UserId>,

    /// The answer's last editor, if the corpus records one
    pub last_editor_user_id: Option<UserId>,

    /// Title of the parent question
    pub question_title: Option<String>,
}

/// Read-only access to per-answer engagement metrics and sentiment
/// aggregates.
///
/// Both operations accept an unordered id collection and tolerate an empty
/// one by returning an empty mapping — never an error. Implementations
/// backed by stores with a practical IN-list limit must chunk internally
/// (see [`id_chunks`](crate::storage::id_chunks)).
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SignalStore: Send + Sync {
    /// Fetch engagement metrics for the given answers.
    ///
    /// Answers with no backing row are simply absent from the result;
    /// within a returned row, missing numeric fields resolve to 0 and a
    /// missing accepted flag to `false`.
    async fn fetch_answer_metrics(
        &self,
        answer_ids: &[AnswerId],
    ) -> StoreResult<HashMap<AnswerId, AnswerMetrics>>;

    /// Fetch the summed classified-comment polarity for the given answers.
    ///
    /// Answers with no classified comments are absent from the result and
    /// default to 0 at the call site.
    async fn fetch_sentiment(
        &self,
        answer_ids: &[AnswerId],
    ) -> StoreResult<HashMap<AnswerId, i64>>;
}

/// Read-only access to the answers of a set of questions
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CandidateSource: Send + Sync {
    /// Return every answer whose parent question is in `question_ids`,
    /// in the underlying join's insertion order. The order is not sorted
    /// by any score.
    async fn answers_for_questions(
        &self,
        question_ids: &[QuestionId],
    ) -> StoreResult<Vec<AnswerRow>>;
}

/// Read-only access to contributor display names. Used for presentation
/// only, never for scoring.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserDirectory: Send + Sync {
    /// Resolve display names for the given users. Unknown users are absent
    /// from the result.
    async fn display_names_for(
        &self,
        user_ids: &[UserId],
    ) -> StoreResult<HashMap<UserId, String>>;
}
