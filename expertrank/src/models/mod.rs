//! Typed records flowing through the ranking pipeline
//!
//! Every query produces a disposable batch of these records; none of them
//! are persisted, and none are mutated outside the stage that produces them.

mod answer;
mod expert;

pub use answer::{
    resolve_credited_user, AnswerId, AnswerMetrics, AnswerRecord, Candidate, QuestionId,
    RetrievalHit, UserId, ANSWER_RELEVANCE,
};
pub use expert::{ContributionDetail, RankedExpert, UserAggregate};
