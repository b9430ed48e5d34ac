//! In-memory corpus store
//!
//! Implements every collaborator trait over an in-process snapshot of a Q&A
//! corpus. Backs the test suite and the benches, and is usable directly by
//! embedded hosts that already hold their corpus in memory.
//!
//! Answer metrics follow the corpus join semantics: an answer inherits the
//! favorite and view counts of its parent question, its accepted flag comes
//! from the parent's accepted-answer id, and its age is measured in days
//! against the store's snapshot instant.

use std::collections::{HashMap, HashSet};

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::models::{AnswerId, AnswerMetrics, QuestionId, UserId};
use crate::storage::errors::StoreResult;
use crate::storage::traits::{AnswerRow, CandidateSource, SignalStore, UserDirectory};
use crate::storage::{id_chunks, MAX_IDS_PER_READ};

/// A question post held by the in-memory store
#[derive(Debug, Clone, PartialEq)]
pub struct StoredQuestion {
    /// Question id
    pub question_id: QuestionId,

    /// Question title
    pub title: String,

    /// Id of the accepted answer, if the asker accepted one
    pub accepted_answer_id: Option<AnswerId>,

    /// Favorite count; `None` when the corpus has no value
    pub favorites: Option<i64>,

    /// View count; `None` when the corpus has no value
    pub views: Option<i64>,
}

impl StoredQuestion {
    /// Create a question with no engagement counts
    pub fn new(question_id: QuestionId, title: impl Into<String>) -> Self {
        Self {
            question_id,
            title: title.into(),
            accepted_answer_id: None,
            favorites: None,
            views: None,
        }
    }

    /// Set the accepted answer
    pub fn with_accepted_answer(mut self, answer_id: AnswerId) -> Self {
        self.accepted_answer_id = Some(answer_id);
        self
    }

    /// Set the favorite count
    pub fn with_favorites(mut self, favorites: i64) -> Self {
        self.favorites = Some(favorites);
        self
    }

    /// Set the view count
    pub fn with_views(mut self, views: i64) -> Self {
        self.views = Some(views);
        self
    }
}

/// An answer post held by the in-memory store
#[derive(Debug, Clone, PartialEq)]
pub struct StoredAnswer {
    /// Answer id
    pub answer_id: AnswerId,

    /// Parent question id
    pub question_id: QuestionId,

    /// Owning user, if the corpus records one
    pub owner_user_id: Option<UserId>,

    /// Last editing user, if the corpus records one
    pub last_editor_user_id: Option<UserId>,

    /// When the answer was posted
    pub created_at: DateTime<Utc>,

    /// Raw vote score
    pub score: i64,
}

impl StoredAnswer {
    /// Create an answer owned by `owner_user_id`
    pub fn new(answer_id: AnswerId, question_id: QuestionId, owner_user_id: UserId) -> Self {
        Self {
            answer_id,
            question_id,
            owner_user_id: Some(owner_user_id),
            last_editor_user_id: None,
            created_at: Utc::now(),
            score: 0,
        }
    }

    /// Create an answer with no recorded owner
    pub fn ownerless(answer_id: AnswerId, question_id: QuestionId) -> Self {
        Self {
            answer_id,
            question_id,
            owner_user_id: None,
            last_editor_user_id: None,
            created_at: Utc::now(),
            score: 0,
        }
    }

    /// Set the last editor
    pub fn with_last_editor(mut self, user_id: UserId) -> Self {
        self.last_editor_user_id = Some(user_id);
        self
    }

    /// Set the creation instant
    pub fn with_created_at(mut self, created_at: DateTime<Utc>) -> Self {
        self.created_at = created_at;
        self
    }

    /// Set the raw vote score
    pub fn with_score(mut self, score: i64) -> Self {
        self.score = score;
        self
    }
}

/// In-memory implementation of every collaborator store trait
#[derive(Debug, Clone)]
pub struct InMemoryQaStore {
    questions: HashMap<QuestionId, StoredQuestion>,
    // Insertion order is the join order candidate resolution observes
    answers: Vec<StoredAnswer>,
    answer_index: HashMap<AnswerId, usize>,
    sentiment: HashMap<AnswerId, i64>,
    display_names: HashMap<UserId, String>,
    snapshot_time: DateTime<Utc>,
}

impl InMemoryQaStore {
    /// Create an empty store with the current instant as its snapshot time
    pub fn new() -> Self {
        Self {
            questions: HashMap::new(),
            answers: Vec::new(),
            answer_index: HashMap::new(),
            sentiment: HashMap::new(),
            display_names: HashMap::new(),
            snapshot_time: Utc::now(),
        }
    }

    /// Pin the instant answer ages are measured against
    pub fn with_snapshot_time(mut self, snapshot_time: DateTime<Utc>) -> Self {
        self.snapshot_time = snapshot_time;
        self
    }

    /// Add a question to the corpus
    pub fn add_question(&mut self, question: StoredQuestion) {
        self.questions.insert(question.question_id, question);
    }

    /// Add an answer to the corpus
    pub fn add_answer(&mut self, answer: StoredAnswer) {
        self.answer_index.insert(answer.answer_id, self.answers.len());
        self.answers.push(answer);
    }

    /// Record one classified comment on an answer; polarities sum per answer
    pub fn add_classified_comment(&mut self, answer_id: AnswerId, polarity: i64) {
        *self.sentiment.entry(answer_id).or_insert(0) += polarity;
    }

    /// Register a contributor's display name
    pub fn add_user(&mut self, user_id: UserId, display_name: impl Into<String>) {
        self.display_names.insert(user_id, display_name.into());
    }

    fn metrics_for(&self, answer: &StoredAnswer) -> AnswerMetrics {
        let question = self.questions.get(&answer.question_id);
        AnswerMetrics {
            age_days: (self.snapshot_time - answer.created_at).num_days(),
            raw_score: answer.score,
            favorites: question.and_then(|q| q.favorites).unwrap_or(0),
            views: question.and_then(|q| q.views).unwrap_or(0),
            accepted: question
                .and_then(|q| q.accepted_answer_id)
                .is_some_and(|accepted| accepted == answer.answer_id),
        }
    }
}

impl Default for InMemoryQaStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl SignalStore for InMemoryQaStore {
    async fn fetch_answer_metrics(
        &self,
        answer_ids: &[AnswerId],
    ) -> StoreResult<HashMap<AnswerId, AnswerMetrics>> {
        let mut metrics = HashMap::with_capacity(answer_ids.len());
        for chunk in id_chunks(answer_ids, MAX_IDS_PER_READ) {
            for answer_id in chunk {
                if let Some(&position) = self.answer_index.get(answer_id) {
                    metrics.insert(*answer_id, self.metrics_for(&self.answers[position]));
                }
            }
        }
        Ok(metrics)
    }

    async fn fetch_sentiment(
        &self,
        answer_ids: &[AnswerId],
    ) -> StoreResult<HashMap<AnswerId, i64>> {
        let mut sentiment = HashMap::new();
        for chunk in id_chunks(answer_ids, MAX_IDS_PER_READ) {
            for answer_id in chunk {
                if let Some(&sum) = self.sentiment.get(answer_id) {
                    sentiment.insert(*answer_id, sum);
                }
            }
        }
        Ok(sentiment)
    }
}

#[async_trait]
impl CandidateSource for InMemoryQaStore {
    async fn answers_for_questions(
        &self,
        question_ids: &[QuestionId],
    ) -> StoreResult<Vec<AnswerRow>> {
        let wanted: HashSet<QuestionId> = question_ids.iter().copied().collect();
        Ok(self
            .answers
            .iter()
            .filter(|answer| wanted.contains(&answer.question_id))
            .map(|answer| AnswerRow {
                answer_id: answer.answer_id,
                question_id: answer.question_id,
                owner_user_id: answer.owner_user_id,
                last_editor_user_id: answer.last_editor_user_id,
                question_title: self
                    .questions
                    .get(&answer.question_id)
                    .map(|q| q.title.clone()),
            })
            .collect())
    }
}

#[async_trait]
impl UserDirectory for InMemoryQaStore {
    async fn display_names_for(
        &self,
        user_ids: &[UserId],
    ) -> StoreResult<HashMap<UserId, String>> {
        Ok(user_ids
            .iter()
            .filter_map(|user_id| {
                self.display_names
                    .get(user_id)
                    .map(|name| (*user_id, name.clone()))
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn snapshot() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2012, 8, 5, 12, 0, 0).unwrap()
    }

    fn populated_store() -> InMemoryQaStore {
        let mut store = InMemoryQaStore::new().with_snapshot_time(snapshot());
        store.add_question(
            StoredQuestion::new(1, "How do I parse TOML?")
                .with_accepted_answer(10)
                .with_favorites(4)
                .with_views(250),
        );
        store.add_question(StoredQuestion::new(2, "Why is my join slow?"));
        store.add_answer(
            StoredAnswer::new(10, 1, 100)
                .with_score(12)
                .with_created_at(snapshot() - chrono::Duration::days(30)),
        );
        store.add_answer(StoredAnswer::new(11, 1, 101).with_score(3));
        store.add_answer(StoredAnswer::ownerless(20, 2).with_last_editor(102));
        store.add_classified_comment(10, 1);
        store.add_classified_comment(10, 1);
        store.add_classified_comment(11, -1);
        store.add_user(100, "astrid");
        store.add_user(101, "bjorn");
        store
    }

    #[tokio::test]
    async fn test_metrics_inherit_question_counts() {
        let store = populated_store();
        let metrics = store.fetch_answer_metrics(&[10]).await.unwrap();

        let m = metrics[&10];
        assert_eq!(m.age_days, 30);
        assert_eq!(m.raw_score, 12);
        assert_eq!(m.favorites, 4);
        assert_eq!(m.views, 250);
        assert!(m.accepted);
    }

    #[tokio::test]
    async fn test_metrics_default_missing_counts_to_zero() {
        let store = populated_store();
        let metrics = store.fetch_answer_metrics(&[20]).await.unwrap();

        let m = metrics[&20];
        assert_eq!(m.favorites, 0);
        assert_eq!(m.views, 0);
        assert!(!m.accepted);
    }

    #[tokio::test]
    async fn test_metrics_skip_unknown_answers() {
        let store = populated_store();
        let metrics = store.fetch_answer_metrics(&[10, 999]).await.unwrap();
        assert_eq!(metrics.len(), 1);
        assert!(!metrics.contains_key(&999));
    }

    #[tokio::test]
    async fn test_empty_id_collections_return_empty_maps() {
        let store = populated_store();
        assert!(store.fetch_answer_metrics(&[]).await.unwrap().is_empty());
        assert!(store.fetch_sentiment(&[]).await.unwrap().is_empty());
        assert!(store.display_names_for(&[]).await.unwrap().is_empty());
        assert!(store.answers_for_questions(&[]).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_sentiment_sums_per_answer() {
        let store = populated_store();
        let sentiment = store.fetch_sentiment(&[10, 11, 20]).await.unwrap();
        assert_eq!(sentiment.get(&10), Some(&2));
        assert_eq!(sentiment.get(&11), Some(&-1));
        // No classified comments: absent, defaulted at the call site
        assert_eq!(sentiment.get(&20), None);
    }

    #[tokio::test]
    async fn test_answers_come_back_in_insertion_order() {
        let store = populated_store();
        let rows = store.answers_for_questions(&[2, 1]).await.unwrap();
        let ids: Vec<_> = rows.iter().map(|r| r.answer_id).collect();
        assert_eq!(ids, vec![10, 11, 20]);
        assert_eq!(rows[0].question_title.as_deref(), Some("How do I parse TOML?"));
        assert_eq!(rows[2].owner_user_id, None);
        assert_eq!(rows[2].last_editor_user_id, Some(102));
    }

    #[tokio::test]
    async fn test_display_names_skip_unknown_users() {
        let store = populated_store();
        let names = store.display_names_for(&[100, 999]).await.unwrap();
        assert_eq!(names.get(&100).map(String::as_str), Some("astrid"));
        assert!(!names.contains_key(&999));
    }
}
