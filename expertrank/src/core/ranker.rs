//! The expert ranking pipeline

use std::collections::HashSet;
use std::sync::Arc;

use tokio_util::sync::CancellationToken;

use crate::config::ConfigError;
use crate::models::{AnswerId, AnswerMetrics, AnswerRecord, RankedExpert, RetrievalHit, UserId};
use crate::rating::RatingTranslator;
use crate::resolver::CandidateResolver;
use crate::retrieval::Retriever;
use crate::scoring::{CompositeScorer, ScoringConfig};
use crate::storage::{CandidateSource, SignalStore, UserDirectory};
use crate::{ExpertRankError, Result};

/// The primary interface for ranking contributors on a Q&A corpus.
///
/// `ExpertRanker` owns its collaborators and a validated scoring
/// configuration. Each call to [`rank`](Self::rank) processes one query as
/// an independent batch: concurrent calls share no mutable state, and
/// nothing is retried — a failed store read aborts the invocation so the
/// host never renders partial data.
pub struct ExpertRanker {
    /// Joins retrieval hits to creditable answers
    resolver: CandidateResolver,

    /// Per-answer engagement metrics and sentiment aggregates
    signals: Arc<dyn SignalStore>,

    /// Display names, for presentation only
    directory: Arc<dyn UserDirectory>,

    /// Composite per-answer scoring and per-user aggregation
    scorer: CompositeScorer,

    /// Percentile cutoff and star translation
    translator: RatingTranslator,
}

impl ExpertRanker {
    /// Create a ranker over the given collaborators.
    ///
    /// The configuration is validated here, once; the pipeline never reads
    /// ambient state afterwards.
    pub fn new(
        candidates: Arc<dyn CandidateSource>,
        signals: Arc<dyn SignalStore>,
        directory: Arc<dyn UserDirectory>,
        config: ScoringConfig,
    ) -> Result<Self> {
        let scorer =
            CompositeScorer::try_new(config.clone()).map_err(ConfigError::ValidationError)?;
        let translator =
            RatingTranslator::try_new(config).map_err(ConfigError::ValidationError)?;
        Ok(Self {
            resolver: CandidateResolver::new(candidates),
            signals,
            directory,
            scorer,
            translator,
        })
    }

    /// Rank the experts for one query's retrieval hits.
    pub async fn rank(&self, hits: &[RetrievalHit]) -> Result<Vec<RankedExpert>> {
        self.rank_with_cancellation(hits, &CancellationToken::new())
            .await
    }

    /// Retrieve and rank in one call: query the retrieval collaborator,
    /// then rank whatever it returns.
    pub async fn rank_query(
        &self,
        retriever: &dyn Retriever,
        text: &str,
        result_cutoff: f64,
    ) -> Result<Vec<RankedExpert>> {
        let hits = retriever.query(text, result_cutoff).await?;
        tracing::debug!(hits = hits.len(), "retrieval returned candidate questions");
        self.rank(&hits).await
    }

    /// Rank with an externally supplied cancellation signal.
    ///
    /// The token is checked between stages only, as a best-effort way to
    /// abandon work before issuing further reads; it does not interrupt a
    /// read already in flight.
    pub async fn rank_with_cancellation(
        &self,
        hits: &[RetrievalHit],
        cancel: &CancellationToken,
    ) -> Result<Vec<RankedExpert>> {
        ensure_live(cancel)?;
        let candidates = self.resolver.resolve(hits).await?;
        if candidates.is_empty() {
            tracing::debug!("no creditable candidates, returning empty expert list");
            return Ok(Vec::new());
        }

        ensure_live(cancel)?;
        let answer_ids: Vec<AnswerId> = candidates.iter().map(|c| c.answer_id).collect();
        let (metrics, sentiment) = futures::try_join!(
            self.signals.fetch_answer_metrics(&answer_ids),
            self.signals.fetch_sentiment(&answer_ids),
        )?;
        tracing::debug!(
            metrics = metrics.len(),
            sentiment = sentiment.len(),
            "fetched signals for candidate batch"
        );

        ensure_live(cancel)?;
        let records: Vec<AnswerRecord> = candidates
            .into_iter()
            .map(|candidate| {
                let answer_metrics = metrics
                    .get(&candidate.answer_id)
                    .copied()
                    .unwrap_or_else(AnswerMetrics::absent);
                let sentiment_score = sentiment.get(&candidate.answer_id).copied().unwrap_or(0);
                AnswerRecord::new(candidate, answer_metrics, sentiment_score)
            })
            .collect();

        let scored = self.scorer.score_batch(records);

        ensure_live(cancel)?;
        let mut user_ids: Vec<UserId> = Vec::new();
        let mut seen: HashSet<UserId> = HashSet::new();
        for answer in &scored {
            if seen.insert(answer.record.owner_id) {
                user_ids.push(answer.record.owner_id);
            }
        }
        let display_names = self.directory.display_names_for(&user_ids).await?;
        let aggregates = self.scorer.aggregate(&scored, &display_names);

        ensure_live(cancel)?;
        let experts = self.translator.rate(aggregates)?;
        tracing::debug!(experts = experts.len(), "ranking complete");
        Ok(experts)
    }
}

fn ensure_live(cancel: &CancellationToken) -> Result<()> {
    if cancel.is_cancelled() {
        return Err(ExpertRankError::Cancelled);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    use crate::storage::{
        AnswerRow, InMemoryQaStore, MockCandidateSource, MockSignalStore, MockUserDirectory,
        StoreError, StoredAnswer, StoredQuestion,
    };

    fn empty_store_ranker() -> ExpertRanker {
        let store = Arc::new(InMemoryQaStore::new());
        ExpertRanker::new(
            store.clone(),
            store.clone(),
            store,
            ScoringConfig::default(),
        )
        .unwrap()
    }

    #[test]
    fn test_new_rejects_invalid_config() {
        let store = Arc::new(InMemoryQaStore::new());
        let config = ScoringConfig {
            cutoff_percentile: 100.0,
            ..Default::default()
        };
        let result = ExpertRanker::new(store.clone(), store.clone(), store, config);
        assert!(matches!(result, Err(ExpertRankError::Config(_))));
    }

    #[tokio::test]
    async fn test_rank_empty_hits_short_circuits() {
        let ranker = empty_store_ranker();
        assert!(ranker.rank(&[]).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_rank_unmatched_hits_short_circuits() {
        let ranker = empty_store_ranker();
        let experts = ranker.rank(&[RetrievalHit::new(42, 0.9)]).await.unwrap();
        assert!(experts.is_empty());
    }

    #[tokio::test]
    async fn test_cancelled_token_aborts_before_any_read() {
        let mut candidates = MockCandidateSource::new();
        candidates.expect_answers_for_questions().never();

        let mut signals = MockSignalStore::new();
        signals.expect_fetch_answer_metrics().never();
        signals.expect_fetch_sentiment().never();

        let mut directory = MockUserDirectory::new();
        directory.expect_display_names_for().never();

        let ranker = ExpertRanker::new(
            Arc::new(candidates),
            Arc::new(signals),
            Arc::new(directory),
            ScoringConfig::default(),
        )
        .unwrap();

        let token = CancellationToken::new();
        token.cancel();
        let result = ranker
            .rank_with_cancellation(&[RetrievalHit::new(1, 0.9)], &token)
            .await;
        assert!(matches!(result, Err(ExpertRankError::Cancelled)));
    }

    #[tokio::test]
    async fn test_failed_signal_read_aborts_the_query() {
        let mut candidates = MockCandidateSource::new();
        candidates.expect_answers_for_questions().returning(|_| {
            Ok(vec![AnswerRow {
                answer_id: 10,
                question_id: 1,
                owner_user_id: Some(100),
                last_editor_user_id: None,
                question_title: None,
            }])
        });

        let mut signals = MockSignalStore::new();
        signals
            .expect_fetch_answer_metrics()
            .returning(|_| Err(StoreError::Connection("signal store unreachable".into())));
        signals
            .expect_fetch_sentiment()
            .returning(|_| Ok(HashMap::new()));

        let mut directory = MockUserDirectory::new();
        directory.expect_display_names_for().never();

        let ranker = ExpertRanker::new(
            Arc::new(candidates),
            Arc::new(signals),
            Arc::new(directory),
            ScoringConfig::default(),
        )
        .unwrap();

        let result = ranker.rank(&[RetrievalHit::new(1, 0.9)]).await;
        assert!(matches!(result, Err(ExpertRankError::Store(_))));
    }

    #[tokio::test]
    async fn test_rank_query_chains_retrieval() {
        let mut retriever = crate::retrieval::MockRetriever::new();
        retriever
            .expect_query()
            .returning(|_, _| Ok(vec![RetrievalHit::new(1, 0.8)]));

        let mut store = InMemoryQaStore::new();
        store.add_question(StoredQuestion::new(1, "only question"));
        store.add_answer(StoredAnswer::new(10, 1, 100).with_score(5));
        store.add_user(100, "astrid");
        let store = Arc::new(store);

        // Sole user ranks at percentile 0; keep everyone
        let config = ScoringConfig {
            cutoff_percentile: 0.0,
            ..Default::default()
        };
        let ranker =
            ExpertRanker::new(store.clone(), store.clone(), store, config).unwrap();

        let experts = ranker.rank_query(&retriever, "anything", 0.5).await.unwrap();
        assert_eq!(experts.len(), 1);
        assert_eq!(experts[0].display_name, "astrid");
    }
}
