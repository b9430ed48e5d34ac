//! End-to-end tests for the ranking pipeline
//!
//! These drive the full pipeline against the in-memory store: candidate
//! resolution, signal reads, composite scoring, aggregation, and rating
//! translation, including the failure and cancellation paths.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;

use expertrank::prelude::*;
use expertrank::models::{AnswerId, AnswerMetrics};
use expertrank::storage::{StoreResult, StoredAnswer, StoredQuestion};

/// Three answers from two users across three retrieved questions:
/// an accepted, highly-engaged answer and a zero-score answer from user 1,
/// and a modest answer from user 2.
fn scenario_store() -> InMemoryQaStore {
    let mut store = InMemoryQaStore::new();

    store.add_question(
        StoredQuestion::new(1, "How do lifetimes work?")
            .with_accepted_answer(10)
            .with_favorites(5)
            .with_views(100),
    );
    store.add_question(StoredQuestion::new(2, "Why borrow twice?").with_views(10));
    store.add_question(StoredQuestion::new(3, "What is a trait object?"));

    store.add_answer(StoredAnswer::new(10, 1, 1).with_score(10));
    store.add_answer(StoredAnswer::new(20, 2, 2).with_score(2));
    store.add_answer(StoredAnswer::new(30, 3, 1).with_score(0));

    store.add_classified_comment(10, 1);
    store.add_classified_comment(10, 1);
    store.add_classified_comment(20, -1);

    store.add_user(1, "astrid");
    store.add_user(2, "bjorn");

    store
}

fn scenario_hits() -> Vec<RetrievalHit> {
    vec![
        RetrievalHit::new(1, 0.9),
        RetrievalHit::new(2, 0.5),
        RetrievalHit::new(3, 0.9),
    ]
}

fn ranker_with(store: InMemoryQaStore, config: ScoringConfig) -> ExpertRanker {
    let store = Arc::new(store);
    ExpertRanker::new(store.clone(), store.clone(), store, config).unwrap()
}

#[tokio::test]
async fn test_scenario_with_median_cutoff() {
    let ranker = ranker_with(scenario_store(), ScoringConfig::inclusive());
    let experts = ranker.rank(&scenario_hits()).await.unwrap();

    // Of two users, the lower total ranks at percentile 0 and is dropped
    assert_eq!(experts.len(), 1);

    let top = &experts[0];
    assert_eq!(top.user_id, 1);
    assert_eq!(top.display_name, "astrid");
    assert_eq!(top.contributing_answer_ids(), vec![10, 30]);
    assert_eq!(top.answer_count(), 2);
    assert_eq!(top.percentile_rank, 50.0);

    // Answer 10: effective 10 + 2*0.7 = 11.4 tops every metric population,
    // answer 30 contributes bare relevance
    let expected_a10: f64 = 0.9 * (1.0_f64 + 2.0 / 3.0).powi(3) * 1.5;
    let expected_total = expected_a10 + 0.9;
    assert!((top.total_score - expected_total).abs() < 1e-12);
    assert!((top.mean_relevance - 0.9).abs() < 1e-12);
}

#[tokio::test]
async fn test_scenario_with_zero_cutoff_keeps_both_users() {
    let config = ScoringConfig {
        cutoff_percentile: 0.0,
        ..Default::default()
    };
    let ranker = ranker_with(scenario_store(), config);
    let experts = ranker.rank(&scenario_hits()).await.unwrap();

    assert_eq!(experts.len(), 2);
    // Sorted by total score descending
    assert_eq!(experts[0].user_id, 1);
    assert_eq!(experts[1].user_id, 2);
    assert!(experts[0].total_score > experts[1].total_score);

    // Percentile 50 in 20-wide buckets lands on three stars; the floor
    // user gets none
    assert_eq!(experts[0].stars, 3);
    assert_eq!(experts[1].percentile_rank, 0.0);
    assert_eq!(experts[1].stars, 0);

    assert_eq!(experts[1].mean_relevance, 0.5);
    assert_eq!(experts[1].answer_count(), 1);
}

#[tokio::test]
async fn test_default_cutoff_can_empty_a_small_batch() {
    // With only two users the higher one ranks at percentile 50, below the
    // default 75 cutoff: nobody survives
    let ranker = ranker_with(scenario_store(), ScoringConfig::default());
    let experts = ranker.rank(&scenario_hits()).await.unwrap();
    assert!(experts.is_empty());
}

#[tokio::test]
async fn test_uncreditable_answers_never_surface() {
    let mut store = scenario_store();
    store.add_answer(StoredAnswer::ownerless(40, 1).with_score(1000));

    let config = ScoringConfig {
        cutoff_percentile: 0.0,
        ..Default::default()
    };
    let ranker = ranker_with(store, config);

    // Re-rank the same frozen corpus twice: the ownerless answer stays
    // excluded both times and never joins any aggregate
    for _ in 0..2 {
        let experts = ranker.rank(&scenario_hits()).await.unwrap();
        assert_eq!(experts.len(), 2);
        for expert in &experts {
            assert!(!expert.contributing_answer_ids().contains(&40));
        }
    }
}

#[tokio::test]
async fn test_ranking_a_frozen_corpus_is_deterministic() {
    let config = ScoringConfig {
        cutoff_percentile: 0.0,
        ..Default::default()
    };
    let ranker = ranker_with(scenario_store(), config);

    let first = ranker.rank(&scenario_hits()).await.unwrap();
    let second = ranker.rank(&scenario_hits()).await.unwrap();

    assert_eq!(first.len(), second.len());
    for (a, b) in first.iter().zip(second.iter()) {
        assert_eq!(a.user_id, b.user_id);
        assert_eq!(a.total_score.to_bits(), b.total_score.to_bits());
        assert_eq!(a.percentile_rank.to_bits(), b.percentile_rank.to_bits());
        assert_eq!(a.stars, b.stars);
    }
}

#[tokio::test]
async fn test_zero_relevance_user_scores_zero() {
    let mut store = InMemoryQaStore::new();
    store.add_question(
        StoredQuestion::new(1, "irrelevant but popular")
            .with_accepted_answer(10)
            .with_favorites(99)
            .with_views(100_000),
    );
    store.add_question(StoredQuestion::new(2, "relevant"));
    store.add_answer(StoredAnswer::new(10, 1, 1).with_score(500));
    store.add_answer(StoredAnswer::new(20, 2, 2).with_score(1));

    let config = ScoringConfig {
        cutoff_percentile: 0.0,
        ..Default::default()
    };
    let ranker = ranker_with(store, config);
    let experts = ranker
        .rank(&[RetrievalHit::new(1, 0.0), RetrievalHit::new(2, 0.4)])
        .await
        .unwrap();

    let zeroed = experts.iter().find(|e| e.user_id == 1).unwrap();
    assert_eq!(zeroed.total_score, 0.0);
    // Engagement cannot rescue a zero-relevance contribution
    assert_eq!(experts[0].user_id, 2);
}

#[tokio::test]
async fn test_cancellation_between_stages() {
    let ranker = ranker_with(scenario_store(), ScoringConfig::default());
    let token = CancellationToken::new();
    token.cancel();

    let result = ranker
        .rank_with_cancellation(&scenario_hits(), &token)
        .await;
    assert!(matches!(result, Err(ExpertRankError::Cancelled)));
}

/// A signal store whose reads always fail
#[derive(Debug)]
struct UnreachableSignals;

#[async_trait]
impl SignalStore for UnreachableSignals {
    async fn fetch_answer_metrics(
        &self,
        _answer_ids: &[AnswerId],
    ) -> StoreResult<HashMap<AnswerId, AnswerMetrics>> {
        Err(StoreError::Connection("signal store unreachable".into()))
    }

    async fn fetch_sentiment(
        &self,
        _answer_ids: &[AnswerId],
    ) -> StoreResult<HashMap<AnswerId, i64>> {
        Err(StoreError::Connection("signal store unreachable".into()))
    }
}

#[tokio::test]
async fn test_failed_signal_read_surfaces_instead_of_partial_data() {
    let corpus = Arc::new(scenario_store());
    let ranker = ExpertRanker::new(
        corpus.clone(),
        Arc::new(UnreachableSignals),
        corpus,
        ScoringConfig::default(),
    )
    .unwrap();

    let result = ranker.rank(&scenario_hits()).await;
    assert!(matches!(result, Err(ExpertRankError::Store(_))));
}

/// A retrieval collaborator returning a fixed hit list
struct FixedRetriever {
    hits: Vec<RetrievalHit>,
}

#[async_trait]
impl Retriever for FixedRetriever {
    async fn query(&self, _text: &str, cutoff: f64) -> expertrank::Result<Vec<RetrievalHit>> {
        Ok(self
            .hits
            .iter()
            .copied()
            .filter(|hit| hit.relevance >= cutoff)
            .collect())
    }
}

#[tokio::test]
async fn test_rank_query_applies_the_retrieval_cutoff() {
    let config = ScoringConfig {
        cutoff_percentile: 0.0,
        ..Default::default()
    };
    let ranker = ranker_with(scenario_store(), config);
    let retriever = FixedRetriever {
        hits: scenario_hits(),
    };

    // Cutoff 0.6 drops question 2, so user 2 never enters the batch
    let experts = ranker
        .rank_query(&retriever, "lifetimes and traits", 0.6)
        .await
        .unwrap();

    assert_eq!(experts.len(), 1);
    assert_eq!(experts[0].user_id, 1);
}
