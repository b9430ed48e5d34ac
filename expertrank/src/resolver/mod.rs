//! Candidate resolution: from retrieval hits to creditable answers
//!
//! Joins the retrieval result to its answers and decides, per answer, which
//! user the answer is credited to. Answers that cannot be credited to
//! anyone (no owner and no last editor) are skipped here and never enter
//! scoring.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use crate::models::{resolve_credited_user, Candidate, QuestionId, RetrievalHit};
use crate::storage::CandidateSource;
use crate::Result;

/// Resolves retrieval hits into scoring candidates
pub struct CandidateResolver {
    source: Arc<dyn CandidateSource>,
}

impl CandidateResolver {
    /// Create a resolver over the given answer source
    pub fn new(source: Arc<dyn CandidateSource>) -> Self {
        Self { source }
    }

    /// Resolve one query's retrieval hits into candidates.
    ///
    /// Produces one candidate per answer whose parent question was
    /// retrieved, carrying the parent question's relevance. Output order is
    /// the underlying join's insertion order, not sorted by any score.
    /// Duplicate hits for the same question collapse to one lookup.
    pub async fn resolve(&self, hits: &[RetrievalHit]) -> Result<Vec<Candidate>> {
        if hits.is_empty() {
            return Ok(Vec::new());
        }

        let mut relevance: HashMap<QuestionId, f64> = HashMap::with_capacity(hits.len());
        let mut question_ids: Vec<QuestionId> = Vec::with_capacity(hits.len());
        let mut seen: HashSet<QuestionId> = HashSet::with_capacity(hits.len());
        for hit in hits {
            relevance.insert(hit.question_id, hit.relevance);
            if seen.insert(hit.question_id) {
                question_ids.push(hit.question_id);
            }
        }

        let rows = self.source.answers_for_questions(&question_ids).await?;

        let mut candidates = Vec::with_capacity(rows.len());
        let mut skipped = 0usize;
        for row in rows {
            let Some(owner_id) =
                resolve_credited_user(row.owner_user_id, row.last_editor_user_id)
            else {
                skipped += 1;
                continue;
            };
            let Some(&question_relevance) = relevance.get(&row.question_id) else {
                continue;
            };
            candidates.push(Candidate {
                answer_id: row.answer_id,
                question_id: row.question_id,
                owner_id,
                question_title: row.question_title,
                question_relevance,
            });
        }

        tracing::debug!(
            candidates = candidates.len(),
            skipped_uncreditable = skipped,
            "resolved retrieval hits into candidates"
        );

        Ok(candidates)
    }
}
