//! Retrieval collaborator boundary
//!
//! Semantic retrieval (topic/similarity modeling) lives outside this crate.
//! The pipeline only depends on this trait: given a query, return candidate
//! questions with similarity scores.

use async_trait::async_trait;

use crate::models::RetrievalHit;
use crate::Result;

/// A semantic retrieval collaborator over the question corpus
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Retriever: Send + Sync {
    /// Retrieve questions relevant to `text`, sorted by relevance
    /// descending.
    ///
    /// Implementations exclude questions whose relevance falls below
    /// `cutoff` as well as closed questions.
    async fn query(&self, text: &str, cutoff: f64) -> Result<Vec<RetrievalHit>>;
}
