//! # Expertrank
//!
//! Contributor ranking core for Q&A corpora: given the semantically relevant
//! questions for a free-text query, it resolves their answers and authors,
//! combines heterogeneous quality signals (votes, favorites, views,
//! acceptance, comment sentiment) into one composite score per answer,
//! rolls scores up per contributor, and converts the rollups into a
//! percentile-cut, star-rated expert list.
//!
//! Retrieval, sentiment classification, and the storage engine are external
//! collaborators reached through traits; this crate owns the scoring and
//! aggregation pipeline only, and is meant to be embedded in-process by a
//! request-serving host.
//!
//! ## Quick Start
//!
//! ```no_run
//! use std::sync::Arc;
//! use expertrank::prelude::*;
//!
//! #[tokio::main]
//! async fn main() -> expertrank::Result<()> {
//!     // Any backing store works; the bundled in-memory store is handy for
//!     // tests and embedded hosts.
//!     let store = Arc::new(InMemoryQaStore::new());
//!
//!     let ranker = ExpertRanker::new(
//!         store.clone(),
//!         store.clone(),
//!         store,
//!         ScoringConfig::default(),
//!     )?;
//!
//!     // Retrieval output for one query: (question id, relevance).
//!     let hits = vec![
//!         RetrievalHit::new(11, 0.9),
//!         RetrievalHit::new(12, 0.5),
//!     ];
//!
//!     for expert in ranker.rank(&hits).await? {
//!         println!(
//!             "{} ({} answers): {} stars",
//!             expert.display_name,
//!             expert.answer_count(),
//!             expert.stars
//!         );
//!     }
//!
//!     Ok(())
//! }
//! ```
//!
//! ## Architecture
//!
//! - **Candidate resolution**: retrieval hits are joined to their answers,
//!   crediting each answer to its owner or, failing that, its last editor.
//! - **Composite scoring**: engagement signals are percentile-normalized
//!   against the batch and combined multiplicatively with relevance.
//! - **Rating translation**: a second percentile pass over the per-user
//!   totals drives the cutoff filter and the star rating.
//!
//! Every query is an independent, disposable batch; nothing is persisted.

pub mod config;
pub mod core;
pub mod logging;
pub mod models;
pub mod rating;
pub mod resolver;
pub mod retrieval;
pub mod scoring;
pub mod storage;

/// The prelude re-exports commonly used types for convenience
pub mod prelude {
    // Re-export the orchestrator
    pub use crate::core::ExpertRanker;

    // Re-export config types
    pub use crate::config::{
        ConfigLoader, ExpertRankConfig, LogFormat, LogLevel, LoggingConfig,
    };

    // Re-export model types
    pub use crate::models::{
        AnswerMetrics, AnswerRecord, ContributionDetail, RankedExpert, RetrievalHit,
        UserAggregate,
    };

    // Re-export scoring types
    pub use crate::scoring::{CompositeScorer, ScoringConfig, TiePolicy};

    // Re-export the rating translator
    pub use crate::rating::RatingTranslator;

    // Re-export collaborator boundaries
    pub use crate::retrieval::Retriever;
    pub use crate::storage::{
        CandidateSource, InMemoryQaStore, SignalStore, StoreError, UserDirectory,
    };

    // Re-export essential result type
    pub use crate::{ExpertRankError, Result};
}

/// Current library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Error type for expertrank operations
#[derive(Debug, thiserror::Error)]
pub enum ExpertRankError {
    /// A batched read against a backing store failed. Never retried by the
    /// pipeline; the host should render an empty expert list with an error
    /// indicator rather than partial data.
    #[error("store read failed: {0}")]
    Store(#[from] storage::StoreError),

    /// Configuration was rejected at construction time
    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    /// Logging error
    #[error("Logging error: {0}")]
    Logging(#[from] logging::LogError),

    /// Percentile rank was requested over an empty population. This is a
    /// contract violation: callers must short-circuit empty batches before
    /// normalizing, and `ExpertRanker::rank` does.
    #[error("percentile rank requested over an empty population")]
    EmptyPopulation,

    /// The invocation was cancelled between pipeline stages
    #[error("ranking cancelled before completion")]
    Cancelled,
}

/// Result type for expertrank operations
pub type Result<T> = std::result::Result<T, ExpertRankError>;
