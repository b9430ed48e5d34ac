//! Pipeline orchestration
//!
//! This module provides the primary interface for ranking experts. It wires
//! the candidate resolver, the signal store reads, the composite scorer,
//! and the rating translator into one staged, per-query pipeline.

mod ranker;

pub use ranker::ExpertRanker;
