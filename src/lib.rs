//! Docsim - TF-IDF document similarity.
//!
//! Docsim compares a submitted text document against a corpus of stored
//! documents. Every document is tokenized, weighted with term frequency and
//! smoothed inverse document frequency, and the query is ranked against the
//! corpus by cosine similarity.
//!
//! The pipeline is made of small pure stages that can be used on their own:
//!
//! - [`tokenizer`]: text to normalized tokens
//! - [`frequency`]: tokens to term frequencies
//! - [`corpus`]: corpus snapshots to IDF tables and document vectors
//! - [`vectorizer`]: term frequencies and IDF to TF-IDF vectors
//! - [`similarity`]: cosine similarity of two vectors
//! - [`ranker`]: deterministic top-K ranking
//!
//! [`engine::SimilarityEngine`] wires them together and produces a
//! [`report::ScanReport`].

pub mod types;
pub mod error;
pub mod tokenizer;
pub mod frequency;
pub mod corpus;
pub mod vectorizer;
pub mod similarity;
pub mod ranker;
pub mod cache;
pub mod store;
pub mod input;
pub mod options;
pub mod report;
pub mod engine;

pub mod prelude {
    //! Convenient re-exports for common types and traits.

    pub use crate::types::*;
    pub use crate::error::DocsimError;
    pub use crate::tokenizer::*;
    pub use crate::frequency::*;
    pub use crate::corpus::*;
    pub use crate::vectorizer::*;
    pub use crate::similarity::*;
    pub use crate::ranker::*;
    pub use crate::cache::*;
    pub use crate::store::*;
    pub use crate::input::*;
    pub use crate::options::*;
    pub use crate::report::*;
    pub use crate::engine::*;
}
