//! Core data types shared by every stage of the similarity pipeline.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Type alias for document identifiers.
///
/// Identities are opaque to the engine: a database key, a file name, or any
/// other string the storage side hands over.
pub type DocumentId = String;

/// Normalized word tokens of one document, in source order.
pub type TokenSequence = Vec<String>;

/// Per-document term frequencies: occurrence count divided by token count.
///
/// Absent tokens are implicitly weighted 0. For a non-empty document the
/// weights sum to 1.0.
///
/// Sparse maps are ordered so every sum over them runs in the same order and
/// scores are reproducible bit for bit.
pub type TermFrequencies = BTreeMap<String, f64>;

/// Inverse document frequency weights for one corpus snapshot.
pub type IdfTable = BTreeMap<String, f64>;

/// Sparse TF-IDF weights of one document.
///
/// Only comparable against vectors built from the same [`IdfTable`].
pub type TfIdfVector = BTreeMap<String, f64>;

/// A stored document: identity plus raw text body.
///
/// Documents are immutable once ingested; the engine only reads them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Document {
  /// The identity the storage side knows this document by.
  pub id: DocumentId,
  /// The raw text body.
  pub text: String,
}

impl Document {
  /// Creates a new document.
  pub fn new(id: impl Into<DocumentId>, text: impl Into<String>) -> Self {
    Self {
      id: id.into(),
      text: text.into(),
    }
  }
}

/// One entry of a ranked match list.
///
/// Produced per request and never persisted by the engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchResult {
  /// The matched corpus document.
  pub document_id: DocumentId,
  /// Cosine similarity against the query, on the scale the caller chose.
  pub score: f64,
}

impl MatchResult {
  /// Creates a new match result.
  pub fn new(document_id: impl Into<DocumentId>, score: f64) -> Self {
    Self {
      document_id: document_id.into(),
      score,
    }
  }
}
