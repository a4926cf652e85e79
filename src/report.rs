//! The result contract handed back to callers of a scan.

use crate::input::DocumentKind;
use crate::types::{DocumentId, MatchResult, TermFrequencies, TokenSequence};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use unicode_segmentation::UnicodeSegmentation;

/// Sentinel reported as `best_match_document_id` when nothing matched.
pub const NO_MATCH: &str = "No Match Found";

/// Outcome of a scan.
///
/// Every variant is a valid result; none of them is a failure of the engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "code", rename_all = "snake_case")]
pub enum ScanStatus {
  /// The query was tokenized, vectorized and scored.
  Analyzed,
  /// The query has no tokens after normalization; every score is 0.
  EmptyDocument,
  /// The corpus has no documents to compare against.
  EmptyCorpus,
  /// The query content could not be decoded; the pipeline was skipped.
  UnreadableInput {
    /// Why decoding failed.
    reason: String,
  },
}

impl ScanStatus {
  /// A human-readable description of the status.
  pub fn message(&self) -> String {
    match self {
      Self::Analyzed => "Text content extracted, preprocessed and matched (TF-IDF cosine)".to_string(),
      Self::EmptyDocument => "Document contains no recognizable words".to_string(),
      Self::EmptyCorpus => "No stored documents to compare against".to_string(),
      Self::UnreadableInput { reason } => format!("Error: {reason}"),
    }
  }
}

/// The result of comparing one query document against a corpus snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScanReport {
  /// Outcome of the scan.
  pub status: ScanStatus,
  /// Human-readable form of `status`.
  pub processing_status: String,
  /// Label of the query's [`DocumentKind`].
  pub document_type: String,
  /// File name or id of the query, when it has one.
  pub filename: Option<DocumentId>,
  /// Leading part of the query text.
  pub content_snippet: String,
  /// Token sequence of the query.
  pub preprocessed_words: TokenSequence,
  /// Term frequencies of the query.
  pub term_frequencies: TermFrequencies,
  /// Similarity of the query to every candidate corpus document.
  pub document_similarities: BTreeMap<DocumentId, f64>,
  /// Ranked matches, best first, capped at the requested limit.
  pub matches: Vec<MatchResult>,
  /// Top match, or [`NO_MATCH`].
  pub best_match_document_id: String,
  /// Score of the top match, or 0.
  pub best_match_similarity_score: f64,
  /// Version of the corpus snapshot the scan ran against.
  pub corpus_version: u64,
}

impl ScanReport {
  /// A report with every numeric field empty or zero.
  pub fn empty(status: ScanStatus, corpus_version: u64) -> Self {
    Self {
      processing_status: status.message(),
      status,
      document_type: DocumentKind::Text.label().to_string(),
      filename: None,
      content_snippet: String::new(),
      preprocessed_words: Vec::new(),
      term_frequencies: TermFrequencies::new(),
      document_similarities: BTreeMap::new(),
      matches: Vec::new(),
      best_match_document_id: NO_MATCH.to_string(),
      best_match_similarity_score: 0.0,
      corpus_version,
    }
  }

  /// Whether the scan found a document with a positive score.
  pub fn has_match(&self) -> bool {
    self.best_match_document_id != NO_MATCH
  }
}

/// The first `max` grapheme clusters of `text`, with `"..."` appended when
/// anything was cut.
pub fn snippet(text: &str, max: usize) -> String {
  let mut graphemes = text.graphemes(true);
  let head: String = graphemes.by_ref().take(max).collect();
  if graphemes.next().is_some() {
    format!("{head}...")
  } else {
    head
  }
}
