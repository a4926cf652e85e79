//! The similarity engine that runs a query through the whole pipeline.

use crate::cache::IndexCache;
use crate::corpus::{CorpusIndex, CorpusSnapshot};
use crate::error::Result;
use crate::frequency::term_frequencies;
use crate::input::{DocumentKind, QueryDocument};
use crate::options::{ScanOptions, ScoreScale};
use crate::ranker::{best_match, score_all, sort_matches};
use crate::report::{snippet, ScanReport, ScanStatus, NO_MATCH};
use crate::store::DocumentStore;
use crate::tokenizer::tokenize;
use crate::types::MatchResult;
use crate::vectorizer::vectorize;
use std::collections::BTreeMap;
use std::sync::Arc;

/// Compares query documents against corpus snapshots.
///
/// A scan is a pure computation over one snapshot: the query is tokenized,
/// the snapshot's IDF table and document vectors are obtained (from the
/// cache, or built from scratch), and every candidate is scored and ranked.
/// The result is identical whether or not the cache is used.
///
/// Create a `SimilarityEngine` using the [`SimilarityEngineBuilder`].
///
/// # Examples
///
/// ```rust
/// use docsim::prelude::*;
///
/// let corpus = CorpusSnapshot::new(1, vec![
///     Document::new("doc_1", "the cat sat"),
///     Document::new("doc_2", "the dog sat"),
/// ]);
///
/// let engine = SimilarityEngine::builder().limit(1).build();
/// let report = engine.scan(&corpus, &QueryDocument::new("the cat sat on the mat"));
///
/// assert_eq!(report.best_match_document_id, "doc_1");
/// assert_eq!(report.matches.len(), 1);
/// ```
#[derive(Debug, Default)]
pub struct SimilarityEngine {
  options: ScanOptions,
  cache: IndexCache,
}

impl SimilarityEngine {
  /// Creates a new `SimilarityEngineBuilder` to construct an engine.
  pub fn builder() -> SimilarityEngineBuilder {
    SimilarityEngineBuilder::new()
  }

  /// Creates an engine with the given options.
  pub fn new(options: ScanOptions) -> Self {
    Self {
      options,
      cache: IndexCache::new(),
    }
  }

  /// The options this engine scans with.
  pub fn options(&self) -> &ScanOptions {
    &self.options
  }

  /// Returns the corpus index for `snapshot`.
  ///
  /// With caching enabled the index is memoized by snapshot fingerprint;
  /// otherwise it is rebuilt on every call.
  pub fn index_for(&self, snapshot: &CorpusSnapshot) -> Arc<CorpusIndex> {
    if self.options.cache {
      self.cache.get_or_build(snapshot)
    } else {
      Arc::new(CorpusIndex::build(snapshot))
    }
  }

  /// Compares `query` against every document of `snapshot`.
  ///
  /// The query's own stored copy (`query.id`) is left out of the results.
  /// Degenerate inputs are reported through [`ScanReport::status`].
  pub fn scan(&self, snapshot: &CorpusSnapshot, query: &QueryDocument) -> ScanReport {
    let scale = self.options.scale;
    let tokens = tokenize(&query.text);
    let tf = term_frequencies(&tokens);

    let index = self.index_for(snapshot);
    let query_vector = vectorize(&tf, index.idf());

    let mut scored = score_all(&query_vector, index.vectors(), query.id.as_deref());
    let document_similarities: BTreeMap<_, _> = scored
      .iter()
      .map(|m| (m.document_id.clone(), scale.apply(m.score)))
      .collect();

    let candidates = scored.len();
    sort_matches(&mut scored);
    scored.truncate(self.options.limit);

    let (best_id, best_score) = match best_match(&scored) {
      Some(best) => (best.document_id.clone(), scale.apply(best.score)),
      None => (NO_MATCH.to_string(), 0.0),
    };

    let status = if snapshot.is_empty() {
      ScanStatus::EmptyCorpus
    } else if tokens.is_empty() {
      ScanStatus::EmptyDocument
    } else {
      ScanStatus::Analyzed
    };

    if status != ScanStatus::Analyzed {
      tracing::debug!(?status, version = snapshot.version(), "degenerate scan");
    }
    tracing::info!(
      version = snapshot.version(),
      candidates,
      best_match = %best_id,
      score = best_score,
      "scan finished"
    );

    ScanReport {
      processing_status: status.message(),
      status,
      document_type: DocumentKind::Text.label().to_string(),
      filename: query.id.clone(),
      content_snippet: snippet(&query.text, self.options.snippet_chars),
      preprocessed_words: tokens,
      term_frequencies: tf,
      document_similarities,
      matches: scale_matches(scored, scale),
      best_match_document_id: best_id,
      best_match_similarity_score: best_score,
      corpus_version: snapshot.version(),
    }
  }

  /// Decodes `bytes` as the query text and scans it.
  ///
  /// Undecodable content yields an [`ScanStatus::UnreadableInput`] report
  /// with every numeric field empty or zero.
  pub fn scan_bytes(&self, snapshot: &CorpusSnapshot, id: Option<&str>, bytes: Vec<u8>) -> ScanReport {
    match QueryDocument::from_bytes(bytes) {
      Ok(query) => {
        let query = match id {
          Some(id) => query.with_id(id),
          None => query,
        };
        self.scan(snapshot, &query)
      }
      Err(err) => {
        tracing::warn!(error = %err, "query content is unreadable");
        let mut report = ScanReport::empty(
          ScanStatus::UnreadableInput {
            reason: err.to_string(),
          },
          snapshot.version(),
        );
        report.filename = id.map(str::to_string);
        report
      }
    }
  }

  /// Reads one snapshot from `store` and scans `query` against it.
  ///
  /// # Errors
  ///
  /// Propagates the store's error when the corpus cannot be read; the scan
  /// is unavailable in that case.
  pub fn scan_store<S>(&self, store: &S, query: &QueryDocument) -> Result<ScanReport>
  where
    S: DocumentStore + ?Sized,
  {
    let snapshot = store.snapshot().inspect_err(|err| {
      tracing::warn!(error = %err, "corpus unavailable");
    })?;
    Ok(self.scan(&snapshot, query))
  }
}

fn scale_matches(matches: Vec<MatchResult>, scale: ScoreScale) -> Vec<MatchResult> {
  matches
    .into_iter()
    .map(|m| MatchResult {
      score: scale.apply(m.score),
      ..m
    })
    .collect()
}

/// A builder for creating `SimilarityEngine` instances.
#[derive(Debug, Default)]
pub struct SimilarityEngineBuilder {
  options: ScanOptions,
}

impl SimilarityEngineBuilder {
  /// Creates a builder with default options.
  pub fn new() -> Self {
    Self::default()
  }

  /// Replaces all options at once, e.g. with ones loaded from a file.
  pub fn options(mut self, options: ScanOptions) -> Self {
    self.options = options;
    self
  }

  /// Sets the maximum number of ranked matches.
  pub fn limit(mut self, limit: usize) -> Self {
    self.options.limit = limit;
    self
  }

  /// Sets the score scale.
  pub fn scale(mut self, scale: ScoreScale) -> Self {
    self.options.scale = scale;
    self
  }

  /// Enables or disables index memoization.
  pub fn cache(mut self, cache: bool) -> Self {
    self.options.cache = cache;
    self
  }

  /// Builds the `SimilarityEngine`.
  pub fn build(self) -> SimilarityEngine {
    SimilarityEngine::new(self.options)
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::error::DocsimError;
  use crate::store::{DirectoryStore, InMemoryStore};
  use crate::types::Document;

  fn corpus() -> CorpusSnapshot {
    CorpusSnapshot::new(
      3,
      vec![
        Document::new("doc_1", "This is the first stored document about topic A. It discusses topic A in detail."),
        Document::new("doc_2", "The second document is also about topic A, but it has a different perspective."),
        Document::new("doc_3", "Document number three is on topic B and is unrelated to topic A."),
        Document::new("doc_4", "This fourth document is again about topic A, providing more examples."),
      ],
    )
  }

  #[test]
  fn test_scan_fills_every_field() {
    let engine = SimilarityEngine::default();
    let query = QueryDocument::new("Topic B is unrelated to topic A.");
    let report = engine.scan(&corpus(), &query);

    assert_eq!(report.status, ScanStatus::Analyzed);
    assert_eq!(report.preprocessed_words, vec!["topic", "b", "is", "unrelated", "to", "topic", "a"]);
    assert!((report.term_frequencies["topic"] - 2.0 / 7.0).abs() < 1e-12);
    assert_eq!(report.document_similarities.len(), 4);
    assert_eq!(report.matches.len(), 4);
    assert_eq!(report.best_match_document_id, "doc_3");
    assert_eq!(report.best_match_similarity_score, report.matches[0].score);
    assert_eq!(report.corpus_version, 3);
    assert_eq!(report.content_snippet, query.text);
    assert_eq!(report.document_type, DocumentKind::Text.label());
  }

  #[test]
  fn test_report_echoes_query_identity() {
    let engine = SimilarityEngine::default();
    let report = engine.scan(&corpus(), &QueryDocument::new("topic A").with_id("essay.txt"));
    assert_eq!(report.filename.as_deref(), Some("essay.txt"));
    assert_eq!(report.document_type, "Text Document");
  }

  #[test]
  fn test_percent_scale_is_applied_everywhere() {
    let query = QueryDocument::new("topic A in detail");
    let fraction = SimilarityEngine::default().scan(&corpus(), &query);
    let percent = SimilarityEngine::builder()
      .scale(ScoreScale::Percent)
      .build()
      .scan(&corpus(), &query);

    assert!((percent.best_match_similarity_score - fraction.best_match_similarity_score * 100.0).abs() < 1e-9);
    for (id, score) in &fraction.document_similarities {
      assert!((percent.document_similarities[id] - score * 100.0).abs() < 1e-9);
    }
    for (f, p) in fraction.matches.iter().zip(&percent.matches) {
      assert_eq!(f.document_id, p.document_id);
      assert!((p.score - f.score * 100.0).abs() < 1e-9);
    }
  }

  #[test]
  fn test_cached_and_uncached_agree() {
    let query = QueryDocument::new("a different perspective on topic A");
    let cached = SimilarityEngine::default();
    let uncached = SimilarityEngine::builder().cache(false).build();
    let snapshot = corpus();

    let first = cached.scan(&snapshot, &query);
    let second = cached.scan(&snapshot, &query);
    let fresh = uncached.scan(&snapshot, &query);
    assert_eq!(first, second);
    assert_eq!(first, fresh);
  }

  #[test]
  fn test_self_copy_is_excluded() {
    let engine = SimilarityEngine::default();
    let snapshot = corpus();
    let text = snapshot.documents()[1].text.clone();
    let report = engine.scan(&snapshot, &QueryDocument::new(text).with_id("doc_2"));
    assert!(!report.document_similarities.contains_key("doc_2"));
    assert!(report.matches.iter().all(|m| m.document_id != "doc_2"));
    assert_eq!(report.matches.len(), 3);
  }

  #[test]
  fn test_limit() {
    let engine = SimilarityEngine::builder().limit(2).build();
    let report = engine.scan(&corpus(), &QueryDocument::new("topic"));
    assert_eq!(report.matches.len(), 2);
    assert_eq!(report.document_similarities.len(), 4);
  }

  #[test]
  fn test_unreadable_bytes() {
    let engine = SimilarityEngine::default();
    let report = engine.scan_bytes(&corpus(), Some("upload.txt"), vec![0xc3, 0x28]);
    assert!(matches!(report.status, ScanStatus::UnreadableInput { .. }));
    assert!(report.preprocessed_words.is_empty());
    assert!(report.document_similarities.is_empty());
    assert!(!report.has_match());
    assert_eq!(report.filename.as_deref(), Some("upload.txt"));

    let report = engine.scan_bytes(&corpus(), None, b"topic B".to_vec());
    assert_eq!(report.status, ScanStatus::Analyzed);
    assert_eq!(report.filename, None);
  }

  #[test]
  fn test_scan_store() {
    let store: InMemoryStore = corpus().documents().iter().cloned().collect();
    let engine = SimilarityEngine::default();
    let report = engine.scan_store(&store, &QueryDocument::new("fourth document examples")).unwrap();
    assert_eq!(report.best_match_document_id, "doc_4");
    assert_eq!(report.corpus_version, 4);

    let missing = DirectoryStore::new("/nonexistent/docsim/corpus");
    assert!(matches!(
      engine.scan_store(&missing, &QueryDocument::new("anything")),
      Err(DocsimError::Storage { .. })
    ));
  }

  #[test]
  fn test_store_mutation_is_seen_by_next_scan() {
    let store = InMemoryStore::new();
    let engine = SimilarityEngine::default();
    store.put(Document::new("a", "apples and pears"));
    let query = QueryDocument::new("bananas");

    let before = engine.scan_store(&store, &query).unwrap();
    assert!(!before.has_match());

    store.put(Document::new("b", "bananas"));
    let after = engine.scan_store(&store, &query).unwrap();
    assert_eq!(after.best_match_document_id, "b");
    assert!((after.best_match_similarity_score - 1.0).abs() < 1e-9);
  }
}
