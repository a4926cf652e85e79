//! Ranking of corpus documents against a query vector.

use crate::similarity::cosine_similarity;
use crate::types::{DocumentId, MatchResult, TfIdfVector};

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// Number of matches returned when the caller does not choose a limit.
pub const DEFAULT_LIMIT: usize = 5;

/// Score `query` against every corpus vector except `self_id`.
///
/// Results keep the corpus order, which is the tie-break order used by
/// [`rank_matches`].
pub fn score_all(
  query: &TfIdfVector,
  corpus_vectors: &[(DocumentId, TfIdfVector)],
  self_id: Option<&str>,
) -> Vec<MatchResult> {
  let is_candidate = |id: &DocumentId| self_id != Some(id.as_str());

  #[cfg(feature = "parallel")]
  let iter = corpus_vectors.par_iter();
  #[cfg(not(feature = "parallel"))]
  let iter = corpus_vectors.iter();

  iter
    .filter(|(id, _)| is_candidate(id))
    .map(|(id, vector)| MatchResult::new(id.clone(), cosine_similarity(query, vector)))
    .collect()
}

/// Sort matches by descending score.
///
/// The sort is stable, so equal scores keep their incoming (corpus) order.
pub fn sort_matches(matches: &mut [MatchResult]) {
  matches.sort_by(|a, b| b.score.total_cmp(&a.score));
}

/// Rank corpus documents by cosine similarity to `query`.
///
/// Excludes `self_id` from the candidates, sorts by descending score with
/// ties kept in corpus order, and truncates to `limit` entries.
pub fn rank_matches(
  query: &TfIdfVector,
  corpus_vectors: &[(DocumentId, TfIdfVector)],
  self_id: Option<&str>,
  limit: usize,
) -> Vec<MatchResult> {
  let mut matches = score_all(query, corpus_vectors, self_id);
  sort_matches(&mut matches);
  matches.truncate(limit);
  matches
}

/// The best match of a ranked list, if it has a positive score.
///
/// An empty list or a list of zero scores has no best match.
pub fn best_match(ranked: &[MatchResult]) -> Option<&MatchResult> {
  ranked.first().filter(|m| m.score > 0.0)
}

#[cfg(test)]
mod tests {
  use super::*;

  fn vector(entries: &[(&str, f64)]) -> TfIdfVector {
    entries.iter().map(|(k, v)| (k.to_string(), *v)).collect()
  }

  fn corpus(entries: Vec<(&str, TfIdfVector)>) -> Vec<(DocumentId, TfIdfVector)> {
    entries.into_iter().map(|(id, v)| (id.to_string(), v)).collect()
  }

  fn ids(matches: &[MatchResult]) -> Vec<&str> {
    matches.iter().map(|m| m.document_id.as_str()).collect()
  }

  #[test]
  fn test_rank_descending() {
    let query = vector(&[("a", 1.0), ("b", 1.0)]);
    let vectors = corpus(vec![
      ("none", vector(&[("c", 1.0)])),
      ("half", vector(&[("a", 1.0), ("c", 1.0)])),
      ("full", vector(&[("a", 2.0), ("b", 2.0)])),
    ]);
    let ranked = rank_matches(&query, &vectors, None, DEFAULT_LIMIT);
    assert_eq!(ids(&ranked), vec!["full", "half", "none"]);
    assert!((ranked[0].score - 1.0).abs() < 1e-12);
    assert_eq!(ranked[2].score, 0.0);
  }

  #[test]
  fn test_ties_keep_corpus_order() {
    let query = vector(&[("a", 1.0)]);
    let same = vector(&[("a", 1.0), ("b", 1.0)]);
    let vectors = corpus(vec![
      ("third", same.clone()),
      ("first", same.clone()),
      ("best", vector(&[("a", 1.0)])),
      ("second", same),
    ]);
    let ranked = rank_matches(&query, &vectors, None, 10);
    assert_eq!(ids(&ranked), vec!["best", "third", "first", "second"]);
  }

  #[test]
  fn test_self_is_excluded_and_limit_applies() {
    let query = vector(&[("a", 1.0)]);
    let vectors: Vec<(DocumentId, TfIdfVector)> = (0..8)
      .map(|i| (format!("d{i}"), vector(&[("a", 1.0)])))
      .collect();
    let ranked = rank_matches(&query, &vectors, Some("d0"), 3);
    assert_eq!(ranked.len(), 3);
    assert!(!ids(&ranked).contains(&"d0"));
    assert_eq!(ids(&ranked), vec!["d1", "d2", "d3"]);
  }

  #[test]
  fn test_empty_corpus() {
    let query = vector(&[("a", 1.0)]);
    let ranked = rank_matches(&query, &[], None, DEFAULT_LIMIT);
    assert!(ranked.is_empty());
    assert!(best_match(&ranked).is_none());
  }

  #[test]
  fn test_best_match_requires_positive_score() {
    let zeros = vec![MatchResult::new("a", 0.0), MatchResult::new("b", 0.0)];
    assert!(best_match(&zeros).is_none());
    let ranked = vec![MatchResult::new("a", 0.4), MatchResult::new("b", 0.1)];
    assert_eq!(best_match(&ranked).map(|m| m.document_id.as_str()), Some("a"));
  }
}
