//! Cosine similarity over sparse TF-IDF vectors.
//!
//! A vector with zero magnitude (an empty document, or one whose tokens are
//! all unknown to the corpus) is defined as maximally dissimilar to
//! everything: its similarity is exactly 0, never a division error and never
//! another fallback metric.

use crate::types::TfIdfVector;

/// Dot product over the keys present in both vectors.
pub fn dot(a: &TfIdfVector, b: &TfIdfVector) -> f64 {
  // Iterate the smaller side; the result does not depend on the choice.
  let (small, large) = if a.len() <= b.len() { (a, b) } else { (b, a) };
  small
    .iter()
    .filter_map(|(token, x)| large.get(token).map(|y| x * y))
    .sum()
}

/// Euclidean magnitude over all entries of the vector.
pub fn magnitude(v: &TfIdfVector) -> f64 {
  v.values().map(|x| x * x).sum::<f64>().sqrt()
}

/// Cosine similarity of two vectors, in `[0, 1]` for non-negative weights.
///
/// Returns exactly 0 when either magnitude is 0.
pub fn cosine_similarity(a: &TfIdfVector, b: &TfIdfVector) -> f64 {
  let norm_a = magnitude(a);
  let norm_b = magnitude(b);
  if norm_a == 0.0 || norm_b == 0.0 {
    return 0.0;
  }

  (dot(a, b) / (norm_a * norm_b)).clamp(0.0, 1.0)
}
