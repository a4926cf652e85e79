//! Term-frequency calculation.

use crate::error::{DocsimError, Result};
use crate::types::TermFrequencies;
use std::collections::HashMap;

/// Calculate normalized term frequencies for a token sequence.
///
/// Each distinct token maps to its occurrence count divided by the total
/// token count.
///
/// # Errors
///
/// Returns [`DocsimError::EmptyDocument`] when `tokens` is empty.
pub fn try_term_frequencies<T: AsRef<str>>(tokens: &[T]) -> Result<TermFrequencies> {
  if tokens.is_empty() {
    return Err(DocsimError::EmptyDocument);
  }

  let mut counts: HashMap<&str, usize> = HashMap::new();
  for token in tokens {
    *counts.entry(token.as_ref()).or_insert(0) += 1;
  }

  let total = tokens.len() as f64;
  Ok(
    counts
      .into_iter()
      .map(|(token, count)| (token.to_owned(), count as f64 / total))
      .collect(),
  )
}

/// Calculate term frequencies, mapping an empty document to an empty map.
pub fn term_frequencies<T: AsRef<str>>(tokens: &[T]) -> TermFrequencies {
  try_term_frequencies(tokens).unwrap_or_default()
}
