//! Combines term frequencies with corpus IDF weights.

use crate::types::{IdfTable, TermFrequencies, TfIdfVector};

/// Build the sparse TF-IDF vector of a document.
///
/// Tokens missing from `idf` (never seen in the corpus) weigh 0 and are
/// dropped, as are tokens whose product is 0.
pub fn vectorize(tf: &TermFrequencies, idf: &IdfTable) -> TfIdfVector {
  tf.iter()
    .filter_map(|(token, &weight)| {
      let idf_weight = idf.get(token).copied().unwrap_or(0.0);
      let value = weight * idf_weight;
      (value > 0.0).then(|| (token.clone(), value))
    })
    .collect()
}
