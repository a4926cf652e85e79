//! Corpus snapshots and the IDF index built from them.
//!
//! A [`CorpusSnapshot`] is the complete set of known documents at one point in
//! time. Every similarity request reads exactly one snapshot and builds (or
//! reuses) the [`CorpusIndex`] for it, so the IDF table and every document
//! vector always describe the same corpus membership.

use crate::frequency::term_frequencies;
use crate::tokenizer::tokenize;
use crate::types::{Document, DocumentId, IdfTable, TfIdfVector};
use crate::vectorizer::vectorize;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use xxhash_rust::xxh3::Xxh3;

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// An immutable, versioned view of the corpus.
///
/// Cloning is cheap: the document list is shared.
#[derive(Debug, Clone)]
pub struct CorpusSnapshot {
  version: u64,
  fingerprint: u64,
  documents: Arc<[Document]>,
}

impl CorpusSnapshot {
  /// Creates a snapshot of `documents` tagged with `version`.
  ///
  /// The order of `documents` is the order ties are broken in when ranking.
  pub fn new(version: u64, documents: Vec<Document>) -> Self {
    let fingerprint = fingerprint(&documents);
    Self {
      version,
      fingerprint,
      documents: documents.into(),
    }
  }

  /// Retags the snapshot with another version; contents are untouched.
  pub fn with_version(mut self, version: u64) -> Self {
    self.version = version;
    self
  }

  /// Monotonically increasing version assigned by the store.
  pub fn version(&self) -> u64 {
    self.version
  }

  /// Content hash over every document id and text, in order.
  ///
  /// Two snapshots with equal fingerprints have the same membership and
  /// produce the same index.
  pub fn fingerprint(&self) -> u64 {
    self.fingerprint
  }

  /// The documents of this snapshot.
  pub fn documents(&self) -> &[Document] {
    &self.documents
  }

  /// Number of documents in the snapshot.
  pub fn len(&self) -> usize {
    self.documents.len()
  }

  /// Whether the snapshot holds no documents.
  pub fn is_empty(&self) -> bool {
    self.documents.is_empty()
  }
}

impl Default for CorpusSnapshot {
  fn default() -> Self {
    Self::new(0, Vec::new())
  }
}

impl FromIterator<Document> for CorpusSnapshot {
  fn from_iter<I: IntoIterator<Item = Document>>(iter: I) -> Self {
    Self::new(0, iter.into_iter().collect())
  }
}

fn fingerprint(documents: &[Document]) -> u64 {
  let mut hasher = Xxh3::new();
  for doc in documents {
    // Length prefixes keep ("ab", "c") and ("a", "bc") apart.
    hasher.update(&(doc.id.len() as u64).to_le_bytes());
    hasher.update(doc.id.as_bytes());
    hasher.update(&(doc.text.len() as u64).to_le_bytes());
    hasher.update(doc.text.as_bytes());
  }
  hasher.digest()
}

/// Smoothed inverse document frequency: `ln(n / (df + 1)) + 1`.
///
/// Strictly positive for every `df <= n` with `n >= 1`, and strictly
/// decreasing in `df`.
pub fn idf_weight(n: usize, df: usize) -> f64 {
  (n as f64 / (df as f64 + 1.0)).ln() + 1.0
}

/// Count, for each token, how many documents contain it at least once.
///
/// Returns the counts together with the number of documents seen.
pub fn document_frequencies<I, T>(corpus: I) -> (HashMap<String, usize>, usize)
where
  I: IntoIterator<Item = T>,
  T: AsRef<[String]>,
{
  let mut doc_freq: HashMap<String, usize> = HashMap::new();
  let mut doc_count = 0;

  for tokens in corpus {
    doc_count += 1;
    let distinct: HashSet<&String> = tokens.as_ref().iter().collect();
    for token in distinct {
      match doc_freq.get_mut(token) {
        Some(count) => *count += 1,
        None => {
          doc_freq.insert(token.clone(), 1);
        }
      }
    }
  }

  (doc_freq, doc_count)
}

/// Build the IDF table for a tokenized corpus.
///
/// Always computed from scratch; an empty corpus yields an empty table.
pub fn build_idf<I, T>(corpus: I) -> IdfTable
where
  I: IntoIterator<Item = T>,
  T: AsRef<[String]>,
{
  let (doc_freq, n) = document_frequencies(corpus);
  doc_freq
    .into_iter()
    .map(|(token, df)| (token, idf_weight(n, df)))
    .collect()
}

/// The vector space of one corpus snapshot.
///
/// Owns the IDF table and the TF-IDF vector of every document. Vectors keep
/// the snapshot's document order.
#[derive(Debug, Clone)]
pub struct CorpusIndex {
  version: u64,
  fingerprint: u64,
  idf: IdfTable,
  vectors: Vec<(DocumentId, TfIdfVector)>,
}

impl CorpusIndex {
  /// Tokenizes every document of the snapshot, builds the IDF table and
  /// vectorizes each document against it.
  pub fn build(snapshot: &CorpusSnapshot) -> Self {
    let documents = snapshot.documents();

    #[cfg(feature = "parallel")]
    let tokenized: Vec<Vec<String>> = documents.par_iter().map(|doc| tokenize(&doc.text)).collect();
    #[cfg(not(feature = "parallel"))]
    let tokenized: Vec<Vec<String>> = documents.iter().map(|doc| tokenize(&doc.text)).collect();

    let idf = build_idf(&tokenized);

    #[cfg(feature = "parallel")]
    let vectors = documents
      .par_iter()
      .zip(tokenized.par_iter())
      .map(|(doc, tokens)| (doc.id.clone(), vectorize(&term_frequencies(tokens), &idf)))
      .collect();
    #[cfg(not(feature = "parallel"))]
    let vectors = documents
      .iter()
      .zip(tokenized.iter())
      .map(|(doc, tokens)| (doc.id.clone(), vectorize(&term_frequencies(tokens), &idf)))
      .collect();

    tracing::debug!(
      version = snapshot.version(),
      documents = documents.len(),
      vocabulary = idf.len(),
      "built corpus index"
    );

    Self {
      version: snapshot.version(),
      fingerprint: snapshot.fingerprint(),
      idf,
      vectors,
    }
  }

  /// Version of the snapshot this index was built from.
  pub fn version(&self) -> u64 {
    self.version
  }

  /// Fingerprint of the snapshot this index was built from.
  pub fn fingerprint(&self) -> u64 {
    self.fingerprint
  }

  /// The IDF table.
  pub fn idf(&self) -> &IdfTable {
    &self.idf
  }

  /// Document vectors, in snapshot order.
  pub fn vectors(&self) -> &[(DocumentId, TfIdfVector)] {
    &self.vectors
  }

  /// Number of indexed documents.
  pub fn len(&self) -> usize {
    self.vectors.len()
  }

  /// Whether the index holds no documents.
  pub fn is_empty(&self) -> bool {
    self.vectors.is_empty()
  }

  /// Whether this index describes `snapshot`'s membership.
  pub fn matches(&self, snapshot: &CorpusSnapshot) -> bool {
    self.fingerprint == snapshot.fingerprint()
  }
}
