//! Scan configuration.

use crate::error::{DocsimError, Result};
use crate::ranker::DEFAULT_LIMIT;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// The scale every reported similarity score uses.
///
/// One scale applies to the whole report: per-document similarities, the
/// ranked matches and the best-match score.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScoreScale {
  /// Scores in `[0, 1]`.
  #[default]
  Fraction,
  /// Scores in `[0, 100]`.
  Percent,
}

impl ScoreScale {
  /// Converts a raw cosine similarity to this scale.
  pub fn apply(self, score: f64) -> f64 {
    match self {
      Self::Fraction => score,
      Self::Percent => score * 100.0,
    }
  }
}

/// Options controlling a similarity scan.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ScanOptions {
  /// The maximum number of ranked matches to return.
  #[serde(default = "default_limit")]
  pub limit: usize,
  /// The scale reported scores use.
  #[serde(default)]
  pub scale: ScoreScale,
  /// Length of the content snippet, in grapheme clusters.
  #[serde(default = "default_snippet_chars")]
  pub snippet_chars: usize,
  /// Whether corpus indexes are memoized between scans.
  #[serde(default = "default_cache")]
  pub cache: bool,
}

fn default_limit() -> usize {
  DEFAULT_LIMIT
}

fn default_snippet_chars() -> usize {
  200
}

fn default_cache() -> bool {
  true
}

impl Default for ScanOptions {
  fn default() -> Self {
    Self {
      limit: default_limit(),
      scale: ScoreScale::default(),
      snippet_chars: default_snippet_chars(),
      cache: default_cache(),
    }
  }
}

impl ScanOptions {
  /// Sets the `limit` value for the maximum number of matches.
  pub fn limit(mut self, limit: usize) -> Self {
    self.limit = limit;
    self
  }

  /// Sets the score scale.
  pub fn scale(mut self, scale: ScoreScale) -> Self {
    self.scale = scale;
    self
  }

  /// Sets the snippet length.
  pub fn snippet_chars(mut self, snippet_chars: usize) -> Self {
    self.snippet_chars = snippet_chars;
    self
  }

  /// Enables or disables index memoization.
  pub fn cache(mut self, cache: bool) -> Self {
    self.cache = cache;
    self
  }

  /// Parses options from a JSON string. Missing fields take their defaults.
  ///
  /// # Errors
  ///
  /// Returns [`DocsimError::Config`] for malformed JSON or unknown fields.
  pub fn from_json(json: &str) -> Result<Self> {
    serde_json::from_str(json).map_err(|err| DocsimError::Config(err.to_string()))
  }

  /// Loads options from a JSON file.
  ///
  /// # Errors
  ///
  /// Returns [`DocsimError::Storage`] when the file cannot be read and
  /// [`DocsimError::Config`] when it cannot be parsed.
  pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
    let path = path.as_ref();
    let json = std::fs::read_to_string(path).map_err(|err| DocsimError::storage(path, err))?;
    Self::from_json(&json)
  }
}
