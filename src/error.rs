//! Error types for docsim.
//!
//! Most degenerate inputs (empty documents, empty corpora, zero-magnitude
//! vectors) are not errors at all and surface as data in a
//! [`ScanReport`](crate::report::ScanReport). The variants here cover the
//! conditions a caller has to decide about.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while preparing or running a similarity scan.
#[derive(Debug, Error)]
pub enum DocsimError {
  /// The token sequence had zero length, so no term frequencies exist.
  #[error("document has no tokens")]
  EmptyDocument,

  /// The query content could not be decoded as text.
  #[error("unreadable input: {reason}")]
  UnreadableInput {
    /// Why decoding failed.
    reason: String,
  },

  /// The document is binary or has an extension the engine never analyzes.
  #[error("unsupported document: {name}")]
  UnsupportedDocument {
    /// File name of the rejected document.
    name: String,
  },

  /// The corpus or a file could not be read; analysis is unavailable.
  #[error("storage error at {path}: {source}")]
  Storage {
    /// Path where the error occurred.
    path: PathBuf,
    /// Underlying error.
    #[source]
    source: std::io::Error,
  },

  /// A configuration file could not be parsed.
  #[error("configuration error: {0}")]
  Config(String),

  /// A report could not be serialized.
  #[error("serialization error: {0}")]
  Serialization(String),
}

impl DocsimError {
  /// Wraps an IO error together with the path it happened at.
  pub fn storage(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
    Self::Storage {
      path: path.into(),
      source,
    }
  }
}

/// Result type alias for docsim operations.
pub type Result<T> = std::result::Result<T, DocsimError>;
