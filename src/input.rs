//! Query documents and the gate that keeps binary content away from the
//! engine.

use crate::error::{DocsimError, Result};
use crate::types::DocumentId;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// How a file is treated based on its extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DocumentKind {
  /// Plain text; the only kind that is analyzed.
  Text,
  /// An accepted upload whose content cannot be previewed as text
  /// (`pdf`, `png`, `jpg`, `jpeg`).
  Binary,
  /// Anything else.
  Unsupported,
}

impl DocumentKind {
  /// Classifies a file name or path by its extension, case-insensitively.
  pub fn from_path(path: impl AsRef<Path>) -> Self {
    let extension = path
      .as_ref()
      .extension()
      .and_then(|ext| ext.to_str())
      .map(str::to_ascii_lowercase);

    match extension.as_deref() {
      Some("txt") => Self::Text,
      Some("pdf" | "png" | "jpg" | "jpeg") => Self::Binary,
      _ => Self::Unsupported,
    }
  }

  /// Human-readable label used in reports.
  pub fn label(self) -> &'static str {
    match self {
      Self::Text => "Text Document",
      Self::Binary => "Binary Document (Content Preview Unavailable)",
      Self::Unsupported => "Unsupported Document",
    }
  }
}

/// A document submitted for comparison against the corpus.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueryDocument {
  /// Identity of the query's stored copy, excluded from its own matches.
  pub id: Option<DocumentId>,
  /// Raw text of the query.
  pub text: String,
}

impl QueryDocument {
  /// Creates an anonymous query from text.
  pub fn new(text: impl Into<String>) -> Self {
    Self {
      id: None,
      text: text.into(),
    }
  }

  /// Sets the identity of the query's stored copy.
  pub fn with_id(mut self, id: impl Into<DocumentId>) -> Self {
    self.id = Some(id.into());
    self
  }

  /// Decodes raw upload bytes as UTF-8 text.
  ///
  /// # Errors
  ///
  /// Returns [`DocsimError::UnreadableInput`] when the bytes are not valid
  /// UTF-8.
  pub fn from_bytes(bytes: Vec<u8>) -> Result<Self> {
    String::from_utf8(bytes)
      .map(Self::new)
      .map_err(|err| DocsimError::UnreadableInput {
        reason: err.to_string(),
      })
  }

  /// Reads a text file as a query; its file name becomes the id.
  ///
  /// # Errors
  ///
  /// [`DocsimError::UnsupportedDocument`] for non-text extensions,
  /// [`DocsimError::Storage`] when the file cannot be read and
  /// [`DocsimError::UnreadableInput`] when it is not UTF-8.
  pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
    let path = path.as_ref();
    let name = path
      .file_name()
      .map(|name| name.to_string_lossy().into_owned())
      .unwrap_or_default();

    if DocumentKind::from_path(path) != DocumentKind::Text {
      return Err(DocsimError::UnsupportedDocument { name });
    }

    let bytes = std::fs::read(path).map_err(|err| DocsimError::storage(path, err))?;
    Ok(Self::from_bytes(bytes)?.with_id(name))
  }
}
