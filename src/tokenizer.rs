//! Text tokenization utilities.
//!
//! Tokens are matched exactly downstream, so there is no stopword removal and
//! no stemming here.

use crate::types::TokenSequence;

/// Returns `true` for characters that survive normalization.
///
/// Word characters are Unicode alphanumerics plus the underscore; whitespace
/// is kept so it can act as the separator.
fn is_kept(c: char) -> bool {
  c.is_alphanumeric() || c == '_' || c.is_whitespace()
}

/// Lowercase the text and strip every character that is neither a word
/// character nor whitespace.
///
/// Punctuation, symbols and emoji are removed without leaving a gap, so
/// `"don't"` becomes `"dont"`.
pub fn normalize(text: &str) -> String {
  text
    .chars()
    .flat_map(char::to_lowercase)
    .filter(|c| is_kept(*c))
    .collect()
}

/// Tokenize text into normalized words.
///
/// Returns an empty sequence for empty, whitespace-only or punctuation-only
/// input.
pub fn tokenize(text: &str) -> TokenSequence {
  normalize(text)
    .split_whitespace()
    .map(str::to_owned)
    .collect()
}
