use crate::internal::*;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseError {
  /// `consume_expecting` met a token (or the end of input) that its
  /// pattern does not allow.
  #[error("line {line}: expected {expected}, found {found}")]
  GrammarMismatch {
    expected: Pat,
    found: String,
    line: u32,
  },
}
