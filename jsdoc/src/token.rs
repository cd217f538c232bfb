use std::fmt;

use crate::internal::*;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
  Ident,
  Keyword,
  Str,
  Number,
  Regex,
  DocComment,
  Punct,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Token {
  pub kind: TokenKind,
  pub value: idx::Str,
  pub line: u32,
}

impl Token {
  pub const fn new(kind: TokenKind, value: idx::Str, line: u32) -> Self {
    Token { kind, value, line }
  }
}

/// One position of a lookahead pattern.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pat {
  /// any token of this kind
  Kind(TokenKind),
  /// a keyword, identifier or punctuator spelled exactly this; a string
  /// token never matches, so `'function'` is not the keyword
  Text(&'static str),
  /// an identifier naming the class-system namespace, see `Options`
  Namespace,
}

pub const IDENT: Pat = Pat::Kind(TokenKind::Ident);
pub const STRING: Pat = Pat::Kind(TokenKind::Str);
pub const DOC_COMMENT: Pat = Pat::Kind(TokenKind::DocComment);
pub const NS: Pat = Pat::Namespace;

pub const fn lit(text: &'static str) -> Pat {
  Pat::Text(text)
}

impl fmt::Display for TokenKind {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    let name = match self {
      TokenKind::Ident => "identifier",
      TokenKind::Keyword => "keyword",
      TokenKind::Str => "string",
      TokenKind::Number => "number",
      TokenKind::Regex => "regex",
      TokenKind::DocComment => "doc-comment",
      TokenKind::Punct => "punctuator",
    };
    f.write_str(name)
  }
}

impl fmt::Display for Pat {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      Pat::Kind(kind) => write!(f, "<{kind}>"),
      Pat::Text(text) => write!(f, "`{text}`"),
      Pat::Namespace => f.write_str("<namespace>"),
    }
  }
}
