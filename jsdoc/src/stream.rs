use crate::internal::*;
use crate::error::ParseError as E;

/// Cursor over the lexed tokens of one source. Lookahead never consumes,
/// and a consumed token is never handed out again.
#[derive(Debug)]
pub struct TokenStream {
  ctx: Context,
  pos: usize,
}

impl TokenStream {
  pub fn new(ctx: Context) -> Self {
    TokenStream { ctx, pos: 0 }
  }

  pub fn new_str(src: &str, options: Options) -> Self {
    Self::new(Lexer::new(Context::new_str(src, options)).lex())
  }

  /// True if the upcoming tokens match `pattern` position by position.
  pub fn look(&self, pattern: &[Pat]) -> bool {
    pattern.iter().enumerate().all(|(offset, pat)| {
      self
        .ctx
        .token_at(idx::TokenPos::new((self.pos + offset) as u32))
        .is_some_and(|token| self.matches(*pat, token))
    })
  }

  pub fn peek(&self) -> Option<Token> {
    self.ctx.token_at(self.position())
  }

  /// The token most recently consumed.
  pub fn prev(&self) -> Option<Token> {
    self.pos.checked_sub(1).and_then(|pos| self.ctx.token_at(idx::TokenPos::new(pos as u32)))
  }

  pub fn next(&mut self) -> Option<Token> {
    let token = self.ctx.token_at(self.position())?;
    self.pos += 1;
    Some(token)
  }

  /// Consumes `pattern`, returning the last token it matched.
  pub fn consume_expecting(&mut self, pattern: &[Pat]) -> Result<Token, ParseError> {
    assert!(!pattern.is_empty());
    for pat in pattern {
      match self.ctx.token_at(self.position()) {
        Some(token) if self.matches(*pat, token) => self.pos += 1,
        Some(token) => {
          return Err(E::GrammarMismatch {
            expected: *pat,
            found: format!("`{}`", self.ctx.text(token)),
            line: token.line,
          });
        }
        None => {
          return Err(E::GrammarMismatch {
            expected: *pat,
            found: "end of input".to_string(),
            line: self.ctx.tokens.last().map_or(1, |token| token.line),
          });
        }
      }
    }
    Ok(self.ctx.tokens[self.pos - 1])
  }

  pub fn is_empty(&self) -> bool {
    self.pos >= self.ctx.tokens.len()
  }

  pub fn text(&self, token: Token) -> &str {
    self.ctx.text(token)
  }

  pub fn position(&self) -> idx::TokenPos {
    idx::TokenPos::new(self.pos as u32)
  }

  /// Moves the cursor back to a position taken from `position()`, used by
  /// rules that must report absence without having consumed anything.
  pub fn rewind(&mut self, pos: idx::TokenPos) {
    debug_assert!(pos.usize() <= self.pos);
    self.pos = pos.usize();
  }

  fn matches(&self, pat: Pat, token: Token) -> bool {
    match pat {
      Pat::Kind(kind) => token.kind == kind,
      Pat::Text(text) => {
        token.kind != TokenKind::Str && self.ctx.strs.find(text) == Some(token.value)
      }
      Pat::Namespace => self.ctx.is_namespace(token),
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::token::TokenKind as T;
  use pretty_assertions::assert_eq;

  fn stream(src: &str) -> TokenStream {
    TokenStream::new_str(src, Options::default())
  }

  #[test]
  fn look_does_not_consume() {
    let stream = stream("Ext.define('Foo')");
    assert!(stream.look(&[NS, lit("."), lit("define"), lit("("), STRING]));
    assert!(stream.look(&[IDENT]));
    assert!(!stream.look(&[STRING]));
    assert!(!stream.look(&[NS, lit("."), lit("define"), lit("("), STRING, lit(")"), IDENT]));
    assert_eq!(stream.position(), idx::TokenPos::new(0));
  }

  #[test]
  fn text_patterns_match_any_kind() {
    let stream = stream("function");
    assert!(stream.look(&[lit("function")]));
    assert!(stream.look(&[Pat::Kind(T::Keyword)]));
    assert!(!stream.look(&[IDENT]));
  }

  #[test]
  fn text_patterns_skip_string_tokens() {
    let stream = stream("'function' : \"var\"");
    assert!(!stream.look(&[lit("function")]));
    assert!(stream.look(&[STRING, lit(":"), STRING]));
    assert!(!stream.look(&[STRING, lit(":"), lit("var")]));
  }

  #[test]
  fn prev_is_the_last_consumed_token() {
    let mut stream = stream("a\nb");
    assert_eq!(stream.prev(), None);
    stream.next();
    assert_eq!(stream.prev().map(|t| t.line), Some(1));
    stream.next();
    assert_eq!(stream.prev().map(|t| t.line), Some(2));
  }

  #[test]
  fn configured_namespaces() {
    let options = Options::default().with_ext_namespaces(["Ext", "MyApp"]);
    let stream = TokenStream::new_str("MyApp.define", options);
    assert!(stream.look(&[NS, lit("."), lit("define")]));
    let stream = TokenStream::new_str("Other.define", Options::default());
    assert!(!stream.look(&[NS]));
  }

  #[test]
  fn consume_expecting_returns_last_token() {
    let mut stream = stream("a . b c");
    let token = stream.consume_expecting(&[IDENT, lit("."), IDENT]).unwrap();
    assert_eq!(stream.text(token), "b");
    assert_eq!(stream.next().map(|t| t.kind), Some(T::Ident));
    assert!(stream.is_empty());
    assert_eq!(stream.next(), None);
  }

  #[test]
  fn consume_expecting_mismatch() {
    let mut stream = stream("foo\n;");
    let err = stream.consume_expecting(&[IDENT, lit(")")]).unwrap_err();
    assert_eq!(
      err,
      ParseError::GrammarMismatch {
        expected: lit(")"),
        found: "`;`".to_string(),
        line: 2,
      }
    );
    assert_eq!(err.to_string(), "line 2: expected `)`, found `;`");
  }

  #[test]
  fn consume_expecting_at_end_of_input() {
    let mut stream = stream("foo");
    stream.next();
    let err = stream.consume_expecting(&[lit("{")]).unwrap_err();
    assert_eq!(
      err,
      ParseError::GrammarMismatch {
        expected: lit("{"),
        found: "end of input".to_string(),
        line: 1,
      }
    );
  }

  #[test]
  fn rewind_restores_lookahead() {
    let mut stream = stream("[1, 2]");
    let start = stream.position();
    stream.next();
    stream.next();
    stream.rewind(start);
    assert!(stream.look(&[lit("["), Pat::Kind(T::Number)]));
  }
}
