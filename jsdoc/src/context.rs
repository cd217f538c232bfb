use crate::internal::*;

#[derive(Debug)]
pub struct Context {
  pub src: Vec<u8>,
  pub strs: StringPool,
  pub tokens: Vec<Token>,
  pub options: Options,
  namespaces: Vec<idx::Str>,
}

impl Context {
  pub fn new(options: Options) -> Self {
    Context {
      src: Vec::new(),
      strs: StringPool::new(),
      tokens: Vec::with_capacity(128),
      options,
      namespaces: Vec::new(),
    }
  }

  pub fn new_str(input: &str, options: Options) -> Self {
    assert!(input.len() <= u32::MAX as usize);
    let mut ctx = Context::new(options);
    ctx.src = input.bytes().collect();
    ctx
  }

  pub fn text(&self, token: Token) -> &str {
    self.strs.get(token.value)
  }

  pub fn token_at(&self, pos: idx::TokenPos) -> Option<Token> {
    self.tokens.get(pos.usize()).copied()
  }

  pub fn is_namespace(&self, token: Token) -> bool {
    token.kind == TokenKind::Ident && self.namespaces.contains(&token.value)
  }

  /// Interns the configured namespaces, so `is_namespace` is a plain
  /// index comparison. Called once lexing is done.
  pub fn seal(mut self) -> Self {
    self.namespaces = self
      .options
      .ext_namespaces
      .iter()
      .filter_map(|ns| self.strs.find(ns))
      .collect();
    self
  }
}
