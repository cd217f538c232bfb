use crate::internal::{TokenKind as T, *};

const KEYWORDS: &[&str] = &[
  "break", "case", "catch", "class", "const", "continue", "debugger", "default", "delete", "do",
  "else", "export", "extends", "finally", "for", "function", "if", "import", "in", "instanceof",
  "new", "return", "super", "switch", "this", "throw", "try", "typeof", "var", "void", "while",
  "with",
];

// longest first
const PUNCTUATORS: &[&str] = &[
  ">>>=", "...", "===", "!==", "**=", "<<=", ">>=", ">>>", "&&=", "||=", "??=", "=>", "==", "!=",
  "<=", ">=", "&&", "||", "??", "?.", "++", "--", "+=", "-=", "*=", "/=", "%=", "&=", "|=", "^=",
  "<<", ">>", "**",
];

#[derive(Debug)]
pub struct Lexer {
  ctx: Context,
  pos: usize,
  line: u32,
}

impl Lexer {
  pub fn new(ctx: Context) -> Self {
    Lexer { ctx, pos: 0, line: 1 }
  }

  pub fn new_str(src: &str) -> Self {
    Self::new(Context::new_str(src, Options::default()))
  }

  #[instrument(skip_all)]
  pub fn lex(mut self) -> Context {
    while let Some(token) = self.next_token() {
      self.ctx.tokens.push(token);
    }
    trace!(tokens = self.ctx.tokens.len(), "lexed");
    self.ctx.seal()
  }

  pub fn next_token(&mut self) -> Option<Token> {
    loop {
      self.skip_whitespace();
      if self.eof() {
        return None;
      }
      let token = match self.cur() {
        b'/' => match (self.peek(), self.peek_at(2), self.peek_at(3)) {
          (b'*', b'*', after) if after != b'/' => self.doc_comment(),
          (b'*', _, _) => {
            self.pos += 2;
            self.comment_end();
            continue;
          }
          (b'/', _, _) => {
            self.line_comment();
            continue;
          }
          _ if self.regex_allowed() => match self.regex() {
            Some(token) => token,
            None => self.punct(),
          },
          _ => self.punct(),
        },
        quote @ (b'\'' | b'"') => self.string(quote),
        b'0'..=b'9' => self.number(),
        b'.' if self.peek().is_ascii_digit() => self.number(),
        b if is_ident_start(b) => self.ident(),
        _ => self.punct(),
      };
      return Some(token);
    }
  }

  fn token(&mut self, kind: TokenKind, start: usize, end: usize, line: u32) -> Token {
    let text = String::from_utf8_lossy(&self.ctx.src[start..end]);
    let value = self.ctx.strs.intern(&text);
    Token::new(kind, value, line)
  }

  fn doc_comment(&mut self) -> Token {
    let line = self.line;
    self.pos += 3; // `/**`
    let start = self.pos;
    let end = self.comment_end();
    self.token(T::DocComment, start, end, line)
  }

  /// Skips to just past the next `*/`, returning where the comment body ended.
  fn comment_end(&mut self) -> usize {
    while !self.eof() {
      if self.cur() == b'*' && self.peek() == b'/' {
        let end = self.pos;
        self.pos += 2;
        return end;
      }
      self.bump();
    }
    self.pos
  }

  fn line_comment(&mut self) {
    while !self.eof() && self.cur() != b'\n' {
      self.pos += 1;
    }
  }

  fn regex_allowed(&self) -> bool {
    let prev = self
      .ctx
      .tokens
      .iter()
      .rev()
      .find(|token| token.kind != T::DocComment);
    let Some(&prev) = prev else {
      return true;
    };
    match prev.kind {
      T::Ident | T::Number | T::Str | T::Regex => false,
      T::Keyword => self.ctx.text(prev) != "this",
      T::Punct => !matches!(self.ctx.text(prev), ")" | "]"),
      T::DocComment => true,
    }
  }

  fn regex(&mut self) -> Option<Token> {
    let start = self.pos;
    let mut i = self.pos + 1;
    let mut in_class = false;
    loop {
      match self.ctx.src.get(i).copied() {
        None | Some(b'\n' | b'\r') => return None,
        Some(b'\\') => match self.ctx.src.get(i + 1) {
          None | Some(b'\n' | b'\r') => return None,
          Some(_) => i += 2,
        },
        Some(b'[') => {
          in_class = true;
          i += 1;
        }
        Some(b']') => {
          in_class = false;
          i += 1;
        }
        Some(b'/') if !in_class => {
          i += 1;
          break;
        }
        Some(_) => i += 1,
      }
    }
    while i < self.ctx.src.len() && is_ident_part(self.ctx.src[i]) {
      i += 1;
    }
    self.pos = i;
    Some(self.token(T::Regex, start, i, self.line))
  }

  fn string(&mut self, quote: u8) -> Token {
    let line = self.line;
    self.pos += 1;
    let mut value = String::new();
    let mut run = self.pos;
    while !self.eof() {
      match self.cur() {
        b if b == quote => break,
        b'\n' => break,
        b'\\' => {
          value.push_str(&String::from_utf8_lossy(&self.ctx.src[run..self.pos]));
          self.pos += 1;
          self.escape(&mut value);
          run = self.pos;
        }
        _ => self.pos += 1,
      }
    }
    value.push_str(&String::from_utf8_lossy(&self.ctx.src[run..self.pos]));
    if !self.eof() && self.cur() == quote {
      self.pos += 1;
    }
    let index = self.ctx.strs.intern(&value);
    Token::new(T::Str, index, line)
  }

  fn escape(&mut self, out: &mut String) {
    if self.eof() {
      return;
    }
    let b = self.cur();
    self.pos += 1;
    let ch = match b {
      b'n' => '\n',
      b'r' => '\r',
      b't' => '\t',
      b'b' => '\u{8}',
      b'f' => '\u{c}',
      b'v' => '\u{b}',
      b'0' if !self.cur().is_ascii_digit() => '\0',
      b'x' => self.hex_escape(2).unwrap_or('x'),
      b'u' => self.unicode_escape().unwrap_or('u'),
      // line continuations
      b'\n' => {
        self.line += 1;
        return;
      }
      b'\r' => {
        if !self.eof() && self.cur() == b'\n' {
          self.pos += 1;
        }
        self.line += 1;
        return;
      }
      b if b.is_ascii() => b as char,
      _ => {
        self.pos -= 1;
        let end = (self.pos + 4).min(self.ctx.src.len());
        let rest = String::from_utf8_lossy(&self.ctx.src[self.pos..end]);
        let ch = rest.chars().next().unwrap_or(char::REPLACEMENT_CHARACTER);
        self.pos += ch.len_utf8();
        ch
      }
    };
    out.push(ch);
  }

  fn hex_escape(&mut self, digits: usize) -> Option<char> {
    let code = self.hex_digits(self.pos, digits)?;
    self.pos += digits;
    char::from_u32(code)
  }

  fn unicode_escape(&mut self) -> Option<char> {
    if !self.eof() && self.cur() == b'{' {
      let close = self.ctx.src[self.pos..].iter().position(|b| *b == b'}')?;
      let code = self.hex_digits(self.pos + 1, close - 1)?;
      self.pos += close + 1;
      return char::from_u32(code);
    }
    let high = self.hex_digits(self.pos, 4)?;
    self.pos += 4;
    if (0xD800..0xDC00).contains(&high) && self.peek_at(0) == b'\\' && self.peek() == b'u' {
      if let Some(low @ 0xDC00..0xE000) = self.hex_digits(self.pos + 2, 4) {
        self.pos += 6;
        return char::from_u32(0x10000 + ((high - 0xD800) << 10) + (low - 0xDC00));
      }
    }
    Some(char::from_u32(high).unwrap_or(char::REPLACEMENT_CHARACTER))
  }

  fn hex_digits(&self, start: usize, count: usize) -> Option<u32> {
    let span = self.ctx.src.get(start..start + count)?;
    if count == 0 || !span.iter().all(u8::is_ascii_hexdigit) {
      return None;
    }
    u32::from_str_radix(std::str::from_utf8(span).ok()?, 16).ok()
  }

  fn number(&mut self) -> Token {
    let start = self.pos;
    if self.cur() == b'0' && matches!(self.peek(), b'x' | b'X' | b'o' | b'O' | b'b' | b'B') {
      self.pos += 2;
      self.skip_while(|b| b.is_ascii_hexdigit() || b == b'_');
    } else {
      self.skip_while(|b| b.is_ascii_digit() || b == b'_');
      if !self.eof() && self.cur() == b'.' {
        self.pos += 1;
        self.skip_while(|b| b.is_ascii_digit() || b == b'_');
      }
      let exp_digit = match self.peek() {
        b'+' | b'-' => self.peek_at(2).is_ascii_digit(),
        b => b.is_ascii_digit(),
      };
      if !self.eof() && matches!(self.cur(), b'e' | b'E') && exp_digit {
        self.pos += 2;
        self.skip_while(|b| b.is_ascii_digit());
      }
    }
    self.token(T::Number, start, self.pos, self.line)
  }

  fn ident(&mut self) -> Token {
    let start = self.pos;
    self.pos += 1;
    self.skip_while(is_ident_part);
    let kind = match &self.ctx.src[start..self.pos] {
      span if KEYWORDS.iter().any(|kw| kw.as_bytes() == span) => T::Keyword,
      _ => T::Ident,
    };
    self.token(kind, start, self.pos, self.line)
  }

  fn punct(&mut self) -> Token {
    let start = self.pos;
    let rest = &self.ctx.src[start..];
    let len = PUNCTUATORS
      .iter()
      .find(|p| rest.starts_with(p.as_bytes()))
      .map_or(1, |p| p.len());
    self.pos += len;
    self.token(T::Punct, start, self.pos, self.line)
  }

  fn skip_whitespace(&mut self) {
    while !self.eof() && self.cur().is_ascii_whitespace() {
      self.bump();
    }
  }

  fn skip_while(&mut self, pred: impl Fn(u8) -> bool) {
    while !self.eof() && pred(self.cur()) {
      self.pos += 1;
    }
  }

  fn bump(&mut self) {
    if self.cur() == b'\n' {
      self.line += 1;
    }
    self.pos += 1;
  }

  fn cur(&self) -> u8 {
    self.peek_at(0)
  }

  fn peek(&self) -> u8 {
    self.peek_at(1)
  }

  fn peek_at(&self, offset: usize) -> u8 {
    *self.ctx.src.get(self.pos + offset).unwrap_or(&0)
  }

  fn eof(&self) -> bool {
    self.pos >= self.ctx.src.len()
  }
}

const fn is_ident_start(b: u8) -> bool {
  b.is_ascii_alphabetic() || b == b'_' || b == b'$' || b >= 0x80
}

const fn is_ident_part(b: u8) -> bool {
  is_ident_start(b) || b.is_ascii_digit()
}
