use crate::internal::*;
#[cfg(test)]
use std::sync::Once;
#[cfg(test)]
use tracing_subscriber::fmt::format::FmtSpan;
#[cfg(test)]
use tracing_subscriber::{EnvFilter, fmt};

mod class_def;

const DEFINE: [Pat; 5] = [NS, lit("."), lit("define"), lit("("), STRING];
const CLASS_MANAGER_CREATE: [Pat; 7] = [
  NS,
  lit("."),
  lit("ClassManager"),
  lit("."),
  lit("create"),
  lit("("),
  STRING,
];
const EXTEND_CALL: [Pat; 4] = [NS, lit("."), lit("extend"), lit("(")];
const EXTEND_IDENT: [Pat; 5] = [NS, lit("."), lit("extend"), lit("("), IDENT];
const EXTEND_THIS: [Pat; 5] = [NS, lit("."), lit("extend"), lit("("), lit("this")];

/// Walks the tokens of one source, pairing every doc-comment with the
/// code that follows it.
#[derive(Debug)]
pub struct Parser<C = DocParser> {
  stream: TokenStream,
  comments: C,
}

/// What the code after a doc-comment looks like, decided from lookahead
/// alone. Variants are tried in declaration order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Shape {
  Function,
  VarDecl,
  ClassDefinition,
  Property,
  PropertyAfterComma,
  MaybeAssignment,
  StringName,
  Nop,
}

impl Parser {
  pub fn new_str(src: &str) -> Parser {
    Self::with_options(src, Options::default())
  }

  pub fn with_options(src: &str, options: Options) -> Parser {
    #[cfg(test)]
    configure_test_tracing();

    Parser {
      stream: TokenStream::new_str(src, options),
      comments: DocParser,
    }
  }
}

impl<C: CommentParser> Parser<C> {
  pub fn with_comment_parser<D: CommentParser>(self, comments: D) -> Parser<D> {
    Parser { stream: self.stream, comments }
  }

  #[instrument(skip_all)]
  pub fn parse_document(mut self) -> Result<Vec<DocRecord>, ParseError> {
    let mut docs = Vec::new();
    while let Some(token) = self.stream.next() {
      if token.kind != TokenKind::DocComment {
        continue;
      }
      let comment = self.comments.parse(self.stream.text(token));
      let code = self.parse_code_block()?;
      trace!(line = token.line, ?code, "doc-comment");
      docs.push(DocRecord { comment, linenr: token.line, code });
    }
    debug!(records = docs.len(), "parsed document");
    Ok(docs)
  }

  // <code-block> := <function> | <var-declaration> | <ext-define> |
  //                 <property-literal> | <maybe-assignment> | <string>
  #[instrument(skip_all)]
  pub fn parse_code_block(&mut self) -> Result<Code, ParseError> {
    let shape = self.shape();
    trace!(?shape);
    match shape {
      Shape::Function => self.parse_function().map(Code::Function),
      Shape::VarDecl => {
        self.stream.consume_expecting(&[lit("var")])?;
        self.parse_maybe_assignment()
      }
      Shape::ClassDefinition => self.parse_class_definition().map(Code::ExtDefine),
      Shape::Property => self.parse_property(),
      Shape::PropertyAfterComma => {
        self.stream.consume_expecting(&[lit(",")])?;
        self.parse_property()
      }
      Shape::MaybeAssignment => self.parse_maybe_assignment(),
      Shape::StringName => {
        let name = self.consume_text(&[STRING])?;
        Ok(Code::Assignment(Assignment { left: vec![name], right: None }))
      }
      Shape::Nop => Ok(Code::Nop),
    }
  }

  fn shape(&self) -> Shape {
    if self.look(&[lit("function")]) {
      Shape::Function
    } else if self.look(&[lit("var")]) {
      Shape::VarDecl
    } else if self.look(&DEFINE) || self.look(&CLASS_MANAGER_CREATE) {
      Shape::ClassDefinition
    } else if self.look(&[IDENT, lit(":")]) || self.look(&[STRING, lit(":")]) {
      Shape::Property
    } else if self.look(&[lit(","), IDENT, lit(":")]) || self.look(&[lit(","), STRING, lit(":")]) {
      Shape::PropertyAfterComma
    } else if self.look(&[IDENT]) || self.look(&[lit("this")]) {
      Shape::MaybeAssignment
    } else if self.look(&[STRING]) {
      Shape::StringName
    } else {
      Shape::Nop
    }
  }

  // <function> := "function" [ <ident> ] "(" [ <ident> [ "," <ident> ]* ] ")" "{"
  #[instrument(skip_all)]
  fn parse_function(&mut self) -> Result<Function, ParseError> {
    self.stream.consume_expecting(&[lit("function")])?;
    let name = if self.look(&[IDENT]) {
      Some(self.consume_text(&[IDENT])?)
    } else {
      None
    };
    self.stream.consume_expecting(&[lit("(")])?;
    let mut params = Vec::new();
    if self.look(&[IDENT]) {
      params.push(Param { name: self.consume_text(&[IDENT])? });
      while self.look(&[lit(","), IDENT]) {
        params.push(Param {
          name: self.consume_text(&[lit(","), IDENT])?,
        });
      }
    }
    self.stream.consume_expecting(&[lit(")")])?;
    // the body is left to the document scanner
    self.stream.consume_expecting(&[lit("{")])?;
    Ok(Function { name, params })
  }

  // <maybe-assignment> := <ident-chain> [ "=" <expression> ]
  #[instrument(skip_all)]
  fn parse_maybe_assignment(&mut self) -> Result<Code, ParseError> {
    let left = self.parse_ident_chain()?;
    let right = if self.look(&[lit("=")]) {
      self.stream.consume_expecting(&[lit("=")])?;
      self.parse_expr()?
    } else {
      None
    };
    Ok(Code::Assignment(Assignment {
      left,
      right: right.map(Box::new),
    }))
  }

  // <property-literal> := ( <ident> | <string> ) ":" <expression>
  #[instrument(skip_all)]
  fn parse_property(&mut self) -> Result<Code, ParseError> {
    let key = if self.look(&[IDENT]) {
      self.consume_text(&[IDENT])?
    } else {
      self.consume_text(&[STRING])?
    };
    self.stream.consume_expecting(&[lit(":")])?;
    let right = self.parse_expr()?;
    Ok(Code::Assignment(Assignment {
      left: vec![key],
      right: right.map(Box::new),
    }))
  }

  // <ident-chain> := ( "this" | <ident> ) [ "." <ident> ]*
  #[instrument(skip_all)]
  pub fn parse_ident_chain(&mut self) -> Result<Vec<String>, ParseError> {
    let first = if self.look(&[lit("this")]) {
      self.consume_text(&[lit("this")])?
    } else {
      self.consume_text(&[IDENT])?
    };
    let mut chain = vec![first];
    while self.look(&[lit("."), IDENT]) {
      chain.push(self.consume_text(&[lit("."), IDENT])?);
    }
    Ok(chain)
  }

  // <expression> := <function> | <ext-extend> | <literal>
  #[instrument(skip_all)]
  fn parse_expr(&mut self) -> Result<Option<Code>, ParseError> {
    if self.look(&[lit("function")]) {
      return self.parse_function().map(|f| Some(Code::Function(f)));
    }
    if self.look(&EXTEND_IDENT) || self.look(&EXTEND_THIS) {
      return self.parse_ext_extend().map(Some);
    }
    Ok(self.parse_literal_expr())
  }

  // <ext-extend> := "Ext" "." "extend" "(" <ident-chain> ...
  #[instrument(skip_all)]
  fn parse_ext_extend(&mut self) -> Result<Code, ParseError> {
    self.stream.consume_expecting(&EXTEND_CALL)?;
    Ok(Code::ExtExtend {
      extend: self.parse_ident_chain()?,
    })
  }

  #[instrument(skip_all)]
  fn parse_literal_expr(&mut self) -> Option<Code> {
    let start = self.stream.position();
    let literal = literal::parse(&mut self.stream)?;
    let end_line = self.stream.prev().map_or(1, |token| token.line);
    if !self.at_expr_end(end_line) {
      trace!(%literal, "literal does not end the expression");
      self.stream.rewind(start);
      return None;
    }
    Some(Code::Literal {
      class_name: literal.class_name().map(str::to_string),
      value: literal.render(),
    })
  }

  // `,` `;` and `}` close an expression, and for our purposes so do the
  // next doc-comment, a line break and the end of input
  fn at_expr_end(&self, end_line: u32) -> bool {
    self.look(&[lit(",")])
      || self.look(&[lit(";")])
      || self.look(&[lit("}")])
      || self.look(&[DOC_COMMENT])
      || self.stream.peek().is_none_or(|token| token.line > end_line)
  }

  fn look(&self, pattern: &[Pat]) -> bool {
    self.stream.look(pattern)
  }

  fn consume_text(&mut self, pattern: &[Pat]) -> Result<String, ParseError> {
    let token = self.stream.consume_expecting(pattern)?;
    Ok(self.stream.text(token).to_string())
  }
}

#[cfg(test)]
static INIT: Once = Once::new();

#[cfg(test)]
fn configure_test_tracing() {
  INIT.call_once(|| {
    let subscriber = fmt::Subscriber::builder()
      .with_env_filter(EnvFilter::from_default_env())
      .with_test_writer()
      .with_span_events(FmtSpan::ACTIVE)
      .finish();
    tracing::subscriber::set_global_default(subscriber)
      .expect("setting default tracing subscriber failed");
  });
}
