use std::fmt::{self, Write};

use serde::Serialize;

use crate::internal::{TokenKind as T, *};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum Literal {
  #[serde(rename = "string")]
  Str(String),
  Number(String),
  Regex(String),
  /// bare identifier, `true`/`false` among them
  Ident(String),
  Array(Vec<Literal>),
  Object(Vec<Property>),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Property {
  pub key: Literal,
  pub value: Literal,
}

/// Parses one literal at the cursor. `None` means no literal starts here,
/// in which case nothing has been consumed.
#[instrument(skip_all)]
pub fn parse(stream: &mut TokenStream) -> Option<Literal> {
  let start = stream.position();
  let literal = parse_at_cursor(stream);
  if literal.is_none() {
    stream.rewind(start);
  }
  literal
}

fn parse_at_cursor(stream: &mut TokenStream) -> Option<Literal> {
  let token = stream.peek()?;
  let text = stream.text(token).to_string();
  let literal = match token.kind {
    T::Str => Literal::Str(text),
    T::Number => Literal::Number(text),
    T::Regex => Literal::Regex(text),
    T::Ident => Literal::Ident(text),
    T::Punct if text == "[" => return array(stream),
    T::Punct if text == "{" => return object(stream),
    T::Punct | T::Keyword | T::DocComment => return None,
  };
  stream.next();
  Some(literal)
}

// "[" [ <literal> [ "," <literal> ]* ] "]"
fn array(stream: &mut TokenStream) -> Option<Literal> {
  stream.next(); // `[`
  let mut items = Vec::new();
  while let Some(item) = parse(stream) {
    items.push(item);
    if !stream.look(&[lit(",")]) {
      break;
    }
    stream.next();
  }
  if !stream.look(&[lit("]")]) {
    return None;
  }
  stream.next();
  Some(Literal::Array(items))
}

// "{" [ <key> ":" <literal> [ "," <key> ":" <literal> ]* ] "}"
fn object(stream: &mut TokenStream) -> Option<Literal> {
  stream.next(); // `{`
  let mut props = Vec::new();
  while stream.look(&[IDENT]) || stream.look(&[STRING]) {
    let key = parse(stream)?;
    if !stream.look(&[lit(":")]) {
      return None;
    }
    stream.next();
    let value = parse(stream)?;
    props.push(Property { key, value });
    if !stream.look(&[lit(",")]) {
      break;
    }
    stream.next();
  }
  if !stream.look(&[lit("}")]) {
    return None;
  }
  stream.next();
  Some(Literal::Object(props))
}

impl Literal {
  /// Built-in class the literal is an instance of, when its shape tells.
  pub fn class_name(&self) -> Option<&'static str> {
    match self {
      Literal::Str(_) => Some("String"),
      Literal::Number(_) => Some("Number"),
      Literal::Regex(_) => Some("RegExp"),
      Literal::Array(_) => Some("Array"),
      Literal::Object(_) => Some("Object"),
      Literal::Ident(value) if value == "true" || value == "false" => Some("Boolean"),
      Literal::Ident(_) => None,
    }
  }

  /// Canonical source text, see the `Display` impl.
  pub fn render(&self) -> String {
    self.to_string()
  }

  /// Raw value of a scalar literal, or the rendering of an array/object.
  pub fn text(&self) -> String {
    match self {
      Literal::Str(value) | Literal::Number(value) | Literal::Regex(value) | Literal::Ident(value) => {
        value.clone()
      }
      Literal::Array(_) | Literal::Object(_) => self.render(),
    }
  }
}

/// Normalized source form: double-quoted strings, `", "` separators,
/// `key: value` pairs, everything else verbatim.
impl fmt::Display for Literal {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      Literal::Str(value) => write_quoted(f, value),
      Literal::Number(value) | Literal::Regex(value) | Literal::Ident(value) => f.write_str(value),
      Literal::Array(items) => {
        f.write_char('[')?;
        for (i, item) in items.iter().enumerate() {
          if i > 0 {
            f.write_str(", ")?;
          }
          write!(f, "{item}")?;
        }
        f.write_char(']')
      }
      Literal::Object(props) => {
        f.write_char('{')?;
        for (i, Property { key, value }) in props.iter().enumerate() {
          if i > 0 {
            f.write_str(", ")?;
          }
          write!(f, "{key}: {value}")?;
        }
        f.write_char('}')
      }
    }
  }
}

fn write_quoted(f: &mut fmt::Formatter<'_>, value: &str) -> fmt::Result {
  f.write_char('"')?;
  for ch in value.chars() {
    match ch {
      '"' => f.write_str("\\\"")?,
      '\\' => f.write_str("\\\\")?,
      '\n' => f.write_str("\\n")?,
      '\r' => f.write_str("\\r")?,
      '\t' => f.write_str("\\t")?,
      c if c.is_control() => write!(f, "\\u{:04x}", c as u32)?,
      c => f.write_char(c)?,
    }
  }
  f.write_char('"')
}

#[cfg(test)]
mod tests {
  use super::*;
  use pretty_assertions::assert_eq;
  use Literal as L;

  fn parse_str(src: &str) -> (Option<Literal>, TokenStream) {
    let mut stream = TokenStream::new_str(src, Options::default());
    let literal = parse(&mut stream);
    (literal, stream)
  }

  fn s(value: &str) -> Literal {
    L::Str(value.to_string())
  }

  fn n(value: &str) -> Literal {
    L::Number(value.to_string())
  }

  #[test]
  fn scalars() {
    assert_eq!(parse_str("'foo'").0, Some(s("foo")));
    assert_eq!(parse_str("3.5").0, Some(n("3.5")));
    assert_eq!(parse_str("= /^a+$/i").0, None);
    assert_eq!(parse_str("true").0, Some(L::Ident("true".to_string())));
  }

  #[test]
  fn regex_after_assignment() {
    let mut stream = TokenStream::new_str("x = /^a+$/i", Options::default());
    stream.next();
    stream.next();
    assert_eq!(parse(&mut stream), Some(L::Regex("/^a+$/i".to_string())));
  }

  #[test]
  fn nested_array_and_object() {
    let (literal, stream) = parse_str("[1, 'two', {a: [3], \"b c\": false}] ;");
    assert_eq!(
      literal,
      Some(L::Array(vec![
        n("1"),
        s("two"),
        L::Object(vec![
          Property {
            key: L::Ident("a".to_string()),
            value: L::Array(vec![n("3")]),
          },
          Property {
            key: s("b c"),
            value: L::Ident("false".to_string()),
          },
        ]),
      ]))
    );
    assert!(stream.look(&[lit(";")]));
  }

  #[test]
  fn empty_containers_and_trailing_comma() {
    assert_eq!(parse_str("[]").0, Some(L::Array(vec![])));
    assert_eq!(parse_str("{}").0, Some(L::Object(vec![])));
    assert_eq!(parse_str("[1, 2,]").0, Some(L::Array(vec![n("1"), n("2")])));
  }

  #[test]
  fn absence_consumes_nothing() {
    for src in ["function() {}", "+ 1", "[1, +]", "{a: }", "{a 1}", "[1, 2", ")"] {
      let (literal, stream) = parse_str(src);
      assert_eq!(literal, None, "{src}");
      assert_eq!(stream.position(), idx::TokenPos::new(0), "{src}");
    }
  }

  #[test]
  fn class_names() {
    let cases = [
      ("'x'", Some("String")),
      ("1", Some("Number")),
      ("[]", Some("Array")),
      ("{}", Some("Object")),
      ("true", Some("Boolean")),
      ("false", Some("Boolean")),
      ("null", None),
      ("undefined", None),
    ];
    for (src, expected) in cases {
      let literal = parse_str(src).0.unwrap();
      assert_eq!(literal.class_name(), expected, "{src}");
    }
    assert_eq!(L::Regex("/x/".to_string()).class_name(), Some("RegExp"));
  }

  #[test]
  fn canonical_rendering() {
    let (literal, _) = parse_str("[ 1,'a\"b' ,{ x :true,'y':[ ] } ,\n/re/g ]");
    let literal = literal.unwrap();
    assert_eq!(literal.render(), r#"[1, "a\"b", {x: true, "y": []}, /re/g]"#);
  }

  #[test]
  fn string_escapes_render() {
    let literal = s("line\nbreak\ttab\\slash\u{1}");
    assert_eq!(literal.to_string(), r#""line\nbreak\ttab\\slash\u0001""#);
  }

  #[test]
  fn rendering_reparses_to_same_literal() {
    let inputs = [
      "'it\\'s'",
      "[1, [2, [3]], 'x\\ny']",
      "{a: 1, 'b-c': {d: /x\\/y/}, e: [true, null]}",
      "\"tab\\there\\u0007\"",
    ];
    for src in inputs {
      let first = parse_str(src).0.unwrap();
      let rendered = first.render();
      let second = parse_str(&rendered).0.unwrap();
      assert_eq!(first, second, "{src} -> {rendered}");
      assert_eq!(second.render(), rendered);
    }
  }

  #[test]
  fn scalar_text_and_compound_rendering() {
    assert_eq!(s("Ext.util.Observable").text(), "Ext.util.Observable");
    assert_eq!(L::Array(vec![s("a")]).text(), "[\"a\"]");
  }
}
