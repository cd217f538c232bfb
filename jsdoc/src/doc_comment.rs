use serde::Serialize;

const NAMED_TAGS: &[&str] = &[
  "param", "cfg", "property", "event", "method", "class", "extends", "member", "alias", "mixins",
  "requires", "uses",
];

/// One `@tag` of a doc-comment. The text before the first tag is
/// reported as a tag named `doc`.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct Tag {
  pub tag: String,
  #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
  pub type_expr: Option<String>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub name: Option<String>,
  #[serde(skip_serializing_if = "std::ops::Not::not")]
  pub optional: bool,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub default: Option<String>,
  pub text: String,
}

/// Turns the raw text of a doc-comment into tags.
pub trait CommentParser {
  fn parse(&self, raw: &str) -> Vec<Tag>;
}

impl<F> CommentParser for F
where
  F: Fn(&str) -> Vec<Tag>,
{
  fn parse(&self, raw: &str) -> Vec<Tag> {
    self(raw)
  }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct DocParser;

impl CommentParser for DocParser {
  fn parse(&self, raw: &str) -> Vec<Tag> {
    let text = purify(raw);
    let starts = tag_starts(&text);
    let intro_end = starts.first().copied().unwrap_or(text.len());
    let mut tags = Vec::with_capacity(starts.len() + 1);
    let intro = text[..intro_end].trim();
    if !intro.is_empty() {
      tags.push(Tag {
        tag: "doc".to_string(),
        text: intro.to_string(),
        ..Tag::default()
      });
    }
    for (i, start) in starts.iter().enumerate() {
      let end = starts.get(i + 1).copied().unwrap_or(text.len());
      tags.push(parse_tag(&text[*start + 1..end]));
    }
    tags
  }
}

/// Strips the ` * ` margin from every line.
fn purify(raw: &str) -> String {
  raw
    .lines()
    .map(|line| match line.trim_start().strip_prefix('*') {
      Some(rest) => rest.strip_prefix(' ').unwrap_or(rest),
      None => line,
    })
    .collect::<Vec<_>>()
    .join("\n")
    .trim()
    .to_string()
}

// `@` at the start or after whitespace, followed by a letter
fn tag_starts(text: &str) -> Vec<usize> {
  let bytes = text.as_bytes();
  (0..bytes.len())
    .filter(|&i| {
      bytes[i] == b'@'
        && (i == 0 || bytes[i - 1].is_ascii_whitespace())
        && bytes.get(i + 1).is_some_and(u8::is_ascii_alphabetic)
    })
    .collect()
}

fn parse_tag(body: &str) -> Tag {
  let name_len = body
    .find(|c: char| !(c.is_ascii_alphanumeric() || c == '_'))
    .unwrap_or(body.len());
  let (name, rest) = body.split_at(name_len);
  let mut tag = Tag {
    tag: name.to_string(),
    ..Tag::default()
  };
  let mut rest = rest.trim_start();
  if let Some(close) = rest.strip_prefix('{').and_then(closing_brace) {
    tag.type_expr = Some(rest[1..close + 1].trim().to_string());
    rest = rest[close + 2..].trim_start();
  }
  if NAMED_TAGS.contains(&name) {
    rest = parse_name(rest, &mut tag);
  }
  tag.text = rest.trim().to_string();
  tag
}

/// Offset of the `}` closing an already opened brace.
fn closing_brace(text: &str) -> Option<usize> {
  let mut depth = 0;
  for (i, ch) in text.char_indices() {
    match ch {
      '{' => depth += 1,
      '}' if depth == 0 => return Some(i),
      '}' => depth -= 1,
      _ => {}
    }
  }
  None
}

// `name` | `[name]` | `[name=default]`
fn parse_name<'a>(rest: &'a str, tag: &mut Tag) -> &'a str {
  if let Some(inner) = rest.strip_prefix('[') {
    if let Some(close) = inner.find(']') {
      let (name, default) = match inner[..close].split_once('=') {
        Some((name, default)) => (name, Some(default.trim().to_string())),
        None => (&inner[..close], None),
      };
      tag.name = Some(name.trim().to_string());
      tag.optional = true;
      tag.default = default;
      return &inner[close + 1..];
    }
  }
  let end = rest.find(char::is_whitespace).unwrap_or(rest.len());
  if end > 0 {
    tag.name = Some(rest[..end].to_string());
  }
  &rest[end..]
}
