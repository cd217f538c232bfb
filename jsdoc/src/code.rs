use serde::Serialize;

use crate::internal::*;

/// One doc-comment and the code that follows it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DocRecord {
  pub comment: Vec<Tag>,
  /// line of the opening `/**`
  pub linenr: u32,
  pub code: Code,
}

/// Shape of the code following a doc-comment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Code {
  Function(Function),
  Assignment(Assignment),
  ExtDefine(ClassConfig),
  ExtExtend {
    extend: Vec<String>,
  },
  Literal {
    #[serde(rename = "class")]
    class_name: Option<String>,
    value: String,
  },
  Nop,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Function {
  pub name: Option<String>,
  pub params: Vec<Param>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Param {
  pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Assignment {
  pub left: Vec<String>,
  pub right: Option<Box<Code>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct ClassConfig {
  pub name: String,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub extend: Option<String>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub mixins: Option<Vec<String>>,
  #[serde(rename = "alternateClassNames", skip_serializing_if = "Option::is_none")]
  pub alternate_class_names: Option<Vec<String>>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub alias: Option<Vec<String>>,
  /// every other config key, in source order
  #[serde(skip_serializing_if = "Vec::is_empty")]
  pub fields: Vec<ConfigEntry>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConfigEntry {
  pub key: String,
  pub value: Literal,
}

/// One recognized entry of a class-definition config object.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClassField {
  Extend(String),
  Mixins(Vec<String>),
  AlternateClassNames(Vec<String>),
  Alias(Vec<String>),
  Other(String, Literal),
}

impl ClassConfig {
  /// Folds parsed fields into a config; a repeated key keeps its last value.
  pub fn from_fields(name: String, fields: impl IntoIterator<Item = ClassField>) -> Self {
    let init = ClassConfig { name, ..ClassConfig::default() };
    fields.into_iter().fold(init, |mut cfg, field| {
      match field {
        ClassField::Extend(extend) => cfg.extend = Some(extend),
        ClassField::Mixins(mixins) => cfg.mixins = Some(mixins),
        ClassField::AlternateClassNames(names) => cfg.alternate_class_names = Some(names),
        ClassField::Alias(alias) => cfg.alias = Some(alias),
        ClassField::Other(key, value) => match cfg.fields.iter_mut().find(|e| e.key == key) {
          Some(entry) => entry.value = value,
          None => cfg.fields.push(ConfigEntry { key, value }),
        },
      }
      cfg
    })
  }

  pub fn field(&self, key: &str) -> Option<&Literal> {
    self
      .fields
      .iter()
      .find(|entry| entry.key == key)
      .map(|entry| &entry.value)
  }
}

impl Code {
  pub const fn is_nop(&self) -> bool {
    matches!(self, Code::Nop)
  }
}

/// Serializes records for the renderer.
pub fn to_json(records: &[DocRecord]) -> serde_json::Result<String> {
  serde_json::to_string_pretty(records)
}
