#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Options {
  /// Identifiers accepted in place of `Ext` in `Ext.define(...)`,
  /// `Ext.ClassManager.create(...)` and `Ext.extend(...)`.
  pub ext_namespaces: Vec<String>,
}

impl Default for Options {
  fn default() -> Self {
    Options {
      ext_namespaces: vec!["Ext".to_string()],
    }
  }
}

impl Options {
  pub fn with_ext_namespaces<I, S>(mut self, namespaces: I) -> Self
  where
    I: IntoIterator<Item = S>,
    S: Into<String>,
  {
    self.ext_namespaces = namespaces.into_iter().map(Into::into).collect();
    self
  }
}
