pub mod code;
pub mod context;
pub mod doc_comment;
pub mod error;
pub mod idx;
pub mod lexer;
pub mod literal;
pub mod options;
pub mod parser;
pub mod str_pool;
pub mod stream;
pub mod token;

pub mod internal {
  pub use crate::code::*;
  pub use crate::context::*;
  pub use crate::doc_comment::*;
  pub use crate::error::*;
  pub use crate::idx;
  pub use crate::lexer::*;
  pub use crate::literal::{self, Literal, Property};
  pub use crate::options::*;
  pub use crate::parser::*;
  pub use crate::str_pool::*;
  pub use crate::stream::*;
  pub use crate::token::*;
  pub use tracing::{debug, instrument, trace};
}

pub use code::{Code, DocRecord, to_json};
pub use error::ParseError;
pub use options::Options;
pub use parser::Parser;

/// Extracts every doc-comment of `src` with the code that follows it.
pub fn parse(src: &str) -> Result<Vec<DocRecord>, ParseError> {
  Parser::new_str(src).parse_document()
}

/// Like `parse`, with non-default options.
pub fn parse_with_options(src: &str, options: Options) -> Result<Vec<DocRecord>, ParseError> {
  Parser::with_options(src, options).parse_document()
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::internal::*;
  use pretty_assertions::assert_eq;

  #[test]
  fn extjs_source_file() {
    let src = r#"
/**
 * @class Shop.Cart
 * A shopping cart.
 */
Ext.define('Shop.Cart', {
    extend: 'Ext.util.Observable',
    alias: ['widget.cart'],

    /**
     * @cfg {Number} limit Max number of items.
     */
    limit: 10,

    /**
     * Adds an item.
     * @param {Shop.Item} item
     */
    add: function(item) {
        this.items.push(item);
    }
});
"#;
    let docs = parse(src).unwrap();
    let codes: Vec<&Code> = docs.iter().map(|doc| &doc.code).collect();
    assert_eq!(
      codes,
      vec![
        &Code::ExtDefine(ClassConfig {
          name: "Shop.Cart".to_string(),
          extend: Some("Ext.util.Observable".to_string()),
          alias: Some(vec!["widget.cart".to_string()]),
          ..ClassConfig::default()
        }),
        &Code::Assignment(Assignment {
          left: vec!["limit".to_string()],
          right: Some(Box::new(Code::Literal {
            class_name: Some("Number".to_string()),
            value: "10".to_string(),
          })),
        }),
        &Code::Assignment(Assignment {
          left: vec!["add".to_string()],
          right: Some(Box::new(Code::Function(Function {
            name: None,
            params: vec![Param { name: "item".to_string() }],
          }))),
        }),
      ]
    );
    assert_eq!(docs[0].linenr, 2);
    assert_eq!(docs[0].comment[0].tag, "class");
    assert_eq!(docs[0].comment[0].name.as_deref(), Some("Shop.Cart"));
    assert_eq!(docs[0].comment[0].text, "A shopping cart.");
    assert_eq!(docs[1].comment[0].type_expr.as_deref(), Some("Number"));
    assert_eq!(docs[2].comment[0].text, "Adds an item.");
  }

  #[test]
  fn json_for_the_renderer() {
    let docs = parse_with_options(
      "/** Base */ App.Base = Lib.extend(Object, {});",
      Options::default().with_ext_namespaces(["Lib"]),
    )
    .unwrap();
    let value: serde_json::Value = serde_json::from_str(&to_json(&docs).unwrap()).unwrap();
    assert_eq!(
      value,
      serde_json::json!([{
        "comment": [{"tag": "doc", "text": "Base"}],
        "linenr": 1,
        "code": {
          "type": "assignment",
          "left": ["App", "Base"],
          "right": {"type": "ext_extend", "extend": ["Object"]},
        },
      }])
    );
  }
}
