use super::*;

impl<C: CommentParser> Parser<C> {
  // <ext-define> := "Ext" "." ( "define" | "ClassManager" "." "create" ) "(" <string>
  //                 [ "," <ext-define-cfg> ]
  #[instrument(skip_all)]
  pub fn parse_class_definition(&mut self) -> Result<ClassConfig, ParseError> {
    if self.look(&CLASS_MANAGER_CREATE) {
      self.stream.consume_expecting(&CLASS_MANAGER_CREATE[..6])?;
    } else {
      self.stream.consume_expecting(&DEFINE[..4])?;
    }
    let name = self.consume_text(&[STRING])?;
    let fields = if self.look(&[lit(","), lit("{")]) {
      self.stream.consume_expecting(&[lit(",")])?;
      self.parse_class_fields()?
    } else if self.look(&[lit(",")]) {
      // config given some other way, e.g. as a function
      Vec::new()
    } else {
      self.stream.consume_expecting(&[lit(")")])?;
      Vec::new()
    };
    debug!(%name, fields = fields.len(), "class definition");
    Ok(ClassConfig::from_fields(name, fields))
  }

  // <ext-define-cfg> := "{" [ <class-field> [ "," ] ]* [ "}" ]
  fn parse_class_fields(&mut self) -> Result<Vec<ClassField>, ParseError> {
    self.stream.consume_expecting(&[lit("{")])?;
    let mut fields = Vec::new();
    while let Some(field) = self.parse_class_field()? {
      trace!(?field);
      fields.push(field);
      if self.look(&[lit(",")]) {
        self.stream.next();
      }
    }
    if self.look(&[lit("}")]) {
      self.stream.next();
    }
    Ok(fields)
  }

  fn parse_class_field(&mut self) -> Result<Option<ClassField>, ParseError> {
    if self.look(&[lit("extend"), lit(":"), STRING]) {
      let extend = self.consume_text(&[lit("extend"), lit(":"), STRING])?;
      Ok(Some(ClassField::Extend(extend)))
    } else if self.look(&[lit("mixins"), lit(":"), lit("{")]) {
      self.stream.consume_expecting(&[lit("mixins"), lit(":")])?;
      Ok(literal::parse(&mut self.stream).map(|mixins| ClassField::Mixins(mixin_names(mixins))))
    } else if self.look(&[lit("alternateClassName"), lit(":")]) {
      self
        .stream
        .consume_expecting(&[lit("alternateClassName"), lit(":")])?;
      Ok(Some(ClassField::AlternateClassNames(self.parse_string_or_list())))
    } else if self.look(&[lit("alias"), lit(":")]) {
      self.stream.consume_expecting(&[lit("alias"), lit(":")])?;
      Ok(Some(ClassField::Alias(self.parse_string_or_list())))
    } else if self.look(&[IDENT, lit(":")]) {
      let key = self.consume_text(&[IDENT])?;
      self.stream.consume_expecting(&[lit(":")])?;
      Ok(literal::parse(&mut self.stream).map(|value| ClassField::Other(key, value)))
    } else {
      Ok(None)
    }
  }

  // <string-or-list> := <string> | <array-literal>
  fn parse_string_or_list(&mut self) -> Vec<String> {
    match literal::parse(&mut self.stream) {
      Some(Literal::Str(name)) => vec![name],
      Some(Literal::Array(items)) => items.iter().map(Literal::text).collect(),
      _ => Vec::new(),
    }
  }
}

/// `{key: value, ...}` to the values. Only that one level of nesting is
/// understood: a compound value comes out as its rendered source.
fn mixin_names(mixins: Literal) -> Vec<String> {
  match mixins {
    Literal::Object(props) => props.iter().map(|prop| prop.value.text()).collect(),
    _ => Vec::new(),
  }
}
