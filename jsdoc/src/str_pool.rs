use std::collections::HashMap;

use crate::internal::*;

/// Owns the text of every token; tokens only carry an `idx::Str`.
#[derive(Debug)]
pub struct StringPool {
  data: String,
  strs: Vec<Interned>,
  lookup: HashMap<Box<str>, idx::Str>,
}

#[derive(Debug, Clone, Copy)]
struct Interned {
  start: u32,
  len: u32,
}

impl StringPool {
  pub fn new() -> Self {
    let mut pool = Self {
      data: String::with_capacity(1024),
      strs: Vec::with_capacity(64),
      lookup: HashMap::with_capacity(64),
    };
    // special case empty string
    pool.strs.push(Interned { start: 0, len: 0 });
    pool
  }

  pub const fn empty(&self) -> idx::Str {
    idx::Str::new(0)
  }

  pub fn intern(&mut self, s: &str) -> idx::Str {
    if s.is_empty() {
      return self.empty();
    }
    if let Some(index) = self.lookup.get(s) {
      return *index;
    }
    assert!(self.data.len() + s.len() <= u32::MAX as usize);
    let index = idx::Str::new(self.strs.len() as u32);
    self.strs.push(Interned {
      start: self.data.len() as u32,
      len: s.len() as u32,
    });
    self.data.push_str(s);
    self.lookup.insert(s.into(), index);
    index
  }

  /// Index of `s` if it was ever interned, without interning it.
  pub fn find(&self, s: &str) -> Option<idx::Str> {
    if s.is_empty() {
      return Some(self.empty());
    }
    self.lookup.get(s).copied()
  }

  pub fn get(&self, index: idx::Str) -> &str {
    let Interned { start, len } = self.strs[index.usize()];
    &self.data[start as usize..(start + len) as usize]
  }

  pub fn len(&self) -> usize {
    self.strs.len()
  }

  pub fn is_empty(&self) -> bool {
    self.strs.len() == 1
  }
}

impl Default for StringPool {
  fn default() -> Self {
    Self::new()
  }
}
