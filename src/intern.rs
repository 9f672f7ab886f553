use std::rc::Rc;

use rustc_hash::FxHashMap;

/// A handle to an interned string.
///
/// Handles are cheap to copy and compare equal iff the strings they were
/// interned from are byte-equal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Symbol(u32);

/// A deduplicating string store handing out [`Symbol`] handles.
#[derive(Debug, Default)]
pub struct Interner {
  lookup: FxHashMap<Rc<str>, Symbol>,
  strings: Vec<Rc<str>>,
}

impl Interner {
  /// Create an empty interner.
  pub fn new() -> Self {
    Self::default()
  }

  /// Intern `s`, returning the existing handle if it was seen before.
  pub fn intern(&mut self, s: &str) -> Symbol {
    if let Some(&sym) = self.lookup.get(s) {
      return sym
    }

    let sym = Symbol(self.strings.len() as u32);
    let s: Rc<str> = Rc::from(s);
    self.strings.push(Rc::clone(&s));
    self.lookup.insert(s, sym);
    sym
  }

  /// The string `sym` was created from.
  pub fn resolve(&self, sym: Symbol) -> &str {
    &self.strings[sym.0 as usize]
  }
}
