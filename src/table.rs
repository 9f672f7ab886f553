use rustc_hash::FxHashMap;

use crate::intern::Symbol;
use crate::token::{TokenArray, TokenKind};

/// Entries the table is sized for up front.
const TABLE_CAPACITY: usize = 1024;

/// Whether a macro takes an argument list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MacroKind {
  ObjectLike,
  FunctionLike,
}

/// A macro definition.
///
/// Once stored, a definition never changes, with one exception: slot 0 of
/// the `__FILE__` and `__LINE__` replacement lists is rewritten on every
/// lookup to reflect the current source position.
#[derive(Debug, Clone)]
pub struct Macro {
  pub name: Symbol,
  pub kind: MacroKind,
  /// Arity; zero for object-like macros.
  pub params: u32,
  /// Replacement list; `Param` tokens refer to arguments by index.
  pub replacement: TokenArray,
  /// Cached: the replacement contains `#` followed by a parameter.
  pub(crate) stringify: bool,
  pub(crate) is_file: bool,
  pub(crate) is_line: bool,
}

impl Macro {
  /// An object-like macro.
  pub fn object(name: Symbol, replacement: TokenArray) -> Self {
    Self {
      name,
      kind: MacroKind::ObjectLike,
      params: 0,
      replacement,
      stringify: false,
      is_file: false,
      is_line: false,
    }
  }

  /// A function-like macro with `params` parameters.
  pub fn function(name: Symbol, params: u32, replacement: TokenArray) -> Self {
    Self {
      name,
      kind: MacroKind::FunctionLike,
      params,
      replacement,
      stringify: false,
      is_file: false,
      is_line: false,
    }
  }

  pub(crate) fn has_stringify_replacement(&self) -> bool {
    self
      .replacement
      .windows(2)
      .any(|w| w[0].is_punct(b'#') && matches!(w[1].kind, TokenKind::Param(_)))
  }
}

/// Macro equality as used by redefinition checks: kind, arity, name, and the
/// replacement lists compared token by token. Cached flags do not
/// participate.
impl PartialEq for Macro {
  fn eq(&self, other: &Self) -> bool {
    self.kind == other.kind
      && self.params == other.params
      && self.name == other.name
      && self.replacement == other.replacement
  }
}

impl Eq for Macro {}

/// The name → definition map.
#[derive(Debug)]
pub struct MacroTable {
  macros: FxHashMap<Symbol, Macro>,
}

impl MacroTable {
  pub fn new() -> Self {
    Self { macros: FxHashMap::with_capacity_and_hasher(TABLE_CAPACITY, Default::default()) }
  }

  pub fn lookup(&self, name: Symbol) -> Option<&Macro> {
    self.macros.get(&name)
  }

  pub(crate) fn lookup_mut(&mut self, name: Symbol) -> Option<&mut Macro> {
    self.macros.get_mut(&name)
  }

  /// Insert `m` and return the stored entry. If an entry with the same name
  /// already exists, `m` is dropped and the existing entry is returned.
  pub fn insert(&mut self, m: Macro) -> &Macro {
    self.macros.entry(m.name).or_insert(m)
  }

  /// Delete and return the entry for `name`, if any.
  pub fn remove(&mut self, name: Symbol) -> Option<Macro> {
    self.macros.remove(&name)
  }

  /// Remove and yield every entry. Iteration order is unspecified.
  pub(crate) fn drain(&mut self) -> impl Iterator<Item = Macro> + '_ {
    self.macros.drain().map(|(_, m)| m)
  }

  pub fn len(&self) -> usize {
    self.macros.len()
  }

  pub fn is_empty(&self) -> bool {
    self.macros.is_empty()
  }
}

impl Default for MacroTable {
  fn default() -> Self {
    Self::new()
  }
}
