use crate::builtin::Standard;
use crate::error::ExpansionError;
use crate::intern::{Interner, Symbol};
use crate::pool::TokenArrayPool;
use crate::table::{Macro, MacroTable};
use crate::token::{Token, TokenArray, TokenKind};
use crate::tokenize;

/// The macro expansion engine.
///
/// Owns the definition table, the token array pool, the string interner, and
/// the stack of names whose expansion is currently in progress. Definitions
/// are added with [`define`](Self::define) and removed with
/// [`undef`](Self::undef); [`expand`](Self::expand) rewrites a token stream
/// in place, replacing every non-disabled macro invocation by its fully
/// rescanned expansion.
///
/// The engine is single-threaded; one `MacroSet` serves one translation unit
/// at a time.
///
/// # Example
///
/// ```
/// # fn main() -> Result<(), cexpand::ExpansionError> {
/// use cexpand::{Macro, MacroSet};
///
/// let mut macro_set = MacroSet::new();
///
/// let name = macro_set.intern("ANSWER");
/// let replacement = macro_set.lex("42")?;
/// macro_set.define(Macro::object(name, replacement))?;
///
/// let mut line = macro_set.lex("ANSWER + 1")?;
/// macro_set.expand(&mut line)?;
/// assert_eq!(macro_set.render(&line), "42 + 1");
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct MacroSet {
  pub(crate) table: MacroTable,
  pub(crate) pool: TokenArrayPool,
  pub(crate) interner: Interner,
  pub(crate) expand_stack: Vec<Symbol>,
  pub(crate) standard: Standard,
  current_file: Symbol,
  current_line: u32,
  sym_file: Symbol,
  sym_line: Symbol,
}

impl MacroSet {
  /// Create an engine targeting C99.
  pub fn new() -> Self {
    Self::with_standard(Standard::C99)
  }

  /// Create an engine targeting `standard`.
  pub fn with_standard(standard: Standard) -> Self {
    let mut interner = Interner::new();
    let sym_file = interner.intern("__FILE__");
    let sym_line = interner.intern("__LINE__");
    let current_file = interner.intern("");

    Self {
      table: MacroTable::new(),
      pool: TokenArrayPool::new(),
      interner,
      expand_stack: Vec::new(),
      standard,
      current_file,
      current_line: 1,
      sym_file,
      sym_line,
    }
  }

  /// Intern a string with this engine's interner.
  pub fn intern(&mut self, s: &str) -> Symbol {
    self.interner.intern(s)
  }

  /// The engine's interner, e.g. for resolving token payloads.
  pub fn interner(&self) -> &Interner {
    &self.interner
  }

  /// Point `__FILE__` and `__LINE__` at the given source position.
  pub fn set_location(&mut self, file: &str, line: u32) {
    self.current_file = self.interner.intern(file);
    self.current_line = line;
  }

  /// Update only the line number.
  pub fn set_line(&mut self, line: u32) {
    self.current_line = line;
  }

  /// Tokenize `input` with this engine's interner.
  pub fn lex(&mut self, input: &str) -> Result<TokenArray, ExpansionError> {
    tokenize::lex(input, &mut self.interner)
  }

  /// Hand out a transient token array from the pool.
  pub fn get_token_array(&mut self) -> TokenArray {
    self.pool.acquire()
  }

  /// Return a transient token array to the pool.
  pub fn release_token_array(&mut self, list: TokenArray) {
    self.pool.release(list)
  }

  /// Define `m`, taking ownership of its replacement list.
  ///
  /// Redefinition is permitted only when the new definition equals the
  /// existing one; the incoming replacement is then recycled and the stored
  /// entry kept.
  pub fn define(&mut self, mut m: Macro) -> Result<(), ExpansionError> {
    if let Some(existing) = self.table.lookup(m.name) {
      if *existing != m {
        return Err(ExpansionError::Redefinition(self.interner.resolve(m.name).to_owned()))
      }

      self.pool.release(m.replacement);
      return Ok(())
    }

    m.stringify = m.has_stringify_replacement();
    m.is_file = m.name == self.sym_file;
    m.is_line = m.name == self.sym_line;
    self.table.insert(m);
    Ok(())
  }

  /// Remove the definition of `name`, recycling its replacement list.
  pub fn undef(&mut self, name: Symbol) {
    if let Some(m) = self.table.remove(name) {
      self.pool.release(m.replacement);
    }
  }

  /// Look up `name`.
  ///
  /// A hit on `__FILE__` or `__LINE__` first rewrites slot 0 of the stored
  /// replacement with the current file path or line number.
  pub fn definition(&mut self, name: Symbol) -> Option<&Macro> {
    let (is_file, is_line) = match self.table.lookup(name) {
      Some(m) => (m.is_file, m.is_line),
      None => return None,
    };

    let refreshed = if is_file {
      Some(Token::new(TokenKind::Str(self.current_file)))
    } else if is_line {
      let sym = self.interner.intern(&self.current_line.to_string());
      Some(Token::new(TokenKind::PrepNumber(sym)))
    } else {
      None
    };

    if let Some(t) = refreshed {
      if let Some(slot) = self.table.lookup_mut(name).and_then(|m| m.replacement.first_mut()) {
        *slot = t;
      }
    }

    self.table.lookup(name)
  }

  pub(crate) fn is_macro_expanded(&self, name: Symbol) -> bool {
    self.expand_stack.contains(&name)
  }

  /// Drop every definition, recycling the replacement lists, and reset the
  /// expansion state. The engine stays usable, e.g. for the next
  /// translation unit.
  pub fn clear(&mut self) {
    self.expand_stack.clear();

    for m in self.table.drain() {
      self.pool.release(m.replacement);
    }
  }

  /// Textual join of a token stream.
  ///
  /// A single space separates two tokens wherever leading whitespace was
  /// recorded; `EmptyArg` sentinels vanish.
  pub fn render(&self, list: &TokenArray) -> String {
    let mut out = String::new();

    for t in list {
      if let TokenKind::EmptyArg = t.kind {
        continue
      }

      if !out.is_empty() && t.leading_whitespace > 0 {
        out.push(' ');
      }
      out.push_str(&t.spelling(&self.interner));
    }

    out
  }

  /// Bracketed dump of a token stream for diagnostics.
  pub fn format_token_array(&self, list: &TokenArray) -> String {
    let mut out = String::from("[");

    for (i, t) in list.iter().enumerate() {
      if i > 0 {
        out.push_str(", ");
      }

      match t.kind {
        TokenKind::Param(p) => out.push_str(&format!("<param {p}>")),
        TokenKind::EmptyArg => out.push_str("<no-arg>"),
        TokenKind::Newline => out.push_str("'\\n'"),
        _ => {
          out.push('\'');
          for _ in 0..t.leading_whitespace {
            out.push(' ');
          }
          out.push_str(&t.spelling(&self.interner));
          out.push('\'');
        },
      }
    }

    out.push_str(&format!("] ({})", list.len()));
    out
  }
}

impl Default for MacroSet {
  fn default() -> Self {
    Self::new()
  }
}
