use crate::error::ExpansionError;
use crate::macro_set::MacroSet;
use crate::table::Macro;
use crate::token::{Token, TokenArray, TokenKind};
use crate::tokenize;

/// Language standard the builtin definitions target.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Standard {
  C89,
  C99,
}

impl MacroSet {
  /// Install the predefined macros.
  ///
  /// `__FILE__` and `__LINE__` are registered with placeholder bodies; every
  /// lookup rewrites them from the position given to
  /// [`set_location`](Self::set_location).
  pub fn register_builtin_definitions(&mut self) -> Result<(), ExpansionError> {
    self.register_macro("__STDC__", "1")?;
    self.register_macro("__STDC_HOSTED__", "1")?;
    self.register_macro("__FILE__", "0")?;
    self.register_macro("__LINE__", "0")?;
    self.register_macro("__x86_64__", "1")?;
    self.register_macro("__inline", "")?;

    match self.standard {
      Standard::C89 => {
        self.register_macro("__STDC_VERSION__", "199409L")?;
        self.register_macro("__STRICT_ANSI__", "")?;
      },
      Standard::C99 => {
        self.register_macro("__STDC_VERSION__", "199901L")?;
      },
    }

    Ok(())
  }

  fn register_macro(&mut self, name: &str, value: &str) -> Result<(), ExpansionError> {
    let name = self.interner.intern(name);
    let replacement = self.parse_replacement(value)?;
    self.define(Macro::object(name, replacement))
  }

  /// Parse a builtin replacement text; `@` stands for a parameter.
  fn parse_replacement(&mut self, src: &str) -> Result<TokenArray, ExpansionError> {
    let mut list = self.pool.acquire();
    let mut rest = src;

    loop {
      if let Some(stripped) = rest.strip_prefix('@') {
        list.push(Token::new(TokenKind::Param(0)));
        rest = stripped;
        continue
      }

      let (t, rem) = tokenize::tokenize(rest, &mut self.interner)?;
      if let TokenKind::End = t.kind {
        return Ok(list)
      }

      list.push(t);
      rest = rem;
    }
  }
}
