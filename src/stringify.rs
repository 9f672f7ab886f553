use crate::macro_set::MacroSet;
use crate::token::{Token, TokenArray, TokenKind};

impl MacroSet {
  /// Reduce `list` to a single string token.
  ///
  /// Leading and trailing whitespace is dropped and any interior run of
  /// whitespace collapses to a single space. A trailing newline, as found
  /// on `#error` lines, is not part of the text. An empty list or a lone
  /// `EmptyArg` stringifies to `""`.
  pub fn stringify(&mut self, list: &TokenArray) -> Token {
    let content = if list.is_empty() || matches!(list[0].kind, TokenKind::EmptyArg) {
      String::new()
    } else if list.len() == 1 {
      list[0].spelling(&self.interner)
    } else {
      let mut buf = String::new();

      for (i, t) in list.iter().enumerate() {
        debug_assert!(!matches!(t.kind, TokenKind::End));

        if let TokenKind::Newline = t.kind {
          debug_assert_eq!(i, list.len() - 1);
          break
        }

        if t.leading_whitespace > 0 && i > 0 {
          buf.push(' ');
        }
        buf.push_str(&t.spelling(&self.interner));
      }

      buf
    };

    let sym = self.interner.intern(&content);
    Token::new(TokenKind::Str(sym))
  }
}
