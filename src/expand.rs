use crate::error::ExpansionError;
use crate::macro_set::MacroSet;
use crate::table::{Macro, MacroKind};
use crate::token::{replace_slice, Token, TokenArray, TokenKind};
use crate::tokenize;

impl MacroSet {
  /// Rewrite `list` in place into its fully macro-expanded form.
  ///
  /// Scanning is strictly left to right. Each replacement is rescanned
  /// before it is spliced in, so the outer scan continues behind the
  /// inserted tokens; names on the disabling stack are not re-expanded,
  /// which keeps self-referential macros finite.
  pub fn expand(&mut self, list: &mut TokenArray) -> Result<(), ExpansionError> {
    let mut i = 0;

    while i < list.len() {
      let t = list[i];

      if let TokenKind::Identifier(name) = t.kind {
        let def = match self.definition(name) {
          Some(def) => def.clone(),
          None => {
            i += 1;
            continue
          },
        };

        // A function-like macro is only an invocation when an open
        // parenthesis follows.
        let invoked = !self.is_macro_expanded(def.name)
          && (def.kind != MacroKind::FunctionLike
            || list.get(i + 1).map_or(false, |t| t.is_punct(b'(')));

        if invoked {
          let (args, consumed) = self.read_args(&def, &list[i + 1..])?;
          let mut expn = self.expand_macro(&def, args)?;
          let size = 1 + consumed;

          // Keep the invocation's spacing at the splice point.
          if let Some(first) = expn.first_mut() {
            first.leading_whitespace = t.leading_whitespace;
          }

          replace_slice(list, i, size, &expn);
          i += expn.len();
          self.release_token_array(expn);
          continue
        }
      }

      i += 1;
    }

    Ok(())
  }

  /// Produce the replacement of one `def` invocation from `args`.
  ///
  /// Stringification snapshots are taken before the arguments are
  /// pre-expanded, substitution appends the pre-expanded arguments, then
  /// `##` is folded and the result rescanned with `def` disabled.
  fn expand_macro(&mut self, def: &Macro, mut args: Vec<TokenArray>) -> Result<TokenArray, ExpansionError> {
    let mut strings = self.get_token_array();
    let mut list = self.get_token_array();

    self.expand_stack.push(def.name);

    if def.params > 0 {
      if def.stringify {
        for arg in &args {
          let t = self.stringify(arg);
          strings.push(t);
        }
      }

      for arg in &mut args {
        self.expand(arg)?;
        // Force a separator at the splice seam.
        if let Some(first) = arg.first_mut() {
          if first.leading_whitespace == 0 {
            first.leading_whitespace = 1;
          }
        }
      }
    }

    let mut i = 0;
    while i < def.replacement.len() {
      let t = def.replacement[i];
      match t.kind {
        TokenKind::Param(param) => {
          debug_assert!(param < def.params);
          list.extend_from_slice(&args[param as usize]);
        },
        TokenKind::Punct(b'#')
          if matches!(def.replacement.get(i + 1).map(|t| t.kind), Some(TokenKind::Param(_))) =>
        {
          i += 1;
          if let TokenKind::Param(param) = def.replacement[i].kind {
            list.push(strings[param as usize]);
          }
        },
        _ => list.push(t),
      }
      i += 1;
    }

    self.expand_paste_operators(&mut list)?;
    self.expand(&mut list)?;
    self.expand_stack.pop();

    for arg in args {
      self.release_token_array(arg);
    }
    self.release_token_array(strings);

    Ok(list)
  }

  /// Read all arguments for `def` from `list`, which starts immediately
  /// after the macro name. Returns the arguments and the number of tokens
  /// consumed, including the closing parenthesis. Object-like macros
  /// consume nothing.
  fn read_args(&mut self, def: &Macro, list: &[Token]) -> Result<(Vec<TokenArray>, usize), ExpansionError> {
    let mut args = Vec::new();
    let mut pos = 0;

    if def.kind == MacroKind::FunctionLike {
      pos = self.skip(list, pos, b'(')?;
      for i in 0..def.params {
        args.push(self.read_arg(list, &mut pos)?);
        if i + 1 < def.params {
          pos = self.skip(list, pos, b',')?;
        }
      }
      pos = self.skip(list, pos, b')')?;
    }

    Ok((args, pos))
  }

  /// Read tokens forming the next macro argument, stopping at `,` or `)` at
  /// nesting depth zero. A missing argument becomes a single `EmptyArg`.
  fn read_arg(&mut self, list: &[Token], pos: &mut usize) -> Result<TokenArray, ExpansionError> {
    let mut nesting = 0i32;
    let mut arg = self.get_token_array();

    loop {
      let t = match list.get(*pos) {
        Some(t) => *t,
        None => return Err(ExpansionError::UnterminatedArguments),
      };

      if nesting == 0 && (t.is_punct(b',') || t.is_punct(b')')) {
        break
      }

      match t.kind {
        TokenKind::Newline => return Err(ExpansionError::UnterminatedArguments),
        TokenKind::Punct(b'(') => nesting += 1,
        TokenKind::Punct(b')') => {
          nesting -= 1;
          if nesting < 0 {
            return Err(ExpansionError::NegativeNesting)
          }
        },
        _ => (),
      }

      arg.push(t);
      *pos += 1;
    }

    if arg.is_empty() {
      arg.push(Token::new(TokenKind::EmptyArg));
    }

    Ok(arg)
  }

  fn skip(&self, list: &[Token], pos: usize, expected: u8) -> Result<usize, ExpansionError> {
    match list.get(pos) {
      Some(t) if t.is_punct(expected) => Ok(pos + 1),
      found => Err(ExpansionError::UnexpectedToken {
        expected: (expected as char).to_string(),
        found: found.map_or_else(|| "end of input".to_owned(), |t| t.spelling(&self.interner)),
      }),
    }
  }

  /// Concatenate the spellings of `left` and `right` and re-tokenize the
  /// result, which must form exactly one token. The result keeps the left
  /// operand's leading whitespace.
  fn paste(&mut self, left: Token, right: Token) -> Result<Token, ExpansionError> {
    if let TokenKind::EmptyArg = left.kind {
      return Ok(right)
    }
    if let TokenKind::EmptyArg = right.kind {
      return Ok(left)
    }

    let ls = left.spelling(&self.interner);
    let rs = right.spelling(&self.interner);
    let buf = format!("{ls}{rs}");

    let (mut res, rest) = match tokenize::tokenize(&buf, &mut self.interner) {
      Ok(r) => r,
      Err(_) => return Err(ExpansionError::InvalidPaste(ls, rs)),
    };

    if !rest.is_empty() || matches!(res.kind, TokenKind::End) {
      return Err(ExpansionError::InvalidPaste(ls, rs))
    }

    res.leading_whitespace = left.leading_whitespace;
    Ok(res)
  }

  /// In-place expansion of token paste operators over a substituted
  /// replacement list.
  ///
  /// ```text
  /// ['f', '##', 'u', '##', 'nction'] -> ['function']
  /// ```
  ///
  /// Pasting two `EmptyArg`s yields no token at all; stray `EmptyArg`s are
  /// dropped along the way.
  fn expand_paste_operators(&mut self, list: &mut TokenArray) -> Result<(), ExpansionError> {
    let len = list.len();

    if len == 0 {
      return Ok(())
    }

    if let TokenKind::TokenPaste = list[0].kind {
      return Err(ExpansionError::PasteBegin)
    }

    if len > 1 {
      if let TokenKind::TokenPaste = list[len - 1].kind {
        return Err(ExpansionError::PasteEnd)
      }
    }

    if len <= 2 {
      return Ok(())
    }

    // `i` writes, `j` reads. The write cursor can retreat below zero when a
    // pasted pair of missing arguments vanishes at the front of the list.
    let mut i: isize = 0;
    let mut j = 1;

    while j < len {
      let t = list[j];
      match t.kind {
        TokenKind::TokenPaste => {
          let l = if i >= 0 { list[i as usize] } else { Token::new(TokenKind::EmptyArg) };
          let r = list[j + 1];

          if matches!(l.kind, TokenKind::EmptyArg) && matches!(r.kind, TokenKind::EmptyArg) {
            i -= 1;
          } else {
            let pasted = self.paste(l, r)?;
            i = i.max(0);
            list[i as usize] = pasted;
          }

          // Skip the right operand.
          j += 1;
        },
        TokenKind::EmptyArg => (),
        _ => {
          i += 1;
          if (i as usize) < j {
            list[i as usize] = list[j];
          }
        },
      }
      j += 1;
    }

    list.truncate((i + 1).max(0) as usize);
    Ok(())
  }
}
