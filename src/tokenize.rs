//! Re-tokenization of byte buffers.
//!
//! This is the lexing collaborator of the expansion engine: it turns builtin
//! replacement texts and the concatenated spellings produced by `##` back
//! into preprocessing tokens.

use nom::{
  branch::alt,
  bytes::complete::take_while,
  character::complete::{char, one_of, satisfy},
  combinator::recognize,
  multi::{fold_many0, many0_count},
  sequence::{delimited, pair},
  IResult,
};

use crate::error::ExpansionError;
use crate::intern::Interner;
use crate::token::{Token, TokenArray, TokenKind};

/// Multi-character punctuators, longest first so prefixes do not shadow them.
const OPERATORS: &[&str] = &[
  "<<=", ">>=", "...", "->", "++", "--", "<<", ">>", "<=", ">=", "==", "!=", "&&", "||", "+=",
  "-=", "*=", "/=", "%=", "&=", "^=", "|=",
];

fn identifier(input: &str) -> IResult<&str, &str> {
  recognize(pair(
    satisfy(|c| c.is_ascii_alphabetic() || c == '_'),
    take_while(|c: char| c.is_ascii_alphanumeric() || c == '_'),
  ))(input)
}

fn prep_number(input: &str) -> IResult<&str, &str> {
  recognize(pair(
    alt((
      recognize(pair(char('.'), satisfy(|c: char| c.is_ascii_digit()))),
      recognize(satisfy(|c: char| c.is_ascii_digit())),
    )),
    many0_count(alt((
      recognize(pair(one_of("eEpP"), one_of("+-"))),
      recognize(satisfy(|c: char| c.is_ascii_alphanumeric() || c == '_' || c == '.')),
    ))),
  ))(input)
}

fn escaped_char(input: &str) -> IResult<&str, char> {
  let (input, _) = char('\\')(input)?;
  let (input, c) = one_of("nrt0\\\"'")(input)?;

  let c = match c {
    'n' => '\n',
    'r' => '\r',
    't' => '\t',
    '0' => '\0',
    c => c,
  };

  Ok((input, c))
}

fn string_literal(input: &str) -> IResult<&str, String> {
  delimited(
    char('"'),
    fold_many0(
      alt((escaped_char, satisfy(|c| c != '"' && c != '\\' && c != '\n'))),
      String::new,
      |mut s, c| {
        s.push(c);
        s
      },
    ),
    char('"'),
  )(input)
}

fn operator(input: &str) -> Option<(&str, &str)> {
  for op in OPERATORS {
    if let Some(rest) = input.strip_prefix(op) {
      return Some((op, rest))
    }
  }

  None
}

/// Read one preprocessing token from the start of `input`.
///
/// Returns the token and the remaining input. An exhausted buffer yields an
/// `End` token.
pub fn tokenize<'a>(input: &'a str, interner: &mut Interner) -> Result<(Token, &'a str), ExpansionError> {
  let rest = input.trim_start_matches([' ', '\t']);
  let ws = (input.len() - rest.len()) as u32;

  let c = match rest.chars().next() {
    Some(c) => c,
    None => return Ok((Token::with_whitespace(TokenKind::End, ws), rest)),
  };

  if c == '\n' {
    return Ok((Token::with_whitespace(TokenKind::Newline, ws), &rest[1..]))
  }

  if let Ok((rem, id)) = identifier(rest) {
    let sym = interner.intern(id);
    return Ok((Token::with_whitespace(TokenKind::Identifier(sym), ws), rem))
  }

  if let Ok((rem, num)) = prep_number(rest) {
    let sym = interner.intern(num);
    return Ok((Token::with_whitespace(TokenKind::PrepNumber(sym), ws), rem))
  }

  if let Ok((rem, content)) = string_literal(rest) {
    let sym = interner.intern(&content);
    return Ok((Token::with_whitespace(TokenKind::Str(sym), ws), rem))
  }

  if let Some(rem) = rest.strip_prefix("##") {
    return Ok((Token::with_whitespace(TokenKind::TokenPaste, ws), rem))
  }

  if let Some((op, rem)) = operator(rest) {
    let sym = interner.intern(op);
    return Ok((Token::with_whitespace(TokenKind::Operator(sym), ws), rem))
  }

  if c.is_ascii_punctuation() {
    return Ok((Token::with_whitespace(TokenKind::Punct(c as u8), ws), &rest[1..]))
  }

  Err(ExpansionError::InvalidToken(c.to_string()))
}

/// Tokenize an entire buffer, stopping at its end.
pub fn lex(input: &str, interner: &mut Interner) -> Result<TokenArray, ExpansionError> {
  let mut tokens = Vec::new();
  let mut rest = input;

  loop {
    let (token, rem) = tokenize(rest, interner)?;
    if let TokenKind::End = token.kind {
      return Ok(tokens)
    }

    tokens.push(token);
    rest = rem;
  }
}
