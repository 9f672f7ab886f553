use std::{error::Error, fmt};

/// An error during macro definition or expansion.
///
/// Every variant is fatal for the current translation unit; the engine makes
/// no guarantees about table or pool state after reporting one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExpansionError {
  /// A macro was redefined with a different replacement list.
  Redefinition(String),
  /// Argument collection ran into a newline or the end of the stream.
  UnterminatedArguments,
  /// More `)` than `(` while collecting arguments.
  NegativeNesting,
  /// The token stream did not contain the expected token.
  UnexpectedToken {
    /// The token that was required.
    expected: String,
    /// The token that was found instead.
    found: String,
  },
  /// A replacement list begins with `##`.
  PasteBegin,
  /// A replacement list ends with `##`.
  PasteEnd,
  /// Pasting two tokens did not form a single valid token.
  InvalidPaste(String, String),
  /// A byte sequence does not start a preprocessing token.
  InvalidToken(String),
}

impl fmt::Display for ExpansionError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      Self::Redefinition(name) => {
        write!(f, "Redefinition of macro '{name}' with different substitution.")
      },
      Self::UnterminatedArguments => "Unexpected end of input in expansion.".fmt(f),
      Self::NegativeNesting => "Negative nesting depth in expansion.".fmt(f),
      Self::UnexpectedToken { expected, found } => {
        write!(f, "Expected '{expected}', but got '{found}'.")
      },
      Self::PasteBegin => "Unexpected token paste operator at beginning of line.".fmt(f),
      Self::PasteEnd => "Unexpected token paste operator at end of line.".fmt(f),
      Self::InvalidPaste(l, r) => {
        write!(f, "Invalid token resulting from pasting '{l}' and '{r}'.")
      },
      Self::InvalidToken(t) => write!(f, "Invalid token '{t}'."),
    }
  }
}

impl Error for ExpansionError {}
