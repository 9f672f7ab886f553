//! Macro expansion engine for a C preprocessor.
//!
//! The engine keeps a table of object-like and function-like macro
//! definitions and rewrites streams of preprocessing tokens in place,
//! recursively replacing identifiers bound to macros with their
//! argument-substituted, stringified, and token-pasted replacement lists.
//! Recursion is kept finite by disabling each macro for the span of its own
//! expansion, and the `__FILE__`/`__LINE__` builtins are rebound on every
//! lookup.
//!
//! Everything hangs off a [`MacroSet`], which owns the definition table, the
//! string interner, the recycled token array pool, and the disabling stack.
//! Directive handling (`#define` lines, conditionals, includes) belongs to
//! the surrounding driver; it feeds this crate ready-made [`Macro`] values
//! and token streams.

#![warn(missing_debug_implementations)]

mod builtin;
mod error;
mod expand;
mod intern;
mod macro_set;
mod pool;
mod stringify;
mod table;
mod token;
pub mod tokenize;

pub use builtin::Standard;
pub use error::ExpansionError;
pub use intern::{Interner, Symbol};
pub use macro_set::MacroSet;
pub use pool::TokenArrayPool;
pub use table::{Macro, MacroKind, MacroTable};
pub use token::{Number, NumberKind, Token, TokenArray, TokenKind};
