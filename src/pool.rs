use crate::token::TokenArray;

/// A stack of recyclable token arrays.
///
/// Expansion allocates short-lived arrays at a high rate; recycling their
/// backing storage keeps the allocator out of the hot path. The pool is
/// unbounded and hands arrays back in LIFO order.
#[derive(Debug, Default)]
pub struct TokenArrayPool {
  arrays: Vec<TokenArray>,
}

impl TokenArrayPool {
  /// Create an empty pool.
  pub fn new() -> Self {
    Self::default()
  }

  /// Hand out an empty array, reusing backing storage when available.
  pub fn acquire(&mut self) -> TokenArray {
    self.arrays.pop().unwrap_or_default()
  }

  /// Take `list` back, clearing it for the next [`acquire`](Self::acquire).
  pub fn release(&mut self, mut list: TokenArray) {
    list.clear();
    self.arrays.push(list);
  }

  /// Number of arrays currently cached.
  pub fn len(&self) -> usize {
    self.arrays.len()
  }

  /// Whether no arrays are cached.
  pub fn is_empty(&self) -> bool {
    self.arrays.is_empty()
  }
}
