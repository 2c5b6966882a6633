use thiserror::Error;

/// Errors raised by the list and cache operations.
///
/// Everything is reported synchronously to the immediate caller; nothing is
/// retried internally.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CacheError {
  /// A loosely-typed entry point received a value of the wrong runtime type.
  #[error("invalid parameter type {received}, expected type is {expected}")]
  InvalidArgument {
    received: &'static str,
    expected: &'static str,
  },

  /// `update` was called for a key that has no entry.
  #[error("key is not found")]
  KeyNotFound,

  /// An index-based accessor was called outside the current bounds.
  #[error("index {index} is out of range for length {len}")]
  IndexOutOfRange { index: usize, len: usize },
}

/// Errors that can occur when building a cache.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BuildError {
  /// The whole-cache lifespan was zero, which would reset the cache on
  /// every expiry check made after the first write.
  #[error("cache lifespan cannot be zero")]
  ZeroCacheLifespan,
}

/// A specialized `Result` type for list and cache operations.
pub type Result<T, E = CacheError> = std::result::Result<T, E>;
