//! Plain configuration for a `TtlCache`.

use std::time::Duration;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Default lifespan, in seconds, for both the whole cache and single items.
pub const DEFAULT_LIFESPAN_SECS: u64 = 60;

/// The externally supplied settings of a cache.
///
/// Lifespans are whole seconds so the struct maps directly onto YAML/JSON
/// configuration files. Missing fields fall back to the defaults.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct CacheConfig {
  /// How long after the last write the whole cache is considered stale.
  pub cache_lifespan_secs: u64,
  /// How long after its last write a single entry reports itself expired.
  pub item_lifespan_secs: u64,
  /// Advisory switch for callers. The cache never consults it.
  pub enabled: Option<bool>,
}

impl Default for CacheConfig {
  fn default() -> Self {
    Self {
      cache_lifespan_secs: DEFAULT_LIFESPAN_SECS,
      item_lifespan_secs: DEFAULT_LIFESPAN_SECS,
      enabled: Some(true),
    }
  }
}

impl CacheConfig {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn with_cache_lifespan_secs(mut self, secs: u64) -> Self {
    self.cache_lifespan_secs = secs;
    self
  }

  pub fn with_item_lifespan_secs(mut self, secs: u64) -> Self {
    self.item_lifespan_secs = secs;
    self
  }

  pub fn with_enabled(mut self, enabled: Option<bool>) -> Self {
    self.enabled = enabled;
    self
  }

  #[inline]
  pub fn cache_lifespan(&self) -> Duration {
    Duration::from_secs(self.cache_lifespan_secs)
  }

  #[inline]
  pub fn item_lifespan(&self) -> Duration {
    Duration::from_secs(self.item_lifespan_secs)
  }
}
