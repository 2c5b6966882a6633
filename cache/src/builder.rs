use crate::config::CacheConfig;
use crate::error::BuildError;
use crate::handles::TtlCache;
use crate::shared::CacheShared;
use crate::time::{Clock, SystemClock};

use core::fmt;
use std::hash::Hash;
use std::marker::PhantomData;
use std::sync::Arc;
use std::time::Duration;

/// A builder for creating `TtlCache` instances.
pub struct TtlCacheBuilder<K, V> {
  cache_lifespan: Duration,
  item_lifespan: Duration,
  enabled: Option<bool>,
  clock: Option<Arc<dyn Clock>>,
  _key_marker: PhantomData<K>,
  _value_marker: PhantomData<V>,
}

// Manual Debug implementation for TtlCacheBuilder.
impl<K, V> fmt::Debug for TtlCacheBuilder<K, V> {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("TtlCacheBuilder")
      .field("cache_lifespan", &self.cache_lifespan)
      .field("item_lifespan", &self.item_lifespan)
      .field("enabled", &self.enabled)
      .field("has_clock", &self.clock.is_some())
      .finish()
  }
}

impl<K, V> Default for TtlCacheBuilder<K, V> {
  fn default() -> Self {
    Self::new()
  }
}

// --- General Configuration Methods ---
// This impl block has no restrictive bounds on K or V.
impl<K, V> TtlCacheBuilder<K, V> {
  /// Creates a new `TtlCacheBuilder` with default settings.
  pub fn new() -> Self {
    Self::from_config(&CacheConfig::default())
  }

  /// Creates a builder seeded from a loaded configuration.
  pub fn from_config(config: &CacheConfig) -> Self {
    Self {
      cache_lifespan: config.cache_lifespan(),
      item_lifespan: config.item_lifespan(),
      enabled: config.enabled,
      clock: None,
      _key_marker: PhantomData,
      _value_marker: PhantomData,
    }
  }

  /// Sets how long after the last write the whole cache goes stale.
  pub fn cache_lifespan(mut self, lifespan: Duration) -> Self {
    self.cache_lifespan = lifespan;
    self
  }

  /// Sets the lifespan stamped on every new entry.
  pub fn item_lifespan(mut self, lifespan: Duration) -> Self {
    self.item_lifespan = lifespan;
    self
  }

  /// Sets the advisory enabled flag.
  pub fn enabled(mut self, enabled: Option<bool>) -> Self {
    self.enabled = enabled;
    self
  }

  /// Replaces the time source used for every expiry decision.
  pub fn clock(mut self, clock: Arc<dyn Clock>) -> Self {
    self.clock = Some(clock);
    self
  }
}

// --- Build Methods ---
impl<K, V> TtlCacheBuilder<K, V>
where
  K: Eq + Hash + Clone,
{
  /// Builds a `TtlCache`.
  pub fn build(self) -> Result<TtlCache<K, V>, BuildError> {
    self.validate()?;
    Ok(self.build_unchecked())
  }

  pub(crate) fn build_unchecked(self) -> TtlCache<K, V> {
    tracing::debug!(
      cache_lifespan = ?self.cache_lifespan,
      item_lifespan = ?self.item_lifespan,
      enabled = ?self.enabled,
      "building cache"
    );
    let clock = self.clock.unwrap_or_else(|| Arc::new(SystemClock));
    TtlCache {
      shared: Arc::new(CacheShared::new(
        self.cache_lifespan,
        self.item_lifespan,
        self.enabled,
        clock,
      )),
    }
  }

  /// Validates the builder configuration.
  pub(crate) fn validate(&self) -> Result<(), BuildError> {
    validate_cache_lifespan(self.cache_lifespan)
  }
}

/// Shared by the builder and the runtime setter on `TtlCache`.
pub(crate) fn validate_cache_lifespan(lifespan: Duration) -> Result<(), BuildError> {
  if lifespan.is_zero() {
    return Err(BuildError::ZeroCacheLifespan);
  }
  Ok(())
}
