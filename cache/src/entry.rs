use std::sync::Arc;
use std::time::Duration;

/// A stored key/value pair plus its own expiry metadata.
///
/// The key is fixed at creation. The value and its timestamp are only ever
/// changed together, by the owning cache, while it holds the list lock.
#[derive(Debug)]
pub struct CacheEntry<K, V> {
  key: K,
  value: Arc<V>,
  /// When `value` was last written, as a duration since the cache epoch.
  last_modified: Duration,
  lifespan: Duration,
}

impl<K, V> CacheEntry<K, V> {
  pub(crate) fn new(key: K, value: V, now: Duration, lifespan: Duration) -> Self {
    Self {
      key,
      value: Arc::new(value),
      last_modified: now,
      lifespan,
    }
  }

  #[inline]
  pub fn key(&self) -> &K {
    &self.key
  }

  /// Returns a clone of the `Arc` containing the value.
  #[inline]
  pub fn value(&self) -> Arc<V> {
    self.value.clone()
  }

  #[inline]
  pub fn last_modified(&self) -> Duration {
    self.last_modified
  }

  #[inline]
  pub fn lifespan(&self) -> Duration {
    self.lifespan
  }

  /// The instant after which the entry reports itself expired.
  #[inline]
  pub fn expires_at(&self) -> Duration {
    self.last_modified.saturating_add(self.lifespan)
  }

  /// Checks if the entry is expired at `now`.
  ///
  /// The comparison is strict: at exactly `last_modified + lifespan` the
  /// entry is still live.
  #[inline]
  pub fn is_expired(&self, now: Duration) -> bool {
    now > self.expires_at()
  }

  /// Swaps in a new value and restamps the entry.
  pub(crate) fn replace(&mut self, value: V, now: Duration) {
    self.value = Arc::new(value);
    self.last_modified = now;
  }
}

impl<K: Clone, V> Clone for CacheEntry<K, V> {
  fn clone(&self) -> Self {
    Self {
      key: self.key.clone(),
      value: self.value.clone(),
      last_modified: self.last_modified,
      lifespan: self.lifespan,
    }
  }
}
