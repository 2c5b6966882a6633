use crate::builder::{validate_cache_lifespan, TtlCacheBuilder};
use crate::entry::CacheEntry;
use crate::error::{BuildError, CacheError, Result};
use crate::iter::Iter;
use crate::metrics::Metrics;
use crate::shared::CacheShared;
use crate::MetricsSnapshot;

use std::hash::Hash;
use std::sync::Arc;
use std::time::Duration;

/// A thread-safe keyed cache with a whole-cache lifespan and advisory
/// per-item lifespans.
///
/// Values are stored behind an `Arc`, so `V` does not need to be `Clone`.
/// Cloning the handle is cheap and shares the same cache.
///
/// # Two kinds of expiry
///
/// - **Item expiry** is reported by [`item_expired`](Self::item_expired) and
///   never enforced: an expired entry is still returned by
///   [`get_item`](Self::get_item).
/// - **Whole-cache expiry** is checked by
///   [`check_and_maybe_reset`](Self::check_and_maybe_reset), which empties the
///   cache as a side effect when it finds it stale.
///
/// # Duplicate keys
///
/// [`add`](Self::add) always appends. Adding a key that is already present
/// creates a shadow entry that key-based operations never see, because they
/// resolve to the first matching entry. Use [`set_item`](Self::set_item) to
/// upsert.
#[derive(Debug)]
pub struct TtlCache<K, V> {
  pub(crate) shared: Arc<CacheShared<K, V>>,
}

impl<K, V> Clone for TtlCache<K, V> {
  fn clone(&self) -> Self {
    Self {
      shared: self.shared.clone(),
    }
  }
}

impl<K, V> Default for TtlCache<K, V>
where
  K: Eq + Hash + Clone,
{
  fn default() -> Self {
    Self::new()
  }
}

impl<K, V> TtlCache<K, V>
where
  K: Eq + Hash + Clone,
{
  /// Creates a cache with the default 60 second lifespans.
  pub fn new() -> Self {
    TtlCacheBuilder::new().build_unchecked()
  }

  pub fn builder() -> TtlCacheBuilder<K, V> {
    TtlCacheBuilder::new()
  }

  /// Appends a new entry for `key`, stamped with the current time.
  ///
  /// This does not look for an existing entry first; see the type-level
  /// docs on shadow entries.
  pub fn add(&self, key: K, value: V) {
    let _gate = self.shared.gate.read();
    self.shared.add_locked(key, value);
  }

  /// Replaces the value of the first entry for `key` in place.
  ///
  /// Fails with `CacheError::KeyNotFound` when there is no such entry; the
  /// cache is left untouched in that case.
  pub fn update(&self, key: K, value: V) -> Result<()> {
    let _gate = self.shared.gate.read();
    self.shared.update_locked(key, value)
  }

  /// Updates the entry for `key` if there is one, otherwise adds it.
  pub fn set_item(&self, key: K, value: V) {
    let _gate = self.shared.gate.read();
    self.shared.set_item_locked(key, value);
  }

  /// Returns the value of the first entry for `key`, expired or not.
  pub fn get_item(&self, key: &K) -> Option<Arc<V>> {
    let _gate = self.shared.gate.read();
    self.shared.get_item_locked(key)
  }

  /// Returns the cached value for `key` unless it is missing or item-expired,
  /// in which case `loader` computes a fresh value that is stored with
  /// `set_item` semantics.
  ///
  /// `loader` runs without any cache lock held.
  pub fn get_with<F>(&self, key: &K, loader: F) -> Arc<V>
  where
    F: FnOnce(&K) -> V,
  {
    {
      let _gate = self.shared.gate.read();
      let now = self.shared.now();
      let entries = self.shared.entries.lock();
      if let Some(entry) = CacheShared::first_match(&entries, key) {
        if !entry.is_expired(now) {
          Metrics::record(&self.shared.metrics.hits);
          return entry.value();
        }
      }
    }
    Metrics::record(&self.shared.metrics.misses);

    let value = loader(key);
    let _gate = self.shared.gate.read();
    self.shared.set_item_locked(key.clone(), value)
  }

  /// Whether the first entry for `key` has outlived its lifespan.
  ///
  /// A missing key reports `true`.
  pub fn item_expired(&self, key: &K) -> bool {
    let _gate = self.shared.gate.read();
    let now = self.shared.now();
    let entries = self.shared.entries.lock();
    CacheShared::first_match(&entries, key).map_or(true, |entry| entry.is_expired(now))
  }

  /// Returns a copy of the first entry for `key`, with its expiry metadata.
  pub fn entry(&self, key: &K) -> Option<CacheEntry<K, V>> {
    let _gate = self.shared.gate.read();
    let entries = self.shared.entries.lock();
    CacheShared::first_match(&entries, key).cloned()
  }

  pub fn contains_key(&self, key: &K) -> bool {
    let _gate = self.shared.gate.read();
    let entries = self.shared.entries.lock();
    CacheShared::first_match(&entries, key).is_some()
  }

  /// Position of `key` in insertion order.
  pub fn index_of_key(&self, key: &K) -> Option<usize> {
    let _gate = self.shared.gate.read();
    self.shared.keys.lock().position(key)
  }

  /// Position, in key insertion order, of the key whose first entry holds a
  /// value equal to `value`.
  pub fn index_of_value(&self, value: &V) -> Option<usize>
  where
    V: PartialEq,
  {
    let _gate = self.shared.gate.read();
    let key = {
      let entries = self.shared.entries.lock();
      entries
        .iter()
        .find(|entry| entry.value().as_ref() == value)
        .map(|entry| entry.key().clone())?
    };
    self.shared.keys.lock().position(&key)
  }

  /// Resolves the key at `index` (insertion order) and returns its value.
  pub fn get_index(&self, index: usize) -> Result<Arc<V>> {
    let _gate = self.shared.gate.read();
    let key = self.shared.key_at_locked(index)?;
    self
      .shared
      .get_item_locked(&key)
      .ok_or(CacheError::KeyNotFound)
  }

  /// Resolves the key at `index` (insertion order) and upserts `value` under it.
  pub fn set_index(&self, index: usize, value: V) -> Result<()> {
    let _gate = self.shared.gate.read();
    let key = self.shared.key_at_locked(index)?;
    self.shared.set_item_locked(key, value);
    Ok(())
  }

  /// Checks whole-cache expiry and resets the cache if it is stale.
  ///
  /// **This is a mutating call.** It returns `None` when nothing has been
  /// written since the last reset, `Some(false)` while the cache is fresh,
  /// and `Some(true)` after having emptied a stale cache. The check and the
  /// reset run under the cache's exclusive gate, so no write can slip in
  /// between them.
  pub fn check_and_maybe_reset(&self) -> Option<bool> {
    let _gate = self.shared.gate.write();
    let expired = self.shared.expired_at(self.shared.now())?;
    if expired {
      Metrics::record(&self.shared.metrics.expiry_resets);
      self.shared.reset_locked("cache lifespan elapsed");
    }
    Some(expired)
  }

  /// The same computation as `check_and_maybe_reset`, without the reset.
  pub fn peek_expired(&self) -> Option<bool> {
    let _gate = self.shared.gate.read();
    self.shared.expired_at(self.shared.now())
  }

  /// Drops every entry, the key index and the last-modified stamp.
  pub fn reset(&self) {
    let _gate = self.shared.gate.write();
    self.shared.reset_locked("explicit reset");
  }

  /// Number of distinct keys.
  pub fn len(&self) -> usize {
    let _gate = self.shared.gate.read();
    self.shared.keys.lock().len()
  }

  pub fn is_empty(&self) -> bool {
    self.len() == 0
  }

  /// Number of stored entries, shadow duplicates included.
  pub fn entry_count(&self) -> usize {
    let _gate = self.shared.gate.read();
    self.shared.entries.len()
  }

  /// Snapshot of every entry's value in collection order, shadow
  /// duplicates included.
  pub fn iter(&self) -> Iter<Arc<V>> {
    Iter::new(self.values())
  }

  pub fn values(&self) -> Vec<Arc<V>> {
    let _gate = self.shared.gate.read();
    let entries = self.shared.entries.lock();
    entries.iter().map(CacheEntry::value).collect()
  }

  /// Snapshot of the distinct keys in insertion order.
  pub fn keys(&self) -> Vec<K> {
    let _gate = self.shared.gate.read();
    let keys = self.shared.keys.lock();
    (0..keys.len()).filter_map(|index| keys.get(index).cloned()).collect()
  }

  /// When the cache was last written, as a duration since the cache epoch.
  pub fn last_modified(&self) -> Option<Duration> {
    *self.shared.last_modified.lock()
  }

  pub fn cache_lifespan(&self) -> Duration {
    self.shared.cache_lifespan()
  }

  /// Changes the whole-cache lifespan. Takes effect on the next expiry check.
  ///
  /// A zero lifespan is rejected with `BuildError::ZeroCacheLifespan`, the
  /// same as at build time, and the current lifespan is kept.
  pub fn set_cache_lifespan(&self, lifespan: Duration) -> Result<(), BuildError> {
    validate_cache_lifespan(lifespan)?;
    self.shared.set_cache_lifespan(lifespan);
    Ok(())
  }

  pub fn item_lifespan(&self) -> Duration {
    self.shared.item_lifespan()
  }

  /// Changes the lifespan given to entries created from now on. Existing
  /// entries keep the lifespan they were created with.
  pub fn set_item_lifespan(&self, lifespan: Duration) {
    self.shared.set_item_lifespan(lifespan);
  }

  /// The advisory enabled flag. The cache itself never consults it.
  pub fn enabled(&self) -> Option<bool> {
    self.shared.enabled()
  }

  pub fn set_enabled(&self, enabled: Option<bool>) {
    self.shared.set_enabled(enabled);
  }

  pub fn metrics(&self) -> MetricsSnapshot {
    self.shared.metrics.snapshot()
  }
}

impl<'a, K, V> IntoIterator for &'a TtlCache<K, V>
where
  K: Eq + Hash + Clone,
{
  type Item = Arc<V>;
  type IntoIter = Iter<Arc<V>>;

  fn into_iter(self) -> Self::IntoIter {
    self.iter()
  }
}
