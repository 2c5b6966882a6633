use crate::entry::CacheEntry;
use crate::error::{CacheError, Result};
use crate::keys::KeyIndex;
use crate::list::{ConcurrentList, ListGuard};
use crate::metrics::Metrics;
use crate::time::{saturating_nanos, Clock};

use std::fmt;
use std::hash::Hash;
use std::sync::atomic::{AtomicU64, AtomicU8, Ordering};
use std::sync::Arc;
use std::time::Duration;

use parking_lot::{Mutex, RwLock};

const ENABLED_UNSET: u8 = 0;
const ENABLED_FALSE: u8 = 1;
const ENABLED_TRUE: u8 = 2;

/// The internal, thread-safe core of the cache.
///
/// Lock order is `gate` → `entries` → `keys` → `last_modified`. Every method
/// suffixed `_locked` assumes the caller already holds `gate`, shared or
/// exclusive.
pub(crate) struct CacheShared<K, V> {
  pub(crate) entries: ConcurrentList<CacheEntry<K, V>>,
  pub(crate) keys: Mutex<KeyIndex<K>>,
  pub(crate) last_modified: Mutex<Option<Duration>>,
  /// Shared by every operation, taken exclusively by whole-cache resets so a
  /// reset never interleaves with a write.
  pub(crate) gate: RwLock<()>,
  cache_lifespan_nanos: AtomicU64,
  item_lifespan_nanos: AtomicU64,
  enabled: AtomicU8,
  pub(crate) clock: Arc<dyn Clock>,
  pub(crate) metrics: Metrics,
}

impl<K, V> fmt::Debug for CacheShared<K, V> {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("CacheShared")
      .field("cache_lifespan", &self.cache_lifespan())
      .field("item_lifespan", &self.item_lifespan())
      .field("enabled", &self.enabled())
      .field("entries", &self.entries)
      .field("metrics", &self.metrics.snapshot())
      .finish_non_exhaustive()
  }
}

impl<K, V> CacheShared<K, V> {
  pub(crate) fn new(
    cache_lifespan: Duration,
    item_lifespan: Duration,
    enabled: Option<bool>,
    clock: Arc<dyn Clock>,
  ) -> Self {
    let shared = Self {
      entries: ConcurrentList::new(),
      keys: Mutex::new(KeyIndex::default()),
      last_modified: Mutex::new(None),
      gate: RwLock::new(()),
      cache_lifespan_nanos: AtomicU64::new(0),
      item_lifespan_nanos: AtomicU64::new(0),
      enabled: AtomicU8::new(ENABLED_UNSET),
      clock,
      metrics: Metrics::new(),
    };
    shared.set_cache_lifespan(cache_lifespan);
    shared.set_item_lifespan(item_lifespan);
    shared.set_enabled(enabled);
    shared
  }

  #[inline]
  pub(crate) fn now(&self) -> Duration {
    self.clock.now()
  }

  pub(crate) fn cache_lifespan(&self) -> Duration {
    Duration::from_nanos(self.cache_lifespan_nanos.load(Ordering::Relaxed))
  }

  pub(crate) fn set_cache_lifespan(&self, lifespan: Duration) {
    self
      .cache_lifespan_nanos
      .store(saturating_nanos(lifespan), Ordering::Relaxed);
  }

  pub(crate) fn item_lifespan(&self) -> Duration {
    Duration::from_nanos(self.item_lifespan_nanos.load(Ordering::Relaxed))
  }

  pub(crate) fn set_item_lifespan(&self, lifespan: Duration) {
    self
      .item_lifespan_nanos
      .store(saturating_nanos(lifespan), Ordering::Relaxed);
  }

  pub(crate) fn enabled(&self) -> Option<bool> {
    match self.enabled.load(Ordering::Relaxed) {
      ENABLED_FALSE => Some(false),
      ENABLED_TRUE => Some(true),
      _ => None,
    }
  }

  pub(crate) fn set_enabled(&self, enabled: Option<bool>) {
    let raw = match enabled {
      None => ENABLED_UNSET,
      Some(false) => ENABLED_FALSE,
      Some(true) => ENABLED_TRUE,
    };
    self.enabled.store(raw, Ordering::Relaxed);
  }

  #[inline]
  pub(crate) fn touch(&self, now: Duration) {
    *self.last_modified.lock() = Some(now);
  }

  /// Whole-cache expiry at `now`, or `None` if nothing has been written since
  /// the last reset.
  pub(crate) fn expired_at(&self, now: Duration) -> Option<bool> {
    let last_modified = (*self.last_modified.lock())?;
    Some(now > last_modified.saturating_add(self.cache_lifespan()))
  }

  /// Drops every entry, the key index and the last-modified stamp.
  pub(crate) fn reset_locked(&self, reason: &'static str) {
    let dropped = {
      let mut entries = self.entries.lock();
      let dropped = entries.len();
      entries.clear();
      dropped
    };
    self.keys.lock().clear();
    *self.last_modified.lock() = None;

    Metrics::record(&self.metrics.resets);
    tracing::debug!(reason, dropped, "cache reset");
  }
}

impl<K, V> CacheShared<K, V>
where
  K: Eq + Hash + Clone,
{
  /// The first entry whose key equals `key`. Later duplicates are shadowed.
  #[inline]
  pub(crate) fn first_match<'a>(
    entries: &'a ListGuard<'_, CacheEntry<K, V>>,
    key: &K,
  ) -> Option<&'a CacheEntry<K, V>> {
    entries.iter().find(|entry| entry.key() == key)
  }

  #[inline]
  fn first_match_mut<'a>(
    entries: &'a mut ListGuard<'_, CacheEntry<K, V>>,
    key: &K,
  ) -> Option<&'a mut CacheEntry<K, V>> {
    entries.iter_mut().find(|entry| entry.key() == key)
  }

  pub(crate) fn add_locked(&self, key: K, value: V) {
    let now = self.now();
    let entry = CacheEntry::new(key.clone(), value, now, self.item_lifespan());
    self.entries.push(entry);
    self.keys.lock().insert_if_absent(key);
    self.touch(now);
    Metrics::record(&self.metrics.inserts);
  }

  pub(crate) fn update_locked(&self, key: K, value: V) -> Result<()> {
    let now = self.now();
    {
      let mut entries = self.entries.lock();
      match Self::first_match_mut(&mut entries, &key) {
        Some(entry) => entry.replace(value, now),
        None => {
          Metrics::record(&self.metrics.update_misses);
          tracing::debug!("update rejected, key has no entry");
          return Err(CacheError::KeyNotFound);
        }
      }
    }
    self.keys.lock().insert_if_absent(key);
    self.touch(now);
    Metrics::record(&self.metrics.updates);
    Ok(())
  }

  /// Replaces the first entry for `key` or appends a new one, atomically with
  /// respect to other writers. Returns the stored value.
  pub(crate) fn set_item_locked(&self, key: K, value: V) -> Arc<V> {
    let now = self.now();
    let stored = {
      let mut entries = self.entries.lock();
      match Self::first_match_mut(&mut entries, &key) {
        Some(entry) => {
          entry.replace(value, now);
          Metrics::record(&self.metrics.updates);
          entry.value()
        }
        None => {
          let entry = CacheEntry::new(key.clone(), value, now, self.item_lifespan());
          let stored = entry.value();
          entries.push(entry);
          Metrics::record(&self.metrics.inserts);
          stored
        }
      }
    };
    self.keys.lock().insert_if_absent(key);
    self.touch(now);
    stored
  }

  pub(crate) fn get_item_locked(&self, key: &K) -> Option<Arc<V>> {
    let value = {
      let entries = self.entries.lock();
      Self::first_match(&entries, key).map(CacheEntry::value)
    };
    match value {
      Some(_) => Metrics::record(&self.metrics.hits),
      None => Metrics::record(&self.metrics.misses),
    }
    value
  }

  pub(crate) fn key_at_locked(&self, index: usize) -> Result<K> {
    let keys = self.keys.lock();
    keys
      .get(index)
      .cloned()
      .ok_or(CacheError::IndexOutOfRange {
        index,
        len: keys.len(),
      })
  }
}
