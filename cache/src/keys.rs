use std::hash::Hash;

use ahash::{HashMap, HashMapExt};

/// An insertion-ordered, deduplicated sequence of keys.
///
/// Backs index-based access on the cache. The position map makes
/// membership and `position` lookups O(1); keys are never removed one by one,
/// only cleared together.
#[derive(Debug)]
pub(crate) struct KeyIndex<K> {
  order: Vec<K>,
  positions: HashMap<K, usize>,
}

impl<K> Default for KeyIndex<K> {
  fn default() -> Self {
    Self {
      order: Vec::new(),
      positions: HashMap::new(),
    }
  }
}

impl<K> KeyIndex<K> {
  #[inline]
  pub(crate) fn get(&self, index: usize) -> Option<&K> {
    self.order.get(index)
  }

  #[inline]
  pub(crate) fn len(&self) -> usize {
    self.order.len()
  }

  pub(crate) fn clear(&mut self) {
    self.order.clear();
    self.positions.clear();
  }
}

impl<K> KeyIndex<K>
where
  K: Eq + Hash + Clone,
{
  /// Appends `key` unless it is already present. Returns whether it was added.
  pub(crate) fn insert_if_absent(&mut self, key: K) -> bool {
    if self.positions.contains_key(&key) {
      return false;
    }
    self.positions.insert(key.clone(), self.order.len());
    self.order.push(key);
    true
  }

  #[inline]
  pub(crate) fn position(&self, key: &K) -> Option<usize> {
    self.positions.get(key).copied()
  }
}
