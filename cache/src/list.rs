//! A growable, ordered list built for many concurrent appenders.
//!
//! Appends are staged through a lock-free queue and only materialized into the
//! indexable backing `Vec` when some other operation needs to look at the list.
//! Every read, index or mutation first drains the staging queue under the list
//! mutex, so callers always observe the appends that completed before they
//! asked, in the order they were enqueued.

use crate::error::{CacheError, Result};
use crate::iter::Iter;
use crate::sync::AppendGate;

use std::fmt;
use std::ops::{Deref, DerefMut};

use crossbeam_channel::{Receiver, Sender};
use parking_lot::{Mutex, MutexGuard};

pub struct ConcurrentList<T> {
  backing: Mutex<Vec<T>>,
  pending_tx: Sender<T>,
  pending_rx: Receiver<T>,
  gate: AppendGate,
}

impl<T> fmt::Debug for ConcurrentList<T> {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("ConcurrentList")
      .field("pending", &self.pending_rx.len())
      .field("gate", &self.gate)
      .finish_non_exhaustive()
  }
}

impl<T> Default for ConcurrentList<T> {
  fn default() -> Self {
    Self::new()
  }
}

impl<T> ConcurrentList<T> {
  /// Creates an empty list.
  pub fn new() -> Self {
    let (pending_tx, pending_rx) = crossbeam_channel::unbounded();
    Self {
      backing: Mutex::new(Vec::new()),
      pending_tx,
      pending_rx,
      gate: AppendGate::new(),
    }
  }

  /// Appends an item.
  ///
  /// While no drain is running this never touches the list mutex. If a drain
  /// is in progress the item is enqueued under the lock instead, so it lands
  /// after everything that drain moves.
  pub fn push(&self, item: T) {
    match self.gate.try_enter() {
      Some(_permit) => self.enqueue(item),
      None => {
        let _guard = self.backing.lock();
        self.enqueue(item);
      }
    }
  }

  #[inline]
  fn enqueue(&self, item: T) {
    // The receiver lives as long as `self`, so the channel cannot be
    // disconnected here.
    let _ = self.pending_tx.send(item);
  }

  /// Drains the staging queue and returns a guard with exclusive access to
  /// the materialized list.
  ///
  /// Use this for compound operations that must observe and mutate the list
  /// atomically. Do not call `push` on the same list while holding the guard;
  /// push through the guard instead.
  pub fn lock(&self) -> ListGuard<'_, T> {
    let mut guard = self.backing.lock();

    self.gate.begin_drain();
    let mut moved = 0usize;
    while let Ok(item) = self.pending_rx.try_recv() {
      guard.push(item);
      moved += 1;
    }
    self.gate.end_drain();

    if moved > 0 {
      tracing::trace!(moved, len = guard.len(), "drained pending appends");
    }

    ListGuard { guard }
  }

  /// The approximate number of appends waiting to be drained.
  pub fn pending_len(&self) -> usize {
    self.pending_rx.len()
  }

  pub fn len(&self) -> usize {
    self.lock().len()
  }

  pub fn is_empty(&self) -> bool {
    self.lock().is_empty()
  }

  /// Returns a clone of the item at `index`.
  pub fn get(&self, index: usize) -> Result<T>
  where
    T: Clone,
  {
    let guard = self.lock();
    guard
      .get(index)
      .cloned()
      .ok_or(CacheError::IndexOutOfRange {
        index,
        len: guard.len(),
      })
  }

  /// Runs `f` on the item at `index` while the lock is held.
  pub fn with<F, R>(&self, index: usize, f: F) -> Result<R>
  where
    F: FnOnce(&T) -> R,
  {
    let guard = self.lock();
    match guard.get(index) {
      Some(item) => Ok(f(item)),
      None => Err(CacheError::IndexOutOfRange {
        index,
        len: guard.len(),
      }),
    }
  }

  /// Replaces the item at `index`, returning the previous one.
  pub fn set(&self, index: usize, item: T) -> Result<T> {
    let mut guard = self.lock();
    let len = guard.len();
    match guard.get_mut(index) {
      Some(slot) => Ok(std::mem::replace(slot, item)),
      None => Err(CacheError::IndexOutOfRange { index, len }),
    }
  }

  pub fn contains(&self, item: &T) -> bool
  where
    T: PartialEq,
  {
    self.lock().contains(item)
  }

  /// Position of the first element equal to `item`.
  pub fn index_of(&self, item: &T) -> Option<usize>
  where
    T: PartialEq,
  {
    self.lock().iter().position(|candidate| candidate == item)
  }

  /// Inserts `item` at `index`, shifting later elements. `index` may equal
  /// the current length.
  pub fn insert(&self, index: usize, item: T) -> Result<()> {
    let mut guard = self.lock();
    let len = guard.len();
    if index > len {
      return Err(CacheError::IndexOutOfRange { index, len });
    }
    guard.insert(index, item);
    Ok(())
  }

  pub fn remove_at(&self, index: usize) -> Result<T> {
    let mut guard = self.lock();
    let len = guard.len();
    if index >= len {
      return Err(CacheError::IndexOutOfRange { index, len });
    }
    Ok(guard.remove(index))
  }

  /// Removes the first element equal to `item`. Returns whether one was found.
  pub fn remove(&self, item: &T) -> bool
  where
    T: PartialEq,
  {
    let mut guard = self.lock();
    match guard.iter().position(|candidate| candidate == item) {
      Some(index) => {
        guard.remove(index);
        true
      }
      None => false,
    }
  }

  /// Removes every element, including those still waiting to be drained.
  pub fn clear(&self) {
    self.lock().clear();
  }

  /// Clones the list into `dest`, starting at `offset`.
  pub fn copy_to(&self, dest: &mut [T], offset: usize) -> Result<()>
  where
    T: Clone,
  {
    let guard = self.lock();
    let end = offset.saturating_add(guard.len());
    if end > dest.len() {
      return Err(CacheError::IndexOutOfRange {
        index: end,
        len: dest.len(),
      });
    }
    dest[offset..end].clone_from_slice(&guard);
    Ok(())
  }

  pub fn to_vec(&self) -> Vec<T>
  where
    T: Clone,
  {
    self.lock().to_vec()
  }

  /// Returns a snapshot iterator over the list as of the drain it triggers.
  pub fn iter(&self) -> Iter<T>
  where
    T: Clone,
  {
    Iter::new(self.to_vec())
  }
}

impl<T> FromIterator<T> for ConcurrentList<T> {
  /// Stages the items through the append queue; they become visible in
  /// iteration order on the first drain.
  fn from_iter<I: IntoIterator<Item = T>>(items: I) -> Self {
    let mut list = Self::new();
    list.extend(items);
    list
  }
}

impl<T> Extend<T> for ConcurrentList<T> {
  fn extend<I: IntoIterator<Item = T>>(&mut self, items: I) {
    for item in items {
      self.push(item);
    }
  }
}

impl<'a, T: Clone> IntoIterator for &'a ConcurrentList<T> {
  type Item = T;
  type IntoIter = Iter<T>;

  fn into_iter(self) -> Self::IntoIter {
    self.iter()
  }
}

/// Exclusive access to a drained `ConcurrentList`.
///
/// The list lock is released when the guard is dropped.
pub struct ListGuard<'a, T> {
  guard: MutexGuard<'a, Vec<T>>,
}

impl<T: fmt::Debug> fmt::Debug for ListGuard<'_, T> {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_list().entries(self.guard.iter()).finish()
  }
}

impl<T> Deref for ListGuard<'_, T> {
  type Target = Vec<T>;
  fn deref(&self) -> &Self::Target {
    &self.guard
  }
}

impl<T> DerefMut for ListGuard<'_, T> {
  fn deref_mut(&mut self) -> &mut Self::Target {
    &mut self.guard
  }
}
