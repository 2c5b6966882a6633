//! Contains types for iterating over list and cache contents.

use std::iter::FusedIterator;
use std::vec;

/// A point-in-time iterator.
///
/// The items are captured while the list lock is held, right after the
/// pending appends have been drained, and the lock is released before the
/// first item is yielded. Appends that happen during iteration are not
/// visible to it.
#[derive(Debug, Clone)]
pub struct Iter<T> {
  items: vec::IntoIter<T>,
}

impl<T> Iter<T> {
  pub(crate) fn new(items: Vec<T>) -> Self {
    Self {
      items: items.into_iter(),
    }
  }

  /// The items not yet yielded.
  pub fn as_slice(&self) -> &[T] {
    self.items.as_slice()
  }
}

impl<T> Iterator for Iter<T> {
  type Item = T;

  #[inline]
  fn next(&mut self) -> Option<Self::Item> {
    self.items.next()
  }

  #[inline]
  fn size_hint(&self) -> (usize, Option<usize>) {
    self.items.size_hint()
  }
}

impl<T> DoubleEndedIterator for Iter<T> {
  #[inline]
  fn next_back(&mut self) -> Option<Self::Item> {
    self.items.next_back()
  }
}

impl<T> ExactSizeIterator for Iter<T> {}

impl<T> FusedIterator for Iter<T> {}
