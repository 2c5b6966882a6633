//! A thin adapter for callers that only hold type-erased values.
//!
//! `ConcurrentList<T>` is strongly typed. Boundary code that shuttles values
//! around as `dyn Any` can wrap them in an [`ErasedValue`] and use the
//! `*_erased` methods, which reject a value of the wrong runtime type with
//! [`CacheError::InvalidArgument`] naming both the received and the expected
//! type.

use crate::error::{CacheError, Result};
use crate::list::ConcurrentList;

use std::any::{self, Any};
use std::fmt;

/// A value whose concrete type is only known at runtime.
pub struct ErasedValue {
  value: Box<dyn Any + Send>,
  type_name: &'static str,
}

impl fmt::Debug for ErasedValue {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("ErasedValue")
      .field("type_name", &self.type_name)
      .finish_non_exhaustive()
  }
}

impl ErasedValue {
  pub fn new<U: Any + Send>(value: U) -> Self {
    Self {
      value: Box::new(value),
      type_name: any::type_name::<U>(),
    }
  }

  /// The name of the concrete type this value was created from.
  pub fn type_name(&self) -> &'static str {
    self.type_name
  }

  pub fn is<T: Any>(&self) -> bool {
    self.value.is::<T>()
  }

  /// Recovers the concrete value, or reports the type mismatch.
  pub fn downcast<T: Any>(self) -> Result<T> {
    let received = self.type_name;
    self
      .value
      .downcast::<T>()
      .map(|boxed| *boxed)
      .map_err(|_| mismatch::<T>(received))
  }

  pub fn downcast_ref<T: Any>(&self) -> Result<&T> {
    self
      .value
      .downcast_ref::<T>()
      .ok_or_else(|| mismatch::<T>(self.type_name))
  }
}

fn mismatch<T>(received: &'static str) -> CacheError {
  CacheError::InvalidArgument {
    received,
    expected: any::type_name::<T>(),
  }
}

impl<T: Any + Send> ConcurrentList<T> {
  /// Appends an erased value and returns the index it landed at.
  ///
  /// Unlike `push`, this goes through the list lock so the index is known
  /// when the call returns.
  pub fn push_erased(&self, value: ErasedValue) -> Result<usize> {
    let item = value.downcast::<T>()?;
    let mut guard = self.lock();
    guard.push(item);
    Ok(guard.len() - 1)
  }

  pub fn contains_erased(&self, value: &ErasedValue) -> Result<bool>
  where
    T: PartialEq,
  {
    let item = value.downcast_ref::<T>()?;
    Ok(self.contains(item))
  }

  pub fn index_of_erased(&self, value: &ErasedValue) -> Result<Option<usize>>
  where
    T: PartialEq,
  {
    let item = value.downcast_ref::<T>()?;
    Ok(self.index_of(item))
  }

  pub fn insert_erased(&self, index: usize, value: ErasedValue) -> Result<()> {
    let item = value.downcast::<T>()?;
    self.insert(index, item)
  }

  pub fn remove_erased(&self, value: &ErasedValue) -> Result<bool>
  where
    T: PartialEq,
  {
    let item = value.downcast_ref::<T>()?;
    Ok(self.remove(item))
  }

  /// Replaces the item at `index` with an erased value.
  pub fn set_erased(&self, index: usize, value: ErasedValue) -> Result<()> {
    let item = value.downcast::<T>()?;
    self.set(index, item).map(drop)
  }

  pub fn get_erased(&self, index: usize) -> Result<ErasedValue>
  where
    T: Clone,
  {
    self.get(index).map(ErasedValue::new)
  }
}
