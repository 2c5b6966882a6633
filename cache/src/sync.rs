//! The append gate that switches `ConcurrentList` appenders between the
//! lock-free path and the locked path.
//!
//! A single atomic word carries both the "drain in progress" bit and the number
//! of appenders currently on the lock-free path. Appenders enter with a CAS that
//! fails once the bit is set, and the drainer refuses to start emptying the
//! staging queue until every appender that entered before the bit flipped has
//! finished its enqueue. Every append is therefore ordered either entirely
//! before a drain (and moved by it) or entirely after it.

use std::fmt;
use std::sync::atomic::{AtomicUsize, Ordering};

use crossbeam_utils::{Backoff, CachePadded};

const DRAINING: usize = 1;
const APPENDER: usize = 2;

pub(crate) struct AppendGate {
  state: CachePadded<AtomicUsize>,
}

impl Default for AppendGate {
  fn default() -> Self {
    Self::new()
  }
}

impl fmt::Debug for AppendGate {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    let state = self.state.load(Ordering::Relaxed);
    f.debug_struct("AppendGate")
      .field("draining", &self.is_draining())
      .field("appenders", &(state / APPENDER))
      .finish()
  }
}

impl AppendGate {
  pub(crate) fn new() -> Self {
    Self {
      state: CachePadded::new(AtomicUsize::new(0)),
    }
  }

  /// Registers a lock-free appender.
  ///
  /// Returns `None` when a drain is in progress, in which case the caller must
  /// take the list lock before enqueueing.
  #[inline]
  pub(crate) fn try_enter(&self) -> Option<AppendPermit<'_>> {
    let mut current = self.state.load(Ordering::Acquire);
    loop {
      if current & DRAINING != 0 {
        return None;
      }
      match self.state.compare_exchange_weak(
        current,
        current + APPENDER,
        Ordering::AcqRel,
        Ordering::Acquire,
      ) {
        Ok(_) => return Some(AppendPermit { gate: self }),
        Err(actual) => current = actual,
      }
    }
  }

  /// Flips the gate into draining mode and waits out the lock-free appenders
  /// that entered before the flip.
  ///
  /// Must only be called by the holder of the list lock.
  pub(crate) fn begin_drain(&self) {
    let previous = self.state.fetch_or(DRAINING, Ordering::AcqRel);
    debug_assert_eq!(previous & DRAINING, 0, "nested drain");

    let backoff = Backoff::new();
    while self.state.load(Ordering::Acquire) & !DRAINING != 0 {
      backoff.snooze();
    }
  }

  /// Returns the gate to lock-free mode.
  #[inline]
  pub(crate) fn end_drain(&self) {
    self.state.fetch_and(!DRAINING, Ordering::Release);
  }

  #[inline]
  pub(crate) fn is_draining(&self) -> bool {
    self.state.load(Ordering::Acquire) & DRAINING != 0
  }
}

/// Proof that the holder is on the lock-free append path.
/// Dropping it lets a waiting drainer proceed.
pub(crate) struct AppendPermit<'a> {
  gate: &'a AppendGate,
}

impl Drop for AppendPermit<'_> {
  fn drop(&mut self) {
    self.gate.state.fetch_sub(APPENDER, Ordering::Release);
  }
}
