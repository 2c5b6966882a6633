use once_cell::sync::Lazy;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};

// The single, static reference point for all time calculations in the cache.
// It is initialized lazily on its first use.
static CACHE_EPOCH: Lazy<Instant> = Lazy::new(Instant::now);

/// Converts an `Instant` into a `Duration` since the cache's epoch.
#[inline]
pub(crate) fn instant_to_duration(instant: Instant) -> Duration {
  instant.saturating_duration_since(*CACHE_EPOCH)
}

/// Nanoseconds in `duration`, clamped to what a `u64` can hold.
#[inline]
pub(crate) fn saturating_nanos(duration: Duration) -> u64 {
  u64::try_from(duration.as_nanos()).unwrap_or(u64::MAX)
}

/// A helper to get the current time as a `Duration` since the epoch.
#[inline]
pub(crate) fn now_duration() -> Duration {
  instant_to_duration(Instant::now())
}

/// A source of "now" for every expiry decision the cache makes.
///
/// Timestamps are expressed as a `Duration` since the cache epoch so that
/// they can be compared and added to lifespans without touching `Instant`
/// arithmetic at every call site.
pub trait Clock: fmt::Debug + Send + Sync {
  fn now(&self) -> Duration;
}

/// The default clock, backed by the monotonic `Instant` clock.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
  #[inline]
  fn now(&self) -> Duration {
    now_duration()
  }
}

/// A clock that only moves when told to.
///
/// Useful for exercising expiry boundaries without sleeping.
#[derive(Debug, Default)]
pub struct ManualClock {
  nanos: AtomicU64,
}

impl ManualClock {
  /// Creates a clock frozen at the epoch.
  pub fn new() -> Self {
    Self::default()
  }

  /// Creates a clock frozen at `start` past the epoch.
  pub fn starting_at(start: Duration) -> Self {
    Self {
      nanos: AtomicU64::new(saturating_nanos(start)),
    }
  }

  /// Moves the clock forward by `by`.
  pub fn advance(&self, by: Duration) {
    let by = saturating_nanos(by);
    let _ = self
      .nanos
      .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |nanos| {
        Some(nanos.saturating_add(by))
      });
  }

  /// Jumps the clock to an absolute position past the epoch.
  pub fn set(&self, to: Duration) {
    self.nanos.store(saturating_nanos(to), Ordering::SeqCst);
  }
}

impl Clock for ManualClock {
  #[inline]
  fn now(&self) -> Duration {
    Duration::from_nanos(self.nanos.load(Ordering::SeqCst))
  }
}
