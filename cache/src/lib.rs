//! A thread-safe, time-expiring keyed cache for short-lived values shared by
//! many concurrent callers.
//!
//! # Features
//! - **Buffered Concurrent List**: [`ConcurrentList`] stages appends through a
//!   lock-free queue and materializes them into an indexable list on every
//!   read, with an atomic gate that moves appenders onto the locked path while
//!   a drain is running.
//! - **Two-Tier Expiry**: a whole-cache lifespan whose check resets a stale
//!   cache, plus per-entry lifespans that are reported but never enforced.
//! - **Non-Clone Support**: Stores values in an `Arc<V>`, avoiding `V: Clone` bounds.
//! - **Deterministic Time**: every expiry decision goes through a [`Clock`],
//!   so tests can drive time with a [`ManualClock`].
//! - **Observability**: Exposes counters through [`MetricsSnapshot`] and
//!   emits `tracing` events on drains and resets.

// Public modules that form the API
pub mod builder;
pub mod config;
pub mod entry;
pub mod erased;
pub mod error;
pub mod handles;
pub mod iter;
pub mod list;
pub mod metrics;
pub mod time;

// Internal, crate-only modules
mod keys;
mod shared;
mod sync;

// Re-export the primary user-facing types for convenience
pub use builder::TtlCacheBuilder;
pub use config::CacheConfig;
pub use entry::CacheEntry;
pub use erased::ErasedValue;
pub use error::{BuildError, CacheError, Result};
pub use handles::TtlCache;
pub use iter::Iter;
pub use list::{ConcurrentList, ListGuard};
pub use metrics::MetricsSnapshot;
pub use time::{Clock, ManualClock, SystemClock};
