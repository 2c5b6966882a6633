#![allow(dead_code)]

use std::hash::Hash;
use std::sync::Arc;
use std::time::Duration;

use expiring_cache::{ManualClock, TtlCache, TtlCacheBuilder};

/// Installs a test-writer subscriber once per test binary so `tracing`
/// output shows up next to failing assertions.
pub fn init_tracing() {
  let _ = tracing_subscriber::fmt()
    .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
    .with_test_writer()
    .try_init();
}

/// Builds a cache driven by a manual clock frozen at the epoch.
pub fn build_manual_cache<K, V>(
  cache_lifespan: Duration,
  item_lifespan: Duration,
) -> (TtlCache<K, V>, Arc<ManualClock>)
where
  K: Eq + Hash + Clone,
{
  init_tracing();
  let clock = Arc::new(ManualClock::new());
  let cache = TtlCacheBuilder::new()
    .cache_lifespan(cache_lifespan)
    .item_lifespan(item_lifespan)
    .clock(clock.clone())
    .build()
    .unwrap();
  (cache, clock)
}

/// Default lifespans, manual clock.
pub fn build_default_manual_cache<K, V>() -> (TtlCache<K, V>, Arc<ManualClock>)
where
  K: Eq + Hash + Clone,
{
  build_manual_cache(Duration::from_secs(60), Duration::from_secs(60))
}
