mod common;

use common::build_default_manual_cache;
use std::sync::Arc;

#[test]
fn test_iteration_includes_shadow_entries() {
  let (cache, _clock) = build_default_manual_cache::<&str, i32>();
  cache.add("a", 1);
  cache.add("b", 2);
  cache.add("a", 3);

  let values: Vec<i32> = cache.iter().map(|v| *v).collect();
  assert_eq!(values, vec![1, 2, 3]);
  assert_eq!(cache.keys(), vec!["a", "b"]);
}

#[test]
fn test_iterator_is_a_snapshot() {
  let (cache, _clock) = build_default_manual_cache::<u32, u32>();
  cache.add(1, 10);
  cache.add(2, 20);

  let mut seen = Vec::new();
  for value in &cache {
    seen.push(*value);
    cache.add(*value, *value);
  }

  assert_eq!(seen, vec![10, 20]);
  assert_eq!(cache.entry_count(), 4);
}

#[test]
fn test_iterator_reports_exact_len_and_runs_backwards() {
  let (cache, _clock) = build_default_manual_cache::<u32, u32>();
  for i in 0..5 {
    cache.add(i, i * 100);
  }

  let iter = cache.iter();
  assert_eq!(iter.len(), 5);
  let reversed: Vec<u32> = iter.rev().map(|v| *v).collect();
  assert_eq!(reversed, vec![400, 300, 200, 100, 0]);
}

#[test]
fn test_iterated_values_outlive_a_reset() {
  let (cache, _clock) = build_default_manual_cache::<u32, String>();
  cache.add(1, "kept".to_string());

  let held: Vec<Arc<String>> = cache.iter().collect();
  cache.reset();

  assert!(cache.is_empty());
  assert_eq!(held[0].as_str(), "kept");
}
