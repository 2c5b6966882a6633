mod common;

use common::build_default_manual_cache;
use expiring_cache::TtlCache;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Barrier};
use std::thread;
use std::time::Duration;

#[test]
fn test_concurrent_set_item_never_duplicates_a_key() {
  let (cache, _clock) = build_default_manual_cache::<u32, usize>();
  let num_threads = 8;
  let barrier = Arc::new(Barrier::new(num_threads));
  let mut handles = vec![];

  for t in 0..num_threads {
    let cache = cache.clone();
    let barrier = barrier.clone();
    handles.push(thread::spawn(move || {
      barrier.wait();
      for key in 0..50 {
        cache.set_item(key, t);
      }
    }));
  }

  for handle in handles {
    handle.join().unwrap();
  }

  assert_eq!(cache.len(), 50);
  assert_eq!(cache.entry_count(), 50);
  for key in 0..50 {
    assert!(*cache.get_item(&key).unwrap() < num_threads);
  }
}

#[test]
fn test_concurrent_adds_are_all_recorded() {
  let (cache, _clock) = build_default_manual_cache::<(usize, usize), usize>();
  let num_threads = 4;
  let per_thread = 250;
  let barrier = Arc::new(Barrier::new(num_threads));
  let mut handles = vec![];

  for t in 0..num_threads {
    let cache = cache.clone();
    let barrier = barrier.clone();
    handles.push(thread::spawn(move || {
      barrier.wait();
      for i in 0..per_thread {
        cache.add((t, i), i);
      }
    }));
  }

  for handle in handles {
    handle.join().unwrap();
  }

  assert_eq!(cache.len(), num_threads * per_thread);
  assert_eq!(cache.entry_count(), num_threads * per_thread);
  assert_eq!(cache.metrics().inserts, (num_threads * per_thread) as u64);
}

#[test]
fn test_writes_racing_expiry_resets_keep_index_and_entries_consistent() {
  let cache: TtlCache<usize, usize> = TtlCache::builder()
    .cache_lifespan(Duration::from_millis(1))
    .build()
    .unwrap();
  let stop = Arc::new(AtomicBool::new(false));
  let mut handles = vec![];

  for t in 0..4 {
    let cache = cache.clone();
    let stop = stop.clone();
    handles.push(thread::spawn(move || {
      let mut i = 0;
      while !stop.load(Ordering::Relaxed) {
        cache.set_item(t * 1_000_000 + i, i);
        i += 1;
      }
    }));
  }

  let checker = {
    let cache = cache.clone();
    let stop = stop.clone();
    thread::spawn(move || {
      let mut resets = 0;
      while !stop.load(Ordering::Relaxed) {
        if cache.check_and_maybe_reset() == Some(true) {
          resets += 1;
        }
        thread::sleep(Duration::from_millis(2));
      }
      resets
    })
  };

  thread::sleep(Duration::from_millis(100));
  stop.store(true, Ordering::Relaxed);
  for handle in handles {
    handle.join().unwrap();
  }
  let _resets = checker.join().unwrap();

  // Every surviving key still has exactly one entry.
  assert_eq!(cache.len(), cache.entry_count());
  for key in cache.keys() {
    assert!(cache.contains_key(&key));
  }
}

#[test]
fn test_readers_see_writes_from_other_threads() {
  let (cache, _clock) = build_default_manual_cache::<u32, String>();
  let writer = {
    let cache = cache.clone();
    thread::spawn(move || {
      for key in 0..100 {
        cache.add(key, key.to_string());
      }
    })
  };
  writer.join().unwrap();

  for key in 0..100 {
    assert_eq!(cache.get_item(&key).as_deref(), Some(&key.to_string()));
  }
}
