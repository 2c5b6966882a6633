use expiring_cache::ConcurrentList;
use std::collections::HashSet;
use std::sync::{Arc, Barrier};
use std::thread;

const APPENDS_PER_THREAD: usize = 1000;

#[test]
fn test_concurrent_appends_are_all_counted() {
  let num_threads = 8;
  let list = Arc::new(ConcurrentList::new());
  let barrier = Arc::new(Barrier::new(num_threads));

  let handles: Vec<_> = (0..num_threads)
    .map(|t| {
      let list = list.clone();
      let barrier = barrier.clone();
      thread::spawn(move || {
        barrier.wait();
        for i in 0..APPENDS_PER_THREAD {
          list.push(t * APPENDS_PER_THREAD + i);
        }
      })
    })
    .collect();

  for handle in handles {
    handle.join().unwrap();
  }

  assert_eq!(list.len(), num_threads * APPENDS_PER_THREAD);
}

#[test]
fn test_appends_racing_with_drains_are_never_lost() {
  let num_writers = 4;
  let list = Arc::new(ConcurrentList::new());
  let barrier = Arc::new(Barrier::new(num_writers + 1));

  let writers: Vec<_> = (0..num_writers)
    .map(|t| {
      let list = list.clone();
      let barrier = barrier.clone();
      thread::spawn(move || {
        barrier.wait();
        for i in 0..APPENDS_PER_THREAD {
          list.push((t, i));
        }
      })
    })
    .collect();

  // A reader that keeps forcing drains while the writers are running.
  let reader = {
    let list = list.clone();
    let barrier = barrier.clone();
    thread::spawn(move || {
      barrier.wait();
      let mut last_len = 0;
      for _ in 0..500 {
        let len = list.len();
        assert!(len >= last_len, "drained elements must never disappear");
        last_len = len;
      }
    })
  };

  for writer in writers {
    writer.join().unwrap();
  }
  reader.join().unwrap();

  let items = list.to_vec();
  assert_eq!(items.len(), num_writers * APPENDS_PER_THREAD);

  let unique: HashSet<_> = items.iter().copied().collect();
  assert_eq!(unique.len(), items.len());

  // Each writer's own appends stay in the order it made them.
  for t in 0..num_writers {
    let sequence: Vec<usize> = items
      .iter()
      .filter(|(writer, _)| *writer == t)
      .map(|(_, i)| *i)
      .collect();
    assert_eq!(sequence, (0..APPENDS_PER_THREAD).collect::<Vec<_>>());
  }
}

#[test]
fn test_own_appends_are_visible_to_own_reads() {
  let list = Arc::new(ConcurrentList::new());

  let handles: Vec<_> = (0..4)
    .map(|t| {
      let list = list.clone();
      thread::spawn(move || {
        for i in 0..200 {
          let value = t * 1000 + i;
          list.push(value);
          assert!(list.contains(&value));
        }
      })
    })
    .collect();

  for handle in handles {
    handle.join().unwrap();
  }
  assert_eq!(list.len(), 800);
}
