use std::sync::{Arc, Barrier};
use std::thread;
use std::time::{Duration, Instant};

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use expiring_cache::TtlCache;

const PREFILL: u64 = 1_000;

fn warm_cache() -> TtlCache<u64, u64> {
  let cache = TtlCache::new();
  for i in 0..PREFILL {
    cache.add(i, i);
  }
  cache
}

// --- Single-threaded ---

fn bench_get_item(c: &mut Criterion) {
  let cache = warm_cache();
  let mut group = c.benchmark_group("cache_get_item");
  for key in [0u64, PREFILL / 2, PREFILL - 1] {
    group.bench_with_input(BenchmarkId::from_parameter(key), &key, |b, key| {
      b.iter(|| black_box(cache.get_item(black_box(key))))
    });
  }
  group.finish();
}

fn bench_set_item_existing(c: &mut Criterion) {
  let cache = warm_cache();
  c.bench_function("cache_set_item_existing", |b| {
    let mut i = 0u64;
    b.iter(|| {
      cache.set_item(i % PREFILL, i);
      i += 1;
    })
  });
}

fn bench_check_and_maybe_reset(c: &mut Criterion) {
  let cache = warm_cache();
  c.bench_function("cache_check_fresh", |b| {
    b.iter(|| black_box(cache.check_and_maybe_reset()))
  });
}

// --- Multi-threaded ---

fn bench_mixed_workload(c: &mut Criterion) {
  let ops_per_thread = 2_000u64;
  let mut group = c.benchmark_group("cache_mixed_read75_write25");
  for threads in [2usize, 4] {
    group.throughput(Throughput::Elements(threads as u64 * ops_per_thread));
    group.bench_with_input(BenchmarkId::from_parameter(threads), &threads, |b, &threads| {
      b.iter_custom(|iters| {
        let mut total = Duration::ZERO;
        for _ in 0..iters {
          let cache = warm_cache();
          let barrier = Arc::new(Barrier::new(threads + 1));
          let handles: Vec<_> = (0..threads)
            .map(|t| {
              let cache = cache.clone();
              let barrier = barrier.clone();
              thread::spawn(move || {
                barrier.wait();
                for i in 0..ops_per_thread {
                  let key = (i * 7 + t as u64) % PREFILL;
                  if i % 4 == 0 {
                    cache.set_item(key, i);
                  } else {
                    black_box(cache.get_item(&key));
                  }
                }
              })
            })
            .collect();

          barrier.wait();
          let start = Instant::now();
          for handle in handles {
            handle.join().unwrap();
          }
          total += start.elapsed();
        }
        total
      });
    });
  }
  group.finish();
}

criterion_group!(
  benches,
  bench_get_item,
  bench_set_item_existing,
  bench_check_and_maybe_reset,
  bench_mixed_workload
);
criterion_main!(benches);
