//! DHAT heap profiler for doccache.
//!
//! Run with: cargo run --bin dhat_profile --release --features dhat-heap
//! View results: Open dhat-heap.json in <https://nnethercote.github.io/dh_view/dh_view.html>

#[global_allocator]
static ALLOC: dhat::Alloc = dhat::Alloc;

use std::sync::Arc;

use doccache::policy::sampled_lru::{DocumentCache, SampledLruCore, DEFAULT_SAMPLES};
use doccache::traits::CoreCache;

/// Simple XorShift64 RNG for deterministic workloads.
struct XorShift64 {
    state: u64,
}

impl XorShift64 {
    fn new(seed: u64) -> Self {
        Self { state: seed.max(1) }
    }

    fn next_u64(&mut self) -> u64 {
        let mut x = self.state;
        x ^= x << 13;
        x ^= x >> 7;
        x ^= x << 17;
        self.state = x;
        x
    }

    fn next_f64(&mut self) -> f64 {
        const SCALE: f64 = 1.0 / (u64::MAX as f64);
        (self.next_u64() as f64) * SCALE
    }
}

/// Hotset workload: 90% of accesses hit 10% of keys, misses are filled.
fn hotset_workload<C: CoreCache<u64, Arc<u64>>>(
    cache: &mut C,
    operations: usize,
    universe: u64,
    seed: u64,
) {
    let mut rng = XorShift64::new(seed);
    let hot_size = (universe as f64 * 0.1) as u64;

    for _ in 0..operations {
        let key = if rng.next_f64() < 0.9 {
            rng.next_u64() % hot_size
        } else {
            hot_size + (rng.next_u64() % (universe - hot_size))
        };

        if cache.get(&key).is_none() {
            let _ = cache.insert(key, Arc::new(key));
        }
    }
}

/// Every insert is a new key, so every insert past warm-up evicts.
fn eviction_churn<C: CoreCache<u64, Arc<u64>>>(cache: &mut C, operations: usize, offset: u64) {
    for i in 0..operations as u64 {
        let _ = cache.insert(offset + i, Arc::new(i));
    }
}

fn profile_core(samples: usize) {
    println!("=== Profiling SampledLruCore (samples={}) ===", samples);
    let capacity = 4096;
    let operations = 100_000;
    let universe = 16_384;

    let mut cache: SampledLruCore<u64, u64> = SampledLruCore::new(capacity, samples);

    for i in 0..capacity as u64 {
        cache.insert(i, Arc::new(i));
    }

    hotset_workload(&mut cache, operations, universe, 42);
    eviction_churn(&mut cache, operations / 4, universe);

    println!("  Final size: {}", cache.len());
}

fn profile_documents() {
    println!("=== Profiling DocumentCache ===");
    let capacity = 1024;
    let documents = 20_000usize;
    let mut rng = XorShift64::new(7);

    let cache = DocumentCache::new(capacity, DEFAULT_SAMPLES);

    for i in 0..documents {
        let size = 64 + (rng.next_u64() % 4096) as usize;
        cache.insert_document(format!("doc-{}", i), vec![b'x'; size]);
        if i % 3 == 0 {
            let _ = cache.get(&format!("doc-{}", i / 2));
        }
    }

    println!("  Final size: {}", cache.len());
}

fn main() {
    let _profiler = dhat::Profiler::new_heap();

    println!("doccache DHAT Heap Profiling");
    println!("============================\n");

    profile_core(DEFAULT_SAMPLES);
    profile_core(16);
    profile_documents();

    println!("\n============================");
    println!("Profiling complete!");
    println!(
        "View results: Open dhat-heap.json in <https://nnethercote.github.io/dh_view/dh_view.html>"
    );
}
