//! Example demonstrating the sampled LRU document cache.
//!
//! Each insert and lookup stamps the entry with a logical clock. When the
//! cache overflows, a handful of entries are sampled and the oldest of them
//! is evicted.
//!
//! Run with: cargo run --example basic_sampled_lru

use doccache::prelude::*;

fn main() {
    println!("=== Sampled LRU Document Cache Example ===\n");

    // Small cache: the sample covers the whole table, so eviction is exact LRU
    let cache = DocumentCache::new(2, DEFAULT_SAMPLES);
    println!(
        "Created cache: capacity={}, samples={}\n",
        cache.capacity(),
        cache.samples()
    );

    cache.insert_document("key", b"doc0".to_vec());
    cache.insert_document("key1", b"doc1".to_vec());
    cache.insert_document("key2", b"doc2".to_vec());
    println!("Inserted key, key1, key2");
    println!("  len: {}", cache.len());
    println!("  contains key? {} (least recently used)", cache.contains("key"));

    cache.get("key1");
    println!("\nLooked up key1 (refreshes its recency)");

    cache.insert_document("key3", b"doc3".to_vec());
    println!("Inserted key3");
    println!("  contains key1? {}", cache.contains("key1"));
    println!("  contains key2? {} (oldest of the two)", cache.contains("key2"));

    // Values are shared: a held document outlives its eviction
    let held = cache.get("key3");
    cache.insert_document("key4", b"doc4".to_vec());
    cache.insert_document("key5", b"doc5".to_vec());
    if let Some(doc) = held {
        println!(
            "\nHeld key3 across eviction: {:?} (still cached: {})",
            String::from_utf8_lossy(&doc),
            cache.contains("key3")
        );
    }

    println!("\n=== Larger Cache ===\n");

    let cache = DocumentCache::new(100, 0);
    for i in 0..1000 {
        cache.insert_document(format!("doc-{}", i), format!("body {}", i).into_bytes());
    }
    let recent = (900..1000)
        .filter(|i| cache.contains(format!("doc-{}", i).as_str()))
        .count();
    println!("Inserted 1000 documents into capacity 100");
    println!("  len: {}", cache.len());
    println!("  survivors among the last 100 inserted: {}", recent);
    println!("  (sampling keeps most, but not necessarily all, of the newest)");

    cache.clear();
    println!("\nAfter clear: len={}, clock={}", cache.len(), cache.clock());

    println!("\n=== Strict Configuration ===\n");

    match SampledLruBuilder::new(0).strict(true).try_build::<String, [u8]>() {
        Ok(_) => println!("unexpectedly accepted capacity 0"),
        Err(err) => println!("Rejected: {}", err),
    }
}

// Expected output (the survivor count varies with the hasher seed):
// === Sampled LRU Document Cache Example ===
//
// Created cache: capacity=2, samples=3
//
// Inserted key, key1, key2
//   len: 2
//   contains key? false (least recently used)
//
// Looked up key1 (refreshes its recency)
// Inserted key3
//   contains key1? true
//   contains key2? false (oldest of the two)
//
// Held key3 across eviction: "doc3" (still cached: false)
//
// === Larger Cache ===
//
// Inserted 1000 documents into capacity 100
//   len: 100
//   survivors among the last 100 inserted: [varies]
//   (sampling keeps most, but not necessarily all, of the newest)
//
// After clear: len=0, clock=0
//
// === Strict Configuration ===
//
// Rejected: capacity must be > 0
