#![no_main]

use libfuzzer_sys::fuzz_target;
use doccache::policy::sampled_lru::SampledLruCore;
use std::collections::HashMap;
use std::sync::Arc;

// Fuzz eviction against a reference exact-LRU table
//
// Sample width is forced past the table size, so every eviction pass sees
// the whole table and must pick the same victim as the reference.
fuzz_target!(|data: &[u8]| {
    if data.is_empty() {
        return;
    }

    let capacity = usize::from(data[0] % 16) + 1;
    let mut cache: SampledLruCore<u8, u8> = SampledLruCore::new(capacity, capacity + 1);
    let mut reference: HashMap<u8, u64> = HashMap::new();
    let mut clock = 0u64;

    for &byte in &data[1..] {
        let key = byte & 0x3f;

        if byte & 0x80 == 0 {
            // insert
            cache.insert(key, Arc::new(byte));
            if reference.insert(key, clock).is_none() && reference.len() > capacity {
                let victim = reference
                    .iter()
                    .min_by_key(|(_, stamp)| **stamp)
                    .map(|(k, _)| *k);
                if let Some(victim) = victim {
                    reference.remove(&victim);
                }
            }
        } else {
            // get
            let hit = cache.get(&key).is_some();
            assert_eq!(hit, reference.contains_key(&key));
            if let Some(stamp) = reference.get_mut(&key) {
                *stamp = clock;
            }
        }
        clock += 1;

        assert_eq!(cache.len(), reference.len());
        for (key, stamp) in &reference {
            assert_eq!(cache.recency(key), Some(*stamp));
        }
    }
});
