#![no_main]

use libfuzzer_sys::fuzz_target;
use doccache::policy::sampled_lru::SampledLruCore;
use std::sync::Arc;

// Fuzz arbitrary operation sequences on SampledLruCore
//
// The first two bytes pick capacity and sample width; the rest is decoded
// as (op, key) pairs covering insert, get, peek, contains, remove, clear.
fuzz_target!(|data: &[u8]| {
    if data.len() < 2 {
        return;
    }

    let capacity = usize::from(data[0] % 32);
    let samples = usize::from(data[1] % 12);
    let mut cache: SampledLruCore<u8, u32> = SampledLruCore::new(capacity, samples);

    let mut idx = 2;
    while idx + 1 < data.len() {
        let op = data[idx] % 6;
        let key = data[idx + 1] % 64;
        let clock_before = cache.clock();

        match op {
            0 => {
                // insert
                let was_present = cache.contains(&key);
                let old_len = cache.len();
                let value = u32::from(data[idx]) << 8 | u32::from(key);
                let previous = cache.insert(key, Arc::new(value));

                assert_eq!(previous.is_some(), was_present);
                if was_present {
                    assert_eq!(cache.len(), old_len);
                } else {
                    assert_eq!(cache.len(), (old_len + 1).min(capacity));
                }
                assert_eq!(cache.clock(), clock_before + 1);
            }
            1 => {
                // get
                let expected = cache.peek(&key).map(|v| **v);
                assert_eq!(cache.get(&key).map(|v| **v), expected);
                assert_eq!(cache.clock(), clock_before + 1);
                if expected.is_some() {
                    assert_eq!(cache.recency(&key), Some(clock_before));
                }
            }
            2 => {
                // peek (read-only)
                let recency = cache.recency(&key);
                let _ = cache.peek(&key);
                assert_eq!(cache.recency(&key), recency);
                assert_eq!(cache.clock(), clock_before);
            }
            3 => {
                // contains (read-only)
                let contains = cache.contains(&key);
                assert_eq!(contains, cache.peek(&key).is_some());
                assert_eq!(cache.clock(), clock_before);
            }
            4 => {
                // remove
                let old_len = cache.len();
                if cache.remove(&key).is_some() {
                    assert_eq!(cache.len(), old_len - 1);
                }
                assert!(!cache.contains(&key));
                assert_eq!(cache.clock(), clock_before);
            }
            5 => {
                // clear
                cache.clear();
                assert!(cache.is_empty());
                assert_eq!(cache.clock(), 0);
            }
            _ => unreachable!(),
        }

        assert!(cache.len() <= capacity);
        cache.check_invariants().unwrap();

        idx += 2;
    }
});
