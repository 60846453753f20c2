use std::cell::Cell;

/// A counter that can be bumped through `&self`.
///
/// Used for read paths (`peek`, `contains`) that only borrow the core
/// immutably. `MetricsCell` is `Send` but not `Sync`; sharing across threads
/// goes through the mutex in
/// [`ConcurrentSampledLruCache`](crate::policy::sampled_lru::ConcurrentSampledLruCache).
#[repr(transparent)]
#[derive(Debug, Default)]
pub struct MetricsCell(Cell<u64>);

impl MetricsCell {
    #[inline]
    pub fn new() -> Self {
        Self(Cell::new(0))
    }

    #[inline]
    pub fn get(&self) -> u64 {
        self.0.get()
    }

    #[inline]
    pub fn incr(&self) {
        self.0.set(self.0.get().wrapping_add(1));
    }

    #[inline]
    pub fn reset(&self) {
        self.0.set(0);
    }
}
