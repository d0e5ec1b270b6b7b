//! Memoized computations over the immutable symbol graph.
//!
//! Every cache in the compat machinery is a pure function of the symbol
//! graph, so a cache entry never needs invalidation. Two threads that miss on
//! the same key at the same time may both compute the value; whichever stores
//! first wins and both callers return the stored value. No shard lock is held
//! while the computation runs, so the computation may freely call back into
//! the symbol graph or into other memoized functions.

use std::fmt;
use std::hash::Hash;

use dashmap::DashMap;
use rustc_hash::FxBuildHasher;

/// A thread-safe, memoizing `K -> V` function.
pub struct MemoizedFunction<K, V> {
    cache: DashMap<K, V, FxBuildHasher>,
}

impl<K, V> MemoizedFunction<K, V>
where
    K: Eq + Hash + Clone,
    V: Clone,
{
    pub fn new() -> Self {
        Self {
            cache: DashMap::with_hasher(FxBuildHasher::default()),
        }
    }

    /// Return the cached value for `key`, computing it with `compute` on a miss.
    pub fn get_or_compute(&self, key: &K, compute: impl FnOnce(&K) -> V) -> V {
        if let Some(cached) = self.get(key) {
            return cached;
        }

        let value = compute(key);
        self.cache.entry(key.clone()).or_insert(value).value().clone()
    }

    /// Return the cached value for `key` without computing it.
    pub fn get(&self, key: &K) -> Option<V> {
        self.cache.get(key).map(|entry| entry.value().clone())
    }

    pub fn len(&self) -> usize {
        self.cache.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cache.is_empty()
    }
}

impl<K, V> Default for MemoizedFunction<K, V>
where
    K: Eq + Hash + Clone,
    V: Clone,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<K: Eq + Hash, V> fmt::Debug for MemoizedFunction<K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MemoizedFunction")
            .field("entries", &self.cache.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    #[test]
    fn test_computes_once_sequentially() {
        let memo: MemoizedFunction<u32, Arc<str>> = MemoizedFunction::new();
        let calls = AtomicUsize::new(0);

        for _ in 0..3 {
            let value = memo.get_or_compute(&7, |k| {
                calls.fetch_add(1, Ordering::SeqCst);
                Arc::from(format!("v{}", k))
            });
            assert_eq!(&*value, "v7");
        }
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(memo.len(), 1);
    }

    #[test]
    fn test_first_stored_value_wins() {
        let memo: MemoizedFunction<u32, Arc<u32>> = MemoizedFunction::new();
        let first = memo.get_or_compute(&1, |_| Arc::new(10));
        // A racing computation that lost stores nothing and sees the winner.
        let second = memo.get_or_compute(&1, |_| Arc::new(20));
        assert!(Arc::ptr_eq(&first, &second));
    }

    #[test]
    fn test_nested_computation_does_not_deadlock() {
        let memo: MemoizedFunction<u32, u64> = MemoizedFunction::new();
        let value = memo.get_or_compute(&3, |_| {
            memo.get_or_compute(&2, |_| memo.get_or_compute(&1, |_| 1) + 1) + 1
        });
        assert_eq!(value, 3);
        assert_eq!(memo.len(), 3);
    }

    #[test]
    fn test_concurrent_callers_converge() {
        let memo: MemoizedFunction<u32, Arc<u32>> = MemoizedFunction::new();
        let seen: Vec<Arc<u32>> = std::thread::scope(|s| {
            let handles: Vec<_> = (0..8u32)
                .map(|i| {
                    let memo = &memo;
                    s.spawn(move || memo.get_or_compute(&42, |_| Arc::new(i)))
                })
                .collect();
            handles.into_iter().map(|h| h.join().unwrap()).collect()
        });
        for value in &seen {
            assert!(Arc::ptr_eq(value, &seen[0]));
        }
    }
}
