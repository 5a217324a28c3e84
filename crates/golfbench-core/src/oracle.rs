//! Reference oracle: the Fibonacci recurrence `f(0)=0, f(1)=1,
//! f(k)=f(k-1)+f(k-2)` with an injected memo cache.
//!
//! The cache is shared read-mostly across concurrent evaluations. All writers
//! for a key compute the same value, so inserts are first-writer-wins.

use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};

use num_bigint::BigInt;
use num_traits::{One, Zero};

use crate::domain::TestBattery;

/// Compute `f(n)` iteratively in O(n) time with two running terms.
pub fn fibonacci(n: u64) -> BigInt {
    let mut curr = BigInt::zero();
    let mut next = BigInt::one();
    for _ in 0..n {
        let sum = &curr + &next;
        curr = std::mem::replace(&mut next, sum);
    }
    curr
}

/// Memo storage for reference values.
pub trait ReferenceCache: Send + Sync {
    fn get(&self, n: u64) -> Option<BigInt>;

    /// Store `value` for `n` unless a value is already present. Returns the
    /// value that is cached afterwards (or `value` if it was not retained).
    fn insert(&self, n: u64, value: BigInt) -> BigInt;

    /// Number of retained entries.
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// `RwLock<HashMap>` cache, unbounded or capped at a number of entries.
///
/// A bounded cache stops retaining new keys once full; nothing is evicted.
#[derive(Debug, Default)]
pub struct MemoryReferenceCache {
    entries: RwLock<HashMap<u64, BigInt>>,
    capacity: Option<usize>,
}

impl MemoryReferenceCache {
    pub fn unbounded() -> Self {
        Self::default()
    }

    pub fn bounded(capacity: usize) -> Self {
        Self {
            entries: RwLock::default(),
            capacity: Some(capacity),
        }
    }

    pub fn capacity(&self) -> Option<usize> {
        self.capacity
    }
}

impl ReferenceCache for MemoryReferenceCache {
    fn get(&self, n: u64) -> Option<BigInt> {
        let entries = self.entries.read().unwrap_or_else(PoisonError::into_inner);
        entries.get(&n).cloned()
    }

    fn insert(&self, n: u64, value: BigInt) -> BigInt {
        let mut entries = self.entries.write().unwrap_or_else(PoisonError::into_inner);
        if let Some(existing) = entries.get(&n) {
            return existing.clone();
        }
        if self.capacity.is_some_and(|cap| entries.len() >= cap) {
            return value;
        }
        entries.insert(n, value.clone());
        value
    }

    fn len(&self) -> usize {
        self.entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }
}

/// Trusted reference computation used to judge submissions.
#[derive(Clone)]
pub struct Oracle {
    cache: Arc<dyn ReferenceCache>,
}

impl Oracle {
    pub fn new(cache: Arc<dyn ReferenceCache>) -> Self {
        Self { cache }
    }

    /// Oracle with a fresh unbounded cache.
    pub fn unbounded() -> Self {
        Self::new(Arc::new(MemoryReferenceCache::unbounded()))
    }

    /// Reference value for `n`, memoized.
    pub fn reference(&self, n: u64) -> BigInt {
        if let Some(hit) = self.cache.get(n) {
            return hit;
        }
        self.cache.insert(n, fibonacci(n))
    }

    /// Populate the cache for every battery input.
    pub fn warm(&self, battery: &TestBattery) {
        for input in battery.iter() {
            self.reference(input);
        }
        tracing::debug!(
            cached = self.cache.len(),
            battery_len = battery.len(),
            "oracle cache warmed"
        );
    }

    pub fn cached_entries(&self) -> usize {
        self.cache.len()
    }
}

impl std::fmt::Debug for Oracle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Oracle")
            .field("cached_entries", &self.cache.len())
            .finish()
    }
}
