//! Content-fingerprint memoization
//!
//! Keys are built from sample rates, buffer lengths and a cheap 32-bit
//! FNV-1a hash over a strided, quantized subsample of each buffer. Collisions
//! are possible and accepted: the cache exists to keep repeated requests
//! responsive, not to deduplicate data.

use std::collections::HashMap;
use std::sync::Arc;
use tracing::debug;

const FNV_OFFSET: u32 = 0x811c_9dc5;
const FNV_PRIME: u32 = 0x0100_0193;

/// Upper bound on hashed samples per buffer (approximately)
const HASH_SAMPLE_BUDGET: usize = 8192;

/// 32-bit rolling hash over a strided subsample of `data`
///
/// Samples are quantized to 16 bits (`floor((v + 1) * 32767) & 0xffff`) and
/// every `max(1, len / 8192)`-th one is folded in.
pub fn hash_float_array(data: &[f32]) -> u32 {
    let stride = (data.len() / HASH_SAMPLE_BUDGET).max(1);

    data.iter().step_by(stride).fold(FNV_OFFSET, |hash, &v| {
        let quantized = (((v as f64 + 1.0) * 32767.0).floor() as i64 & 0xffff) as u32;
        (hash ^ quantized).wrapping_mul(FNV_PRIME)
    })
}

/// Fingerprint string for a buffer: rate, length and content hash
pub fn fingerprint(data: &[f32], sample_rate: u32) -> String {
    format!("{}:{}:{:08x}", sample_rate, data.len(), hash_float_array(data))
}

/// Hit/miss counters of one cache tier
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CacheStats {
    pub hits: usize,
    pub misses: usize,
    pub entries: usize,
}

/// Memoizes values by fingerprint key
///
/// Values are shared read-only behind `Arc`; failed computations are not stored.
#[derive(Debug)]
pub struct FingerprintCache<V> {
    name: &'static str,
    entries: HashMap<String, Arc<V>>,
    hits: usize,
    misses: usize,
}

impl<V> FingerprintCache<V> {
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            entries: HashMap::new(),
            hits: 0,
            misses: 0,
        }
    }

    /// Return the cached value for `key` or compute and store it
    pub fn get_or_compute<E>(
        &mut self,
        key: &str,
        compute: impl FnOnce() -> Result<V, E>,
    ) -> Result<Arc<V>, E> {
        if let Some(value) = self.entries.get(key) {
            self.hits += 1;
            debug!(cache = self.name, key, "cache hit");
            return Ok(Arc::clone(value));
        }

        self.misses += 1;
        debug!(cache = self.name, key, "cache miss");

        let value = Arc::new(compute()?);
        self.entries.insert(key.to_owned(), Arc::clone(&value));
        Ok(value)
    }

    pub fn get(&self, key: &str) -> Option<Arc<V>> {
        self.entries.get(key).cloned()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn stats(&self) -> CacheStats {
        CacheStats {
            hits: self.hits,
            misses: self.misses,
            entries: self.entries.len(),
        }
    }

    /// Drop all entries and reset counters
    pub fn clear(&mut self) {
        self.entries.clear();
        self.hits = 0;
        self.misses = 0;
    }
}
