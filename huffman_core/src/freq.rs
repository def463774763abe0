//! 256-entry byte histogram.

use bytemuck::Pod;

pub const ALPHABET_SIZE: usize = 256;

/// One histogram bucket. `symbol` is the bucket index at construction time
/// and travels with `count` when the tree builder sorts a copy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Symbol {
    pub symbol: u8,
    pub count: usize,
}

/// Byte-frequency histogram over the full 256-value alphabet.
#[derive(Debug, Clone)]
pub struct FreqCounter {
    freq: [usize; ALPHABET_SIZE],
}

impl FreqCounter {
    pub fn new() -> Self {
        Self {
            freq: [0; ALPHABET_SIZE],
        }
    }

    /// Accumulates one byte.
    pub fn update_byte(&mut self, byte: u8) {
        self.freq[byte as usize] += 1;
    }

    /// Accumulates every byte of a raw slice, sharding across the parallel
    /// dispatcher once `bytes` is large enough to be worth it.
    pub fn update_bytes(&mut self, bytes: &[u8]) {
        if bytes.len() < crate::parallel::PARALLEL_THRESHOLD {
            for &b in bytes {
                self.freq[b as usize] += 1;
            }
            return;
        }

        let merged = crate::parallel::parallel_calc(
            bytes,
            |shard| {
                let mut counter = FreqCounter::new();
                for &b in shard {
                    counter.freq[b as usize] += 1;
                }
                counter
            },
            |shards: Vec<FreqCounter>| {
                let mut acc = FreqCounter::new();
                for shard in &shards {
                    acc.merge(shard);
                }
                acc
            },
        );
        self.merge(&merged);
    }

    /// Accumulates a slice of any trivially-copyable element type,
    /// reinterpreting each element as its constituent bytes.
    pub fn update<T: Pod>(&mut self, items: &[T]) {
        self.update_bytes(bytemuck::cast_slice(items));
    }

    /// Element-wise merge of another histogram into this one.
    pub fn merge(&mut self, other: &FreqCounter) {
        for i in 0..ALPHABET_SIZE {
            self.freq[i] += other.freq[i];
        }
    }

    pub fn count(&self, byte: u8) -> usize {
        self.freq[byte as usize]
    }

    pub fn total(&self) -> usize {
        self.freq.iter().sum()
    }

    /// Snapshot as `(symbol, count)` pairs in index order.
    pub fn symbols(&self) -> [Symbol; ALPHABET_SIZE] {
        let mut out = [Symbol { symbol: 0, count: 0 }; ALPHABET_SIZE];
        for (i, slot) in out.iter_mut().enumerate() {
            *slot = Symbol {
                symbol: i as u8,
                count: self.freq[i],
            };
        }
        out
    }
}

impl Default for FreqCounter {
    fn default() -> Self {
        Self::new()
    }
}
