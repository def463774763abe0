//! Fork-join dispatcher used by histogram accumulation and block encoding.
//!
//! Splitting only pays off on inputs large enough to amortize thread
//! spawn cost, and only when the caller can hand us a slice (so shard
//! boundaries are O(1) to compute). Anything smaller, or anything that
//! only offers a streaming iterator, runs serially.

use std::thread;

/// Minimum input length, in bytes, before parallel dispatch kicks in.
pub const PARALLEL_THRESHOLD: usize = 4_096_000;
/// Number of worker shards used once the threshold is crossed.
pub const THREAD_CNT: usize = 8;
/// `log2(THREAD_CNT)`, used for shard-size arithmetic.
pub const THREAD_EXP: u32 = 3;

/// Splits `items` into up to `THREAD_CNT` shards, runs `f` on each shard in
/// its own thread when `items` is large enough, and folds the per-shard
/// results with `merge` in shard order.
///
/// `f` and `merge` must not depend on wall-clock order between shards:
/// shard `k` only ever knows its own slice.
pub fn parallel_calc<T, R, F, M>(items: &[T], f: F, merge: M) -> R
where
    T: Sync,
    R: Send,
    F: Fn(&[T]) -> R + Sync,
    M: Fn(Vec<R>) -> R,
{
    if items.len() < PARALLEL_THRESHOLD {
        return merge(vec![f(items)]);
    }

    let stride = (items.len() >> THREAD_EXP).max(1);
    let mut bounds = Vec::new();
    let mut start = 0;
    while bounds.len() + 1 < THREAD_CNT && start + stride < items.len() {
        bounds.push(start + stride);
        start += stride;
    }
    bounds.push(items.len());
    let mut shards = Vec::with_capacity(bounds.len());
    let mut from = 0;
    for &to in &bounds {
        shards.push(&items[from..to]);
        from = to;
    }

    let results = thread::scope(|scope| {
        let handles: Vec<_> = shards
            .iter()
            .map(|shard| scope.spawn(|| f(shard)))
            .collect();
        handles.into_iter().map(|h| h.join().unwrap()).collect()
    });
    merge(results)
}
