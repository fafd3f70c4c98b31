// src/engine/pool.rs
//
// Global thread pool for the parallel scanner.
//
// A single lazily-built rayon pool is shared by every run instead of
// building one per call. The pool is sized from
// std::thread::available_parallelism(), which respects cgroup/CPU quota;
// the per-run worker count only controls how many band tasks are spawned
// onto it.

use rayon::ThreadPool;
use std::sync::OnceLock;

/// Minimum number of pool threads when parallelism detection fails.
const MIN_POOL_THREADS: usize = 1;

static GLOBAL_THREAD_POOL: OnceLock<ThreadPool> = OnceLock::new();

pub(crate) fn get_pool() -> &'static ThreadPool {
    GLOBAL_THREAD_POOL.get_or_init(|| {
        rayon::ThreadPoolBuilder::new()
            .num_threads(default_workers())
            .build()
            .unwrap_or_else(|e| {
                // Fallback: a minimal pool if the preferred configuration fails
                rayon::ThreadPoolBuilder::new()
                    .num_threads(MIN_POOL_THREADS)
                    .build()
                    .unwrap_or_else(|_| {
                        panic!("failed to create fallback thread pool: {e}")
                    })
            })
    })
}

/// Default worker count: the number of available processing units.
pub fn default_workers() -> usize {
    std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(MIN_POOL_THREADS)
}
