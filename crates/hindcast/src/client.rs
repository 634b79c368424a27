//! Task distribution for independent per-year open operations.

use rayon::prelude::*;

/// Map-and-gather over independent work items.
///
/// Implementations run `task` over every item and return the results in
/// submission order, regardless of completion order. Items are disjoint
/// per-year workloads, so no coordination beyond the gather is needed.
pub trait MapGather {
    /// Apply `task` to each item, gathering results in submission order.
    fn map_gather<T, R, F>(&self, items: Vec<T>, task: F) -> Vec<R>
    where
        T: Send,
        R: Send,
        F: Fn(T) -> R + Send + Sync;
}

/// Runs every task in-process, one after another. The default client.
#[derive(Debug, Clone, Copy, Default)]
pub struct Sequential;

impl MapGather for Sequential {
    fn map_gather<T, R, F>(&self, items: Vec<T>, task: F) -> Vec<R>
    where
        T: Send,
        R: Send,
        F: Fn(T) -> R + Send + Sync,
    {
        items.into_iter().map(task).collect()
    }
}

/// Distributes tasks over the rayon thread pool.
///
/// `collect` preserves submission order, so gather order is identical to
/// [`Sequential`].
#[derive(Debug, Clone, Copy, Default)]
pub struct WorkerPool;

impl MapGather for WorkerPool {
    fn map_gather<T, R, F>(&self, items: Vec<T>, task: F) -> Vec<R>
    where
        T: Send,
        R: Send,
        F: Fn(T) -> R + Send + Sync,
    {
        items.into_par_iter().map(task).collect()
    }
}
