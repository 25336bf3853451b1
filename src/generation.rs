//! Request generations for discarding stale results
//!
//! When renders are triggered faster than they finish, only the newest
//! request's output should be kept. Each request takes a [`Generation`]
//! from [`Generations::begin`]; before committing an output the sink asks
//! [`Generations::is_current`] and drops the result if a newer request has
//! started in the meantime.
//!
//! ```
//! use gridpaint::generation::Generations;
//!
//! let generations = Generations::new();
//! let first = generations.begin();
//! let second = generations.begin();
//! assert!(!generations.is_current(first));
//! assert!(generations.is_current(second));
//! ```

use std::sync::atomic::{AtomicU64, Ordering};

/// Token identifying one request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Generation(u64);

impl Generation {
    pub fn get(self) -> u64 {
        self.0
    }
}

/// Monotonic source of generations.
#[derive(Debug, Default)]
pub struct Generations {
    latest: AtomicU64,
}

impl Generations {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a new request, superseding every earlier one.
    pub fn begin(&self) -> Generation {
        Generation(self.latest.fetch_add(1, Ordering::AcqRel) + 1)
    }

    /// Whether `generation` is still the newest request.
    pub fn is_current(&self, generation: Generation) -> bool {
        self.latest.load(Ordering::Acquire) == generation.0
    }

    /// Run `commit` only if `generation` is still current.
    ///
    /// Returns `None` when the result was stale and dropped.
    pub fn commit_if_current<T>(&self, generation: Generation, commit: impl FnOnce() -> T) -> Option<T> {
        if self.is_current(generation) {
            Some(commit())
        } else {
            tracing::debug!(generation = generation.0, "discarding stale result");
            None
        }
    }
}
