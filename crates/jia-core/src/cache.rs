//! Generation-counted cache invalidation shared by the read views.
//!
//! A successful customer creation bumps the generation; the directory and
//! dashboard compare generations and refetch instead of merging the new
//! record into stale data.

use log::debug;
use std::sync::atomic::{AtomicU64, Ordering};

/// Shared invalidation handle for the customer-derived read caches.
#[derive(Debug, Default)]
pub struct CacheControl {
    generation: AtomicU64,
}

impl CacheControl {
    /// Create a fresh handle at generation zero.
    pub fn new() -> Self {
        Self::default()
    }

    /// Current generation.
    pub fn generation(&self) -> u64 {
        self.generation.load(Ordering::SeqCst)
    }

    /// Invalidate every cache keyed on this handle.
    pub fn invalidate(&self) {
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        debug!("caches invalidated (generation={generation})");
    }
}

/// A single cached value tied to a `CacheControl` generation.
#[derive(Debug, Default)]
pub struct Cached<T> {
    slot: Option<(u64, T)>,
}

impl<T> Cached<T> {
    /// Create an empty slot.
    pub fn new() -> Self {
        Self { slot: None }
    }

    /// Return the value if it was stored at the given generation.
    pub fn get(&self, generation: u64) -> Option<&T> {
        match &self.slot {
            Some((stored, value)) if *stored == generation => Some(value),
            _ => None,
        }
    }

    /// Store a value computed at the given generation.
    pub fn put(&mut self, generation: u64, value: T) {
        self.slot = Some((generation, value));
    }

    /// Drop any stored value.
    pub fn clear(&mut self) {
        self.slot = None;
    }
}
