//! Update contract shared by all caches, and the adapter feeding it.

use std::sync::Arc;

/// Two-operation update contract every cache implements.
///
/// A create and a modification are handled identically, so both arrive as `set`. Neither
/// operation reports failure to the caller.
pub trait Cache: Send + Sync {
    fn set(&self, key: &str, value: &[u8]);
    fn del(&self, key: &str, value: &[u8]);
}

impl<C: Cache + ?Sized> Cache for Arc<C> {
    fn set(&self, key: &str, value: &[u8]) {
        (**self).set(key, value);
    }

    fn del(&self, key: &str, value: &[u8]) {
        (**self).del(key, value);
    }
}

/// Three-way change notifications as delivered by the configuration store watch.
pub trait Reactive: Send + Sync {
    fn created(&self, key: &str, value: &[u8]);
    fn modified(&self, key: &str, new_value: &[u8]);
    fn deleted(&self, key: &str, last_known_value: &[u8]);
}

/// Collapses [`Reactive`] notifications onto a [`Cache`].
#[derive(Debug, Clone)]
pub struct CacheMaintainer<C> {
    cache: C,
}

impl<C: Cache> CacheMaintainer<C> {
    pub fn new(cache: C) -> Self {
        Self { cache }
    }

    pub fn cache(&self) -> &C {
        &self.cache
    }
}

impl<C: Cache> Reactive for CacheMaintainer<C> {
    fn created(&self, key: &str, value: &[u8]) {
        self.cache.set(key, value);
    }

    fn modified(&self, key: &str, new_value: &[u8]) {
        self.cache.set(key, new_value);
    }

    fn deleted(&self, key: &str, last_known_value: &[u8]) {
        self.cache.del(key, last_known_value);
    }
}
