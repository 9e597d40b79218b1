//! Poison-tolerant lock acquisition for the cache indices.
//!
//! A panic while holding a cache lock must not take routing down with it. The maps are
//! only mutated through whole `set`/`del` steps, so the recovered state is the last state
//! some writer left behind.

use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use tracing::warn;

pub(crate) fn read<'a, T>(
    lock: &'a RwLock<T>,
    cache: &'static str,
    op: &'static str,
) -> RwLockReadGuard<'a, T> {
    lock.read()
        .unwrap_or_else(|poisoned| recover(poisoned, cache, op, "rwlock.read"))
}

pub(crate) fn write<'a, T>(
    lock: &'a RwLock<T>,
    cache: &'static str,
    op: &'static str,
) -> RwLockWriteGuard<'a, T> {
    lock.write()
        .unwrap_or_else(|poisoned| recover(poisoned, cache, op, "rwlock.write"))
}

fn recover<G>(
    poisoned: PoisonError<G>,
    cache: &'static str,
    op: &'static str,
    lock_kind: &'static str,
) -> G {
    warn!(
        cache,
        op,
        lock_kind,
        result = "poisoned_recovered",
        "Recovered from poisoned target cache lock"
    );
    poisoned.into_inner()
}
