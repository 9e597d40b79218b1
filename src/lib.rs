//! Reactive target cache for the event gateway.
//!
//! The gateway keeps functions, HTTP endpoints and pub/sub bindings in an external
//! configuration store. [`targetcache`] mirrors them in memory so routing decisions never
//! touch the store; [`feed`] carries the store's change notifications into those caches.

pub mod config;
pub mod feed;
pub mod infra;
pub mod targetcache;
