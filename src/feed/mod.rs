//! Change notifications from the configuration store and the worker that applies them.
//!
//! Notifications travel over a bounded `tokio` channel to a single [`FeedWorker`], which
//! dispatches each one to the matching [`Reactors`](crate::targetcache::Reactors) adapter.
//! [`replay`] reads a recorded JSON-lines feed into that channel.

mod error;
mod notification;
mod replay;
mod worker;

pub use error::FeedError;
pub use notification::{Notification, Operation};
pub use replay::{ReplayStats, replay};
pub use worker::FeedWorker;
