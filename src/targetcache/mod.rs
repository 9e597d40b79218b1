//! In-memory routing state mirrored from the configuration store.
//!
//! The store publishes created/modified/deleted notifications for four record kinds. Each
//! kind has a cache that applies those notifications through the two-operation [`Cache`]
//! contract, with [`CacheMaintainer`] collapsing the three-way [`Reactive`] stream onto it.
//! Updates that cannot be applied go to an [`ErrorSink`]; they never reach the notifier.
//!
//! [`TargetCache`] owns one cache of each kind and answers the router's questions through
//! [`Targeter`].

mod entity;
mod error;
mod lock;
mod maintainer;
mod multimap;
mod path;
mod publisher;
mod sink;
mod subscriber;
mod targeter;

pub use entity::{EndpointCache, Entity, EntityCache, FunctionCache};
pub use error::CacheError;
pub use maintainer::{Cache, CacheMaintainer, Reactive};
pub use multimap::SetMultiMap;
pub use path::{Params, PathMatcher, SegmentMatcher, Specificity};
pub use publisher::{PublisherCache, PublisherSnapshot};
pub use sink::{ErrorSink, RecordingSink, TracingSink};
pub use subscriber::SubscriberCache;
pub use targeter::{Reactors, TargetCache, TargetSnapshot, Targeter};
