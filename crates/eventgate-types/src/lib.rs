//! Record types mirrored from the event gateway configuration store.
//!
//! Every record kind the gateway routes on (functions, HTTP endpoints, publisher and
//! subscriber bindings) is defined here together with its opaque identifier type, so the
//! cache layer and any tooling agree on the JSON wire shape.

mod endpoints;
mod functions;
mod ids;
mod kind;
mod pubsub;

pub use endpoints::Endpoint;
pub use functions::{Function, Provider};
pub use ids::{EndpointId, FunctionId, PublisherId, SubscriberId, TopicId};
pub use kind::EntityKind;
pub use pubsub::{FunctionEnd, Publisher, Subscriber};
