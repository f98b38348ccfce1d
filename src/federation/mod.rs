//! ActivityPub follow handling
//!
//! Handles:
//! - Actor resolution (inline objects and IRI references)
//! - Follow / Undo(Follow) request construction
//! - HTTP actor fetching

mod follow;
mod resolve;

pub use follow::{FollowRequest, make_follow_request, make_unfollow_request};
pub use resolve::{ActorResolution, FetchConfig, HttpIriResolver, ResolveIri, resolve_actor};
