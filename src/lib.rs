//! Followspot - ActivityPub follow-request resolution
//!
//! Resolves the remote actor behind an incoming `Follow` or `Undo(Follow)`
//! activity and produces the normalized record a federation pipeline needs
//! to accept, reject, or revoke the follow.
//!
//! The `actor` property of an activity is polymorphic: it may embed a full
//! actor object, or carry only an IRI that has to be dereferenced over the
//! network. This crate collapses either shape (or a mix of several entries)
//! to exactly one concrete actor, then assembles the follow request:
//!
//! ```text
//! Activity (Follow | Undo)
//!          │
//!          ▼
//!   Actor Resolver ──── ResolveIri capability ───▶ remote server
//!          │
//!          ▼
//!   Follow-Request Builder
//!          │
//!          ▼
//!   FollowRequest { actor_iri, follow_iri, inbox }
//! ```
//!
//! # Modules
//!
//! - `vocab`: typed ActivityPub activity and actor shapes
//! - `federation`: actor resolution and follow-request construction
//! - `error`: error types
//!
//! Signature verification, follower persistence, and Accept/Reject delivery
//! are deliberately left to the surrounding server.

pub mod error;
pub mod federation;
pub mod vocab;

pub use error::{FederationError, Result};
pub use federation::{
    ActorResolution, FetchConfig, FollowRequest, HttpIriResolver, ResolveIri, make_follow_request,
    make_unfollow_request, resolve_actor,
};
pub use vocab::{Actor, ActorEndpoints, ActorProperty, ActorRef, Follow, Undo};
