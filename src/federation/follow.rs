//! Follow-request construction
//!
//! Turns incoming Follow and Undo(Follow) activities into the normalized
//! record the rest of a federation pipeline consumes.

use crate::error::{FederationError, Result};
use crate::vocab::{Follow, Undo};

use super::resolve::{ResolveIri, resolve_actor};

/// Normalized follow request derived from an incoming activity.
///
/// All fields are copied verbatim from the resolved actor and the activity;
/// no IRI normalization or syntax validation happens here.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FollowRequest {
    /// Resolved actor IRI.
    pub actor_iri: String,
    /// IRI of the Follow activity itself, used later to correlate an
    /// Accept/Reject or to identify which follow an Undo revokes.
    pub follow_iri: String,
    /// Resolved actor's inbox IRI.
    pub inbox: String,
}

/// Build a follow request from an incoming Follow activity.
///
/// Strict path: any actor-resolution failure aborts, and a resolution that
/// produced neither actor nor error maps to [`FederationError::NoActor`],
/// never a request with empty fields. Callers reject the follow on error.
pub async fn make_follow_request<R: ResolveIri>(
    resolver: &R,
    activity: &Follow,
) -> Result<FollowRequest> {
    tracing::debug!(activity = %activity.id, "Building follow request");

    let resolution = resolve_actor(resolver, &activity.actor).await;
    if let Some(error) = resolution.error {
        return Err(error);
    }
    let actor = resolution.actor.ok_or(FederationError::NoActor)?;

    let request = FollowRequest {
        actor_iri: actor.id,
        follow_iri: activity.id.clone(),
        inbox: actor.inbox,
    };
    tracing::debug!(
        actor = %request.actor_iri,
        follow = %request.follow_iri,
        "Follow request built"
    );

    Ok(request)
}

/// Build a follow request from an incoming Undo activity.
///
/// Lenient path: resolution failures are logged but tolerated as long as
/// some actor was still resolved, since failing to unfollow is lower-risk
/// than accepting a follow from an unverified actor. Returns `None` when no
/// actor could be resolved, leaving the caller nothing to undo.
pub async fn make_unfollow_request<R: ResolveIri>(
    resolver: &R,
    activity: &Undo,
) -> Option<FollowRequest> {
    tracing::debug!(activity = %activity.id, "Building unfollow request");

    let resolution = resolve_actor(resolver, &activity.actor).await;
    if let Some(error) = &resolution.error {
        tracing::warn!(
            activity = %activity.id,
            %error,
            "Actor resolution failed while handling Undo"
        );
    }
    let actor = resolution.actor?;

    let request = FollowRequest {
        actor_iri: actor.id,
        follow_iri: activity.id.clone(),
        inbox: actor.inbox,
    };
    tracing::debug!(
        actor = %request.actor_iri,
        follow = %request.follow_iri,
        "Unfollow request built"
    );

    Some(request)
}

#[cfg(test)]
mod tests {
    use std::collections::{HashMap, HashSet};

    use serde_json::json;

    use super::{FollowRequest, make_follow_request, make_unfollow_request};
    use crate::error::{FederationError, Result};
    use crate::federation::resolve::ResolveIri;
    use crate::vocab::{Actor, Follow, Undo};

    fn test_actor(id: &str, inbox: &str) -> Actor {
        Actor {
            id: id.to_string(),
            inbox: inbox.to_string(),
            preferred_username: None,
            name: None,
            endpoints: None,
        }
    }

    #[derive(Default)]
    struct TableResolver {
        actors: HashMap<String, Actor>,
        failures: HashSet<String>,
        silent: HashSet<String>,
    }

    impl TableResolver {
        fn with_actor(mut self, iri: &str, actor: Actor) -> Self {
            self.actors.insert(iri.to_string(), actor);
            self
        }

        fn with_failure(mut self, iri: &str) -> Self {
            self.failures.insert(iri.to_string());
            self
        }

        fn with_silent(mut self, iri: &str) -> Self {
            self.silent.insert(iri.to_string());
            self
        }
    }

    impl ResolveIri for TableResolver {
        async fn resolve_iri(&self, iri: &str) -> Result<Option<Actor>> {
            if self.failures.contains(iri) {
                return Err(FederationError::Resolution(format!(
                    "Actor fetch for {} returned 502 Bad Gateway",
                    iri
                )));
            }
            if self.silent.contains(iri) {
                return Ok(None);
            }

            Ok(self.actors.get(iri).cloned())
        }
    }

    #[tokio::test]
    async fn follow_request_copies_identifiers_verbatim() {
        let resolver = TableResolver::default();
        let follow = Follow::from_document(&json!({
            "type": "Follow",
            "id": "https://remote.example/activities/F1",
            "actor": {
                "id": "https://remote.example/users/A1",
                "inbox": "https://remote.example/users/A1/inbox"
            }
        }))
        .unwrap();

        let request = make_follow_request(&resolver, &follow).await.unwrap();

        assert_eq!(
            request,
            FollowRequest {
                actor_iri: "https://remote.example/users/A1".to_string(),
                follow_iri: "https://remote.example/activities/F1".to_string(),
                inbox: "https://remote.example/users/A1/inbox".to_string(),
            }
        );
    }

    #[tokio::test]
    async fn follow_request_resolves_iri_referenced_actor() {
        let resolver = TableResolver::default().with_actor(
            "https://remote.example/users/A1",
            test_actor(
                "https://remote.example/users/A1",
                "https://remote.example/users/A1/inbox",
            ),
        );
        let follow = Follow::from_document(&json!({
            "type": "Follow",
            "id": "https://remote.example/activities/F1",
            "actor": "https://remote.example/users/A1"
        }))
        .unwrap();

        let request = make_follow_request(&resolver, &follow).await.unwrap();
        assert_eq!(request.actor_iri, "https://remote.example/users/A1");
        assert_eq!(request.inbox, "https://remote.example/users/A1/inbox");
    }

    #[tokio::test]
    async fn follow_request_propagates_resolution_failure() {
        let resolver = TableResolver::default().with_failure("https://remote.example/users/A1");
        let follow = Follow::from_document(&json!({
            "type": "Follow",
            "id": "https://remote.example/activities/F1",
            "actor": "https://remote.example/users/A1"
        }))
        .unwrap();

        let error = make_follow_request(&resolver, &follow).await.unwrap_err();
        assert!(matches!(error, FederationError::Resolution(_)));
    }

    #[tokio::test]
    async fn follow_request_fails_even_when_an_earlier_actor_resolved() {
        // Strict path: the stale error from the second reference still
        // aborts the follow, despite the inline actor being available.
        let resolver = TableResolver::default().with_failure("https://remote.example/users/A2");
        let follow = Follow::from_document(&json!({
            "type": "Follow",
            "id": "https://remote.example/activities/F1",
            "actor": [
                {
                    "id": "https://remote.example/users/A1",
                    "inbox": "https://remote.example/users/A1/inbox"
                },
                "https://remote.example/users/A2"
            ]
        }))
        .unwrap();

        let error = make_follow_request(&resolver, &follow).await.unwrap_err();
        assert!(matches!(error, FederationError::Resolution(_)));
    }

    #[tokio::test]
    async fn follow_request_without_actor_is_no_actor_error_not_empty_fields() {
        let resolver = TableResolver::default();
        let follow = Follow::from_document(&json!({
            "type": "Follow",
            "id": "https://remote.example/activities/F1"
        }))
        .unwrap();

        let error = make_follow_request(&resolver, &follow).await.unwrap_err();
        assert!(matches!(error, FederationError::NoActor));
    }

    #[tokio::test]
    async fn follow_request_treats_silent_resolution_as_no_actor() {
        let resolver = TableResolver::default().with_silent("https://remote.example/users/A1");
        let follow = Follow::from_document(&json!({
            "type": "Follow",
            "id": "https://remote.example/activities/F1",
            "actor": "https://remote.example/users/A1"
        }))
        .unwrap();

        let error = make_follow_request(&resolver, &follow).await.unwrap_err();
        assert!(matches!(error, FederationError::NoActor));
    }

    #[tokio::test]
    async fn unfollow_request_survives_intermediate_resolution_failure() {
        let resolver = TableResolver::default().with_failure("https://remote.example/users/A2");
        let undo = Undo::from_document(&json!({
            "type": "Undo",
            "id": "https://remote.example/activities/U1",
            "actor": [
                {
                    "id": "https://remote.example/users/A1",
                    "inbox": "https://remote.example/users/A1/inbox"
                },
                "https://remote.example/users/A2"
            ]
        }))
        .unwrap();

        let request = make_unfollow_request(&resolver, &undo)
            .await
            .expect("actor was resolved, request expected");

        assert_eq!(request.actor_iri, "https://remote.example/users/A1");
        assert_eq!(request.follow_iri, "https://remote.example/activities/U1");
        assert_eq!(request.inbox, "https://remote.example/users/A1/inbox");
    }

    #[tokio::test]
    async fn unfollow_request_is_none_when_resolution_fails_entirely() {
        let resolver = TableResolver::default().with_failure("https://remote.example/users/A1");
        let undo = Undo::from_document(&json!({
            "type": "Undo",
            "id": "https://remote.example/activities/U1",
            "actor": "https://remote.example/users/A1"
        }))
        .unwrap();

        assert!(make_unfollow_request(&resolver, &undo).await.is_none());
    }

    #[tokio::test]
    async fn unfollow_request_is_none_for_empty_actor_property() {
        let resolver = TableResolver::default();
        let undo = Undo::from_document(&json!({
            "type": "Undo",
            "id": "https://remote.example/activities/U1"
        }))
        .unwrap();

        assert!(make_unfollow_request(&resolver, &undo).await.is_none());
    }

    #[tokio::test]
    async fn unfollow_request_copies_identifiers_verbatim() {
        let resolver = TableResolver::default().with_actor(
            "https://remote.example/users/A1",
            test_actor(
                "https://remote.example/users/A1",
                "https://remote.example/users/A1/inbox",
            ),
        );
        let undo = Undo::from_document(&json!({
            "type": "Undo",
            "id": "https://remote.example/activities/U1",
            "actor": "https://remote.example/users/A1",
            "object": {
                "type": "Follow",
                "id": "https://remote.example/activities/F1"
            }
        }))
        .unwrap();

        let request = make_unfollow_request(&resolver, &undo).await.unwrap();
        assert_eq!(
            request,
            FollowRequest {
                actor_iri: "https://remote.example/users/A1".to_string(),
                follow_iri: "https://remote.example/activities/U1".to_string(),
                inbox: "https://remote.example/users/A1/inbox".to_string(),
            }
        );
    }
}
