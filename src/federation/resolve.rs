//! Actor resolution
//!
//! Collapses the polymorphic `actor` property of an activity to one
//! concrete actor, dereferencing IRI references through a pluggable
//! capability.

use std::future::Future;
use std::time::Duration;

use reqwest::header::ACCEPT;

use crate::error::{FederationError, Result};
use crate::vocab::{Actor, ActorProperty, ActorRef};

/// Media type requested when dereferencing actor IRIs.
const ACTIVITY_JSON: &str = "application/activity+json";

/// IRI-dereferencing capability consumed by the resolver.
///
/// `Ok(Some(actor))` when the referenced document resolves to an actor,
/// `Ok(None)` when resolution completes without producing one, `Err` when
/// the fetch or parse fails. Exactly one resolution attempt is made per
/// call, and the outcome is available before the call returns.
pub trait ResolveIri {
    fn resolve_iri(&self, iri: &str) -> impl Future<Output = Result<Option<Actor>>> + Send;
}

/// Outcome of walking an actor property.
///
/// `actor` and `error` are tracked independently: a reference that fails
/// late in the walk leaves an earlier resolved actor in place, so both
/// fields can be set at once. The follow builders decide which side wins.
#[derive(Debug, Default)]
pub struct ActorResolution {
    /// The last actor assigned during the walk, if any.
    pub actor: Option<Actor>,
    /// The last resolution failure encountered during the walk, if any.
    pub error: Option<FederationError>,
}

/// Resolve an activity's actor property to a single concrete actor.
///
/// Walks every entry in order without short-circuiting; later entries
/// overwrite earlier results (last-write-wins). A failing IRI reference
/// records its error and the walk continues, so the returned error is the
/// last one encountered even when a different entry produced the actor.
/// An empty property yields neither actor nor error; callers must treat
/// that case separately from failure.
pub async fn resolve_actor<R: ResolveIri>(
    resolver: &R,
    property: &ActorProperty,
) -> ActorResolution {
    tracing::debug!(entries = property.len(), "Resolving actor property");

    let mut resolution = ActorResolution::default();

    for entry in property.iter() {
        match entry {
            ActorRef::Inline(actor) => {
                resolution.actor = Some(actor.clone());
            }
            ActorRef::Iri(iri) => {
                tracing::debug!(%iri, "Dereferencing actor reference");
                match resolver.resolve_iri(iri).await {
                    Ok(Some(actor)) => resolution.actor = Some(actor),
                    Ok(None) => {}
                    Err(error) => resolution.error = Some(error),
                }
            }
        }
    }

    resolution
}

/// Configuration for the built-in HTTP resolver.
#[derive(Debug, Clone)]
pub struct FetchConfig {
    /// User-Agent sent with actor fetches.
    pub user_agent: String,
    /// Per-request timeout in seconds.
    pub timeout_secs: u64,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            user_agent: concat!("Followspot/", env!("CARGO_PKG_VERSION")).to_string(),
            timeout_secs: 30,
        }
    }
}

/// `ResolveIri` implementation that dereferences actor IRIs over HTTP.
///
/// Fetches with `Accept: application/activity+json` and parses the body as
/// an actor document. Request signing, caching, and retry policy are left
/// to callers that need them.
#[derive(Debug, Clone)]
pub struct HttpIriResolver {
    client: reqwest::Client,
}

impl HttpIriResolver {
    /// Build a resolver with its own HTTP client.
    pub fn new(config: &FetchConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(config.user_agent.clone())
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self { client })
    }

    /// Reuse an existing HTTP client, sharing its connection pool.
    pub fn from_client(client: reqwest::Client) -> Self {
        Self { client }
    }
}

impl ResolveIri for HttpIriResolver {
    async fn resolve_iri(&self, iri: &str) -> Result<Option<Actor>> {
        let target = url::Url::parse(iri).map_err(|e| {
            FederationError::Resolution(format!("Invalid actor IRI {}: {}", iri, e))
        })?;

        if !matches!(target.scheme(), "http" | "https") {
            return Err(FederationError::Resolution(format!(
                "Unsupported actor IRI scheme: {}",
                target.scheme()
            )));
        }

        let response = self
            .client
            .get(target)
            .header(ACCEPT, ACTIVITY_JSON)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(FederationError::Resolution(format!(
                "Actor fetch for {} returned {}",
                iri, status
            )));
        }

        let document: serde_json::Value = response.json().await?;
        Actor::from_document(&document).map(Some)
    }
}
