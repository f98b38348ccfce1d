//! Error types for Followspot
//!
//! Every failure in the crate is surfaced as a `FederationError` so callers
//! have a single enum to match on when deciding how to dispose of an
//! incoming activity.

use thiserror::Error;

/// Crate-wide error type
#[derive(Debug, Error)]
pub enum FederationError {
    /// The IRI-resolution capability failed for a referenced actor
    /// (unreachable server, non-success status, non-actor document).
    #[error("Resolution failed: {0}")]
    Resolution(String),

    /// No entry of the actor property yielded a usable actor.
    #[error("No actor resolved")]
    NoActor,

    /// Malformed activity or actor document.
    #[error("Validation error: {0}")]
    Validation(String),

    /// Transport failure in the built-in HTTP resolver.
    #[error("HTTP client error: {0}")]
    HttpClient(#[from] reqwest::Error),
}

/// Result type alias using FederationError
pub type Result<T> = std::result::Result<T, FederationError>;
