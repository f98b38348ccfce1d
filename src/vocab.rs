//! ActivityPub vocabulary shapes
//!
//! Typed views over the JSON-LD documents this crate consumes. Only the
//! properties follow handling needs are modeled; unknown properties are
//! ignored on deserialization.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{FederationError, Result};

/// `type` values accepted as actor documents.
const ACTOR_TYPES: [&str; 5] = ["Person", "Service", "Application", "Group", "Organization"];

/// A resolved remote identity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Actor {
    /// Canonical actor IRI.
    pub id: String,
    /// Delivery inbox IRI.
    pub inbox: String,
    #[serde(
        default,
        rename = "preferredUsername",
        skip_serializing_if = "Option::is_none"
    )]
    pub preferred_username: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub endpoints: Option<ActorEndpoints>,
}

/// The `endpoints` map of an actor document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActorEndpoints {
    #[serde(default, rename = "sharedInbox", skip_serializing_if = "Option::is_none")]
    pub shared_inbox: Option<String>,
}

impl Actor {
    /// Parse a fetched JSON document into an actor.
    ///
    /// Rejects documents whose `type` is not one of the ActivityStreams
    /// actor types, and documents missing `id` or `inbox`.
    pub fn from_document(document: &Value) -> Result<Self> {
        let kind = document
            .get("type")
            .and_then(Value::as_str)
            .ok_or_else(|| {
                FederationError::Validation("Missing type in actor document".to_string())
            })?;

        if !ACTOR_TYPES.iter().any(|t| t.eq_ignore_ascii_case(kind)) {
            return Err(FederationError::Resolution(format!(
                "Document is not actor-shaped: type {}",
                kind
            )));
        }

        serde_json::from_value(document.clone())
            .map_err(|e| FederationError::Validation(format!("Invalid actor document: {}", e)))
    }

    /// Inbox to prefer for delivery, falling back to the personal inbox
    /// when the actor advertises no shared one.
    pub fn delivery_inbox(&self) -> &str {
        self.endpoints
            .as_ref()
            .and_then(|e| e.shared_inbox.as_deref())
            .unwrap_or(&self.inbox)
    }
}

/// One entry of an activity's `actor` property.
///
/// JSON-LD allows an actor reference to be either a bare IRI string or an
/// embedded actor object; the two cases deserialize untagged.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ActorRef {
    /// Opaque IRI requiring external resolution.
    Iri(String),
    /// Fully materialized actor object embedded in the activity.
    Inline(Actor),
}

/// The ordered, possibly empty `actor` property of an activity.
///
/// JSON-LD allows a single value or an array of values; both deserialize
/// here, and an absent property becomes the empty collection via
/// `#[serde(default)]` on the activity field.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ActorProperty(Vec<ActorRef>);

impl ActorProperty {
    pub fn new(entries: Vec<ActorRef>) -> Self {
        Self(entries)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ActorRef> {
        self.0.iter()
    }
}

impl From<Vec<ActorRef>> for ActorProperty {
    fn from(entries: Vec<ActorRef>) -> Self {
        Self(entries)
    }
}

impl<'de> Deserialize<'de> for ActorProperty {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum OneOrMany {
            Many(Vec<ActorRef>),
            One(ActorRef),
        }

        Ok(match OneOrMany::deserialize(deserializer)? {
            OneOrMany::Many(entries) => ActorProperty(entries),
            OneOrMany::One(entry) => ActorProperty(vec![entry]),
        })
    }
}

/// An incoming Follow activity.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Follow {
    /// IRI identifying this activity instance.
    pub id: String,
    /// The purported originator.
    #[serde(default)]
    pub actor: ActorProperty,
    /// The follow target, kept raw for callers that verify it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub object: Option<Value>,
}

impl Follow {
    /// Parse a JSON-LD document, verifying its `type` tag first.
    pub fn from_document(document: &Value) -> Result<Self> {
        expect_activity_type(document, "Follow")?;
        serde_json::from_value(document.clone())
            .map_err(|e| FederationError::Validation(format!("Invalid Follow activity: {}", e)))
    }
}

/// An incoming Undo activity revoking a previously issued Follow.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Undo {
    /// IRI identifying this activity instance.
    pub id: String,
    /// The purported originator.
    #[serde(default)]
    pub actor: ActorProperty,
    /// The activity being undone, kept raw for callers that inspect it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub object: Option<Value>,
}

impl Undo {
    /// Parse a JSON-LD document, verifying its `type` tag first.
    pub fn from_document(document: &Value) -> Result<Self> {
        expect_activity_type(document, "Undo")?;
        serde_json::from_value(document.clone())
            .map_err(|e| FederationError::Validation(format!("Invalid Undo activity: {}", e)))
    }
}

fn expect_activity_type(document: &Value, expected: &str) -> Result<()> {
    let kind = document
        .get("type")
        .and_then(Value::as_str)
        .ok_or_else(|| FederationError::Validation("Missing activity type".to_string()))?;

    if kind != expected {
        return Err(FederationError::Validation(format!(
            "Expected {} activity, got {}",
            expected, kind
        )));
    }

    Ok(())
}
