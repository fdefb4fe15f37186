// crates/plan-contract-core/src/plan.rs
// ============================================================================
// Module: Strategic Plan Model
// Description: Response-shaped strategic plan records and request payloads.
// Purpose: Decode plans through one documented schema with explicit fallbacks.
// Dependencies: serde, serde_json
// ============================================================================

//! ## Overview
//! Plans are owned by the remote application; this module only describes how
//! they look on the wire. Two irregularities are handled explicitly:
//!
//! - Responses may be wrapped in a `{ "data": ... }` envelope, which
//!   [`unwrap_envelope`] removes.
//! - The identifier field is resolved through [`IDENTIFIER_FIELDS`], first
//!   match wins.
//!
//! Enum fields keep unknown wire values verbatim so diagnostics can quote them
//! and so out-of-enum values can be sent on purpose.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fmt;

use serde::Deserialize;
use serde::Serialize;
use serde_json::Map;
use serde_json::Value;

use crate::error::DecodeError;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Identifier field spellings, in lookup order.
pub const IDENTIFIER_FIELDS: [&str; 5] = ["id", "_id", "ID", "Id", "planId"];

/// Envelope member that wraps payloads.
pub const ENVELOPE_FIELD: &str = "data";

// ============================================================================
// SECTION: Identifiers
// ============================================================================

/// Opaque server-assigned plan identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PlanId(String);

impl PlanId {
    /// Wraps a raw identifier.
    #[must_use]
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    /// Returns the raw identifier.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PlanId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

// ============================================================================
// SECTION: Enumerations
// ============================================================================

/// Plan priority.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Priority {
    /// `LOW`.
    Low,
    /// `MEDIUM`.
    Medium,
    /// `HIGH`.
    High,
    /// `CRITICAL`.
    Critical,
    /// Any other wire value, kept verbatim.
    #[serde(untagged)]
    Other(String),
}

impl Priority {
    /// Returns the wire value.
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Low => "LOW",
            Self::Medium => "MEDIUM",
            Self::High => "HIGH",
            Self::Critical => "CRITICAL",
            Self::Other(raw) => raw,
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Plan publication status.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PlanStatus {
    /// `DRAFT`.
    Draft,
    /// `UNDER_REVIEW`.
    UnderReview,
    /// `APPROVED`.
    Approved,
    /// `PUBLISHED`; the only status visible through the public listing.
    Published,
    /// `ARCHIVED`.
    Archived,
    /// Any other wire value, kept verbatim.
    #[serde(untagged)]
    Other(String),
}

impl PlanStatus {
    /// Returns the wire value.
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Draft => "DRAFT",
            Self::UnderReview => "UNDER_REVIEW",
            Self::Approved => "APPROVED",
            Self::Published => "PUBLISHED",
            Self::Archived => "ARCHIVED",
            Self::Other(raw) => raw,
        }
    }
}

impl fmt::Display for PlanStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// SECTION: Plan Record
// ============================================================================

/// A strategic plan as returned by the remote application.
///
/// # Invariants
/// - `id` was resolved through [`IDENTIFIER_FIELDS`].
/// - `extra` holds every member not modeled here (and not the identifier).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StrategicPlan {
    /// Server-assigned identifier.
    pub id: PlanId,
    /// Unique human-readable key.
    pub slug: String,
    /// Title.
    pub title: String,
    /// Body content.
    pub content: String,
    /// Priority, when present.
    pub priority: Option<Priority>,
    /// Status, when present.
    pub status: Option<PlanStatus>,
    /// Unmodeled members.
    pub extra: Map<String, Value>,
}

impl StrategicPlan {
    /// Decodes a plan, unwrapping a `data` envelope when present.
    ///
    /// # Errors
    ///
    /// Returns [`DecodeError::Shape`] when the payload is not an object, has
    /// no identifier, or misses a required string member.
    pub fn from_json(endpoint: &str, value: Value) -> Result<Self, DecodeError> {
        let shape = |message: String| DecodeError::Shape {
            endpoint: endpoint.to_string(),
            message,
        };
        let Value::Object(mut object) = unwrap_envelope(value) else {
            return Err(shape("plan payload is not a json object".to_string()));
        };

        let id = take_identifier(&mut object).ok_or_else(|| {
            shape(format!("plan has no identifier (looked for {})", IDENTIFIER_FIELDS.join(", ")))
        })?;
        let slug = take_string(&mut object, "slug").map_err(shape)?;
        let title = take_string(&mut object, "title").map_err(shape)?;
        let content = take_string(&mut object, "content").map_err(shape)?;
        let priority = take_enum::<Priority>(&mut object, "priority").map_err(shape)?;
        let status = take_enum::<PlanStatus>(&mut object, "status").map_err(shape)?;

        Ok(Self {
            id,
            slug,
            title,
            content,
            priority,
            status,
            extra: object,
        })
    }

    /// Returns a modeled field as JSON, for generic comparisons.
    #[must_use]
    pub fn field(&self, name: &str) -> Option<Value> {
        match name {
            "id" => Some(Value::String(self.id.to_string())),
            "slug" => Some(Value::String(self.slug.clone())),
            "title" => Some(Value::String(self.title.clone())),
            "content" => Some(Value::String(self.content.clone())),
            "priority" => self.priority.as_ref().map(|p| Value::String(p.as_str().to_string())),
            "status" => self.status.as_ref().map(|s| Value::String(s.as_str().to_string())),
            other => self.extra.get(other).cloned(),
        }
    }
}

/// Decodes a list of plans, unwrapping a `data` envelope when present.
///
/// # Errors
///
/// Returns [`DecodeError::Shape`] when the payload is not an array or any
/// element fails [`StrategicPlan::from_json`].
pub fn decode_plan_list(endpoint: &str, value: Value) -> Result<Vec<StrategicPlan>, DecodeError> {
    let Value::Array(items) = unwrap_envelope(value) else {
        return Err(DecodeError::Shape {
            endpoint: endpoint.to_string(),
            message: "expected a json array of plans".to_string(),
        });
    };
    items.into_iter().map(|item| StrategicPlan::from_json(endpoint, item)).collect()
}

/// Removes a top-level `{ "data": ... }` envelope.
#[must_use]
pub fn unwrap_envelope(value: Value) -> Value {
    match value {
        Value::Object(mut object) if object.contains_key(ENVELOPE_FIELD) => {
            object.remove(ENVELOPE_FIELD).unwrap_or(Value::Null)
        }
        other => other,
    }
}

/// Resolves a plan identifier without decoding the rest of the payload.
///
/// Accepts the same envelope and fallback fields as [`StrategicPlan::from_json`],
/// so a created plan can be tracked even when its other members are unusable.
#[must_use]
pub fn resolve_identifier(value: &Value) -> Option<PlanId> {
    let inner = match value {
        Value::Object(object) => object.get(ENVELOPE_FIELD).unwrap_or(value),
        other => other,
    };
    let Value::Object(object) = inner else {
        return None;
    };
    identifier_member(object).map(|(_, id)| id)
}

/// Finds the first usable identifier member; strings and numbers are accepted.
fn identifier_member(object: &Map<String, Value>) -> Option<(&'static str, PlanId)> {
    IDENTIFIER_FIELDS.iter().find_map(|field| match object.get(*field) {
        Some(Value::String(raw)) if !raw.is_empty() => Some((*field, PlanId::new(raw.clone()))),
        Some(Value::Number(raw)) => Some((*field, PlanId::new(raw.to_string()))),
        _ => None,
    })
}

/// Removes the identifier member resolved through [`IDENTIFIER_FIELDS`].
fn take_identifier(object: &mut Map<String, Value>) -> Option<PlanId> {
    let (field, id) = identifier_member(object)?;
    object.remove(field);
    Some(id)
}

/// Removes a required string member.
fn take_string(object: &mut Map<String, Value>, field: &str) -> Result<String, String> {
    match object.remove(field) {
        Some(Value::String(raw)) => Ok(raw),
        Some(other) => Err(format!("plan member {field} is not a string: {other}")),
        None => Err(format!("plan member {field} is missing")),
    }
}

/// Removes an optional enum member; `null` reads as absent.
fn take_enum<T>(object: &mut Map<String, Value>, field: &str) -> Result<Option<T>, String>
where
    T: for<'de> Deserialize<'de>,
{
    match object.remove(field) {
        None | Some(Value::Null) => Ok(None),
        Some(raw) => serde_json::from_value(raw)
            .map(Some)
            .map_err(|err| format!("plan member {field} is invalid: {err}")),
    }
}

// ============================================================================
// SECTION: Request Payloads
// ============================================================================

/// Create payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NewPlan {
    /// Title.
    pub title: String,
    /// Unique slug.
    pub slug: String,
    /// Body content.
    pub content: String,
    /// Priority.
    pub priority: Priority,
    /// Status.
    pub status: PlanStatus,
}

impl NewPlan {
    /// Creates a payload with the given slug and placeholder text.
    #[must_use]
    pub fn fixture(slug: impl Into<String>, priority: Priority, status: PlanStatus) -> Self {
        let slug = slug.into();
        Self {
            title: format!("Contract Test Plan {slug}"),
            content: format!("Fixture content for {slug}."),
            slug,
            priority,
            status,
        }
    }

    /// Serializes to a JSON body.
    #[must_use]
    pub fn to_json(&self) -> Value {
        serde_json::to_value(self).unwrap_or(Value::Null)
    }
}

/// Partial update payload; absent fields are omitted from the body.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PlanPatch {
    /// New title.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// New slug.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub slug: Option<String>,
    /// New content.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    /// New priority.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub priority: Option<Priority>,
    /// New status.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<PlanStatus>,
}

impl PlanPatch {
    /// Serializes to a JSON body.
    #[must_use]
    pub fn to_json(&self) -> Value {
        serde_json::to_value(self).unwrap_or(Value::Null)
    }

    /// Returns each supplied field with its expected JSON value.
    #[must_use]
    pub fn supplied_fields(&self) -> Vec<(String, Value)> {
        match self.to_json() {
            Value::Object(object) => object.into_iter().collect(),
            _ => Vec::new(),
        }
    }
}
