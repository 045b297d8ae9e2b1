//! Domain error classification for decoded response bodies.
//!
//! The Peony server reports domain-level failures as a JSON object with
//! exactly four fields: `message`, `code`, `data`, `timestamp`. Any other
//! shape is an ordinary payload. The signature is matched exactly rather
//! than as a subset: legitimate resources may carry fields named like error
//! fields, and the exact four-field match minimizes false positives at the
//! acknowledged cost of being brittle if the server ever grows its error
//! shape.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Domain error field names, in wire order.
const DOMAIN_ERROR_FIELDS: [&str; 4] = ["message", "code", "data", "timestamp"];

/// Code the server uses for unauthenticated requests.
pub const UNAUTHENTICATED_CODE: i64 = 401;

/// Returns true iff `value` is a JSON object whose field set is exactly
/// `{message, code, data, timestamp}`. Field value types are not checked
/// beyond presence. Total and side-effect-free on any input.
pub fn is_domain_error(value: &Value) -> bool {
    match value.as_object() {
        Some(map) => {
            map.len() == DOMAIN_ERROR_FIELDS.len()
                && DOMAIN_ERROR_FIELDS.iter().all(|field| map.contains_key(*field))
        }
        None => false,
    }
}

/// A structured error payload returned by the server.
///
/// Immutable snapshot of a decoded response body that satisfied
/// [`is_domain_error`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DomainError {
    pub message: String,
    pub code: i64,
    pub data: Value,
    pub timestamp: Value,
}

impl DomainError {
    /// Classify `value` and, when it matches the domain error signature,
    /// snapshot it. Field values of unexpected types are coerced rather
    /// than rejected, since classification is by field names only.
    pub fn from_value(value: &Value) -> Option<Self> {
        if !is_domain_error(value) {
            return None;
        }
        let map = value.as_object()?;

        let message = match &map["message"] {
            Value::String(text) => text.clone(),
            other => other.to_string(),
        };

        Some(Self {
            message,
            code: map["code"].as_i64().unwrap_or(0),
            data: map["data"].clone(),
            timestamp: map["timestamp"].clone(),
        })
    }

    /// Whether this error signifies an unauthenticated request.
    pub fn is_unauthenticated(&self) -> bool {
        self.code == UNAUTHENTICATED_CODE
    }
}

impl std::fmt::Display for DomainError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}] {}", self.code, self.message)
    }
}

/// Outcome of a request that obtained and decoded a response body: either
/// the expected resource or a structured domain error. Transport failures
/// are the `Err` arm of the surrounding [`crate::error::Result`].
#[derive(Debug, Clone, PartialEq)]
pub enum ApiOutcome<T> {
    Ok(T),
    Domain(DomainError),
}

impl<T> ApiOutcome<T> {
    /// The resource, if the request produced one.
    pub fn ok(self) -> Option<T> {
        match self {
            Self::Ok(value) => Some(value),
            Self::Domain(_) => None,
        }
    }

    /// The domain error, if the request produced one.
    pub fn domain_error(&self) -> Option<&DomainError> {
        match self {
            Self::Ok(_) => None,
            Self::Domain(error) => Some(error),
        }
    }

    pub fn is_ok(&self) -> bool {
        matches!(self, Self::Ok(_))
    }

    /// Map the resource arm, leaving a domain error untouched.
    pub fn map<U>(self, op: impl FnOnce(T) -> U) -> ApiOutcome<U> {
        match self {
            Self::Ok(value) => ApiOutcome::Ok(op(value)),
            Self::Domain(error) => ApiOutcome::Domain(error),
        }
    }
}
