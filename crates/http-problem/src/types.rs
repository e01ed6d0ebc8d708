//! Wire payload and supporting value types.

use http::header::{HeaderMap, HeaderName, HeaderValue};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use tracing::warn;

/// Application-defined fields flattened into the wire payload.
pub type Extensions = serde_json::Map<String, Value>;

/// Keys owned by the fixed problem-details fields.
pub const RESERVED_KEYS: [&str; 5] = ["status", "title", "detail", "type", "instance"];

/// Problem details payload (RFC 9457).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProblemDetails {
    pub status: u16,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub problem_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub instance: Option<String>,
    #[serde(flatten)]
    pub extensions: Extensions,
}

impl ProblemDetails {
    /// Parse a strictly-shaped payload from JSON bytes.
    pub fn from_slice(bytes: &[u8]) -> Result<Self, crate::Error> {
        Ok(serde_json::from_slice(bytes)?)
    }

    /// Parse a strictly-shaped payload from a JSON value.
    pub fn from_value(value: Value) -> Result<Self, crate::Error> {
        Ok(serde_json::from_value(value)?)
    }

    /// Serialize the payload to a JSON string.
    pub fn to_json_string(&self) -> Result<String, crate::Error> {
        Ok(serde_json::to_string(self)?)
    }

    /// Serialize the payload to a JSON value.
    pub fn to_value(&self) -> Value {
        let mut map = self.extensions.clone();
        map.insert("status".into(), Value::from(self.status));
        map.insert("title".into(), Value::from(self.title.clone()));
        if let Some(detail) = &self.detail {
            map.insert("detail".into(), Value::from(detail.clone()));
        }
        if let Some(problem_type) = &self.problem_type {
            map.insert("type".into(), Value::from(problem_type.clone()));
        }
        if let Some(instance) = &self.instance {
            map.insert("instance".into(), Value::from(instance.clone()));
        }
        Value::Object(map)
    }
}

/// Originating error or value behind an [`HttpError`](crate::HttpError).
///
/// Never serialized outward.
#[derive(Clone)]
pub enum Cause {
    Error(Arc<dyn std::error::Error + Send + Sync + 'static>),
    Value(Value),
}

impl Cause {
    /// Wrap an error as a cause.
    pub fn error(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Cause::Error(Arc::new(err))
    }

    /// Wrap an arbitrary value as a cause.
    pub fn value(value: impl Into<Value>) -> Self {
        Cause::Value(value.into())
    }

    pub fn as_error(&self) -> Option<&(dyn std::error::Error + Send + Sync + 'static)> {
        match self {
            Cause::Error(err) => Some(err.as_ref()),
            Cause::Value(_) => None,
        }
    }

    pub fn as_value(&self) -> Option<&Value> {
        match self {
            Cause::Value(value) => Some(value),
            Cause::Error(_) => None,
        }
    }

    /// Downcast an error cause to a concrete type.
    pub fn downcast_ref<T: std::error::Error + 'static>(&self) -> Option<&T> {
        self.as_error().and_then(|err| err.downcast_ref::<T>())
    }
}

impl fmt::Debug for Cause {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Cause::Error(err) => f.debug_tuple("Error").field(err).finish(),
            Cause::Value(value) => f.debug_tuple("Value").field(value).finish(),
        }
    }
}

impl From<Value> for Cause {
    fn from(value: Value) -> Self {
        Cause::Value(value)
    }
}

/// Header input accepted by [`HttpErrorOptions::headers`](crate::HttpErrorOptions::headers).
///
/// Either an already-typed multi-map or plain name/value pairs.
#[derive(Debug, Clone)]
pub enum HeadersInit {
    Map(HeaderMap),
    Pairs(Vec<(String, String)>),
}

impl HeadersInit {
    /// Convert into a case-insensitive multi-map.
    ///
    /// Invalid names or values in plain pairs are dropped.
    pub fn into_header_map(self) -> HeaderMap {
        match self {
            HeadersInit::Map(map) => map,
            HeadersInit::Pairs(pairs) => {
                let mut map = HeaderMap::with_capacity(pairs.len());
                for (name, value) in pairs {
                    append_header(&mut map, &name, &value);
                }
                map
            }
        }
    }
}

/// Append a header given as strings, skipping it when invalid.
pub(crate) fn append_header(map: &mut HeaderMap, name: &str, value: &str) {
    let parsed = (
        HeaderName::from_bytes(name.as_bytes()),
        HeaderValue::from_str(value),
    );
    match parsed {
        (Ok(name), Ok(value)) => {
            map.append(name, value);
        }
        _ => warn!(header = %name, "dropping invalid header"),
    }
}

impl From<HeaderMap> for HeadersInit {
    fn from(map: HeaderMap) -> Self {
        HeadersInit::Map(map)
    }
}

impl From<Vec<(String, String)>> for HeadersInit {
    fn from(pairs: Vec<(String, String)>) -> Self {
        HeadersInit::Pairs(pairs)
    }
}

impl From<HashMap<String, String>> for HeadersInit {
    fn from(map: HashMap<String, String>) -> Self {
        HeadersInit::Pairs(map.into_iter().collect())
    }
}

impl<const N: usize> From<[(&str, &str); N]> for HeadersInit {
    fn from(pairs: [(&str, &str); N]) -> Self {
        HeadersInit::Pairs(
            pairs
                .into_iter()
                .map(|(name, value)| (name.to_string(), value.to_string()))
                .collect(),
        )
    }
}
