//! Coercion of arbitrary caught values into [`HttpError`].

use crate::config::{HttpErrorOptions, DEFAULT_STATUS, MAX_ERROR_STATUS, MIN_ERROR_STATUS};
use crate::types::{Cause, Extensions, HeadersInit, ProblemDetails, RESERVED_KEYS};
use crate::HttpError;
use serde_json::{Map, Value};
use std::sync::Arc;
use tracing::{debug, warn};

/// Message used when a value matches no known error shape.
pub const UNEXPECTED_ERROR_MESSAGE: &str = "unexpected error type";

/// An error from another hierarchy that carries an HTTP status.
///
/// Implementing this lets [`HttpError::coerce`] rebuild the error without
/// losing its status or metadata.
pub trait ErrorLike: std::error::Error + Send + Sync + 'static {
    /// Numeric HTTP status.
    fn http_status(&self) -> i64;

    /// Additional fields to carry over.
    ///
    /// The message defaults to the error's `Display` output when not set here.
    fn problem_options(&self) -> HttpErrorOptions {
        HttpErrorOptions::new()
    }
}

impl ErrorLike for HttpError {
    fn http_status(&self) -> i64 {
        i64::from(self.status())
    }

    fn problem_options(&self) -> HttpErrorOptions {
        self.clone().into_options()
    }
}

/// A caught value of any kind.
pub enum Thrown {
    /// Already normalized.
    Http(HttpError),
    /// Error carrying its own status.
    ErrorLike(Box<dyn ErrorLike>),
    /// Error without a status.
    Error(Box<dyn std::error::Error + Send + Sync + 'static>),
    /// Loosely-typed value, such as a decoded JSON body.
    Value(Value),
}

impl Thrown {
    pub fn error_like(err: impl ErrorLike) -> Self {
        Thrown::ErrorLike(Box::new(err))
    }

    pub fn error(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Thrown::Error(Box::new(err))
    }
}

impl From<HttpError> for Thrown {
    fn from(err: HttpError) -> Self {
        Thrown::Http(err)
    }
}

impl From<Box<dyn std::error::Error + Send + Sync + 'static>> for Thrown {
    fn from(err: Box<dyn std::error::Error + Send + Sync + 'static>) -> Self {
        Thrown::Error(err)
    }
}

impl From<Box<dyn ErrorLike>> for Thrown {
    fn from(err: Box<dyn ErrorLike>) -> Self {
        Thrown::ErrorLike(err)
    }
}

impl From<Value> for Thrown {
    fn from(value: Value) -> Self {
        Thrown::Value(value)
    }
}

/// Whether a value looks like a problem-details payload.
///
/// True for objects with at least one of `status`, `title` or `type`.
pub fn is_problem_details(value: &Value) -> bool {
    value
        .as_object()
        .is_some_and(|map| ["status", "title", "type"].iter().any(|key| map.contains_key(*key)))
}

impl HttpError {
    /// Normalize any caught value into an `HttpError`. Never fails.
    ///
    /// - an `HttpError` is returned unchanged
    /// - an error with a status is rebuilt with its metadata
    /// - an error without a status becomes a 500 with the error as cause
    /// - a problem-details value is mapped field by field
    /// - anything else becomes a 500 with the value as cause
    pub fn coerce(thrown: impl Into<Thrown>) -> HttpError {
        match thrown.into() {
            Thrown::Http(err) => err,
            Thrown::ErrorLike(err) => from_error_like(err),
            Thrown::Error(err) => match err.downcast::<HttpError>() {
                Ok(err) => *err,
                Err(err) => from_std_error(err),
            },
            Thrown::Value(value) => Self::from_value(value),
        }
    }

    /// Rebuild an error from a loosely-typed value.
    pub fn from_value(value: Value) -> HttpError {
        let shape = match &value {
            Value::Object(map) if is_json_error_like(map) => Shape::ErrorLike,
            Value::Object(_) if is_problem_details(&value) => Shape::Problem,
            _ => Shape::Unknown,
        };

        match (shape, value) {
            (Shape::ErrorLike, Value::Object(map)) => from_json_error_like(map),
            (Shape::Problem, Value::Object(map)) => from_problem_map(map, None),
            (_, value) => {
                debug!(kind = "unexpected", "coercing unrecognized value");
                HttpError::internal(UNEXPECTED_ERROR_MESSAGE, Some(Cause::Value(value)))
            }
        }
    }
}

impl ProblemDetails {
    /// Rebuild the error this payload describes.
    pub fn into_http_error(self) -> HttpError {
        match self.to_value() {
            Value::Object(map) => from_problem_map(map, None),
            value => HttpError::from_value(value),
        }
    }
}

enum Shape {
    ErrorLike,
    Problem,
    Unknown,
}

/// Keys only an error object carries, never a problem-details payload.
const ERROR_LIKE_KEYS: [&str; 6] = [
    "message",
    "name",
    "expose",
    "exposedMessage",
    "extensions",
    "headers",
];

/// A JSON error object: numeric status and error fields, but no payload fields.
fn is_json_error_like(map: &Map<String, Value>) -> bool {
    map.get("status").is_some_and(Value::is_number)
        && !map.contains_key("title")
        && !map.contains_key("detail")
        && ERROR_LIKE_KEYS.iter().any(|key| map.contains_key(*key))
}

fn from_error_like(err: Box<dyn ErrorLike>) -> HttpError {
    let status = err.http_status();
    let mut options = err.problem_options();
    if options.message.is_none() {
        options.message = Some(err.to_string());
    }
    options.status = Some(status);

    match HttpError::from_options(options) {
        Ok(rebuilt) => {
            debug!(kind = "error_like", status, "rebuilt error with status");
            rebuilt
        }
        Err(_) => {
            warn!(status, "error status out of range, wrapping as internal error");
            let message = err.to_string();
            let cause: Arc<dyn std::error::Error + Send + Sync> = Arc::new(ErrorLikeCause(err));
            HttpError::internal(message, Some(Cause::Error(cause)))
        }
    }
}

fn from_std_error(err: Box<dyn std::error::Error + Send + Sync + 'static>) -> HttpError {
    debug!(kind = "error", "wrapping error without status");
    let message = err.to_string();
    HttpError::internal(message, Some(Cause::Error(Arc::from(err))))
}

/// Keeps an [`ErrorLike`] usable as a plain error cause.
#[derive(Debug)]
struct ErrorLikeCause(Box<dyn ErrorLike>);

impl std::fmt::Display for ErrorLikeCause {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        std::fmt::Display::fmt(&self.0, f)
    }
}

impl std::error::Error for ErrorLikeCause {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.0.source()
    }
}

fn string_field(map: &mut Map<String, Value>, key: &str) -> Option<String> {
    match map.remove(key) {
        Some(Value::String(s)) => Some(s),
        _ => None,
    }
}

/// Status from a payload, falling back when absent or not an error status.
fn payload_status(value: Option<&Value>, fallback: Option<i64>) -> i64 {
    let status = value.and_then(Value::as_i64).or(fallback);
    match status {
        Some(s) if (MIN_ERROR_STATUS..=MAX_ERROR_STATUS).contains(&s) => s,
        Some(s) => {
            warn!(status = s, "payload status is not an error status, using 500");
            DEFAULT_STATUS
        }
        None => DEFAULT_STATUS,
    }
}

/// Map a problem-details object onto an error.
///
/// `fallback_status` is used when the payload has no status of its own.
pub(crate) fn from_problem_map(
    mut map: Map<String, Value>,
    fallback_status: Option<i64>,
) -> HttpError {
    let status = payload_status(map.get("status"), fallback_status);
    let mut options = HttpErrorOptions::new().status(status);
    options.name = string_field(&mut map, "title");
    options.message = string_field(&mut map, "detail");
    options.problem_type = string_field(&mut map, "type");
    options.instance = string_field(&mut map, "instance");

    let extensions: Extensions = map
        .into_iter()
        .filter(|(key, _)| !RESERVED_KEYS.contains(&key.as_str()))
        .collect();
    options.extensions = Some(extensions);

    debug!(kind = "problem_details", status, "mapped problem details payload");
    build_or_internal(options)
}

fn from_json_error_like(mut map: Map<String, Value>) -> HttpError {
    let status = map.get("status").and_then(Value::as_i64);
    let status = match status {
        Some(s) if (MIN_ERROR_STATUS..=MAX_ERROR_STATUS).contains(&s) => s,
        status => {
            warn!(?status, "error status out of range, wrapping as internal error");
            let message = map
                .get("message")
                .and_then(Value::as_str)
                .unwrap_or_default()
                .to_string();
            return HttpError::internal(message, Some(Cause::Value(Value::Object(map))));
        }
    };
    let mut options = HttpErrorOptions::new().status(status);
    options.name = string_field(&mut map, "name");
    options.message = string_field(&mut map, "message");
    options.exposed_message = string_field(&mut map, "exposedMessage");
    options.status_text = string_field(&mut map, "statusText");
    options.problem_type = string_field(&mut map, "type");
    options.instance = string_field(&mut map, "instance");
    options.expose = map.get("expose").and_then(Value::as_bool);
    if let Some(Value::Object(extensions)) = map.remove("extensions") {
        options.extensions = Some(extensions);
    }
    if let Some(Value::Object(headers)) = map.remove("headers") {
        options.headers = Some(HeadersInit::Pairs(header_pairs(headers)).into_header_map());
    }
    options.cause = map.remove("cause").map(Cause::Value);

    debug!(kind = "error_like", status, "rebuilt error from value");
    build_or_internal(options)
}

/// Flatten a JSON header object; array values become repeated headers.
fn header_pairs(headers: Map<String, Value>) -> Vec<(String, String)> {
    let mut pairs = Vec::with_capacity(headers.len());
    for (name, value) in headers {
        match value {
            Value::String(s) => pairs.push((name, s)),
            Value::Array(values) => {
                for value in values {
                    if let Value::String(s) = value {
                        pairs.push((name.clone(), s));
                    }
                }
            }
            _ => warn!(header = %name, "dropping non-string header value"),
        }
    }
    pairs
}

fn build_or_internal(options: HttpErrorOptions) -> HttpError {
    let message = options.message.clone().unwrap_or_default();
    HttpError::from_options(options).unwrap_or_else(|_| HttpError::internal(message, None))
}
