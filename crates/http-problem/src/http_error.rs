//! The HTTP error value type.

use crate::config::{
    ErrorArgs, HttpErrorOptions, DEFAULT_STATUS, MAX_ERROR_STATUS, MIN_ERROR_STATUS,
    PROBLEM_JSON_CONTENT_TYPE,
};
use crate::status;
use crate::types::{Cause, Extensions, ProblemDetails};
use crate::Error;
use http::header::{HeaderMap, HeaderValue, CONTENT_TYPE};
use http::StatusCode;
use serde::{Serialize, Serializer};
use std::fmt;

/// An HTTP error with a 4xx or 5xx status.
///
/// Every optional field is derived from the status when not given: the name
/// from the standard reason phrase, `expose` from whether the status is a
/// client error, and the exposed message from the message or a safe default.
///
/// # Example
///
/// ```rust
/// use http_problem::{HttpError, HttpErrorOptions};
///
/// # fn main() -> Result<(), http_problem::Error> {
/// let err = HttpError::new((404, "no row for id 7"))?;
/// assert_eq!(err.name(), "Not Found");
/// assert_eq!(err.exposed_message(), "no row for id 7");
///
/// let err = HttpError::new((500, "sql blew up"))?;
/// assert_eq!(
///     err.exposed_message(),
///     "The server encountered an unexpected condition."
/// );
///
/// let err = HttpError::new((
///     "quota exhausted",
///     HttpErrorOptions::new().status(429).extension("retryAfter", 30),
/// ))?;
/// assert_eq!(err.extensions()["retryAfter"], 30);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct HttpError {
    status: u16,
    name: String,
    message: String,
    expose: bool,
    exposed_message: String,
    status_text: Option<String>,
    problem_type: Option<String>,
    instance: Option<String>,
    extensions: Extensions,
    headers: HeaderMap,
    cause: Option<Cause>,
}

impl HttpError {
    /// Construct from any supported call shape.
    ///
    /// Fails with [`Error::InvalidStatus`] when the resolved status is outside
    /// `400..=599`. A missing status defaults to 500.
    pub fn new(args: impl Into<ErrorArgs>) -> Result<Self, Error> {
        Self::from_options(args.into().resolve())
    }

    /// Construct from an already-resolved options record.
    pub fn from_options(options: HttpErrorOptions) -> Result<Self, Error> {
        let status = validate_status(options.status.unwrap_or(DEFAULT_STATUS))?;
        let message = options.message.unwrap_or_default();
        let name = options
            .name
            .unwrap_or_else(|| status::default_name(status).to_string());
        let expose = options.expose.unwrap_or(status < 500);
        let exposed_message = options.exposed_message.unwrap_or_else(|| {
            if expose && !message.is_empty() {
                message.clone()
            } else {
                status::safe_message(status).to_string()
            }
        });

        let mut headers = options.headers.unwrap_or_default();
        if !headers.contains_key(CONTENT_TYPE) {
            headers.insert(
                CONTENT_TYPE,
                HeaderValue::from_static(PROBLEM_JSON_CONTENT_TYPE),
            );
        }

        Ok(Self {
            status,
            name,
            message,
            expose,
            exposed_message,
            status_text: options.status_text,
            problem_type: options.problem_type,
            instance: options.instance,
            extensions: options.extensions.unwrap_or_default(),
            headers,
            cause: options.cause,
        })
    }

    /// Build a 500 error that cannot fail validation.
    pub(crate) fn internal(message: impl Into<String>, cause: Option<Cause>) -> Self {
        let message = message.into();
        Self {
            status: 500,
            name: status::default_name(500).to_string(),
            message,
            expose: false,
            exposed_message: status::safe_message(500).to_string(),
            status_text: None,
            problem_type: None,
            instance: None,
            extensions: Extensions::new(),
            headers: default_headers(),
            cause,
        }
    }

    /// Get the HTTP status.
    pub fn status(&self) -> u16 {
        self.status
    }

    /// Status as a typed [`StatusCode`].
    pub fn status_code(&self) -> StatusCode {
        // Validated at construction, always in range.
        StatusCode::from_u16(self.status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
    }

    /// Whether the status is in the 4xx range.
    pub fn is_client_error(&self) -> bool {
        self.status < 500
    }

    /// Whether the status is in the 5xx range.
    pub fn is_server_error(&self) -> bool {
        self.status >= 500
    }

    /// Get the display name, sent as `title`.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Internal description. May contain sensitive detail.
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Whether [`message`](Self::message) may be shown externally.
    pub fn expose(&self) -> bool {
        self.expose
    }

    /// Text that is safe to show to external consumers.
    pub fn exposed_message(&self) -> &str {
        &self.exposed_message
    }

    /// Get the status-line text override.
    pub fn status_text(&self) -> Option<&str> {
        self.status_text.as_deref()
    }

    /// Problem type URI reference.
    pub fn problem_type(&self) -> Option<&str> {
        self.problem_type.as_deref()
    }

    /// Problem instance URI reference.
    pub fn instance(&self) -> Option<&str> {
        self.instance.as_deref()
    }

    /// Get the extension members flattened into the payload.
    pub fn extensions(&self) -> &Extensions {
        &self.extensions
    }

    /// Response headers. Always contains a content type.
    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    /// Get the originating error or value. Never serialized.
    pub fn cause(&self) -> Option<&Cause> {
        self.cause.as_ref()
    }

    /// Wire payload for this error.
    ///
    /// `detail` carries the exposed message, never the internal one.
    /// Extension keys that collide with a field the payload fills are dropped.
    pub fn to_problem_details(&self) -> ProblemDetails {
        let filled = |key: &str| match key {
            "status" | "title" | "detail" => true,
            "type" => self.problem_type.is_some(),
            "instance" => self.instance.is_some(),
            _ => false,
        };
        let extensions = self
            .extensions
            .iter()
            .filter(|(key, _)| !filled(key.as_str()))
            .map(|(key, value)| (key.clone(), value.clone()))
            .collect();

        ProblemDetails {
            status: self.status,
            title: self.name.clone(),
            detail: Some(self.exposed_message.clone()),
            problem_type: self.problem_type.clone(),
            instance: self.instance.clone(),
            extensions,
        }
    }

    /// Wire payload as a JSON value.
    pub fn to_json(&self) -> serde_json::Value {
        self.to_problem_details().to_value()
    }

    /// Convert back into an options record carrying every field.
    pub(crate) fn into_options(self) -> HttpErrorOptions {
        HttpErrorOptions {
            status: Some(i64::from(self.status)),
            message: Some(self.message),
            name: Some(self.name),
            expose: Some(self.expose),
            status_text: self.status_text,
            problem_type: self.problem_type,
            instance: self.instance,
            extensions: Some(self.extensions),
            headers: Some(self.headers),
            exposed_message: Some(self.exposed_message),
            cause: self.cause,
        }
    }
}

fn validate_status(status: i64) -> Result<u16, Error> {
    if !(MIN_ERROR_STATUS..=MAX_ERROR_STATUS).contains(&status) {
        return Err(Error::InvalidStatus { status });
    }
    u16::try_from(status).map_err(|_| Error::InvalidStatus { status })
}

fn default_headers() -> HeaderMap {
    let mut headers = HeaderMap::with_capacity(1);
    headers.insert(
        CONTENT_TYPE,
        HeaderValue::from_static(PROBLEM_JSON_CONTENT_TYPE),
    );
    headers
}

impl fmt::Display for HttpError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.message.is_empty() {
            write!(f, "{}", self.name)
        } else {
            write!(f, "{}: {}", self.name, self.message)
        }
    }
}

impl std::error::Error for HttpError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.cause
            .as_ref()?
            .as_error()
            .map(|err| err as &(dyn std::error::Error + 'static))
    }
}

impl Serialize for HttpError {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_problem_details().serialize(serializer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_expose_defaults_by_status() {
        for status in 400..=599 {
            let err = HttpError::new(status).unwrap();
            assert_eq!(err.expose(), status < 500, "status {status}");
        }
    }

    #[test]
    fn test_invalid_statuses_fail() {
        for status in [-500, 0, 200, 302, 399, 600, 1000] {
            let result = HttpError::new(status);
            assert!(
                matches!(result, Err(Error::InvalidStatus { status: s }) if s == status),
                "status {status}"
            );
        }
    }

    #[test]
    fn test_invalid_status_from_options_fails() {
        let result = HttpError::new(("msg", HttpErrorOptions::new().status(200)));
        assert!(matches!(result, Err(Error::InvalidStatus { status: 200 })));
    }

    #[test]
    fn test_positional_arguments_win() {
        let err = HttpError::new((
            400,
            "m1",
            HttpErrorOptions::new().status(502).message("m2"),
        ))
        .unwrap();

        assert_eq!(err.status(), 400);
        assert_eq!(err.message(), "m1");
    }

    #[test]
    fn test_message_only_defaults_to_500() {
        let err = HttpError::new("boom").unwrap();
        assert_eq!(err.status(), 500);
        assert_eq!(err.message(), "boom");
        assert!(!err.expose());
    }

    #[test]
    fn test_default_names() {
        assert_eq!(HttpError::new(404).unwrap().name(), "Not Found");
        assert_eq!(HttpError::new(452).unwrap().name(), "Unknown Client Error");
        assert_eq!(HttpError::new(599).unwrap().name(), "Unknown Server Error");

        let err = HttpError::new((404, HttpErrorOptions::new().name("MissingUser"))).unwrap();
        assert_eq!(err.name(), "MissingUser");
    }

    #[test]
    fn test_exposed_message_precedence() {
        let err = HttpError::new((400, "bad input")).unwrap();
        assert_eq!(err.exposed_message(), "bad input");

        let err = HttpError::new((500, "sql blew up")).unwrap();
        assert_eq!(
            err.exposed_message(),
            "The server encountered an unexpected condition."
        );

        let err = HttpError::new((
            500,
            "x",
            HttpErrorOptions::new().exposed_message("custom"),
        ))
        .unwrap();
        assert_eq!(err.exposed_message(), "custom");
    }

    #[test]
    fn test_exposed_message_without_message_uses_default() {
        let err = HttpError::new(404).unwrap();
        assert_eq!(
            err.exposed_message(),
            "The requested resource could not be found."
        );

        let err = HttpError::new(452).unwrap();
        assert_eq!(err.exposed_message(), "A client error occurred.");
    }

    #[test]
    fn test_explicit_expose_on_server_error() {
        let err = HttpError::new((503, "maintenance", HttpErrorOptions::new().expose(true)))
            .unwrap();
        assert_eq!(err.exposed_message(), "maintenance");

        let err = HttpError::new((
            403,
            "user 7 lacks role",
            HttpErrorOptions::new().expose(false),
        ))
        .unwrap();
        assert_eq!(
            err.exposed_message(),
            "You do not have permission to access this resource."
        );
    }

    #[test]
    fn test_headers_get_default_content_type() {
        let err = HttpError::new((400, HttpErrorOptions::new().headers([("X-A", "1")]))).unwrap();

        assert_eq!(err.headers().get("x-a").unwrap(), "1");
        assert_eq!(
            err.headers().get(CONTENT_TYPE).unwrap(),
            PROBLEM_JSON_CONTENT_TYPE
        );
    }

    #[test]
    fn test_explicit_content_type_preserved() {
        let err = HttpError::new((
            400,
            HttpErrorOptions::new().header("Content-Type", "application/json"),
        ))
        .unwrap();

        assert_eq!(err.headers().get_all(CONTENT_TYPE).iter().count(), 1);
        assert_eq!(err.headers().get(CONTENT_TYPE).unwrap(), "application/json");
    }

    #[test]
    fn test_display() {
        assert_eq!(
            HttpError::new((404, "no user")).unwrap().to_string(),
            "Not Found: no user"
        );
        assert_eq!(HttpError::new(404).unwrap().to_string(), "Not Found");
    }

    #[test]
    fn test_source_is_error_cause() {
        use std::error::Error as _;

        let err = HttpError::new((
            500,
            HttpErrorOptions::new().cause(Cause::error(std::io::Error::other("disk"))),
        ))
        .unwrap();
        assert_eq!(err.source().unwrap().to_string(), "disk");

        let err = HttpError::new((500, HttpErrorOptions::new().cause(json!({"a": 1})))).unwrap();
        assert!(err.source().is_none());
    }

    #[test]
    fn test_problem_details_uses_exposed_message() {
        let err = HttpError::new((
            500,
            "password=hunter2",
            HttpErrorOptions::new()
                .problem_type("https://example.com/probs/db")
                .instance("/requests/42")
                .extension("traceId", "abc"),
        ))
        .unwrap();

        let json = err.to_json();

        assert_eq!(json["status"], 500);
        assert_eq!(json["title"], "Internal Server Error");
        assert_eq!(
            json["detail"],
            "The server encountered an unexpected condition."
        );
        assert_eq!(json["type"], "https://example.com/probs/db");
        assert_eq!(json["instance"], "/requests/42");
        assert_eq!(json["traceId"], "abc");
        assert!(!json.to_string().contains("hunter2"));
    }

    #[test]
    fn test_reserved_extension_keys_do_not_override_fields() {
        let err = HttpError::new((
            404,
            HttpErrorOptions::new()
                .extension("status", 200)
                .extension("title", "OK")
                .extension("code", "missing"),
        ))
        .unwrap();

        let json = serde_json::to_value(&err).unwrap();

        assert_eq!(json["status"], 404);
        assert_eq!(json["title"], "Not Found");
        assert_eq!(json["code"], "missing");
    }

    #[test]
    fn test_unfilled_type_and_instance_extensions_are_kept() {
        let err = HttpError::new((400, HttpErrorOptions::new().extension("type", "https://x/y")))
            .unwrap();
        assert_eq!(err.to_json()["type"], "https://x/y");

        let err = HttpError::new((
            400,
            HttpErrorOptions::new()
                .problem_type("https://example.com/probs/input")
                .extension("type", "https://x/y")
                .extension("instance", "/orders/9"),
        ))
        .unwrap();
        let json = serde_json::to_value(&err).unwrap();

        assert_eq!(json["type"], "https://example.com/probs/input");
        assert_eq!(json["instance"], "/orders/9");
    }

    #[test]
    fn test_status_code_helpers() {
        let err = HttpError::new(StatusCode::CONFLICT).unwrap();
        assert_eq!(err.status_code(), StatusCode::CONFLICT);
        assert!(err.is_client_error());
        assert!(!err.is_server_error());
    }
}
