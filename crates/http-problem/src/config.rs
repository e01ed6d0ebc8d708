//! Construction options and argument normalization.

use crate::types::{append_header, Cause, Extensions, HeadersInit};
use http::header::HeaderMap;
use http::StatusCode;
use serde_json::Value;

/// Media type of problem-details payloads.
pub const PROBLEM_JSON_CONTENT_TYPE: &str = "application/problem+json";

/// Status used when none is given.
pub const DEFAULT_STATUS: i64 = 500;

/// Lowest accepted error status.
pub const MIN_ERROR_STATUS: i64 = 400;

/// Highest accepted error status.
pub const MAX_ERROR_STATUS: i64 = 599;

/// Options record every constructor call shape resolves to.
///
/// All fields are optional; unset fields are derived from the status when the
/// error is built.
#[derive(Debug, Clone, Default)]
pub struct HttpErrorOptions {
    pub(crate) status: Option<i64>,
    pub(crate) message: Option<String>,
    pub(crate) name: Option<String>,
    pub(crate) expose: Option<bool>,
    pub(crate) status_text: Option<String>,
    pub(crate) problem_type: Option<String>,
    pub(crate) instance: Option<String>,
    pub(crate) extensions: Option<Extensions>,
    pub(crate) headers: Option<HeaderMap>,
    pub(crate) exposed_message: Option<String>,
    pub(crate) cause: Option<Cause>,
}

impl HttpErrorOptions {
    /// Create an empty options record.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the status.
    pub fn status(mut self, status: i64) -> Self {
        self.status = Some(status);
        self
    }

    /// Set the internal message.
    pub fn message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    /// Set the display name.
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Set whether the message may be shown externally.
    pub fn expose(mut self, expose: bool) -> Self {
        self.expose = Some(expose);
        self
    }

    /// Set the status-line text.
    pub fn status_text(mut self, status_text: impl Into<String>) -> Self {
        self.status_text = Some(status_text.into());
        self
    }

    /// Set the problem type URI reference.
    pub fn problem_type(mut self, problem_type: impl Into<String>) -> Self {
        self.problem_type = Some(problem_type.into());
        self
    }

    /// Set the problem instance URI reference.
    pub fn instance(mut self, instance: impl Into<String>) -> Self {
        self.instance = Some(instance.into());
        self
    }

    /// Add a single extension member.
    pub fn extension(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.extensions
            .get_or_insert_with(Extensions::new)
            .insert(key.into(), value.into());
        self
    }

    /// Replace the extension members.
    pub fn extensions(mut self, extensions: Extensions) -> Self {
        self.extensions = Some(extensions);
        self
    }

    /// Append a response header. Invalid names or values are dropped.
    pub fn header(mut self, name: impl AsRef<str>, value: impl AsRef<str>) -> Self {
        append_header(
            self.headers.get_or_insert_with(HeaderMap::new),
            name.as_ref(),
            value.as_ref(),
        );
        self
    }

    /// Replace the response headers.
    pub fn headers(mut self, headers: impl Into<HeadersInit>) -> Self {
        self.headers = Some(headers.into().into_header_map());
        self
    }

    /// Set the externally-safe message.
    pub fn exposed_message(mut self, exposed_message: impl Into<String>) -> Self {
        self.exposed_message = Some(exposed_message.into());
        self
    }

    /// Set the originating error or value.
    pub fn cause(mut self, cause: impl Into<Cause>) -> Self {
        self.cause = Some(cause.into());
        self
    }

    /// Layer `self` over `defaults`, field by field.
    ///
    /// Extensions are merged shallowly; keys set in `self` win.
    pub(crate) fn merge_over(self, defaults: &HttpErrorOptions) -> HttpErrorOptions {
        let extensions = match (&defaults.extensions, self.extensions) {
            (Some(base), Some(overrides)) => {
                let mut merged = base.clone();
                merged.extend(overrides);
                Some(merged)
            }
            (base, overrides) => overrides.or_else(|| base.clone()),
        };

        HttpErrorOptions {
            status: self.status.or(defaults.status),
            message: self.message.or_else(|| defaults.message.clone()),
            name: self.name.or_else(|| defaults.name.clone()),
            expose: self.expose.or(defaults.expose),
            status_text: self.status_text.or_else(|| defaults.status_text.clone()),
            problem_type: self.problem_type.or_else(|| defaults.problem_type.clone()),
            instance: self.instance.or_else(|| defaults.instance.clone()),
            extensions,
            headers: self.headers.or_else(|| defaults.headers.clone()),
            exposed_message: self
                .exposed_message
                .or_else(|| defaults.exposed_message.clone()),
            cause: self.cause.or_else(|| defaults.cause.clone()),
        }
    }
}

/// Positional constructor arguments before normalization.
///
/// Built from any of the supported call shapes:
/// `(status, message, options)`, `(status, options)`, `(message, options)`,
/// `options`, and the shorthands `status`, `message`, `(status, message)`.
#[derive(Debug, Clone, Default)]
pub struct ErrorArgs {
    status: Option<i64>,
    message: Option<String>,
    options: Option<HttpErrorOptions>,
}

impl ErrorArgs {
    pub fn new(
        status: Option<i64>,
        message: Option<String>,
        options: Option<HttpErrorOptions>,
    ) -> Self {
        Self {
            status,
            message,
            options,
        }
    }

    /// Collapse into one options record.
    ///
    /// Positional `status` and `message` override the same fields of the
    /// trailing options record.
    pub fn resolve(self) -> HttpErrorOptions {
        let mut options = self.options.unwrap_or_default();
        if let Some(status) = self.status {
            options.status = Some(status);
        }
        if let Some(message) = self.message {
            options.message = Some(message);
        }
        options
    }
}

impl From<HttpErrorOptions> for ErrorArgs {
    fn from(options: HttpErrorOptions) -> Self {
        ErrorArgs::new(None, None, Some(options))
    }
}

impl From<i64> for ErrorArgs {
    fn from(status: i64) -> Self {
        ErrorArgs::new(Some(status), None, None)
    }
}

impl From<StatusCode> for ErrorArgs {
    fn from(status: StatusCode) -> Self {
        ErrorArgs::new(Some(i64::from(status.as_u16())), None, None)
    }
}

impl From<&str> for ErrorArgs {
    fn from(message: &str) -> Self {
        ErrorArgs::new(None, Some(message.into()), None)
    }
}

impl From<String> for ErrorArgs {
    fn from(message: String) -> Self {
        ErrorArgs::new(None, Some(message), None)
    }
}

impl From<(i64, &str)> for ErrorArgs {
    fn from((status, message): (i64, &str)) -> Self {
        ErrorArgs::new(Some(status), Some(message.into()), None)
    }
}

impl From<(i64, String)> for ErrorArgs {
    fn from((status, message): (i64, String)) -> Self {
        ErrorArgs::new(Some(status), Some(message), None)
    }
}

impl From<(i64, HttpErrorOptions)> for ErrorArgs {
    fn from((status, options): (i64, HttpErrorOptions)) -> Self {
        ErrorArgs::new(Some(status), None, Some(options))
    }
}

impl From<(&str, HttpErrorOptions)> for ErrorArgs {
    fn from((message, options): (&str, HttpErrorOptions)) -> Self {
        ErrorArgs::new(None, Some(message.into()), Some(options))
    }
}

impl From<(String, HttpErrorOptions)> for ErrorArgs {
    fn from((message, options): (String, HttpErrorOptions)) -> Self {
        ErrorArgs::new(None, Some(message), Some(options))
    }
}

impl From<(i64, &str, HttpErrorOptions)> for ErrorArgs {
    fn from((status, message, options): (i64, &str, HttpErrorOptions)) -> Self {
        ErrorArgs::new(Some(status), Some(message.into()), Some(options))
    }
}

impl From<(i64, String, HttpErrorOptions)> for ErrorArgs {
    fn from((status, message, options): (i64, String, HttpErrorOptions)) -> Self {
        ErrorArgs::new(Some(status), Some(message), Some(options))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_positional_overrides_options() {
        let options = HttpErrorOptions::new().status(502).message("m2");
        let resolved = ErrorArgs::from((400, "m1", options)).resolve();

        assert_eq!(resolved.status, Some(400));
        assert_eq!(resolved.message.as_deref(), Some("m1"));
    }

    #[test]
    fn test_options_fill_missing_positionals() {
        let options = HttpErrorOptions::new().status(409).message("from options");

        let resolved = ErrorArgs::from(("positional", options.clone())).resolve();
        assert_eq!(resolved.status, Some(409));
        assert_eq!(resolved.message.as_deref(), Some("positional"));

        let resolved = ErrorArgs::from((404, options)).resolve();
        assert_eq!(resolved.status, Some(404));
        assert_eq!(resolved.message.as_deref(), Some("from options"));
    }

    #[test]
    fn test_empty_args_resolve_to_empty_options() {
        let resolved = ErrorArgs::default().resolve();
        assert!(resolved.status.is_none());
        assert!(resolved.message.is_none());
    }

    #[test]
    fn test_merge_over_shallow_merges_extensions() {
        let defaults = HttpErrorOptions::new()
            .status(452)
            .extension("code", "X")
            .extension("retry", false);
        let merged = HttpErrorOptions::new()
            .extension("detail", "y")
            .extension("retry", true)
            .merge_over(&defaults);

        let extensions = merged.extensions.unwrap();
        assert_eq!(merged.status, Some(452));
        assert_eq!(extensions.get("code"), Some(&json!("X")));
        assert_eq!(extensions.get("detail"), Some(&json!("y")));
        assert_eq!(extensions.get("retry"), Some(&json!(true)));
    }

    #[test]
    fn test_merge_over_replaces_headers_wholesale() {
        let defaults = HttpErrorOptions::new().header("x-default", "1");
        let merged = HttpErrorOptions::new()
            .header("x-caller", "2")
            .merge_over(&defaults);

        let headers = merged.headers.unwrap();
        assert!(headers.get("x-default").is_none());
        assert_eq!(headers.get("x-caller").unwrap(), "2");
    }

    #[test]
    fn test_header_setter_appends() {
        let options = HttpErrorOptions::new()
            .header("Vary", "accept")
            .header("vary", "origin");

        let headers = options.headers.unwrap();
        assert_eq!(headers.get_all("VARY").iter().count(), 2);
    }
}
