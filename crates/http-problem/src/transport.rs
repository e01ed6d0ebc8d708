//! Conversion between errors and HTTP responses.

use crate::convert::{from_problem_map, is_problem_details};
use crate::types::Cause;
use crate::HttpError;
use http::header::HeaderMap;
use http::StatusCode;
use serde_json::Value;
use tracing::{debug, instrument, warn};

/// Message used when a response body is not valid JSON.
pub const PARSE_FAILURE_MESSAGE: &str = "could not parse problem details response";

/// Message used when a response body is JSON but not a problem-details payload.
pub const INVALID_PAYLOAD_MESSAGE: &str = "invalid problem details response";

/// Message used when a response body cannot be read.
pub const READ_FAILURE_MESSAGE: &str = "could not read problem details response";

/// A response carrying an error's problem-details payload.
#[derive(Debug, Clone)]
pub struct ProblemResponse {
    status: StatusCode,
    status_text: Option<String>,
    headers: HeaderMap,
    body: String,
}

impl ProblemResponse {
    /// Get the response status.
    pub fn status(&self) -> StatusCode {
        self.status
    }

    /// Status-line text override, if any.
    pub fn status_text(&self) -> Option<&str> {
        self.status_text.as_deref()
    }

    /// Get the response headers.
    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    /// Serialized problem-details JSON.
    pub fn body(&self) -> &str {
        &self.body
    }
}

impl From<ProblemResponse> for http::Response<String> {
    fn from(response: ProblemResponse) -> Self {
        let mut out = http::Response::new(response.body);
        *out.status_mut() = response.status;
        *out.headers_mut() = response.headers;
        out
    }
}

impl HttpError {
    /// Build the response sent to external consumers.
    pub fn to_response(&self) -> ProblemResponse {
        ProblemResponse {
            status: self.status_code(),
            status_text: self.status_text().map(String::from),
            headers: self.headers().clone(),
            body: self.to_json().to_string(),
        }
    }

    /// Rebuild an error from a received problem-details response.
    ///
    /// Never fails: unreadable, unparsable or non-problem bodies become 500
    /// errors describing what went wrong.
    #[instrument(skip(response), fields(status = %response.status()))]
    pub async fn from_response(response: reqwest::Response) -> HttpError {
        let status = response.status();
        match response.bytes().await {
            Ok(body) => Self::from_parts(status, &body),
            Err(e) => {
                warn!(error = %e, "failed to read problem details response");
                HttpError::internal(READ_FAILURE_MESSAGE, Some(Cause::error(e)))
            }
        }
    }

    /// Rebuild an error from a response status and raw body.
    ///
    /// A `status` inside the payload takes precedence over `status`.
    pub fn from_parts(status: StatusCode, body: &[u8]) -> HttpError {
        let value: Value = match serde_json::from_slice(body) {
            Ok(value) => value,
            Err(e) => {
                warn!(error = %e, "problem details response is not valid JSON");
                return HttpError::internal(PARSE_FAILURE_MESSAGE, Some(Cause::error(e)));
            }
        };

        if !is_problem_details(&value) {
            debug!("response body is not a problem details payload");
            return HttpError::internal(INVALID_PAYLOAD_MESSAGE, Some(Cause::Value(value)));
        }

        match value {
            Value::Object(map) => from_problem_map(map, Some(i64::from(status.as_u16()))),
            value => HttpError::internal(INVALID_PAYLOAD_MESSAGE, Some(Cause::Value(value))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{HttpErrorOptions, PROBLEM_JSON_CONTENT_TYPE};
    use http::header::CONTENT_TYPE;
    use serde_json::json;

    #[test]
    fn test_to_response() {
        let err = HttpError::new((
            503,
            "db pool exhausted",
            HttpErrorOptions::new()
                .status_text("Down For Maintenance")
                .header("Retry-After", "120"),
        ))
        .unwrap();

        let response = err.to_response();
        let body: Value = serde_json::from_str(response.body()).unwrap();

        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(response.status_text(), Some("Down For Maintenance"));
        assert_eq!(response.headers().get("retry-after").unwrap(), "120");
        assert_eq!(
            response.headers().get(CONTENT_TYPE).unwrap(),
            PROBLEM_JSON_CONTENT_TYPE
        );
        assert_eq!(body, err.to_json());
        assert!(!response.body().contains("db pool"));
    }

    #[test]
    fn test_into_http_response() {
        let err = HttpError::new((404, "gone")).unwrap();
        let response: http::Response<String> = err.to_response().into();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(
            response.headers().get(CONTENT_TYPE).unwrap(),
            PROBLEM_JSON_CONTENT_TYPE
        );
        assert!(response.body().contains("\"detail\":\"gone\""));
    }

    #[test]
    fn test_from_parts_payload_status_wins() {
        let body = json!({"status": 409, "title": "Conflict"}).to_string();
        let err = HttpError::from_parts(StatusCode::BAD_REQUEST, body.as_bytes());

        assert_eq!(err.status(), 409);
        assert_eq!(err.name(), "Conflict");
    }

    #[test]
    fn test_from_parts_uses_transport_status_when_missing() {
        let body = json!({"title": "Gone", "detail": "deleted"}).to_string();
        let err = HttpError::from_parts(StatusCode::GONE, body.as_bytes());

        assert_eq!(err.status(), 410);
        assert_eq!(err.message(), "deleted");
    }

    #[test]
    fn test_from_parts_malformed_json() {
        let err = HttpError::from_parts(StatusCode::BAD_GATEWAY, b"<html>oops");

        assert_eq!(err.status(), 500);
        assert_eq!(err.message(), PARSE_FAILURE_MESSAGE);
        assert!(err
            .cause()
            .unwrap()
            .downcast_ref::<serde_json::Error>()
            .is_some());
    }

    #[test]
    fn test_from_parts_non_problem_json() {
        let err = HttpError::from_parts(StatusCode::BAD_REQUEST, br#"{"data": []}"#);

        assert_eq!(err.status(), 500);
        assert_eq!(err.message(), INVALID_PAYLOAD_MESSAGE);
        assert_eq!(err.cause().unwrap().as_value(), Some(&json!({"data": []})));
    }
}
