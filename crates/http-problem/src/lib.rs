//! HTTP errors that convert to and from RFC 9457 problem details.
//!
//! # Example
//!
//! ```rust,ignore
//! use http_problem::{HttpError, HttpErrorOptions, Thrown};
//!
//! async fn handler() -> http::Response<String> {
//!     let err = match load_user(7).await {
//!         Ok(_) => return ok_response(),
//!         Err(e) => HttpError::coerce(Thrown::error(e)),
//!     };
//!
//!     // `detail` carries the exposed message, never the internal one.
//!     err.to_response().into()
//! }
//!
//! async fn call_peer(client: &reqwest::Client) -> Result<(), HttpError> {
//!     let response = client.get("https://peer.example.com/users/7").send().await
//!         .map_err(|e| HttpError::coerce(Thrown::error(e)))?;
//!     if !response.status().is_success() {
//!         return Err(HttpError::from_response(response).await);
//!     }
//!     Ok(())
//! }
//! ```

mod config;
mod convert;
mod error;
mod http_error;
mod status;
mod transport;
mod types;
mod variant;

pub use config::{
    ErrorArgs, HttpErrorOptions, DEFAULT_STATUS, MAX_ERROR_STATUS, MIN_ERROR_STATUS,
    PROBLEM_JSON_CONTENT_TYPE,
};
pub use convert::{is_problem_details, ErrorLike, Thrown, UNEXPECTED_ERROR_MESSAGE};
pub use error::Error;
pub use http_error::HttpError;
pub use status::{default_name, reason_phrase, safe_message};
pub use transport::{
    ProblemResponse, INVALID_PAYLOAD_MESSAGE, PARSE_FAILURE_MESSAGE, READ_FAILURE_MESSAGE,
};
pub use types::{Cause, Extensions, HeadersInit, ProblemDetails, RESERVED_KEYS};
pub use variant::{create_error_variant, ErrorVariant};
