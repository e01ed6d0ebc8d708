//! Status code lookups: reason phrases and safe default messages.

use http::StatusCode;

/// Name used for non-standard 4xx statuses.
pub const UNKNOWN_CLIENT_ERROR: &str = "Unknown Client Error";

/// Name used for non-standard 5xx statuses.
pub const UNKNOWN_SERVER_ERROR: &str = "Unknown Server Error";

/// Safe message used for 4xx statuses without a dedicated message.
pub const GENERIC_CLIENT_MESSAGE: &str = "A client error occurred.";

/// Safe message used for 5xx statuses without a dedicated message.
pub const GENERIC_SERVER_MESSAGE: &str = "A server error occurred.";

/// Standard reason phrase for a status, if it has one.
pub fn reason_phrase(status: u16) -> Option<&'static str> {
    StatusCode::from_u16(status)
        .ok()
        .and_then(|code| code.canonical_reason())
}

/// Display name for an error status.
///
/// Falls back to [`UNKNOWN_CLIENT_ERROR`] or [`UNKNOWN_SERVER_ERROR`] when the
/// status has no standard reason phrase.
pub fn default_name(status: u16) -> &'static str {
    reason_phrase(status).unwrap_or(if status < 500 {
        UNKNOWN_CLIENT_ERROR
    } else {
        UNKNOWN_SERVER_ERROR
    })
}

/// Text that is safe to show to external consumers for a status.
pub fn safe_message(status: u16) -> &'static str {
    match status {
        400 => "The server cannot process the request due to a client error.",
        401 => "Authentication is required to access this resource.",
        402 => "Payment is required to access this resource.",
        403 => "You do not have permission to access this resource.",
        404 => "The requested resource could not be found.",
        405 => "The request method is not supported for this resource.",
        406 => "The requested resource cannot produce an acceptable response.",
        407 => "Authentication with the proxy is required.",
        408 => "The server timed out waiting for the request.",
        409 => "The request conflicts with the current state of the resource.",
        410 => "The requested resource is no longer available.",
        411 => "The request must specify a content length.",
        412 => "A precondition in the request headers was not met.",
        413 => "The request payload is too large.",
        414 => "The request URI is too long.",
        415 => "The request media type is not supported.",
        416 => "The requested range cannot be satisfied.",
        417 => "The expectation in the request headers could not be met.",
        418 => "The server refuses to brew coffee because it is a teapot.",
        421 => "The request was directed at a server that cannot produce a response.",
        422 => "The request was well-formed but contains invalid content.",
        423 => "The requested resource is locked.",
        424 => "The request failed because a dependent request failed.",
        425 => "The server is unwilling to process a request that might be replayed.",
        426 => "The client must upgrade to a different protocol.",
        428 => "The request must be conditional.",
        429 => "Too many requests have been sent in a given amount of time.",
        431 => "The request header fields are too large.",
        451 => "The requested resource is unavailable for legal reasons.",
        500 => "The server encountered an unexpected condition.",
        501 => "The server does not support the functionality required.",
        502 => "The server received an invalid response from an upstream server.",
        503 => "The server is currently unable to handle the request.",
        504 => "The server did not receive a timely response from an upstream server.",
        505 => "The HTTP version used in the request is not supported.",
        506 => "The server has an internal configuration error.",
        507 => "The server is unable to store the representation needed to complete the request.",
        508 => "The server detected an infinite loop while processing the request.",
        510 => "Further extensions to the request are required.",
        511 => "Network authentication is required.",
        s if s < 500 => GENERIC_CLIENT_MESSAGE,
        _ => GENERIC_SERVER_MESSAGE,
    }
}
