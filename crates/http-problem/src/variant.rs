//! Reusable error kinds with author-supplied defaults.

use crate::config::{ErrorArgs, HttpErrorOptions};
use crate::{Error, HttpError};

/// A domain-specific error kind.
///
/// Every error it creates starts from the variant's defaults; caller options
/// override them field by field, and extensions are merged shallowly.
///
/// # Example
///
/// ```rust
/// use http_problem::{create_error_variant, HttpErrorOptions};
///
/// # fn main() -> Result<(), http_problem::Error> {
/// let out_of_credit = create_error_variant(
///     HttpErrorOptions::new()
///         .status(403)
///         .problem_type("https://example.com/probs/out-of-credit")
///         .extension("balance", 0),
/// );
///
/// let err = out_of_credit.create("Your balance is 30, but that costs 50.")?;
/// assert_eq!(err.status(), 403);
/// assert_eq!(err.extensions()["balance"], 0);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct ErrorVariant {
    defaults: HttpErrorOptions,
}

impl ErrorVariant {
    pub fn new(defaults: HttpErrorOptions) -> Self {
        Self { defaults }
    }

    pub fn defaults(&self) -> &HttpErrorOptions {
        &self.defaults
    }

    /// Create an error from any supported call shape layered over the defaults.
    pub fn create(&self, args: impl Into<ErrorArgs>) -> Result<HttpError, Error> {
        HttpError::from_options(args.into().resolve().merge_over(&self.defaults))
    }

    /// Create an error using only the defaults.
    pub fn build(&self) -> Result<HttpError, Error> {
        self.create(ErrorArgs::default())
    }
}

/// Declare an error kind with the given defaults.
pub fn create_error_variant(defaults: HttpErrorOptions) -> ErrorVariant {
    ErrorVariant::new(defaults)
}
