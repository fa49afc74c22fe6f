//! Federation sign-in error types

use thiserror::Error;

/// Errors from exchanging credentials for a console sign-in token
#[derive(Debug, Error)]
pub enum FederationError {
    /// The federation endpoint could not be reached or returned a failure status
    #[error("federation request failed: {0}")]
    Network(String),

    /// The endpoint answered, but not with a usable sign-in token
    #[error("unexpected federation response: {0}")]
    BadResponse(String),
}
