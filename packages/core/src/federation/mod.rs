//! AWS console federation
//!
//! Turns temporary role credentials into a browser sign-in URL:
//! 1. build the `getSigninToken` URL from the credentials
//! 2. exchange it for a sign-in token at the federation endpoint
//! 3. build the `login` URL from the token

mod client;
mod error;
mod url;

pub use client::{FederationClient, parse_signin_response};
pub use error::FederationError;
pub use url::{
    Credentials, DEFAULT_CONSOLE_DESTINATION, FEDERATION_ENDPOINT, FederationToken,
    console_login_url, signin_token_url,
};
