//! Federation endpoint client
//!
//! One GET per call. There is no retry and no timeout here; callers that
//! need a deadline wrap the future themselves.

use super::FederationError;
use super::url::{
    Credentials, FEDERATION_ENDPOINT, FederationToken, console_login_url, signin_token_url,
};
use serde::Deserialize;
use tracing::debug;

#[derive(Deserialize)]
struct SigninTokenResponse {
    #[serde(rename = "SigninToken")]
    signin_token: String,
}

/// HTTP client for the AWS sign-in federation endpoint
#[derive(Debug, Clone)]
pub struct FederationClient {
    http: reqwest::Client,
    endpoint: String,
}

impl Default for FederationClient {
    fn default() -> Self {
        Self::new()
    }
}

impl FederationClient {
    pub fn new() -> Self {
        Self::with_endpoint(FEDERATION_ENDPOINT)
    }

    pub fn with_endpoint(endpoint: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            endpoint: endpoint.into(),
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Fetch a sign-in token from a URL built by [`signin_token_url`]
    pub async fn exchange_for_token(&self, url: &str) -> Result<FederationToken, FederationError> {
        let response = self
            .http
            .get(url)
            .send()
            .await
            .map_err(|e| {
                // the request URL carries the secret key and session token
                let e = e.without_url();
                FederationError::Network(format!("unable to reach {}: {e}", self.endpoint))
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(FederationError::Network(format!(
                "{} returned HTTP {status}",
                self.endpoint
            )));
        }

        let body = response
            .bytes()
            .await
            .map_err(|e| {
                let e = e.without_url();
                FederationError::Network(format!("failed to read response body: {e}"))
            })?;

        parse_signin_response(&body)
    }

    /// Credentials in, console login URL out
    ///
    /// Runs token URL construction, the token exchange and login URL
    /// construction in sequence.
    pub async fn console_url(
        &self,
        credentials: &Credentials,
        session_duration_secs: u64,
        destination: &str,
        issuer: &str,
    ) -> Result<String, FederationError> {
        let url = signin_token_url(&self.endpoint, credentials, session_duration_secs);
        debug!(
            "requesting sign-in token for {} ({session_duration_secs}s)",
            credentials.access_key_id
        );
        let token = self.exchange_for_token(&url).await?;
        Ok(console_login_url(&self.endpoint, &token, destination, issuer))
    }
}

/// Parse the `{"SigninToken": "..."}` body returned by the federation endpoint
pub fn parse_signin_response(body: &[u8]) -> Result<FederationToken, FederationError> {
    let response: SigninTokenResponse = serde_json::from_slice(body)
        .map_err(|e| FederationError::BadResponse(format!("invalid sign-in token body: {e}")))?;

    if response.signin_token.is_empty() {
        return Err(FederationError::BadResponse(
            "SigninToken is empty".to_string(),
        ));
    }

    Ok(FederationToken::new(response.signin_token))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;
    use tokio::task::JoinHandle;

    /// Serve exactly one HTTP response and hand back the request head
    async fn serve_once(status: &'static str, body: &'static str) -> (String, JoinHandle<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let endpoint = format!("http://{}/federation", listener.local_addr().unwrap());

        let handle = tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut request = Vec::new();
            let mut buf = [0u8; 4096];
            while !request.windows(4).any(|w| w == b"\r\n\r\n") {
                let n = socket.read(&mut buf).await.unwrap();
                if n == 0 {
                    break;
                }
                request.extend_from_slice(&buf[..n]);
            }
            let response = format!(
                "HTTP/1.1 {status}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
                body.len()
            );
            socket.write_all(response.as_bytes()).await.unwrap();
            socket.shutdown().await.unwrap();
            String::from_utf8_lossy(&request).into_owned()
        });

        (endpoint, handle)
    }

    #[test]
    fn parse_valid_response() {
        let token = parse_signin_response(br#"{"SigninToken":"abc123"}"#).unwrap();
        assert_eq!(token.as_str(), "abc123");
    }

    #[test]
    fn parse_missing_field_is_bad_response() {
        let err = parse_signin_response(br#"{"Token":"x"}"#).unwrap_err();
        assert!(matches!(err, FederationError::BadResponse(_)));
    }

    #[test]
    fn parse_malformed_json_is_bad_response() {
        let err = parse_signin_response(b"<html>nope</html>").unwrap_err();
        assert!(matches!(err, FederationError::BadResponse(_)));
    }

    #[test]
    fn parse_empty_token_is_bad_response() {
        let err = parse_signin_response(br#"{"SigninToken":""}"#).unwrap_err();
        assert!(matches!(err, FederationError::BadResponse(_)));
    }

    #[tokio::test]
    async fn console_url_runs_full_pipeline() {
        let (endpoint, server) = serve_once("200 OK", r#"{"SigninToken":"abc123"}"#).await;
        let client = FederationClient::with_endpoint(&endpoint);
        let creds = Credentials::new("AK", "SK", "TOK");

        let url = client
            .console_url(
                &creds,
                3600,
                "https://console.aws.amazon.com",
                "https://issuer.example",
            )
            .await
            .unwrap();

        let request = server.await.unwrap();
        assert!(request.starts_with(
            "GET /federation?Action=getSigninToken&SessionDuration=3600&Session="
        ));
        assert!(url.starts_with(&format!("{endpoint}?Action=login&")));
        assert!(url.ends_with("&SigninToken=abc123"));
        assert_eq!(url.matches("Issuer=").count(), 1);
        assert_eq!(url.matches("Destination=").count(), 1);
    }

    #[tokio::test]
    async fn exchange_with_unexpected_body_is_bad_response() {
        let (endpoint, server) = serve_once("200 OK", r#"{"Token":"x"}"#).await;
        let client = FederationClient::with_endpoint(&endpoint);

        let err = client
            .exchange_for_token(&format!("{endpoint}?Action=getSigninToken"))
            .await
            .unwrap_err();

        server.await.unwrap();
        assert!(matches!(err, FederationError::BadResponse(_)));
    }

    #[tokio::test]
    async fn exchange_with_error_status_is_network_error() {
        let (endpoint, server) = serve_once("400 Bad Request", "").await;
        let client = FederationClient::with_endpoint(&endpoint);

        let err = client.exchange_for_token(&endpoint).await.unwrap_err();

        server.await.unwrap();
        assert!(matches!(err, FederationError::Network(ref msg) if msg.contains("400")));
    }

    #[tokio::test]
    async fn exchange_with_unreachable_endpoint_is_network_error() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let endpoint = format!("http://{}/federation", listener.local_addr().unwrap());
        drop(listener);

        let client = FederationClient::with_endpoint(&endpoint);
        let err = client.exchange_for_token(&endpoint).await.unwrap_err();

        assert!(matches!(err, FederationError::Network(_)));
    }

    #[tokio::test]
    async fn network_errors_do_not_expose_credentials() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let endpoint = format!("http://{}/federation", listener.local_addr().unwrap());
        drop(listener);

        let client = FederationClient::with_endpoint(&endpoint);
        let creds = Credentials::new("AKIDVISIBLE", "TOPSECRETKEY", "SESSIONTOKENVALUE");
        let err = client
            .console_url(&creds, 900, "https://console.aws.amazon.com", "awscred")
            .await
            .unwrap_err();

        let msg = err.to_string();
        assert!(matches!(err, FederationError::Network(_)));
        assert!(msg.contains(&endpoint), "{msg}");
        assert!(!msg.contains("TOPSECRETKEY"), "{msg}");
        assert!(!msg.contains("SESSIONTOKENVALUE"), "{msg}");
        assert!(!msg.contains("Session="), "{msg}");
    }
}
