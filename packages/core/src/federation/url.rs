//! Federation URL construction
//!
//! Both URLs are plain string construction with no I/O. Every query value is
//! percent-encoded; nothing else about the values is validated.

use serde_json::json;
use std::fmt;

/// AWS sign-in federation endpoint
pub const FEDERATION_ENDPOINT: &str = "https://signin.aws.amazon.com/federation";

/// Console page opened after sign-in unless configured otherwise
pub const DEFAULT_CONSOLE_DESTINATION: &str = "https://console.aws.amazon.com";

/// Temporary credentials for a single role
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    pub access_key_id: String,
    pub secret_access_key: String,
    pub session_token: String,
}

impl Credentials {
    pub fn new(
        access_key_id: impl Into<String>,
        secret_access_key: impl Into<String>,
        session_token: impl Into<String>,
    ) -> Self {
        Self {
            access_key_id: access_key_id.into(),
            secret_access_key: secret_access_key.into(),
            session_token: session_token.into(),
        }
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("access_key_id", &self.access_key_id)
            .field("secret_access_key", &"<redacted>")
            .field("session_token", &"<redacted>")
            .finish()
    }
}

/// Sign-in token returned by the federation endpoint
///
/// Valid for a short time and a single console login.
#[derive(Clone, PartialEq, Eq)]
pub struct FederationToken(String);

impl FederationToken {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for FederationToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("FederationToken(<redacted>)")
    }
}

/// URL that exchanges `credentials` for a sign-in token
///
/// `session_duration_secs` is forwarded as is; the federation service
/// rejects values outside 900..=43200.
pub fn signin_token_url(
    endpoint: &str,
    credentials: &Credentials,
    session_duration_secs: u64,
) -> String {
    let session = json!({
        "sessionId": credentials.access_key_id,
        "sessionKey": credentials.secret_access_key,
        "sessionToken": credentials.session_token,
    });
    format!(
        "{endpoint}?Action=getSigninToken&SessionDuration={session_duration_secs}&Session={}",
        urlencoding::encode(&session.to_string())
    )
}

/// Browser URL that signs in to the console with `token`
pub fn console_login_url(
    endpoint: &str,
    token: &FederationToken,
    destination: &str,
    issuer: &str,
) -> String {
    format!(
        "{endpoint}?Action=login&Issuer={}&Destination={}&SigninToken={}",
        urlencoding::encode(issuer),
        urlencoding::encode(destination),
        urlencoding::encode(token.as_str())
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn query_values<'a>(url: &'a str, key: &str) -> Vec<&'a str> {
        let (_, query) = url.split_once('?').expect("url has a query");
        query
            .split('&')
            .filter_map(|pair| pair.split_once('='))
            .filter(|(k, _)| *k == key)
            .map(|(_, v)| v)
            .collect()
    }

    #[test]
    fn signin_token_url_encodes_session_and_duration() {
        let creds = Credentials::new("AK", "SK", "TOK");
        let url = signin_token_url(FEDERATION_ENDPOINT, &creds, 3600);

        assert!(url.starts_with("https://signin.aws.amazon.com/federation?"));
        assert_eq!(query_values(&url, "Action"), ["getSigninToken"]);
        assert_eq!(query_values(&url, "SessionDuration"), ["3600"]);

        let session = query_values(&url, "Session");
        assert_eq!(session.len(), 1);
        let decoded = urlencoding::decode(session[0]).unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&decoded).unwrap();
        assert_eq!(
            parsed,
            json!({"sessionId": "AK", "sessionKey": "SK", "sessionToken": "TOK"})
        );
    }

    #[test]
    fn signin_token_url_escapes_reserved_characters() {
        let creds = Credentials::new("AK", "a+b/c=", "tok&en");
        let url = signin_token_url(FEDERATION_ENDPOINT, &creds, 900);

        let session = query_values(&url, "Session")[0];
        assert!(!session.contains('&'));
        assert!(!session.contains('+'));
        assert!(!session.contains('"'));
        let decoded = urlencoding::decode(session).unwrap();
        assert!(decoded.contains(r#""sessionKey":"a+b/c=""#));
        assert!(decoded.contains(r#""sessionToken":"tok&en""#));
    }

    #[test]
    fn console_login_url_contains_each_parameter_once() {
        let token = FederationToken::new("abc123");
        let url = console_login_url(
            FEDERATION_ENDPOINT,
            &token,
            "https://console.aws.amazon.com",
            "https://issuer.example",
        );

        assert_eq!(query_values(&url, "Action"), ["login"]);
        assert_eq!(query_values(&url, "SigninToken"), ["abc123"]);
        let issuer = query_values(&url, "Issuer");
        assert_eq!(issuer.len(), 1);
        assert_eq!(urlencoding::decode(issuer[0]).unwrap(), "https://issuer.example");
        let destination = query_values(&url, "Destination");
        assert_eq!(destination.len(), 1);
        assert_eq!(
            urlencoding::decode(destination[0]).unwrap(),
            "https://console.aws.amazon.com"
        );
    }

    #[test]
    fn secrets_are_not_debug_printed() {
        let creds = Credentials::new("AKIAEXAMPLE", "supersecret", "sessiontok");
        let printed = format!("{creds:?}");
        assert!(printed.contains("AKIAEXAMPLE"));
        assert!(!printed.contains("supersecret"));
        assert!(!printed.contains("sessiontok"));
        assert!(!format!("{:?}", FederationToken::new("abc")).contains("abc"));
    }
}
