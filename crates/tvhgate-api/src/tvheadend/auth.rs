//! Backend authentication schemes.

use std::fmt;
use std::str::FromStr;

use reqwest::header::HeaderValue;
use serde::Deserialize;

/// How requests authenticate against the backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AuthScheme {
    /// HTTP Digest challenge/response (Tvheadend default).
    #[default]
    Digest,
    /// HTTP Basic, sent preemptively.
    Basic,
    /// No authentication.
    None,
}

impl FromStr for AuthScheme {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "digest" => Ok(Self::Digest),
            "basic" => Ok(Self::Basic),
            "none" | "" => Ok(Self::None),
            other => Err(format!(
                "unknown auth scheme '{other}' (expected digest, basic or none)"
            )),
        }
    }
}

/// Username/password pair for the backend.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    /// Account name.
    pub username: String,
    /// Account password.
    pub password: String,
}

impl Credentials {
    /// Creates a credential pair.
    #[must_use]
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Challenge kinds offered by a `WWW-Authenticate` response.
#[derive(Debug, PartialEq, Eq)]
pub(crate) enum Challenge {
    /// `Digest ...` challenge, kept verbatim for the response computation.
    Digest(String),
    /// `Basic ...` challenge.
    Basic,
}

/// Picks the strongest challenge from all `WWW-Authenticate` header values.
///
/// Tvheadend sends `Digest` and, when plain auth is enabled, an additional
/// `Basic` header.
pub(crate) fn select_challenge<'a>(
    values: impl IntoIterator<Item = &'a HeaderValue>,
) -> Option<Challenge> {
    let mut basic = false;
    for value in values {
        let Ok(text) = value.to_str() else {
            continue;
        };
        let scheme = text.split_whitespace().next().unwrap_or_default();
        if scheme.eq_ignore_ascii_case("digest") {
            return Some(Challenge::Digest(String::from(text)));
        }
        if scheme.eq_ignore_ascii_case("basic") {
            basic = true;
        }
    }
    basic.then_some(Challenge::Basic)
}

/// Computes the `Authorization` header value answering a Digest challenge.
///
/// `request_uri` is the path and query of the request being authorized.
///
/// # Errors
///
/// Returns a description of the problem if the challenge cannot be parsed
/// or answered.
pub(crate) fn digest_authorization(
    challenge: &str,
    credentials: &Credentials,
    request_uri: &str,
) -> Result<String, String> {
    let mut prompt =
        digest_auth::parse(challenge).map_err(|e| format!("invalid digest challenge: {e}"))?;
    let context = digest_auth::AuthContext::new(
        credentials.username.as_str(),
        credentials.password.as_str(),
        request_uri,
    );
    let answer = prompt
        .respond(&context)
        .map_err(|e| format!("cannot answer digest challenge: {e}"))?;
    Ok(answer.to_header_string())
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;

    #[test]
    fn test_auth_scheme_from_str() {
        // Arrange & Act & Assert
        assert_eq!("digest".parse::<AuthScheme>().unwrap(), AuthScheme::Digest);
        assert_eq!("BASIC".parse::<AuthScheme>().unwrap(), AuthScheme::Basic);
        assert_eq!("none".parse::<AuthScheme>().unwrap(), AuthScheme::None);
        assert!("kerberos".parse::<AuthScheme>().is_err());
    }

    #[test]
    fn test_credentials_debug_redacts_password() {
        // Arrange
        let credentials = Credentials::new("tvh", "secret");

        // Act
        let debug = format!("{credentials:?}");

        // Assert
        assert!(debug.contains("tvh"));
        assert!(!debug.contains("secret"));
    }

    #[test]
    fn test_select_challenge_prefers_digest() {
        // Arrange
        let values = [
            HeaderValue::from_static("Basic realm=\"tvheadend\""),
            HeaderValue::from_static(
                "Digest realm=\"tvheadend\", qop=\"auth\", nonce=\"abc123\", opaque=\"def456\"",
            ),
        ];

        // Act
        let challenge = select_challenge(values.iter());

        // Assert
        assert!(matches!(challenge, Some(Challenge::Digest(ref c)) if c.starts_with("Digest")));
    }

    #[test]
    fn test_select_challenge_basic_only() {
        // Arrange
        let values = [HeaderValue::from_static("Basic realm=\"tvheadend\"")];

        // Act
        let challenge = select_challenge(values.iter());

        // Assert
        assert_eq!(challenge, Some(Challenge::Basic));
    }

    #[test]
    fn test_select_challenge_none() {
        // Arrange
        let values: [HeaderValue; 0] = [];

        // Act & Assert
        assert_eq!(select_challenge(values.iter()), None);
    }

    #[test]
    fn test_digest_authorization_answers_challenge() {
        // Arrange
        let challenge = "Digest realm=\"tvheadend\", qop=\"auth\", nonce=\"dcd98b7102dd2f0e8b11d0f600bfb0c093\", opaque=\"5ccc069c403ebaf9f0171e9517f40e41\"";
        let credentials = Credentials::new("tvh", "secret");

        // Act
        let header = digest_authorization(challenge, &credentials, "/xmltv/channels").unwrap();

        // Assert
        assert!(header.starts_with("Digest "));
        assert!(header.contains("username=\"tvh\""));
        assert!(header.contains("uri=\"/xmltv/channels\""));
        assert!(!header.contains("secret"));
    }

    #[test]
    fn test_digest_authorization_rejects_garbage() {
        // Arrange
        let credentials = Credentials::new("tvh", "secret");

        // Act
        let result = digest_authorization("Negotiate abc", &credentials, "/");

        // Assert
        assert!(result.is_err());
    }
}
