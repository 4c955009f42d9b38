//! OAuth token types.

use chrono::{DateTime, Utc};
use oauth2::basic::BasicTokenResponse;
use oauth2::TokenResponse;
use secrecy::SecretString;

/// Access credential returned by a provider's code exchange.
///
/// Opaque to the login flow: it is only ever attached as a bearer credential to
/// requests against the issuing provider.
#[derive(Debug, Clone)]
pub struct Token {
    /// Access token for API requests.
    pub access_token: SecretString,
    /// Refresh token, when the provider issued one.
    pub refresh_token: Option<SecretString>,
    /// When the access token expires, if the provider said.
    pub expires_at: Option<DateTime<Utc>>,
    /// Token type (usually "Bearer").
    pub token_type: String,
    /// Granted scopes.
    pub scopes: Vec<String>,
}

impl Token {
    /// A bare bearer token with no metadata.
    pub fn bearer(access_token: &str) -> Self {
        Self {
            access_token: SecretString::new(access_token.to_string()),
            refresh_token: None,
            expires_at: None,
            token_type: "Bearer".to_string(),
            scopes: vec![],
        }
    }
}

impl From<BasicTokenResponse> for Token {
    fn from(response: BasicTokenResponse) -> Self {
        Self {
            access_token: SecretString::new(response.access_token().secret().clone()),
            refresh_token: response
                .refresh_token()
                .map(|t| SecretString::new(t.secret().clone())),
            expires_at: response
                .expires_in()
                .and_then(|duration| chrono::Duration::from_std(duration).ok())
                .map(|duration| Utc::now() + duration),
            token_type: "Bearer".to_string(),
            scopes: response
                .scopes()
                .map(|scopes| scopes.iter().map(|s| s.to_string()).collect())
                .unwrap_or_default(),
        }
    }
}
