//! OAuth provider trait and types.

use std::fmt;
use std::str::FromStr;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use url::Url;

use super::profile::UserProfile;
use super::token::Token;
use crate::error::{config_error, ConfigErrorKind, Error};

/// Known identity providers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProviderKind {
    #[serde(rename = "github")]
    GitHub,
    Google,
}

impl ProviderKind {
    /// Get the provider identifier string.
    pub fn as_str(&self) -> &'static str {
        match self {
            ProviderKind::GitHub => "github",
            ProviderKind::Google => "google",
        }
    }
}

impl fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ProviderKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "github" => Ok(ProviderKind::GitHub),
            "google" => Ok(ProviderKind::Google),
            other => Err(config_error(
                ConfigErrorKind::UnknownProvider,
                &format!("unknown identity provider: {other}"),
            )),
        }
    }
}

/// Per-request additions to the authorization URL.
#[derive(Debug, Clone, Default)]
pub struct AuthorizationOptions {
    /// Scopes requested in addition to the provider's configured scopes.
    pub scopes: Vec<String>,
    /// Extra query parameters, e.g. `("access_type", "offline")` or `("prompt", "consent")`.
    pub extra_params: Vec<(String, String)>,
}

impl AuthorizationOptions {
    pub fn with_scope(mut self, scope: &str) -> Self {
        self.scopes.push(scope.to_string());
        self
    }

    pub fn with_param(mut self, name: &str, value: &str) -> Self {
        self.extra_params.push((name.to_string(), value.to_string()));
        self
    }
}

/// An external OAuth 2.0 identity provider.
///
/// Implementations cover the authorization code flow for one provider:
/// - Authorization URL generation embedding the caller's CSRF state
/// - Authorization code exchange for an access token
/// - Raw profile retrieval, and decoding of that provider's profile format
#[async_trait]
pub trait Provider: Send + Sync {
    /// Get the provider kind.
    fn kind(&self) -> ProviderKind;

    /// Build the URL the user is redirected to in order to authorize this application.
    ///
    /// Pure and deterministic: the same `state` and `options` always yield the same URL.
    /// `state` is carried verbatim as the `state` query parameter.
    fn authorization_url(&self, state: &str, options: &AuthorizationOptions) -> Url;

    /// Exchange an authorization code from the provider's callback for an access token.
    async fn exchange_code(&self, code: &str) -> Result<Token, Error>;

    /// Fetch the raw profile payload of the user `token` was issued for.
    ///
    /// Fails with an upstream error when the provider answers with a non-2xx status; the
    /// response body is logged but never returned in that case.
    async fn fetch_profile_payload(&self, token: &Token) -> Result<Vec<u8>, Error>;

    /// Decode a payload returned by [`Provider::fetch_profile_payload`].
    fn parse_profile(&self, payload: &[u8]) -> Result<UserProfile, Error>;

    /// Fetch and decode the profile of the user `token` was issued for.
    async fn profile(&self, token: &Token) -> Result<UserProfile, Error> {
        let payload = self.fetch_profile_payload(token).await?;
        self.parse_profile(&payload)
    }
}
