//! Google OAuth provider implementation.

use async_trait::async_trait;
use serde::Deserialize;
use url::Url;

use crate::error::{oauth_error, Error, OAuthErrorKind};
use crate::oauth::{AuthorizationOptions, OAuthClient, ProviderKind, Token, UserProfile};
use crate::providers::ProviderConfig;

/// OpenID Connect userinfo claims.
#[derive(Debug, Deserialize)]
struct GoogleUserInfo {
    sub: String,
    email: Option<String>,
    name: Option<String>,
}

/// Google OAuth provider.
///
/// Requests the `openid email profile` scopes and reads the OpenID Connect userinfo
/// endpoint. The username is the account email, falling back to the subject identifier.
pub struct Provider {
    client: OAuthClient,
}

impl Provider {
    pub fn new(config: &ProviderConfig, http_client: reqwest::Client) -> Result<Self, Error> {
        Ok(Self {
            client: OAuthClient::new(config, http_client)?,
        })
    }
}

#[async_trait]
impl crate::oauth::Provider for Provider {
    fn kind(&self) -> ProviderKind {
        ProviderKind::Google
    }

    fn authorization_url(&self, state: &str, options: &AuthorizationOptions) -> Url {
        self.client.authorization_url(state, options)
    }

    async fn exchange_code(&self, code: &str) -> Result<Token, Error> {
        self.client.exchange_code(code).await
    }

    async fn fetch_profile_payload(&self, token: &Token) -> Result<Vec<u8>, Error> {
        self.client.fetch_profile_payload(token).await
    }

    fn parse_profile(&self, payload: &[u8]) -> Result<UserProfile, Error> {
        let info: GoogleUserInfo = serde_json::from_slice(payload).map_err(|e| {
            oauth_error(
                OAuthErrorKind::InvalidResponse,
                &format!("google userinfo payload: {e}"),
            )
        })?;

        Ok(UserProfile {
            username: info.email.clone().unwrap_or(info.sub),
            email: info.email,
            name: info.name,
        })
    }
}
