//! GitHub OAuth provider implementation.

use async_trait::async_trait;
use serde::Deserialize;
use url::Url;

use crate::error::{oauth_error, Error, OAuthErrorKind};
use crate::oauth::{AuthorizationOptions, OAuthClient, ProviderKind, Token, UserProfile};
use crate::providers::ProviderConfig;

/// Subset of the `GET /user` response we care about.
#[derive(Debug, Deserialize)]
struct GitHubUser {
    login: String,
    email: Option<String>,
    name: Option<String>,
}

/// GitHub OAuth provider.
///
/// Uses an OAuth App registration: `read:user` and `user:email` scopes, profile from the
/// REST API's authenticated user endpoint.
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
        ProviderKind::GitHub
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
        let user: GitHubUser = serde_json::from_slice(payload).map_err(|e| {
            oauth_error(
                OAuthErrorKind::InvalidResponse,
                &format!("github user payload: {e}"),
            )
        })?;

        Ok(UserProfile {
            username: user.login,
            email: user.email,
            name: user.name,
        })
    }
}
