//! Authorization code flow shared by every provider.

use oauth2::basic::BasicClient;
use oauth2::{
    AuthUrl, AuthorizationCode, ClientId, ClientSecret, CsrfToken, EndpointNotSet, EndpointSet,
    RedirectUrl, RequestTokenError, Scope, TokenUrl,
};
use secrecy::ExposeSecret;
use tracing::{debug, error};
use url::Url;

use super::profile;
use super::provider::AuthorizationOptions;
use super::token::Token;
use crate::error::{
    config_error, http_error, oauth_error, ConfigErrorKind, Error, HttpErrorKind, OAuthErrorKind,
};
use crate::providers::ProviderConfig;

// BasicClient with auth and token endpoints set
type ConfiguredClient = BasicClient<
    EndpointSet,    // HasAuthUrl
    EndpointNotSet, // HasDeviceAuthUrl
    EndpointNotSet, // HasIntrospectionUrl
    EndpointNotSet, // HasRevocationUrl
    EndpointSet,    // HasTokenUrl
>;

/// OAuth 2.0 client for one provider registration, bound to an injected HTTP client.
pub struct OAuthClient {
    client: ConfiguredClient,
    http_client: reqwest::Client,
    token_url: String,
    profile_url: String,
    scopes: Vec<String>,
}

impl OAuthClient {
    /// Create a client from a provider configuration.
    ///
    /// # Errors
    ///
    /// Returns a configuration error if any configured URL is invalid.
    pub fn new(config: &ProviderConfig, http_client: reqwest::Client) -> Result<Self, Error> {
        let mut client = BasicClient::new(ClientId::new(config.client_id.clone()))
            .set_client_secret(ClientSecret::new(
                config.client_secret.expose_secret().clone(),
            ))
            .set_auth_uri(AuthUrl::new(config.auth_url.clone()).map_err(|e| {
                config_error(ConfigErrorKind::InvalidUrl, &format!("auth url: {e}"))
            })?)
            .set_token_uri(TokenUrl::new(config.token_url.clone()).map_err(|e| {
                config_error(ConfigErrorKind::InvalidUrl, &format!("token url: {e}"))
            })?);

        if !config.redirect_uri.is_empty() {
            client = client.set_redirect_uri(RedirectUrl::new(config.redirect_uri.clone()).map_err(
                |e| config_error(ConfigErrorKind::InvalidUrl, &format!("redirect uri: {e}")),
            )?);
        }

        Url::parse(&config.profile_url).map_err(|e| {
            config_error(ConfigErrorKind::InvalidUrl, &format!("profile url: {e}"))
        })?;

        Ok(Self {
            client,
            http_client,
            token_url: config.token_url.clone(),
            profile_url: config.profile_url.clone(),
            scopes: config.scopes.clone(),
        })
    }

    pub fn authorization_url(&self, state: &str, options: &AuthorizationOptions) -> Url {
        let mut request = self
            .client
            .authorize_url(|| CsrfToken::new(state.to_string()))
            .add_scopes(
                self.scopes
                    .iter()
                    .chain(options.scopes.iter())
                    .map(|scope| Scope::new(scope.clone())),
            );

        for (name, value) in &options.extra_params {
            request = request.add_extra_param(name.as_str(), value.as_str());
        }

        let (url, _state) = request.url();
        url
    }

    pub async fn exchange_code(&self, code: &str) -> Result<Token, Error> {
        debug!(token_url = %self.token_url, "exchanging authorization code");

        let response = self
            .client
            .exchange_code(AuthorizationCode::new(code.to_string()))
            .request_async(&self.http_client)
            .await
            .map_err(|err| {
                let message = format!("{}: {err}", self.token_url);
                error!(token_url = %self.token_url, error = %err, "unable to exchange authorization code");
                match err {
                    RequestTokenError::ServerResponse(_) | RequestTokenError::Other(_) => {
                        oauth_error(OAuthErrorKind::TokenExchangeFailed, &message)
                    }
                    RequestTokenError::Parse(_, _) => {
                        oauth_error(OAuthErrorKind::InvalidResponse, &message)
                    }
                    RequestTokenError::Request(_) => http_error(HttpErrorKind::Network, &message),
                }
            })?;

        Ok(Token::from(response))
    }

    pub async fn fetch_profile_payload(&self, token: &Token) -> Result<Vec<u8>, Error> {
        profile::fetch_profile_payload(&self.http_client, &self.profile_url, token).await
    }
}
