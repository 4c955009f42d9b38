//! OAuth identity provider gateway.
//!
//! Re-exports OAuth types from identity-auth and builds the provider registry from the
//! service configuration.

use crate::error::Error;
use identity_auth::http::ClientBuilder;
use identity_auth::providers::{github_config, google_config, ProviderConfig};
use log::*;
use service::config::{Config, ProviderSettings};

// Re-export OAuth types from identity-auth
pub use identity_auth::oauth::{
    AuthorizationOptions, Provider, ProviderKind, Registry, Token, UserProfile,
};

/// Build the HTTP client used for every identity provider call.
pub fn http_client(config: &Config) -> Result<reqwest::Client, Error> {
    let mut builder = ClientBuilder::new()
        .with_timeout(config.http_timeout())
        .with_connect_timeout(config.http_connect_timeout());

    if let Some(user_agent) = config.http_user_agent() {
        builder = builder.with_user_agent(user_agent);
    }

    Ok(builder.build()?)
}

/// Provider configurations for every provider with a client ID set.
pub fn provider_configs(config: &Config) -> Vec<ProviderConfig> {
    let mut configs = Vec::new();

    if let Some(settings) = config.github() {
        configs.push(with_settings(
            github_config(
                &settings.client_id,
                &settings.client_secret,
                &settings.redirect_uri,
            ),
            &settings,
        ));
    }

    if let Some(settings) = config.google() {
        configs.push(with_settings(
            google_config(
                &settings.client_id,
                &settings.client_secret,
                &settings.redirect_uri,
            ),
            &settings,
        ));
    }

    configs
}

// Endpoints not overridden in the settings keep the provider's defaults.
fn with_settings(config: ProviderConfig, settings: &ProviderSettings) -> ProviderConfig {
    let auth_url = settings.auth_url.as_ref().unwrap_or(&config.auth_url).clone();
    let token_url = settings.token_url.as_ref().unwrap_or(&config.token_url).clone();
    let profile_url = settings
        .profile_url
        .as_ref()
        .unwrap_or(&config.profile_url)
        .clone();

    config.with_endpoints(&auth_url, &token_url, &profile_url)
}

/// Build the registry of configured identity providers.
pub fn registry(config: &Config) -> Result<Registry, Error> {
    let http_client = http_client(config)?;
    let registry = Registry::from_configs(provider_configs(config), &http_client)?;

    if registry.kinds().is_empty() {
        warn!("No identity providers configured; logins cannot be started");
    } else {
        info!("Identity providers enabled: {:?}", registry.kinds());
    }

    Ok(registry)
}
