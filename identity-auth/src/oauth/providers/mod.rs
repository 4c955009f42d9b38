//! Provider implementations.

pub mod github;
pub mod google;

use super::{Provider, ProviderKind};
use crate::error::Error;
use crate::providers::ProviderConfig;

/// Build the provider implementation matching `config.kind`.
pub fn from_config(
    config: &ProviderConfig,
    http_client: &reqwest::Client,
) -> Result<Box<dyn Provider>, Error> {
    let provider: Box<dyn Provider> = match config.kind {
        ProviderKind::GitHub => Box::new(github::Provider::new(config, http_client.clone())?),
        ProviderKind::Google => Box::new(google::Provider::new(config, http_client.clone())?),
    };
    Ok(provider)
}
