//! Lookup of configured providers by kind.

use std::collections::HashMap;
use std::sync::Arc;

use super::providers;
use super::{Provider, ProviderKind};
use crate::error::{config_error, ConfigErrorKind, Error};
use crate::providers::ProviderConfig;

/// The set of identity providers enabled for this deployment.
#[derive(Default, Clone)]
pub struct Registry {
    providers: HashMap<ProviderKind, Arc<dyn Provider>>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a registry from provider configurations, sharing one HTTP client between them.
    pub fn from_configs<I>(configs: I, http_client: &reqwest::Client) -> Result<Self, Error>
    where
        I: IntoIterator<Item = ProviderConfig>,
    {
        let mut registry = Self::new();
        for config in configs {
            let provider = providers::from_config(&config, http_client)?;
            registry.register(Arc::from(provider));
        }
        Ok(registry)
    }

    /// Register a provider, replacing any previous one of the same kind.
    pub fn register(&mut self, provider: Arc<dyn Provider>) {
        self.providers.insert(provider.kind(), provider);
    }

    pub fn get(&self, kind: ProviderKind) -> Result<Arc<dyn Provider>, Error> {
        self.providers.get(&kind).cloned().ok_or_else(|| {
            config_error(
                ConfigErrorKind::UnknownProvider,
                &format!("identity provider not configured: {kind}"),
            )
        })
    }

    /// Kinds of all registered providers, in a stable order.
    pub fn kinds(&self) -> Vec<ProviderKind> {
        let mut kinds: Vec<ProviderKind> = self.providers.keys().copied().collect();
        kinds.sort();
        kinds
    }
}
