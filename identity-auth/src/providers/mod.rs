//! Pre-configured provider settings.

mod config;

pub use config::{
    github_config, google_config, ProviderConfig, GITHUB_AUTH_URL, GITHUB_PROFILE_URL,
    GITHUB_TOKEN_URL, GOOGLE_AUTH_URL, GOOGLE_PROFILE_URL, GOOGLE_TOKEN_URL,
};
