//! # identity-auth
//!
//! External identity provider support for the login flow:
//! - OAuth 2.0 authorization code flow (authorization URL, code exchange)
//! - Profile retrieval from each provider's user endpoint
//! - Provider implementations (GitHub, Google) and a registry keyed by provider
//! - HTTP client construction with explicit timeouts
//!
//! ## Usage
//!
//! ```rust,ignore
//! use identity_auth::{
//!     http::ClientBuilder,
//!     oauth::{AuthorizationOptions, ProviderKind, Registry},
//!     providers,
//! };
//!
//! let http_client = ClientBuilder::new().build()?;
//! let registry = Registry::from_configs([providers::github_config(id, secret, redirect)], &http_client)?;
//! let github = registry.get(ProviderKind::GitHub)?;
//! let url = github.authorization_url(&state, &AuthorizationOptions::default());
//! ```

pub mod error;
pub mod http;
pub mod oauth;
pub mod providers;

// Re-export commonly used types
pub use error::{Error, ErrorKind};
