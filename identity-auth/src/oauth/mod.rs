//! OAuth 2.0 authorization code flow against external identity providers.

mod client;
mod profile;
mod provider;
mod registry;
mod token;

pub mod providers;

pub use client::OAuthClient;
pub use profile::{fetch_profile_payload, UserProfile};
pub use provider::{AuthorizationOptions, Provider, ProviderKind};
pub use registry::Registry;
pub use token::Token;
