//! Login flow for the auth service: one-time OAuth state references and the
//! authorization code exchange with external identity providers.
//!
//! Consumers of the `domain` crate do not need to depend on `entity_api` or
//! `identity-auth` directly; the items they need are re-exported here.

// Re-exports from `entity` crate via `entity_api`
pub use entity_api::{oauth_state_references, Id};

pub mod error;
pub mod gateway;
pub mod login;
pub mod oauth_state;
