//! Login through an external identity provider, from redirect to authenticated profile.

use crate::error::Error;
use crate::gateway::oauth::{AuthorizationOptions, Provider, Token, UserProfile};
use crate::oauth_state;
use crate::Id;
use log::*;
use sea_orm::DatabaseConnection;
use url::Url;

/// Where to send the user to start a login.
#[derive(Debug, Clone)]
pub struct LoginRedirect {
    pub state: Id,
    pub authorization_url: Url,
}

/// Outcome of a successful provider callback.
#[derive(Debug, Clone)]
pub struct CompletedLogin {
    /// Page the login was started from; the user should be redirected back here.
    pub referrer: String,
    pub token: Token,
    pub profile: UserProfile,
}

/// Start a login: record `referrer` under a new state and build the provider redirect.
pub async fn begin(
    db: &DatabaseConnection,
    provider: &dyn Provider,
    referrer: &str,
    whitelist_pattern: &str,
    options: &AuthorizationOptions,
) -> Result<LoginRedirect, Error> {
    let state = oauth_state::new_state();

    oauth_state::save_referrer(db, state, referrer, whitelist_pattern).await?;

    let authorization_url = provider.authorization_url(&state.to_string(), options);
    info!("Starting {} login with state {state}", provider.kind());

    Ok(LoginRedirect {
        state,
        authorization_url,
    })
}

/// Finish a login from the provider's callback parameters.
///
/// The state is consumed before the provider is contacted, so a replayed callback is
/// rejected without spending its authorization code.
pub async fn complete(
    db: &DatabaseConnection,
    provider: &dyn Provider,
    code: &str,
    state: &str,
) -> Result<CompletedLogin, Error> {
    let referrer = oauth_state::load_referrer(db, state).await?;

    let token = provider.exchange_code(code).await.inspect_err(|e| {
        warn!("Failed to exchange {} authorization code: {e}", provider.kind())
    })?;

    let profile = provider.profile(&token).await.inspect_err(|e| {
        warn!("Failed to get {} user profile: {e}", provider.kind())
    })?;

    info!("Completed {} login for {}", provider.kind(), profile.username);

    Ok(CompletedLogin {
        referrer,
        token,
        profile,
    })
}
