//! Pre-configured provider settings.

use secrecy::SecretString;

use crate::oauth::ProviderKind;

pub const GITHUB_AUTH_URL: &str = "https://github.com/login/oauth/authorize";
pub const GITHUB_TOKEN_URL: &str = "https://github.com/login/oauth/access_token";
pub const GITHUB_PROFILE_URL: &str = "https://api.github.com/user";

pub const GOOGLE_AUTH_URL: &str = "https://accounts.google.com/o/oauth2/v2/auth";
pub const GOOGLE_TOKEN_URL: &str = "https://oauth2.googleapis.com/token";
pub const GOOGLE_PROFILE_URL: &str = "https://openidconnect.googleapis.com/v1/userinfo";

/// OAuth client registration and endpoints for one identity provider.
#[derive(Debug, Clone)]
pub struct ProviderConfig {
    /// Provider identifier.
    pub kind: ProviderKind,
    /// OAuth client ID.
    pub client_id: String,
    /// OAuth client secret.
    pub client_secret: SecretString,
    /// Callback URL registered with the provider. Empty means "use the registered default".
    pub redirect_uri: String,
    /// Authorization endpoint the user is redirected to.
    pub auth_url: String,
    /// Token endpoint used for the code exchange.
    pub token_url: String,
    /// Endpoint returning the authenticated user's profile.
    pub profile_url: String,
    /// Scopes requested on every authorization.
    pub scopes: Vec<String>,
}

impl ProviderConfig {
    /// Override the provider endpoints (e.g. GitHub Enterprise, or a test server).
    pub fn with_endpoints(mut self, auth_url: &str, token_url: &str, profile_url: &str) -> Self {
        self.auth_url = auth_url.to_string();
        self.token_url = token_url.to_string();
        self.profile_url = profile_url.to_string();
        self
    }
}

/// Get GitHub configuration.
///
/// # Arguments
///
/// * `client_id` - GitHub OAuth App client ID
/// * `client_secret` - GitHub OAuth App client secret
/// * `redirect_uri` - Callback URL registered with the app
pub fn github_config(client_id: &str, client_secret: &str, redirect_uri: &str) -> ProviderConfig {
    ProviderConfig {
        kind: ProviderKind::GitHub,
        client_id: client_id.to_string(),
        client_secret: SecretString::new(client_secret.to_string()),
        redirect_uri: redirect_uri.to_string(),
        auth_url: GITHUB_AUTH_URL.to_string(),
        token_url: GITHUB_TOKEN_URL.to_string(),
        profile_url: GITHUB_PROFILE_URL.to_string(),
        scopes: vec!["read:user".to_string(), "user:email".to_string()],
    }
}

/// Get Google configuration.
pub fn google_config(client_id: &str, client_secret: &str, redirect_uri: &str) -> ProviderConfig {
    ProviderConfig {
        kind: ProviderKind::Google,
        client_id: client_id.to_string(),
        client_secret: SecretString::new(client_secret.to_string()),
        redirect_uri: redirect_uri.to_string(),
        auth_url: GOOGLE_AUTH_URL.to_string(),
        token_url: GOOGLE_TOKEN_URL.to_string(),
        profile_url: GOOGLE_PROFILE_URL.to_string(),
        scopes: vec![
            "openid".to_string(),
            "email".to_string(),
            "profile".to_string(),
        ],
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use secrecy::ExposeSecret;

    #[test]
    fn test_github_config() {
        let config = github_config("id", "secret", "http://localhost/callback");
        assert_eq!(config.kind, ProviderKind::GitHub);
        assert_eq!(config.profile_url, "https://api.github.com/user");
        assert_eq!(config.client_secret.expose_secret(), "secret");
        assert!(config.scopes.contains(&"read:user".to_string()));
    }

    #[test]
    fn test_google_config() {
        let config = google_config("id", "secret", "");
        assert_eq!(config.kind, ProviderKind::Google);
        assert_eq!(config.token_url, "https://oauth2.googleapis.com/token");
        assert_eq!(config.scopes, vec!["openid", "email", "profile"]);
    }

    #[test]
    fn test_with_endpoints_overrides_urls() {
        let config = github_config("id", "secret", "").with_endpoints(
            "http://127.0.0.1:1234/authorize",
            "http://127.0.0.1:1234/token",
            "http://127.0.0.1:1234/user",
        );
        assert_eq!(config.auth_url, "http://127.0.0.1:1234/authorize");
        assert_eq!(config.token_url, "http://127.0.0.1:1234/token");
        assert_eq!(config.profile_url, "http://127.0.0.1:1234/user");
    }
}
