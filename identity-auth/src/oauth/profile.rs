//! User profile retrieval.

use reqwest::header::ACCEPT;
use secrecy::ExposeSecret;
use serde::{Deserialize, Serialize};
use tracing::error;

use super::token::Token;
use crate::error::{Error, ErrorKind, OAuthErrorKind};

/// Normalized profile of the user who authorized the login.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    /// Provider-side login name.
    pub username: String,
    /// Email address, when the provider exposes one.
    pub email: Option<String>,
    /// Display name.
    pub name: Option<String>,
}

/// Fetch the raw profile payload from `profile_url`, authenticating with `token`.
///
/// The whole body is read before the status is inspected so that it can be logged when the
/// provider refuses the request. Non-2xx responses become
/// [`OAuthErrorKind::ProfileFetchFailed`] naming the endpoint and status; the body itself is
/// only ever written to the log. The response is consumed or dropped on every path, which
/// returns its connection to the client's pool.
pub async fn fetch_profile_payload(
    http_client: &reqwest::Client,
    profile_url: &str,
    token: &Token,
) -> Result<Vec<u8>, Error> {
    let response = http_client
        .get(profile_url)
        .bearer_auth(token.access_token.expose_secret())
        .header(ACCEPT, "application/json")
        .send()
        .await
        .map_err(|err| {
            error!(profile_url, error = %err, "unable to get user profile");
            Error::from(err)
        })?;

    let status = response.status();
    let body = response.bytes().await.map_err(|err| {
        error!(profile_url, error = %err, "unable to read user profile payload");
        Error::from(err)
    })?;

    if !status.is_success() {
        error!(
            %status,
            profile_url,
            response_body = %String::from_utf8_lossy(&body),
            "unable to get user profile"
        );
        return Err(Error {
            source: Some(format!("{profile_url} responded with {status}").into()),
            error_kind: ErrorKind::OAuth(OAuthErrorKind::ProfileFetchFailed),
        });
    }

    Ok(body.to_vec())
}
