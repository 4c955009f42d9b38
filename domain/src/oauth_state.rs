//! One-time OAuth `state` tokens binding a login attempt to the page it started from.
//!
//! A state reference is created when the user is sent to the identity provider and consumed
//! exactly once when the provider redirects back. Consuming it both proves the callback
//! belongs to a login this service started and yields the referrer to return the user to.

use crate::error::Error;
use crate::oauth_state_references::Model;
use crate::Id;
use chrono::Utc;
use entity_api::{error::Error as EntityApiError, oauth_state_reference};
use log::*;
use regex::Regex;
use sea_orm::DatabaseConnection;

/// Generate a fresh state id for a new login attempt.
pub fn new_state() -> Id {
    Id::new_v4()
}

/// Whether `referrer` matches `whitelist_pattern` in full.
///
/// Returns a configuration error if the pattern does not compile.
pub fn is_valid_redirect(whitelist_pattern: &str, referrer: &str) -> Result<bool, Error> {
    let whitelist = Regex::new(&format!("^(?:{whitelist_pattern})$")).inspect_err(|e| {
        error!("Invalid redirect whitelist pattern {whitelist_pattern:?}: {e}");
    })?;

    Ok(whitelist.is_match(referrer))
}

/// Remember `referrer` under `state` so the callback carrying `state` can return the user there.
///
/// Referrers outside the whitelist are rejected before anything is written.
pub async fn save_referrer(
    db: &DatabaseConnection,
    state: Id,
    referrer: &str,
    whitelist_pattern: &str,
) -> Result<(), Error> {
    if !is_valid_redirect(whitelist_pattern, referrer)? {
        info!("Rejecting login referrer outside the redirect whitelist: {referrer}");
        return Err(Error::validation("redirect", "not valid redirect URL"));
    }

    let model = Model {
        id: state,
        referrer: referrer.to_string(),
        created_at: Utc::now().into(),
    };

    entity_api::transactional(db, |txn| {
        Box::pin(async move { oauth_state_reference::create(txn, model).await })
    })
    .await
    .inspect_err(|e| {
        error!("Failed to save OAuth state reference (state: {state}, referrer: {referrer}): {e}");
    })?;

    debug!("Saved OAuth state reference {state}");
    Ok(())
}

/// Consume the state reference for `state` and return its referrer.
///
/// Succeeds at most once per state: the record is removed in the same transaction that reads
/// it, so a replayed or concurrent callback observes a not-found error.
pub async fn load_referrer(db: &DatabaseConnection, state: &str) -> Result<String, Error> {
    let id = entity_api::uuid_parse_str(state).map_err(|e| {
        warn!("Rejecting malformed OAuth state {state:?}");
        Error {
            source: Some(Box::new(e)),
            ..Error::validation("state", "not valid state")
        }
    })?;

    let referrer = entity_api::transactional(db, |txn| {
        Box::pin(async move {
            let reference = oauth_state_reference::find_by_id_for_update(txn, id).await?;
            oauth_state_reference::delete_by_id(txn, id).await?;
            Ok::<_, EntityApiError>(reference.referrer)
        })
    })
    .await
    .map_err(Error::from)
    .inspect_err(|e| match e.category() {
        crate::error::ErrorCategory::NotFound => {
            warn!("No live OAuth state reference for state {id}")
        }
        _ => error!("Failed to load OAuth state reference {id}: {e}"),
    })?;

    debug!("Consumed OAuth state reference {id}");
    Ok(referrer)
}
