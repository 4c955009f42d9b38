//! Login flow against a real SQLite state store.

use domain::error::ErrorCategory;
use domain::gateway::oauth::{AuthorizationOptions, Provider, ProviderKind, Registry};
use domain::{login, oauth_state};
use identity_auth::http::ClientBuilder;
use identity_auth::providers::github_config;
use migration::{Migrator, MigratorTrait};
use mockito::Server;
use sea_orm::{ConnectOptions, Database, DatabaseConnection, EntityTrait, PaginatorTrait};
use secrecy::ExposeSecret;
use std::sync::Arc;
use tempfile::TempDir;
use tokio::sync::Barrier;

const WHITELIST: &str = r"https?://localhost(:\d+)?(/.*)?";

async fn setup_db() -> DatabaseConnection {
    // A single pooled connection keeps every query on the same in-memory database.
    let mut opt = ConnectOptions::new("sqlite::memory:");
    opt.max_connections(1).min_connections(1).sqlx_logging(false);

    let db = Database::connect(opt).await.unwrap();
    Migrator::up(&db, None).await.unwrap();
    db
}

// A file-backed database shared by several pooled connections, so transactions overlap.
async fn setup_file_db(dir: &TempDir, connections: u32) -> DatabaseConnection {
    let path = dir.path().join("auth_flow.db");
    let mut opt = ConnectOptions::new(format!("sqlite://{}?mode=rwc", path.display()));
    opt.max_connections(connections).sqlx_logging(false);

    let db = Database::connect(opt).await.unwrap();
    Migrator::up(&db, None).await.unwrap();
    db
}

async fn stored_references(db: &DatabaseConnection) -> u64 {
    domain::oauth_state_references::Entity::find()
        .count(db)
        .await
        .unwrap()
}

#[tokio::test]
async fn saved_referrer_is_returned_once() {
    let db = setup_db().await;
    let state = oauth_state::new_state();

    oauth_state::save_referrer(&db, state, "http://localhost:3000/dashboard", WHITELIST)
        .await
        .unwrap();

    let referrer = oauth_state::load_referrer(&db, &state.to_string())
        .await
        .unwrap();
    assert_eq!(referrer, "http://localhost:3000/dashboard");

    let err = oauth_state::load_referrer(&db, &state.to_string())
        .await
        .unwrap_err();
    assert_eq!(err.category(), ErrorCategory::NotFound);
    assert_eq!(stored_references(&db).await, 0);
}

#[tokio::test]
async fn rejected_referrer_leaves_no_record() {
    let db = setup_db().await;
    let state = oauth_state::new_state();

    let err = oauth_state::save_referrer(&db, state, "https://evil.example/phish", WHITELIST)
        .await
        .unwrap_err();

    assert_eq!(err.category(), ErrorCategory::Validation);
    assert_eq!(stored_references(&db).await, 0);

    let err = oauth_state::load_referrer(&db, &state.to_string())
        .await
        .unwrap_err();
    assert_eq!(err.category(), ErrorCategory::NotFound);
}

#[tokio::test]
async fn duplicate_state_is_a_persistence_error() {
    let db = setup_db().await;
    let state = oauth_state::new_state();

    oauth_state::save_referrer(&db, state, "http://localhost/a", WHITELIST)
        .await
        .unwrap();
    let err = oauth_state::save_referrer(&db, state, "http://localhost/b", WHITELIST)
        .await
        .unwrap_err();

    assert_eq!(err.category(), ErrorCategory::Persistence);
    assert_eq!(
        oauth_state::load_referrer(&db, &state.to_string())
            .await
            .unwrap(),
        "http://localhost/a"
    );
}

#[tokio::test]
async fn malformed_state_is_a_validation_error() {
    let db = setup_db().await;

    let err = oauth_state::load_referrer(&db, "not-a-valid-id")
        .await
        .unwrap_err();

    assert_eq!(err.category(), ErrorCategory::Validation);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_loads_consume_the_state_once() {
    const CONSUMERS: usize = 8;

    let dir = TempDir::new().unwrap();
    let db = Arc::new(setup_file_db(&dir, CONSUMERS as u32).await);
    let state = oauth_state::new_state();
    oauth_state::save_referrer(&db, state, "http://localhost:8080/", WHITELIST)
        .await
        .unwrap();
    let state = state.to_string();

    let barrier = Arc::new(Barrier::new(CONSUMERS));
    let handles: Vec<_> = (0..CONSUMERS)
        .map(|_| {
            let db = Arc::clone(&db);
            let barrier = Arc::clone(&barrier);
            let state = state.clone();
            tokio::spawn(async move {
                barrier.wait().await;
                oauth_state::load_referrer(&db, &state).await
            })
        })
        .collect();

    let mut successes = Vec::new();
    let mut failures = Vec::new();
    for handle in handles {
        match handle.await.unwrap() {
            Ok(referrer) => successes.push(referrer),
            Err(e) => failures.push(e.category()),
        }
    }

    assert_eq!(successes, vec!["http://localhost:8080/".to_string()]);
    assert_eq!(failures.len(), CONSUMERS - 1);
    // SQLite reports a write conflict between overlapping transactions as a store error
    // rather than blocking on a row lock; either way the loser never sees the referrer.
    assert!(failures
        .iter()
        .all(|c| matches!(c, ErrorCategory::NotFound | ErrorCategory::Persistence)));
    assert_eq!(stored_references(&db).await, 0);
}

#[tokio::test]
async fn login_round_trip_through_github() {
    let db = setup_db().await;
    let mut server = Server::new_async().await;
    let token_mock = server
        .mock("POST", "/login/oauth/access_token")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"access_token":"gho_valid","token_type":"bearer"}"#)
        .expect(1)
        .create_async()
        .await;
    let user_mock = server
        .mock("GET", "/user")
        .match_header("authorization", "Bearer gho_valid")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"login":"octocat","email":"octocat@github.com","name":"The Octocat"}"#)
        .expect(1)
        .create_async()
        .await;

    let config = github_config("client-1", "secret", "http://localhost:4000/callback")
        .with_endpoints(
            &format!("{}/login/oauth/authorize", server.url()),
            &format!("{}/login/oauth/access_token", server.url()),
            &format!("{}/user", server.url()),
        );
    let http_client = ClientBuilder::new().build().unwrap();
    let registry = Registry::from_configs([config], &http_client).unwrap();
    let github = registry.get(ProviderKind::GitHub).unwrap();

    let redirect = login::begin(
        &db,
        github.as_ref(),
        "http://localhost:3000/settings",
        WHITELIST,
        &AuthorizationOptions::default(),
    )
    .await
    .unwrap();

    let state = redirect
        .authorization_url
        .query_pairs()
        .find(|(k, _)| k == "state")
        .map(|(_, v)| v.into_owned())
        .unwrap();
    assert_eq!(state, redirect.state.to_string());

    let completed = login::complete(&db, github.as_ref(), "code-123", &state)
        .await
        .unwrap();

    assert_eq!(completed.referrer, "http://localhost:3000/settings");
    assert_eq!(completed.profile.username, "octocat");
    assert_eq!(completed.token.access_token.expose_secret(), "gho_valid");

    // A replayed callback is refused before the provider is contacted again.
    let err = login::complete(&db, github.as_ref(), "code-123", &state)
        .await
        .unwrap_err();
    assert_eq!(err.category(), ErrorCategory::NotFound);

    token_mock.assert_async().await;
    user_mock.assert_async().await;
}

#[tokio::test]
async fn provider_refusing_the_profile_is_an_upstream_error() {
    let db = setup_db().await;
    let mut server = Server::new_async().await;
    let _token_mock = server
        .mock("POST", "/token")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"access_token":"gho_revoked","token_type":"bearer"}"#)
        .create_async()
        .await;
    let _user_mock = server
        .mock("GET", "/user")
        .with_status(401)
        .with_body(r#"{"message":"Bad credentials"}"#)
        .create_async()
        .await;

    let config = github_config("client-1", "secret", "").with_endpoints(
        &format!("{}/authorize", server.url()),
        &format!("{}/token", server.url()),
        &format!("{}/user", server.url()),
    );
    let registry = Registry::from_configs([config], &reqwest_client()).unwrap();
    let github = registry.get(ProviderKind::GitHub).unwrap();

    let redirect = login::begin(
        &db,
        github.as_ref(),
        "http://localhost/",
        WHITELIST,
        &AuthorizationOptions::default(),
    )
    .await
    .unwrap();

    let err = login::complete(&db, github.as_ref(), "code", &redirect.state.to_string())
        .await
        .unwrap_err();

    assert_eq!(err.category(), ErrorCategory::Upstream);
    assert_eq!(github.kind(), ProviderKind::GitHub);
}

fn reqwest_client() -> reqwest::Client {
    ClientBuilder::new().build().unwrap()
}
