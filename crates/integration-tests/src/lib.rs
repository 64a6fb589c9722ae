//! Integration tests for Mercadito.
//!
//! # Running Tests
//!
//! ```bash
//! # Start the backend (owns the database)
//! flask run
//!
//! # Run the ignored tests against it
//! cargo test -p mercadito-integration-tests -- --ignored
//! ```
//!
//! # Environment Variables
//!
//! - `MERCADITO_API_URL` - Backend base URL (default `http://localhost:5000`)
//! - `MERCADITO_ADMIN_EMAIL` / `MERCADITO_ADMIN_PASSWORD` - An existing
//!   admin account; the admin tests are skipped at login when absent
//!
//! Each test registers its own throwaway shopper, so tests are independent
//! and re-runnable against the same backend instance.

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::time::{SystemTime, UNIX_EPOCH};

use mercadito_storefront::backend::types::{CredentialsRequest, User};
use mercadito_storefront::{Config, StoreClient};
use secrecy::{ExposeSecret, SecretString};

/// Password shared by every throwaway test account.
pub const TEST_PASSWORD: &str = "secreta123";

/// Configuration pointing at the backend under test.
///
/// # Panics
///
/// Panics when `MERCADITO_API_URL` is set but unparseable.
#[must_use]
pub fn test_config() -> Config {
    dotenvy::dotenv().ok();
    Config::from_env().expect("invalid test configuration")
}

/// A fresh anonymous client (own cookie jar).
///
/// # Panics
///
/// Panics if the HTTP client cannot be built.
#[must_use]
pub fn anonymous_client() -> StoreClient {
    StoreClient::new(&test_config()).expect("failed to build client")
}

/// An email address no earlier test run has used.
#[must_use]
pub fn unique_email(prefix: &str) -> String {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_or(0, |d| d.as_nanos());
    format!("{prefix}+{nanos}@test.example.com")
}

/// Register a throwaway shopper and return their logged-in client.
///
/// # Panics
///
/// Panics if registration fails.
pub async fn registered_shopper(prefix: &str) -> (StoreClient, User) {
    let client = anonymous_client();
    let request = CredentialsRequest {
        email: unique_email(prefix),
        password: TEST_PASSWORD.to_owned(),
        display_name: Some(format!("Test {prefix}")),
        default_address: Some("Av. Principal, local 1".to_owned()),
    };
    client
        .register(&request)
        .await
        .expect("failed to register test shopper");
    let user = client
        .current_user()
        .await
        .expect("failed to fetch registered shopper")
        .expect("registration did not establish a session");
    (client, user)
}

/// A client logged in as the admin account from the environment.
///
/// # Panics
///
/// Panics when the admin credentials are missing or rejected.
pub async fn admin_client() -> StoreClient {
    dotenvy::dotenv().ok();
    let email = std::env::var("MERCADITO_ADMIN_EMAIL")
        .expect("MERCADITO_ADMIN_EMAIL not set; admin tests need an admin account");
    let password: SecretString = std::env::var("MERCADITO_ADMIN_PASSWORD")
        .expect("MERCADITO_ADMIN_PASSWORD not set")
        .into();

    let client = anonymous_client();
    client
        .login(&email, password.expose_secret())
        .await
        .expect("admin login failed");
    client
}
