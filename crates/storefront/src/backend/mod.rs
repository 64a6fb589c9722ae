//! Typed client for the Mercadito backend REST API.
//!
//! # Architecture
//!
//! - Plain JSON over HTTP via `reqwest`; the backend is the source of truth
//! - Session-cookie authentication: `login`/`register` set the cookie in
//!   the client's cookie store, every later call carries it
//! - Mutating endpoints answer failures with `{"error": "..."}` and a
//!   non-success status; that string is surfaced verbatim as
//!   [`ApiError::Api`]
//! - The exchange rate is cached (`moka`, short TTL) and invalidated when
//!   the admin console updates it; nothing else is cached
//!
//! # Example
//!
//! ```rust,ignore
//! use mercadito_storefront::{Config, StoreClient};
//!
//! let client = StoreClient::new(&Config::from_env()?)?;
//!
//! client.login("ana@example.com", "hunter22").await?;
//! let products = client.products().await?;
//! let rate = client.exchange_rate().await?;
//! ```

mod client;
pub mod types;

pub use client::{StatusAck, StoreClient, format_timestamp};

use thiserror::Error;

/// Errors that can occur when talking to the backend.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Transport-level failure (connection refused, timeout, DNS...).
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The backend rejected the request and explained why.
    ///
    /// `message` is the backend's `error` string, surfaced verbatim.
    #[error("{message}")]
    Api {
        status: reqwest::StatusCode,
        message: String,
    },

    /// The request needs an authenticated session (HTTP 401).
    #[error("Debes iniciar sesión: {0}")]
    Unauthorized(String),

    /// The response body was not the JSON shape we expected.
    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),
}

impl ApiError {
    /// Whether this error means "log in first".
    #[must_use]
    pub const fn is_unauthorized(&self) -> bool {
        matches!(self, Self::Unauthorized(_))
    }
}
