//! Mercadito Storefront - backend API client and session flows.
//!
//! The Mercadito backend is an external JSON/HTTP service that owns all
//! persistence, stock accounting, authentication, and order state
//! transitions. This crate is the client side: a typed [`backend::StoreClient`]
//! over the REST API, the [`catalog`] filter helpers, [`admin`] form
//! validation, and the [`session`] state machine that drives the
//! interactive storefront.
//!
//! # Architecture
//!
//! - The backend is the source of truth - no local sync, direct API calls
//! - Session-cookie authentication via the `reqwest` cookie store
//! - The exchange rate is the one piece of shared configuration several
//!   views need; it is cached in-process via `moka` and invalidated when
//!   the admin console writes it
//! - Every flow is sequential request/response orchestration: dependent
//!   calls await each response before issuing the next, and no call is
//!   retried automatically

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod admin;
pub mod backend;
pub mod catalog;
pub mod config;
pub mod session;

pub use backend::{ApiError, StoreClient};
pub use config::{Config, ConfigError};
pub use session::{FlowError, Screen, Session};
