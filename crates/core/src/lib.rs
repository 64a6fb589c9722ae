//! Mercadito Core - Shared domain types.
//!
//! This crate provides the types shared by all Mercadito components:
//! - `storefront` - Backend API client and session flows
//! - `cli` - Terminal storefront and admin console
//!
//! # Architecture
//!
//! The core crate contains only types and the cart/order domain logic - no
//! I/O, no HTTP. The backend service owns all persistence and order state
//! transitions; types here model what the client is allowed to ask for and
//! the local invariants it must uphold before asking.
//!
//! # Modules
//!
//! - [`types`] - Newtype IDs, order status state machine, payment
//!   references, exchange rate
//! - [`cart`] - The in-memory cart store and checkout preconditions

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod cart;
pub mod types;

pub use cart::*;
pub use types::*;
