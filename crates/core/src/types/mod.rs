//! Core types for Mercadito.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod id;
pub mod rate;
pub mod reference;
pub mod status;

pub use id::*;
pub use rate::{ExchangeRate, RateError};
pub use reference::{PaymentReference, ReferenceError};
pub use status::OrderStatus;
