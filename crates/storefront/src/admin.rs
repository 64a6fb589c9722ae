//! Admin console forms and gating.
//!
//! Client-side validation here is advisory UX: it catches the obvious
//! mistakes before a request is made, but the backend re-validates
//! everything and its error strings are what the user ultimately sees.

use mercadito_core::{CategoryId, OrderId, OrderStatus};
use rust_decimal::Decimal;
use thiserror::Error;

use crate::backend::types::{CategoryPayload, ProductPayload, StatusUpdateRequest};

/// Validation errors for admin forms.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum FormError {
    #[error("el nombre es obligatorio")]
    BlankName,
    #[error("el precio debe ser mayor o igual a 0")]
    NegativePrice,
    #[error("se requiere un motivo de rechazo")]
    BlankRejectionReason,
    #[error("no se puede pasar de \"{from}\" a \"{to}\"")]
    InvalidTransition {
        from: OrderStatus,
        to: OrderStatus,
    },
}

/// Unvalidated product form input.
///
/// `stock` is already a `u32` because the terminal parses it as one; a
/// negative or fractional stock never reaches this type.
#[derive(Debug, Clone, Default)]
pub struct ProductForm {
    pub name: String,
    pub price: Decimal,
    pub stock: u32,
    pub image_url: Option<String>,
    pub category_id: Option<CategoryId>,
}

impl ProductForm {
    /// Validate the form and produce the request payload.
    ///
    /// # Errors
    ///
    /// Returns [`FormError::BlankName`] or [`FormError::NegativePrice`].
    pub fn validate(self) -> Result<ProductPayload, FormError> {
        let name = self.name.trim();
        if name.is_empty() {
            return Err(FormError::BlankName);
        }
        if self.price < Decimal::ZERO {
            return Err(FormError::NegativePrice);
        }
        Ok(ProductPayload {
            name: name.to_owned(),
            price: self.price,
            stock: self.stock,
            image_url: self
                .image_url
                .map(|u| u.trim().to_owned())
                .filter(|u| !u.is_empty()),
            category_id: self.category_id,
        })
    }
}

/// Validate a category name and produce the request payload.
///
/// # Errors
///
/// Returns [`FormError::BlankName`] for a blank name.
pub fn category_payload(name: &str) -> Result<CategoryPayload, FormError> {
    let name = name.trim();
    if name.is_empty() {
        return Err(FormError::BlankName);
    }
    Ok(CategoryPayload {
        name: name.to_owned(),
    })
}

/// Build a gated status-transition request.
///
/// Checks the transition against the order's current status and, for
/// rejections, requires a non-blank reason. The backend still has the
/// final say.
///
/// # Errors
///
/// Returns [`FormError::InvalidTransition`] when the lifecycle forbids the
/// move, or [`FormError::BlankRejectionReason`] when rejecting without a
/// reason.
pub fn transition_request(
    order_id: OrderId,
    current: OrderStatus,
    new_status: OrderStatus,
    rejection_reason: Option<&str>,
) -> Result<StatusUpdateRequest, FormError> {
    if !current.can_transition_to(new_status) {
        return Err(FormError::InvalidTransition {
            from: current,
            to: new_status,
        });
    }

    let rejection_reason = if new_status == OrderStatus::Rejected {
        let reason = rejection_reason.map(str::trim).unwrap_or_default();
        if reason.is_empty() {
            return Err(FormError::BlankRejectionReason);
        }
        Some(reason.to_owned())
    } else {
        None
    };

    Ok(StatusUpdateRequest {
        order_id,
        new_status,
        rejection_reason,
    })
}
