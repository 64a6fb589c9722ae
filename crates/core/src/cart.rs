//! The in-memory shopping cart and checkout preconditions.
//!
//! The cart is ephemeral and client-owned: it lives for one storefront
//! session, is cleared on logout and on successful order submission, and is
//! never persisted. Lines hold a snapshot of the product at add time (id,
//! name, unit price) so a concurrent admin price edit cannot change an
//! in-progress cart; the backend re-validates stock when the order lands.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::types::ProductId;

/// The product data a cart line snapshots at add time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProductSnapshot {
    pub id: ProductId,
    pub name: String,
    pub price: Decimal,
}

/// One line of the cart: a product snapshot plus a quantity.
///
/// Serializes to the backend's order-line shape
/// (`{id, nombre, precio, cantidad}`); the backend stores this JSON
/// verbatim as the order's line snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartLine {
    pub id: ProductId,
    #[serde(rename = "nombre")]
    pub name: String,
    #[serde(rename = "precio")]
    pub price: Decimal,
    #[serde(rename = "cantidad")]
    pub quantity: u32,
}

impl CartLine {
    /// price × quantity for this line.
    #[must_use]
    pub fn subtotal(&self) -> Decimal {
        self.price * Decimal::from(self.quantity)
    }
}

/// Errors that block order submission before any network call.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum CheckoutError {
    /// The cart has no lines.
    #[error("el carrito está vacío")]
    EmptyCart,
    /// The delivery address is empty or whitespace.
    #[error("se requiere una dirección de entrega")]
    BlankAddress,
}

/// The in-memory cart store.
///
/// All mutations are synchronous, single-threaded UI updates; there is no
/// interior mutability and no locking. Line order is insertion order.
///
/// Invariant: every line has `quantity >= 1`. Operations that would drop a
/// quantity to zero remove the line instead.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Cart {
    lines: Vec<CartLine>,
}

impl Cart {
    /// Create an empty cart.
    #[must_use]
    pub const fn new() -> Self {
        Self { lines: Vec::new() }
    }

    /// The current lines, in insertion order.
    #[must_use]
    pub fn lines(&self) -> &[CartLine] {
        &self.lines
    }

    /// Whether the cart has no lines.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Number of distinct lines (not total units).
    #[must_use]
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    /// Add one unit of a product.
    ///
    /// If the product is already in the cart its quantity is incremented;
    /// otherwise a new line with quantity 1 is appended.
    pub fn add(&mut self, product: ProductSnapshot) {
        if let Some(line) = self.lines.iter_mut().find(|l| l.id == product.id) {
            line.quantity = line.quantity.saturating_add(1);
        } else {
            self.lines.push(CartLine {
                id: product.id,
                name: product.name,
                price: product.price,
                quantity: 1,
            });
        }
    }

    /// Overwrite the quantity of a line.
    ///
    /// A quantity of 0 removes the line. An id not in the cart is a no-op.
    pub fn set_quantity(&mut self, id: ProductId, quantity: u32) {
        if quantity == 0 {
            self.remove(id);
            return;
        }
        if let Some(line) = self.lines.iter_mut().find(|l| l.id == id) {
            line.quantity = quantity;
        }
    }

    /// Remove a line entirely.
    pub fn remove(&mut self, id: ProductId) {
        self.lines.retain(|l| l.id != id);
    }

    /// Empty the cart.
    pub fn clear(&mut self) {
        self.lines.clear();
    }

    /// Quantity of a product currently in the cart (0 if absent).
    #[must_use]
    pub fn quantity_of(&self, id: ProductId) -> u32 {
        self.lines
            .iter()
            .find(|l| l.id == id)
            .map_or(0, |l| l.quantity)
    }

    /// Σ price × quantity over all lines.
    ///
    /// Computed on demand so it can never drift from the line state.
    #[must_use]
    pub fn total(&self) -> Decimal {
        self.lines.iter().map(CartLine::subtotal).sum()
    }

    /// Validate the checkout preconditions and produce an order draft.
    ///
    /// The cart itself is not consumed or mutated: clearing happens only
    /// after the backend confirms the order, so a failed submission leaves
    /// everything as it was.
    ///
    /// # Errors
    ///
    /// Returns [`CheckoutError::EmptyCart`] for an empty cart or
    /// [`CheckoutError::BlankAddress`] for a blank delivery address.
    pub fn checkout(&self, delivery_address: &str) -> Result<OrderDraft, CheckoutError> {
        if self.is_empty() {
            return Err(CheckoutError::EmptyCart);
        }
        let address = delivery_address.trim();
        if address.is_empty() {
            return Err(CheckoutError::BlankAddress);
        }
        Ok(OrderDraft {
            items: self.lines.clone(),
            total: self.total(),
            delivery_address: address.to_owned(),
        })
    }
}

/// A validated order-creation request, ready for `POST /api/pedido`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OrderDraft {
    #[serde(rename = "carrito")]
    pub items: Vec<CartLine>,
    pub total: Decimal,
    #[serde(rename = "direccion_pedido")]
    pub delivery_address: String,
}
