//! Wire types for the backend REST API.
//!
//! Field names on the wire are the backend's Spanish ones; the Rust side
//! uses English names with `serde(rename)`. Response types derive
//! `Deserialize` only and request payloads `Serialize` only - the client
//! never round-trips server-owned data.

use chrono::NaiveDateTime;
use mercadito_core::{
    CartLine, CategoryId, ExchangeRate, OrderId, OrderStatus, PaymentReference, ProductId,
    ProductSnapshot, UserId,
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

// =============================================================================
// Catalog
// =============================================================================

/// A product as listed by `GET /api/productos`.
#[derive(Debug, Clone, Deserialize)]
pub struct Product {
    pub id: ProductId,
    #[serde(rename = "nombre")]
    pub name: String,
    #[serde(rename = "precio")]
    pub price: Decimal,
    pub stock: u32,
    #[serde(rename = "imagen_url")]
    pub image_url: Option<String>,
    #[serde(rename = "categoria_id")]
    pub category_id: Option<CategoryId>,
    #[serde(rename = "categoria_nombre")]
    pub category_name: Option<String>,
}

impl Product {
    /// Whether at least one unit can be added to a cart.
    #[must_use]
    pub const fn in_stock(&self) -> bool {
        self.stock > 0
    }

    /// The snapshot a cart line keeps of this product.
    #[must_use]
    pub fn snapshot(&self) -> ProductSnapshot {
        ProductSnapshot {
            id: self.id,
            name: self.name.clone(),
            price: self.price,
        }
    }
}

/// A category as listed by `GET /api/categorias`.
#[derive(Debug, Clone, Deserialize)]
pub struct Category {
    pub id: CategoryId,
    #[serde(rename = "nombre")]
    pub name: String,
}

// =============================================================================
// Orders
// =============================================================================

/// An order as returned by the listing endpoints.
///
/// `delivery_address` and `customer_name` only appear in the admin listing
/// (`GET /api/pedidos`); the per-user listing omits them.
#[derive(Debug, Clone, Deserialize)]
pub struct Order {
    pub id: OrderId,
    pub total: Decimal,
    #[serde(rename = "estado")]
    pub status: OrderStatus,
    #[serde(rename = "productos", default)]
    pub items: Vec<CartLine>,
    #[serde(rename = "referencia_pago")]
    pub payment_reference: Option<PaymentReference>,
    #[serde(rename = "motivo_rechazo")]
    pub rejection_reason: Option<String>,
    #[serde(rename = "direccion_pedido", default)]
    pub delivery_address: Option<String>,
    #[serde(rename = "nombre_usuario", default)]
    pub customer_name: Option<String>,
    #[serde(rename = "fecha_creacion")]
    pub created_at: Option<NaiveDateTime>,
    #[serde(rename = "fecha_confirmacion", default)]
    pub confirmed_at: Option<NaiveDateTime>,
}

/// Response of `POST /api/pedido`.
#[derive(Debug, Clone, Deserialize)]
pub struct CreatedOrder {
    pub id: OrderId,
    pub total: Decimal,
    #[serde(rename = "estado")]
    pub status: OrderStatus,
    #[serde(rename = "fecha_creacion")]
    pub created_at: Option<NaiveDateTime>,
}

/// Response of `GET /api/pedido/{id}` - the lightweight status probe.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct OrderProbe {
    pub id: OrderId,
    pub total: Decimal,
    #[serde(rename = "estado")]
    pub status: OrderStatus,
}

/// Response of `POST /api/confirmar_pago`.
#[derive(Debug, Clone, Deserialize)]
pub struct PaymentAck {
    #[serde(rename = "pedido_id")]
    pub order_id: OrderId,
    #[serde(rename = "estado")]
    pub status: OrderStatus,
    #[serde(rename = "referencia_pago")]
    pub reference: PaymentReference,
}

/// Body of `POST /api/confirmar_pago`.
#[derive(Debug, Clone, Serialize)]
pub struct ConfirmPaymentRequest {
    #[serde(rename = "pedido_id")]
    pub order_id: OrderId,
    #[serde(rename = "referencia_pago")]
    pub reference: PaymentReference,
}

/// Body of `POST /api/pedido/actualizar_estado`.
#[derive(Debug, Clone, Serialize)]
pub struct StatusUpdateRequest {
    #[serde(rename = "pedido_id")]
    pub order_id: OrderId,
    #[serde(rename = "nuevo_estado")]
    pub new_status: OrderStatus,
    /// Mandatory when `new_status` is `Rejected`, absent otherwise.
    #[serde(rename = "motivo_rechazo", skip_serializing_if = "Option::is_none")]
    pub rejection_reason: Option<String>,
}

// =============================================================================
// Admin payloads
// =============================================================================

/// Body of `POST /api/productos` and `PUT /api/productos/{id}`.
///
/// On update, `category_id: None` serializes as `null`, which clears the
/// product's category server-side.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProductPayload {
    #[serde(rename = "nombre")]
    pub name: String,
    #[serde(rename = "precio")]
    pub price: Decimal,
    pub stock: u32,
    #[serde(rename = "imagen_url")]
    pub image_url: Option<String>,
    #[serde(rename = "categoria_id")]
    pub category_id: Option<CategoryId>,
}

/// Body of `POST /api/categorias` and `PUT /api/categorias/{id}`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryPayload {
    #[serde(rename = "nombre")]
    pub name: String,
}

// =============================================================================
// Configuration
// =============================================================================

/// Payload of `GET`/`PUT /api/configuracion/tasa`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct RateConfig {
    #[serde(rename = "tasa_bcv")]
    pub rate: ExchangeRate,
}

// =============================================================================
// Auth
// =============================================================================

/// The authenticated user, per `GET /api/usuario/actual`.
#[derive(Debug, Clone, Deserialize)]
pub struct User {
    #[serde(rename = "usuario_id")]
    pub id: UserId,
    #[serde(rename = "correo")]
    pub email: String,
    #[serde(default)]
    pub is_admin: bool,
    #[serde(rename = "nombre_usuario", default)]
    pub display_name: Option<String>,
    #[serde(rename = "direccion_principal", default)]
    pub default_address: Option<String>,
}

/// Body of `POST /api/login` and `POST /api/register`.
#[derive(Debug, Clone, Serialize)]
pub struct CredentialsRequest {
    #[serde(rename = "correo")]
    pub email: String,
    #[serde(rename = "contraseña")]
    pub password: String,
    #[serde(rename = "nombre_usuario", skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    #[serde(rename = "direccion_principal", skip_serializing_if = "Option::is_none")]
    pub default_address: Option<String>,
}

/// Acknowledgement of login/register: the session cookie is in the jar,
/// this is just the echo.
#[derive(Debug, Clone, Deserialize)]
pub struct AuthAck {
    #[serde(rename = "usuario_id")]
    pub user_id: UserId,
    #[serde(rename = "correo")]
    pub email: String,
}

/// The `{"error": "..."}` body every failing endpoint returns.
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct ErrorBody {
    pub error: String,
}
