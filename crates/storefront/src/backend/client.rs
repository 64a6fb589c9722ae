//! Backend REST API client implementation.
//!
//! Uses `reqwest` with a cookie store for session auth and `moka` for the
//! exchange-rate cache (60-second TTL, invalidated on write).

use std::sync::Arc;
use std::time::Duration;

use chrono::NaiveDateTime;
use mercadito_core::{
    CategoryId, ExchangeRate, OrderDraft, OrderId, OrderStatus, PaymentReference, ProductId,
};
use moka::future::Cache;
use reqwest::{Method, StatusCode};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{debug, instrument};
use url::Url;

use crate::config::Config;

use super::ApiError;
use super::types::{
    AuthAck, Category, CategoryPayload, ConfirmPaymentRequest, CreatedOrder, CredentialsRequest,
    ErrorBody, Order, OrderProbe, PaymentAck, Product, ProductPayload, RateConfig,
    StatusUpdateRequest, User,
};

/// TTL of the exchange-rate cache. The rate changes at most a few times a
/// day, but an admin write must show up promptly on other instances too.
const RATE_CACHE_TTL: Duration = Duration::from_secs(60);

/// Acknowledgement of an admin status transition.
#[derive(Debug, Clone, Copy, serde::Deserialize)]
pub struct StatusAck {
    #[serde(rename = "pedido_id")]
    pub order_id: OrderId,
    #[serde(rename = "estado")]
    pub status: OrderStatus,
}

// =============================================================================
// StoreClient
// =============================================================================

/// Client for the Mercadito backend API.
///
/// Cheap to clone; holds the session cookie jar, so one instance represents
/// one logged-in (or anonymous) session. Every view that needs the exchange
/// rate goes through the same cached accessor instead of fetching its own
/// copy.
#[derive(Clone)]
pub struct StoreClient {
    inner: Arc<StoreClientInner>,
}

struct StoreClientInner {
    client: reqwest::Client,
    base_url: Url,
    rate_cache: Cache<(), ExchangeRate>,
}

impl StoreClient {
    /// Create a new backend client.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying HTTP client cannot be built.
    pub fn new(config: &Config) -> Result<Self, ApiError> {
        let client = reqwest::Client::builder()
            .cookie_store(true)
            .timeout(config.timeout)
            .build()?;

        let rate_cache = Cache::builder()
            .max_capacity(1)
            .time_to_live(RATE_CACHE_TTL)
            .build();

        Ok(Self {
            inner: Arc::new(StoreClientInner {
                client,
                base_url: config.api_url.clone(),
                rate_cache,
            }),
        })
    }

    fn endpoint(&self, path: &str) -> Result<Url, ApiError> {
        // Url::join only fails on degenerate bases; map it to a transport-ish
        // parse error rather than panicking.
        self.inner
            .base_url
            .join(path)
            .map_err(|e| ApiError::Api {
                status: StatusCode::INTERNAL_SERVER_ERROR,
                message: format!("invalid endpoint {path}: {e}"),
            })
    }

    /// Execute a request and decode the JSON response.
    ///
    /// Non-success statuses are mapped to [`ApiError::Api`] carrying the
    /// backend's `error` string verbatim, except 401 which becomes
    /// [`ApiError::Unauthorized`].
    async fn execute<T, B>(
        &self,
        method: Method,
        path: &str,
        body: Option<&B>,
    ) -> Result<T, ApiError>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        let url = self.endpoint(path)?;
        let mut request = self.inner.client.request(method, url);
        if let Some(body) = body {
            request = request.json(body);
        }

        let response = request.send().await?;
        let status = response.status();
        let text = response.text().await?;

        if !status.is_success() {
            let message = serde_json::from_str::<ErrorBody>(&text)
                .map_or_else(|_| format!("HTTP {status}"), |body| body.error);
            debug!(%status, %message, "backend rejected request");
            if status == StatusCode::UNAUTHORIZED {
                return Err(ApiError::Unauthorized(message));
            }
            return Err(ApiError::Api { status, message });
        }

        Ok(serde_json::from_str(&text)?)
    }

    async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        self.execute::<T, ()>(Method::GET, path, None).await
    }

    async fn post<T: DeserializeOwned, B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, ApiError> {
        self.execute(Method::POST, path, Some(body)).await
    }

    async fn put<T: DeserializeOwned, B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, ApiError> {
        self.execute(Method::PUT, path, Some(body)).await
    }

    async fn delete<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        self.execute::<T, ()>(Method::DELETE, path, None).await
    }

    // =========================================================================
    // Catalog
    // =========================================================================

    /// List all products.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    #[instrument(skip(self))]
    pub async fn products(&self) -> Result<Vec<Product>, ApiError> {
        self.get("/api/productos").await
    }

    /// List all categories.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    #[instrument(skip(self))]
    pub async fn categories(&self) -> Result<Vec<Category>, ApiError> {
        self.get("/api/categorias").await
    }

    // =========================================================================
    // Auth (session cookie lives in the client's jar)
    // =========================================================================

    /// Log in with email and password.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Unauthorized` on bad credentials.
    #[instrument(skip(self, password), fields(email = %email))]
    pub async fn login(&self, email: &str, password: &str) -> Result<AuthAck, ApiError> {
        self.post(
            "/api/login",
            &CredentialsRequest {
                email: email.to_owned(),
                password: password.to_owned(),
                display_name: None,
                default_address: None,
            },
        )
        .await
    }

    /// Register a new account. The backend logs the new user in.
    ///
    /// # Errors
    ///
    /// Returns an error if the email is taken or the password too short;
    /// the backend's message is surfaced verbatim.
    #[instrument(skip(self, request), fields(email = %request.email))]
    pub async fn register(&self, request: &CredentialsRequest) -> Result<AuthAck, ApiError> {
        self.post("/api/register", request).await
    }

    /// End the current session.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    #[instrument(skip(self))]
    pub async fn logout(&self) -> Result<(), ApiError> {
        let _: serde_json::Value = self.post("/api/logout", &()).await?;
        Ok(())
    }

    /// The currently authenticated user, if any.
    ///
    /// A 401 means "anonymous", not an error.
    ///
    /// # Errors
    ///
    /// Returns an error on transport or server failure.
    #[instrument(skip(self))]
    pub async fn current_user(&self) -> Result<Option<User>, ApiError> {
        match self.get::<User>("/api/usuario/actual").await {
            Ok(user) => Ok(Some(user)),
            Err(ApiError::Unauthorized(_)) => Ok(None),
            Err(e) => Err(e),
        }
    }

    // =========================================================================
    // Orders
    // =========================================================================

    /// Submit an order draft (`POST /api/pedido`).
    ///
    /// The backend validates stock and decrements it atomically; nothing is
    /// mutated client-side until this returns.
    ///
    /// # Errors
    ///
    /// Returns an error with the backend's message (insufficient stock,
    /// unknown product, missing address...) on rejection.
    #[instrument(skip(self, draft), fields(lines = draft.items.len(), total = %draft.total))]
    pub async fn create_order(&self, draft: &OrderDraft) -> Result<CreatedOrder, ApiError> {
        self.post("/api/pedido", draft).await
    }

    /// Lightweight status probe for one order.
    ///
    /// # Errors
    ///
    /// Returns an error if the order does not exist.
    #[instrument(skip(self), fields(order_id = %order_id))]
    pub async fn order_status(&self, order_id: OrderId) -> Result<OrderProbe, ApiError> {
        self.get(&format!("/api/pedido/{order_id}")).await
    }

    /// The authenticated user's orders, newest first.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Unauthorized` when not logged in.
    #[instrument(skip(self))]
    pub async fn my_orders(&self) -> Result<Vec<Order>, ApiError> {
        self.get("/api/pedidos/mis-pedidos").await
    }

    /// Submit a payment reference for an order.
    ///
    /// The reference has already been validated locally; the backend
    /// re-validates, stores it, and moves the order to payment review.
    ///
    /// # Errors
    ///
    /// Returns an error if the order does not exist or the backend rejects
    /// the reference.
    #[instrument(skip(self), fields(order_id = %order_id))]
    pub async fn confirm_payment(
        &self,
        order_id: OrderId,
        reference: &PaymentReference,
    ) -> Result<PaymentAck, ApiError> {
        self.post(
            "/api/confirmar_pago",
            &ConfirmPaymentRequest {
                order_id,
                reference: reference.clone(),
            },
        )
        .await
    }

    // =========================================================================
    // Admin: orders
    // =========================================================================

    /// All orders in the store, newest first (admin only).
    ///
    /// # Errors
    ///
    /// Returns an error when the session lacks admin rights.
    #[instrument(skip(self))]
    pub async fn all_orders(&self) -> Result<Vec<Order>, ApiError> {
        self.get("/api/pedidos").await
    }

    /// Request an order status transition (admin only).
    ///
    /// # Errors
    ///
    /// Returns an error if the backend refuses the transition or the
    /// rejection reason is missing.
    #[instrument(skip(self, request), fields(order_id = %request.order_id, new_status = %request.new_status))]
    pub async fn update_order_status(
        &self,
        request: &StatusUpdateRequest,
    ) -> Result<StatusAck, ApiError> {
        self.post("/api/pedido/actualizar_estado", request).await
    }

    // =========================================================================
    // Admin: products & categories
    // =========================================================================

    /// Create a product (admin only).
    ///
    /// # Errors
    ///
    /// Returns an error if validation fails server-side.
    #[instrument(skip(self, payload), fields(name = %payload.name))]
    pub async fn create_product(&self, payload: &ProductPayload) -> Result<Product, ApiError> {
        self.post("/api/productos", payload).await
    }

    /// Update a product (admin only).
    ///
    /// # Errors
    ///
    /// Returns an error if the product does not exist or validation fails.
    #[instrument(skip(self, payload), fields(product_id = %product_id))]
    pub async fn update_product(
        &self,
        product_id: ProductId,
        payload: &ProductPayload,
    ) -> Result<Product, ApiError> {
        self.put(&format!("/api/productos/{product_id}"), payload)
            .await
    }

    /// Delete a product (admin only).
    ///
    /// # Errors
    ///
    /// Returns an error if the product does not exist.
    #[instrument(skip(self), fields(product_id = %product_id))]
    pub async fn delete_product(&self, product_id: ProductId) -> Result<(), ApiError> {
        let _: serde_json::Value = self.delete(&format!("/api/productos/{product_id}")).await?;
        Ok(())
    }

    /// Create a category (admin only).
    ///
    /// # Errors
    ///
    /// Returns an error if the name is blank or already taken.
    #[instrument(skip(self, payload), fields(name = %payload.name))]
    pub async fn create_category(&self, payload: &CategoryPayload) -> Result<Category, ApiError> {
        self.post("/api/categorias", payload).await
    }

    /// Rename a category (admin only).
    ///
    /// # Errors
    ///
    /// Returns an error if the category does not exist or the name clashes.
    #[instrument(skip(self, payload), fields(category_id = %category_id))]
    pub async fn update_category(
        &self,
        category_id: CategoryId,
        payload: &CategoryPayload,
    ) -> Result<Category, ApiError> {
        self.put(&format!("/api/categorias/{category_id}"), payload)
            .await
    }

    /// Delete a category (admin only).
    ///
    /// Products referencing it are re-parented to "Sin Categoría" by the
    /// backend, never deleted.
    ///
    /// # Errors
    ///
    /// Returns an error if the category does not exist.
    #[instrument(skip(self), fields(category_id = %category_id))]
    pub async fn delete_category(&self, category_id: CategoryId) -> Result<(), ApiError> {
        let _: serde_json::Value = self
            .delete(&format!("/api/categorias/{category_id}"))
            .await?;
        Ok(())
    }

    // =========================================================================
    // Exchange rate (cached)
    // =========================================================================

    /// The current USD → Bs exchange rate.
    ///
    /// Served from the in-process cache when fresh; one fetch feeds every
    /// view instead of each fetching its own copy.
    ///
    /// # Errors
    ///
    /// Returns an error if the cache is cold and the fetch fails.
    #[instrument(skip(self))]
    pub async fn exchange_rate(&self) -> Result<ExchangeRate, ApiError> {
        if let Some(rate) = self.inner.rate_cache.get(&()).await {
            debug!("exchange rate cache hit");
            return Ok(rate);
        }

        let config: RateConfig = self.get("/api/configuracion/tasa").await?;
        self.inner.rate_cache.insert((), config.rate).await;
        Ok(config.rate)
    }

    /// Update the exchange rate (admin only) and invalidate the cache.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend rejects the value.
    #[instrument(skip(self), fields(rate = %rate))]
    pub async fn set_exchange_rate(&self, rate: ExchangeRate) -> Result<ExchangeRate, ApiError> {
        let config: RateConfig = self
            .put("/api/configuracion/tasa", &RateConfig { rate })
            .await?;
        // Write-through: the next read must see the new value immediately.
        self.inner.rate_cache.invalidate(&()).await;
        self.inner.rate_cache.insert((), config.rate).await;
        Ok(config.rate)
    }

    /// Drop the cached exchange rate (used after external writes).
    pub async fn invalidate_exchange_rate(&self) {
        self.inner.rate_cache.invalidate(&()).await;
    }
}

/// Format a backend timestamp for terminal display.
#[must_use]
pub fn format_timestamp(ts: Option<NaiveDateTime>) -> String {
    ts.map_or_else(
        || "-".to_owned(),
        |t| t.format("%Y-%m-%d %H:%M").to_string(),
    )
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn test_client() -> StoreClient {
        let config = Config::with_api_url("http://localhost:5000").unwrap();
        StoreClient::new(&config).unwrap()
    }

    #[test]
    fn endpoints_join_against_the_base_url() {
        let client = test_client();
        assert_eq!(
            client.endpoint("/api/productos").unwrap().as_str(),
            "http://localhost:5000/api/productos"
        );
        assert_eq!(
            client
                .endpoint(&format!("/api/pedido/{}", OrderId::new(7)))
                .unwrap()
                .as_str(),
            "http://localhost:5000/api/pedido/7"
        );
    }

    #[test]
    fn timestamps_format_for_display() {
        assert_eq!(format_timestamp(None), "-");
        let ts: NaiveDateTime = "2024-05-01T12:34:56.789012".parse().unwrap();
        assert_eq!(format_timestamp(Some(ts)), "2024-05-01 12:34");
    }
}
