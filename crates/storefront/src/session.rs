//! The interactive storefront session.
//!
//! [`Session`] owns everything one shopper interaction needs: the backend
//! client (and with it the session cookie), the in-memory cart, the cached
//! catalog, and the current [`Screen`]. Flows are sequential: each method
//! awaits the backend's answer before touching local state, so a failed
//! call leaves the session exactly as it was.

use mercadito_core::{
    Cart, CheckoutError, OrderId, OrderStatus, PaymentReference, ProductId, ReferenceError,
};
use rust_decimal::Decimal;
use thiserror::Error;
use tracing::{info, instrument, warn};

use crate::backend::types::{Category, CreatedOrder, CredentialsRequest, Order, Product, User};
use crate::backend::{ApiError, StoreClient};
use crate::catalog::CatalogFilter;

/// What the storefront is currently showing.
///
/// Exactly one screen is active at a time; transitions happen only through
/// [`Session`] methods.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Screen {
    /// Product grid with search and category filter.
    #[default]
    Catalog,
    /// Post-checkout screen: shows the order id, the amount due, and the
    /// payment-reference prompt.
    Confirmation { order_id: OrderId, total: Decimal },
    /// The shopper's past orders.
    History,
}

/// Errors surfaced by session flows.
#[derive(Debug, Error)]
pub enum FlowError {
    #[error(transparent)]
    Api(#[from] ApiError),

    #[error(transparent)]
    Checkout(#[from] CheckoutError),

    #[error(transparent)]
    Reference(#[from] ReferenceError),

    #[error("debes iniciar sesión para continuar")]
    NotLoggedIn,

    #[error("no hay stock suficiente de \"{name}\"")]
    OutOfStock { name: String },

    #[error("producto desconocido: {0}")]
    UnknownProduct(ProductId),

    #[error("el pedido {order_id} está \"{status}\" y no acepta referencias de pago")]
    PaymentNotAccepted {
        order_id: OrderId,
        status: OrderStatus,
    },
}

// =============================================================================
// Session
// =============================================================================

/// One shopper's interaction with the store, logged in or anonymous.
pub struct Session {
    client: StoreClient,
    cart: Cart,
    user: Option<User>,
    screen: Screen,
    products: Vec<Product>,
    categories: Vec<Category>,
    filter: CatalogFilter,
}

impl Session {
    /// Start a fresh anonymous session on the catalog screen.
    #[must_use]
    pub fn new(client: StoreClient) -> Self {
        Self {
            client,
            cart: Cart::new(),
            user: None,
            screen: Screen::default(),
            products: Vec::new(),
            categories: Vec::new(),
            filter: CatalogFilter::default(),
        }
    }

    /// The backend client (shares this session's cookie jar).
    #[must_use]
    pub const fn client(&self) -> &StoreClient {
        &self.client
    }

    #[must_use]
    pub const fn cart(&self) -> &Cart {
        &self.cart
    }

    #[must_use]
    pub const fn screen(&self) -> Screen {
        self.screen
    }

    #[must_use]
    pub const fn user(&self) -> Option<&User> {
        self.user.as_ref()
    }

    #[must_use]
    pub fn is_logged_in(&self) -> bool {
        self.user.is_some()
    }

    #[must_use]
    pub fn categories(&self) -> &[Category] {
        &self.categories
    }

    /// The catalog filter, mutable so the UI can edit it in place.
    pub const fn filter_mut(&mut self) -> &mut CatalogFilter {
        &mut self.filter
    }

    /// Products passing the current filter, in backend order.
    #[must_use]
    pub fn visible_products(&self) -> Vec<&Product> {
        self.filter.apply(&self.products)
    }

    fn product(&self, id: ProductId) -> Result<&Product, FlowError> {
        self.products
            .iter()
            .find(|p| p.id == id)
            .ok_or(FlowError::UnknownProduct(id))
    }

    // =========================================================================
    // Catalog
    // =========================================================================

    /// Fetch products and categories from the backend.
    ///
    /// # Errors
    ///
    /// Returns an error if either fetch fails; the previously cached
    /// catalog is kept in that case.
    #[instrument(skip(self))]
    pub async fn refresh_catalog(&mut self) -> Result<(), FlowError> {
        let products = self.client.products().await?;
        let categories = self.client.categories().await?;
        self.products = products;
        self.categories = categories;
        Ok(())
    }

    /// Add one unit of a product to the cart, gated by known stock.
    ///
    /// The backend re-validates at checkout; this only stops the obvious
    /// case of adding more units than the catalog says exist.
    ///
    /// # Errors
    ///
    /// Returns [`FlowError::UnknownProduct`] or [`FlowError::OutOfStock`].
    pub fn add_to_cart(&mut self, id: ProductId) -> Result<(), FlowError> {
        let product = self.product(id)?;
        if self.cart.quantity_of(id) >= product.stock {
            return Err(FlowError::OutOfStock {
                name: product.name.clone(),
            });
        }
        let snapshot = product.snapshot();
        self.cart.add(snapshot);
        Ok(())
    }

    /// Overwrite a cart line's quantity, gated by known stock.
    ///
    /// # Errors
    ///
    /// Returns [`FlowError::OutOfStock`] when the quantity exceeds stock.
    pub fn set_cart_quantity(&mut self, id: ProductId, quantity: u32) -> Result<(), FlowError> {
        if quantity > 0 {
            let product = self.product(id)?;
            if quantity > product.stock {
                return Err(FlowError::OutOfStock {
                    name: product.name.clone(),
                });
            }
        }
        self.cart.set_quantity(id, quantity);
        Ok(())
    }

    pub fn remove_from_cart(&mut self, id: ProductId) {
        self.cart.remove(id);
    }

    // =========================================================================
    // Auth
    // =========================================================================

    /// Log in and load the user's profile.
    ///
    /// # Errors
    ///
    /// Returns the backend's message on bad credentials.
    #[instrument(skip(self, password), fields(email = %email))]
    pub async fn login(&mut self, email: &str, password: &str) -> Result<&User, FlowError> {
        self.client.login(email, password).await?;
        let user = self
            .client
            .current_user()
            .await?
            .ok_or(FlowError::NotLoggedIn)?;
        info!(user_id = %user.id, "logged in");
        Ok(self.user.insert(user))
    }

    /// Register a new account; the backend logs the new user in.
    ///
    /// # Errors
    ///
    /// Returns the backend's message when the email is taken or the
    /// password is too short.
    #[instrument(skip(self, request), fields(email = %request.email))]
    pub async fn register(&mut self, request: &CredentialsRequest) -> Result<&User, FlowError> {
        self.client.register(request).await?;
        let user = self
            .client
            .current_user()
            .await?
            .ok_or(FlowError::NotLoggedIn)?;
        info!(user_id = %user.id, "registered");
        Ok(self.user.insert(user))
    }

    /// Adopt an already-authenticated backend session, if one exists.
    ///
    /// # Errors
    ///
    /// Returns an error on transport failure; an anonymous session is not
    /// an error.
    pub async fn restore(&mut self) -> Result<Option<&User>, FlowError> {
        self.user = self.client.current_user().await?;
        Ok(self.user.as_ref())
    }

    /// End the session: tell the backend, then drop cart and user locally.
    ///
    /// # Errors
    ///
    /// Returns an error if the logout request fails; local state is kept so
    /// the caller can retry.
    #[instrument(skip(self))]
    pub async fn logout(&mut self) -> Result<(), FlowError> {
        self.client.logout().await?;
        self.end_locally();
        Ok(())
    }

    fn end_locally(&mut self) {
        self.user = None;
        self.cart.clear();
        self.screen = Screen::Catalog;
    }

    // =========================================================================
    // Checkout and payment
    // =========================================================================

    /// Submit the cart as an order.
    ///
    /// On success the cart is cleared and the session moves to the
    /// confirmation screen; on any failure nothing local changes.
    ///
    /// # Errors
    ///
    /// Returns [`FlowError::NotLoggedIn`], a [`CheckoutError`] for local
    /// precondition failures, or the backend's message (insufficient stock,
    /// unknown product) on rejection.
    #[instrument(skip(self, delivery_address))]
    pub async fn submit_order(
        &mut self,
        delivery_address: &str,
    ) -> Result<CreatedOrder, FlowError> {
        if !self.is_logged_in() {
            return Err(FlowError::NotLoggedIn);
        }
        let draft = self.cart.checkout(delivery_address)?;
        let created = self.client.create_order(&draft).await?;

        info!(order_id = %created.id, total = %created.total, "order placed");
        self.cart.clear();
        self.screen = Screen::Confirmation {
            order_id: created.id,
            total: created.total,
        };
        Ok(created)
    }

    /// Submit a payment reference for an order and report its new status.
    ///
    /// The reference is validated locally, the order's current status is
    /// checked to still accept references, and after the backend stores the
    /// reference the status is re-fetched. If that re-fetch fails the
    /// submission still happened, so the acknowledged status is returned.
    ///
    /// # Errors
    ///
    /// Returns [`FlowError::Reference`] for a malformed reference,
    /// [`FlowError::PaymentNotAccepted`] for an order past review, or the
    /// backend's message.
    #[instrument(skip(self, reference), fields(order_id = %order_id))]
    pub async fn confirm_payment(
        &mut self,
        order_id: OrderId,
        reference: &str,
    ) -> Result<OrderStatus, FlowError> {
        let reference = PaymentReference::parse(reference)?;

        let probe = self.client.order_status(order_id).await?;
        if !probe.status.accepts_payment_reference() {
            return Err(FlowError::PaymentNotAccepted {
                order_id,
                status: probe.status,
            });
        }

        let ack = self.client.confirm_payment(order_id, &reference).await?;

        // The submission is already committed server-side; a failed
        // re-fetch must not make it look like it wasn't.
        let status = match self.client.order_status(order_id).await {
            Ok(probe) => probe.status,
            Err(e) => {
                warn!(order_id = %order_id, error = %e, "status re-fetch failed, using acknowledged status");
                ack.status
            }
        };

        info!(order_id = %order_id, %status, "payment reference submitted");
        self.screen = Screen::History;
        Ok(status)
    }

    // =========================================================================
    // History and navigation
    // =========================================================================

    /// Fetch the shopper's orders and move to the history screen.
    ///
    /// # Errors
    ///
    /// Returns [`FlowError::NotLoggedIn`] for anonymous sessions.
    #[instrument(skip(self))]
    pub async fn load_history(&mut self) -> Result<Vec<Order>, FlowError> {
        match self.client.my_orders().await {
            Ok(orders) => {
                self.screen = Screen::History;
                Ok(orders)
            }
            Err(e) if e.is_unauthorized() => Err(FlowError::NotLoggedIn),
            Err(e) => Err(e.into()),
        }
    }

    /// Go back to the catalog screen.
    pub fn show_catalog(&mut self) {
        self.screen = Screen::Catalog;
    }
}
