//! Admin console commands.
//!
//! Every subcommand logs in with the credentials from the environment,
//! performs its operation, and prints the resulting state, so the operator
//! always sees the store as the backend now has it.
//!
//! # Environment Variables
//!
//! - `MERCADITO_ADMIN_EMAIL` - Admin account email
//! - `MERCADITO_ADMIN_PASSWORD` - Admin account password

use mercadito_core::{CategoryId, ExchangeRate, OrderId, OrderStatus, ProductId, RateError};
use mercadito_storefront::admin::{FormError, ProductForm, category_payload, transition_request};
use mercadito_storefront::backend::format_timestamp;
use mercadito_storefront::{ApiError, Config, ConfigError, StoreClient};
use rust_decimal::Decimal;
use secrecy::{ExposeSecret, SecretString};
use thiserror::Error;
use tracing::info;

/// Errors that can occur in the admin console.
#[derive(Debug, Error)]
pub enum AdminError {
    /// Required environment variable is missing.
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(&'static str),

    /// The logged-in account is not an administrator.
    #[error("La cuenta {0} no tiene permisos de administrador")]
    NotAdmin(String),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Api(#[from] ApiError),

    #[error(transparent)]
    Form(#[from] FormError),

    #[error(transparent)]
    Rate(#[from] RateError),

    /// The order to transition does not exist.
    #[error("Pedido no encontrado: {0}")]
    UnknownOrder(OrderId),
}

/// An authenticated admin session against the backend.
pub struct Console {
    client: StoreClient,
}

impl Console {
    /// Log in with the credentials from the environment and verify the
    /// account is an administrator.
    ///
    /// # Errors
    ///
    /// Returns an error when credentials are missing or wrong, or when the
    /// account lacks admin rights.
    pub async fn connect() -> Result<Self, AdminError> {
        dotenvy::dotenv().ok();

        let email = std::env::var("MERCADITO_ADMIN_EMAIL")
            .map_err(|_| AdminError::MissingEnvVar("MERCADITO_ADMIN_EMAIL"))?;
        let password: SecretString = std::env::var("MERCADITO_ADMIN_PASSWORD")
            .map_err(|_| AdminError::MissingEnvVar("MERCADITO_ADMIN_PASSWORD"))?
            .into();

        let config = Config::from_env()?;
        let client = StoreClient::new(&config)?;
        client.login(&email, password.expose_secret()).await?;

        let is_admin = client
            .current_user()
            .await?
            .is_some_and(|user| user.is_admin);
        if !is_admin {
            return Err(AdminError::NotAdmin(email));
        }

        info!(%email, "admin session established");
        Ok(Self { client })
    }

    // =========================================================================
    // Orders
    // =========================================================================

    /// Print every order in the store, newest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the listing fails.
    pub async fn list_orders(&self) -> Result<(), AdminError> {
        let orders = self.client.all_orders().await?;

        println!(
            "{:>5}  {:<20} {:>10}  {:<14} {:<10} {:<16}  {}",
            "ID", "Cliente", "Total $", "Estado", "Ref.", "Creado", "Dirección"
        );
        for order in &orders {
            println!(
                "{:>5}  {:<20} {:>10}  {:<14} {:<10} {:<16}  {}",
                order.id,
                order.customer_name.as_deref().unwrap_or("-"),
                order.total,
                order.status,
                order
                    .payment_reference
                    .as_ref()
                    .map_or("-", |r| r.as_str()),
                format_timestamp(order.created_at),
                order.delivery_address.as_deref().unwrap_or("-"),
            );
            if let Some(reason) = &order.rejection_reason {
                println!("       motivo de rechazo: {reason}");
            }
        }
        println!("{} pedidos", orders.len());
        Ok(())
    }

    /// Transition one order, validating against its current status first.
    ///
    /// # Errors
    ///
    /// Returns an error for unknown orders, forbidden transitions, or a
    /// missing rejection reason.
    pub async fn transition(
        &self,
        order_id: OrderId,
        new_status: OrderStatus,
        reason: Option<&str>,
    ) -> Result<(), AdminError> {
        let orders = self.client.all_orders().await?;
        let current = orders
            .iter()
            .find(|o| o.id == order_id)
            .ok_or(AdminError::UnknownOrder(order_id))?
            .status;

        let request = transition_request(order_id, current, new_status, reason)?;
        let ack = self.client.update_order_status(&request).await?;

        info!(order_id = %ack.order_id, from = %current, to = %ack.status, "order transitioned");
        println!("Pedido {} → {}", ack.order_id, ack.status);
        self.list_orders().await
    }

    // =========================================================================
    // Products
    // =========================================================================

    /// Print the catalog with both USD and Bs prices.
    ///
    /// # Errors
    ///
    /// Returns an error if a fetch fails.
    pub async fn list_products(&self) -> Result<(), AdminError> {
        let products = self.client.products().await?;
        let rate = self.client.exchange_rate().await?;

        println!(
            "{:>5}  {:<30} {:>9} {:>12} {:>6}  {}",
            "ID", "Nombre", "USD", "Bs", "Stock", "Categoría"
        );
        for product in &products {
            println!(
                "{:>5}  {:<30} {:>9} {:>12.2} {:>6}  {}",
                product.id,
                product.name,
                product.price,
                rate.convert(product.price),
                product.stock,
                mercadito_storefront::catalog::category_label(product),
            );
        }
        println!("{} productos (tasa: {} Bs/$)", products.len(), rate);
        Ok(())
    }

    /// Create a product and print it.
    ///
    /// # Errors
    ///
    /// Returns an error when the form is invalid or the backend refuses.
    pub async fn create_product(
        &self,
        name: String,
        price: Decimal,
        stock: u32,
        image_url: Option<String>,
        category_id: Option<CategoryId>,
    ) -> Result<(), AdminError> {
        let payload = ProductForm {
            name,
            price,
            stock,
            image_url,
            category_id,
        }
        .validate()?;

        let product = self.client.create_product(&payload).await?;
        info!(product_id = %product.id, name = %product.name, "product created");
        println!("Producto {} creado: {}", product.id, product.name);
        self.list_products().await
    }

    /// Overwrite a product and print it.
    ///
    /// # Errors
    ///
    /// Returns an error when the form is invalid, the product does not
    /// exist, or the backend refuses.
    pub async fn update_product(
        &self,
        product_id: ProductId,
        name: String,
        price: Decimal,
        stock: u32,
        image_url: Option<String>,
        category_id: Option<CategoryId>,
    ) -> Result<(), AdminError> {
        let payload = ProductForm {
            name,
            price,
            stock,
            image_url,
            category_id,
        }
        .validate()?;

        let product = self.client.update_product(product_id, &payload).await?;
        info!(product_id = %product.id, "product updated");
        println!("Producto {} actualizado: {}", product.id, product.name);
        self.list_products().await
    }

    /// Delete a product.
    ///
    /// # Errors
    ///
    /// Returns an error if the product does not exist.
    pub async fn delete_product(&self, product_id: ProductId) -> Result<(), AdminError> {
        self.client.delete_product(product_id).await?;
        info!(%product_id, "product deleted");
        println!("Producto {product_id} eliminado");
        self.list_products().await
    }

    // =========================================================================
    // Categories
    // =========================================================================

    /// Print every category.
    ///
    /// # Errors
    ///
    /// Returns an error if the listing fails.
    pub async fn list_categories(&self) -> Result<(), AdminError> {
        let categories = self.client.categories().await?;
        for category in &categories {
            println!("{:>5}  {}", category.id, category.name);
        }
        println!("{} categorías", categories.len());
        Ok(())
    }

    /// Create a category.
    ///
    /// # Errors
    ///
    /// Returns an error for a blank or duplicate name.
    pub async fn create_category(&self, name: &str) -> Result<(), AdminError> {
        let category = self.client.create_category(&category_payload(name)?).await?;
        info!(category_id = %category.id, "category created");
        println!("Categoría {} creada: {}", category.id, category.name);
        self.list_categories().await
    }

    /// Rename a category.
    ///
    /// # Errors
    ///
    /// Returns an error for a blank name or unknown category.
    pub async fn rename_category(
        &self,
        category_id: CategoryId,
        name: &str,
    ) -> Result<(), AdminError> {
        let category = self
            .client
            .update_category(category_id, &category_payload(name)?)
            .await?;
        println!("Categoría {} renombrada: {}", category.id, category.name);
        self.list_categories().await
    }

    /// Delete a category; its products become uncategorized server-side.
    ///
    /// # Errors
    ///
    /// Returns an error if the category does not exist.
    pub async fn delete_category(&self, category_id: CategoryId) -> Result<(), AdminError> {
        self.client.delete_category(category_id).await?;
        info!(%category_id, "category deleted");
        println!("Categoría {category_id} eliminada; sus productos quedan sin categoría");
        self.list_categories().await
    }

    // =========================================================================
    // Exchange rate
    // =========================================================================

    /// Print the current USD → Bs rate.
    ///
    /// # Errors
    ///
    /// Returns an error if the fetch fails.
    pub async fn show_rate(&self) -> Result<(), AdminError> {
        let rate = self.client.exchange_rate().await?;
        println!("Tasa BCV: {rate} Bs/$");
        Ok(())
    }

    /// Update the rate; the client cache is refreshed immediately.
    ///
    /// # Errors
    ///
    /// Returns an error for a non-positive value or backend rejection.
    pub async fn set_rate(&self, value: Decimal) -> Result<(), AdminError> {
        let rate = ExchangeRate::new(value)?;
        let stored = self.client.set_exchange_rate(rate).await?;
        info!(rate = %stored, "exchange rate updated");
        println!("Tasa BCV actualizada: {stored} Bs/$");
        Ok(())
    }
}
