//! Mercadito CLI - terminal storefront and admin console.
//!
//! # Usage
//!
//! ```bash
//! # Open the interactive storefront shell
//! mercadito shop
//!
//! # List every order in the store
//! mercadito admin orders list
//!
//! # Move an order through its lifecycle
//! mercadito admin orders ship 12
//! mercadito admin orders deliver 12
//! mercadito admin orders reject 12 --reason "Referencia no encontrada"
//!
//! # Manage the catalog
//! mercadito admin products add -n "Leche Entera 1L" -p 2.50 -s 50 -c 1
//! mercadito admin categories add "Lácteos"
//!
//! # Read or update the USD → Bs exchange rate
//! mercadito admin rate get
//! mercadito admin rate set 36.50
//! ```
//!
//! # Environment Variables
//!
//! - `MERCADITO_API_URL` - Backend base URL (default `http://localhost:5000`)
//! - `MERCADITO_ADMIN_EMAIL` / `MERCADITO_ADMIN_PASSWORD` - Admin credentials
//!   for the `admin` subcommands

#![cfg_attr(not(test), forbid(unsafe_code))]
#![allow(clippy::print_stdout)]

use clap::{Parser, Subcommand};
use mercadito_core::{CategoryId, OrderId, OrderStatus, ProductId};
use rust_decimal::Decimal;

mod commands;

#[derive(Parser)]
#[command(name = "mercadito")]
#[command(author, version, about = "Mercadito terminal storefront and admin console")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Open the interactive storefront shell
    Shop,
    /// Back-office operations (requires admin credentials in the environment)
    Admin {
        #[command(subcommand)]
        action: AdminAction,
    },
}

#[derive(Subcommand)]
enum AdminAction {
    /// Review and transition orders
    Orders {
        #[command(subcommand)]
        action: OrderAction,
    },
    /// Manage the product catalog
    Products {
        #[command(subcommand)]
        action: ProductAction,
    },
    /// Manage categories
    Categories {
        #[command(subcommand)]
        action: CategoryAction,
    },
    /// Read or update the USD → Bs exchange rate
    Rate {
        #[command(subcommand)]
        action: RateAction,
    },
}

#[derive(Subcommand)]
enum OrderAction {
    /// List every order, newest first
    List,
    /// Mark an order under review as payment-verified and shipped
    Ship { order_id: OrderId },
    /// Mark a shipped order as delivered
    Deliver { order_id: OrderId },
    /// Reject an order's payment, with a reason the shopper will see
    Reject {
        order_id: OrderId,
        /// Why the payment was rejected
        #[arg(short, long)]
        reason: String,
    },
}

#[derive(Subcommand)]
enum ProductAction {
    /// List the catalog
    List,
    /// Create a product
    Add {
        /// Product name
        #[arg(short, long)]
        name: String,
        /// Unit price in USD
        #[arg(short, long)]
        price: Decimal,
        /// Units in stock
        #[arg(short, long, default_value_t = 0)]
        stock: u32,
        /// Image URL
        #[arg(short, long)]
        image_url: Option<String>,
        /// Category id
        #[arg(short, long)]
        category: Option<CategoryId>,
    },
    /// Update a product (all fields are overwritten)
    Update {
        product_id: ProductId,
        #[arg(short, long)]
        name: String,
        #[arg(short, long)]
        price: Decimal,
        #[arg(short, long, default_value_t = 0)]
        stock: u32,
        #[arg(short, long)]
        image_url: Option<String>,
        /// Category id; omit to leave the product uncategorized
        #[arg(short, long)]
        category: Option<CategoryId>,
    },
    /// Delete a product
    Delete { product_id: ProductId },
}

#[derive(Subcommand)]
enum CategoryAction {
    /// List categories
    List,
    /// Create a category
    Add { name: String },
    /// Rename a category
    Rename { category_id: CategoryId, name: String },
    /// Delete a category (its products become uncategorized)
    Delete { category_id: CategoryId },
}

#[derive(Subcommand)]
enum RateAction {
    /// Show the current rate
    Get,
    /// Set a new rate (Bs per USD)
    Set { value: Decimal },
}

#[tokio::main]
async fn main() {
    // Default to our own info logs; RUST_LOG overrides
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "mercadito=info,warn".into()),
        )
        .init();

    let cli = Cli::parse();

    let result: Result<(), Box<dyn std::error::Error>> = run(cli).await;

    if let Err(e) = result {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    match cli.command {
        Commands::Shop => commands::shop::run().await?,
        Commands::Admin { action } => {
            let console = commands::admin::Console::connect().await?;
            match action {
                AdminAction::Orders { action } => match action {
                    OrderAction::List => console.list_orders().await?,
                    OrderAction::Ship { order_id } => {
                        console.transition(order_id, OrderStatus::Shipped, None).await?;
                    }
                    OrderAction::Deliver { order_id } => {
                        console
                            .transition(order_id, OrderStatus::Delivered, None)
                            .await?;
                    }
                    OrderAction::Reject { order_id, reason } => {
                        console
                            .transition(order_id, OrderStatus::Rejected, Some(reason.as_str()))
                            .await?;
                    }
                },
                AdminAction::Products { action } => match action {
                    ProductAction::List => console.list_products().await?,
                    ProductAction::Add {
                        name,
                        price,
                        stock,
                        image_url,
                        category,
                    } => {
                        console
                            .create_product(name, price, stock, image_url, category)
                            .await?;
                    }
                    ProductAction::Update {
                        product_id,
                        name,
                        price,
                        stock,
                        image_url,
                        category,
                    } => {
                        console
                            .update_product(product_id, name, price, stock, image_url, category)
                            .await?;
                    }
                    ProductAction::Delete { product_id } => {
                        console.delete_product(product_id).await?;
                    }
                },
                AdminAction::Categories { action } => match action {
                    CategoryAction::List => console.list_categories().await?,
                    CategoryAction::Add { name } => console.create_category(&name).await?,
                    CategoryAction::Rename { category_id, name } => {
                        console.rename_category(category_id, &name).await?;
                    }
                    CategoryAction::Delete { category_id } => {
                        console.delete_category(category_id).await?;
                    }
                },
                AdminAction::Rate { action } => match action {
                    RateAction::Get => console.show_rate().await?,
                    RateAction::Set { value } => console.set_rate(value).await?,
                },
            }
        }
    }
    Ok(())
}
