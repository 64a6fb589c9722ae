//! Integration tests for the shopper-facing flows.
//!
//! These tests require:
//! - A running Mercadito backend (`MERCADITO_API_URL`, default
//!   `http://localhost:5000`)
//! - At least one product with stock in the catalog
//!
//! Run with: cargo test -p mercadito-integration-tests -- --ignored

use mercadito_core::OrderStatus;
use mercadito_integration_tests::{anonymous_client, registered_shopper, unique_email};
use mercadito_storefront::backend::types::CredentialsRequest;
use mercadito_storefront::{ApiError, Session, StoreClient};

/// Pick a product with stock or skip the test.
async fn stocked_product_id(client: &StoreClient) -> mercadito_core::ProductId {
    client
        .products()
        .await
        .expect("failed to list products")
        .into_iter()
        .find(|p| p.in_stock())
        .expect("catalog has no product with stock; seed one first")
        .id
}

// ============================================================================
// Catalog & configuration
// ============================================================================

#[tokio::test]
#[ignore = "Requires running backend"]
async fn catalog_and_rate_are_public() {
    let client = anonymous_client();

    let products = client.products().await.expect("failed to list products");
    let categories = client.categories().await.expect("failed to list categories");
    let rate = client.exchange_rate().await.expect("failed to read rate");

    assert!(!products.is_empty(), "seeded catalog expected");
    assert!(rate.value() > rust_decimal::Decimal::ZERO);
    // Every product's category id, when present, refers to a listed category
    for product in &products {
        if let Some(id) = product.category_id {
            assert!(categories.iter().any(|c| c.id == id));
        }
    }
}

// ============================================================================
// Auth
// ============================================================================

#[tokio::test]
#[ignore = "Requires running backend"]
async fn register_login_logout_roundtrip() {
    let client = anonymous_client();
    let email = unique_email("auth");

    client
        .register(&CredentialsRequest {
            email: email.clone(),
            password: "secreta123".to_owned(),
            display_name: Some("Ana".to_owned()),
            default_address: None,
        })
        .await
        .expect("registration failed");

    // Registration logs the user in
    let user = client
        .current_user()
        .await
        .expect("current_user failed")
        .expect("expected a session after register");
    assert_eq!(user.email, email);
    assert!(!user.is_admin);

    client.logout().await.expect("logout failed");
    assert!(
        client
            .current_user()
            .await
            .expect("current_user failed")
            .is_none()
    );

    // And back in with the same credentials
    client
        .login(&email, "secreta123")
        .await
        .expect("login failed");
}

#[tokio::test]
#[ignore = "Requires running backend"]
async fn duplicate_registration_is_rejected() {
    let (_, user) = registered_shopper("dup").await;

    let err = anonymous_client()
        .register(&CredentialsRequest {
            email: user.email,
            password: "secreta123".to_owned(),
            display_name: None,
            default_address: None,
        })
        .await
        .expect_err("second registration should fail");
    assert!(matches!(err, ApiError::Api { .. }));
}

// ============================================================================
// Order lifecycle (shopper side)
// ============================================================================

#[tokio::test]
#[ignore = "Requires running backend"]
async fn anonymous_checkout_is_refused() {
    let client = anonymous_client();
    let product_id = stocked_product_id(&client).await;

    let mut session = Session::new(client);
    session.refresh_catalog().await.expect("catalog fetch failed");
    session.add_to_cart(product_id).expect("add failed");

    let err = session
        .submit_order("Calle Falsa 123")
        .await
        .expect_err("anonymous order should be refused");
    // Refused locally, before the cart is touched
    assert_eq!(session.cart().len(), 1);
    assert!(err.to_string().contains("iniciar sesión"));
}

#[tokio::test]
#[ignore = "Requires running backend"]
async fn order_submission_and_payment_confirmation() {
    let (client, _user) = registered_shopper("flow").await;
    let product_id = stocked_product_id(&client).await;

    let mut session = Session::new(client);
    session.refresh_catalog().await.expect("catalog fetch failed");
    session.restore().await.expect("restore failed");
    session.add_to_cart(product_id).expect("add failed");

    let created = session
        .submit_order("Calle 5 con Av. 3, casa 10")
        .await
        .expect("order submission failed");
    assert_eq!(created.status, OrderStatus::Pending);
    assert!(session.cart().is_empty(), "cart clears on success");

    // Reference submission moves the order to review
    let status = session
        .confirm_payment(created.id, "123456")
        .await
        .expect("payment confirmation failed");
    assert_eq!(status, OrderStatus::PaymentReview);

    // A second reference is still accepted while under review
    let status = session
        .confirm_payment(created.id, "654321")
        .await
        .expect("reference correction failed");
    assert_eq!(status, OrderStatus::PaymentReview);

    // And the order shows up in the shopper's history
    let orders = session.load_history().await.expect("history failed");
    let mine = orders
        .iter()
        .find(|o| o.id == created.id)
        .expect("order missing from history");
    assert_eq!(mine.status, OrderStatus::PaymentReview);
    assert_eq!(
        mine.payment_reference.as_ref().map(|r| r.as_str()),
        Some("654321")
    );
}

#[tokio::test]
#[ignore = "Requires running backend"]
async fn malformed_references_never_reach_the_backend() {
    let (client, _user) = registered_shopper("badref").await;
    let product_id = stocked_product_id(&client).await;

    let mut session = Session::new(client);
    session.refresh_catalog().await.expect("catalog fetch failed");
    session.restore().await.expect("restore failed");
    session.add_to_cart(product_id).expect("add failed");
    let created = session
        .submit_order("Calle 1")
        .await
        .expect("order submission failed");

    for bad in ["123", "1234567", "12a456", ""] {
        session
            .confirm_payment(created.id, bad)
            .await
            .expect_err("malformed reference should be rejected locally");
    }

    // The order is untouched
    let probe = session
        .client()
        .order_status(created.id)
        .await
        .expect("probe failed");
    assert_eq!(probe.status, OrderStatus::Pending);
}

#[tokio::test]
#[ignore = "Requires running backend"]
async fn oversized_orders_are_rejected_and_leave_the_cart_intact() {
    let (client, _user) = registered_shopper("stock").await;
    let product = client
        .products()
        .await
        .expect("failed to list products")
        .into_iter()
        .find(|p| p.in_stock())
        .expect("catalog has no product with stock");

    let mut session = Session::new(client);
    session.refresh_catalog().await.expect("catalog fetch failed");
    session.restore().await.expect("restore failed");
    session.add_to_cart(product.id).expect("add failed");

    // The local gate already stops quantities beyond known stock
    session
        .set_cart_quantity(product.id, product.stock + 1)
        .expect_err("local stock gate should refuse");
    assert_eq!(session.cart().quantity_of(product.id), 1);
}
