//! Integration tests for the admin back-office operations.
//!
//! These tests require:
//! - A running Mercadito backend
//! - An admin account in `MERCADITO_ADMIN_EMAIL` / `MERCADITO_ADMIN_PASSWORD`
//!
//! Run with: cargo test -p mercadito-integration-tests -- --ignored

use mercadito_core::{ExchangeRate, OrderId, OrderStatus};
use mercadito_integration_tests::{admin_client, anonymous_client, registered_shopper};
use mercadito_storefront::backend::types::{CategoryPayload, ProductPayload, StatusUpdateRequest};
use mercadito_storefront::{Session, StoreClient};
use rust_decimal::dec;

/// Place an order as a throwaway shopper and submit a payment reference,
/// leaving it in review for the admin side to act on.
async fn order_in_review(prefix: &str) -> (StoreClient, OrderId) {
    let (client, _user) = registered_shopper(prefix).await;
    let product_id = client
        .products()
        .await
        .expect("failed to list products")
        .into_iter()
        .find(|p| p.in_stock())
        .expect("catalog has no product with stock")
        .id;

    let mut session = Session::new(client);
    session.refresh_catalog().await.expect("catalog fetch failed");
    session.restore().await.expect("restore failed");
    session.add_to_cart(product_id).expect("add failed");
    let created = session
        .submit_order("Av. Urdaneta, edificio 7")
        .await
        .expect("order submission failed");
    session
        .confirm_payment(created.id, "440011")
        .await
        .expect("payment confirmation failed");

    (session.client().clone(), created.id)
}

// ============================================================================
// Authorization
// ============================================================================

#[tokio::test]
#[ignore = "Requires running backend and admin credentials"]
async fn shoppers_cannot_use_admin_endpoints() {
    let (client, _user) = registered_shopper("notadmin").await;

    client
        .all_orders()
        .await
        .expect_err("order listing should be admin-only");
    client
        .create_category(&CategoryPayload {
            name: "Prohibida".to_owned(),
        })
        .await
        .expect_err("category creation should be admin-only");

    anonymous_client()
        .all_orders()
        .await
        .expect_err("order listing should require a session");
}

// ============================================================================
// Order lifecycle (admin side)
// ============================================================================

#[tokio::test]
#[ignore = "Requires running backend and admin credentials"]
async fn verify_ship_deliver_lifecycle() {
    let admin = admin_client().await;
    let (_shopper, order_id) = order_in_review("lifecycle").await;

    // The order shows up in the store-wide listing with its address
    let listed = admin
        .all_orders()
        .await
        .expect("admin listing failed")
        .into_iter()
        .find(|o| o.id == order_id)
        .expect("order missing from admin listing");
    assert_eq!(listed.status, OrderStatus::PaymentReview);
    assert!(listed.delivery_address.is_some());

    let ack = admin
        .update_order_status(&StatusUpdateRequest {
            order_id,
            new_status: OrderStatus::Shipped,
            rejection_reason: None,
        })
        .await
        .expect("ship transition failed");
    assert_eq!(ack.status, OrderStatus::Shipped);

    // Shipped orders no longer accept payment references
    assert!(!ack.status.accepts_payment_reference());

    let ack = admin
        .update_order_status(&StatusUpdateRequest {
            order_id,
            new_status: OrderStatus::Delivered,
            rejection_reason: None,
        })
        .await
        .expect("deliver transition failed");
    assert_eq!(ack.status, OrderStatus::Delivered);

    // Delivered is terminal
    admin
        .update_order_status(&StatusUpdateRequest {
            order_id,
            new_status: OrderStatus::Shipped,
            rejection_reason: None,
        })
        .await
        .expect_err("delivered orders should not transition");
}

#[tokio::test]
#[ignore = "Requires running backend and admin credentials"]
async fn rejection_carries_a_reason_and_allows_resubmission() {
    let admin = admin_client().await;
    let (shopper, order_id) = order_in_review("reject").await;

    let ack = admin
        .update_order_status(&StatusUpdateRequest {
            order_id,
            new_status: OrderStatus::Rejected,
            rejection_reason: Some("Referencia no encontrada en el banco".to_owned()),
        })
        .await
        .expect("reject transition failed");
    assert_eq!(ack.status, OrderStatus::Rejected);

    // The shopper sees the reason in their history
    let mine = shopper
        .my_orders()
        .await
        .expect("history failed")
        .into_iter()
        .find(|o| o.id == order_id)
        .expect("order missing from history");
    assert_eq!(
        mine.rejection_reason.as_deref(),
        Some("Referencia no encontrada en el banco")
    );

    // A corrected reference moves the order back into review
    let mut session = Session::new(shopper);
    session.restore().await.expect("restore failed");
    let status = session
        .confirm_payment(order_id, "990022")
        .await
        .expect("resubmission failed");
    assert_eq!(status, OrderStatus::PaymentReview);
}

// ============================================================================
// Catalog management
// ============================================================================

#[tokio::test]
#[ignore = "Requires running backend and admin credentials"]
async fn product_crud_roundtrip() {
    let admin = admin_client().await;

    let created = admin
        .create_product(&ProductPayload {
            name: "Prueba Integración".to_owned(),
            price: dec!(3.33),
            stock: 7,
            image_url: None,
            category_id: None,
        })
        .await
        .expect("product creation failed");
    assert_eq!(created.price, dec!(3.33));

    let updated = admin
        .update_product(
            created.id,
            &ProductPayload {
                name: "Prueba Integración v2".to_owned(),
                price: dec!(4.44),
                stock: 5,
                image_url: None,
                category_id: None,
            },
        )
        .await
        .expect("product update failed");
    assert_eq!(updated.name, "Prueba Integración v2");
    assert_eq!(updated.stock, 5);

    admin
        .delete_product(created.id)
        .await
        .expect("product deletion failed");
    let remaining = admin.products().await.expect("listing failed");
    assert!(remaining.iter().all(|p| p.id != created.id));
}

#[tokio::test]
#[ignore = "Requires running backend and admin credentials"]
async fn deleting_a_category_reparents_its_products() {
    let admin = admin_client().await;

    let category = admin
        .create_category(&CategoryPayload {
            name: "Efímera".to_owned(),
        })
        .await
        .expect("category creation failed");

    let product = admin
        .create_product(&ProductPayload {
            name: "Huérfano".to_owned(),
            price: dec!(1.00),
            stock: 1,
            image_url: None,
            category_id: Some(category.id),
        })
        .await
        .expect("product creation failed");
    assert_eq!(product.category_id, Some(category.id));

    admin
        .delete_category(category.id)
        .await
        .expect("category deletion failed");

    // The product survives, uncategorized
    let survivor = admin
        .products()
        .await
        .expect("listing failed")
        .into_iter()
        .find(|p| p.id == product.id)
        .expect("product was deleted with its category");
    assert_eq!(survivor.category_id, None);

    admin.delete_product(product.id).await.expect("cleanup failed");
}

// ============================================================================
// Exchange rate
// ============================================================================

#[tokio::test]
#[ignore = "Requires running backend and admin credentials"]
async fn rate_updates_are_visible_immediately() {
    let admin = admin_client().await;
    let original = admin.exchange_rate().await.expect("rate read failed");

    let new_rate = ExchangeRate::new(original.value() + dec!(0.01)).expect("valid rate");
    let stored = admin
        .set_exchange_rate(new_rate)
        .await
        .expect("rate update failed");
    assert_eq!(stored, new_rate);

    // The same client reads its own write through the cache
    assert_eq!(
        admin.exchange_rate().await.expect("rate re-read failed"),
        new_rate
    );

    // A different client (cold cache) sees it too
    assert_eq!(
        anonymous_client()
            .exchange_rate()
            .await
            .expect("rate read failed"),
        new_rate
    );

    admin
        .set_exchange_rate(original)
        .await
        .expect("rate restore failed");
}
