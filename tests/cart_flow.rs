mod support;

use shopfront_api::{
    domain::product::Category,
    dto::{
        cart::{AddToCartRequest, ApplyCouponRequest, UpdateCartItemRequest},
        products::CreateProductRequest,
    },
    error::AppError,
    models::UserRole,
    services::{cart_service, product_service},
};
use support::{money, register, setup_state};

fn widget(price: &str, stock: i32) -> CreateProductRequest {
    CreateProductRequest {
        name: "Flow Widget".into(),
        description: "Used by the cart flow".into(),
        price: money(price),
        category: Category::Other,
        stock_quantity: stock,
        in_stock: None,
        tags: vec!["flow".into()],
        images: vec!["https://img.example/widget.png".into()],
        discount_percentage: None,
    }
}

#[tokio::test]
async fn add_coupon_and_checkout() -> anyhow::Result<()> {
    let Some(state) = setup_state().await? else {
        return Ok(());
    };

    let vendor = register(&state, UserRole::Vendor).await?;
    let customer = register(&state, UserRole::Customer).await?;
    let product = product_service::create_product(&state, &vendor, widget("30.00", 5)).await?;

    // First access creates an empty cart.
    let cart = cart_service::get_cart(&state, &customer).await?;
    assert!(cart.is_empty());
    assert_eq!(cart.total(), money("0"));

    let cart = cart_service::add_item(
        &state,
        &customer,
        AddToCartRequest {
            product_id: product.id,
            quantity: 2,
        },
    )
    .await?;
    assert_eq!(cart.subtotal(), money("60.00"));
    assert_eq!(cart.tax(), money("4.80"));
    assert_eq!(cart.shipping_cost(), money("0"));
    assert_eq!(cart.total(), money("64.80"));

    // Free shipping already applies above the threshold, so FREESHIP is worth nothing.
    let cart = cart_service::apply_coupon(
        &state,
        &customer,
        ApplyCouponRequest {
            code: "freeship".into(),
        },
    )
    .await?;
    assert_eq!(cart.coupon_code(), Some("FREESHIP"));
    assert_eq!(cart.coupon_discount(), money("0"));

    let cart = cart_service::apply_coupon(
        &state,
        &customer,
        ApplyCouponRequest {
            code: "WELCOME10".into(),
        },
    )
    .await?;
    assert_eq!(cart.coupon_discount(), money("6.00"));
    assert_eq!(cart.total(), money("58.80"));

    // The stored cart reads back with the same figures.
    let reloaded = cart_service::get_cart(&state, &customer).await?;
    assert_eq!(reloaded.id(), cart.id());
    assert_eq!(reloaded.total(), money("58.80"));

    let summary = cart_service::checkout(&state, &customer).await?;
    assert_eq!(summary.items.len(), 1);
    assert_eq!(summary.total, money("58.80"));

    let after = cart_service::get_cart(&state, &customer).await?;
    assert!(after.is_empty());
    assert_eq!(after.coupon_code(), None);

    let err = cart_service::checkout(&state, &customer).await.unwrap_err();
    assert!(matches!(err, AppError::BadRequest(_)));

    Ok(())
}

#[tokio::test]
async fn stock_and_missing_items_are_reported() -> anyhow::Result<()> {
    let Some(state) = setup_state().await? else {
        return Ok(());
    };

    let vendor = register(&state, UserRole::Vendor).await?;
    let customer = register(&state, UserRole::Customer).await?;
    let product = product_service::create_product(&state, &vendor, widget("10.00", 1)).await?;

    let err = cart_service::add_item(
        &state,
        &customer,
        AddToCartRequest {
            product_id: product.id,
            quantity: 3,
        },
    )
    .await
    .unwrap_err();
    assert!(matches!(err, AppError::BadRequest(ref m) if m == "Insufficient stock for Flow Widget"));

    let err = cart_service::update_item(
        &state,
        &customer,
        product.id,
        UpdateCartItemRequest { quantity: 2 },
    )
    .await
    .unwrap_err();
    assert!(matches!(err, AppError::NotFound(_)));

    let cart = cart_service::add_item(
        &state,
        &customer,
        AddToCartRequest {
            product_id: product.id,
            quantity: 1,
        },
    )
    .await?;
    // Below the threshold: flat shipping applies.
    assert_eq!(cart.shipping_cost(), money("5.99"));
    assert_eq!(cart.total(), money("16.79"));

    let cart = cart_service::update_item(
        &state,
        &customer,
        product.id,
        UpdateCartItemRequest { quantity: 0 },
    )
    .await?;
    assert!(cart.is_empty());
    assert_eq!(cart.shipping_cost(), money("5.99"));
    assert_eq!(cart.total(), money("5.99"));

    // The emptied cart reads back with the same figures.
    let reloaded = cart_service::get_cart(&state, &customer).await?;
    assert_eq!(reloaded.shipping_cost(), money("5.99"));
    assert_eq!(reloaded.total(), money("5.99"));

    let cart = cart_service::clear_cart(&state, &customer).await?;
    assert!(cart.is_empty());
    assert_eq!(cart.shipping_cost(), money("0"));
    assert_eq!(cart.total(), money("0"));

    Ok(())
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_first_access_yields_one_cart() -> anyhow::Result<()> {
    let Some(state) = setup_state().await? else {
        return Ok(());
    };

    let customer = register(&state, UserRole::Customer).await?;
    let user_id = customer.user_id;

    let handles: Vec<_> = (0..4)
        .map(|_| {
            let state = state.clone();
            tokio::spawn(async move { cart_service::find_or_create(&state, user_id).await })
        })
        .collect();

    let mut ids = Vec::new();
    for handle in handles {
        ids.push(handle.await??.id());
    }
    // Losers of the insert race re-read the winner's cart.
    assert!(ids.iter().all(|id| *id == ids[0]));

    let cart = cart_service::get_cart(&state, &customer).await?;
    assert_eq!(cart.id(), ids[0]);

    Ok(())
}
