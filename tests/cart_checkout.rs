mod common;

use axum::http::{Method, StatusCode};
use bakery_kiosk::services::cart_store::CartStore;
use rust_decimal::Decimal;
use serde_json::json;

use common::{Failure, cart_line, decimal, spawn_app};

async fn fill_cart(app: &common::TestApp) {
    let (status, _) = app.post("/api/cart", cart_line(1, "Ube Roll", "50", 2)).await;
    assert_eq!(status, StatusCode::OK);
    let (status, _) = app.post("/api/cart", cart_line(2, "Pandesal", "70", 1)).await;
    assert_eq!(status, StatusCode::OK);
}

async fn login(app: &common::TestApp) {
    let (status, _) = app
        .post(
            "/api/auth/login",
            json!({ "username": "cashier", "password": "secret" }),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn adding_items_merges_and_totals() -> anyhow::Result<()> {
    let app = spawn_app().await?;
    fill_cart(&app).await;

    let (status, body) = app.post("/api/cart", cart_line(1, "Ube Roll", "50", 1)).await;
    assert_eq!(status, StatusCode::OK);

    let data = &body["data"];
    assert_eq!(data["items"].as_array().unwrap().len(), 2);
    assert_eq!(data["items"][0]["quantity"], 3);
    assert_eq!(data["summary"]["item_count"], 4);
    assert_eq!(decimal(&data["summary"]["subtotal"]), Decimal::from(220));
    assert_eq!(decimal(&data["summary"]["total"]), Decimal::from(220));
    assert_eq!(data["phase"], "hydrated");
    Ok(())
}

#[tokio::test]
async fn zero_quantity_add_is_rejected() -> anyhow::Result<()> {
    let app = spawn_app().await?;
    let (status, _) = app.post("/api/cart", cart_line(1, "Ube Roll", "50", 0)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (_, body) = app.get("/api/cart").await;
    assert!(body["data"]["items"].as_array().unwrap().is_empty());
    Ok(())
}

#[tokio::test]
async fn quantity_updates_and_removal() -> anyhow::Result<()> {
    let app = spawn_app().await?;
    fill_cart(&app).await;

    let (status, body) = app.patch("/api/cart/1", json!({ "quantity": 5 })).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["summary"]["item_count"], 6);

    // Unknown ids are ignored.
    let (status, body) = app.patch("/api/cart/404", json!({ "quantity": 2 })).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["summary"]["item_count"], 6);

    let (_, body) = app.patch("/api/cart/1", json!({ "quantity": 0 })).await;
    assert_eq!(body["data"]["items"].as_array().unwrap().len(), 1);

    let (status, body) = app.request(Method::DELETE, "/api/cart/2", None).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["data"]["items"].as_array().unwrap().is_empty());
    Ok(())
}

#[tokio::test]
async fn cart_survives_a_restart() -> anyhow::Result<()> {
    let app = spawn_app().await?;
    fill_cart(&app).await;

    let reloaded = CartStore::new(app.storage.clone());
    reloaded.hydrate().await;
    let cart = reloaded.snapshot().await;
    assert_eq!(cart.item_count(), 3);
    assert_eq!(cart.subtotal(), Decimal::from(170));

    let (_, body) = app.get("/api/cart/order-items").await;
    let items = body["data"]["items"].as_array().unwrap();
    assert_eq!(items.len(), 2);
    assert_eq!(items[0]["menu_item_id"], 1);
    assert_eq!(items[0]["quantity"], 2);
    Ok(())
}

#[tokio::test]
async fn checkout_requires_a_session() -> anyhow::Result<()> {
    let app = spawn_app().await?;
    fill_cart(&app).await;

    let (status, _) = app
        .post("/api/orders/checkout", json!({ "payment_method": "cash" }))
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert!(app.backend.orders.lock().unwrap().is_empty());
    Ok(())
}

#[tokio::test]
async fn bad_credentials_are_rejected() -> anyhow::Result<()> {
    let app = spawn_app().await?;
    let (status, _) = app
        .post(
            "/api/auth/login",
            json!({ "username": "cashier", "password": "wrong" }),
        )
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert!(app.state.auth.token().await.is_none());
    Ok(())
}

#[tokio::test]
async fn empty_cart_cannot_be_checked_out() -> anyhow::Result<()> {
    let app = spawn_app().await?;
    login(&app).await;

    let (status, _) = app
        .post("/api/orders/checkout", json!({ "payment_method": "card" }))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    Ok(())
}

#[tokio::test]
async fn successful_checkout_clears_the_cart() -> anyhow::Result<()> {
    let app = spawn_app().await?;
    login(&app).await;
    assert_eq!(app.state.auth.token().await.as_deref(), Some("staff-token"));
    fill_cart(&app).await;

    let (status, body) = app
        .post("/api/orders/checkout", json!({ "payment_method": "e_wallet" }))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["order"]["verification_code"], "KSK-0001");
    assert_eq!(decimal(&body["data"]["summary"]["total"]), Decimal::from(170));

    {
        let orders = app.backend.orders.lock().unwrap();
        assert_eq!(orders.len(), 1);
        assert_eq!(orders[0].items.len(), 2);
    }

    let (_, body) = app.get("/api/cart").await;
    assert!(body["data"]["items"].as_array().unwrap().is_empty());
    Ok(())
}

#[tokio::test]
async fn failed_checkout_keeps_the_cart() -> anyhow::Result<()> {
    let app = spawn_app().await?;
    login(&app).await;
    fill_cart(&app).await;
    *app.backend.order_failure.lock().unwrap() = Failure::Unavailable;

    let (status, _) = app
        .post("/api/orders/checkout", json!({ "payment_method": "cash" }))
        .await;
    assert_eq!(status, StatusCode::BAD_GATEWAY);

    let (_, body) = app.get("/api/cart").await;
    assert_eq!(body["data"]["summary"]["item_count"], 3);
    assert!(app.state.auth.token().await.is_some());
    Ok(())
}

#[tokio::test]
async fn rejected_token_signs_the_kiosk_out() -> anyhow::Result<()> {
    let app = spawn_app().await?;
    login(&app).await;
    fill_cart(&app).await;
    *app.backend.order_failure.lock().unwrap() = Failure::Unauthorized;

    let (status, _) = app
        .post("/api/orders/checkout", json!({ "payment_method": "cash" }))
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert!(app.state.auth.token().await.is_none());

    let (_, body) = app.get("/api/cart").await;
    assert_eq!(body["data"]["summary"]["item_count"], 3);

    // The extractor now refuses before the backend is called again.
    *app.backend.order_failure.lock().unwrap() = Failure::None;
    let (status, _) = app
        .post("/api/orders/checkout", json!({ "payment_method": "cash" }))
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert!(app.backend.orders.lock().unwrap().is_empty());
    Ok(())
}

#[tokio::test]
async fn menu_hides_items_that_cannot_be_ordered() -> anyhow::Result<()> {
    let app = spawn_app().await?;

    let (status, body) = app.get("/api/menu").await;
    assert_eq!(status, StatusCode::OK);
    let ids: Vec<i64> = body["data"]["items"]
        .as_array()
        .unwrap()
        .iter()
        .map(|item| item["id"].as_i64().unwrap())
        .collect();
    assert_eq!(ids, vec![1, 2]);

    let (_, body) = app.get("/api/menu?category_id=2&include_unavailable=true").await;
    let ids: Vec<i64> = body["data"]["items"]
        .as_array()
        .unwrap()
        .iter()
        .map(|item| item["id"].as_i64().unwrap())
        .collect();
    assert_eq!(ids, vec![1, 3]);
    Ok(())
}

#[tokio::test]
async fn actions_are_audited() -> anyhow::Result<()> {
    let app = spawn_app().await?;
    fill_cart(&app).await;
    app.request(Method::DELETE, "/api/cart", None).await;

    let (status, body) = app.get("/api/audit?per_page=2&sort_order=asc").await;
    assert_eq!(status, StatusCode::OK);
    let items = body["data"]["items"].as_array().unwrap();
    assert_eq!(items.len(), 2);
    assert_eq!(items[0]["action"], "cart_add");
    assert_eq!(body["meta"]["total"], 3);
    Ok(())
}

#[tokio::test]
async fn out_of_range_lines_are_rejected() -> anyhow::Result<()> {
    let app = spawn_app().await?;

    let huge_price = cart_line(1, "Gold Cake", "79228162514264337593543950335", 2);
    let (status, _) = app.post("/api/cart", huge_price).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let mut huge_size = cart_line(1, "Ube Roll", "50", 1);
    huge_size["size"] = json!({ "id": 1, "name": "Titan", "price_multiplier": "1000000" });
    let (status, _) = app.post("/api/cart", huge_size).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = app.post("/api/cart", cart_line(1, "Ube Roll", "50", 10_000)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    fill_cart(&app).await;
    let (status, _) = app.patch("/api/cart/1", json!({ "quantity": 10_000 })).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, body) = app.get("/api/cart").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["summary"]["item_count"], 3);
    assert_eq!(decimal(&body["data"]["summary"]["subtotal"]), Decimal::from(170));
    Ok(())
}
