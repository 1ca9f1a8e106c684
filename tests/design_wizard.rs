mod common;

use std::{sync::Arc, time::Duration};

use axum::http::StatusCode;
use bakery_kiosk::services::design_service;
use rust_decimal::Decimal;
use serde_json::json;
use tokio::sync::Notify;

use common::{Failure, TestApp, decimal, spawn_app};

async fn walk_to_review(app: &TestApp) {
    let (status, _) = app
        .patch(
            "/api/design",
            json!({
                "customer_name": "Liza",
                "customer_email": "liza@example.com",
                "customer_phone": "09170000000",
                "event_type": "birthday",
                "layers": [{ "flavor_id": 3, "size_id": 2 }],
                "cake_text": "Happy 30th",
                "design_complexity": "complex",
            }),
        )
        .await;
    assert_eq!(status, StatusCode::OK);

    for _ in 0..6 {
        let (status, _) = app.post("/api/design/next", json!({})).await;
        assert_eq!(status, StatusCode::OK);
    }
    let (_, body) = app.get("/api/design").await;
    assert_eq!(body["data"]["step"], "review");
}

#[tokio::test]
async fn incomplete_step_blocks_advancing() -> anyhow::Result<()> {
    let app = spawn_app().await?;

    let (status, body) = app.post("/api/design/next", json!({})).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(
        body["data"]["error"]
            .as_str()
            .unwrap()
            .contains("customer_name")
    );

    app.patch(
        "/api/design",
        json!({
            "customer_name": "Liza",
            "customer_email": "liza@example.com",
            "customer_phone": "09170000000",
        }),
    )
    .await;
    let (status, body) = app.post("/api/design/next", json!({})).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["step"], "layers");

    let (status, body) = app.post("/api/design/back", json!({})).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["step"], "customer_info");
    Ok(())
}

#[tokio::test]
async fn layer_count_resizes_the_layer_list() -> anyhow::Result<()> {
    let app = spawn_app().await?;

    let (_, body) = app.patch("/api/design", json!({ "num_layers": 3 })).await;
    assert_eq!(body["data"]["design"]["num_layers"], 3);
    assert_eq!(body["data"]["design"]["layers"].as_array().unwrap().len(), 3);

    let (_, body) = app.patch("/api/design", json!({ "cake_text": "Hi" })).await;
    assert_eq!(body["data"]["design"]["cake_text"], "Hi");
    assert_eq!(body["data"]["design"]["num_layers"], 3);

    let (_, body) = app.patch("/api/design", json!({ "cake_text": null })).await;
    assert!(body["data"]["design"]["cake_text"].is_null());
    Ok(())
}

#[tokio::test]
async fn submit_is_only_allowed_from_review() -> anyhow::Result<()> {
    let app = spawn_app().await?;
    let (status, _) = app.post("/api/design/submit", json!({})).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(app.backend.submissions.lock().unwrap().is_empty());
    Ok(())
}

#[tokio::test]
async fn kiosk_submission_adds_the_cake_to_the_cart() -> anyhow::Result<()> {
    let app = spawn_app().await?;
    walk_to_review(&app).await;

    let (status, body) = app.post("/api/design/submit", json!({})).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["wizard"]["step"], "submitted");
    assert_eq!(body["data"]["wizard"]["receipt"]["reference"], "CC-42");
    // 500 base plus the complex surcharge.
    assert_eq!(decimal(&body["data"]["cart"]["subtotal"]), Decimal::from(600));

    {
        let submissions = app.backend.submissions.lock().unwrap();
        assert_eq!(submissions.len(), 1);
        assert_eq!(submissions[0].estimated_surcharge, Decimal::from(100));
        assert_eq!(submissions[0].design.customer_name, "Liza");
    }

    let (_, body) = app.get("/api/cart").await;
    let items = body["data"]["items"].as_array().unwrap();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0]["menu_item"]["id"], 99);
    assert_eq!(items[0]["custom_cake_design"]["cake_text"], "Happy 30th");

    // A submitted design is frozen until reset.
    let (status, _) = app.patch("/api/design", json!({ "cake_text": "Oops" })).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);

    let (status, body) = app.post("/api/design/reset", json!({})).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["step"], "customer_info");
    assert_eq!(body["data"]["design"]["customer_name"], "");
    Ok(())
}

#[tokio::test]
async fn failed_submission_keeps_the_design_for_retry() -> anyhow::Result<()> {
    let app = spawn_app().await?;
    walk_to_review(&app).await;
    *app.backend.submit_failure.lock().unwrap() = Failure::Unavailable;

    let (status, _) = app.post("/api/design/submit", json!({})).await;
    assert_eq!(status, StatusCode::BAD_GATEWAY);

    let (_, body) = app.get("/api/design").await;
    assert_eq!(body["data"]["step"], "review");
    assert!(body["data"]["last_error"].is_string());
    assert_eq!(body["data"]["design"]["customer_name"], "Liza");

    let (_, cart) = app.get("/api/cart").await;
    assert!(cart["data"]["items"].as_array().unwrap().is_empty());

    *app.backend.submit_failure.lock().unwrap() = Failure::None;
    let (status, body) = app.post("/api/design/submit", json!({})).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["data"]["wizard"]["last_error"].is_null());
    Ok(())
}

#[tokio::test]
async fn mobile_submission_completes_the_session() -> anyhow::Result<()> {
    let app = spawn_app().await?;
    let (status, body) = app
        .post("/api/design/reset", json!({ "session_token": "sess-xyz" }))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["target"]["kind"], "mobile_session");

    walk_to_review(&app).await;
    let (status, body) = app.post("/api/design/submit", json!({})).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["wizard"]["receipt"]["reference"], "sess-xyz");
    assert!(body["data"]["cart"].is_null());

    let completed = app.backend.completed_sessions.lock().unwrap();
    assert_eq!(completed.len(), 1);
    assert_eq!(completed[0].0, "sess-xyz");
    assert!(app.backend.submissions.lock().unwrap().is_empty());
    Ok(())
}

#[tokio::test]
async fn overlapping_submit_and_reset_do_not_corrupt_the_wizard() -> anyhow::Result<()> {
    let app = spawn_app().await?;
    walk_to_review(&app).await;

    let gate = Arc::new(Notify::new());
    *app.backend.submit_gate.lock().unwrap() = Some(gate.clone());
    *app.backend.submit_failure.lock().unwrap() = Failure::Unavailable;

    let state = app.state.clone();
    let first = tokio::spawn(async move { design_service::submit(&state).await.is_ok() });

    for _ in 0..200 {
        if app.state.wizard.lock().await.is_submitting() {
            break;
        }
        tokio::time::sleep(Duration::from_millis(5)).await;
    }
    let (_, body) = app.get("/api/design").await;
    assert_eq!(body["data"]["submitting"], true);

    let (status, _) = app.post("/api/design/submit", json!({})).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    let (status, _) = app.patch("/api/design", json!({ "cake_text": "late" })).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);

    let (status, _) = app.post("/api/design/reset", json!({})).await;
    assert_eq!(status, StatusCode::OK);

    gate.notify_one();
    assert!(!first.await?);

    let (_, body) = app.get("/api/design").await;
    assert_eq!(body["data"]["step"], "customer_info");
    assert!(body["data"]["last_error"].is_null());
    assert_eq!(body["data"]["submitting"], false);

    let (_, cart) = app.get("/api/cart").await;
    assert!(cart["data"]["items"].as_array().unwrap().is_empty());
    Ok(())
}
