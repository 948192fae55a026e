//! Public menu browsing endpoints.

mod common;

use axum::http::Method;
use common::{response_json, TestApp};

#[tokio::test]
async fn health_check_reports_ok() {
    let app = TestApp::new().await;

    let response = app.request(Method::GET, "/health", None, None, None).await;
    assert_eq!(response.status(), 200);
    let body = response_json(response).await;
    assert_eq!(body["status"], "ok");
}

#[tokio::test]
async fn dish_listing_is_paginated() {
    let app = TestApp::new().await;
    for i in 0..25 {
        app.seed_dish(&format!("Dish {:02}", i), 100 + i).await;
    }

    let response = app
        .request(Method::GET, "/api/v1/dishes?per_page=10", None, None, None)
        .await;
    assert_eq!(response.status(), 200);
    let body = response_json(response).await;
    assert_eq!(body["total"], 25);
    assert_eq!(body["page"], 1);
    assert_eq!(body["per_page"], 10);
    assert_eq!(body["items"].as_array().unwrap().len(), 10);

    let response = app
        .request(
            Method::GET,
            "/api/v1/dishes?per_page=10&page=3",
            None,
            None,
            None,
        )
        .await;
    let body = response_json(response).await;
    assert_eq!(body["items"].as_array().unwrap().len(), 5);
}

#[tokio::test]
async fn unknown_dish_and_category_are_404() {
    let app = TestApp::new().await;

    let response = app
        .request(Method::GET, "/api/v1/dishes/42", None, None, None)
        .await;
    assert_eq!(response.status(), 404);
    let body = response_json(response).await;
    assert!(!body["message"].as_str().unwrap().is_empty());

    let response = app
        .request(Method::GET, "/api/v1/categories/42/dishes", None, None, None)
        .await;
    assert_eq!(response.status(), 404);
}

#[tokio::test]
async fn menu_groups_dishes_under_their_categories() {
    let app = TestApp::new().await;
    let admin = app.register_admin("admin@example.com").await;

    let response = app
        .request(
            Method::POST,
            "/api/v1/admin/categories",
            Some(serde_json::json!({ "title": "Soups" })),
            Some(&admin),
            None,
        )
        .await;
    let category_id = response_json(response).await["id"].as_i64().unwrap();

    app.request(
        Method::POST,
        "/api/v1/admin/dishes",
        Some(serde_json::json!({
            "title": "Borscht",
            "price": 300,
            "category_ids": [category_id]
        })),
        Some(&admin),
        None,
    )
    .await;
    // A dish with no category stays off the menu listing.
    app.seed_dish("Standalone", 100).await;

    let response = app
        .request(Method::GET, "/api/v1/categories", None, None, None)
        .await;
    assert_eq!(response.status(), 200);
    let menu = response_json(response).await;
    let categories = menu.as_array().unwrap();
    assert_eq!(categories.len(), 1);
    assert_eq!(categories[0]["title"], "Soups");
    assert_eq!(categories[0]["dishes"][0]["title"], "Borscht");
}
