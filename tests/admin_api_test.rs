//! Administrative catalog CRUD, user management and order lifecycle.

mod common;

use axum::http::Method;
use common::{response_json, TestApp};
use serde_json::json;

#[tokio::test]
async fn admin_routes_reject_regular_users_and_anonymous_callers() {
    let app = TestApp::new().await;
    let token = app.register_user("Ada", "ada@example.com", "secret1").await;

    let anonymous = app
        .request(Method::GET, "/api/v1/admin/dishes", None, None, None)
        .await;
    assert_eq!(anonymous.status(), 401);

    let regular = app
        .request(Method::GET, "/api/v1/admin/dishes", None, Some(&token), None)
        .await;
    assert_eq!(regular.status(), 403);
}

#[tokio::test]
async fn dish_crud_round_trip() {
    let app = TestApp::new().await;
    let admin = app.register_admin("admin@example.com").await;

    let response = app
        .request(
            Method::POST,
            "/api/v1/admin/categories",
            Some(json!({ "title": "Soups" })),
            Some(&admin),
            None,
        )
        .await;
    assert_eq!(response.status(), 201);
    let category_id = response_json(response).await["id"].as_i64().unwrap();

    let response = app
        .request(
            Method::POST,
            "/api/v1/admin/dishes",
            Some(json!({
                "title": "Borscht",
                "price": 300,
                "description": "Beetroot soup",
                "category_ids": [category_id]
            })),
            Some(&admin),
            None,
        )
        .await;
    assert_eq!(response.status(), 201);
    let dish = response_json(response).await;
    let dish_id = dish["id"].as_i64().unwrap();
    assert_eq!(dish["price"], 300);

    // Visible through the public catalog, filed under its category.
    let response = app
        .request(
            Method::GET,
            &format!("/api/v1/categories/{}/dishes", category_id),
            None,
            None,
            None,
        )
        .await;
    assert_eq!(response.status(), 200);
    let dishes = response_json(response).await;
    assert_eq!(dishes.as_array().unwrap().len(), 1);
    assert_eq!(dishes[0]["title"], "Borscht");

    let response = app
        .request(
            Method::PUT,
            &format!("/api/v1/admin/dishes/{}", dish_id),
            Some(json!({
                "title": "Borscht",
                "price": 350,
                "category_ids": [category_id]
            })),
            Some(&admin),
            None,
        )
        .await;
    assert_eq!(response.status(), 200);
    assert_eq!(response_json(response).await["price"], 350);

    let response = app
        .request(
            Method::DELETE,
            &format!("/api/v1/admin/dishes/{}", dish_id),
            None,
            Some(&admin),
            None,
        )
        .await;
    assert_eq!(response.status(), 204);

    let response = app
        .request(
            Method::GET,
            &format!("/api/v1/dishes/{}", dish_id),
            None,
            None,
            None,
        )
        .await;
    assert_eq!(response.status(), 404);
}

#[tokio::test]
async fn dish_creation_with_unknown_category_is_404() {
    let app = TestApp::new().await;
    let admin = app.register_admin("admin@example.com").await;

    let response = app
        .request(
            Method::POST,
            "/api/v1/admin/dishes",
            Some(json!({ "title": "Orphan", "price": 100, "category_ids": [777] })),
            Some(&admin),
            None,
        )
        .await;
    assert_eq!(response.status(), 404);
}

#[tokio::test]
async fn duplicate_category_title_is_a_conflict() {
    let app = TestApp::new().await;
    let admin = app.register_admin("admin@example.com").await;

    for expected in [201, 409] {
        let response = app
            .request(
                Method::POST,
                "/api/v1/admin/categories",
                Some(json!({ "title": "Soups" })),
                Some(&admin),
                None,
            )
            .await;
        assert_eq!(response.status(), expected);
    }
}

#[tokio::test]
async fn dish_listing_supports_search_and_price_sort() {
    let app = TestApp::new().await;
    let admin = app.register_admin("admin@example.com").await;
    app.seed_dish("Pelmeni", 500).await;
    app.seed_dish("Borscht", 300).await;
    app.seed_dish("Blini", 200).await;

    let response = app
        .request(
            Method::GET,
            "/api/v1/admin/dishes?search=Pelmeni",
            None,
            Some(&admin),
            None,
        )
        .await;
    assert_eq!(response.status(), 200);
    let body = response_json(response).await;
    assert_eq!(body["total"], 1);
    assert_eq!(body["items"][0]["title"], "Pelmeni");

    let response = app
        .request(
            Method::GET,
            "/api/v1/admin/dishes?sort_by=price&sort_order=desc",
            None,
            Some(&admin),
            None,
        )
        .await;
    let body = response_json(response).await;
    let prices: Vec<i64> = body["items"]
        .as_array()
        .unwrap()
        .iter()
        .map(|d| d["price"].as_i64().unwrap())
        .collect();
    assert_eq!(prices, vec![500, 300, 200]);
}

#[tokio::test]
async fn order_status_advances_one_step_at_a_time() {
    let app = TestApp::new().await;
    let pelmeni = app.seed_dish("Pelmeni", 500).await;
    let token = app.register_user("Ada", "ada@example.com", "secret1").await;
    let admin = app.register_admin("admin@example.com").await;

    app.request(
        Method::POST,
        "/api/v1/cart/items",
        Some(json!({ "dish_id": pelmeni })),
        None,
        Some("session-a"),
    )
    .await;
    let response = app
        .request(
            Method::POST,
            "/api/v1/checkout",
            Some(json!({
                "name": "Ada",
                "phone": "79990001122",
                "address": "1 Analytical Engine Way"
            })),
            Some(&token),
            Some("session-a"),
        )
        .await;
    let order_id = response_json(response).await["order"]["id"].as_i64().unwrap();
    let advance_uri = format!("/api/v1/admin/orders/{}/advance", order_id);

    for expected_status in ["Processing", "Completed"] {
        let response = app
            .request(Method::POST, &advance_uri, None, Some(&admin), None)
            .await;
        assert_eq!(response.status(), 200);
        assert_eq!(response_json(response).await["status"], expected_status);
    }

    // Completed is terminal.
    let response = app
        .request(Method::POST, &advance_uri, None, Some(&admin), None)
        .await;
    assert_eq!(response.status(), 400);
}

#[tokio::test]
async fn admins_list_users_but_not_their_hashes() {
    let app = TestApp::new().await;
    app.register_user("Ada", "ada@example.com", "secret1").await;
    let admin = app.register_admin("admin@example.com").await;

    let response = app
        .request(Method::GET, "/api/v1/admin/users", None, Some(&admin), None)
        .await;
    assert_eq!(response.status(), 200);
    let body = response_json(response).await;
    assert_eq!(body["total"], 2);
    for user in body["items"].as_array().unwrap() {
        assert!(user.get("password_hash").is_none());
    }
}

#[tokio::test]
async fn admins_create_accounts_with_the_admin_flag() {
    let app = TestApp::new().await;
    let token = app.register_user("Ada", "ada@example.com", "secret1").await;
    let admin = app.register_admin("admin@example.com").await;

    let forbidden = app
        .request(
            Method::POST,
            "/api/v1/admin/users",
            Some(json!({
                "name": "Grace",
                "email": "grace@example.com",
                "password": "secret1"
            })),
            Some(&token),
            None,
        )
        .await;
    assert_eq!(forbidden.status(), 403);

    let response = app
        .request(
            Method::POST,
            "/api/v1/admin/users",
            Some(json!({
                "name": "Grace",
                "email": "grace@example.com",
                "password": "secret1",
                "is_admin": true
            })),
            Some(&admin),
            None,
        )
        .await;
    assert_eq!(response.status(), 201);
    let body = response_json(response).await;
    assert_eq!(body["is_admin"], true);
    assert!(body.get("password_hash").is_none());

    // The new administrator can log in and use the admin API.
    let login = app
        .request(
            Method::POST,
            "/api/v1/auth/login",
            Some(json!({ "email": "grace@example.com", "password": "secret1" })),
            None,
            None,
        )
        .await;
    assert_eq!(login.status(), 200);
    let grace_token = response_json(login).await["access_token"]
        .as_str()
        .unwrap()
        .to_string();
    let listing = app
        .request(
            Method::GET,
            "/api/v1/admin/users",
            None,
            Some(&grace_token),
            None,
        )
        .await;
    assert_eq!(listing.status(), 200);

    let duplicate = app
        .request(
            Method::POST,
            "/api/v1/admin/users",
            Some(json!({
                "name": "Grace",
                "email": "grace@example.com",
                "password": "secret1"
            })),
            Some(&admin),
            None,
        )
        .await;
    assert_eq!(duplicate.status(), 409);
}

#[tokio::test]
async fn users_with_order_history_cannot_be_deleted() {
    let app = TestApp::new().await;
    let pelmeni = app.seed_dish("Pelmeni", 500).await;
    let token = app.register_user("Ada", "ada@example.com", "secret1").await;
    let admin = app.register_admin("admin@example.com").await;

    app.request(
        Method::POST,
        "/api/v1/cart/items",
        Some(json!({ "dish_id": pelmeni })),
        None,
        Some("session-a"),
    )
    .await;
    let response = app
        .request(
            Method::POST,
            "/api/v1/checkout",
            Some(json!({
                "name": "Ada",
                "phone": "79990001122",
                "address": "1 Analytical Engine Way"
            })),
            Some(&token),
            Some("session-a"),
        )
        .await;
    let order_id = response_json(response).await["order"]["id"].as_i64().unwrap();

    let me = app
        .request(Method::GET, "/api/v1/auth/me", None, Some(&token), None)
        .await;
    let user_id = response_json(me).await["id"].as_i64().unwrap();

    let response = app
        .request(
            Method::DELETE,
            &format!("/api/v1/admin/users/{}", user_id),
            None,
            Some(&admin),
            None,
        )
        .await;
    assert_eq!(response.status(), 409);

    // Both the account and the order are still there.
    let response = app
        .request(
            Method::GET,
            &format!("/api/v1/admin/orders/{}", order_id),
            None,
            Some(&admin),
            None,
        )
        .await;
    assert_eq!(response.status(), 200);
}

#[tokio::test]
async fn users_without_orders_can_be_deleted() {
    let app = TestApp::new().await;
    let token = app.register_user("Ada", "ada@example.com", "secret1").await;
    let admin = app.register_admin("admin@example.com").await;

    let me = app
        .request(Method::GET, "/api/v1/auth/me", None, Some(&token), None)
        .await;
    let user_id = response_json(me).await["id"].as_i64().unwrap();

    let response = app
        .request(
            Method::DELETE,
            &format!("/api/v1/admin/users/{}", user_id),
            None,
            Some(&admin),
            None,
        )
        .await;
    assert_eq!(response.status(), 204);

    // The deleted account's token stops working.
    let response = app
        .request(Method::GET, "/api/v1/auth/me", None, Some(&token), None)
        .await;
    assert_eq!(response.status(), 401);
}
