use std::sync::Arc;

use axum::{
    body::{self, Body},
    http::{Method, Request},
    response::Response,
    Router,
};
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, Set};
use serde_json::{json, Value};
use tokio::sync::mpsc;
use tower::ServiceExt;

use food_delivery_api::{
    app_router,
    config::AppConfig,
    db,
    entities::{user, User},
    events::{self, EventSender},
    services::catalog::DishInput,
    AppState,
};

/// Spins up the full application over an in-memory SQLite database.
pub struct TestApp {
    router: Router,
    pub state: Arc<AppState>,
    _event_task: tokio::task::JoinHandle<()>,
}

impl TestApp {
    pub async fn new() -> Self {
        let cfg = AppConfig {
            database_url: "sqlite::memory:".to_string(),
            jwt_secret: "test_secret_key_for_testing_purposes_only_32chars".to_string(),
            jwt_expiration: 3600,
            host: "127.0.0.1".to_string(),
            port: 18_080,
            environment: "test".to_string(),
            log_level: "warn".to_string(),
            log_json: false,
            auto_migrate: true,
            // One pooled connection, so the in-memory database survives
            // across statements.
            db_max_connections: 1,
            db_min_connections: 1,
            seed_file: None,
        };

        let pool = db::establish_connection(&cfg)
            .await
            .expect("failed to create test database");
        db::run_migrations(&pool)
            .await
            .expect("failed to run migrations in tests");
        let db = Arc::new(pool);

        let (event_tx, event_rx) = mpsc::channel(256);
        let event_sender = Arc::new(EventSender::new(event_tx));
        let event_task = tokio::spawn(events::process_events(event_rx));

        let state = Arc::new(AppState::new(db, cfg, event_sender));
        let router = app_router(state.clone());

        Self {
            router,
            state,
            _event_task: event_task,
        }
    }

    /// Send a request with optional JSON body, bearer token and session id.
    pub async fn request(
        &self,
        method: Method,
        uri: &str,
        body: Option<Value>,
        token: Option<&str>,
        session_id: Option<&str>,
    ) -> Response {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(tok) = token {
            builder = builder.header("authorization", format!("Bearer {}", tok));
        }
        if let Some(sid) = session_id {
            builder = builder.header("x-session-id", sid);
        }

        let body = if let Some(json) = body {
            builder = builder.header("content-type", "application/json");
            Body::from(serde_json::to_vec(&json).expect("failed to serialize json request body"))
        } else {
            Body::empty()
        };

        let request = builder.body(body).expect("failed to build request");
        self.router
            .clone()
            .oneshot(request)
            .await
            .expect("router error during test request")
    }

    /// Insert a dish straight through the catalog service and return its id.
    pub async fn seed_dish(&self, title: &str, price: i64) -> i32 {
        let dish = self
            .state
            .services
            .catalog
            .create_dish(DishInput {
                title: title.to_string(),
                price,
                description: Some(format!("{} for tests", title)),
                picture: None,
                category_ids: vec![],
            })
            .await
            .expect("seed dish for tests");
        dish.id
    }

    /// Register an account and return its bearer token.
    pub async fn register_user(&self, name: &str, email: &str, password: &str) -> String {
        let response = self
            .request(
                Method::POST,
                "/api/v1/auth/register",
                Some(json!({ "name": name, "email": email, "password": password })),
                None,
                None,
            )
            .await;
        assert_eq!(response.status(), 201, "registration should succeed");
        let body = response_json(response).await;
        body["access_token"]
            .as_str()
            .expect("token in registration response")
            .to_string()
    }

    /// Promote an existing account to administrator.
    pub async fn make_admin(&self, email: &str) {
        let account = User::find()
            .filter(user::Column::Email.eq(email))
            .one(&*self.state.db)
            .await
            .expect("query user")
            .expect("user exists");
        let mut account: user::ActiveModel = account.into();
        account.is_admin = Set(true);
        account.update(&*self.state.db).await.expect("promote user");
    }

    /// Register an account, promote it, and return a token carrying the
    /// admin flag.
    pub async fn register_admin(&self, email: &str) -> String {
        self.register_user("Admin", email, "adminpass").await;
        self.make_admin(email).await;
        // Admin status is read from the database on each request, so the
        // original token stays valid.
        let response = self
            .request(
                Method::POST,
                "/api/v1/auth/login",
                Some(json!({ "email": email, "password": "adminpass" })),
                None,
                None,
            )
            .await;
        assert_eq!(response.status(), 200, "admin login should succeed");
        let body = response_json(response).await;
        body["access_token"]
            .as_str()
            .expect("token in login response")
            .to_string()
    }
}

impl Drop for TestApp {
    fn drop(&mut self) {
        self._event_task.abort();
    }
}

pub async fn response_json(response: Response) -> Value {
    let bytes = body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("response body bytes");
    serde_json::from_slice(&bytes).expect("json response")
}
