#![allow(dead_code)]

use std::sync::Arc;

use axum::{
    body::{to_bytes, Body},
    http::{Method, Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use tower::ServiceExt;
use tracking_api::{
    config::AppConfig, db, handlers::AppServices, services::tracking::RouteTable, AppState,
};
use uuid::Uuid;

/// Helper harness for spinning up the full application over an in-memory SQLite database.
pub struct TestApp {
    router: Router,
    pub state: AppState,
}

/// Status, headers and parsed JSON body of a finished request
pub struct TestResponse {
    pub status: StatusCode,
    pub headers: axum::http::HeaderMap,
    pub body: Value,
}

impl TestApp {
    /// Construct a new test application with fresh database state.
    pub async fn new() -> Self {
        let cfg = AppConfig::new(
            "sqlite::memory:".to_string(),
            "127.0.0.1".to_string(),
            18_080,
            "development".to_string(),
        );

        let pool = db::connect_in_memory()
            .await
            .expect("failed to create test database");
        let db_arc = Arc::new(pool);

        let services = AppServices::new(db_arc.clone(), Arc::new(RouteTable::standard()), &cfg);
        let state = AppState::new(db_arc, cfg, services);
        let router = tracking_api::app(state.clone());

        Self { router, state }
    }

    /// Send a request against the full router.
    pub async fn request(&self, method: Method, uri: &str, body: Option<Value>) -> TestResponse {
        self.request_with_headers(method, uri, body, &[]).await
    }

    pub async fn request_with_headers(
        &self,
        method: Method,
        uri: &str,
        body: Option<Value>,
        headers: &[(&str, &str)],
    ) -> TestResponse {
        let mut builder = Request::builder().method(method).uri(uri);
        for (name, value) in headers {
            builder = builder.header(*name, *value);
        }

        let body = if let Some(json) = body {
            builder = builder.header("content-type", "application/json");
            Body::from(serde_json::to_vec(&json).expect("failed to serialize json request body"))
        } else {
            Body::empty()
        };

        let request = builder.body(body).expect("failed to build request");
        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .expect("router error during test request");

        let status = response.status();
        let headers = response.headers().clone();
        let bytes = to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("failed to read response body");
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or(Value::Null)
        };

        TestResponse {
            status,
            headers,
            body,
        }
    }

    /// Creates a product with the given stock and returns its id.
    pub async fn seed_product(&self, name: &str, quantity: i32) -> Uuid {
        let response = self
            .request(
                Method::POST,
                "/products",
                Some(json!({
                    "name": name,
                    "description": "Seeded for integration tests",
                    "rating": 4.0,
                    "price": "250.00",
                    "quantity": quantity
                })),
            )
            .await;
        assert_eq!(response.status, StatusCode::CREATED, "{:?}", response.body);
        parse_id(&response.body["id"])
    }

    /// Places an order for a freshly seeded product and returns the order id.
    pub async fn seed_order(&self) -> Uuid {
        let product_id = self.seed_product("Tracked parcel", 5).await;
        let response = self
            .request(
                Method::POST,
                "/orders",
                Some(json!({
                    "product_id": product_id,
                    "user_id": Uuid::new_v4()
                })),
            )
            .await;
        assert_eq!(response.status, StatusCode::CREATED, "{:?}", response.body);
        parse_id(&response.body["id"])
    }
}

pub fn parse_id(value: &Value) -> Uuid {
    value
        .as_str()
        .and_then(|raw| Uuid::parse_str(raw).ok())
        .expect("response should carry a uuid")
}
