//! Tracking API Library
//!
//! Product catalog, order placement, and shipment tracking along a fixed
//! route of waypoints.
#![forbid(unsafe_code)]
#![deny(rust_2018_idioms)]
#![allow(elided_lifetimes_in_paths)]
#![warn(clippy::all, clippy::perf, clippy::dbg_macro)]

pub mod config;
pub mod db;
pub mod entities;
pub mod errors;
pub mod handlers;
pub mod health;
pub mod middleware_helpers;
pub mod migrator;
pub mod openapi;
pub mod repositories;
pub mod services;
pub mod tracing;

use axum::{http::HeaderValue, response::Json, routing::get, Router};
use std::sync::Arc;
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
};

// App state definition
#[derive(Clone)]
pub struct AppState {
    pub db: Arc<db::DbPool>,
    pub config: config::AppConfig,
    pub services: handlers::AppServices,
}

impl AppState {
    pub fn new(db: Arc<db::DbPool>, config: config::AppConfig, services: handlers::AppServices) -> Self {
        Self {
            db,
            config,
            services,
        }
    }

    pub fn product_service(&self) -> Arc<services::products::ProductService> {
        self.services.products.clone()
    }

    pub fn order_service(&self) -> Arc<services::orders::OrderService> {
        self.services.orders.clone()
    }

    pub fn tracking_service(&self) -> Arc<services::tracking::TrackingService> {
        self.services.tracking.clone()
    }
}

/// Handler result for plain JSON bodies
pub type ApiResult<T> = Result<Json<T>, errors::ServiceError>;

/// Resource routes without the outer middleware stack
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/track", handlers::tracking::tracking_routes())
        .nest("/products", handlers::products::product_routes())
        .nest("/orders", handlers::orders::order_routes())
}

/// Builds the CORS layer from configuration. Falls back to same-origin only
/// when nothing is configured outside development.
pub fn cors_layer(cfg: &config::AppConfig) -> CorsLayer {
    let origins: Vec<HeaderValue> = cfg
        .cors_origins()
        .iter()
        .filter_map(|origin| HeaderValue::from_str(origin).ok())
        .collect();

    if !origins.is_empty() {
        CorsLayer::new()
            .allow_origin(origins)
            .allow_methods(Any)
            .allow_headers(Any)
    } else if cfg.should_allow_permissive_cors() {
        ::tracing::info!(
            "Using permissive CORS because explicit origins were not configured ({})",
            if cfg.is_development() {
                "development environment"
            } else {
                "explicit override enabled"
            }
        );
        CorsLayer::permissive()
    } else {
        ::tracing::warn!("No CORS origins configured; cross-origin requests will be rejected");
        CorsLayer::new()
    }
}

/// Full application router with every middleware layer applied
pub fn app(state: AppState) -> Router {
    let cors = cors_layer(&state.config);

    Router::<AppState>::new()
        .route("/", get(health::welcome))
        .route("/health", get(health::simple_health_check))
        .merge(api_routes())
        .merge(openapi::swagger_ui())
        .layer(crate::tracing::configure_http_tracing())
        .layer(CompressionLayer::new())
        .layer(cors)
        // Outermost so every span and error body sees the id
        .layer(axum::middleware::from_fn(
            middleware_helpers::request_id::request_id_middleware,
        ))
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cors_layer_accepts_every_config_shape() {
        let mut cfg = config::AppConfig::new(
            "sqlite::memory:".into(),
            "127.0.0.1".into(),
            8000,
            "production".into(),
        );
        let _ = cors_layer(&cfg);

        cfg.cors_allowed_origins = Some("https://shop.example.com, ".into());
        let _ = cors_layer(&cfg);

        cfg.cors_allowed_origins = None;
        cfg.environment = "development".into();
        let _ = cors_layer(&cfg);
    }
}
