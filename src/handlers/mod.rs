use crate::{
    config::AppConfig,
    db::DbPool,
    repositories::{OrderRepository, TrackingRepository},
    services::{
        orders::OrderService,
        products::ProductService,
        tracking::{ProgressCalculator, RouteTable, TrackingService},
    },
};
use std::sync::Arc;

pub mod common;
pub mod orders;
pub mod products;
pub mod tracking;

/// Services shared by all HTTP handlers
#[derive(Clone)]
pub struct AppServices {
    pub products: Arc<ProductService>,
    pub orders: Arc<OrderService>,
    pub tracking: Arc<TrackingService>,
}

impl AppServices {
    /// Wires every service over one pool. `route` is built once by the caller
    /// and shared read-only from here on.
    pub fn new(db_pool: Arc<DbPool>, route: Arc<RouteTable>, config: &AppConfig) -> Self {
        let calculator = Arc::new(ProgressCalculator::new(
            route,
            config.tracking_stop_interval(),
        ));
        let tracking = TrackingService::new(
            Arc::new(OrderRepository::new(db_pool.clone())),
            Arc::new(TrackingRepository::new(db_pool.clone())),
            calculator,
        )
        .with_code_attempts(config.tracking_code_attempts);

        Self {
            products: Arc::new(ProductService::new(db_pool.clone())),
            orders: Arc::new(OrderService::new(db_pool)),
            tracking: Arc::new(tracking),
        }
    }
}
