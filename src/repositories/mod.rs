use async_trait::async_trait;
use sea_orm::{DatabaseConnection, DbErr};
use std::sync::Arc;
use uuid::Uuid;

use crate::entities::{order, order_tracking};

pub mod order_repository;
pub mod tracking_repository;

pub use order_repository::OrderRepository;
pub use tracking_repository::TrackingRepository;

/// Repository trait for common database operations
pub trait Repository {
    fn get_db(&self) -> &DatabaseConnection;
}

#[derive(Debug, Clone)]
pub struct BaseRepository {
    db: Arc<DatabaseConnection>,
}

impl BaseRepository {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }
}

impl Repository for BaseRepository {
    fn get_db(&self) -> &DatabaseConnection {
        &self.db
    }
}

/// Order lookups the tracking service depends on.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait OrderStore: Send + Sync {
    async fn order_exists(&self, order_id: Uuid) -> Result<bool, DbErr>;

    async fn get_order(&self, order_id: Uuid) -> Result<Option<order::Model>, DbErr>;
}

/// Persistence for tracking records.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TrackingStore: Send + Sync {
    async fn find_by_order(
        &self,
        order_id: Uuid,
    ) -> Result<Option<order_tracking::Model>, DbErr>;

    async fn find_by_code(&self, code: &str) -> Result<Option<order_tracking::Model>, DbErr>;

    async fn code_exists(&self, code: &str) -> Result<bool, DbErr>;

    /// Inserts the record if its id is new, otherwise overwrites it.
    async fn save(&self, record: order_tracking::Model) -> Result<order_tracking::Model, DbErr>;
}
