use async_trait::async_trait;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, IntoActiveModel,
    PaginatorTrait, QueryFilter,
};
use std::sync::Arc;
use uuid::Uuid;

use crate::entities::order_tracking::{Column, Entity as OrderTracking, Model as TrackingModel};
use crate::repositories::{Repository, TrackingStore};

use super::BaseRepository;

/// sea-orm backed store for tracking records
#[derive(Debug, Clone)]
pub struct TrackingRepository {
    base: BaseRepository,
}

impl TrackingRepository {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }
}

#[async_trait]
impl TrackingStore for TrackingRepository {
    async fn find_by_order(&self, order_id: Uuid) -> Result<Option<TrackingModel>, DbErr> {
        OrderTracking::find()
            .filter(Column::OrderId.eq(order_id))
            .one(self.base.get_db())
            .await
    }

    async fn find_by_code(&self, code: &str) -> Result<Option<TrackingModel>, DbErr> {
        OrderTracking::find()
            .filter(Column::TrackingId.eq(code))
            .one(self.base.get_db())
            .await
    }

    async fn code_exists(&self, code: &str) -> Result<bool, DbErr> {
        let count = OrderTracking::find()
            .filter(Column::TrackingId.eq(code))
            .count(self.base.get_db())
            .await?;
        Ok(count > 0)
    }

    async fn save(&self, record: TrackingModel) -> Result<TrackingModel, DbErr> {
        let db = self.base.get_db();
        let exists = OrderTracking::find_by_id(record.id).one(db).await?.is_some();

        let active = record.into_active_model().reset_all();

        if exists {
            active.update(db).await
        } else {
            active.insert(db).await
        }
    }
}
