use async_trait::async_trait;
use sea_orm::{
    ColumnTrait, DatabaseConnection, DbErr, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder,
    QuerySelect,
};
use std::sync::Arc;
use uuid::Uuid;

use crate::entities::order::{Column, Entity as Order, Model as OrderModel};
use crate::repositories::{OrderStore, Repository};

use super::BaseRepository;

/// Repository for order reads
#[derive(Debug, Clone)]
pub struct OrderRepository {
    base: BaseRepository,
}

impl OrderRepository {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    /// Find an order by ID
    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<OrderModel>, DbErr> {
        Order::find_by_id(id).one(self.base.get_db()).await
    }

    /// Orders oldest first, offset/limit paging
    pub async fn find_all(&self, skip: u64, limit: u64) -> Result<Vec<OrderModel>, DbErr> {
        Order::find()
            .order_by_asc(Column::CreatedAt)
            .offset(skip)
            .limit(limit)
            .all(self.base.get_db())
            .await
    }
}

#[async_trait]
impl OrderStore for OrderRepository {
    async fn order_exists(&self, order_id: Uuid) -> Result<bool, DbErr> {
        let count = Order::find()
            .filter(Column::Id.eq(order_id))
            .count(self.base.get_db())
            .await?;
        Ok(count > 0)
    }

    async fn get_order(&self, order_id: Uuid) -> Result<Option<OrderModel>, DbErr> {
        self.find_by_id(order_id).await
    }
}
