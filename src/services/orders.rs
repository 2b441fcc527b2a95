use crate::{
    db::DbPool,
    entities::order::{self, ActiveModel as OrderActiveModel, OrderStatus},
    entities::product::{self, Entity as Product},
    errors::ServiceError,
    repositories::OrderRepository,
};
use chrono::Utc;
use sea_orm::{
    sea_query::Expr, ActiveModelTrait, ColumnTrait, EntityTrait, IntoActiveModel, QueryFilter,
    Set, TransactionError, TransactionTrait,
};
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use std::sync::Arc;
use tracing::{info, instrument, warn};
use utoipa::ToSchema;
use uuid::Uuid;

pub const OUT_OF_STOCK_MESSAGE: &str = "Product is out of stock";

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CreateOrderRequest {
    pub product_id: Uuid,
    pub user_id: Uuid,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct UpdateOrderStatusRequest {
    /// One of pending, processing, shipped, delivered, cancelled
    #[schema(example = "shipped")]
    pub status: String,
}

/// Service for placing and managing orders
#[derive(Clone)]
pub struct OrderService {
    db_pool: Arc<DbPool>,
    orders: OrderRepository,
}

impl OrderService {
    pub fn new(db_pool: Arc<DbPool>) -> Self {
        Self {
            orders: OrderRepository::new(db_pool.clone()),
            db_pool,
        }
    }

    /// Places an order for one unit of a product.
    ///
    /// The stock decrement and the order insert share a transaction; the
    /// decrement is conditional on stock remaining, so concurrent orders
    /// cannot drive quantity below zero.
    #[instrument(skip(self, request), fields(product_id = %request.product_id, user_id = %request.user_id))]
    pub async fn create_order(
        &self,
        request: CreateOrderRequest,
    ) -> Result<order::Model, ServiceError> {
        let CreateOrderRequest {
            product_id,
            user_id,
        } = request;

        let created = self
            .db_pool
            .transaction::<_, order::Model, ServiceError>(|txn| {
                Box::pin(async move {
                    let product = Product::find_by_id(product_id)
                        .one(txn)
                        .await?
                        .ok_or_else(|| {
                            ServiceError::NotFound(format!("Product {} not found", product_id))
                        })?;

                    if product.quantity <= 0 {
                        return Err(ServiceError::InsufficientStock(
                            OUT_OF_STOCK_MESSAGE.to_string(),
                        ));
                    }

                    let decremented = Product::update_many()
                        .col_expr(
                            product::Column::Quantity,
                            Expr::col(product::Column::Quantity).sub(1),
                        )
                        .col_expr(product::Column::UpdatedAt, Expr::value(Utc::now()))
                        .filter(product::Column::Id.eq(product_id))
                        .filter(product::Column::Quantity.gt(0))
                        .exec(txn)
                        .await?;
                    if decremented.rows_affected == 0 {
                        return Err(ServiceError::InsufficientStock(
                            OUT_OF_STOCK_MESSAGE.to_string(),
                        ));
                    }

                    let order = OrderActiveModel {
                        id: Set(Uuid::new_v4()),
                        product_id: Set(product_id),
                        user_id: Set(user_id),
                        status: Set(OrderStatus::Pending),
                        ..Default::default()
                    }
                    .insert(txn)
                    .await?;
                    Ok(order)
                })
            })
            .await
            .map_err(|e| match e {
                TransactionError::Connection(db) => ServiceError::DatabaseError(db),
                TransactionError::Transaction(err) => err,
            })?;

        info!(order_id = %created.id, "order created");
        Ok(created)
    }

    #[instrument(skip(self))]
    pub async fn get_order(&self, id: Uuid) -> Result<order::Model, ServiceError> {
        self.orders
            .find_by_id(id)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("Order {} not found", id)))
    }

    #[instrument(skip(self))]
    pub async fn list_orders(&self, skip: u64, limit: u64) -> Result<Vec<order::Model>, ServiceError> {
        Ok(self.orders.find_all(skip, limit).await?)
    }

    /// Writes any status value; transitions are not checked.
    #[instrument(skip(self))]
    pub async fn update_order_status(
        &self,
        id: Uuid,
        status: &str,
    ) -> Result<order::Model, ServiceError> {
        let status = OrderStatus::from_str(status).map_err(|_| {
            warn!(status, "rejected unknown order status");
            ServiceError::InvalidInput(format!("Unknown order status '{}'", status))
        })?;

        let mut active = self.get_order(id).await?.into_active_model();
        active.status = Set(status);
        let updated = active.update(&*self.db_pool).await?;

        info!(order_id = %id, status = %status, "order status updated");
        Ok(updated)
    }
}
