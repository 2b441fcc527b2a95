use crate::{
    db::DbPool,
    entities::product::{self, ActiveModel as ProductActiveModel, Column, Entity as Product},
    errors::ServiceError,
};
use rust_decimal::Decimal;
use sea_orm::{ActiveModelTrait, EntityTrait, IntoActiveModel, QueryOrder, QuerySelect, Set};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{info, instrument};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::entities::product::validate_non_negative_price;

#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct CreateProductRequest {
    #[validate(length(min = 1, max = 255, message = "Product name must be between 1 and 255 characters"))]
    pub name: String,
    #[validate(length(max = 2000))]
    pub description: Option<String>,
    #[validate(range(min = 0.0, max = 5.0, message = "Rating must be between 0 and 5"))]
    #[serde(default)]
    pub rating: f64,
    #[validate(custom = "validate_non_negative_price")]
    #[schema(value_type = String, example = "19.99")]
    pub price: Decimal,
    #[validate(range(min = 0, message = "Quantity cannot be negative"))]
    #[serde(default)]
    pub quantity: i32,
    pub img_url: Option<String>,
}

/// Partial update; absent fields are left untouched.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate, ToSchema)]
pub struct UpdateProductRequest {
    #[validate(length(min = 1, max = 255, message = "Product name must be between 1 and 255 characters"))]
    pub name: Option<String>,
    #[validate(length(max = 2000))]
    pub description: Option<String>,
    #[validate(range(min = 0.0, max = 5.0, message = "Rating must be between 0 and 5"))]
    pub rating: Option<f64>,
    #[validate(custom = "validate_non_negative_price")]
    #[schema(value_type = Option<String>)]
    pub price: Option<Decimal>,
    #[validate(range(min = 0, message = "Quantity cannot be negative"))]
    pub quantity: Option<i32>,
    pub img_url: Option<String>,
}

/// Decimal places of the `price` column.
pub const PRICE_SCALE: u32 = 2;

/// SQLite reads drop trailing zeros, so every returned price is pinned to the
/// column's scale.
fn with_price_scale(mut model: product::Model) -> product::Model {
    model.price.rescale(PRICE_SCALE);
    model
}

/// Service for managing the product catalog
#[derive(Clone)]
pub struct ProductService {
    db_pool: Arc<DbPool>,
}

impl ProductService {
    pub fn new(db_pool: Arc<DbPool>) -> Self {
        Self { db_pool }
    }

    #[instrument(skip(self, request), fields(name = %request.name))]
    pub async fn create_product(
        &self,
        request: CreateProductRequest,
    ) -> Result<product::Model, ServiceError> {
        request.validate()?;

        let model = ProductActiveModel {
            id: Set(Uuid::new_v4()),
            name: Set(request.name),
            description: Set(request.description),
            rating: Set(request.rating),
            price: Set(request.price),
            quantity: Set(request.quantity),
            img_url: Set(request.img_url),
            ..Default::default()
        }
        .insert(&*self.db_pool)
        .await?;

        info!(product_id = %model.id, "product created");
        Ok(with_price_scale(model))
    }

    /// Oldest first.
    #[instrument(skip(self))]
    pub async fn list_products(
        &self,
        skip: u64,
        limit: u64,
    ) -> Result<Vec<product::Model>, ServiceError> {
        let products = Product::find()
            .order_by_asc(Column::CreatedAt)
            .offset(skip)
            .limit(limit)
            .all(&*self.db_pool)
            .await?;
        Ok(products.into_iter().map(with_price_scale).collect())
    }

    #[instrument(skip(self))]
    pub async fn get_product(&self, id: Uuid) -> Result<product::Model, ServiceError> {
        Product::find_by_id(id)
            .one(&*self.db_pool)
            .await?
            .map(with_price_scale)
            .ok_or_else(|| ServiceError::NotFound(format!("Product {} not found", id)))
    }

    #[instrument(skip(self, request))]
    pub async fn update_product(
        &self,
        id: Uuid,
        request: UpdateProductRequest,
    ) -> Result<product::Model, ServiceError> {
        request.validate()?;

        let mut active = self.get_product(id).await?.into_active_model();
        if let Some(name) = request.name {
            active.name = Set(name);
        }
        if let Some(description) = request.description {
            active.description = Set(Some(description));
        }
        if let Some(rating) = request.rating {
            active.rating = Set(rating);
        }
        if let Some(price) = request.price {
            active.price = Set(price);
        }
        if let Some(quantity) = request.quantity {
            active.quantity = Set(quantity);
        }
        if let Some(img_url) = request.img_url {
            active.img_url = Set(Some(img_url));
        }

        let updated = active.update(&*self.db_pool).await?;
        info!(product_id = %id, "product updated");
        Ok(with_price_scale(updated))
    }

    #[instrument(skip(self))]
    pub async fn delete_product(&self, id: Uuid) -> Result<(), ServiceError> {
        let result = Product::delete_by_id(id).exec(&*self.db_pool).await?;
        if result.rows_affected == 0 {
            return Err(ServiceError::NotFound(format!("Product {} not found", id)));
        }
        info!(product_id = %id, "product deleted");
        Ok(())
    }
}
