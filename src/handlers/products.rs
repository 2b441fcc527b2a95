use crate::{
    entities::product,
    errors::ServiceError,
    handlers::common::{created, SkipLimitParams},
    services::products::{CreateProductRequest, UpdateProductRequest},
    ApiResult, AppState,
};
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::Json,
    routing::get,
    Router,
};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

const DEFAULT_PRODUCT_PAGE: u64 = 10;

#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[schema(example = json!({
    "id": "7d9f1c2e-3b4a-4e5f-8a9b-0c1d2e3f4a5b",
    "name": "Brass table lamp",
    "description": "Hand-finished brass lamp",
    "rating": 4.5,
    "price": "1499.00",
    "quantity": 12,
    "img_url": "https://cdn.example.com/lamp.jpg",
    "created_at": "2024-12-01T10:30:00Z",
    "updated_at": "2024-12-01T10:30:00Z"
}))]
pub struct ProductResponse {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub rating: f64,
    #[schema(value_type = String)]
    pub price: Decimal,
    /// Units in stock
    pub quantity: i32,
    pub img_url: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<product::Model> for ProductResponse {
    fn from(model: product::Model) -> Self {
        Self {
            id: model.id,
            name: model.name,
            description: model.description,
            rating: model.rating,
            price: model.price,
            quantity: model.quantity,
            img_url: model.img_url,
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}

pub fn product_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_products).post(create_product))
        .route(
            "/:id",
            get(get_product).put(update_product).delete(delete_product),
        )
}

#[utoipa::path(
    post,
    path = "/products",
    request_body = CreateProductRequest,
    responses(
        (status = 201, description = "Product created", body = ProductResponse),
        (status = 400, description = "Invalid product", body = crate::errors::ErrorResponse)
    ),
    tag = "products"
)]
pub async fn create_product(
    State(state): State<AppState>,
    Json(payload): Json<CreateProductRequest>,
) -> Result<(StatusCode, Json<ProductResponse>), ServiceError> {
    let model = state.product_service().create_product(payload).await?;
    Ok(created(ProductResponse::from(model)))
}

#[utoipa::path(
    get,
    path = "/products",
    params(SkipLimitParams),
    responses(
        (status = 200, description = "Products listed", body = Vec<ProductResponse>)
    ),
    tag = "products"
)]
pub async fn list_products(
    State(state): State<AppState>,
    Query(params): Query<SkipLimitParams>,
) -> ApiResult<Vec<ProductResponse>> {
    let (skip, limit) = params.resolve(DEFAULT_PRODUCT_PAGE);
    let products = state.product_service().list_products(skip, limit).await?;
    Ok(Json(products.into_iter().map(ProductResponse::from).collect()))
}

#[utoipa::path(
    get,
    path = "/products/:id",
    params(
        ("id" = Uuid, Path, description = "Product ID")
    ),
    responses(
        (status = 200, description = "Product fetched", body = ProductResponse),
        (status = 404, description = "Product not found", body = crate::errors::ErrorResponse)
    ),
    tag = "products"
)]
pub async fn get_product(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<ProductResponse> {
    let model = state.product_service().get_product(id).await?;
    Ok(Json(model.into()))
}

#[utoipa::path(
    put,
    path = "/products/:id",
    params(
        ("id" = Uuid, Path, description = "Product ID")
    ),
    request_body = UpdateProductRequest,
    responses(
        (status = 200, description = "Product updated", body = ProductResponse),
        (status = 400, description = "Invalid product", body = crate::errors::ErrorResponse),
        (status = 404, description = "Product not found", body = crate::errors::ErrorResponse)
    ),
    tag = "products"
)]
pub async fn update_product(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateProductRequest>,
) -> ApiResult<ProductResponse> {
    let model = state.product_service().update_product(id, payload).await?;
    Ok(Json(model.into()))
}

#[utoipa::path(
    delete,
    path = "/products/:id",
    params(
        ("id" = Uuid, Path, description = "Product ID")
    ),
    responses(
        (status = 204, description = "Product deleted"),
        (status = 404, description = "Product not found", body = crate::errors::ErrorResponse)
    ),
    tag = "products"
)]
pub async fn delete_product(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ServiceError> {
    state.product_service().delete_product(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
