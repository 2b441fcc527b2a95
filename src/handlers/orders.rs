use crate::{
    entities::{order, OrderStatus},
    errors::ServiceError,
    handlers::common::{created, SkipLimitParams},
    services::orders::{CreateOrderRequest, UpdateOrderStatusRequest},
    ApiResult, AppState,
};
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::Json,
    routing::{get, put},
    Router,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

const DEFAULT_ORDER_PAGE: u64 = 100;

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct OrderResponse {
    pub id: Uuid,
    pub product_id: Uuid,
    pub user_id: Uuid,
    pub status: OrderStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<order::Model> for OrderResponse {
    fn from(model: order::Model) -> Self {
        Self {
            id: model.id,
            product_id: model.product_id,
            user_id: model.user_id,
            status: model.status,
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct OrderStatusUpdatedResponse {
    #[schema(example = "Order status updated to shipped")]
    pub message: String,
    pub order: OrderResponse,
}

pub fn order_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_orders).post(create_order))
        .route("/:id", get(get_order))
        .route("/:id/status", put(update_order_status))
}

#[utoipa::path(
    post,
    path = "/orders",
    request_body = CreateOrderRequest,
    responses(
        (status = 201, description = "Order placed", body = OrderResponse),
        (status = 400, description = "Product is out of stock", body = crate::errors::ErrorResponse),
        (status = 404, description = "Product not found", body = crate::errors::ErrorResponse)
    ),
    tag = "orders"
)]
pub async fn create_order(
    State(state): State<AppState>,
    Json(payload): Json<CreateOrderRequest>,
) -> Result<(StatusCode, Json<OrderResponse>), ServiceError> {
    let model = state.order_service().create_order(payload).await?;
    Ok(created(OrderResponse::from(model)))
}

#[utoipa::path(
    get,
    path = "/orders",
    params(SkipLimitParams),
    responses(
        (status = 200, description = "Orders listed", body = Vec<OrderResponse>)
    ),
    tag = "orders"
)]
pub async fn list_orders(
    State(state): State<AppState>,
    Query(params): Query<SkipLimitParams>,
) -> ApiResult<Vec<OrderResponse>> {
    let (skip, limit) = params.resolve(DEFAULT_ORDER_PAGE);
    let orders = state.order_service().list_orders(skip, limit).await?;
    Ok(Json(orders.into_iter().map(OrderResponse::from).collect()))
}

#[utoipa::path(
    get,
    path = "/orders/:id",
    params(
        ("id" = Uuid, Path, description = "Order ID")
    ),
    responses(
        (status = 200, description = "Order fetched", body = OrderResponse),
        (status = 404, description = "Order not found", body = crate::errors::ErrorResponse)
    ),
    tag = "orders"
)]
pub async fn get_order(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<OrderResponse> {
    let model = state.order_service().get_order(id).await?;
    Ok(Json(model.into()))
}

#[utoipa::path(
    put,
    path = "/orders/:id/status",
    params(
        ("id" = Uuid, Path, description = "Order ID")
    ),
    request_body = UpdateOrderStatusRequest,
    responses(
        (status = 200, description = "Status written", body = OrderStatusUpdatedResponse),
        (status = 400, description = "Unknown status", body = crate::errors::ErrorResponse),
        (status = 404, description = "Order not found", body = crate::errors::ErrorResponse)
    ),
    tag = "orders"
)]
pub async fn update_order_status(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateOrderStatusRequest>,
) -> ApiResult<OrderStatusUpdatedResponse> {
    let model = state
        .order_service()
        .update_order_status(id, &payload.status)
        .await?;
    Ok(Json(OrderStatusUpdatedResponse {
        message: format!("Order status updated to {}", model.status),
        order: model.into(),
    }))
}
