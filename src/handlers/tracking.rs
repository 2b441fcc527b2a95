use crate::{
    entities::{TrackingStatus, Waypoint},
    errors::ServiceError,
    handlers::common::created,
    services::tracking::TrackedShipment,
    ApiResult, AppState,
};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Json,
    routing::{get, post, put},
    Router,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[schema(example = json!({
    "order_id": "550e8400-e29b-41d4-a716-446655440000",
    "current_location": "Manmad"
}))]
pub struct CreateTrackingRequest {
    /// Order to start tracking
    pub order_id: Uuid,
    /// Starting stop on the route
    #[schema(example = "Manmad")]
    pub current_location: String,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct UpdateLocationRequest {
    /// New stop on the route
    #[schema(example = "Sangamner")]
    pub current_location: String,
}

/// Tracking record with progress computed at read time
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[schema(example = json!({
    "id": "0b7c2d1e-8f4a-4c55-9f1e-2a3b4c5d6e7f",
    "tracking_id": "TRK4F7Q2Z9A",
    "order_id": "550e8400-e29b-41d4-a716-446655440000",
    "current_location": "Sangamner",
    "status": "out_for_delivery",
    "progress_percentage": 80.0,
    "next_location": "Delivered",
    "estimated_delivery": "2024-12-10T10:30:00Z",
    "created_at": "2024-12-05T10:30:00Z",
    "updated_at": "2024-12-09T10:30:00Z"
}))]
pub struct TrackingResponse {
    pub id: Uuid,
    /// Public tracking code
    pub tracking_id: String,
    pub order_id: Uuid,
    pub current_location: Waypoint,
    pub status: TrackingStatus,
    /// 0 at the first stop, 100 once delivered
    pub progress_percentage: f64,
    /// Following stop, absent once delivered
    pub next_location: Option<Waypoint>,
    pub estimated_delivery: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<TrackedShipment> for TrackingResponse {
    fn from(tracked: TrackedShipment) -> Self {
        let TrackedShipment { record, progress } = tracked;
        Self {
            id: record.id,
            tracking_id: record.tracking_id,
            order_id: record.order_id,
            current_location: record.current_location,
            status: record.status,
            progress_percentage: progress.percentage,
            next_location: progress.next_location,
            estimated_delivery: progress.estimated_delivery,
            created_at: record.created_at,
            updated_at: record.updated_at,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct RoutesResponse {
    /// Stops in travel order, ending with Delivered
    pub routes: Vec<Waypoint>,
    pub total_stops: usize,
}

pub fn tracking_routes() -> Router<AppState> {
    Router::new()
        .route("/create", post(create_tracking))
        .route("/update/:tracking_id", put(update_location))
        .route("/deliver/:tracking_id", put(mark_delivered))
        .route("/routes/list", get(list_routes))
        .route("/:tracking_id", get(get_tracking))
}

#[utoipa::path(
    post,
    path = "/track/create",
    request_body = CreateTrackingRequest,
    responses(
        (status = 201, description = "Tracking created", body = TrackingResponse),
        (status = 400, description = "Unknown location", body = crate::errors::ErrorResponse),
        (status = 404, description = "Order not found", body = crate::errors::ErrorResponse),
        (status = 409, description = "Order already tracked", body = crate::errors::ErrorResponse)
    ),
    tag = "tracking"
)]
pub async fn create_tracking(
    State(state): State<AppState>,
    Json(payload): Json<CreateTrackingRequest>,
) -> Result<(StatusCode, Json<TrackingResponse>), ServiceError> {
    let tracked = state
        .tracking_service()
        .create_tracking(payload.order_id, &payload.current_location)
        .await?;
    Ok(created(TrackingResponse::from(tracked)))
}

#[utoipa::path(
    put,
    path = "/track/update/:tracking_id",
    params(
        ("tracking_id" = String, Path, description = "Tracking code")
    ),
    request_body = UpdateLocationRequest,
    responses(
        (status = 200, description = "Location updated", body = TrackingResponse),
        (status = 400, description = "Unknown location or cancelled order", body = crate::errors::ErrorResponse),
        (status = 404, description = "Tracking not found", body = crate::errors::ErrorResponse)
    ),
    tag = "tracking"
)]
pub async fn update_location(
    State(state): State<AppState>,
    Path(tracking_id): Path<String>,
    Json(payload): Json<UpdateLocationRequest>,
) -> ApiResult<TrackingResponse> {
    let tracked = state
        .tracking_service()
        .update_location(&tracking_id, &payload.current_location)
        .await?;
    Ok(Json(tracked.into()))
}

#[utoipa::path(
    get,
    path = "/track/:tracking_id",
    params(
        ("tracking_id" = String, Path, description = "Tracking code")
    ),
    responses(
        (status = 200, description = "Tracking fetched", body = TrackingResponse),
        (status = 400, description = "Order is cancelled", body = crate::errors::ErrorResponse),
        (status = 404, description = "Tracking not found", body = crate::errors::ErrorResponse)
    ),
    tag = "tracking"
)]
pub async fn get_tracking(
    State(state): State<AppState>,
    Path(tracking_id): Path<String>,
) -> ApiResult<TrackingResponse> {
    let tracked = state.tracking_service().get_tracking(&tracking_id).await?;
    Ok(Json(tracked.into()))
}

#[utoipa::path(
    put,
    path = "/track/deliver/:tracking_id",
    params(
        ("tracking_id" = String, Path, description = "Tracking code")
    ),
    responses(
        (status = 200, description = "Shipment marked as delivered", body = TrackingResponse),
        (status = 404, description = "Tracking not found", body = crate::errors::ErrorResponse)
    ),
    tag = "tracking"
)]
pub async fn mark_delivered(
    State(state): State<AppState>,
    Path(tracking_id): Path<String>,
) -> ApiResult<TrackingResponse> {
    let tracked = state.tracking_service().mark_delivered(&tracking_id).await?;
    Ok(Json(tracked.into()))
}

#[utoipa::path(
    get,
    path = "/track/routes/list",
    responses(
        (status = 200, description = "Stops in travel order", body = RoutesResponse)
    ),
    tag = "tracking"
)]
pub async fn list_routes(State(state): State<AppState>) -> ApiResult<RoutesResponse> {
    let routes = state.tracking_service().list_routes();
    Ok(Json(RoutesResponse {
        total_stops: routes.len(),
        routes,
    }))
}
