use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Tracking API",
        version = "0.1.0",
        description = r#"
# Catalog, Orders and Shipment Tracking

Place orders against a product catalog and follow each shipment along a
fixed route of stops:

Manmad → Yeola → Kopargaon → Talegaon Dighe → Sangamner → Delivered

## Tracking

Every tracking response carries the progress derived from the current stop:
`progress_percentage` (0 at Manmad, 100 once delivered), the coarse `status`,
the `next_location`, and an `estimated_delivery` of one interval per stop
still ahead.

## Error Handling

Errors share one body:

```json
{
  "error": "Not Found",
  "message": "Not found: Tracking TRK4F7Q2Z9A not found",
  "request_id": "b0c6...",
  "timestamp": "2024-01-01T00:00:00Z"
}
```

## Pagination

List endpoints take `skip` and `limit` query parameters (limit capped at 100).
        "#,
        license(
            name = "MIT",
            url = "https://opensource.org/licenses/MIT"
        )
    ),
    servers(
        (url = "http://localhost:8000", description = "Local development")
    ),
    tags(
        (name = "tracking", description = "Shipment tracking along the fixed route"),
        (name = "products", description = "Product catalog"),
        (name = "orders", description = "Order placement and status"),
        (name = "health", description = "Health check endpoints")
    ),
    paths(
        // Tracking
        crate::handlers::tracking::create_tracking,
        crate::handlers::tracking::update_location,
        crate::handlers::tracking::get_tracking,
        crate::handlers::tracking::mark_delivered,
        crate::handlers::tracking::list_routes,

        // Products
        crate::handlers::products::create_product,
        crate::handlers::products::list_products,
        crate::handlers::products::get_product,
        crate::handlers::products::update_product,
        crate::handlers::products::delete_product,

        // Orders
        crate::handlers::orders::create_order,
        crate::handlers::orders::list_orders,
        crate::handlers::orders::get_order,
        crate::handlers::orders::update_order_status,

        // Health
        crate::health::simple_health_check,
    ),
    components(
        schemas(
            crate::errors::ErrorResponse,
            crate::entities::Waypoint,
            crate::entities::TrackingStatus,
            crate::entities::OrderStatus,
            crate::handlers::tracking::CreateTrackingRequest,
            crate::handlers::tracking::UpdateLocationRequest,
            crate::handlers::tracking::TrackingResponse,
            crate::handlers::tracking::RoutesResponse,
            crate::services::products::CreateProductRequest,
            crate::services::products::UpdateProductRequest,
            crate::handlers::products::ProductResponse,
            crate::services::orders::CreateOrderRequest,
            crate::services::orders::UpdateOrderStatusRequest,
            crate::handlers::orders::OrderResponse,
            crate::handlers::orders::OrderStatusUpdatedResponse,
            crate::health::HealthResponse,
        )
    )
)]
pub struct ApiDoc;

pub fn swagger_ui() -> SwaggerUi {
    SwaggerUi::new("/swagger-ui")
        .url("/api-docs/openapi.json", ApiDoc::openapi())
        .config(utoipa_swagger_ui::Config::from("/api-docs/openapi.json").try_it_out_enabled(true))
}
