use sea_orm::DbErr;
use thiserror::Error;
use uuid::Uuid;

/// Failures raised by the tracking subsystem.
#[derive(Error, Debug)]
pub enum TrackingError {
    #[error("Invalid location '{0}': not a stop on the shipping route")]
    InvalidWaypoint(String),

    #[error("Order {0} not found")]
    OrderNotFound(Uuid),

    #[error("Tracking {0} not found")]
    TrackingNotFound(String),

    #[error("Order {0} is cancelled and is not trackable")]
    NotTrackable(Uuid),

    #[error("Tracking already exists for order {0}")]
    DuplicateTracking(Uuid),

    #[error("Could not allocate a unique tracking code after {0} attempts")]
    CodeSpaceExhausted(u32),

    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}
