use axum::{http::StatusCode, Json};
use serde::{Deserialize, Serialize};
use utoipa::IntoParams;

/// Upper bound on any single page.
pub const MAX_PAGE_SIZE: u64 = 100;

/// Standard created response
pub fn created<T: Serialize>(data: T) -> (StatusCode, Json<T>) {
    (StatusCode::CREATED, Json(data))
}

/// Offset pagination for list operations
#[derive(Debug, Default, Clone, Deserialize, Serialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct SkipLimitParams {
    /// Number of records to skip
    pub skip: Option<u64>,
    /// Maximum number of records to return (capped at 100)
    pub limit: Option<u64>,
}

impl SkipLimitParams {
    /// Resolves `(skip, limit)` with the endpoint's default limit.
    pub fn resolve(&self, default_limit: u64) -> (u64, u64) {
        let skip = self.skip.unwrap_or(0);
        let limit = self.limit.unwrap_or(default_limit).clamp(1, MAX_PAGE_SIZE);
        (skip, limit)
    }
}
