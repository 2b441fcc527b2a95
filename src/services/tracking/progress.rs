use chrono::{DateTime, Duration, Utc};
use std::sync::Arc;

use super::{RouteTable, TrackingError};
use crate::entities::{TrackingStatus, Waypoint};

/// Everything derived from a waypoint at a given instant.
#[derive(Debug, Clone, PartialEq)]
pub struct ProgressSnapshot {
    pub location: Waypoint,
    pub status: TrackingStatus,
    pub percentage: f64,
    pub next_location: Option<Waypoint>,
    pub estimated_delivery: DateTime<Utc>,
}

/// Derives percentage, status, next stop and ETA from a position on the route.
#[derive(Debug, Clone)]
pub struct ProgressCalculator {
    route: Arc<RouteTable>,
    per_stop: Duration,
}

impl ProgressCalculator {
    pub fn new(route: Arc<RouteTable>, per_stop: Duration) -> Self {
        Self { route, per_stop }
    }

    /// One day per remaining stop.
    pub fn with_daily_stops(route: Arc<RouteTable>) -> Self {
        Self::new(route, Duration::days(1))
    }

    pub fn route(&self) -> &RouteTable {
        &self.route
    }

    fn position(&self, waypoint: Waypoint) -> Result<usize, TrackingError> {
        self.route
            .position(waypoint)
            .ok_or_else(|| TrackingError::InvalidWaypoint(waypoint.to_string()))
    }

    fn last_index(&self) -> usize {
        self.route.total_count().saturating_sub(1)
    }

    /// Completion in `[0, 100]`: first stop is 0, terminal stop is 100.
    pub fn percentage(&self, waypoint: Waypoint) -> Result<f64, TrackingError> {
        let position = self.position(waypoint)?;
        let last = self.last_index();
        if last == 0 {
            return Ok(100.0);
        }
        let pct = (position * 100) as f64 / last as f64;
        Ok(pct.clamp(0.0, 100.0))
    }

    pub fn status_for(&self, waypoint: Waypoint) -> Result<TrackingStatus, TrackingError> {
        let position = self.position(waypoint)?;
        let last = self.last_index();

        let status = if position >= last {
            TrackingStatus::Delivered
        } else if position == 0 {
            TrackingStatus::OrderPlaced
        } else if position + 1 == last {
            TrackingStatus::OutForDelivery
        } else {
            TrackingStatus::InTransit
        };
        Ok(status)
    }

    /// `now` plus one `per_stop` interval for every stop still ahead.
    pub fn estimated_delivery(
        &self,
        waypoint: Waypoint,
        now: DateTime<Utc>,
    ) -> Result<DateTime<Utc>, TrackingError> {
        let position = self.position(waypoint)?;
        let remaining = self.last_index().saturating_sub(position) as i32;
        Ok(now + self.per_stop * remaining)
    }

    pub fn next_location(&self, waypoint: Waypoint) -> Result<Option<Waypoint>, TrackingError> {
        self.position(waypoint)?;
        Ok(self.route.next_after(waypoint))
    }

    pub fn snapshot(
        &self,
        waypoint: Waypoint,
        now: DateTime<Utc>,
    ) -> Result<ProgressSnapshot, TrackingError> {
        Ok(ProgressSnapshot {
            location: waypoint,
            status: self.status_for(waypoint)?,
            percentage: self.percentage(waypoint)?,
            next_location: self.next_location(waypoint)?,
            estimated_delivery: self.estimated_delivery(waypoint, now)?,
        })
    }

    /// Resolves a display name first, so unknown names surface as
    /// `InvalidWaypoint` instead of a default.
    pub fn snapshot_for_name(
        &self,
        name: &str,
        now: DateTime<Utc>,
    ) -> Result<ProgressSnapshot, TrackingError> {
        let waypoint = self.route.resolve(name)?;
        self.snapshot(waypoint, now)
    }
}
