//! Waypoint-based shipment tracking.
//!
//! A shipment moves along a fixed [`RouteTable`]. Progress, status, next stop
//! and the delivery estimate are all derived from the current position by the
//! [`ProgressCalculator`]; only the location and status are persisted.

mod error;
mod progress;
mod route;

pub use error::TrackingError;
pub use progress::{ProgressCalculator, ProgressSnapshot};
pub use route::RouteTable;

use chrono::Utc;
use rand::Rng;
use std::sync::Arc;
use tracing::{info, instrument, warn};
use uuid::Uuid;

use crate::entities::{order_tracking, OrderStatus, TrackingStatus, Waypoint};
use crate::repositories::{OrderStore, TrackingStore};

pub const TRACKING_CODE_PREFIX: &str = "TRK";
const TRACKING_CODE_LEN: usize = 8;
const TRACKING_CODE_CHARSET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";

/// Default number of attempts at finding an unused tracking code.
pub const DEFAULT_CODE_ATTEMPTS: u32 = 10;

/// A stored tracking record together with the values derived from it.
#[derive(Debug, Clone, PartialEq)]
pub struct TrackedShipment {
    pub record: order_tracking::Model,
    pub progress: ProgressSnapshot,
}

fn random_code() -> String {
    let mut rng = rand::thread_rng();
    let body: String = (0..TRACKING_CODE_LEN)
        .map(|_| {
            let idx = rng.gen_range(0..TRACKING_CODE_CHARSET.len());
            TRACKING_CODE_CHARSET[idx] as char
        })
        .collect();
    format!("{TRACKING_CODE_PREFIX}{body}")
}

/// Service for creating, advancing and reading shipment tracking records
#[derive(Clone)]
pub struct TrackingService {
    orders: Arc<dyn OrderStore>,
    records: Arc<dyn TrackingStore>,
    calculator: Arc<ProgressCalculator>,
    code_attempts: u32,
}

impl TrackingService {
    pub fn new(
        orders: Arc<dyn OrderStore>,
        records: Arc<dyn TrackingStore>,
        calculator: Arc<ProgressCalculator>,
    ) -> Self {
        Self {
            orders,
            records,
            calculator,
            code_attempts: DEFAULT_CODE_ATTEMPTS,
        }
    }

    pub fn with_code_attempts(mut self, attempts: u32) -> Self {
        self.code_attempts = attempts.max(1);
        self
    }

    pub fn route(&self) -> &RouteTable {
        self.calculator.route()
    }

    fn enrich(&self, record: order_tracking::Model) -> Result<TrackedShipment, TrackingError> {
        let progress = self
            .calculator
            .snapshot(record.current_location, Utc::now())?;
        Ok(TrackedShipment { record, progress })
    }

    async fn find_record(&self, code: &str) -> Result<order_tracking::Model, TrackingError> {
        self.records
            .find_by_code(code)
            .await?
            .ok_or_else(|| TrackingError::TrackingNotFound(code.to_string()))
    }

    /// Cancelled orders are no longer followed along the route. A record whose
    /// order row is gone is still served.
    async fn ensure_trackable(&self, record: &order_tracking::Model) -> Result<(), TrackingError> {
        let order = self.orders.get_order(record.order_id).await?;
        if matches!(order, Some(ref o) if o.status == OrderStatus::Cancelled) {
            warn!(tracking_id = %record.tracking_id, order_id = %record.order_id, "order is cancelled");
            return Err(TrackingError::NotTrackable(record.order_id));
        }
        Ok(())
    }

    async fn allocate_code(&self) -> Result<String, TrackingError> {
        for attempt in 1..=self.code_attempts {
            let code = random_code();
            if !self.records.code_exists(&code).await? {
                return Ok(code);
            }
            warn!(attempt, code = %code, "tracking code collision");
        }
        Err(TrackingError::CodeSpaceExhausted(self.code_attempts))
    }

    /// Starts tracking an existing order at `initial_location`.
    #[instrument(skip(self))]
    pub async fn create_tracking(
        &self,
        order_id: Uuid,
        initial_location: &str,
    ) -> Result<TrackedShipment, TrackingError> {
        if !self.orders.order_exists(order_id).await? {
            return Err(TrackingError::OrderNotFound(order_id));
        }
        if self.records.find_by_order(order_id).await?.is_some() {
            return Err(TrackingError::DuplicateTracking(order_id));
        }

        let location = self.route().resolve(initial_location)?;
        let status = self.calculator.status_for(location)?;
        let tracking_id = self.allocate_code().await?;

        let now = Utc::now();
        let record = order_tracking::Model {
            id: Uuid::new_v4(),
            tracking_id,
            order_id,
            current_location: location,
            status,
            created_at: now,
            updated_at: now,
        };
        let saved = self.records.save(record).await?;

        info!(
            tracking_id = %saved.tracking_id,
            order_id = %order_id,
            location = %location,
            "tracking created"
        );
        self.enrich(saved)
    }

    /// Moves a shipment to `new_location`. Any stop on the route is accepted,
    /// including earlier ones.
    #[instrument(skip(self))]
    pub async fn update_location(
        &self,
        tracking_id: &str,
        new_location: &str,
    ) -> Result<TrackedShipment, TrackingError> {
        let mut record = self.find_record(tracking_id).await?;
        let location = self.route().resolve(new_location)?;
        self.ensure_trackable(&record).await?;

        record.current_location = location;
        record.status = self.calculator.status_for(location)?;
        record.updated_at = Utc::now();
        let saved = self.records.save(record).await?;

        info!(tracking_id, location = %location, status = %saved.status, "tracking updated");
        self.enrich(saved)
    }

    /// Jumps straight to the terminal stop.
    #[instrument(skip(self))]
    pub async fn mark_delivered(&self, tracking_id: &str) -> Result<TrackedShipment, TrackingError> {
        let mut record = self.find_record(tracking_id).await?;

        record.current_location = self.route().terminal().unwrap_or(Waypoint::Delivered);
        record.status = TrackingStatus::Delivered;
        record.updated_at = Utc::now();
        let saved = self.records.save(record).await?;

        info!(tracking_id, "shipment delivered");
        self.enrich(saved)
    }

    #[instrument(skip(self))]
    pub async fn get_tracking(&self, tracking_id: &str) -> Result<TrackedShipment, TrackingError> {
        let record = self.find_record(tracking_id).await?;
        self.ensure_trackable(&record).await?;
        self.enrich(record)
    }

    pub fn list_routes(&self) -> Vec<Waypoint> {
        self.route().waypoints().to_vec()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repositories::{MockOrderStore, MockTrackingStore};
    use assert_matches::assert_matches;
    use mockall::predicate::eq;

    fn calculator() -> Arc<ProgressCalculator> {
        Arc::new(ProgressCalculator::with_daily_stops(Arc::new(
            RouteTable::standard(),
        )))
    }

    fn service(orders: MockOrderStore, records: MockTrackingStore) -> TrackingService {
        TrackingService::new(Arc::new(orders), Arc::new(records), calculator())
    }

    fn stored(order_id: Uuid, location: Waypoint, status: TrackingStatus) -> order_tracking::Model {
        let now = Utc::now();
        order_tracking::Model {
            id: Uuid::new_v4(),
            tracking_id: "TRKABC12345".into(),
            order_id,
            current_location: location,
            status,
            created_at: now,
            updated_at: now,
        }
    }

    fn order_with_status(id: Uuid, status: crate::entities::OrderStatus) -> crate::entities::order::Model {
        let now = Utc::now();
        crate::entities::order::Model {
            id,
            product_id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            status,
            created_at: now,
            updated_at: now,
        }
    }

    fn orders_in_status(status: crate::entities::OrderStatus) -> MockOrderStore {
        let mut orders = MockOrderStore::new();
        orders
            .expect_get_order()
            .returning(move |id| Ok(Some(order_with_status(id, status))));
        orders
    }

    #[test]
    fn random_codes_have_expected_shape() {
        for _ in 0..50 {
            let code = random_code();
            assert!(order_tracking::validate_tracking_code(&code).is_ok(), "{code}");
        }
    }

    #[tokio::test]
    async fn create_tracking_at_first_stop() {
        let order_id = Uuid::new_v4();
        let mut orders = MockOrderStore::new();
        orders
            .expect_order_exists()
            .with(eq(order_id))
            .returning(|_| Ok(true));

        let mut records = MockTrackingStore::new();
        records.expect_find_by_order().returning(|_| Ok(None));
        records.expect_code_exists().returning(|_| Ok(false));
        records.expect_save().times(1).returning(Ok);

        let tracked = service(orders, records)
            .create_tracking(order_id, "Manmad")
            .await
            .unwrap();

        assert_eq!(tracked.record.order_id, order_id);
        assert_eq!(tracked.record.current_location, Waypoint::Manmad);
        assert_eq!(tracked.record.status, TrackingStatus::OrderPlaced);
        assert!(tracked.record.tracking_id.starts_with(TRACKING_CODE_PREFIX));
        assert_eq!(tracked.progress.percentage, 0.0);
        assert_eq!(tracked.progress.next_location, Some(Waypoint::Yeola));
    }

    #[tokio::test]
    async fn create_tracking_for_missing_order_fails_first() {
        let mut orders = MockOrderStore::new();
        orders.expect_order_exists().returning(|_| Ok(false));
        let mut records = MockTrackingStore::new();
        records.expect_find_by_order().times(0);
        records.expect_save().times(0);

        let err = service(orders, records)
            .create_tracking(Uuid::new_v4(), "Nowhere")
            .await
            .unwrap_err();
        assert_matches!(err, TrackingError::OrderNotFound(_));
    }

    #[tokio::test]
    async fn create_tracking_twice_is_a_duplicate() {
        let order_id = Uuid::new_v4();
        let mut orders = MockOrderStore::new();
        orders.expect_order_exists().returning(|_| Ok(true));
        let mut records = MockTrackingStore::new();
        records
            .expect_find_by_order()
            .returning(move |id| Ok(Some(stored(id, Waypoint::Yeola, TrackingStatus::InTransit))));
        records.expect_save().times(0);

        let err = service(orders, records)
            .create_tracking(order_id, "Manmad")
            .await
            .unwrap_err();
        assert_matches!(err, TrackingError::DuplicateTracking(id) if id == order_id);
    }

    #[tokio::test]
    async fn create_tracking_rejects_unknown_location() {
        let mut orders = MockOrderStore::new();
        orders.expect_order_exists().returning(|_| Ok(true));
        let mut records = MockTrackingStore::new();
        records.expect_find_by_order().returning(|_| Ok(None));
        records.expect_save().times(0);

        let err = service(orders, records)
            .create_tracking(Uuid::new_v4(), "Pune")
            .await
            .unwrap_err();
        assert_matches!(err, TrackingError::InvalidWaypoint(name) if name == "Pune");
    }

    #[tokio::test]
    async fn code_allocation_retries_then_gives_up() {
        let mut orders = MockOrderStore::new();
        orders.expect_order_exists().returning(|_| Ok(true));
        let mut records = MockTrackingStore::new();
        records.expect_find_by_order().returning(|_| Ok(None));
        records.expect_code_exists().times(3).returning(|_| Ok(true));
        records.expect_save().times(0);

        let err = service(orders, records)
            .with_code_attempts(3)
            .create_tracking(Uuid::new_v4(), "Manmad")
            .await
            .unwrap_err();
        assert_matches!(err, TrackingError::CodeSpaceExhausted(3));
    }

    #[tokio::test]
    async fn update_location_recomputes_status() {
        let order_id = Uuid::new_v4();
        let mut records = MockTrackingStore::new();
        records
            .expect_find_by_code()
            .with(eq("TRKABC12345"))
            .returning(move |_| Ok(Some(stored(order_id, Waypoint::Manmad, TrackingStatus::OrderPlaced))));
        records.expect_save().times(1).returning(Ok);

        let tracked = service(orders_in_status(OrderStatus::Pending), records)
            .update_location("TRKABC12345", "Sangamner")
            .await
            .unwrap();

        assert_eq!(tracked.record.current_location, Waypoint::Sangamner);
        assert_eq!(tracked.record.status, TrackingStatus::OutForDelivery);
        assert_eq!(tracked.progress.percentage, 80.0);
        assert_eq!(tracked.progress.next_location, Some(Waypoint::Delivered));
    }

    #[tokio::test]
    async fn update_location_allows_moving_backwards() {
        let mut records = MockTrackingStore::new();
        records.expect_find_by_code().returning(|_| {
            Ok(Some(stored(
                Uuid::new_v4(),
                Waypoint::Sangamner,
                TrackingStatus::OutForDelivery,
            )))
        });
        records.expect_save().returning(Ok);

        let tracked = service(orders_in_status(OrderStatus::Shipped), records)
            .update_location("TRKABC12345", "Yeola")
            .await
            .unwrap();
        assert_eq!(tracked.record.status, TrackingStatus::InTransit);
        assert_eq!(tracked.progress.percentage, 20.0);
    }

    #[tokio::test]
    async fn update_location_with_unknown_waypoint_does_not_persist() {
        let mut records = MockTrackingStore::new();
        records.expect_find_by_code().returning(|_| {
            Ok(Some(stored(
                Uuid::new_v4(),
                Waypoint::Yeola,
                TrackingStatus::InTransit,
            )))
        });
        records.expect_save().times(0);

        let err = service(MockOrderStore::new(), records)
            .update_location("TRKABC12345", "Atlantis")
            .await
            .unwrap_err();
        assert_matches!(err, TrackingError::InvalidWaypoint(_));
    }

    #[tokio::test]
    async fn unknown_code_is_not_found_for_every_operation() {
        let mut records = MockTrackingStore::new();
        records.expect_find_by_code().returning(|_| Ok(None));
        records.expect_save().times(0);
        let svc = service(MockOrderStore::new(), records);

        assert_matches!(
            svc.update_location("TRKZZZZZZZZ", "Yeola").await,
            Err(TrackingError::TrackingNotFound(code)) if code == "TRKZZZZZZZZ"
        );
        assert_matches!(
            svc.mark_delivered("TRKZZZZZZZZ").await,
            Err(TrackingError::TrackingNotFound(_))
        );
        assert_matches!(
            svc.get_tracking("TRKZZZZZZZZ").await,
            Err(TrackingError::TrackingNotFound(_))
        );
    }

    #[tokio::test]
    async fn mark_delivered_is_unconditional() {
        let mut records = MockTrackingStore::new();
        records.expect_find_by_code().returning(|_| {
            Ok(Some(stored(
                Uuid::new_v4(),
                Waypoint::Manmad,
                TrackingStatus::OrderPlaced,
            )))
        });
        records.expect_save().times(1).returning(Ok);

        let tracked = service(MockOrderStore::new(), records)
            .mark_delivered("TRKABC12345")
            .await
            .unwrap();
        assert_eq!(tracked.record.current_location, Waypoint::Delivered);
        assert_eq!(tracked.record.status, TrackingStatus::Delivered);
        assert_eq!(tracked.progress.percentage, 100.0);
        assert_eq!(tracked.progress.next_location, None);
    }

    #[tokio::test]
    async fn database_failures_propagate() {
        let mut orders = MockOrderStore::new();
        orders
            .expect_order_exists()
            .returning(|_| Err(sea_orm::DbErr::Custom("pool closed".into())));

        let err = service(orders, MockTrackingStore::new())
            .create_tracking(Uuid::new_v4(), "Manmad")
            .await
            .unwrap_err();
        assert_matches!(err, TrackingError::Database(_));
    }

    #[tokio::test]
    async fn cancelled_order_is_not_trackable() {
        let order_id = Uuid::new_v4();
        let mut records = MockTrackingStore::new();
        records
            .expect_find_by_code()
            .returning(move |_| Ok(Some(stored(order_id, Waypoint::Yeola, TrackingStatus::InTransit))));
        records.expect_save().times(0);
        let svc = service(orders_in_status(OrderStatus::Cancelled), records);

        assert_matches!(
            svc.get_tracking("TRKABC12345").await,
            Err(TrackingError::NotTrackable(id)) if id == order_id
        );
        assert_matches!(
            svc.update_location("TRKABC12345", "Kopargaon").await,
            Err(TrackingError::NotTrackable(_))
        );
    }

    #[tokio::test]
    async fn record_without_order_row_is_still_served() {
        let mut orders = MockOrderStore::new();
        orders.expect_get_order().returning(|_| Ok(None));
        let mut records = MockTrackingStore::new();
        records.expect_find_by_code().returning(|_| {
            Ok(Some(stored(Uuid::new_v4(), Waypoint::Kopargaon, TrackingStatus::InTransit)))
        });

        let tracked = service(orders, records)
            .get_tracking("TRKABC12345")
            .await
            .unwrap();
        assert_eq!(tracked.progress.percentage, 40.0);
    }

    #[test]
    fn list_routes_returns_the_fixed_order() {
        let svc = service(MockOrderStore::new(), MockTrackingStore::new());
        let routes = svc.list_routes();
        assert_eq!(routes.len(), 6);
        assert_eq!(routes.first(), Some(&Waypoint::Manmad));
        assert_eq!(routes.last(), Some(&Waypoint::Delivered));
    }
}
