pub mod order;
pub mod order_tracking;
pub mod product;

pub use order::OrderStatus;
pub use order_tracking::{TrackingStatus, Waypoint};
