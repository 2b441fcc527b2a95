// Catalog and order placement
pub mod orders;
pub mod products;

// Waypoint shipment tracking
pub mod tracking;
