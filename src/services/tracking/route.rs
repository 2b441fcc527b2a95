use crate::entities::Waypoint;
use sea_orm::Iterable;
use std::str::FromStr;

use super::TrackingError;

/// The ordered, immutable list of stops a shipment passes through.
///
/// Built once at startup and shared behind an `Arc`. The last entry is the
/// terminal `Delivered` marker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteTable {
    stops: Vec<Waypoint>,
}

impl Default for RouteTable {
    fn default() -> Self {
        Self::standard()
    }
}

impl RouteTable {
    /// Manmad, Yeola, Kopargaon, Talegaon Dighe, Sangamner, Delivered.
    pub fn standard() -> Self {
        Self {
            stops: Waypoint::iter().collect(),
        }
    }

    /// Parses a display name into a waypoint that is on this route.
    pub fn resolve(&self, name: &str) -> Result<Waypoint, TrackingError> {
        Waypoint::from_str(name)
            .ok()
            .filter(|w| self.stops.contains(w))
            .ok_or_else(|| TrackingError::InvalidWaypoint(name.to_string()))
    }

    /// Zero-based index of `name` on the route.
    pub fn position_of(&self, name: &str) -> Result<usize, TrackingError> {
        let waypoint = self.resolve(name)?;
        self.position(waypoint)
            .ok_or_else(|| TrackingError::InvalidWaypoint(name.to_string()))
    }

    pub fn position(&self, waypoint: Waypoint) -> Option<usize> {
        self.stops.iter().position(|w| *w == waypoint)
    }

    pub fn total_count(&self) -> usize {
        self.stops.len()
    }

    pub fn is_terminal(&self, waypoint: Waypoint) -> bool {
        self.stops.last() == Some(&waypoint)
    }

    pub fn waypoints(&self) -> &[Waypoint] {
        &self.stops
    }

    pub fn first(&self) -> Option<Waypoint> {
        self.stops.first().copied()
    }

    pub fn terminal(&self) -> Option<Waypoint> {
        self.stops.last().copied()
    }

    /// The stop after `waypoint`, or `None` at the end of the route.
    pub fn next_after(&self, waypoint: Waypoint) -> Option<Waypoint> {
        self.position(waypoint)
            .and_then(|idx| self.stops.get(idx + 1))
            .copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    #[test]
    fn standard_route_has_six_stops_in_order() {
        let route = RouteTable::standard();
        let names: Vec<String> = route.waypoints().iter().map(|w| w.to_string()).collect();
        assert_eq!(
            names,
            vec![
                "Manmad",
                "Yeola",
                "Kopargaon",
                "Talegaon Dighe",
                "Sangamner",
                "Delivered"
            ]
        );
        assert_eq!(route.total_count(), 6);
        assert_eq!(route.first(), Some(Waypoint::Manmad));
        assert_eq!(route.terminal(), Some(Waypoint::Delivered));
    }

    #[test]
    fn position_of_is_exact_and_case_sensitive() {
        let route = RouteTable::standard();
        assert_eq!(route.position_of("Manmad").unwrap(), 0);
        assert_eq!(route.position_of("Talegaon Dighe").unwrap(), 3);
        assert_eq!(route.position_of("Delivered").unwrap(), 5);
        assert_matches!(
            route.position_of("manmad"),
            Err(TrackingError::InvalidWaypoint(name)) if name == "manmad"
        );
        assert_matches!(
            route.position_of("Pune"),
            Err(TrackingError::InvalidWaypoint(_))
        );
    }

    #[test]
    fn only_delivered_is_terminal() {
        let route = RouteTable::standard();
        for waypoint in route.waypoints() {
            assert_eq!(
                route.is_terminal(*waypoint),
                *waypoint == Waypoint::Delivered
            );
        }
    }

    #[test]
    fn next_after_walks_the_route() {
        let route = RouteTable::standard();
        assert_eq!(route.next_after(Waypoint::Manmad), Some(Waypoint::Yeola));
        assert_eq!(
            route.next_after(Waypoint::Sangamner),
            Some(Waypoint::Delivered)
        );
        assert_eq!(route.next_after(Waypoint::Delivered), None);
    }
}
