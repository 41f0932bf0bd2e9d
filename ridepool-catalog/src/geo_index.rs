use std::collections::{HashMap, HashSet};

use ridepool_domain::geo::{GeoError, GeoPoint};
use uuid::Uuid;

/// Which end of a ride a proximity query runs against.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RideEndpoint {
    Source,
    Destination,
}

/// In-memory spatial index over ride endpoints.
///
/// Source and destination points are held in separate maps so proximity can
/// be queried per endpoint; callers intersect the two result sets to get a
/// two-sided match.
#[derive(Debug, Default)]
pub struct GeoIndex {
    sources: HashMap<Uuid, GeoPoint>,
    destinations: HashMap<Uuid, GeoPoint>,
}

impl GeoIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record both endpoints of a ride. The index only ever holds
    /// well-formed points.
    pub fn insert(
        &mut self,
        ride_id: Uuid,
        source: GeoPoint,
        destination: GeoPoint,
    ) -> Result<(), GeoError> {
        source.validate()?;
        destination.validate()?;
        self.sources.insert(ride_id, source);
        self.destinations.insert(ride_id, destination);
        Ok(())
    }

    /// Every ride whose chosen endpoint lies within `radius_miles`
    /// great-circle distance of `center`. No side effects; fails only on a
    /// malformed center coordinate.
    pub fn near(
        &self,
        center: GeoPoint,
        radius_miles: f64,
        endpoint: RideEndpoint,
    ) -> Result<HashSet<Uuid>, GeoError> {
        center.validate()?;

        let points = match endpoint {
            RideEndpoint::Source => &self.sources,
            RideEndpoint::Destination => &self.destinations,
        };

        Ok(points
            .iter()
            .filter(|(_, point)| center.distance_miles(point) <= radius_miles)
            .map(|(id, _)| *id)
            .collect())
    }

    pub fn len(&self) -> usize {
        self.sources.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sources.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn near_filters_by_the_requested_endpoint() {
        let mut index = GeoIndex::new();
        let ride = Uuid::new_v4();
        index
            .insert(
                ride,
                GeoPoint::new(29.88, -97.94),
                GeoPoint::new(29.42, -98.49),
            )
            .unwrap();

        // Near the source, far from the destination.
        let center = GeoPoint::new(29.89, -97.95);

        let by_source = index.near(center, 5.0, RideEndpoint::Source).unwrap();
        assert!(by_source.contains(&ride));

        let by_destination = index.near(center, 5.0, RideEndpoint::Destination).unwrap();
        assert!(by_destination.is_empty());
    }

    #[test]
    fn near_excludes_points_outside_the_radius() {
        let mut index = GeoIndex::new();
        let ride = Uuid::new_v4();
        index
            .insert(
                ride,
                GeoPoint::new(29.88, -97.94),
                GeoPoint::new(29.42, -98.49),
            )
            .unwrap();

        // Roughly 20 miles north of the source.
        let far = GeoPoint::new(30.17, -97.94);
        let result = index.near(far, 5.0, RideEndpoint::Source).unwrap();
        assert!(result.is_empty());
    }

    #[test]
    fn near_rejects_a_malformed_center() {
        let index = GeoIndex::new();
        let result = index.near(GeoPoint::new(91.0, 0.0), 5.0, RideEndpoint::Source);
        assert!(matches!(
            result,
            Err(GeoError::InvalidCoordinate { .. })
        ));
    }

    #[test]
    fn insert_rejects_malformed_points() {
        let mut index = GeoIndex::new();
        let result = index.insert(
            Uuid::new_v4(),
            GeoPoint::new(0.0, 200.0),
            GeoPoint::new(29.42, -98.49),
        );
        assert!(result.is_err());
        assert!(index.is_empty());
    }
}
