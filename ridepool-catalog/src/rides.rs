use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicI32, Ordering};
use std::sync::{Arc, PoisonError, RwLock};

use chrono::Utc;
use ridepool_domain::geo::{GeoError, GeoPoint};
use ridepool_domain::ride::{NewRide, Ride};
use tracing::info;
use uuid::Uuid;

use crate::geo_index::{GeoIndex, RideEndpoint};

struct RideEntry {
    ride: Ride,
    seats_remaining: AtomicI32,
}

impl RideEntry {
    fn snapshot(&self) -> Ride {
        let mut ride = self.ride.clone();
        ride.seats_remaining = self.seats_remaining.load(Ordering::Acquire);
        ride
    }
}

/// Owns ride records and their live seat counters.
///
/// Every field except the counter is write-once at creation. The counter is
/// mutated only through `decrement_seats`/`increment_seats`, both
/// compare-and-swap loops, so concurrent bookings against the same ride are
/// totally ordered and can never drive it below zero or above capacity.
pub struct RideCatalog {
    rides: RwLock<HashMap<Uuid, Arc<RideEntry>>>,
    geo: RwLock<GeoIndex>,
}

impl RideCatalog {
    pub fn new() -> Self {
        Self {
            rides: RwLock::new(HashMap::new()),
            geo: RwLock::new(GeoIndex::new()),
        }
    }

    /// Store a new ride with a full seat counter and index its endpoints.
    /// All validation happens before any state is touched.
    pub fn create(&self, new_ride: NewRide) -> Result<Ride, CatalogError> {
        if new_ride.total_seats <= 0 {
            return Err(CatalogError::InvalidSeatCount(new_ride.total_seats));
        }
        new_ride.source_coordinates.validate()?;
        new_ride.destination_coordinates.validate()?;

        let ride = Ride {
            id: Uuid::new_v4(),
            driver_id: new_ride.driver_id,
            car_id: new_ride.car_id,
            source: new_ride.source,
            source_coordinates: new_ride.source_coordinates,
            destination: new_ride.destination,
            destination_coordinates: new_ride.destination_coordinates,
            date: new_ride.date,
            time: new_ride.time,
            total_seats: new_ride.total_seats,
            seats_remaining: new_ride.total_seats,
            price_per_seat: new_ride.price_per_seat,
            created_at: Utc::now(),
        };

        self.geo
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(
                ride.id,
                ride.source_coordinates,
                ride.destination_coordinates,
            )?;

        let entry = Arc::new(RideEntry {
            seats_remaining: AtomicI32::new(ride.total_seats),
            ride: ride.clone(),
        });
        self.rides
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(ride.id, entry);

        info!("Ride published: {} by driver {}", ride.id, ride.driver_id);
        Ok(ride)
    }

    /// Snapshot of a ride with its current seat count.
    pub fn get(&self, id: Uuid) -> Result<Ride, CatalogError> {
        self.entry(id).map(|entry| entry.snapshot())
    }

    /// A driver's published rides, most recent first.
    pub fn list_by_driver(&self, driver_id: &str) -> Vec<Ride> {
        let mut rides: Vec<Ride> = self
            .rides
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .values()
            .filter(|entry| entry.ride.driver_id == driver_id)
            .map(|entry| entry.snapshot())
            .collect();

        rides.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
        rides
    }

    /// Debit one seat. Returns the updated count, or `SoldOut` when the
    /// counter already reads zero.
    pub fn decrement_seats(&self, id: Uuid) -> Result<i32, CatalogError> {
        let entry = self.entry(id)?;
        let mut current = entry.seats_remaining.load(Ordering::Acquire);
        loop {
            if current <= 0 {
                return Err(CatalogError::SoldOut(id));
            }
            match entry.seats_remaining.compare_exchange(
                current,
                current - 1,
                Ordering::AcqRel,
                Ordering::Acquire,
            ) {
                Ok(_) => return Ok(current - 1),
                Err(observed) => current = observed,
            }
        }
    }

    /// Release one seat. Returns the updated count, or `OverCapacity` when
    /// the counter is already full — a broken pairing invariant, not a
    /// caller mistake.
    pub fn increment_seats(&self, id: Uuid) -> Result<i32, CatalogError> {
        let entry = self.entry(id)?;
        let mut current = entry.seats_remaining.load(Ordering::Acquire);
        loop {
            if current >= entry.ride.total_seats {
                return Err(CatalogError::OverCapacity(id));
            }
            match entry.seats_remaining.compare_exchange(
                current,
                current + 1,
                Ordering::AcqRel,
                Ordering::Acquire,
            ) {
                Ok(_) => return Ok(current + 1),
                Err(observed) => current = observed,
            }
        }
    }

    /// Proximity query against the ride index.
    pub fn near(
        &self,
        center: GeoPoint,
        radius_miles: f64,
        endpoint: RideEndpoint,
    ) -> Result<HashSet<Uuid>, GeoError> {
        self.geo
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .near(center, radius_miles, endpoint)
    }

    fn entry(&self, id: Uuid) -> Result<Arc<RideEntry>, CatalogError> {
        self.rides
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&id)
            .cloned()
            .ok_or(CatalogError::NotFound(id))
    }
}

impl Default for RideCatalog {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("Ride not found: {0}")]
    NotFound(Uuid),

    #[error("Ride sold out: {0}")]
    SoldOut(Uuid),

    #[error("Seat release would exceed capacity for ride {0}")]
    OverCapacity(Uuid),

    #[error("Total seats must be positive, got {0}")]
    InvalidSeatCount(i32),

    #[error(transparent)]
    InvalidCoordinate(#[from] GeoError),
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, NaiveTime};

    fn sample_ride(driver_id: &str, total_seats: i32) -> NewRide {
        NewRide {
            driver_id: driver_id.to_string(),
            car_id: None,
            source: "San Marcos".to_string(),
            source_coordinates: GeoPoint::new(29.88, -97.94),
            destination: "San Antonio".to_string(),
            destination_coordinates: GeoPoint::new(29.42, -98.49),
            date: NaiveDate::from_ymd_opt(2024, 3, 1).unwrap(),
            time: NaiveTime::from_hms_opt(14, 0, 0).unwrap(),
            total_seats,
            price_per_seat: Some(10.0),
        }
    }

    #[test]
    fn create_starts_with_a_full_counter() {
        let catalog = RideCatalog::new();
        let ride = catalog.create(sample_ride("driver-1", 3)).unwrap();

        assert_eq!(ride.total_seats, 3);
        assert_eq!(ride.seats_remaining, 3);
        assert_eq!(catalog.get(ride.id).unwrap().seats_remaining, 3);
    }

    #[test]
    fn create_rejects_non_positive_seat_counts() {
        let catalog = RideCatalog::new();
        assert!(matches!(
            catalog.create(sample_ride("driver-1", 0)),
            Err(CatalogError::InvalidSeatCount(0))
        ));
        assert!(matches!(
            catalog.create(sample_ride("driver-1", -2)),
            Err(CatalogError::InvalidSeatCount(-2))
        ));
    }

    #[test]
    fn create_rejects_malformed_coordinates() {
        let catalog = RideCatalog::new();
        let mut ride = sample_ride("driver-1", 2);
        ride.source_coordinates = GeoPoint::new(95.0, -97.94);

        assert!(matches!(
            catalog.create(ride),
            Err(CatalogError::InvalidCoordinate(_))
        ));
    }

    #[test]
    fn get_unknown_ride_is_not_found() {
        let catalog = RideCatalog::new();
        assert!(matches!(
            catalog.get(Uuid::new_v4()),
            Err(CatalogError::NotFound(_))
        ));
    }

    #[test]
    fn list_by_driver_returns_most_recent_first() {
        let catalog = RideCatalog::new();
        let first = catalog.create(sample_ride("driver-1", 2)).unwrap();
        let second = catalog.create(sample_ride("driver-1", 2)).unwrap();
        catalog.create(sample_ride("driver-2", 2)).unwrap();

        let rides = catalog.list_by_driver("driver-1");
        assert_eq!(rides.len(), 2);
        assert!(rides[0].created_at >= rides[1].created_at);
        let ids: Vec<Uuid> = rides.iter().map(|r| r.id).collect();
        assert!(ids.contains(&first.id));
        assert!(ids.contains(&second.id));
    }

    #[test]
    fn decrement_stops_at_zero_with_sold_out() {
        let catalog = RideCatalog::new();
        let ride = catalog.create(sample_ride("driver-1", 2)).unwrap();

        assert_eq!(catalog.decrement_seats(ride.id).unwrap(), 1);
        assert_eq!(catalog.decrement_seats(ride.id).unwrap(), 0);
        assert!(matches!(
            catalog.decrement_seats(ride.id),
            Err(CatalogError::SoldOut(_))
        ));
        assert_eq!(catalog.get(ride.id).unwrap().seats_remaining, 0);
    }

    #[test]
    fn increment_stops_at_capacity_with_over_capacity() {
        let catalog = RideCatalog::new();
        let ride = catalog.create(sample_ride("driver-1", 2)).unwrap();

        catalog.decrement_seats(ride.id).unwrap();
        assert_eq!(catalog.increment_seats(ride.id).unwrap(), 2);
        assert!(matches!(
            catalog.increment_seats(ride.id),
            Err(CatalogError::OverCapacity(_))
        ));
        assert_eq!(catalog.get(ride.id).unwrap().seats_remaining, 2);
    }

    #[test]
    fn created_rides_are_visible_to_proximity_queries() {
        let catalog = RideCatalog::new();
        let ride = catalog.create(sample_ride("driver-1", 2)).unwrap();

        let near_source = catalog
            .near(GeoPoint::new(29.89, -97.95), 5.0, RideEndpoint::Source)
            .unwrap();
        assert!(near_source.contains(&ride.id));
    }
}
