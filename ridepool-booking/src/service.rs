use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError, RwLock};

use chrono::Utc;
use ridepool_catalog::{CatalogError, RideCatalog};
use ridepool_domain::events::{ReservationCancelledEvent, ReservationConfirmedEvent};
use ridepool_domain::geo::GeoError;
use ridepool_domain::reservation::{NewReservation, Reservation};
use tracing::{error, info};
use uuid::Uuid;

use crate::notify::ReservationNotifier;

type ReservationKey = (Uuid, String);

/// Performs the atomic seat-reservation and cancellation transactions.
///
/// Per reservation the state machine is `{absent} -> reserve() -> {active}
/// -> cancel() -> {absent}`; a new reserve after a cancel creates a fresh
/// record. Each reserve/cancel acquires an exclusive section scoped to the
/// ride, so the seat counter and the reservation set change together or not
/// at all. Operations on different rides never block each other.
pub struct BookingService {
    catalog: Arc<RideCatalog>,
    notifier: Arc<dyn ReservationNotifier>,
    reservations: RwLock<HashMap<ReservationKey, Reservation>>,
    ride_locks: Mutex<HashMap<Uuid, Arc<tokio::sync::Mutex<()>>>>,
}

impl BookingService {
    pub fn new(catalog: Arc<RideCatalog>, notifier: Arc<dyn ReservationNotifier>) -> Self {
        Self {
            catalog,
            notifier,
            reservations: RwLock::new(HashMap::new()),
            ride_locks: Mutex::new(HashMap::new()),
        }
    }

    /// Reserve one seat on `ride_id` for `passenger_id`.
    ///
    /// Validation happens before any mutation. Inside the ride's exclusive
    /// section the duplicate check, the seat debit and the reservation
    /// insert run as one unit; the debit is the only fallible step, so a
    /// `SoldOut` leaves no partial state. `SoldOut` at commit time is
    /// surfaced to the caller, never retried here.
    pub async fn reserve(
        &self,
        ride_id: Uuid,
        passenger_id: &str,
        details: NewReservation,
    ) -> Result<Reservation, BookingError> {
        details.pickup_coordinates.validate()?;
        details.drop_off_coordinates.validate()?;
        self.catalog.get(ride_id)?;

        let lock = self.ride_lock(ride_id);
        let guard = lock.lock().await;

        let key = (ride_id, passenger_id.to_string());
        if self
            .reservations
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .contains_key(&key)
        {
            return Err(BookingError::AlreadyBooked {
                ride_id,
                passenger_id: passenger_id.to_string(),
            });
        }

        let seats_remaining = self.catalog.decrement_seats(ride_id)?;

        let reservation = Reservation {
            id: Uuid::new_v4(),
            ride_id,
            passenger_id: passenger_id.to_string(),
            pickup_location: details.pickup_location,
            pickup_coordinates: details.pickup_coordinates,
            drop_off_location: details.drop_off_location,
            drop_off_coordinates: details.drop_off_coordinates,
            pickup_time: details.pickup_time,
            created_at: Utc::now(),
        };
        self.reservations
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(key, reservation.clone());
        drop(guard);

        let event = ReservationConfirmedEvent {
            ride_id,
            passenger_id: reservation.passenger_id.clone(),
            seats_remaining,
            reserved_at: reservation.created_at.timestamp(),
        };
        self.notifier.reservation_confirmed(&event).await;

        info!(
            "Reservation {} confirmed for ride {} ({} seats left)",
            reservation.id, ride_id, seats_remaining
        );
        Ok(reservation)
    }

    /// Cancel the passenger's active reservation, releasing its seat.
    ///
    /// Fails with `NotBooked` when no active reservation exists for the
    /// pair, so a second cancel in a row is a clean error, not a double
    /// release.
    pub async fn cancel(&self, ride_id: Uuid, passenger_id: &str) -> Result<(), BookingError> {
        self.catalog.get(ride_id)?;

        let lock = self.ride_lock(ride_id);
        let guard = lock.lock().await;

        let key = (ride_id, passenger_id.to_string());
        let removed = self
            .reservations
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(&key)
            .ok_or_else(|| BookingError::NotBooked {
                ride_id,
                passenger_id: passenger_id.to_string(),
            })?;

        let seats_remaining = match self.catalog.increment_seats(ride_id) {
            Ok(count) => count,
            Err(err) => {
                // A full counter here means the pairing invariant was
                // already broken. Restore the record and surface it.
                error!("Seat release failed for ride {}: {}", ride_id, err);
                self.reservations
                    .write()
                    .unwrap_or_else(PoisonError::into_inner)
                    .insert(key, removed);
                return Err(err.into());
            }
        };
        drop(guard);

        let event = ReservationCancelledEvent {
            ride_id,
            passenger_id: passenger_id.to_string(),
            seats_remaining,
            cancelled_at: Utc::now().timestamp(),
        };
        self.notifier.reservation_cancelled(&event).await;

        info!(
            "Reservation cancelled for ride {} ({} seats left)",
            ride_id, seats_remaining
        );
        Ok(())
    }

    /// The passenger's active reservation on a ride, if any.
    pub fn reservation_for(&self, ride_id: Uuid, passenger_id: &str) -> Option<Reservation> {
        self.reservations
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&(ride_id, passenger_id.to_string()))
            .cloned()
    }

    /// Active reservations on a ride, most recent first.
    pub fn reservations_for_ride(&self, ride_id: Uuid) -> Vec<Reservation> {
        let mut reservations: Vec<Reservation> = self
            .reservations
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .values()
            .filter(|reservation| reservation.ride_id == ride_id)
            .cloned()
            .collect();
        reservations.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
        reservations
    }

    /// A passenger's active reservations across all rides, most recent first.
    pub fn reservations_for_passenger(&self, passenger_id: &str) -> Vec<Reservation> {
        let mut reservations: Vec<Reservation> = self
            .reservations
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .values()
            .filter(|reservation| reservation.passenger_id == passenger_id)
            .cloned()
            .collect();
        reservations.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
        reservations
    }

    fn ride_lock(&self, ride_id: Uuid) -> Arc<tokio::sync::Mutex<()>> {
        self.ride_locks
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .entry(ride_id)
            .or_insert_with(|| Arc::new(tokio::sync::Mutex::new(())))
            .clone()
    }
}

#[derive(Debug, thiserror::Error)]
pub enum BookingError {
    #[error("Passenger {passenger_id} already has a seat on ride {ride_id}")]
    AlreadyBooked { ride_id: Uuid, passenger_id: String },

    #[error("No active reservation for passenger {passenger_id} on ride {ride_id}")]
    NotBooked { ride_id: Uuid, passenger_id: String },

    #[error(transparent)]
    Catalog(#[from] CatalogError),

    #[error(transparent)]
    InvalidCoordinate(#[from] GeoError),
}
