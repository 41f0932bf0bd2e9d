use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::geo::GeoPoint;

/// A passenger's claim on one seat of a ride.
///
/// An active reservation implies exactly one seat was debited from the
/// owning ride; at most one active reservation exists per (ride, passenger)
/// pair.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Reservation {
    pub id: Uuid,
    pub ride_id: Uuid,
    pub passenger_id: String,
    pub pickup_location: String,
    pub pickup_coordinates: GeoPoint,
    pub drop_off_location: String,
    pub drop_off_coordinates: GeoPoint,
    pub pickup_time: NaiveDateTime,
    pub created_at: DateTime<Utc>,
}

/// Input for reserving a seat.
#[derive(Debug, Clone, Deserialize)]
pub struct NewReservation {
    pub pickup_location: String,
    pub pickup_coordinates: GeoPoint,
    pub drop_off_location: String,
    pub drop_off_coordinates: GeoPoint,
    pub pickup_time: NaiveDateTime,
}
