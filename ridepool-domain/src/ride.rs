use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::geo::GeoPoint;

/// A driver-published trip offer.
///
/// Route, schedule and capacity are fixed at creation. `seats_remaining` is
/// the single source of truth for availability and changes only through the
/// catalog's seat operations.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Ride {
    pub id: Uuid,
    pub driver_id: String,
    pub car_id: Option<Uuid>,
    pub source: String,
    pub source_coordinates: GeoPoint,
    pub destination: String,
    pub destination_coordinates: GeoPoint,
    pub date: NaiveDate,
    pub time: NaiveTime,
    pub total_seats: i32,
    pub seats_remaining: i32,
    pub price_per_seat: Option<f64>,
    pub created_at: DateTime<Utc>,
}

/// Input for publishing a ride.
#[derive(Debug, Clone, Deserialize)]
pub struct NewRide {
    pub driver_id: String,
    pub car_id: Option<Uuid>,
    pub source: String,
    pub source_coordinates: GeoPoint,
    pub destination: String,
    pub destination_coordinates: GeoPoint,
    pub date: NaiveDate,
    pub time: NaiveTime,
    pub total_seats: i32,
    pub price_per_seat: Option<f64>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn test_new_ride_deserialization() {
        let json = r#"
            {
                "driver_id": "driver-1",
                "car_id": null,
                "source": "San Marcos",
                "source_coordinates": { "lat": 29.88, "lng": -97.94 },
                "destination": "San Antonio",
                "destination_coordinates": { "lat": 29.42, "lng": -98.49 },
                "date": "2024-03-01",
                "time": "14:00:00",
                "total_seats": 3,
                "price_per_seat": 12.5
            }
        "#;
        let ride: NewRide = serde_json::from_str(json).expect("Failed to deserialize");
        assert_eq!(ride.driver_id, "driver-1");
        assert_eq!(ride.date, NaiveDate::from_ymd_opt(2024, 3, 1).unwrap());
        assert_eq!(ride.total_seats, 3);
        assert_eq!(ride.price_per_seat, Some(12.5));
    }
}
