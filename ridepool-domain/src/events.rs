use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct ReservationConfirmedEvent {
    pub ride_id: Uuid,
    pub passenger_id: String,
    pub seats_remaining: i32,
    pub reserved_at: i64,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct ReservationCancelledEvent {
    pub ride_id: Uuid,
    pub passenger_id: String,
    pub seats_remaining: i32,
    pub cancelled_at: i64,
}
