pub mod events;
pub mod geo;
pub mod reservation;
pub mod ride;

pub use geo::{GeoError, GeoPoint};
pub use reservation::{NewReservation, Reservation};
pub use ride::{NewRide, Ride};
