pub mod notify;
pub mod service;

pub use notify::{LogNotifier, ReservationNotifier};
pub use service::{BookingError, BookingService};
