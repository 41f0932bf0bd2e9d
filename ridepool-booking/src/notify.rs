use async_trait::async_trait;
use ridepool_domain::events::{ReservationCancelledEvent, ReservationConfirmedEvent};
use tracing::info;

/// Outbound notification seam for reservation lifecycle events.
///
/// Implementations stand in for the messaging/e-mail collaborators around
/// the core. Delivery is fire-and-forget: a failed notification must never
/// affect the booking outcome.
#[async_trait]
pub trait ReservationNotifier: Send + Sync {
    async fn reservation_confirmed(&self, event: &ReservationConfirmedEvent);

    async fn reservation_cancelled(&self, event: &ReservationCancelledEvent);
}

/// Notifier that records events on the log stream.
pub struct LogNotifier;

#[async_trait]
impl ReservationNotifier for LogNotifier {
    async fn reservation_confirmed(&self, event: &ReservationConfirmedEvent) {
        info!(
            "Reservation confirmed: ride {} passenger {} ({} seats left)",
            event.ride_id, event.passenger_id, event.seats_remaining
        );
    }

    async fn reservation_cancelled(&self, event: &ReservationCancelledEvent) {
        info!(
            "Reservation cancelled: ride {} passenger {} ({} seats left)",
            event.ride_id, event.passenger_id, event.seats_remaining
        );
    }
}
