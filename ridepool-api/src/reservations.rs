use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{delete, post},
    Extension, Json, Router,
};
use chrono::NaiveDateTime;
use serde::Deserialize;
use uuid::Uuid;

use ridepool_domain::geo::GeoPoint;
use ridepool_domain::reservation::{NewReservation, Reservation};

use crate::error::AppError;
use crate::identity::CallerIdentity;
use crate::state::AppState;

// ============================================================================
// Request Types
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct CreateReservationRequest {
    pub ride_id: Uuid,
    pub pickup_location: String,
    pub pickup_coordinates: GeoPoint,
    pub drop_off_location: String,
    pub drop_off_coordinates: GeoPoint,
    pub pickup_time: NaiveDateTime,
}

// ============================================================================
// Handlers
// ============================================================================

pub fn routes() -> Router<AppState> {
    Router::new()
        .route(
            "/v1/reservations",
            post(create_reservation).get(list_my_reservations),
        )
        .route("/v1/reservations/{ride_id}", delete(cancel_reservation))
}

/// POST /v1/reservations
/// Reserve one seat on a ride for the authenticated passenger.
async fn create_reservation(
    State(state): State<AppState>,
    Extension(identity): Extension<CallerIdentity>,
    Json(req): Json<CreateReservationRequest>,
) -> Result<(StatusCode, Json<Reservation>), AppError> {
    let reservation = state
        .booking
        .reserve(
            req.ride_id,
            &identity.0,
            NewReservation {
                pickup_location: req.pickup_location,
                pickup_coordinates: req.pickup_coordinates,
                drop_off_location: req.drop_off_location,
                drop_off_coordinates: req.drop_off_coordinates,
                pickup_time: req.pickup_time,
            },
        )
        .await?;

    Ok((StatusCode::CREATED, Json(reservation)))
}

/// DELETE /v1/reservations/{ride_id}
/// Cancel the caller's active reservation on a ride.
async fn cancel_reservation(
    State(state): State<AppState>,
    Extension(identity): Extension<CallerIdentity>,
    Path(ride_id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    state.booking.cancel(ride_id, &identity.0).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// GET /v1/reservations
/// The caller's reservations, most recent first.
async fn list_my_reservations(
    State(state): State<AppState>,
    Extension(identity): Extension<CallerIdentity>,
) -> Json<Vec<Reservation>> {
    Json(state.booking.reservations_for_passenger(&identity.0))
}
