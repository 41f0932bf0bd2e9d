use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post},
    Extension, Json, Router,
};
use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use serde::Deserialize;
use uuid::Uuid;

use ridepool_domain::geo::GeoPoint;
use ridepool_domain::ride::{NewRide, Ride};
use ridepool_match::{MatchQuery, RideMatch};

use crate::error::AppError;
use crate::identity::CallerIdentity;
use crate::state::AppState;

// ============================================================================
// Request Types
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct CreateRideRequest {
    pub source: String,
    pub source_coordinates: GeoPoint,
    pub destination: String,
    pub destination_coordinates: GeoPoint,
    pub date: NaiveDate,
    pub time: NaiveTime,
    pub total_seats: i32,
    pub car_id: Option<Uuid>,
    pub price_per_seat: Option<f64>,
}

#[derive(Debug, Deserialize)]
pub struct SearchRidesRequest {
    pub pickup: GeoPoint,
    pub dropoff: GeoPoint,
    pub departure_at: NaiveDateTime,
    pub radius_miles: Option<f64>,
    pub window_hours: Option<i64>,
}

// ============================================================================
// Handlers
// ============================================================================

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/v1/rides", post(create_ride).get(list_my_rides))
        .route("/v1/rides/search", post(search_rides))
        .route("/v1/rides/{id}", get(get_ride))
}

/// POST /v1/rides
/// Publish a new ride for the authenticated driver.
async fn create_ride(
    State(state): State<AppState>,
    Extension(identity): Extension<CallerIdentity>,
    Json(req): Json<CreateRideRequest>,
) -> Result<(StatusCode, Json<Ride>), AppError> {
    let ride = state.catalog.create(NewRide {
        driver_id: identity.0,
        car_id: req.car_id,
        source: req.source,
        source_coordinates: req.source_coordinates,
        destination: req.destination,
        destination_coordinates: req.destination_coordinates,
        date: req.date,
        time: req.time,
        total_seats: req.total_seats,
        price_per_seat: req.price_per_seat,
    })?;

    Ok((StatusCode::CREATED, Json(ride)))
}

/// GET /v1/rides/{id}
async fn get_ride(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Ride>, AppError> {
    Ok(Json(state.catalog.get(id)?))
}

/// GET /v1/rides
/// The caller's published rides, most recent first.
async fn list_my_rides(
    State(state): State<AppState>,
    Extension(identity): Extension<CallerIdentity>,
) -> Json<Vec<Ride>> {
    Json(state.catalog.list_by_driver(&identity.0))
}

/// POST /v1/rides/search
/// Two-sided candidate search; an empty array is a valid no-match outcome.
async fn search_rides(
    State(state): State<AppState>,
    Json(req): Json<SearchRidesRequest>,
) -> Result<Json<Vec<RideMatch>>, AppError> {
    let matches = state.match_engine.find_candidates(&MatchQuery {
        pickup: req.pickup,
        dropoff: req.dropoff,
        departure_at: req.departure_at,
        radius_miles: req.radius_miles,
        window_hours: req.window_hours,
    })?;

    Ok(Json(matches))
}
