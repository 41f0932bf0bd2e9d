use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use ridepool_booking::BookingError;
use ridepool_catalog::CatalogError;
use ridepool_domain::geo::GeoError;
use serde_json::json;

#[derive(Debug)]
pub enum AppError {
    Validation(String),
    NotFound(String),
    Conflict(String),
    Internal(anyhow::Error),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_message) = match self {
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, msg),
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            AppError::Conflict(msg) => (StatusCode::CONFLICT, msg),
            AppError::Internal(err) => {
                tracing::error!("Internal Server Error: {}", err);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal Server Error".to_string(),
                )
            }
        };

        let body = Json(json!({
            "error": error_message,
        }));

        (status, body).into_response()
    }
}

impl From<GeoError> for AppError {
    fn from(err: GeoError) -> Self {
        AppError::Validation(err.to_string())
    }
}

impl From<CatalogError> for AppError {
    fn from(err: CatalogError) -> Self {
        match err {
            CatalogError::NotFound(_) => AppError::NotFound(err.to_string()),
            CatalogError::SoldOut(_) => AppError::Conflict(err.to_string()),
            CatalogError::InvalidSeatCount(_) | CatalogError::InvalidCoordinate(_) => {
                AppError::Validation(err.to_string())
            }
            // A full counter on release is a broken invariant, not caller input.
            CatalogError::OverCapacity(_) => AppError::Internal(err.into()),
        }
    }
}

impl From<BookingError> for AppError {
    fn from(err: BookingError) -> Self {
        match err {
            BookingError::AlreadyBooked { .. } => AppError::Conflict(err.to_string()),
            BookingError::NotBooked { .. } => AppError::NotFound(err.to_string()),
            BookingError::InvalidCoordinate(_) => AppError::Validation(err.to_string()),
            BookingError::Catalog(inner) => inner.into(),
        }
    }
}
