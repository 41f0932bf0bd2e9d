use std::sync::Arc;

use ridepool_booking::BookingService;
use ridepool_catalog::RideCatalog;
use ridepool_match::MatchEngine;

#[derive(Clone)]
pub struct AppState {
    pub catalog: Arc<RideCatalog>,
    pub match_engine: Arc<MatchEngine>,
    pub booking: Arc<BookingService>,
}
