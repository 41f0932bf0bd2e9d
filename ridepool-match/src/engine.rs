use std::collections::HashSet;
use std::sync::Arc;

use chrono::{Duration, NaiveDateTime};
use ridepool_catalog::{RideCatalog, RideEndpoint};
use ridepool_domain::geo::{GeoError, GeoPoint};
use ridepool_domain::ride::Ride;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Search defaults; values come from configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchConfig {
    pub radius_miles: f64,
    pub window_hours: i64,
}

impl Default for MatchConfig {
    fn default() -> Self {
        Self {
            radius_miles: 5.0,
            window_hours: 2,
        }
    }
}

/// A passenger's search for candidate rides.
#[derive(Debug, Clone, Deserialize)]
pub struct MatchQuery {
    pub pickup: GeoPoint,
    pub dropoff: GeoPoint,
    pub departure_at: NaiveDateTime,
    pub radius_miles: Option<f64>,
    pub window_hours: Option<i64>,
}

/// A candidate ride together with the leg distances that ranked it.
#[derive(Debug, Clone, Serialize)]
pub struct RideMatch {
    pub ride: Ride,
    pub pickup_distance_miles: f64,
    pub dropoff_distance_miles: f64,
}

impl RideMatch {
    fn combined_distance(&self) -> f64 {
        self.pickup_distance_miles + self.dropoff_distance_miles
    }
}

/// Finds candidate rides for a pickup/drop-off pair around a departure time.
///
/// Reads are lock-free against the seat counters: a returned candidate may
/// sell out before the passenger reserves, and `reserve` re-validates.
pub struct MatchEngine {
    catalog: Arc<RideCatalog>,
    config: MatchConfig,
}

impl MatchEngine {
    pub fn new(catalog: Arc<RideCatalog>, config: MatchConfig) -> Self {
        Self { catalog, config }
    }

    /// Two-sided candidate search: the ride's source must lie within the
    /// radius of the pickup AND its destination within the radius of the
    /// drop-off.
    ///
    /// Time filtering compares time-of-day only, on the requested date. A
    /// window that crosses midnight is not unwrapped onto the neighboring
    /// day: its start falls after its end and the range admits nothing.
    ///
    /// An empty result is a valid no-match outcome, not an error.
    pub fn find_candidates(&self, query: &MatchQuery) -> Result<Vec<RideMatch>, GeoError> {
        query.pickup.validate()?;
        query.dropoff.validate()?;

        let radius = query.radius_miles.unwrap_or(self.config.radius_miles);
        let window = Duration::hours(query.window_hours.unwrap_or(self.config.window_hours));
        let window_start = query.departure_at - window;
        let window_end = query.departure_at + window;

        let near_pickup = self
            .catalog
            .near(query.pickup, radius, RideEndpoint::Source)?;
        let near_dropoff = self
            .catalog
            .near(query.dropoff, radius, RideEndpoint::Destination)?;
        let candidates: HashSet<_> = near_pickup.intersection(&near_dropoff).copied().collect();

        let mut matches: Vec<RideMatch> = candidates
            .into_iter()
            .filter_map(|id| self.catalog.get(id).ok())
            .filter(|ride| ride.date == query.departure_at.date())
            .filter(|ride| ride.time >= window_start.time() && ride.time <= window_end.time())
            .filter(|ride| ride.seats_remaining >= 1)
            .map(|ride| RideMatch {
                pickup_distance_miles: query.pickup.distance_miles(&ride.source_coordinates),
                dropoff_distance_miles: query.dropoff.distance_miles(&ride.destination_coordinates),
                ride,
            })
            .collect();

        matches.sort_by(|a, b| {
            a.combined_distance()
                .total_cmp(&b.combined_distance())
                .then_with(|| a.ride.time.cmp(&b.ride.time))
                .then_with(|| a.ride.id.cmp(&b.ride.id))
        });

        debug!("Search matched {} candidate rides", matches.len());
        Ok(matches)
    }
}
