use std::net::SocketAddr;
use std::sync::Arc;

use ridepool_api::{app, app_config::Config, AppState};
use ridepool_booking::{BookingService, LogNotifier};
use ridepool_catalog::RideCatalog;
use ridepool_match::MatchEngine;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "ridepool_api=debug,tower_http=debug,axum::rejection=trace".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::load().expect("Failed to load config");
    tracing::info!("Starting Ridepool API on port {}", config.server.port);

    let catalog = Arc::new(RideCatalog::new());
    let match_engine = Arc::new(MatchEngine::new(catalog.clone(), config.matching.clone()));
    let booking = Arc::new(BookingService::new(catalog.clone(), Arc::new(LogNotifier)));

    let state = AppState {
        catalog,
        match_engine,
        booking,
    };
    let app = app(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.server.port));
    tracing::info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind listener");
    axum::serve(listener, app).await.expect("Server error");
}
