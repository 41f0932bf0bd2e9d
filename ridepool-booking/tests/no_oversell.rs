use std::sync::Arc;

use chrono::{NaiveDate, NaiveTime};
use ridepool_booking::{BookingError, BookingService, LogNotifier};
use ridepool_catalog::{CatalogError, RideCatalog};
use ridepool_domain::geo::GeoPoint;
use ridepool_domain::reservation::NewReservation;
use ridepool_domain::ride::NewRide;

fn sample_ride(total_seats: i32) -> NewRide {
    NewRide {
        driver_id: "driver-1".to_string(),
        car_id: None,
        source: "San Marcos".to_string(),
        source_coordinates: GeoPoint::new(29.88, -97.94),
        destination: "San Antonio".to_string(),
        destination_coordinates: GeoPoint::new(29.42, -98.49),
        date: NaiveDate::from_ymd_opt(2024, 3, 1).unwrap(),
        time: NaiveTime::from_hms_opt(14, 0, 0).unwrap(),
        total_seats,
        price_per_seat: None,
    }
}

fn sample_details() -> NewReservation {
    NewReservation {
        pickup_location: "Campus".to_string(),
        pickup_coordinates: GeoPoint::new(29.89, -97.95),
        drop_off_location: "Downtown".to_string(),
        drop_off_coordinates: GeoPoint::new(29.43, -98.48),
        pickup_time: "2024-03-01T13:30:00".parse().unwrap(),
    }
}

#[tokio::test(flavor = "multi_thread", worker_threads = 8)]
async fn concurrent_reserves_never_oversell() {
    let catalog = Arc::new(RideCatalog::new());
    let booking = Arc::new(BookingService::new(catalog.clone(), Arc::new(LogNotifier)));
    let ride = catalog.create(sample_ride(3)).unwrap();

    let mut tasks = tokio::task::JoinSet::new();
    for i in 0..8 {
        let booking = booking.clone();
        let ride_id = ride.id;
        tasks.spawn(async move {
            booking
                .reserve(ride_id, &format!("passenger-{i}"), sample_details())
                .await
        });
    }

    let mut successes = 0;
    let mut sold_out = 0;
    while let Some(result) = tasks.join_next().await {
        match result.expect("task panicked") {
            Ok(_) => successes += 1,
            Err(BookingError::Catalog(CatalogError::SoldOut(_))) => sold_out += 1,
            Err(other) => panic!("unexpected error: {other}"),
        }
    }

    assert_eq!(successes, 3);
    assert_eq!(sold_out, 5);

    let snapshot = catalog.get(ride.id).unwrap();
    assert_eq!(snapshot.seats_remaining, 0);
    assert_eq!(booking.reservations_for_ride(ride.id).len(), 3);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 8)]
async fn counter_stays_in_bounds_under_churn() {
    let catalog = Arc::new(RideCatalog::new());
    let booking = Arc::new(BookingService::new(catalog.clone(), Arc::new(LogNotifier)));
    let ride = catalog.create(sample_ride(2)).unwrap();

    // Many passengers repeatedly grabbing and releasing two seats.
    let mut tasks = tokio::task::JoinSet::new();
    for i in 0..6 {
        let booking = booking.clone();
        let ride_id = ride.id;
        tasks.spawn(async move {
            let passenger = format!("passenger-{i}");
            for _ in 0..10 {
                match booking.reserve(ride_id, &passenger, sample_details()).await {
                    Ok(_) => booking.cancel(ride_id, &passenger).await.expect("cancel"),
                    Err(BookingError::Catalog(CatalogError::SoldOut(_))) => {}
                    Err(other) => panic!("unexpected error: {other}"),
                }
            }
        });
    }
    while let Some(result) = tasks.join_next().await {
        result.expect("task panicked");
    }

    let snapshot = catalog.get(ride.id).unwrap();
    let active = booking.reservations_for_ride(ride.id).len() as i32;
    assert_eq!(active, 0);
    assert_eq!(snapshot.seats_remaining, snapshot.total_seats);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn contention_is_scoped_per_ride() {
    let catalog = Arc::new(RideCatalog::new());
    let booking = Arc::new(BookingService::new(catalog.clone(), Arc::new(LogNotifier)));
    let first = catalog.create(sample_ride(4)).unwrap();
    let second = catalog.create(sample_ride(4)).unwrap();

    let mut tasks = tokio::task::JoinSet::new();
    for i in 0..4 {
        for ride_id in [first.id, second.id] {
            let booking = booking.clone();
            tasks.spawn(async move {
                booking
                    .reserve(ride_id, &format!("passenger-{i}"), sample_details())
                    .await
            });
        }
    }
    while let Some(result) = tasks.join_next().await {
        result.expect("task panicked").expect("reserve");
    }

    assert_eq!(catalog.get(first.id).unwrap().seats_remaining, 0);
    assert_eq!(catalog.get(second.id).unwrap().seats_remaining, 0);
}
