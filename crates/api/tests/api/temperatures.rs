use crate::helpers::{spawn_app, MockObservationStore};
use axum::{
    body::{to_bytes, Body},
    http::Request,
};
use climate_api::{DailyTemperature, ErrorResponse, TemperatureSummary, TobsResponse};
use hyper::Method;
use serde_json::from_slice;
use std::collections::BTreeMap;
use std::sync::Arc;
use tower::ServiceExt;

fn daily(date: &str, tmin: f64, tavg: f64, tmax: f64) -> DailyTemperature {
    DailyTemperature {
        date: date.to_string(),
        tmin: Some(tmin),
        tavg: Some(tavg),
        tmax: Some(tmax),
    }
}

#[tokio::test]
async fn tobs_projects_the_most_active_station_over_the_trailing_year() {
    let mut store = MockObservationStore::new();
    store
        .expect_most_active_station()
        .times(1)
        .returning(|| Ok(Some(String::from("USC00519281"))));
    store
        .expect_max_observation_date()
        .times(1)
        .returning(|| Ok(Some(String::from("2017-08-23"))));
    store
        .expect_temperatures_since()
        .withf(|station, start| station == "USC00519281" && start == "2016-08-23")
        .times(1)
        .returning(|_, _| Ok(vec![Some(77.0), None, Some(80.0)]));

    let test_app = spawn_app(Arc::new(store)).await;

    let request = Request::builder()
        .method(Method::GET)
        .uri("/api/v1.0/tobs")
        .body(Body::empty())
        .unwrap();

    let response = test_app
        .app
        .oneshot(request)
        .await
        .expect("Failed to execute request.");
    assert!(response.status().is_success());

    let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let res: TobsResponse = from_slice(&body).unwrap();
    // unrecorded readings pass through as nulls, one entry per row
    assert_eq!(res.temp_observations, vec![Some(77.0), None, Some(80.0)]);
}

#[tokio::test]
async fn tobs_with_no_observations_is_a_server_error() {
    let mut store = MockObservationStore::new();
    store
        .expect_most_active_station()
        .times(1)
        .returning(|| Ok(None));

    let test_app = spawn_app(Arc::new(store)).await;

    let request = Request::builder()
        .method(Method::GET)
        .uri("/api/v1.0/tobs")
        .body(Body::empty())
        .unwrap();

    let response = test_app
        .app
        .oneshot(request)
        .await
        .expect("Failed to execute request.");
    assert!(response.status().is_server_error());
}

#[tokio::test]
async fn temp_range_rejects_a_malformed_start_date() {
    // no store expectations: validation fails before any query runs
    let store = MockObservationStore::new();
    let test_app = spawn_app(Arc::new(store)).await;

    let request = Request::builder()
        .method(Method::GET)
        .uri("/api/v1.0/not-a-date")
        .body(Body::empty())
        .unwrap();

    let response = test_app
        .app
        .oneshot(request)
        .await
        .expect("Failed to execute request.");
    assert_eq!(response.status().as_u16(), 400);

    let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let res: ErrorResponse = from_slice(&body).unwrap();
    assert_eq!(
        res.error,
        "Date value must be in 'YYYY-MM-DD' format or date entered is invalid."
    );
}

#[tokio::test]
async fn temp_range_rejects_an_impossible_calendar_date() {
    let store = MockObservationStore::new();
    let test_app = spawn_app(Arc::new(store)).await;

    let request = Request::builder()
        .method(Method::GET)
        .uri("/api/v1.0/2017-02-30")
        .body(Body::empty())
        .unwrap();

    let response = test_app
        .app
        .oneshot(request)
        .await
        .expect("Failed to execute request.");
    assert_eq!(response.status().as_u16(), 400);
}

#[tokio::test]
async fn temp_range_rejects_start_after_end() {
    let store = MockObservationStore::new();
    let test_app = spawn_app(Arc::new(store)).await;

    let request = Request::builder()
        .method(Method::GET)
        .uri("/api/v1.0/2017-01-01/2016-01-01")
        .body(Body::empty())
        .unwrap();

    let response = test_app
        .app
        .oneshot(request)
        .await
        .expect("Failed to execute request.");
    assert_eq!(response.status().as_u16(), 400);

    let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let res: ErrorResponse = from_slice(&body).unwrap();
    assert_eq!(res.error, "Start date value must be before end date.");
}

#[tokio::test]
async fn temp_range_groups_aggregates_by_date() {
    let mut store = MockObservationStore::new();
    store
        .expect_daily_temperature_stats()
        .withf(|start, end| start == "2017-01-01" && *end == Some("2017-01-02"))
        .times(1)
        .returning(|_, _| {
            Ok(vec![
                daily("2017-01-01", 50.0, 60.0, 70.0),
                daily("2017-01-02", 60.0, 60.0, 60.0),
            ])
        });

    let test_app = spawn_app(Arc::new(store)).await;

    let request = Request::builder()
        .method(Method::GET)
        .uri("/api/v1.0/2017-01-01/2017-01-02")
        .body(Body::empty())
        .unwrap();

    let response = test_app
        .app
        .oneshot(request)
        .await
        .expect("Failed to execute request.");
    assert!(response.status().is_success());

    let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let res: BTreeMap<String, TemperatureSummary> = from_slice(&body).unwrap();
    assert_eq!(
        res["2017-01-01"],
        TemperatureSummary {
            tmin: Some(50.0),
            tavg: Some(60.0),
            tmax: Some(70.0),
        }
    );
    assert_eq!(
        res["2017-01-02"],
        TemperatureSummary {
            tmin: Some(60.0),
            tavg: Some(60.0),
            tmax: Some(60.0),
        }
    );
}

#[tokio::test]
async fn temp_range_without_end_is_open_ended() {
    let mut store = MockObservationStore::new();
    store
        .expect_daily_temperature_stats()
        .withf(|start, end| start == "2010-01-01" && end.is_none())
        .times(1)
        .returning(|_, _| {
            // dates far beyond any one-year window still come back
            Ok(vec![
                daily("2010-01-01", 62.0, 68.5, 74.0),
                daily("2017-08-23", 72.0, 79.2, 87.0),
            ])
        });

    let test_app = spawn_app(Arc::new(store)).await;

    let request = Request::builder()
        .method(Method::GET)
        .uri("/api/v1.0/2010-01-01")
        .body(Body::empty())
        .unwrap();

    let response = test_app
        .app
        .oneshot(request)
        .await
        .expect("Failed to execute request.");
    assert!(response.status().is_success());

    let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let res: BTreeMap<String, TemperatureSummary> = from_slice(&body).unwrap();
    assert_eq!(res.len(), 2);
    assert!(res.contains_key("2017-08-23"));
}
