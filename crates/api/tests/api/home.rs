use crate::helpers::{spawn_app, MockObservationStore};
use axum::{
    body::{to_bytes, Body},
    http::Request,
};
use hyper::Method;
use std::sync::Arc;
use tower::ServiceExt;

#[tokio::test]
async fn index_lists_the_available_routes_without_touching_the_store() {
    // no expectations: the index never queries the store
    let store = MockObservationStore::new();
    let test_app = spawn_app(Arc::new(store)).await;

    let request = Request::builder()
        .method(Method::GET)
        .uri("/")
        .body(Body::empty())
        .unwrap();

    let response = test_app
        .app
        .oneshot(request)
        .await
        .expect("Failed to execute request.");
    assert!(response.status().is_success());

    let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let html = String::from_utf8(body.to_vec()).unwrap();
    assert!(html.contains("/api/v1.0/precipitation"));
    assert!(html.contains("/api/v1.0/stations"));
    assert!(html.contains("/api/v1.0/tobs"));
}

#[tokio::test]
async fn docs_are_served_without_touching_the_store() {
    let store = MockObservationStore::new();
    let test_app = spawn_app(Arc::new(store)).await;

    let request = Request::builder()
        .method(Method::GET)
        .uri("/docs")
        .body(Body::empty())
        .unwrap();

    let response = test_app
        .app
        .oneshot(request)
        .await
        .expect("Failed to execute request.");
    assert!(response.status().is_success());
}
