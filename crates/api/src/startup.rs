use crate::{
    db::{observations::ObservationAccess, sqlite::Database},
    get_stations, index_handler, precipitation, routes,
    service::ClimateService,
    temp_range_between, temp_range_from, tobs,
};
use anyhow::anyhow;
use axum::{
    body::Body,
    extract::Request,
    middleware::{self, Next},
    response::IntoResponse,
    routing::get,
    Router,
};
use hyper::{
    header::{ACCEPT, CONTENT_TYPE},
    Method,
};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use utoipa::OpenApi;
use utoipa_scalar::{Scalar, Servable};

#[derive(Clone)]
pub struct AppState {
    pub remote_url: String,
    pub service: Arc<ClimateService>,
}

#[derive(OpenApi)]
#[openapi(
    paths(
        routes::climate::climate_routes::precipitation,
        routes::climate::climate_routes::get_stations,
        routes::climate::climate_routes::tobs,
        routes::climate::climate_routes::temp_range_from,
        routes::climate::climate_routes::temp_range_between,
    ),
    components(
        schemas(
                routes::climate::climate_routes::StationsResponse,
                routes::climate::climate_routes::TobsResponse,
                routes::climate::climate_routes::ErrorResponse,
                crate::service::TemperatureSummary
            )
    ),
    tags(
        (name = "climate archive api", description = "a read-only RESTful api over historical weather station observations")
    )
)]
struct ApiDoc;

pub async fn build_app_state(
    remote_url: String,
    database: String,
) -> Result<AppState, anyhow::Error> {
    let db = Database::new(&database)
        .await
        .map_err(|e| anyhow!("error opening observations dataset: {}", e))?;
    db.health_check()
        .await
        .map_err(|e| anyhow!("observations dataset failed health check: {}", e))?;

    let store = Arc::new(ObservationAccess::new(db.pool().clone()));
    let service = Arc::new(ClimateService::new(store));

    Ok(AppState {
        remote_url,
        service,
    })
}

pub fn app(app_state: AppState) -> Router {
    let api_docs = ApiDoc::openapi();
    let cors = CorsLayer::new()
        .allow_methods([Method::GET, Method::OPTIONS])
        .allow_headers([ACCEPT, CONTENT_TYPE])
        .allow_origin(Any);

    Router::new()
        .route("/", get(index_handler))
        // API routes
        .route("/api/v1.0/precipitation", get(precipitation))
        .route("/api/v1.0/stations", get(get_stations))
        .route("/api/v1.0/tobs", get(tobs))
        .route("/api/v1.0/{start}", get(temp_range_from))
        .route("/api/v1.0/{start}/{end}", get(temp_range_between))
        .with_state(Arc::new(app_state))
        .layer(middleware::from_fn(log_request))
        .merge(Scalar::with_url("/docs", api_docs))
        .layer(cors)
}

async fn log_request(request: Request<Body>, next: Next) -> impl IntoResponse {
    let now = time::OffsetDateTime::now_utc();
    let path = request
        .uri()
        .path_and_query()
        .map(|p| p.as_str())
        .unwrap_or_default();
    log::info!(target: "http_request","new request, {} {}", request.method().as_str(), path);

    let response = next.run(request).await;
    let response_time = time::OffsetDateTime::now_utc() - now;
    log::info!(target: "http_response", "response, code: {}, time: {}", response.status().as_str(), response_time);

    response
}
