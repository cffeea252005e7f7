use std::collections::BTreeMap;
use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use log::error;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::{
    service::{Error, TemperatureSummary},
    AppState,
};

/// Error envelope returned on every failed request.
#[derive(Serialize, Deserialize, Debug, ToSchema)]
pub struct ErrorResponse {
    pub error: String,
}

/// Station codes envelope.
#[derive(Serialize, Deserialize, Debug, ToSchema)]
pub struct StationsResponse {
    pub stations: Vec<String>,
}

/// Temperature observations envelope. Null entries are readings the
/// station never recorded.
#[derive(Serialize, Deserialize, Debug, ToSchema)]
pub struct TobsResponse {
    pub temp_observations: Vec<Option<f64>>,
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let status = match self {
            Error::BadDate | Error::InvalidRange => StatusCode::BAD_REQUEST,
            Error::EmptyDataset | Error::StoredDate(_) | Error::Store(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };
        if status.is_server_error() {
            error!("request failed: {}", self);
        }
        (
            status,
            Json(ErrorResponse {
                error: self.to_string(),
            }),
        )
            .into_response()
    }
}

#[utoipa::path(
    get,
    path = "/api/v1.0/precipitation",
    responses(
        (status = OK, description = "Precipitation readings over the trailing year, keyed by date", body = BTreeMap<String, Vec<f64>>),
        (status = INTERNAL_SERVER_ERROR, description = "Empty dataset or store failure", body = ErrorResponse)
    ))]
pub async fn precipitation(
    State(state): State<Arc<AppState>>,
) -> Result<Json<BTreeMap<String, Vec<f64>>>, Error> {
    let readings = state.service.precipitation_last_year().await?;
    Ok(Json(readings))
}

#[utoipa::path(
    get,
    path = "/api/v1.0/stations",
    responses(
        (status = OK, description = "Every station code in the dataset", body = StationsResponse),
        (status = INTERNAL_SERVER_ERROR, description = "Store failure", body = ErrorResponse)
    ))]
pub async fn get_stations(
    State(state): State<Arc<AppState>>,
) -> Result<Json<StationsResponse>, Error> {
    let stations = state.service.station_codes().await?;
    Ok(Json(StationsResponse { stations }))
}

#[utoipa::path(
    get,
    path = "/api/v1.0/tobs",
    responses(
        (status = OK, description = "Trailing-year temperature readings of the most active station", body = TobsResponse),
        (status = INTERNAL_SERVER_ERROR, description = "Empty dataset or store failure", body = ErrorResponse)
    ))]
pub async fn tobs(State(state): State<Arc<AppState>>) -> Result<Json<TobsResponse>, Error> {
    let temp_observations = state.service.most_active_station_temperatures().await?;
    Ok(Json(TobsResponse { temp_observations }))
}

#[utoipa::path(
    get,
    path = "/api/v1.0/{start}",
    params(
        ("start" = String, Path, description = "Inclusive lower bound, YYYY-MM-DD"),
    ),
    responses(
        (status = OK, description = "Per-date temperature aggregates from start onward", body = BTreeMap<String, TemperatureSummary>),
        (status = BAD_REQUEST, description = "Malformed start date", body = ErrorResponse),
        (status = INTERNAL_SERVER_ERROR, description = "Store failure", body = ErrorResponse)
    ))]
pub async fn temp_range_from(
    State(state): State<Arc<AppState>>,
    Path(start): Path<String>,
) -> Result<Json<BTreeMap<String, TemperatureSummary>>, Error> {
    let summaries = state.service.temperature_summary(&start, None).await?;
    Ok(Json(summaries))
}

#[utoipa::path(
    get,
    path = "/api/v1.0/{start}/{end}",
    params(
        ("start" = String, Path, description = "Inclusive lower bound, YYYY-MM-DD"),
        ("end" = String, Path, description = "Inclusive upper bound, YYYY-MM-DD"),
    ),
    responses(
        (status = OK, description = "Per-date temperature aggregates between start and end", body = BTreeMap<String, TemperatureSummary>),
        (status = BAD_REQUEST, description = "Malformed date or start after end", body = ErrorResponse),
        (status = INTERNAL_SERVER_ERROR, description = "Store failure", body = ErrorResponse)
    ))]
pub async fn temp_range_between(
    State(state): State<Arc<AppState>>,
    Path((start, end)): Path<(String, String)>,
) -> Result<Json<BTreeMap<String, TemperatureSummary>>, Error> {
    let summaries = state
        .service
        .temperature_summary(&start, Some(&end))
        .await?;
    Ok(Json(summaries))
}
