use std::sync::Arc;

use axum::{extract::State, response::Html};

use crate::AppState;

pub async fn index_handler(State(state): State<Arc<AppState>>) -> Html<String> {
    let base = &state.remote_url;
    Html(format!(
        "Available Routes:<br/>\
         <a href=\"{base}/api/v1.0/precipitation\">/api/v1.0/precipitation</a><br/>\
         <a href=\"{base}/api/v1.0/stations\">/api/v1.0/stations</a><br/>\
         <a href=\"{base}/api/v1.0/tobs\">/api/v1.0/tobs</a><br/>\
         /api/v1.0/:start:<br/>\
         /api/v1.0/:start:/:end:<br/>\
         <a href=\"{base}/docs\">/docs</a>"
    ))
}
