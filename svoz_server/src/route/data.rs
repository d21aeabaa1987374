use std::{str::FromStr, sync::Arc};

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use svoz_core::{
    schedule::{CollectionRecord, ScheduleMap},
    stream::WasteStream,
};

use crate::AppState;

/// Serve the whole persisted record set.
///
/// The cache file is read per request, so an update finishing mid-flight is
/// seen either entirely or not at all.
pub async fn handler(State(state): State<Arc<AppState>>) -> Json<ScheduleMap> {
    Json(state.cache.load())
}

/// Serve a single stream's record, addressed by its cache key.
pub async fn stream_handler(
    State(state): State<Arc<AppState>>,
    Path(stream): Path<String>,
) -> Result<Json<CollectionRecord>, (StatusCode, String)> {
    let stream =
        WasteStream::from_str(&stream).map_err(|err| (StatusCode::NOT_FOUND, err.to_string()))?;
    let mut records = state.cache.load();
    records
        .remove(&stream)
        .map(Json)
        .ok_or_else(|| (StatusCode::NOT_FOUND, format!("no record for {stream}")))
}
