//! API route handlers.

use std::sync::{Arc, OnceLock};
use std::time::Instant;

use axum::{
    extract::{Path, State},
    http::header,
    response::IntoResponse,
    Json,
};
use tracing::debug;

use groupdir_core::constants::RESPONSE_MAX_AGE_SECS;
use groupdir_core::types::GroupRecord;

use crate::dto::HealthResponse;
use crate::error::ApiError;
use crate::state::AppState;

type Result<T> = std::result::Result<T, ApiError>;

static START_TIME: OnceLock<Instant> = OnceLock::new();

/// Starts the uptime clock reported by [`health_check`].
pub(crate) fn mark_started() {
    START_TIME.get_or_init(Instant::now);
}

/// GET /w3c/group/:name
pub async fn get_group(
    State(state): State<Arc<AppState>>,
    Path(name): Path<String>,
) -> Result<impl IntoResponse> {
    let record = state.lookup.lookup_one(&name).await?;

    debug!(shortname = %name, "Serving group");
    Ok((
        [(
            header::CACHE_CONTROL,
            format!("max-age={}", RESPONSE_MAX_AGE_SECS),
        )],
        Json(record),
    ))
}

/// GET /w3c/group
pub async fn list_groups(State(state): State<Arc<AppState>>) -> Json<Vec<GroupRecord>> {
    Json(state.lookup.lookup_all().await)
}

/// GET /health
pub async fn health_check(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    let start = START_TIME.get_or_init(Instant::now);

    Json(HealthResponse {
        status: "ok".into(),
        version: env!("CARGO_PKG_VERSION").into(),
        uptime_seconds: start.elapsed().as_secs(),
        registry_size: state.lookup.registry().len(),
        cached: state.lookup.cache_stats().valid_entries,
    })
}
