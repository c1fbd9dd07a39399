//! HTTP request handlers.

use super::AppState;
use crate::analytics::{build_export, AnalysisOptions};

use axum::{
    extract::State,
    http::{header, StatusCode},
    response::{IntoResponse, Json},
};
use serde::Deserialize;

// ============================================================================
// API: Analytics
// ============================================================================

pub async fn handle_get_records(State(state): State<AppState>) -> impl IntoResponse {
    Json(state.engine.records().await)
}

pub async fn handle_get_comparisons(State(state): State<AppState>) -> impl IntoResponse {
    Json(state.engine.comparisons().await)
}

pub async fn handle_refresh(State(state): State<AppState>) -> impl IntoResponse {
    match state.engine.run().await {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(e) => (StatusCode::BAD_GATEWAY, e.to_string()).into_response(),
    }
}

pub async fn handle_get_options(State(state): State<AppState>) -> impl IntoResponse {
    Json(state.engine.options().await)
}

pub async fn handle_set_options(
    State(state): State<AppState>,
    Json(options): Json<AnalysisOptions>,
) -> impl IntoResponse {
    state.engine.set_options(options).await;

    match state.engine.run().await {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(e) => (StatusCode::BAD_GATEWAY, e.to_string()).into_response(),
    }
}

#[derive(Debug, Deserialize)]
pub struct AutoRefreshRequest {
    pub enabled: bool,
    #[serde(default)]
    pub interval_secs: Option<u64>,
}

pub async fn handle_auto_refresh(
    State(state): State<AppState>,
    Json(req): Json<AutoRefreshRequest>,
) -> impl IntoResponse {
    if req.enabled {
        let secs = req.interval_secs.unwrap_or(state.config.refresh_secs).max(1);
        state
            .engine
            .enable_auto_refresh(std::time::Duration::from_secs(secs))
            .await;
    } else {
        state.engine.disable_auto_refresh().await;
    }

    StatusCode::NO_CONTENT.into_response()
}

// ============================================================================
// API: Export
// ============================================================================

pub async fn handle_export(State(state): State<AppState>) -> impl IntoResponse {
    let run = match state.engine.published().await {
        Some(run) => run,
        None => return (StatusCode::NOT_FOUND, "no analysis run published yet").into_response(),
    };

    let snapshot = build_export(&run);
    let filename = format!(
        "probe-analytics-{}.json",
        snapshot.generated_at.format("%Y%m%d-%H%M%S")
    );

    (
        [(
            header::CONTENT_DISPOSITION,
            format!("attachment; filename=\"{}\"", filename),
        )],
        Json(snapshot),
    )
        .into_response()
}
