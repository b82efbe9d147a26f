//! Operational HTTP endpoints.
//!
//! - `/healthz`       : liveness
//! - `/metrics`       : Prometheus text format
//! - `/admin/reload`  : re-read the rules file now

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

use spamguard_core::error::ErrorCode;

use crate::app_state::AppState;
use crate::reload::reload_now;

pub async fn healthz() -> impl IntoResponse {
    (StatusCode::OK, "ok")
}

pub async fn metrics(State(state): State<AppState>) -> Response {
    let body = state.metrics().render();

    (
        StatusCode::OK,
        [(axum::http::header::CONTENT_TYPE, "text/plain; version=0.0.4; charset=utf-8")],
        body,
    )
        .into_response()
}

/// 200 with the new rule counts, or 422 with the error; the old rules stay
/// active on failure.
pub async fn reload(State(state): State<AppState>) -> Response {
    let policy = state.policy();
    match reload_now(&policy, "admin").await {
        Ok(()) => {
            let counts = policy.snapshot().counts();
            (StatusCode::OK, Json(json!({ "reloaded": true, "rules": counts }))).into_response()
        }
        Err(e) => {
            let code = e.code();
            let status = match code {
                ErrorCode::Internal => StatusCode::INTERNAL_SERVER_ERROR,
                _ => StatusCode::UNPROCESSABLE_ENTITY,
            };
            (
                status,
                Json(json!({ "reloaded": false, "error": e.to_string(), "code": code.as_str() })),
            )
                .into_response()
        }
    }
}
