//! Axum router wiring.

use axum::{
    routing::{get, post},
    Router,
};

use crate::{api, app_state::AppState, ops};

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/healthz", get(ops::healthz))
        .route("/metrics", get(ops::metrics))
        .route("/admin/reload", post(ops::reload))
        .route("/v1/check/event", post(api::check_event))
        .route("/v1/check/invite", post(api::check_invite))
        .route("/v1/check/create_room", post(api::check_create_room))
        .route("/v1/check/create_room_alias", post(api::check_create_room_alias))
        .route("/v1/check/publish_room", post(api::check_publish_room))
        .with_state(state)
}
