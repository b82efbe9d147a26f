//! Decision endpoints (`/v1/check/*`).
//!
//! Thin JSON adapters over the [`crate::policy::SpamPolicy`] host contract.
//! Events are taken as raw JSON mappings so any host event shape works.

use axum::extract::State;
use axum::Json;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use spamguard_core::event::Invite;

use crate::app_state::AppState;

#[derive(Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct EventCheckResponse {
    pub spam: bool,
    pub rule: Option<String>,
    pub soft_failed: bool,
}

#[derive(Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct AllowedResponse {
    pub allowed: bool,
}

#[derive(Debug, Deserialize)]
pub struct CreateRoomReq {
    pub user_id: String,
}

#[derive(Debug, Deserialize)]
pub struct CreateRoomAliasReq {
    pub user_id: String,
    pub alias: String,
}

#[derive(Debug, Deserialize)]
pub struct PublishRoomReq {
    pub user_id: String,
    pub room_id: String,
}

pub async fn check_event(
    State(state): State<AppState>,
    Json(mut event): Json<Value>,
) -> Json<EventCheckResponse> {
    let verdict = state.policy().evaluate(&mut event);
    Json(EventCheckResponse {
        spam: verdict.is_spam(),
        rule: verdict.rule().map(|r| r.as_str().to_string()),
        soft_failed: verdict.soft_fails(),
    })
}

pub async fn check_invite(
    State(state): State<AppState>,
    Json(req): Json<Invite>,
) -> Json<AllowedResponse> {
    let allowed = state
        .policy()
        .user_may_invite(&req.inviter, &req.invitee, &req.room_id);
    Json(AllowedResponse { allowed })
}

pub async fn check_create_room(
    State(state): State<AppState>,
    Json(req): Json<CreateRoomReq>,
) -> Json<AllowedResponse> {
    let allowed = state.policy().user_may_create_room(&req.user_id);
    Json(AllowedResponse { allowed })
}

pub async fn check_create_room_alias(
    State(state): State<AppState>,
    Json(req): Json<CreateRoomAliasReq>,
) -> Json<AllowedResponse> {
    let allowed = state
        .policy()
        .user_may_create_room_alias(&req.user_id, &req.alias);
    Json(AllowedResponse { allowed })
}

pub async fn check_publish_room(
    State(state): State<AppState>,
    Json(req): Json<PublishRoomReq>,
) -> Json<AllowedResponse> {
    let allowed = state
        .policy()
        .user_may_publish_room(&req.user_id, &req.room_id);
    Json(AllowedResponse { allowed })
}
