use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};

use crate::engine::{ActiveSession, FinishRequest, SessionError, SessionEvent, SessionSnapshot};
use crate::error::{AppError, Result};
use crate::models::{SetInput, WorkoutPlan};
use crate::sink::SessionSink;
use crate::store::{self, Applied, SessionStore};

#[derive(Clone)]
pub struct SessionsState {
    pub store: SessionStore,
    pub sink: Arc<dyn SessionSink>,
}

#[derive(Serialize)]
pub struct ActionResponse<T: Serialize> {
    pub result: T,
    pub session: SessionSnapshot,
    pub events: Vec<SessionEvent>,
    pub persisted: bool,
}

#[derive(Serialize)]
pub struct CreatedResponse {
    pub session: SessionSnapshot,
    pub persisted: bool,
}

#[derive(Deserialize)]
pub struct JumpRequest {
    pub index: usize,
}

#[derive(Deserialize)]
pub struct AdjustRestRequest {
    pub delta_seconds: i64,
}

/// Apply an action, hand its effects to the sink, and render the result.
async fn run<T, F>(state: &SessionsState, id: &str, action: F) -> Result<Response>
where
    T: Serialize,
    F: FnOnce(&mut ActiveSession) -> std::result::Result<T, SessionError>,
{
    let Applied {
        value,
        snapshot,
        events,
        outcome,
    } = state.store.apply(id, action)?;

    let persisted = store::hand_off(
        state.sink.clone(),
        id.to_string(),
        events.clone(),
        outcome,
    )
    .await;

    Ok(Json(ActionResponse {
        result: value,
        session: snapshot,
        events,
        persisted,
    })
    .into_response())
}

pub async fn create(
    State(state): State<SessionsState>,
    Json(plan): Json<WorkoutPlan>,
) -> Result<Response> {
    let snapshot = state.store.create(plan.clone())?;
    let session_id = snapshot.session_id.clone();
    let started_at = snapshot.started_at;
    let sink = state.sink.clone();

    let persisted = tokio::task::spawn_blocking(move || {
        sink.save_started(&session_id, &plan.normalized(), started_at)
    })
    .await
    .map_err(|e| AppError::Internal(e.to_string()))
    .and_then(|r| r)
    .map_err(|e| tracing::warn!("Failed to persist new session: {}", e))
    .is_ok();

    Ok((
        StatusCode::CREATED,
        Json(CreatedResponse {
            session: snapshot,
            persisted,
        }),
    )
        .into_response())
}

pub async fn show(State(state): State<SessionsState>, Path(id): Path<String>) -> Result<Response> {
    Ok(Json(state.store.snapshot(&id)?).into_response())
}

pub async fn record_set(
    State(state): State<SessionsState>,
    Path(id): Path<String>,
    Json(input): Json<SetInput>,
) -> Result<Response> {
    run(&state, &id, |s| s.record_set(&input)).await
}

pub async fn skip_rest(State(state): State<SessionsState>, Path(id): Path<String>) -> Result<Response> {
    run(&state, &id, |s| s.skip_rest()).await
}

pub async fn adjust_rest(
    State(state): State<SessionsState>,
    Path(id): Path<String>,
    Json(req): Json<AdjustRestRequest>,
) -> Result<Response> {
    run(&state, &id, |s| s.adjust_rest(req.delta_seconds)).await
}

pub async fn skip_sets(State(state): State<SessionsState>, Path(id): Path<String>) -> Result<Response> {
    run(&state, &id, |s| s.skip_remaining_sets()).await
}

pub async fn jump(
    State(state): State<SessionsState>,
    Path(id): Path<String>,
    Json(req): Json<JumpRequest>,
) -> Result<Response> {
    run(&state, &id, |s| s.jump_to_exercise(req.index)).await
}

pub async fn pause(State(state): State<SessionsState>, Path(id): Path<String>) -> Result<Response> {
    run(&state, &id, |s| s.pause()).await
}

pub async fn resume(State(state): State<SessionsState>, Path(id): Path<String>) -> Result<Response> {
    run(&state, &id, |s| s.resume()).await
}

pub async fn finish(
    State(state): State<SessionsState>,
    Path(id): Path<String>,
    Json(req): Json<FinishRequest>,
) -> Result<Response> {
    run(&state, &id, |s| s.finish(req)).await
}

pub async fn cancel(State(state): State<SessionsState>, Path(id): Path<String>) -> Result<Response> {
    run(&state, &id, |s| s.cancel()).await
}
