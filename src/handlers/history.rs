use axum::{
    extract::{Path, Query, State},
    response::{IntoResponse, Response},
    Json,
};
use serde::Deserialize;

use crate::error::{AppError, Result};
use crate::models::WeightUnit;
use crate::repositories::SessionRepository;

#[derive(Clone)]
pub struct HistoryState {
    pub session_repo: SessionRepository,
}

#[derive(Debug, Deserialize)]
pub struct HistoryQuery {
    pub unit: Option<WeightUnit>,
}

/// A completed or cancelled session as it was handed off, optionally with
/// weights converted to another unit.
pub async fn show(
    State(state): State<HistoryState>,
    Path(id): Path<String>,
    Query(query): Query<HistoryQuery>,
) -> Result<Response> {
    let outcome = state
        .session_repo
        .find_outcome(&id)
        .await?
        .ok_or_else(|| AppError::NotFound("Session history not found".to_string()))?;

    let outcome = match query.unit {
        Some(unit) => outcome.in_unit(unit),
        None => outcome,
    };

    Ok(Json(outcome).into_response())
}
