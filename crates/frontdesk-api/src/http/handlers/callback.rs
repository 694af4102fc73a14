//! Callback request CRUD and lifecycle HTTP handlers.
//!
//! Endpoints:
//! - POST   /api/v1/callbacks                  - Intake a new callback request
//! - GET    /api/v1/callbacks                  - List callbacks (filterable)
//! - GET    /api/v1/callbacks/search           - Text search over callbacks
//! - GET    /api/v1/callbacks/stats            - Callback dashboard statistics
//! - GET    /api/v1/callbacks/{id}             - Get a single callback
//! - PUT    /api/v1/callbacks/{id}             - Update mutable fields
//! - DELETE /api/v1/callbacks/{id}             - Delete a callback
//! - POST   /api/v1/callbacks/{id}/schedule    - Schedule the return call
//! - POST   /api/v1/callbacks/{id}/attempts    - Record one dial attempt
//! - POST   /api/v1/callbacks/{id}/complete    - Complete with an outcome
//! - POST   /api/v1/callbacks/{id}/cancel      - Cancel the request
//! - POST   /api/v1/callbacks/{id}/no-answer   - Mark as gone unanswered

use std::time::Instant;

use axum::extract::{Path, Query, State};
use axum::Json;
use chrono::{DateTime, Utc};
use serde::Deserialize;
use uuid::Uuid;

use frontdesk_types::callback::{Callback, CallbackOutcome, CallbackUpdate, NewCallback};
use frontdesk_types::filter::SearchHit;
use frontdesk_types::stats::CallbackStats;

use crate::http::error::AppError;
use crate::http::extractors::query::{CallbackListQuery, SearchQuery};
use crate::http::response::ApiResponse;
use crate::state::AppState;

/// Parse a UUID from a path parameter, returning a 400 error on invalid format.
fn parse_uuid(s: &str) -> Result<Uuid, AppError> {
    s.parse::<Uuid>()
        .map_err(|_| AppError::Validation(format!("Invalid UUID: {s}")))
}

/// POST /api/v1/callbacks - Intake a new callback request.
pub async fn create_callback(
    State(state): State<AppState>,
    Json(input): Json<NewCallback>,
) -> Result<Json<ApiResponse<Callback>>, AppError> {
    let start = Instant::now();
    let request_id = Uuid::now_v7().to_string();

    let callback = state.callback_service.create_callback(input).await?;

    let elapsed = start.elapsed().as_millis() as u64;
    let link = format!("/api/v1/callbacks/{}", callback.id);
    Ok(Json(
        ApiResponse::success(callback, request_id, elapsed).with_link("self", &link),
    ))
}

/// GET /api/v1/callbacks - List callbacks matching the query filter.
pub async fn list_callbacks(
    State(state): State<AppState>,
    Query(query): Query<CallbackListQuery>,
) -> Result<Json<ApiResponse<Vec<Callback>>>, AppError> {
    let start = Instant::now();
    let request_id = Uuid::now_v7().to_string();

    let limit = query.limit;
    let offset = query.offset;
    let filter = query.into_filter()?;
    let callbacks = state
        .callback_service
        .list_callbacks(&filter, limit, offset)
        .await?;

    let elapsed = start.elapsed().as_millis() as u64;
    Ok(Json(
        ApiResponse::success(callbacks, request_id, elapsed)
            .with_link("self", "/api/v1/callbacks"),
    ))
}

/// GET /api/v1/callbacks/{id} - Get a single callback.
pub async fn get_callback(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<Callback>>, AppError> {
    let start = Instant::now();
    let request_id = Uuid::now_v7().to_string();

    let id = parse_uuid(&id)?;
    let callback = state.callback_service.get_callback(&id).await?;

    let elapsed = start.elapsed().as_millis() as u64;
    let link = format!("/api/v1/callbacks/{id}");
    Ok(Json(
        ApiResponse::success(callback, request_id, elapsed).with_link("self", &link),
    ))
}

/// PUT /api/v1/callbacks/{id} - Update mutable fields.
pub async fn update_callback(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(update): Json<CallbackUpdate>,
) -> Result<Json<ApiResponse<Callback>>, AppError> {
    let start = Instant::now();
    let request_id = Uuid::now_v7().to_string();

    let id = parse_uuid(&id)?;
    let callback = state.callback_service.update_callback(&id, update).await?;

    let elapsed = start.elapsed().as_millis() as u64;
    let link = format!("/api/v1/callbacks/{id}");
    Ok(Json(
        ApiResponse::success(callback, request_id, elapsed).with_link("self", &link),
    ))
}

/// DELETE /api/v1/callbacks/{id} - Delete a callback.
pub async fn delete_callback(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<serde_json::Value>>, AppError> {
    let start = Instant::now();
    let request_id = Uuid::now_v7().to_string();

    let id = parse_uuid(&id)?;
    state.callback_service.delete_callback(&id).await?;

    let elapsed = start.elapsed().as_millis() as u64;
    Ok(Json(ApiResponse::success(
        serde_json::json!({ "deleted": id }),
        request_id,
        elapsed,
    )))
}

/// GET /api/v1/callbacks/search - Case-insensitive text search.
pub async fn search_callbacks(
    State(state): State<AppState>,
    Query(query): Query<SearchQuery>,
) -> Result<Json<ApiResponse<Vec<SearchHit<Callback>>>>, AppError> {
    let start = Instant::now();
    let request_id = Uuid::now_v7().to_string();

    let hits = state
        .callback_service
        .search_callbacks(&query.q, query.limit)
        .await?;

    let elapsed = start.elapsed().as_millis() as u64;
    Ok(Json(ApiResponse::success(hits, request_id, elapsed)))
}

/// GET /api/v1/callbacks/stats - Dashboard statistics.
pub async fn callback_stats(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<CallbackStats>>, AppError> {
    let start = Instant::now();
    let request_id = Uuid::now_v7().to_string();

    let stats = state.callback_service.callback_stats().await?;

    let elapsed = start.elapsed().as_millis() as u64;
    Ok(Json(ApiResponse::success(stats, request_id, elapsed)))
}

/// Request body for scheduling a callback.
#[derive(Debug, Deserialize)]
pub struct ScheduleRequest {
    pub scheduled_at: DateTime<Utc>,
    pub assigned_agent_id: Option<Uuid>,
}

/// POST /api/v1/callbacks/{id}/schedule - Schedule the return call.
pub async fn schedule_callback(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(body): Json<ScheduleRequest>,
) -> Result<Json<ApiResponse<Callback>>, AppError> {
    let start = Instant::now();
    let request_id = Uuid::now_v7().to_string();

    let id = parse_uuid(&id)?;
    let callback = state
        .callback_service
        .schedule_callback(&id, body.scheduled_at, body.assigned_agent_id)
        .await?;

    let elapsed = start.elapsed().as_millis() as u64;
    Ok(Json(ApiResponse::success(callback, request_id, elapsed)))
}

/// Request body for recording a dial attempt.
#[derive(Debug, Deserialize)]
pub struct AttemptRequest {
    pub outcome: CallbackOutcome,
    pub notes: Option<String>,
}

/// POST /api/v1/callbacks/{id}/attempts - Record one dial attempt.
pub async fn record_attempt(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(body): Json<AttemptRequest>,
) -> Result<Json<ApiResponse<Callback>>, AppError> {
    let start = Instant::now();
    let request_id = Uuid::now_v7().to_string();

    let id = parse_uuid(&id)?;
    let callback = state
        .callback_service
        .record_attempt(&id, body.outcome, body.notes)
        .await?;

    let elapsed = start.elapsed().as_millis() as u64;
    Ok(Json(ApiResponse::success(callback, request_id, elapsed)))
}

/// Request body for completing a callback.
#[derive(Debug, Deserialize)]
pub struct CompleteRequest {
    pub outcome: CallbackOutcome,
    pub outcome_notes: Option<String>,
}

/// POST /api/v1/callbacks/{id}/complete - Complete with an outcome.
pub async fn complete_callback(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(body): Json<CompleteRequest>,
) -> Result<Json<ApiResponse<Callback>>, AppError> {
    let start = Instant::now();
    let request_id = Uuid::now_v7().to_string();

    let id = parse_uuid(&id)?;
    let callback = state
        .callback_service
        .complete_callback(&id, body.outcome, body.outcome_notes)
        .await?;

    let elapsed = start.elapsed().as_millis() as u64;
    Ok(Json(ApiResponse::success(callback, request_id, elapsed)))
}

/// Request body for cancelling a callback.
#[derive(Debug, Default, Deserialize)]
pub struct CancelRequest {
    pub notes: Option<String>,
}

/// POST /api/v1/callbacks/{id}/cancel - Cancel the request.
pub async fn cancel_callback(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(body): Json<CancelRequest>,
) -> Result<Json<ApiResponse<Callback>>, AppError> {
    let start = Instant::now();
    let request_id = Uuid::now_v7().to_string();

    let id = parse_uuid(&id)?;
    let callback = state.callback_service.cancel_callback(&id, body.notes).await?;

    let elapsed = start.elapsed().as_millis() as u64;
    Ok(Json(ApiResponse::success(callback, request_id, elapsed)))
}

/// POST /api/v1/callbacks/{id}/no-answer - Mark as gone unanswered.
pub async fn mark_no_answer(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<Callback>>, AppError> {
    let start = Instant::now();
    let request_id = Uuid::now_v7().to_string();

    let id = parse_uuid(&id)?;
    let callback = state.callback_service.mark_no_answer(&id).await?;

    let elapsed = start.elapsed().as_millis() as u64;
    Ok(Json(ApiResponse::success(callback, request_id, elapsed)))
}
