//! Lead CRUD HTTP handlers.
//!
//! Endpoints:
//! - POST   /api/v1/leads       - Create a lead
//! - GET    /api/v1/leads       - List leads (paged)
//! - GET    /api/v1/leads/{id}  - Get a single lead
//! - PUT    /api/v1/leads/{id}  - Update mutable fields
//! - DELETE /api/v1/leads/{id}  - Delete a lead

use std::time::Instant;

use axum::extract::{Path, Query, State};
use axum::Json;
use uuid::Uuid;

use frontdesk_types::lead::{Lead, LeadUpdate, NewLead};

use crate::http::error::AppError;
use crate::http::extractors::query::PageQuery;
use crate::http::response::ApiResponse;
use crate::state::AppState;

fn parse_uuid(s: &str) -> Result<Uuid, AppError> {
    s.parse::<Uuid>()
        .map_err(|_| AppError::Validation(format!("Invalid UUID: {s}")))
}

/// POST /api/v1/leads - Create a lead.
pub async fn create_lead(
    State(state): State<AppState>,
    Json(input): Json<NewLead>,
) -> Result<Json<ApiResponse<Lead>>, AppError> {
    let start = Instant::now();
    let request_id = Uuid::now_v7().to_string();

    let lead = state.lead_service.create_lead(input).await?;

    let elapsed = start.elapsed().as_millis() as u64;
    let link = format!("/api/v1/leads/{}", lead.id);
    Ok(Json(
        ApiResponse::success(lead, request_id, elapsed).with_link("self", &link),
    ))
}

/// GET /api/v1/leads - List leads (paged).
pub async fn list_leads(
    State(state): State<AppState>,
    Query(query): Query<PageQuery>,
) -> Result<Json<ApiResponse<Vec<Lead>>>, AppError> {
    let start = Instant::now();
    let request_id = Uuid::now_v7().to_string();

    let leads = state.lead_service.list_leads(query.limit, query.offset).await?;

    let elapsed = start.elapsed().as_millis() as u64;
    Ok(Json(
        ApiResponse::success(leads, request_id, elapsed).with_link("self", "/api/v1/leads"),
    ))
}

/// GET /api/v1/leads/{id} - Get a single lead.
pub async fn get_lead(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<Lead>>, AppError> {
    let start = Instant::now();
    let request_id = Uuid::now_v7().to_string();

    let id = parse_uuid(&id)?;
    let lead = state.lead_service.get_lead(&id).await?;

    let elapsed = start.elapsed().as_millis() as u64;
    let link = format!("/api/v1/leads/{id}");
    Ok(Json(
        ApiResponse::success(lead, request_id, elapsed).with_link("self", &link),
    ))
}

/// PUT /api/v1/leads/{id} - Update mutable fields.
pub async fn update_lead(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(update): Json<LeadUpdate>,
) -> Result<Json<ApiResponse<Lead>>, AppError> {
    let start = Instant::now();
    let request_id = Uuid::now_v7().to_string();

    let id = parse_uuid(&id)?;
    let lead = state.lead_service.update_lead(&id, update).await?;

    let elapsed = start.elapsed().as_millis() as u64;
    let link = format!("/api/v1/leads/{id}");
    Ok(Json(
        ApiResponse::success(lead, request_id, elapsed).with_link("self", &link),
    ))
}

/// DELETE /api/v1/leads/{id} - Delete a lead.
pub async fn delete_lead(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<serde_json::Value>>, AppError> {
    let start = Instant::now();
    let request_id = Uuid::now_v7().to_string();

    let id = parse_uuid(&id)?;
    state.lead_service.delete_lead(&id).await?;

    let elapsed = start.elapsed().as_millis() as u64;
    Ok(Json(ApiResponse::success(
        serde_json::json!({ "deleted": id }),
        request_id,
        elapsed,
    )))
}
