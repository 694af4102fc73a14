//! Combined dashboard statistics handler.
//!
//! Endpoints:
//! - GET /api/v1/stats - Conversation and callback statistics in one payload

use std::time::Instant;

use axum::extract::State;
use axum::Json;
use serde::Serialize;
use uuid::Uuid;

use frontdesk_types::stats::{CallbackStats, ChatStats};

use crate::http::error::AppError;
use crate::http::response::ApiResponse;
use crate::state::AppState;

/// Full dashboard snapshot combining both resources.
#[derive(Debug, Serialize)]
pub struct DashboardStats {
    pub chats: ChatStats,
    pub callbacks: CallbackStats,
}

/// GET /api/v1/stats - Combined dashboard statistics.
pub async fn dashboard_stats(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<DashboardStats>>, AppError> {
    let start = Instant::now();
    let request_id = Uuid::now_v7().to_string();

    let chats = state.chat_service.chat_stats().await?;
    let callbacks = state.callback_service.callback_stats().await?;

    let elapsed = start.elapsed().as_millis() as u64;
    Ok(Json(ApiResponse::success(
        DashboardStats { chats, callbacks },
        request_id,
        elapsed,
    )))
}
