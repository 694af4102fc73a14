//! Conversation CRUD and lifecycle HTTP handlers.
//!
//! Endpoints:
//! - POST   /api/v1/chats                          - Intake a new conversation
//! - GET    /api/v1/chats                          - List conversations (filterable)
//! - GET    /api/v1/chats/search                   - Text search over conversations
//! - GET    /api/v1/chats/stats                    - Conversation dashboard statistics
//! - GET    /api/v1/chats/by-session/{session_id}  - Look up by external session id
//! - GET    /api/v1/chats/{id}                     - Get a single conversation
//! - PUT    /api/v1/chats/{id}                     - Update mutable fields
//! - DELETE /api/v1/chats/{id}                     - Delete a conversation
//! - POST   /api/v1/chats/{id}/messages            - Append a message to the ledger
//! - POST   /api/v1/chats/{id}/messages/read       - Mark messages as read
//! - PUT    /api/v1/chats/{id}/messages/{mid}      - Edit a message in place
//! - POST   /api/v1/chats/{id}/close               - Close with optional resolution
//! - POST   /api/v1/chats/{id}/pause               - Pause an active conversation
//! - POST   /api/v1/chats/{id}/resume              - Resume a paused conversation
//! - POST   /api/v1/chats/{id}/abandon             - Mark as abandoned by the customer
//! - POST   /api/v1/chats/{id}/transfer            - Hand off to another agent

use std::time::Instant;

use axum::extract::{Path, Query, State};
use axum::Json;
use serde::Deserialize;
use uuid::Uuid;

use frontdesk_types::chat::{
    Chat, ChatUpdate, NewChat, NewMessage, ResolutionStatus,
};
use frontdesk_types::filter::SearchHit;
use frontdesk_types::stats::ChatStats;

use crate::http::error::AppError;
use crate::http::extractors::query::{ChatListQuery, SearchQuery};
use crate::http::response::ApiResponse;
use crate::state::AppState;

/// Parse a UUID from a path parameter, returning a 400 error on invalid format.
fn parse_uuid(s: &str) -> Result<Uuid, AppError> {
    s.parse::<Uuid>()
        .map_err(|_| AppError::Validation(format!("Invalid UUID: {s}")))
}

/// POST /api/v1/chats - Intake a new conversation.
pub async fn create_chat(
    State(state): State<AppState>,
    Json(input): Json<NewChat>,
) -> Result<Json<ApiResponse<Chat>>, AppError> {
    let start = Instant::now();
    let request_id = Uuid::now_v7().to_string();

    let chat = state.chat_service.create_chat(input).await?;

    let elapsed = start.elapsed().as_millis() as u64;
    let link = format!("/api/v1/chats/{}", chat.id);
    Ok(Json(
        ApiResponse::success(chat, request_id, elapsed).with_link("self", &link),
    ))
}

/// GET /api/v1/chats - List conversations matching the query filter.
pub async fn list_chats(
    State(state): State<AppState>,
    Query(query): Query<ChatListQuery>,
) -> Result<Json<ApiResponse<Vec<Chat>>>, AppError> {
    let start = Instant::now();
    let request_id = Uuid::now_v7().to_string();

    let limit = query.limit;
    let offset = query.offset;
    let filter = query.into_filter()?;
    let chats = state.chat_service.list_chats(&filter, limit, offset).await?;

    let elapsed = start.elapsed().as_millis() as u64;
    Ok(Json(
        ApiResponse::success(chats, request_id, elapsed).with_link("self", "/api/v1/chats"),
    ))
}

/// GET /api/v1/chats/{id} - Get a single conversation.
pub async fn get_chat(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<Chat>>, AppError> {
    let start = Instant::now();
    let request_id = Uuid::now_v7().to_string();

    let id = parse_uuid(&id)?;
    let chat = state.chat_service.get_chat(&id).await?;

    let elapsed = start.elapsed().as_millis() as u64;
    let link = format!("/api/v1/chats/{id}");
    Ok(Json(
        ApiResponse::success(chat, request_id, elapsed).with_link("self", &link),
    ))
}

/// GET /api/v1/chats/by-session/{session_id} - Look up by external session id.
pub async fn get_chat_by_session(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
) -> Result<Json<ApiResponse<Chat>>, AppError> {
    let start = Instant::now();
    let request_id = Uuid::now_v7().to_string();

    let chat = state.chat_service.get_chat_by_session_id(&session_id).await?;

    let elapsed = start.elapsed().as_millis() as u64;
    let link = format!("/api/v1/chats/{}", chat.id);
    Ok(Json(
        ApiResponse::success(chat, request_id, elapsed).with_link("self", &link),
    ))
}

/// PUT /api/v1/chats/{id} - Update mutable fields.
pub async fn update_chat(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(update): Json<ChatUpdate>,
) -> Result<Json<ApiResponse<Chat>>, AppError> {
    let start = Instant::now();
    let request_id = Uuid::now_v7().to_string();

    let id = parse_uuid(&id)?;
    let chat = state.chat_service.update_chat(&id, update).await?;

    let elapsed = start.elapsed().as_millis() as u64;
    let link = format!("/api/v1/chats/{id}");
    Ok(Json(
        ApiResponse::success(chat, request_id, elapsed).with_link("self", &link),
    ))
}

/// DELETE /api/v1/chats/{id} - Delete a conversation.
pub async fn delete_chat(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<serde_json::Value>>, AppError> {
    let start = Instant::now();
    let request_id = Uuid::now_v7().to_string();

    let id = parse_uuid(&id)?;
    state.chat_service.delete_chat(&id).await?;

    let elapsed = start.elapsed().as_millis() as u64;
    Ok(Json(ApiResponse::success(
        serde_json::json!({ "deleted": id }),
        request_id,
        elapsed,
    )))
}

/// GET /api/v1/chats/search - Case-insensitive text search.
pub async fn search_chats(
    State(state): State<AppState>,
    Query(query): Query<SearchQuery>,
) -> Result<Json<ApiResponse<Vec<SearchHit<Chat>>>>, AppError> {
    let start = Instant::now();
    let request_id = Uuid::now_v7().to_string();

    let hits = state.chat_service.search_chats(&query.q, query.limit).await?;

    let elapsed = start.elapsed().as_millis() as u64;
    Ok(Json(ApiResponse::success(hits, request_id, elapsed)))
}

/// GET /api/v1/chats/stats - Dashboard statistics.
pub async fn chat_stats(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<ChatStats>>, AppError> {
    let start = Instant::now();
    let request_id = Uuid::now_v7().to_string();

    let stats = state.chat_service.chat_stats().await?;

    let elapsed = start.elapsed().as_millis() as u64;
    Ok(Json(ApiResponse::success(stats, request_id, elapsed)))
}

/// POST /api/v1/chats/{id}/messages - Append a message to the ledger.
pub async fn append_message(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(input): Json<NewMessage>,
) -> Result<Json<ApiResponse<Chat>>, AppError> {
    let start = Instant::now();
    let request_id = Uuid::now_v7().to_string();

    let id = parse_uuid(&id)?;
    let chat = state.chat_service.append_message(&id, input).await?;

    let elapsed = start.elapsed().as_millis() as u64;
    let link = format!("/api/v1/chats/{id}");
    Ok(Json(
        ApiResponse::success(chat, request_id, elapsed).with_link("self", &link),
    ))
}

/// Request body for marking messages read.
#[derive(Debug, Deserialize)]
pub struct MarkReadRequest {
    pub message_ids: Vec<Uuid>,
}

/// POST /api/v1/chats/{id}/messages/read - Mark messages as read.
pub async fn mark_messages_read(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(body): Json<MarkReadRequest>,
) -> Result<Json<ApiResponse<Chat>>, AppError> {
    let start = Instant::now();
    let request_id = Uuid::now_v7().to_string();

    let id = parse_uuid(&id)?;
    let chat = state
        .chat_service
        .mark_messages_read(&id, &body.message_ids)
        .await?;

    let elapsed = start.elapsed().as_millis() as u64;
    Ok(Json(ApiResponse::success(chat, request_id, elapsed)))
}

/// Request body for editing a message.
#[derive(Debug, Deserialize)]
pub struct EditMessageRequest {
    pub content: String,
}

/// PUT /api/v1/chats/{id}/messages/{message_id} - Edit a message in place.
pub async fn edit_message(
    State(state): State<AppState>,
    Path((id, message_id)): Path<(String, String)>,
    Json(body): Json<EditMessageRequest>,
) -> Result<Json<ApiResponse<Chat>>, AppError> {
    let start = Instant::now();
    let request_id = Uuid::now_v7().to_string();

    let id = parse_uuid(&id)?;
    let message_id = parse_uuid(&message_id)?;
    let chat = state
        .chat_service
        .edit_message(&id, &message_id, body.content)
        .await?;

    let elapsed = start.elapsed().as_millis() as u64;
    Ok(Json(ApiResponse::success(chat, request_id, elapsed)))
}

/// Request body for closing a conversation.
#[derive(Debug, Default, Deserialize)]
pub struct CloseChatRequest {
    pub resolution_status: Option<ResolutionStatus>,
    pub resolution_notes: Option<String>,
}

/// POST /api/v1/chats/{id}/close - Close with optional resolution.
pub async fn close_chat(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(body): Json<CloseChatRequest>,
) -> Result<Json<ApiResponse<Chat>>, AppError> {
    let start = Instant::now();
    let request_id = Uuid::now_v7().to_string();

    let id = parse_uuid(&id)?;
    let chat = state
        .chat_service
        .close_chat(&id, body.resolution_status, body.resolution_notes)
        .await?;

    let elapsed = start.elapsed().as_millis() as u64;
    Ok(Json(ApiResponse::success(chat, request_id, elapsed)))
}

/// Request body for pausing a conversation.
#[derive(Debug, Default, Deserialize)]
pub struct PauseChatRequest {
    pub reason: Option<String>,
}

/// POST /api/v1/chats/{id}/pause - Pause an active conversation.
pub async fn pause_chat(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(body): Json<PauseChatRequest>,
) -> Result<Json<ApiResponse<Chat>>, AppError> {
    let start = Instant::now();
    let request_id = Uuid::now_v7().to_string();

    let id = parse_uuid(&id)?;
    let chat = state.chat_service.pause_chat(&id, body.reason).await?;

    let elapsed = start.elapsed().as_millis() as u64;
    Ok(Json(ApiResponse::success(chat, request_id, elapsed)))
}

/// POST /api/v1/chats/{id}/resume - Resume a paused conversation.
pub async fn resume_chat(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<Chat>>, AppError> {
    let start = Instant::now();
    let request_id = Uuid::now_v7().to_string();

    let id = parse_uuid(&id)?;
    let chat = state.chat_service.resume_chat(&id).await?;

    let elapsed = start.elapsed().as_millis() as u64;
    Ok(Json(ApiResponse::success(chat, request_id, elapsed)))
}

/// POST /api/v1/chats/{id}/abandon - Mark as abandoned by the customer.
pub async fn abandon_chat(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<Chat>>, AppError> {
    let start = Instant::now();
    let request_id = Uuid::now_v7().to_string();

    let id = parse_uuid(&id)?;
    let chat = state.chat_service.abandon_chat(&id).await?;

    let elapsed = start.elapsed().as_millis() as u64;
    Ok(Json(ApiResponse::success(chat, request_id, elapsed)))
}

/// Request body for transferring a conversation.
#[derive(Debug, Deserialize)]
pub struct TransferChatRequest {
    pub agent_id: Uuid,
    pub notes: Option<String>,
}

/// POST /api/v1/chats/{id}/transfer - Hand off to another agent.
pub async fn transfer_chat(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(body): Json<TransferChatRequest>,
) -> Result<Json<ApiResponse<Chat>>, AppError> {
    let start = Instant::now();
    let request_id = Uuid::now_v7().to_string();

    let id = parse_uuid(&id)?;
    let chat = state
        .chat_service
        .transfer_chat(&id, body.agent_id, body.notes)
        .await?;

    let elapsed = start.elapsed().as_millis() as u64;
    Ok(Json(ApiResponse::success(chat, request_id, elapsed)))
}
