//! Axum router configuration with middleware.
//!
//! All routes are under `/api/v1/`.
//! Middleware: CORS, tracing.

use axum::routing::{delete, get, post, put};
use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::http::handlers;
use crate::state::AppState;

/// Build the complete API router with all routes and middleware.
pub fn build_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let api_routes = Router::new()
        // Conversation CRUD
        .route("/chats", post(handlers::chat::create_chat))
        .route("/chats", get(handlers::chat::list_chats))
        .route("/chats/search", get(handlers::chat::search_chats))
        .route("/chats/stats", get(handlers::chat::chat_stats))
        .route(
            "/chats/by-session/{session_id}",
            get(handlers::chat::get_chat_by_session),
        )
        .route("/chats/{id}", get(handlers::chat::get_chat))
        .route("/chats/{id}", put(handlers::chat::update_chat))
        .route("/chats/{id}", delete(handlers::chat::delete_chat))
        // Conversation message ledger
        .route("/chats/{id}/messages", post(handlers::chat::append_message))
        .route(
            "/chats/{id}/messages/read",
            post(handlers::chat::mark_messages_read),
        )
        .route(
            "/chats/{id}/messages/{message_id}",
            put(handlers::chat::edit_message),
        )
        // Conversation lifecycle
        .route("/chats/{id}/close", post(handlers::chat::close_chat))
        .route("/chats/{id}/pause", post(handlers::chat::pause_chat))
        .route("/chats/{id}/resume", post(handlers::chat::resume_chat))
        .route("/chats/{id}/abandon", post(handlers::chat::abandon_chat))
        .route("/chats/{id}/transfer", post(handlers::chat::transfer_chat))
        // Callback CRUD
        .route("/callbacks", post(handlers::callback::create_callback))
        .route("/callbacks", get(handlers::callback::list_callbacks))
        .route(
            "/callbacks/search",
            get(handlers::callback::search_callbacks),
        )
        .route("/callbacks/stats", get(handlers::callback::callback_stats))
        .route("/callbacks/{id}", get(handlers::callback::get_callback))
        .route("/callbacks/{id}", put(handlers::callback::update_callback))
        .route(
            "/callbacks/{id}",
            delete(handlers::callback::delete_callback),
        )
        // Callback lifecycle
        .route(
            "/callbacks/{id}/schedule",
            post(handlers::callback::schedule_callback),
        )
        .route(
            "/callbacks/{id}/attempts",
            post(handlers::callback::record_attempt),
        )
        .route(
            "/callbacks/{id}/complete",
            post(handlers::callback::complete_callback),
        )
        .route(
            "/callbacks/{id}/cancel",
            post(handlers::callback::cancel_callback),
        )
        .route(
            "/callbacks/{id}/no-answer",
            post(handlers::callback::mark_no_answer),
        )
        // Lead CRUD
        .route("/leads", post(handlers::lead::create_lead))
        .route("/leads", get(handlers::lead::list_leads))
        .route("/leads/{id}", get(handlers::lead::get_lead))
        .route("/leads/{id}", put(handlers::lead::update_lead))
        .route("/leads/{id}", delete(handlers::lead::delete_lead))
        // Dashboard stats
        .route("/stats", get(handlers::stats::dashboard_stats));

    Router::new()
        .nest("/api/v1", api_routes)
        .route("/health", get(health_check))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// GET /health - Simple health check endpoint.
async fn health_check() -> axum::Json<serde_json::Value> {
    axum::Json(serde_json::json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}
