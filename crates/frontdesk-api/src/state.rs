//! Application state wiring all services together.
//!
//! AppState holds the concrete service instances used by both CLI and REST
//! API. Services are generic over repository/notifier traits, but AppState
//! pins them to the concrete infra implementations.

use std::path::PathBuf;
use std::sync::Arc;

use frontdesk_core::service::{CallbackService, ChatService, LeadService};
use frontdesk_infra::config::{load_config, resolve_data_dir, resolve_database_url};
use frontdesk_infra::notify::Notifier;
use frontdesk_infra::sqlite::pool::DatabasePool;
use frontdesk_infra::sqlite::{
    SqliteCallbackRepository, SqliteChatRepository, SqliteLeadRepository,
};
use frontdesk_types::config::ServiceConfig;

/// Concrete type aliases for the service generics pinned to infra implementations.
pub type ConcreteChatService = ChatService<SqliteChatRepository, Notifier>;
pub type ConcreteCallbackService = CallbackService<SqliteCallbackRepository, Notifier>;
pub type ConcreteLeadService = LeadService<SqliteLeadRepository>;

/// Shared application state holding all services.
///
/// Used by both CLI commands and REST API handlers.
#[derive(Clone)]
pub struct AppState {
    pub chat_service: Arc<ConcreteChatService>,
    pub callback_service: Arc<ConcreteCallbackService>,
    pub lead_service: Arc<ConcreteLeadService>,
    pub config: ServiceConfig,
    pub data_dir: PathBuf,
    pub db_pool: DatabasePool,
}

impl AppState {
    /// Initialize the application state: load config, connect to the
    /// database, wire services.
    pub async fn init() -> anyhow::Result<Self> {
        let data_dir = resolve_data_dir();

        // Ensure data directory exists
        tokio::fs::create_dir_all(&data_dir).await?;

        let config = load_config(&data_dir).await;

        let db_url = format!("{}?mode=rwc", resolve_database_url(&config, &data_dir));
        tracing::debug!(data_dir = %data_dir.display(), "Opening database");
        let db_pool = DatabasePool::new(&db_url).await?;

        let webhook_url = config.notifications.webhook_url.as_deref();
        let chat_service = ChatService::new(
            SqliteChatRepository::new(db_pool.clone()),
            Notifier::from_webhook_url(webhook_url),
        );
        let callback_service = CallbackService::new(
            SqliteCallbackRepository::new(db_pool.clone()),
            Notifier::from_webhook_url(webhook_url),
        );
        let lead_service = LeadService::new(SqliteLeadRepository::new(db_pool.clone()));

        Ok(Self {
            chat_service: Arc::new(chat_service),
            callback_service: Arc::new(callback_service),
            lead_service: Arc::new(lead_service),
            config,
            data_dir,
            db_pool,
        })
    }
}
