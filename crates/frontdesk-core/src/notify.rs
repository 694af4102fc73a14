//! Notification dispatch collaborator trait.
//!
//! Fire-and-forget: the service facades call [`NotificationDispatcher::dispatch`]
//! after certain transitions (callback scheduled, chat transferred) and
//! downgrade any failure to a `warn!` log. Implementations live in
//! frontdesk-infra (`WebhookNotifier`, `NoopNotifier`).

use frontdesk_types::error::NotifyError;
use serde::Serialize;
use uuid::Uuid;

use std::fmt;

/// What triggered the notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationKind {
    CallbackScheduled,
    ChatTransferred,
}

impl fmt::Display for NotificationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NotificationKind::CallbackScheduled => write!(f, "callback_scheduled"),
            NotificationKind::ChatTransferred => write!(f, "chat_transferred"),
        }
    }
}

/// How the notification should reach the recipient.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DeliveryMethod {
    Email,
    Sms,
    Push,
}

/// Outbound notification delivery.
///
/// Returns the delivery log id when the downstream system produced one.
pub trait NotificationDispatcher: Send + Sync {
    fn dispatch(
        &self,
        recipient: Uuid,
        kind: NotificationKind,
        title: &str,
        body: &str,
        method: DeliveryMethod,
    ) -> impl std::future::Future<Output = Result<Option<Uuid>, NotifyError>> + Send;
}
