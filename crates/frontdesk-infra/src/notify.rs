//! Notification dispatchers.
//!
//! `WebhookNotifier` POSTs a JSON payload to a configured endpoint;
//! `NoopNotifier` swallows everything and is the default when no webhook URL
//! is configured. Dispatch failures are reported to the caller, which treats
//! them as fire-and-forget.

use frontdesk_core::notify::{DeliveryMethod, NotificationDispatcher, NotificationKind};
use frontdesk_types::error::NotifyError;
use serde::Serialize;
use tracing::debug;
use uuid::Uuid;

#[derive(Serialize)]
struct WebhookPayload<'a> {
    notification_id: Uuid,
    recipient: Uuid,
    kind: NotificationKind,
    title: &'a str,
    body: &'a str,
    method: DeliveryMethod,
}

/// Dispatcher that delivers notifications to an HTTP webhook.
pub struct WebhookNotifier {
    client: reqwest::Client,
    url: String,
}

impl WebhookNotifier {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            url: url.into(),
        }
    }
}

impl NotificationDispatcher for WebhookNotifier {
    async fn dispatch(
        &self,
        recipient: Uuid,
        kind: NotificationKind,
        title: &str,
        body: &str,
        method: DeliveryMethod,
    ) -> Result<Option<Uuid>, NotifyError> {
        let notification_id = Uuid::now_v7();
        let payload = WebhookPayload {
            notification_id,
            recipient,
            kind,
            title,
            body,
            method,
        };

        let response = self
            .client
            .post(&self.url)
            .json(&payload)
            .send()
            .await
            .map_err(|e| NotifyError::Dispatch(e.to_string()))?;

        if !response.status().is_success() {
            return Err(NotifyError::Dispatch(format!(
                "webhook returned {}",
                response.status()
            )));
        }

        debug!(%notification_id, %recipient, %kind, "Notification delivered");
        Ok(Some(notification_id))
    }
}

/// Dispatcher that drops every notification. Used when no webhook URL is
/// configured.
#[derive(Default, Clone, Copy)]
pub struct NoopNotifier;

impl NotificationDispatcher for NoopNotifier {
    async fn dispatch(
        &self,
        recipient: Uuid,
        kind: NotificationKind,
        _title: &str,
        _body: &str,
        _method: DeliveryMethod,
    ) -> Result<Option<Uuid>, NotifyError> {
        debug!(%recipient, %kind, "Notification dropped (no dispatcher configured)");
        Ok(None)
    }
}

/// Runtime-selected dispatcher: webhook when a URL is configured, no-op
/// otherwise. Lets callers pin one concrete type for service generics.
pub enum Notifier {
    Webhook(WebhookNotifier),
    Noop(NoopNotifier),
}

impl Notifier {
    /// Build from an optional webhook URL.
    pub fn from_webhook_url(url: Option<&str>) -> Self {
        match url {
            Some(url) => Notifier::Webhook(WebhookNotifier::new(url)),
            None => Notifier::Noop(NoopNotifier),
        }
    }
}

impl NotificationDispatcher for Notifier {
    async fn dispatch(
        &self,
        recipient: Uuid,
        kind: NotificationKind,
        title: &str,
        body: &str,
        method: DeliveryMethod,
    ) -> Result<Option<Uuid>, NotifyError> {
        match self {
            Notifier::Webhook(inner) => inner.dispatch(recipient, kind, title, body, method).await,
            Notifier::Noop(inner) => inner.dispatch(recipient, kind, title, body, method).await,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn noop_returns_no_id() {
        let notifier = NoopNotifier;
        let result = notifier
            .dispatch(
                Uuid::now_v7(),
                NotificationKind::CallbackScheduled,
                "Callback scheduled",
                "Callback for John Doe",
                DeliveryMethod::Push,
            )
            .await
            .unwrap();
        assert!(result.is_none());
    }

    #[tokio::test]
    async fn webhook_unreachable_endpoint_is_dispatch_error() {
        // Port 9 (discard) is closed in practice; connection should fail fast.
        let notifier = WebhookNotifier::new("http://127.0.0.1:9/hooks");
        let err = notifier
            .dispatch(
                Uuid::now_v7(),
                NotificationKind::ChatTransferred,
                "Chat transferred",
                "Chat sess-1 transferred to you",
                DeliveryMethod::Push,
            )
            .await
            .unwrap_err();
        assert!(matches!(err, NotifyError::Dispatch(_)));
    }
}
