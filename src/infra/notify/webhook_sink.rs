use crate::domain::models::outbox::OutboxEvent;
use crate::domain::ports::NotificationSink;
use crate::error::AppError;
use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;
use tracing::error;

/// Posts booking/schedule events to the external notification/audit
/// collaborator. Delivery failures are reported back to the worker and
/// recorded on the outbox row; they never touch the booking that
/// produced the event.
pub struct WebhookSink {
    client: Client,
    webhook_url: String,
    token: String,
}

impl WebhookSink {
    pub fn new(webhook_url: String, token: String) -> Self {
        Self {
            client: Client::new(),
            webhook_url,
            token,
        }
    }
}

#[derive(Serialize)]
struct EventPayload<'a> {
    event_id: &'a str,
    tenant_id: &'a str,
    event_type: &'a str,
    payload: serde_json::Value,
    occurred_at: chrono::DateTime<chrono::Utc>,
}

#[async_trait]
impl NotificationSink for WebhookSink {
    async fn dispatch(&self, event: &OutboxEvent) -> Result<(), AppError> {
        let payload = EventPayload {
            event_id: &event.id,
            tenant_id: &event.tenant_id,
            event_type: &event.event_type,
            payload: serde_json::from_str(&event.payload).unwrap_or(serde_json::Value::Null),
            occurred_at: event.created_at,
        };

        let res = self
            .client
            .post(&self.webhook_url)
            .header("Authorization", format!("Bearer {}", self.token))
            .json(&payload)
            .send()
            .await
            .map_err(|e| {
                let msg = format!("Notification sink connection error: {}", e);
                error!("{}", msg);
                AppError::Transient(msg)
            })?;

        if !res.status().is_success() {
            let status = res.status();
            let text = res.text().await.unwrap_or_default();
            let msg = format!("Notification sink failed. Status: {}, Body: {}", status, text);
            error!("{}", msg);
            return Err(AppError::Transient(msg));
        }

        Ok(())
    }
}
