//! Remote push delivery client.
//!
//! Sends one HTTP POST per notification to the configured push-delivery
//! endpoint. Delivery is best-effort: a failed request is reported to the
//! caller for logging and never retried, and no timeout is applied — the
//! dispatch flow does not wait on push success for anything else.

use serde_json::json;

use leadline_core::types::DbId;

/// Error type for push delivery failures.
#[derive(Debug, thiserror::Error)]
pub enum PushError {
    /// No push endpoint is configured; the channel is skipped.
    #[error("push endpoint not configured")]
    NotConfigured,

    /// The underlying HTTP request failed (network, DNS, etc.).
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The endpoint returned a non-2xx status code.
    #[error("Push endpoint returned HTTP {0}")]
    HttpStatus(u16),
}

/// Delivers notifications to the remote push endpoint.
pub struct PushDelivery {
    client: reqwest::Client,
    endpoint: Option<String>,
}

impl PushDelivery {
    /// Create a new delivery client for the given endpoint URL.
    pub fn new(endpoint: Option<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            endpoint,
        }
    }

    /// POST one notification to the push endpoint.
    ///
    /// The wire format is `{userId, title, body, url, data}`. Any non-2xx
    /// response is a delivery failure; the notification is then permanently
    /// lost on this channel.
    pub async fn send(
        &self,
        user_id: DbId,
        title: &str,
        body: &str,
        url: &str,
        data: serde_json::Value,
    ) -> Result<(), PushError> {
        let Some(endpoint) = &self.endpoint else {
            return Err(PushError::NotConfigured);
        };

        let payload = json!({
            "userId": user_id,
            "title": title,
            "body": body,
            "url": url,
            "data": data,
        });

        let response = self.client.post(endpoint).json(&payload).send().await?;
        if !response.status().is_success() {
            return Err(PushError::HttpStatus(response.status().as_u16()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_does_not_panic() {
        let _delivery = PushDelivery::new(None);
        let _delivery = PushDelivery::new(Some("http://localhost:9/push".to_string()));
    }

    #[tokio::test]
    async fn unconfigured_endpoint_reports_not_configured() {
        let delivery = PushDelivery::new(None);
        let result = delivery
            .send(
                uuid::Uuid::new_v4(),
                "title",
                "body",
                "/telecaller/leads",
                serde_json::json!({}),
            )
            .await;
        assert!(matches!(result, Err(PushError::NotConfigured)));
    }
}
