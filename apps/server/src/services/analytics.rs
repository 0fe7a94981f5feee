//! Best-effort analytics events
//!
//! Measurement-protocol events are posted on a detached task so they can
//! never block or fail a request. With no tracking id configured the client
//! is a no-op.

use std::time::Duration;

use crate::config::AnalyticsConfig;

pub struct AnalyticsClient {
    http: reqwest::Client,
    endpoint: String,
    tracking_id: Option<String>,
    client_id: String,
}

impl AnalyticsClient {
    pub fn new(config: &AnalyticsConfig) -> anyhow::Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()?;

        Ok(Self {
            http,
            endpoint: config.endpoint.clone(),
            tracking_id: config.tracking_id.clone(),
            client_id: config.client_id.clone(),
        })
    }

    /// Fire an event; failures are logged and swallowed.
    pub fn send_event(&self, path: &str, category: &str, action: &str, label: &str) {
        let Some(tracking_id) = &self.tracking_id else {
            return;
        };

        let params: Vec<(&'static str, String)> = vec![
            ("v", "1".to_string()),
            ("tid", tracking_id.clone()),
            ("cid", self.client_id.clone()),
            ("t", "event".to_string()),
            ("dp", path.to_string()),
            ("ec", category.to_string()),
            ("ea", action.to_string()),
            ("el", label.to_string()),
        ];

        let http = self.http.clone();
        let endpoint = self.endpoint.clone();

        tokio::spawn(async move {
            let result = http
                .post(&endpoint)
                .form(&params)
                .send()
                .await
                .and_then(|response| response.error_for_status());

            if let Err(error) = result {
                tracing::warn!(%error, "analytics call failed");
            }
        });
    }
}
