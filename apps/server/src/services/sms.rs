//! SMS gateway client
//!
//! Sends a text through a conversation-scoped HTTP gateway. The sender is
//! fully isolated from the search path: callers treat a failure as a
//! degraded response, never as a request failure.

use std::time::Duration;

use serde_json::json;
use url::Url;

use crate::config::SmsConfig;
use crate::{Error, Result};

struct Gateway {
    messages_url: Url,
    account_key: String,
    api_token: String,
}

pub struct SmsSender {
    http: reqwest::Client,
    gateway: Option<Gateway>,
}

impl SmsSender {
    pub fn new(config: &SmsConfig) -> anyhow::Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()?;

        let gateway = if config.is_configured() {
            // validate() guarantees all fields are present together.
            let api_url = config.api_url.as_deref().unwrap_or_default();
            let conversation_key = config.conversation_key.as_deref().unwrap_or_default();

            let mut base: Url = api_url.parse()?;
            if !base.path().ends_with('/') {
                base.set_path(&format!("{}/", base.path()));
            }
            let messages_url = base.join(&format!("{conversation_key}/messages.json"))?;

            Some(Gateway {
                messages_url,
                account_key: config.account_key.clone().unwrap_or_default(),
                api_token: config.api_token.clone().unwrap_or_default(),
            })
        } else {
            None
        };

        Ok(Self { http, gateway })
    }

    /// Send `content` to `to_addr` through the gateway.
    pub async fn send_text(&self, to_addr: &str, content: &str) -> Result<()> {
        let Some(gateway) = &self.gateway else {
            return Err(Error::SmsGateway("SMS gateway is not configured".to_string()));
        };

        let response = self
            .http
            .put(gateway.messages_url.clone())
            .basic_auth(&gateway.account_key, Some(&gateway.api_token))
            .json(&json!({ "to_addr": to_addr, "content": content }))
            .send()
            .await
            .map_err(|e| Error::SmsGateway(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(Error::SmsGateway(format!("gateway returned {status}")));
        }

        Ok(())
    }
}
