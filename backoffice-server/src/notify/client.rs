//! Messaging API Client
//!
//! Form-encoded `POST /Messages` with basic auth. Addresses carry the
//! transport channel prefix (e.g. `whatsapp:+34...`).

use serde::Deserialize;
use thiserror::Error;

use crate::core::config::MessagingConfig;
use crate::notify::phone::normalize_phone;

#[derive(Debug, Error)]
pub enum NotifyError {
    #[error("Messaging HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Messaging API error ({status}): {body}")]
    Api { status: u16, body: String },
}

#[derive(Debug, Deserialize)]
struct MessageResponse {
    sid: String,
}

/// External messaging client
#[derive(Clone)]
pub struct MessagingClient {
    http: reqwest::Client,
    config: MessagingConfig,
}

impl MessagingClient {
    pub fn new(config: MessagingConfig) -> Self {
        Self {
            http: reqwest::Client::new(),
            config,
        }
    }

    /// Send one message. The recipient is normalized and channel-prefixed
    /// here; returns the provider's message id.
    pub async fn send(&self, recipient: &str, body: &str) -> Result<String, NotifyError> {
        let to = format!("{}{}", self.config.channel_prefix, normalize_phone(recipient));
        let from = format!(
            "{}{}",
            self.config.channel_prefix,
            normalize_phone(&self.config.from)
        );

        let url = format!("{}/Messages", self.config.base_url);
        let resp = self
            .http
            .post(&url)
            .basic_auth(&self.config.account_sid, Some(&self.config.auth_token))
            .form(&[("From", from.as_str()), ("To", to.as_str()), ("Body", body)])
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(NotifyError::Api {
                status: status.as_u16(),
                body,
            });
        }

        let msg: MessageResponse = resp.json().await?;
        Ok(msg.sid)
    }
}
