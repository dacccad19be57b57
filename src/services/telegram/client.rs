//! Telegram Bot API notifier

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use std::time::Duration;
use tracing::{debug, warn};

use crate::config::TelegramSettings;
use crate::report::strip_markup;
use crate::services::notifier::{Notifier, NotifyError};

pub const DEFAULT_API_URL: &str = "https://api.telegram.org";

pub struct TelegramNotifier {
    client: Client,
    api_url: String,
    settings: TelegramSettings,
}

impl TelegramNotifier {
    pub fn new(settings: TelegramSettings) -> Result<Self, NotifyError> {
        let client = Client::builder().timeout(Duration::from_secs(10)).build()?;
        Ok(Self::with_client(DEFAULT_API_URL, client, settings))
    }

    pub fn with_client(api_url: impl Into<String>, client: Client, settings: TelegramSettings) -> Self {
        Self {
            client,
            api_url: api_url.into(),
            settings,
        }
    }

    fn send_message_url(&self) -> String {
        format!(
            "{}/bot{}/sendMessage",
            self.api_url.trim_end_matches('/'),
            self.settings.bot_token
        )
    }

    async fn post(&self, text: &str, parse_mode: Option<&str>) -> Result<(), NotifyError> {
        let mut form = vec![("chat_id", self.settings.chat_id.as_str()), ("text", text)];
        if let Some(mode) = parse_mode {
            form.push(("parse_mode", mode));
        }

        let response = self
            .client
            .post(self.send_message_url())
            .form(&form)
            .send()
            .await?;

        let status = response.status();
        if status.is_success() {
            return Ok(());
        }
        let body = response.text().await.unwrap_or_default();
        Err(NotifyError::Rejected {
            status: status.as_u16(),
            body,
        })
    }
}

#[async_trait]
impl Notifier for TelegramNotifier {
    /// Send as HTML; if Telegram rejects the markup, resend once as plain text.
    async fn send(&self, text: &str) -> Result<(), NotifyError> {
        match self.post(text, Some("HTML")).await {
            Err(NotifyError::Rejected { status, body })
                if status == StatusCode::BAD_REQUEST.as_u16() =>
            {
                warn!(
                    status = status,
                    body = %body,
                    "TelegramNotifier: formatted message rejected, resending as plain text"
                );
                self.post(&strip_markup(text), None).await
            }
            Ok(()) => {
                debug!("TelegramNotifier: message delivered");
                Ok(())
            }
            Err(e) => Err(e),
        }
    }
}
