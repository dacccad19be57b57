//! Outbound notification channel.

use async_trait::async_trait;
use thiserror::Error;
use tracing::info;

use crate::report::strip_markup;

#[derive(Debug, Error)]
pub enum NotifyError {
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("message rejected with HTTP {status}: {body}")]
    Rejected { status: u16, body: String },
}

#[async_trait]
pub trait Notifier: Send + Sync {
    /// Deliver one message. `text` may carry simple HTML markup (`<b>`, `<i>`).
    async fn send(&self, text: &str) -> Result<(), NotifyError>;
}

/// Writes messages to the log as plain text. Used when no channel is configured.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogNotifier;

#[async_trait]
impl Notifier for LogNotifier {
    async fn send(&self, text: &str) -> Result<(), NotifyError> {
        info!(target: "notifications", "{}", strip_markup(text));
        Ok(())
    }
}
