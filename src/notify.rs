//! Best-effort error notifications over the Telegram Bot API.
//!
//! Notifications are spawned onto the runtime and never joined by request
//! handlers. Delivery failures are logged and dropped.

use async_trait::async_trait;
use serde::Serialize;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;

pub const DEFAULT_TELEGRAM_API_BASE: &str = "https://api.telegram.org";
/// Telegram rejects messages longer than this many characters.
const MAX_MESSAGE_CHARS: usize = 4096;

#[derive(Debug, Error)]
pub enum NotificationError {
    #[error("notification request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("notification rejected with status {status}: {body}")]
    Rejected { status: u16, body: String },
}

#[derive(Clone)]
pub struct TelegramConfig {
    pub bot_token: String,
    pub chat_id: String,
    pub api_base: String,
    pub timeout: Duration,
}

impl fmt::Debug for TelegramConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TelegramConfig")
            .field("bot_token", &"<redacted>")
            .field("chat_id", &self.chat_id)
            .field("api_base", &self.api_base)
            .field("timeout", &self.timeout)
            .finish()
    }
}

#[derive(Serialize)]
struct SendMessage<'a> {
    chat_id: &'a str,
    text: &'a str,
    disable_web_page_preview: bool,
}

/// Delivery channel for error reports.
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn send(&self, text: &str) -> Result<(), NotificationError>;
}

pub struct TelegramNotifier {
    client: reqwest::Client,
    config: TelegramConfig,
}

impl TelegramNotifier {
    pub fn new(config: TelegramConfig, client: reqwest::Client) -> Self {
        Self { client, config }
    }
}

#[async_trait]
impl Notifier for TelegramNotifier {
    /// Send one message, bounded by the configured timeout.
    async fn send(&self, text: &str) -> Result<(), NotificationError> {
        let url = format!(
            "{}/bot{}/sendMessage",
            self.config.api_base.trim_end_matches('/'),
            self.config.bot_token
        );
        let text = truncate_chars(text, MAX_MESSAGE_CHARS);

        let response = self
            .client
            .post(&url)
            .timeout(self.config.timeout)
            .json(&SendMessage {
                chat_id: &self.config.chat_id,
                text,
                disable_web_page_preview: true,
            })
            .send()
            .await?;

        let status = response.status();
        if status.is_success() {
            return Ok(());
        }
        let body = response.text().await.unwrap_or_default();
        Err(NotificationError::Rejected {
            status: status.as_u16(),
            body,
        })
    }
}

/// Fire-and-forget error reporter. Cheap to clone.
#[derive(Clone, Default)]
pub struct ErrorNotifier {
    sink: Option<Arc<dyn Notifier>>,
}

impl ErrorNotifier {
    pub fn disabled() -> Self {
        Self { sink: None }
    }

    pub fn new(config: Option<TelegramConfig>, client: reqwest::Client) -> Self {
        Self {
            sink: config.map(|config| {
                Arc::new(TelegramNotifier::new(config, client)) as Arc<dyn Notifier>
            }),
        }
    }

    pub fn with_sink(sink: Arc<dyn Notifier>) -> Self {
        Self { sink: Some(sink) }
    }

    pub fn is_enabled(&self) -> bool {
        self.sink.is_some()
    }

    /// Queue `text` for delivery and return immediately.
    pub fn notify(&self, text: impl Into<String>) {
        let Some(sink) = self.sink.clone() else {
            return;
        };
        let handle = match tokio::runtime::Handle::try_current() {
            Ok(handle) => handle,
            Err(_) => {
                log::warn!("no async runtime available, dropping error notification");
                return;
            }
        };

        let text = text.into();
        handle.spawn(async move {
            match sink.send(&text).await {
                Ok(()) => log::debug!("error notification delivered"),
                Err(e) => log::warn!("failed to deliver error notification: {}", e),
            }
        });
    }
}

fn truncate_chars(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((end, _)) => &text[..end],
        None => text,
    }
}
