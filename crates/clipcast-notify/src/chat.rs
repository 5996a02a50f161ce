//! Operator chat notifications (C8): best-effort start/complete/fail
//! summaries to a Telegram chat, never retried.

use reqwest::Client;
use serde::Serialize;
use tracing::{debug, warn};

use crate::error::NotifyResult;

#[derive(Debug, Serialize)]
struct SendMessageRequest<'a> {
    chat_id: &'a str,
    text: String,
    parse_mode: &'static str,
}

/// Telegram Bot API `sendMessage` client, constructed once from env.
#[derive(Clone)]
pub struct ChatNotifier {
    http: Client,
    bot_token: Option<String>,
    chat_id: Option<String>,
    enabled: bool,
}

impl ChatNotifier {
    pub fn from_env() -> Self {
        let enabled = std::env::var("ENABLE_TELEGRAM_NOTIFICATIONS")
            .map(|v| matches!(v.trim().to_lowercase().as_str(), "1" | "true" | "yes" | "on"))
            .unwrap_or(false);
        Self {
            http: Client::new(),
            bot_token: std::env::var("TELEGRAM_BOT_TOKEN").ok(),
            chat_id: std::env::var("TELEGRAM_CHAT_ID").ok(),
            enabled,
        }
    }

    fn is_configured(&self) -> bool {
        self.enabled && self.bot_token.is_some() && self.chat_id.is_some()
    }

    pub async fn notify_started(&self, job_id: &str, estimated_cost: f64, estimated_time_sec: u32) {
        self.send(format!(
            "\u{1F3AC} job {job_id} started\nestimated cost: ${estimated_cost:.4}\nestimated time: {estimated_time_sec}s"
        ))
        .await;
    }

    pub async fn notify_completed(&self, job_id: &str, estimated_cost: f64, realized_cost: f64, processing_time_ms: u64) {
        self.send(format!(
            "\u{2705} job {job_id} completed\nestimated cost: ${estimated_cost:.4}\nrealized cost: ${realized_cost:.4}\nprocessing time: {processing_time_ms}ms"
        ))
        .await;
    }

    pub async fn notify_failed(&self, job_id: &str, error: &str) {
        self.send(format!("\u{274C} job {job_id} failed\n{error}")).await;
    }

    async fn send(&self, text: String) {
        if let Err(e) = self.try_send(text).await {
            warn!("chat notifier failed, swallowing: {}", e);
        }
    }

    async fn try_send(&self, text: String) -> NotifyResult<()> {
        let (Some(bot_token), Some(chat_id)) = (&self.bot_token, &self.chat_id) else {
            return Ok(());
        };
        if !self.is_configured() {
            return Ok(());
        }

        let url = format!("https://api.telegram.org/bot{bot_token}/sendMessage");
        let request = SendMessageRequest { chat_id, text, parse_mode: "HTML" };

        let response = self.http.post(&url).json(&request).send().await?;
        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            return Err(crate::error::NotifyError::ProviderError { status, body });
        }

        debug!("chat notification sent");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::method;
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn disabled_notifier_is_a_noop() {
        let notifier = ChatNotifier {
            http: Client::new(),
            bot_token: Some("t".to_string()),
            chat_id: Some("c".to_string()),
            enabled: false,
        };
        notifier.notify_started("job1", 0.01, 20).await;
    }

    #[tokio::test]
    async fn enabled_but_missing_token_is_a_noop() {
        let notifier = ChatNotifier {
            http: Client::new(),
            bot_token: None,
            chat_id: None,
            enabled: true,
        };
        notifier.notify_completed("job1", 0.01, 0.012, 1500).await;
    }

    #[tokio::test]
    #[ignore = "requires pointing the Telegram base URL at a mock server; not parameterized here"]
    async fn enabled_notifier_posts_to_telegram_api() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200))
            .mount(&server)
            .await;
        let _ = server.uri();
    }
}
