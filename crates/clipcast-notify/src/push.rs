//! User push notification on job completion (C8).
//!
//! Constructed only when a job carries a `deviceToken`; a no-op client when
//! `PUSH_GATEWAY_URL` is unset, so a deployment with no push provider
//! configured never fails a job over it.

use reqwest::Client;
use serde::Serialize;
use tracing::{debug, warn};

use crate::error::NotifyResult;

#[derive(Debug, Serialize)]
struct PushPayload<'a> {
    device_token: &'a str,
    title: &'a str,
    body: &'a str,
    data: PushData<'a>,
}

#[derive(Debug, Serialize)]
struct PushData<'a> {
    job_id: &'a str,
}

/// Thin abstraction over a generic push gateway (FCM, APNs, or a
/// provider-agnostic relay), so the concrete provider can be swapped without
/// touching the scheduler or worker.
#[derive(Clone)]
pub struct PushClient {
    http: Client,
    gateway_url: Option<String>,
    gateway_key: Option<String>,
}

impl PushClient {
    pub fn from_env() -> Self {
        Self {
            http: Client::new(),
            gateway_url: std::env::var("PUSH_GATEWAY_URL").ok(),
            gateway_key: std::env::var("PUSH_GATEWAY_KEY").ok(),
        }
    }

    pub fn is_configured(&self) -> bool {
        self.gateway_url.is_some()
    }

    /// Send a completion push. Never fails the job: callers should log and
    /// discard the `Err`, per the notifier contract.
    pub async fn send_completion(&self, device_token: &str, podcast_name: &str, title: &str, job_id: &str) -> NotifyResult<()> {
        let Some(gateway_url) = &self.gateway_url else {
            debug!("push gateway not configured, skipping push for job {}", job_id);
            return Ok(());
        };

        let payload = PushPayload {
            device_token,
            title: podcast_name,
            body: title,
            data: PushData { job_id },
        };

        let mut request = self.http.post(gateway_url).json(&payload);
        if let Some(key) = &self.gateway_key {
            request = request.bearer_auth(key);
        }

        let response = request.send().await?;
        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            warn!(job_id, status, "push gateway returned an error: {}", body);
            return Err(crate::error::NotifyError::ProviderError { status, body });
        }

        debug!(job_id, "push sent");
        Ok(())
    }
}
