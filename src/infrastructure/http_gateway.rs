use crate::domain::notification::RawFields;
use crate::domain::ports::EchoGateway;
use crate::error::{NotifyError, Result};
use async_trait::async_trait;
use std::time::Duration;
use tracing::debug;

pub const DEFAULT_ECHO_TIMEOUT_MS: u64 = 10_000;

/// Echoes notifications to the gateway over HTTPS as form-encoded POSTs.
#[derive(Clone)]
pub struct HttpEchoGateway {
    pub client: reqwest::Client,
    pub timeout_ms: u64,
}

impl HttpEchoGateway {
    pub fn new(timeout_ms: u64) -> Self {
        Self {
            client: reqwest::Client::new(),
            timeout_ms,
        }
    }
}

impl Default for HttpEchoGateway {
    fn default() -> Self {
        Self::new(DEFAULT_ECHO_TIMEOUT_MS)
    }
}

#[async_trait]
impl EchoGateway for HttpEchoGateway {
    async fn post_echo(&self, url: &str, fields: &RawFields) -> Result<String> {
        let resp = self
            .client
            .post(url)
            .form(fields)
            .timeout(Duration::from_millis(self.timeout_ms))
            .send()
            .await;

        match resp {
            Ok(r) if r.status().is_success() => r
                .text()
                .await
                .map_err(|e| NotifyError::EchoUnavailable(format!("reading echo response: {e}"))),
            Ok(r) => {
                let status = r.status();
                debug!(status = status.as_u16(), "echo endpoint answered with an error status");
                Err(NotifyError::EchoUnavailable(format!("HTTP_{}", status.as_u16())))
            }
            Err(e) if e.is_timeout() => Err(NotifyError::EchoUnavailable(format!(
                "timed out after {} ms",
                self.timeout_ms
            ))),
            Err(e) => Err(NotifyError::EchoUnavailable(e.without_url().to_string())),
        }
    }
}
