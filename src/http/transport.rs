//! `reqwest`-backed [`Transport`].

use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;

use super::retry::RetryPolicy;
use crate::error::{HttpError, TransportError};
use crate::rpc::Transport;

/// Delivers RPC bodies over HTTP. Non-2xx statuses are errors.
#[derive(Clone, Debug)]
pub struct HttpTransport {
    client: Client,
    retry: RetryPolicy,
}

impl HttpTransport {
    pub fn new() -> Result<Self, HttpError> {
        Self::with_retry(RetryPolicy::None)
    }

    pub fn with_retry(retry: RetryPolicy) -> Result<Self, HttpError> {
        let mut builder = Client::builder();
        #[cfg(not(target_arch = "wasm32"))]
        {
            builder = builder
                .timeout(Duration::from_secs(30))
                .pool_max_idle_per_host(4);
        }
        Ok(Self {
            client: builder.build()?,
            retry,
        })
    }

    async fn request_with_retry(
        &self,
        verb: &reqwest::Method,
        endpoint: &str,
        body: Option<&str>,
    ) -> Result<String, HttpError> {
        let Some(config) = self.retry.config() else {
            return self.do_request(verb, endpoint, body).await;
        };

        let mut last_error = None;

        for attempt in 0..=config.max_retries {
            match self.do_request(verb, endpoint, body).await {
                Ok(text) => return Ok(text),
                Err(e) if config.should_retry(&e) && attempt < config.max_retries => {
                    let delay = config.delay_for_attempt(attempt);
                    tracing::debug!(
                        attempt = attempt + 1,
                        max = config.max_retries,
                        delay_ms = delay.as_millis() as u64,
                        error = %e,
                        "Retrying request to {}",
                        endpoint
                    );
                    futures_timer::Delay::new(delay).await;
                    last_error = Some(e);
                }
                Err(e) => return Err(e),
            }
        }

        Err(HttpError::MaxRetriesExceeded {
            attempts: config.max_retries + 1,
            last_error: last_error
                .map(|e| e.to_string())
                .unwrap_or_else(|| "unknown".to_string()),
        })
    }

    async fn do_request(
        &self,
        verb: &reqwest::Method,
        endpoint: &str,
        body: Option<&str>,
    ) -> Result<String, HttpError> {
        let mut req = self.client.request(verb.clone(), endpoint);
        if let Some(body) = body {
            req = req
                .header(reqwest::header::CONTENT_TYPE, "application/json")
                .body(body.to_string());
        }

        let resp = req.send().await?;
        let status = resp.status();
        if status.is_success() {
            return Ok(resp.text().await?);
        }

        let status_code = status.as_u16();
        let body_text = resp.text().await.unwrap_or_default();

        match status_code {
            401 => Err(HttpError::Unauthorized),
            429 => Err(HttpError::RateLimited),
            400..=499 => Err(HttpError::BadRequest {
                status: status_code,
                body: body_text,
            }),
            _ => Err(HttpError::ServerError {
                status: status_code,
                body: body_text,
            }),
        }
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn send(
        &self,
        endpoint: &str,
        http_verb: &str,
        body: Option<String>,
    ) -> Result<String, TransportError> {
        let verb = reqwest::Method::from_bytes(http_verb.as_bytes())
            .map_err(|_| HttpError::InvalidVerb(http_verb.to_string()))?;
        Ok(self
            .request_with_retry(&verb, endpoint, body.as_deref())
            .await?)
    }
}
