//! Resilient HTTP transport.
//!
//! # Responsibilities
//! - Resolve request targets against the configured base address
//! - Execute one logical request, retrying transient failures with backoff
//! - Surface the last failure with attempt count and target once the budget is spent

use std::time::Duration;

use reqwest::{Client, StatusCode};
use url::Url;
use uuid::Uuid;

use crate::config::{ClientConfig, ServiceConfig};
use crate::observability::metrics;
use crate::resilience::{is_retryable_status, RetryPolicy};
use crate::transport::error::TransportError;
use crate::transport::request::{TransportRequest, TransportResponse};

/// HTTP executor with bounded, classified retry.
#[derive(Clone)]
pub struct ResilientTransport {
    client: Client,
    base_url: Url,
    policy: RetryPolicy,
}

impl ResilientTransport {
    /// Create a transport for the given service and retry policy.
    pub fn new(service: &ServiceConfig, policy: RetryPolicy) -> Result<Self, TransportError> {
        let base_url = Url::parse(&service.base_url).map_err(|e| {
            TransportError::InvalidTarget(format!("base URL '{}': {}", service.base_url, e))
        })?;
        if base_url.cannot_be_a_base() {
            return Err(TransportError::InvalidTarget(format!(
                "base URL '{}' cannot carry a path",
                service.base_url
            )));
        }

        let client = Client::builder()
            .timeout(Duration::from_secs(service.request_timeout_secs))
            .connect_timeout(Duration::from_secs(service.connect_timeout_secs))
            .user_agent(service.user_agent.as_str())
            .build()
            .map_err(TransportError::Client)?;

        Ok(Self {
            client,
            base_url,
            policy,
        })
    }

    pub fn from_config(config: &ClientConfig) -> Result<Self, TransportError> {
        Self::new(&config.service, RetryPolicy::from(&config.retries))
    }

    /// Build the absolute URL for a request's path segments.
    pub fn url_for(&self, segments: &[String]) -> Result<Url, TransportError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| TransportError::InvalidTarget(self.base_url.to_string()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    /// Execute a request, retrying network failures and retryable statuses.
    pub async fn execute(
        &self,
        request: &TransportRequest,
    ) -> Result<TransportResponse, TransportError> {
        let url = self.url_for(&request.segments)?;
        let target = url.to_string();
        let method = request.method.clone();
        let max_attempts = self.policy.max_attempts();
        let mut attempt = 0;

        loop {
            attempt += 1;

            match self.send_once(request, &url).await {
                Ok((status, body)) if status.is_success() => {
                    metrics::record_request("success");
                    return Ok(TransportResponse { status, body });
                }
                Ok((status, body)) if is_retryable_status(status) => {
                    if attempt >= max_attempts {
                        metrics::record_request("exhausted");
                        return Err(TransportError::RetriesExhausted {
                            method,
                            target,
                            attempts: attempt,
                            status,
                            body,
                        });
                    }
                    let delay = self.policy.delay_for(attempt);
                    tracing::warn!(
                        method = %method,
                        target = %target,
                        attempt,
                        max_attempts,
                        delay_ms = delay.as_millis() as u64,
                        status = %status,
                        "Retrying request after retryable status"
                    );
                    metrics::record_retry("status");
                    tokio::time::sleep(delay).await;
                }
                Ok((status, body)) => {
                    tracing::debug!(method = %method, target = %target, status = %status, "Request rejected");
                    metrics::record_request("rejected");
                    return Err(TransportError::Rejected {
                        method,
                        target,
                        status,
                        body,
                    });
                }
                Err(source) => {
                    if attempt >= max_attempts {
                        metrics::record_request("exhausted");
                        return Err(TransportError::Network {
                            method,
                            target,
                            attempts: attempt,
                            source,
                        });
                    }
                    let delay = self.policy.delay_for(attempt);
                    tracing::warn!(
                        method = %method,
                        target = %target,
                        attempt,
                        max_attempts,
                        delay_ms = delay.as_millis() as u64,
                        error = %source,
                        "Retrying request after network error"
                    );
                    metrics::record_retry("network");
                    tokio::time::sleep(delay).await;
                }
            }
        }
    }

    /// Issue a single attempt and read the full body.
    async fn send_once(
        &self,
        request: &TransportRequest,
        url: &Url,
    ) -> Result<(StatusCode, String), reqwest::Error> {
        let request_id = Uuid::new_v4().to_string();
        let mut builder = self
            .client
            .request(request.method.clone(), url.clone())
            .header("x-request-id", request_id.as_str());
        if let Some(body) = &request.body {
            builder = builder.json(body);
        }

        tracing::trace!(request_id = %request_id, method = %request.method, url = %url, "Sending request");

        let response = builder.send().await?;
        let status = response.status();
        let body = response.text().await?;
        Ok((status, body))
    }
}

impl std::fmt::Debug for ResilientTransport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResilientTransport")
            .field("base_url", &self.base_url.as_str())
            .field("policy", &self.policy)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn transport(base_url: &str) -> ResilientTransport {
        let service = ServiceConfig {
            base_url: base_url.to_string(),
            ..ServiceConfig::default()
        };
        ResilientTransport::new(&service, RetryPolicy::default()).unwrap()
    }

    fn segments(parts: &[&str]) -> Vec<String> {
        parts.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_url_for_appends_segments() {
        let t = transport("http://127.0.0.1:8000");
        let url = t.url_for(&segments(&["api", "waves", "w1", "status"])).unwrap();
        assert_eq!(url.as_str(), "http://127.0.0.1:8000/api/waves/w1/status");
    }

    #[test]
    fn test_url_for_keeps_base_path_prefix() {
        let t = transport("http://gateway.local/surfit/");
        let url = t.url_for(&segments(&["api", "waves", "run"])).unwrap();
        assert_eq!(url.as_str(), "http://gateway.local/surfit/api/waves/run");
    }

    #[test]
    fn test_url_for_encodes_identifiers() {
        let t = transport("http://127.0.0.1:8000");
        let url = t.url_for(&segments(&["api", "approvals", "apr/../x y"])).unwrap();
        assert_eq!(url.as_str(), "http://127.0.0.1:8000/api/approvals/apr%2F..%2Fx%20y");
    }

    #[test]
    fn test_rejects_non_base_url() {
        let service = ServiceConfig {
            base_url: "mailto:ops@example.com".to_string(),
            ..ServiceConfig::default()
        };
        let err = ResilientTransport::new(&service, RetryPolicy::default()).unwrap_err();
        assert!(matches!(err, TransportError::InvalidTarget(_)));
    }
}
