use crate::api::{thread_json_url, HttpTransport, ReqwestTransport, USER_AGENT};
use crate::retry::{RetryConfig, RetryExecutor, RetryMetrics, Sleeper, TokioSleeper};
use extractor_core::ExtractionError;
use serde::Deserialize;
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, info};

#[derive(Debug, Clone, PartialEq)]
pub struct FetchConfig {
    pub user_agent: String,
    /// Ceiling for a single request, body included.
    pub timeout: Duration,
    pub retry: RetryConfig,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            user_agent: USER_AGENT.to_string(),
            timeout: Duration::from_secs(20),
            retry: RetryConfig::default(),
        }
    }
}

/// Downloads thread payloads, retrying transient failures with backoff.
#[derive(Debug)]
pub struct ThreadFetcher<T = ReqwestTransport, S = TokioSleeper> {
    transport: T,
    executor: RetryExecutor<S>,
}

impl ThreadFetcher<ReqwestTransport, TokioSleeper> {
    pub fn new(config: FetchConfig) -> Result<Self, ExtractionError> {
        let transport = ReqwestTransport::new(&config.user_agent, config.timeout)?;
        Ok(Self::with_parts(transport, TokioSleeper, config.retry))
    }
}

impl<T: HttpTransport, S: Sleeper> ThreadFetcher<T, S> {
    pub fn with_parts(transport: T, sleeper: S, retry: RetryConfig) -> Self {
        Self {
            transport,
            executor: RetryExecutor::with_sleeper(retry, sleeper),
        }
    }

    /// Fetches the JSON form of `url` and checks it holds the post listing
    /// and the comment listing.
    pub async fn fetch_thread_json(&mut self, url: &str) -> Result<Value, ExtractionError> {
        let target = thread_json_url(url)?;
        let transport = &self.transport;
        let target_ref = target.as_str();

        info!("Fetching thread {}", target);
        let body = self
            .executor
            .execute(target_ref, move || fetch_once(transport, target_ref))
            .await?;

        parse_payload(&body)
    }

    pub fn retry_metrics(&self) -> &RetryMetrics {
        self.executor.metrics()
    }
}

async fn fetch_once<T: HttpTransport>(transport: &T, target: &str) -> Result<String, ExtractionError> {
    let response = transport.get(target).await?;
    if !response.is_success() {
        return Err(ExtractionError::HttpStatus {
            status: response.status,
            url: target.to_string(),
        });
    }
    Ok(response.body)
}

/// Parses a response body and validates the `[post listing, comment listing]`
/// shape. Extra trailing elements are tolerated.
///
/// Each reply level nests about five JSON levels deep, so serde_json's
/// default limit of 128 would reject ordinary long reply chains. The limit is
/// lifted and the stack grows on demand; the walker bounds traversal depth.
pub fn parse_payload(body: &str) -> Result<Value, ExtractionError> {
    let mut json = serde_json::Deserializer::from_str(body);
    json.disable_recursion_limit();
    let payload = Value::deserialize(serde_stacker::Deserializer::new(&mut json))
        .map_err(|e| ExtractionError::InvalidJson(e.to_string()))?;
    json.end()
        .map_err(|e| ExtractionError::InvalidJson(e.to_string()))?;

    match payload.as_array() {
        Some(items) if items.len() >= 2 => {
            debug!("Payload holds {} listings", items.len());
            Ok(payload)
        }
        _ => Err(ExtractionError::malformed("expected 2-item list")),
    }
}
