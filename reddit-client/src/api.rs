use async_trait::async_trait;
use extractor_core::ExtractionError;
use reqwest::Client;
use std::time::Duration;
use tracing::{debug, error};

/// Identifies the extractor to Reddit on every request.
pub const USER_AGENT: &str = "RedditThreadExtractor/1.0 (+https://example.local)";

/// Suffix that turns a thread page URL into its JSON API form.
pub const JSON_MARKER: &str = ".json";

/// Maps a thread page URL to the JSON endpoint Reddit serves it from.
///
/// URLs that already mention `.json` are used as given; otherwise trailing
/// slashes are dropped and `.json` appended.
pub fn thread_json_url(url: &str) -> Result<String, ExtractionError> {
    let clean = url.trim();
    if clean.is_empty() {
        return Err(ExtractionError::EmptyUrl);
    }
    if clean.contains(JSON_MARKER) {
        return Ok(clean.to_string());
    }
    Ok(format!("{}{}", clean.trim_end_matches('/'), JSON_MARKER))
}

/// Status and body of a completed HTTP exchange, successful or not.
#[derive(Debug, Clone, PartialEq)]
pub struct HttpResponse {
    pub status: u16,
    pub body: String,
}

impl HttpResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// One GET request. Implementations report connection failures and timeouts
/// as `ExtractionError::Network` and leave status interpretation to the caller.
#[async_trait]
pub trait HttpTransport: Send + Sync {
    async fn get(&self, url: &str) -> Result<HttpResponse, ExtractionError>;
}

#[derive(Debug)]
pub struct ReqwestTransport {
    http_client: Client,
    user_agent: String,
}

impl ReqwestTransport {
    pub fn new(user_agent: &str, timeout: Duration) -> Result<Self, ExtractionError> {
        let http_client = Client::builder()
            .user_agent(user_agent)
            .timeout(timeout)
            .build()
            .map_err(|e| {
                error!("Failed to create HTTP client: {}", e);
                ExtractionError::network(format!("failed to create HTTP client: {e}"), false)
            })?;

        Ok(Self {
            http_client,
            user_agent: user_agent.to_string(),
        })
    }

    pub fn user_agent(&self) -> &str {
        &self.user_agent
    }
}

#[async_trait]
impl HttpTransport for ReqwestTransport {
    async fn get(&self, url: &str) -> Result<HttpResponse, ExtractionError> {
        debug!("GET {}", url);
        let response = self
            .http_client
            .get(url)
            .send()
            .await
            .map_err(|e| {
                debug!("Network error for {}: {}", url, e);
                ExtractionError::network(e.to_string(), e.is_timeout())
            })?;

        let status = response.status().as_u16();
        let body = response
            .text()
            .await
            .map_err(|e| ExtractionError::network(e.to_string(), e.is_timeout()))?;

        debug!("Response {} ({} bytes) for {}", status, body.len(), url);
        Ok(HttpResponse { status, body })
    }
}
