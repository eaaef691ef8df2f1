pub mod api;
pub mod fetcher;
pub mod retry;

#[cfg(test)]
mod tests;

pub use api::{thread_json_url, HttpResponse, HttpTransport, ReqwestTransport, USER_AGENT};
pub use fetcher::{parse_payload, FetchConfig, ThreadFetcher};
pub use retry::{Backoff, RetryConfig, RetryExecutor, RetryMetrics, Sleeper, TokioSleeper};
