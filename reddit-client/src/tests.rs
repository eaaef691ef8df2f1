#[cfg(test)]
mod tests {
    use crate::{HttpResponse, HttpTransport, RetryConfig, Sleeper, ThreadFetcher};
    use async_trait::async_trait;
    use extractor_core::ExtractionError;
    use std::collections::VecDeque;
    use std::sync::{Arc, Mutex};
    use std::time::Duration;

    const THREAD_URL: &str = "https://www.reddit.com/r/smallbusiness/comments/abc123/a_title/";
    const THREAD_JSON_URL: &str = "https://www.reddit.com/r/smallbusiness/comments/abc123/a_title.json";
    const PAYLOAD: &str = r#"[{"data":{"children":[{"data":{"id":"abc123"}}]}},{"data":{"children":[]}}]"#;

    type Scripted = Result<HttpResponse, ExtractionError>;

    /// Replays canned responses in order and records every requested URL.
    #[derive(Clone, Default)]
    struct ScriptedTransport {
        responses: Arc<Mutex<VecDeque<Scripted>>>,
        requests: Arc<Mutex<Vec<String>>>,
    }

    impl ScriptedTransport {
        fn new(script: Vec<Scripted>) -> Self {
            Self {
                responses: Arc::new(Mutex::new(script.into())),
                requests: Arc::default(),
            }
        }

        fn requests(&self) -> Vec<String> {
            self.requests.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl HttpTransport for ScriptedTransport {
        async fn get(&self, url: &str) -> Result<HttpResponse, ExtractionError> {
            self.requests.lock().unwrap().push(url.to_string());
            self.responses
                .lock()
                .unwrap()
                .pop_front()
                .expect("transport called more often than scripted")
        }
    }

    /// Fake clock: records requested delays instead of waiting.
    #[derive(Clone, Default)]
    struct RecordingSleeper {
        delays: Arc<Mutex<Vec<Duration>>>,
    }

    impl RecordingSleeper {
        fn delays(&self) -> Vec<u64> {
            self.delays.lock().unwrap().iter().map(Duration::as_secs).collect()
        }
    }

    #[async_trait]
    impl Sleeper for RecordingSleeper {
        async fn sleep(&self, delay: Duration) {
            self.delays.lock().unwrap().push(delay);
        }
    }

    fn status(code: u16) -> Scripted {
        Ok(HttpResponse {
            status: code,
            body: String::new(),
        })
    }

    fn ok(body: &str) -> Scripted {
        Ok(HttpResponse {
            status: 200,
            body: body.to_string(),
        })
    }

    fn scripted_fetcher(
        script: Vec<Scripted>,
    ) -> (
        ThreadFetcher<ScriptedTransport, RecordingSleeper>,
        ScriptedTransport,
        RecordingSleeper,
    ) {
        let transport = ScriptedTransport::new(script);
        let sleeper = RecordingSleeper::default();
        let fetcher =
            ThreadFetcher::with_parts(transport.clone(), sleeper.clone(), RetryConfig::default());
        (fetcher, transport, sleeper)
    }

    #[tokio::test]
    async fn test_fetch_succeeds_first_time() {
        let (mut fetcher, transport, sleeper) = scripted_fetcher(vec![ok(PAYLOAD)]);

        let payload = fetcher.fetch_thread_json(THREAD_URL).await.unwrap();

        assert_eq!(payload[0]["data"]["children"][0]["data"]["id"], "abc123");
        assert_eq!(transport.requests(), vec![THREAD_JSON_URL.to_string()]);
        assert!(sleeper.delays().is_empty());
    }

    #[tokio::test]
    async fn test_fetch_retries_503_with_doubling_backoff() {
        let (mut fetcher, transport, sleeper) =
            scripted_fetcher(vec![status(503), status(503), status(503), ok(PAYLOAD)]);

        let payload = fetcher.fetch_thread_json(THREAD_URL).await;

        assert!(payload.is_ok());
        assert_eq!(transport.requests().len(), 4);
        assert_eq!(sleeper.delays(), vec![1, 2, 4]);

        let metrics = fetcher.retry_metrics();
        assert_eq!(metrics.total_retries, 3);
        assert_eq!(metrics.successful_retries, 1);
        assert_eq!(metrics.total_delay, Duration::from_secs(7));
    }

    #[tokio::test]
    async fn test_fetch_404_fails_without_retry() {
        let (mut fetcher, transport, sleeper) = scripted_fetcher(vec![status(404)]);

        let error = fetcher.fetch_thread_json(THREAD_URL).await.unwrap_err();

        assert_eq!(error.status(), Some(404));
        assert_eq!(
            error.to_string(),
            format!("Request failed with status 404: {}", THREAD_JSON_URL)
        );
        assert_eq!(transport.requests().len(), 1);
        assert!(sleeper.delays().is_empty());
    }

    #[tokio::test]
    async fn test_fetch_gives_up_after_max_retries() {
        let (mut fetcher, transport, sleeper) = scripted_fetcher(vec![
            status(429),
            status(500),
            status(502),
            status(503),
            status(504),
        ]);

        let error = fetcher.fetch_thread_json(THREAD_URL).await.unwrap_err();

        match error {
            ExtractionError::RetriesExhausted {
                attempts,
                url,
                last_error,
            } => {
                assert_eq!(attempts, 5);
                assert_eq!(url, THREAD_JSON_URL);
                assert!(last_error.contains("504"));
            }
            other => panic!("expected RetriesExhausted, got {:?}", other),
        }
        assert_eq!(transport.requests().len(), 5);
        assert_eq!(sleeper.delays(), vec![1, 2, 4, 8]);
        assert_eq!(fetcher.retry_metrics().failed_operations, 1);
    }

    #[tokio::test]
    async fn test_fetch_long_backoff_is_not_capped() {
        let transport = ScriptedTransport::new((0..8).map(|_| status(503)).collect());
        let sleeper = RecordingSleeper::default();
        let retry = RetryConfig {
            max_retries: 7,
            ..Default::default()
        };
        let mut fetcher = ThreadFetcher::with_parts(transport.clone(), sleeper.clone(), retry);

        let error = fetcher.fetch_thread_json(THREAD_URL).await.unwrap_err();

        assert!(matches!(error, ExtractionError::RetriesExhausted { attempts: 8, .. }));
        assert_eq!(transport.requests().len(), 8);
        assert_eq!(sleeper.delays(), vec![1, 2, 4, 8, 16, 32, 64]);
        assert_eq!(fetcher.retry_metrics().total_delay, Duration::from_secs(127));
    }

    #[tokio::test]
    async fn test_fetch_retries_network_errors() {
        let (mut fetcher, transport, sleeper) = scripted_fetcher(vec![
            Err(ExtractionError::network("operation timed out", true)),
            Err(ExtractionError::network("connection reset", false)),
            ok(PAYLOAD),
        ]);

        assert!(fetcher.fetch_thread_json(THREAD_URL).await.is_ok());
        assert_eq!(transport.requests().len(), 3);
        assert_eq!(sleeper.delays(), vec![1, 2]);
    }

    #[tokio::test]
    async fn test_fetch_does_not_retry_bad_payloads() {
        let (mut fetcher, transport, _) = scripted_fetcher(vec![ok("not json at all")]);
        let error = fetcher.fetch_thread_json(THREAD_URL).await.unwrap_err();
        assert!(matches!(error, ExtractionError::InvalidJson(_)));
        assert_eq!(transport.requests().len(), 1);

        let (mut fetcher, transport, _) =
            scripted_fetcher(vec![ok(r#"{"kind":"Listing","data":{}}"#)]);
        let error = fetcher.fetch_thread_json(THREAD_URL).await.unwrap_err();
        assert!(matches!(error, ExtractionError::MalformedShape { .. }));
        assert_eq!(transport.requests().len(), 1);
    }

    #[tokio::test]
    async fn test_fetch_empty_url_makes_no_request() {
        let (mut fetcher, transport, _) = scripted_fetcher(Vec::new());

        let error = fetcher.fetch_thread_json("   ").await.unwrap_err();

        assert!(matches!(error, ExtractionError::EmptyUrl));
        assert!(transport.requests().is_empty());
    }

    #[tokio::test]
    async fn test_fetch_keeps_explicit_json_url() {
        let url = "https://www.reddit.com/r/rust/comments/xyz/t.json?limit=100";
        let (mut fetcher, transport, _) = scripted_fetcher(vec![ok(PAYLOAD)]);

        fetcher.fetch_thread_json(url).await.unwrap();

        assert_eq!(transport.requests(), vec![url.to_string()]);
    }

    /// A post listing plus one reply chain `levels` comments deep.
    fn reply_chain_payload(levels: usize) -> String {
        let mut replies = String::from("\"\"");
        for depth in (0..levels).rev() {
            let comment = format!(
                r#"{{"kind":"t1","data":{{"id":"c{depth}","depth":{depth},"author":"user","score":5,"body":"a reply that is long enough","replies":{replies}}}}}"#
            );
            replies = format!(r#"{{"kind":"Listing","data":{{"children":[{comment}]}}}}"#);
        }
        format!(
            r#"[{{"kind":"Listing","data":{{"children":[{{"kind":"t3","data":{{"id":"abc123"}}}}]}}}},{replies}]"#
        )
    }

    #[tokio::test]
    async fn test_fetch_accepts_deep_reply_chain() {
        let levels = 60;
        let (mut fetcher, transport, _) = scripted_fetcher(vec![ok(&reply_chain_payload(levels))]);

        let payload = fetcher.fetch_thread_json(THREAD_URL).await.unwrap();

        assert_eq!(transport.requests().len(), 1);
        let mut node = &payload[1]["data"]["children"][0];
        let mut seen = 0;
        while node.is_object() {
            assert_eq!(node["data"]["id"], format!("c{seen}"));
            seen += 1;
            node = &node["data"]["replies"]["data"]["children"][0];
        }
        assert_eq!(seen, levels);
    }

    #[test]
    fn test_blocking_fetch_with_tokio_test() {
        let (mut fetcher, _, sleeper) = scripted_fetcher(vec![status(500), ok(PAYLOAD)]);
        let result = tokio_test::block_on(fetcher.fetch_thread_json(THREAD_URL));
        assert!(result.is_ok());
        assert_eq!(sleeper.delays(), vec![1]);
    }
}
