//! Guide fetch client.
//!
//! Sends `GET <endpoint>?nid=..&start=..`, parses the body as JSON whatever
//! the declared content type, and retries transient failures.

use std::time::Duration;

use serde_json::Value;

use crate::error::{FetchError, TransientError};
use crate::fetch::retry::{backoff_delay, is_transient_status, Sleeper, ThreadSleeper};
use crate::fetch::transport::{ReqwestTransport, Transport};
use crate::logging::structured::LogContext;
use crate::normalize::text::truncate_chars;

pub const DEFAULT_ENDPOINT: &str = "https://www.freely.co.uk/api/tv-guide";
pub const DEFAULT_NID: &str = "64865";

/// Body characters quoted in a parse failure.
pub const MAX_SNIPPET_CHARS: usize = 240;

/// Configuration for the fetch client.
#[derive(Debug, Clone, PartialEq)]
pub struct FetchConfig {
    pub endpoint: String,
    pub user_agent: String,
    pub connect_timeout: Duration,
    pub request_timeout: Duration,
    /// Total attempts including the first.
    pub max_attempts: u32,
    pub backoff_base: f64,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            user_agent: format!("guide-normalizer/{}", env!("CARGO_PKG_VERSION")),
            connect_timeout: Duration::from_secs(10),
            request_timeout: Duration::from_secs(30),
            max_attempts: 4,
            backoff_base: 1.7,
        }
    }
}

impl FetchConfig {
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    pub fn with_connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }

    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    pub fn with_max_attempts(mut self, attempts: u32) -> Self {
        self.max_attempts = attempts;
        self
    }

    pub fn with_backoff_base(mut self, base: f64) -> Self {
        self.backoff_base = base;
        self
    }
}

/// Fetch client, generic over the HTTP seam and the clock.
pub struct FetchClient<T = ReqwestTransport, S = ThreadSleeper> {
    config: FetchConfig,
    transport: T,
    sleeper: S,
}

impl FetchClient<ReqwestTransport, ThreadSleeper> {
    pub fn new(config: FetchConfig) -> Result<Self, FetchError> {
        let transport = ReqwestTransport::new(&config)?;
        Ok(Self::with_parts(config, transport, ThreadSleeper))
    }
}

impl<T: Transport, S: Sleeper> FetchClient<T, S> {
    pub fn with_parts(config: FetchConfig, transport: T, sleeper: S) -> Self {
        Self {
            config,
            transport,
            sleeper,
        }
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn sleeper(&self) -> &S {
        &self.sleeper
    }

    /// Fetch the guide for `nid` starting at `start`.
    ///
    /// Fails with [`FetchError::Exhausted`] carrying the last attempt's error.
    pub fn fetch(&self, nid: &str, start: i64, ctx: &LogContext) -> Result<Value, FetchError> {
        let max_attempts = self.config.max_attempts.max(1);
        let query = [("nid", nid.to_string()), ("start", start.to_string())];
        let mut attempt = 1;

        loop {
            crate::log_debug!(
                ctx,
                "FETCH_ATTEMPT",
                attempt = attempt,
                max = max_attempts,
                endpoint = self.config.endpoint,
            );

            match self.attempt(&query) {
                Ok(payload) => {
                    log::info!("{} FETCH_OK attempts={}", ctx, attempt);
                    return Ok(payload);
                }
                Err(err) if attempt >= max_attempts => {
                    log::error!(
                        "{} FETCH_EXHAUSTED attempts={} last_error={}",
                        ctx,
                        attempt,
                        err
                    );
                    return Err(FetchError::Exhausted {
                        attempts: attempt,
                        last: err,
                    });
                }
                Err(err) => {
                    let delay = backoff_delay(self.config.backoff_base, attempt);
                    log::warn!(
                        "{} FETCH_TRANSIENT attempt={} error={} retry_in={:.2}s",
                        ctx,
                        attempt,
                        err,
                        delay.as_secs_f64()
                    );
                    self.sleeper.sleep(delay);
                    attempt += 1;
                }
            }
        }
    }

    fn attempt(&self, query: &[(&str, String)]) -> Result<Value, TransientError> {
        let response = self.transport.get(&self.config.endpoint, query)?;

        if is_transient_status(response.status) {
            return Err(TransientError::Status {
                status: response.status,
            });
        }

        serde_json::from_str(&response.body).map_err(|_| TransientError::Parse {
            status: response.status,
            body_len: response.body.len(),
            snippet: truncate_chars(&response.body, MAX_SNIPPET_CHARS),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fetch::transport::HttpResponse;
    use serde_json::json;
    use std::cell::RefCell;
    use std::collections::VecDeque;

    struct Scripted {
        responses: RefCell<VecDeque<Result<HttpResponse, TransientError>>>,
        queries: RefCell<Vec<Vec<(String, String)>>>,
    }

    impl Scripted {
        fn new(responses: Vec<Result<HttpResponse, TransientError>>) -> Self {
            Self {
                responses: RefCell::new(responses.into()),
                queries: RefCell::new(Vec::new()),
            }
        }
    }

    impl Transport for Scripted {
        fn get(&self, _url: &str, query: &[(&str, String)]) -> Result<HttpResponse, TransientError> {
            self.queries
                .borrow_mut()
                .push(query.iter().map(|(k, v)| (k.to_string(), v.clone())).collect());
            self.responses
                .borrow_mut()
                .pop_front()
                .unwrap_or_else(|| Err(TransientError::Transport("script exhausted".into())))
        }
    }

    #[derive(Default)]
    struct Recording(RefCell<Vec<Duration>>);

    impl Sleeper for Recording {
        fn sleep(&self, duration: Duration) {
            self.0.borrow_mut().push(duration);
        }
    }

    fn ok(status: u16, body: &str) -> Result<HttpResponse, TransientError> {
        Ok(HttpResponse {
            status,
            body: body.to_string(),
        })
    }

    fn client(script: Vec<Result<HttpResponse, TransientError>>) -> FetchClient<Scripted, Recording> {
        FetchClient::with_parts(FetchConfig::default(), Scripted::new(script), Recording::default())
    }

    #[test]
    fn test_first_attempt_success_sends_query() {
        let ctx = LogContext::new("test-run");
        let c = client(vec![ok(200, r#"{"status":"OK"}"#)]);
        let payload = c.fetch("64865", 1_700_000_000, &ctx).unwrap();
        assert_eq!(payload, json!({"status": "OK"}));
        assert!(c.sleeper().0.borrow().is_empty());
        assert_eq!(
            c.transport().queries.borrow()[0],
            vec![
                ("nid".to_string(), "64865".to_string()),
                ("start".to_string(), "1700000000".to_string())
            ]
        );
    }

    #[test]
    fn test_non_transient_status_is_parsed() {
        let ctx = LogContext::new("test-run");
        let c = client(vec![ok(404, r#"{"error":"not found"}"#)]);
        assert_eq!(c.fetch("1", 1, &ctx).unwrap(), json!({"error": "not found"}));
    }

    #[test]
    fn test_parse_failure_retried_then_reported() {
        let ctx = LogContext::new("test-run");
        let html = format!("<html>{}</html>", "x".repeat(500));
        let c = client(vec![
            ok(200, &html),
            ok(200, &html),
            ok(200, &html),
            ok(200, &html),
        ]);
        match c.fetch("1", 1, &ctx) {
            Err(FetchError::Exhausted {
                attempts,
                last: TransientError::Parse { status, body_len, snippet },
            }) => {
                assert_eq!(attempts, 4);
                assert_eq!(status, 200);
                assert_eq!(body_len, html.len());
                assert_eq!(snippet.chars().count(), MAX_SNIPPET_CHARS);
            }
            other => panic!("unexpected result: {:?}", other),
        }
        assert_eq!(c.sleeper().0.borrow().len(), 3);
    }

    #[test]
    fn test_transport_errors_are_retried() {
        let ctx = LogContext::new("test-run");
        let c = client(vec![
            Err(TransientError::Timeout("read".into())),
            Err(TransientError::Transport("refused".into())),
            ok(200, "[]"),
        ]);
        assert_eq!(c.fetch("1", 1, &ctx).unwrap(), json!([]));
        assert_eq!(c.transport().queries.borrow().len(), 3);
    }

    #[test]
    fn test_zero_attempts_still_tries_once() {
        let ctx = LogContext::new("test-run");
        let mut c = client(vec![ok(503, "")]);
        c.config.max_attempts = 0;
        match c.fetch("1", 1, &ctx) {
            Err(FetchError::Exhausted { attempts, .. }) => assert_eq!(attempts, 1),
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn test_config_builders() {
        let config = FetchConfig::default()
            .with_endpoint("http://localhost:9/guide")
            .with_max_attempts(2)
            .with_backoff_base(2.0)
            .with_connect_timeout(Duration::from_secs(1))
            .with_request_timeout(Duration::from_secs(5))
            .with_user_agent("test-agent");
        assert_eq!(config.endpoint, "http://localhost:9/guide");
        assert_eq!(config.max_attempts, 2);
        assert_eq!(config.user_agent, "test-agent");
        assert!(config.connect_timeout < config.request_timeout);
    }
}
