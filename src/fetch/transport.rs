//! HTTP transport.

use reqwest::header::ACCEPT;

use crate::error::{FetchError, TransientError};
use crate::fetch::client::FetchConfig;

/// Status and body of a completed request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub body: String,
}

/// A blocking GET. Connection-level failures are transient by definition.
pub trait Transport {
    fn get(&self, url: &str, query: &[(&str, String)]) -> Result<HttpResponse, TransientError>;
}

/// Transport backed by the blocking reqwest client.
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    http: reqwest::blocking::Client,
}

impl ReqwestTransport {
    /// Connect and overall request timeouts are independent: a dead host
    /// fails fast, a slow response is tolerated.
    pub fn new(config: &FetchConfig) -> Result<Self, FetchError> {
        let http = reqwest::blocking::Client::builder()
            .user_agent(config.user_agent.as_str())
            .connect_timeout(config.connect_timeout)
            .timeout(config.request_timeout)
            .gzip(true)
            .build()
            .map_err(|e| FetchError::Client(e.to_string()))?;
        Ok(Self { http })
    }
}

impl Transport for ReqwestTransport {
    fn get(&self, url: &str, query: &[(&str, String)]) -> Result<HttpResponse, TransientError> {
        let response = self
            .http
            .get(url)
            .query(query)
            .header(ACCEPT, "application/json")
            .send()
            .map_err(classify)?;
        let status = response.status().as_u16();
        let body = response.text().map_err(classify)?;
        Ok(HttpResponse { status, body })
    }
}

fn classify(err: reqwest::Error) -> TransientError {
    if err.is_timeout() {
        TransientError::Timeout(err.to_string())
    } else {
        TransientError::Transport(err.to_string())
    }
}
