use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue};
use serde_json::Value as JsonValue;

use super::{Error, Result};

/// The raw result of a single POST: the HTTP status code and the undecoded body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawResponse {
    pub status: u16,
    pub body: String,
}

impl RawResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Something that can deliver a JSON payload to a URL and hand back whatever came back.
///
/// [`PorkbunClient`][super::PorkbunClient] does everything else (authentication, status checking, decoding), so
/// implementations only need to worry about moving bytes.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn post(&self, url: &str, payload: &JsonValue) -> Result<RawResponse>;
}

/// The real [`Transport`], backed by [`reqwest`]. Uses reqwest's default timeouts.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    reqwest: reqwest::Client,
}

impl HttpTransport {
    pub fn new() -> Result<Self> {
        let ua_str = format!("{} {}", clap::crate_name!(), clap::crate_version!());
        let user_agent = HeaderValue::from_str(&ua_str).map_err(|err| Error::Network(err.to_string()))?;
        let client = reqwest::ClientBuilder::new()
            .default_headers(HeaderMap::from_iter([
                (reqwest::header::ACCEPT, HeaderValue::from_static("application/json; charset=utf-8")),
                (reqwest::header::USER_AGENT, user_agent),
            ]))
            .build()
            .map_err(|err| Error::Network(format!("failed to build HTTP client: {err}")))?;

        Ok(Self { reqwest: client })
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn post(&self, url: &str, payload: &JsonValue) -> Result<RawResponse> {
        log::trace!("POST {url}");

        // Read the body as text no matter the status code: Porkbun reports application errors with 4xx codes *and* a
        // JSON body, and the client wants to see that message.
        let res = self
            .reqwest
            .post(url)
            .json(payload)
            .send()
            .await
            .map_err(|err| Error::Network(format!("failed to send POST request: {err}")))?;
        let status = res.status().as_u16();
        let body = res
            .text()
            .await
            .map_err(|err| Error::Network(format!("failed to read POST response: {err}")))?;

        log::trace!("POST {url} -> {status}");
        Ok(RawResponse { status, body })
    }
}
