//! Upstream rate source
//!
//! The handler talks to the rate history API through [`RateSource`] so the
//! transport can be swapped in tests.

use async_trait::async_trait;
use hyper::body::Bytes;
use hyper::ext::ReasonPhrase;
use hyper::StatusCode;
use reqwest::{Client, Url};

use super::error::RateError;

/// Raw reply from the upstream, before any interpretation
#[derive(Debug, Clone)]
pub struct UpstreamReply {
    pub status: StatusCode,
    /// Status line text, only when it differs from the canonical one
    pub reason: Option<ReasonPhrase>,
    pub body: Bytes,
}

impl UpstreamReply {
    pub fn is_success(&self) -> bool {
        self.status.is_success()
    }

    /// Body as text, replacing invalid UTF-8
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }
}

#[async_trait]
pub trait RateSource: Send + Sync {
    /// Issue one GET for `url`; transport failures are `RateError::Internal`
    async fn fetch(&self, url: Url) -> Result<UpstreamReply, RateError>;
}

/// `RateSource` backed by a shared reqwest client
#[derive(Debug, Clone, Default)]
pub struct HttpRateSource {
    client: Client,
}

impl HttpRateSource {
    pub fn new(user_agent: &str) -> Result<Self, RateError> {
        let client = Client::builder().user_agent(user_agent).build()?;
        Ok(Self { client })
    }
}

#[async_trait]
impl RateSource for HttpRateSource {
    async fn fetch(&self, url: Url) -> Result<UpstreamReply, RateError> {
        let resp = self.client.get(url).send().await?;
        let status = resp.status();
        let reason = resp.extensions().get::<ReasonPhrase>().cloned();
        let body = resp.bytes().await?;
        Ok(UpstreamReply {
            status,
            reason,
            body,
        })
    }
}
