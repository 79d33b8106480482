use hyper::ext::ReasonPhrase;
use hyper::StatusCode;
use thiserror::Error;

/// Failure while fetching a rate window
#[derive(Debug, Error)]
pub enum RateError {
    /// Upstream answered with a non-success status; relayed as-is
    #[error("upstream returned {status}: {body}")]
    Upstream {
        status: StatusCode,
        reason: Option<ReasonPhrase>,
        body: String,
    },

    /// Anything else: URL construction, transport, body or JSON decoding
    #[error("{0}")]
    Internal(String),
}

impl RateError {
    /// Status code the caller should see
    pub const fn status(&self) -> StatusCode {
        match self {
            Self::Upstream { status, .. } => *status,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<reqwest::Error> for RateError {
    fn from(e: reqwest::Error) -> Self {
        Self::Internal(e.to_string())
    }
}

impl From<serde_json::Error> for RateError {
    fn from(e: serde_json::Error) -> Self {
        Self::Internal(format!("Invalid JSON from upstream: {e}"))
    }
}
