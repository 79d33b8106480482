//! Rate window fetching
//!
//! Turns a [`RateQuery`] and the current instant into one upstream call over
//! a [`DateWindow`], and interprets the reply.

mod error;
mod query;
mod upstream;
mod window;

use chrono::{DateTime, Utc};
use serde_json::Value;

use crate::config::UpstreamConfig;
use crate::logger;

pub use error::RateError;
pub use query::{RateQuery, DEFAULT_BASE};
pub use upstream::{HttpRateSource, RateSource, UpstreamReply};
pub use window::{DateWindow, DEFAULT_CUTOFF_HOUR, DEFAULT_WINDOW_DAYS};

/// Fetch rates for the window that is current at `now`
///
/// Success yields the upstream JSON document untouched. A non-success status
/// becomes `RateError::Upstream` carrying the upstream body.
pub async fn fetch_window(
    source: &dyn RateSource,
    upstream: &UpstreamConfig,
    query: &RateQuery,
    now: DateTime<Utc>,
) -> Result<Value, RateError> {
    let window = DateWindow::ending_at(now, upstream.cutoff_hour, upstream.window_days);
    logger::log_rate_window(&window);

    let url = query.upstream_url(&upstream.base_url, &window)?;
    logger::log_upstream_url(url.as_str());

    let reply = source.fetch(url).await?;
    if !reply.is_success() {
        return Err(RateError::Upstream {
            status: reply.status,
            reason: reply.reason.clone(),
            body: reply.text(),
        });
    }

    Ok(serde_json::from_slice(&reply.body)?)
}
