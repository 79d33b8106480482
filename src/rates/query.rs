//! Rate query parameters and outbound URL construction

use reqwest::Url;
use url::form_urlencoded;

use super::error::RateError;
use super::window::DateWindow;

/// Default base currency when the caller does not pass one
pub const DEFAULT_BASE: &str = "USD";

/// Parameters read from the inbound query string
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RateQuery {
    /// Currency the rates are expressed against
    pub base: String,
    /// Comma-separated target currencies, unfiltered when `None`
    pub symbols: Option<String>,
}

impl RateQuery {
    /// Read `base` and `symbols` from a raw query string (without leading `?`)
    ///
    /// Values are percent-decoded, nothing else. The first occurrence of a key
    /// wins; empty values count as missing.
    pub fn from_query_string(query: Option<&str>, default_base: &str) -> Self {
        let mut base = None;
        let mut symbols = None;

        for (key, value) in query_pairs(query.unwrap_or_default()) {
            match key.as_str() {
                "base" if base.is_none() => base = Some(value),
                "symbols" if symbols.is_none() => symbols = Some(value),
                _ => {}
            }
        }

        Self {
            base: base
                .filter(|b| !b.is_empty())
                .unwrap_or_else(|| default_base.to_string()),
            symbols: symbols.filter(|s| !s.is_empty()),
        }
    }

    /// Build the upstream URL for this query over `window`
    ///
    /// Currency codes are appended as given; the upstream rejects bad ones.
    pub fn upstream_url(&self, base_url: &str, window: &DateWindow) -> Result<Url, RateError> {
        let mut raw = format!(
            "{}/{}?base={}",
            base_url.trim_end_matches('/'),
            window.to_path_segment(),
            self.base
        );
        if let Some(ref symbols) = self.symbols {
            raw.push_str("&symbols=");
            raw.push_str(symbols);
        }

        Url::parse(&raw).map_err(|e| RateError::Internal(format!("Invalid upstream URL '{raw}': {e}")))
    }
}

impl Default for RateQuery {
    fn default() -> Self {
        Self {
            base: DEFAULT_BASE.to_string(),
            symbols: None,
        }
    }
}

/// Decode `application/x-www-form-urlencoded` pairs
fn query_pairs(query: &str) -> Vec<(String, String)> {
    form_urlencoded::parse(query.as_bytes())
        .map(|(k, v)| (k.into_owned(), v.into_owned()))
        .collect()
}
