//! Rate window endpoint
//!
//! Reads `base`/`symbols`, fetches the current window and relays the result.

use chrono::{DateTime, Utc};
use http_body_util::Full;
use hyper::body::Bytes;
use hyper::Response;

use crate::config::AppState;
use crate::http;
use crate::logger;
use crate::rates::{self, RateQuery};

/// Serve one rate request as of `now`
pub async fn serve_rates(
    query: Option<&str>,
    state: &AppState,
    now: DateTime<Utc>,
) -> Response<Full<Bytes>> {
    let upstream = &state.config.upstream;
    let rate_query = RateQuery::from_query_string(query, &upstream.default_base);

    match rates::fetch_window(state.source.as_ref(), upstream, &rate_query, now).await {
        Ok(doc) => http::build_rates_response(&doc),
        Err(err) => {
            logger::log_rate_error(&err);
            http::build_error_response(&err)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::tests::config_from_toml;
    use crate::rates::tests::StubSource;
    use chrono::TimeZone;
    use http_body_util::BodyExt;
    use hyper::StatusCode;
    use std::sync::Arc;

    const SAMPLE: &str = r#"{"amount":1.0,"base":"USD","start_date":"2024-06-03","end_date":"2024-06-07","rates":{"2024-06-03":{"EUR":0.9201,"GBP":0.7843}}}"#;

    fn state_with(source: Arc<StubSource>, toml: &str) -> AppState {
        AppState::with_source(&config_from_toml(toml).unwrap(), source)
    }

    fn afternoon() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 10, 15, 30, 0).unwrap()
    }

    async fn body_string(resp: Response<Full<Bytes>>) -> String {
        let bytes = resp.into_body().collect().await.unwrap().to_bytes();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    #[tokio::test]
    async fn test_success_relays_document() {
        let source = Arc::new(StubSource::ok(200, SAMPLE));
        let state = state_with(source.clone(), "");

        let resp = serve_rates(Some("symbols=EUR,GBP"), &state, afternoon()).await;
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(
            resp.headers()["Access-Control-Allow-Origin"].to_str().unwrap(),
            "*"
        );

        let body: serde_json::Value = serde_json::from_str(&body_string(resp).await).unwrap();
        let expected: serde_json::Value = serde_json::from_str(SAMPLE).unwrap();
        assert_eq!(body, expected);

        assert_eq!(
            source.urls(),
            vec!["https://api.frankfurter.dev/v1/2024-06-04..2024-06-10?base=USD&symbols=EUR,GBP".to_string()]
        );
    }

    #[tokio::test]
    async fn test_configured_default_base() {
        let source = Arc::new(StubSource::ok(200, "{}"));
        let state = state_with(source.clone(), "[upstream]\ndefault_base = \"EUR\"\n");

        let _ = serve_rates(None, &state, afternoon()).await;
        assert!(source.urls()[0].ends_with("?base=EUR"));
    }

    #[tokio::test]
    async fn test_upstream_404_is_relayed() {
        let source = Arc::new(StubSource::ok(404, "not found"));
        let state = state_with(source, "");

        let resp = serve_rates(Some("base=NOPE"), &state, afternoon()).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
        assert_eq!(body_string(resp).await, "not found");
    }

    #[tokio::test]
    async fn test_transport_failure_is_500() {
        let source = Arc::new(StubSource::failing("error sending request"));
        let state = state_with(source, "");

        let resp = serve_rates(None, &state, afternoon()).await;
        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body_string(resp).await, "error sending request");
    }

    #[tokio::test]
    async fn test_malformed_upstream_url_is_500() {
        let source = Arc::new(StubSource::ok(200, "{}"));
        let state = state_with(source.clone(), "[upstream]\nbase_url = \"no scheme here\"\n");

        let resp = serve_rates(None, &state, afternoon()).await;
        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert!(!body_string(resp).await.is_empty());
        assert!(source.urls().is_empty());
    }
}
