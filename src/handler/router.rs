//! Request routing dispatch module
//!
//! Entry point for HTTP request processing: health probes, optional CORS
//! preflight, and the rate endpoint for everything else.

use chrono::Utc;
use http_body_util::Full;
use hyper::body::{Body, Bytes};
use hyper::{Method, Request, Response};
use std::convert::Infallible;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Instant;

use super::rates::serve_rates;
use crate::config::{AppState, HttpConfig};
use crate::http;
use crate::logger::{self, AccessLogEntry};

/// Main entry point for HTTP request handling
///
/// The request body is never read, so any body type is accepted.
pub async fn handle_request<B>(
    req: Request<B>,
    state: Arc<AppState>,
    peer_addr: SocketAddr,
) -> Result<Response<Full<Bytes>>, Infallible> {
    let started = Instant::now();

    let response = route_request(&req, &state).await;

    if state.access_log_enabled() {
        let entry = access_entry(&req, &response, peer_addr, started);
        logger::log_access(&entry, &state.config.logging.access_log_format);
    }

    Ok(response)
}

async fn route_request<B>(req: &Request<B>, state: &AppState) -> Response<Full<Bytes>> {
    let path = req.uri().path();
    let http_config = &state.config.http;

    if let Some(resp) = check_health(path, http_config) {
        return resp;
    }

    if req.method() == Method::OPTIONS && http_config.answer_preflight {
        return http::build_preflight_response();
    }

    serve_rates(req.uri().query(), state, Utc::now()).await
}

/// Health probes never reach the upstream
fn check_health(path: &str, http_config: &HttpConfig) -> Option<Response<Full<Bytes>>> {
    let health = &http_config.health;
    if !health.enabled {
        return None;
    }
    if path == health.liveness_path || path == health.readiness_path {
        return Some(http::build_health_response("ok"));
    }
    None
}

fn access_entry<B>(
    req: &Request<B>,
    response: &Response<Full<Bytes>>,
    peer_addr: SocketAddr,
    started: Instant,
) -> AccessLogEntry {
    let header = |name: &str| {
        req.headers()
            .get(name)
            .and_then(|v| v.to_str().ok())
            .map(ToString::to_string)
    };

    let mut entry = AccessLogEntry::new(
        peer_addr.ip().to_string(),
        req.method().to_string(),
        req.uri().path().to_string(),
    );
    entry.query = req.uri().query().map(ToString::to_string);
    entry.http_version = match req.version() {
        hyper::Version::HTTP_10 => "1.0",
        hyper::Version::HTTP_2 => "2",
        _ => "1.1",
    }
    .to_string();
    entry.status = response.status().as_u16();
    entry.body_bytes = response
        .body()
        .size_hint()
        .exact()
        .and_then(|n| usize::try_from(n).ok())
        .unwrap_or(0);
    entry.referer = header("referer");
    entry.user_agent = header("user-agent");
    entry.elapsed = started.elapsed();
    entry
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::tests::config_from_toml;
    use crate::rates::tests::StubSource;
    use http_body_util::BodyExt;
    use hyper::StatusCode;

    fn peer() -> SocketAddr {
        "127.0.0.1:50000".parse().unwrap()
    }

    fn state(source: Arc<StubSource>, toml: &str) -> Arc<AppState> {
        Arc::new(AppState::with_source(&config_from_toml(toml).unwrap(), source))
    }

    fn request(method: Method, uri: &str) -> Request<()> {
        Request::builder().method(method).uri(uri).body(()).unwrap()
    }

    #[tokio::test]
    async fn test_health_does_not_touch_upstream() {
        let source = Arc::new(StubSource::ok(200, "{}"));
        let state = state(source.clone(), "[logging]\naccess_log = false\n");

        for path in ["/healthz", "/readyz"] {
            let resp = handle_request(request(Method::GET, path), Arc::clone(&state), peer())
                .await
                .unwrap();
            assert_eq!(resp.status(), StatusCode::OK);
            let body = resp.into_body().collect().await.unwrap().to_bytes();
            assert_eq!(&body[..], b"ok");
        }
        assert!(source.urls().is_empty());
    }

    #[tokio::test]
    async fn test_disabled_health_falls_through() {
        let source = Arc::new(StubSource::ok(200, "{}"));
        let state = state(source.clone(), "[http.health]\nenabled = false\n");

        let resp = handle_request(request(Method::GET, "/healthz"), state, peer())
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(source.urls().len(), 1);
    }

    #[tokio::test]
    async fn test_any_method_and_path_fetch_rates() {
        let source = Arc::new(StubSource::ok(200, r#"{"rates":{}}"#));
        let state = state(source.clone(), "");

        for method in [Method::GET, Method::POST, Method::HEAD, Method::OPTIONS] {
            let resp = handle_request(
                request(method, "/whatever?base=GBP"),
                Arc::clone(&state),
                peer(),
            )
            .await
            .unwrap();
            assert_eq!(resp.status(), StatusCode::OK);
        }
        assert_eq!(source.urls().len(), 4);
        assert!(source.urls().iter().all(|u| u.contains("?base=GBP")));
    }

    #[tokio::test]
    async fn test_preflight_when_enabled() {
        let source = Arc::new(StubSource::ok(200, "{}"));
        let state = state(source.clone(), "[http]\nanswer_preflight = true\n");

        let resp = handle_request(request(Method::OPTIONS, "/"), state, peer())
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::NO_CONTENT);
        assert!(source.urls().is_empty());
    }

    #[test]
    fn test_access_entry_fields() {
        let req = Request::builder()
            .uri("/?base=EUR")
            .header("user-agent", "curl/8.0")
            .body(())
            .unwrap();
        let resp = http::build_health_response("ok");

        let entry = access_entry(&req, &resp, peer(), Instant::now());
        assert_eq!(entry.remote_addr, "127.0.0.1");
        assert_eq!(entry.method, "GET");
        assert_eq!(entry.query.as_deref(), Some("base=EUR"));
        assert_eq!(entry.status, 200);
        assert_eq!(entry.body_bytes, 2);
        assert_eq!(entry.user_agent.as_deref(), Some("curl/8.0"));
        assert!(entry.referer.is_none());
    }
}
