//! HTTP response building module
//!
//! Builders for every response the server sends. Builder failures are logged
//! and degrade to a bare response instead of panicking.

use http_body_util::Full;
use hyper::body::Bytes;
use hyper::ext::ReasonPhrase;
use hyper::{Response, StatusCode};
use serde_json::Value;

use crate::rates::RateError;

const ALLOW_ORIGIN: &str = "*";
const ALLOW_METHODS: &str = "GET, HEAD, OPTIONS";
const ALLOW_HEADERS: &str = "Content-Type";
const FALLBACK_ERROR_MESSAGE: &str = "Internal Server Error";

/// Add the cross-origin headers every rate response carries
fn with_cors(builder: hyper::http::response::Builder) -> hyper::http::response::Builder {
    builder
        .header("Access-Control-Allow-Origin", ALLOW_ORIGIN)
        .header("Access-Control-Allow-Methods", ALLOW_METHODS)
        .header("Access-Control-Allow-Headers", ALLOW_HEADERS)
}

/// Build 200 response with the rate document, pretty-printed
pub fn build_rates_response(doc: &Value) -> Response<Full<Bytes>> {
    let body = match serde_json::to_string_pretty(doc) {
        Ok(b) => b,
        Err(e) => return build_internal_error_response(&format!("Failed to serialize rates: {e}")),
    };

    with_cors(Response::builder())
        .status(StatusCode::OK)
        .header("Content-Type", "application/json")
        .body(Full::new(Bytes::from(body)))
        .unwrap_or_else(|e| {
            log_build_error("200", &e);
            Response::new(Full::new(Bytes::new()))
        })
}

/// Relay a non-success upstream reply: same status line, same body
///
/// A non-canonical `reason` rides in the response extensions, where hyper
/// picks it up when writing the status line.
pub fn build_upstream_error_response(
    status: StatusCode,
    reason: Option<&ReasonPhrase>,
    body: &str,
) -> Response<Full<Bytes>> {
    let mut builder = with_cors(Response::builder())
        .status(status)
        .header("Content-Type", "text/plain; charset=utf-8");
    if let Some(reason) = reason {
        builder = builder.extension(reason.clone());
    }

    builder
        .body(Full::new(Bytes::from(body.to_string())))
        .unwrap_or_else(|e| {
            log_build_error(status.as_str(), &e);
            Response::new(Full::new(Bytes::new()))
        })
}

/// Build 500 response carrying `message`, or a generic one if it is empty
pub fn build_internal_error_response(message: &str) -> Response<Full<Bytes>> {
    let text = if message.trim().is_empty() {
        FALLBACK_ERROR_MESSAGE
    } else {
        message
    };

    with_cors(Response::builder())
        .status(StatusCode::INTERNAL_SERVER_ERROR)
        .header("Content-Type", "text/plain; charset=utf-8")
        .body(Full::new(Bytes::from(text.to_string())))
        .unwrap_or_else(|e| {
            log_build_error("500", &e);
            let mut resp = Response::new(Full::new(Bytes::from(FALLBACK_ERROR_MESSAGE)));
            *resp.status_mut() = StatusCode::INTERNAL_SERVER_ERROR;
            resp
        })
}

/// Map a rate fetch failure to its response
pub fn build_error_response(err: &RateError) -> Response<Full<Bytes>> {
    match err {
        RateError::Upstream {
            status,
            reason,
            body,
        } => build_upstream_error_response(*status, reason.as_ref(), body),
        RateError::Internal(message) => build_internal_error_response(message),
    }
}

/// Build plain-text health probe response
pub fn build_health_response(body: &'static str) -> Response<Full<Bytes>> {
    Response::builder()
        .status(StatusCode::OK)
        .header("Content-Type", "text/plain")
        .header("Cache-Control", "no-store")
        .body(Full::new(Bytes::from(body)))
        .unwrap_or_else(|e| {
            log_build_error("health", &e);
            Response::new(Full::new(Bytes::from(body)))
        })
}

/// Build OPTIONS response (preflight request)
pub fn build_preflight_response() -> Response<Full<Bytes>> {
    with_cors(Response::builder())
        .status(StatusCode::NO_CONTENT)
        .header("Allow", ALLOW_METHODS)
        .header("Access-Control-Max-Age", "86400")
        .body(Full::new(Bytes::new()))
        .unwrap_or_else(|e| {
            log_build_error("OPTIONS", &e);
            Response::new(Full::new(Bytes::new()))
        })
}

/// Log response build error
fn log_build_error(status: &str, error: &hyper::http::Error) {
    crate::logger::log_error(&format!("Failed to build {status} response: {error}"));
}
