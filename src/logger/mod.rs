//! Logger module
//!
//! Logging utilities for the rate server:
//! - Server lifecycle logging
//! - Access logging with multiple formats
//! - Rate fetch diagnostics
//! - Error and warning logging

mod format;
pub mod writer;

pub use format::AccessLogEntry;

use crate::config::Config;
use crate::rates::{DateWindow, RateError};
use std::net::SocketAddr;

/// Initialize the logger with configuration
///
/// Should be called once at application startup.
pub fn init(config: &Config) -> std::io::Result<()> {
    writer::init(
        config.logging.access_log_file.as_deref(),
        config.logging.error_log_file.as_deref(),
        &config.logging.level,
    )
}

/// Write to info/access log
fn write_info(message: &str) {
    match writer::get() {
        Some(w) => w.write_info(message),
        None => println!("{message}"),
    }
}

/// Write to error log
fn write_error(message: &str) {
    match writer::get() {
        Some(w) => w.write_error(message),
        None => eprintln!("{message}"),
    }
}

/// Write to access log specifically
fn write_access(message: &str) {
    match writer::get() {
        Some(w) => w.write_access(message),
        None => println!("{message}"),
    }
}

/// Write only when the configured level is debug
fn write_debug(message: &str) {
    if writer::get().is_some_and(writer::LogWriter::debug_enabled) {
        write_info(message);
    }
}

pub fn log_server_start(addr: &SocketAddr, config: &Config) {
    write_info("======================================");
    write_info("Rate window server started");
    write_info(&format!("Listening on: http://{addr}"));
    write_info(&format!("Upstream: {}", config.upstream.base_url));
    write_info(&format!(
        "Window: {} days, cutoff {:02}:00 UTC, default base {}",
        config.upstream.window_days, config.upstream.cutoff_hour, config.upstream.default_base
    ));
    write_info(&format!("Log level: {}", config.logging.level));
    if let Some(workers) = config.server.workers {
        write_info(&format!("Worker threads: {workers}"));
    }
    if let Some(ref path) = config.logging.access_log_file {
        write_info(&format!("Access log: {path}"));
    }
    if let Some(ref path) = config.logging.error_log_file {
        write_info(&format!("Error log: {path}"));
    }
    write_info("======================================\n");
}

pub fn log_shutdown(reason: &str) {
    write_info(&format!("[Shutdown] {reason}, no longer accepting connections"));
}

pub fn log_connection_accepted(peer_addr: &SocketAddr) {
    write_debug(&format!("[Connection] Accepted from: {peer_addr}"));
}

pub fn log_connection_error(err: &impl std::fmt::Debug) {
    write_error(&format!("[ERROR] Failed to serve connection: {err:?}"));
}

pub fn log_error(message: &str) {
    write_error(&format!("[ERROR] {message}"));
}

pub fn log_warning(message: &str) {
    write_error(&format!("[WARN] {message}"));
}

/// Log formatted access log entry
pub fn log_access(entry: &AccessLogEntry, format: &str) {
    write_access(&entry.format(format));
}

pub fn log_rate_window(window: &DateWindow) {
    write_info(&format!(
        "[Rates] Date range: {window} ({} days)",
        window.len_days()
    ));
}

pub fn log_upstream_url(url: &str) {
    write_info(&format!("[Rates] Fetching {url}"));
}

pub fn log_rate_error(err: &RateError) {
    match err {
        RateError::Upstream { status, .. } => {
            log_warning(&format!("[Rates] Upstream answered {status}"));
        }
        RateError::Internal(message) => log_error(&format!("[Rates] {message}")),
    }
}
