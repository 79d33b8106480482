// Configuration types module
// Defines all configuration-related data structures

use serde::Deserialize;

use crate::rates::{DEFAULT_BASE, DEFAULT_CUTOFF_HOUR, DEFAULT_WINDOW_DAYS};

/// Main configuration structure
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub server: ServerConfig,
    pub logging: LoggingConfig,
    pub performance: PerformanceConfig,
    pub http: HttpConfig,
    #[serde(default)]
    pub upstream: UpstreamConfig,
}

/// Server configuration
#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub workers: Option<usize>,
}

/// Logging configuration
#[derive(Debug, Deserialize, Clone)]
pub struct LoggingConfig {
    pub level: String,
    pub access_log: bool,
    /// Access log format (combined, common, json, or custom pattern)
    #[serde(default = "default_access_log_format")]
    pub access_log_format: String,
    /// Access log file path (optional, stdout if not set)
    #[serde(default)]
    pub access_log_file: Option<String>,
    /// Error log file path (optional, stderr if not set)
    #[serde(default)]
    pub error_log_file: Option<String>,
}

#[allow(clippy::missing_const_for_fn)]
fn default_access_log_format() -> String {
    "combined".to_string()
}

/// Performance configuration
#[derive(Debug, Deserialize, Clone)]
pub struct PerformanceConfig {
    pub keep_alive_timeout: u64,
    pub read_timeout: u64,
    pub write_timeout: u64,
    pub max_connections: Option<u64>,
}

/// HTTP configuration
#[derive(Debug, Deserialize, Clone)]
pub struct HttpConfig {
    /// Sent as `User-Agent` on upstream requests
    pub server_name: String,
    /// Answer `OPTIONS` with a 204 preflight instead of fetching rates
    pub answer_preflight: bool,
    /// Health check configuration
    #[serde(default)]
    pub health: HealthConfig,
}

/// Health check configuration
#[derive(Debug, Deserialize, Clone)]
pub struct HealthConfig {
    /// Enable health check endpoints
    #[serde(default = "default_health_enabled")]
    pub enabled: bool,
    /// Liveness probe path (default: /healthz)
    #[serde(default = "default_healthz_path")]
    pub liveness_path: String,
    /// Readiness probe path (default: /readyz)
    #[serde(default = "default_readyz_path")]
    pub readiness_path: String,
}

#[allow(clippy::missing_const_for_fn)]
fn default_health_enabled() -> bool {
    true
}

#[allow(clippy::missing_const_for_fn)]
fn default_healthz_path() -> String {
    "/healthz".to_string()
}

#[allow(clippy::missing_const_for_fn)]
fn default_readyz_path() -> String {
    "/readyz".to_string()
}

impl Default for HealthConfig {
    fn default() -> Self {
        Self {
            enabled: default_health_enabled(),
            liveness_path: default_healthz_path(),
            readiness_path: default_readyz_path(),
        }
    }
}

/// Rate history API settings
#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
pub struct UpstreamConfig {
    /// Versioned API root, the date range path is appended to it
    #[serde(default = "default_upstream_base_url")]
    pub base_url: String,
    /// Base currency when the request carries none
    #[serde(default = "default_base_currency")]
    pub default_base: String,
    /// UTC hour from which today's rates count as published.
    /// Approximates 16:00 CET; not adjusted for the publisher's DST switch.
    #[serde(default = "default_cutoff_hour")]
    pub cutoff_hour: u32,
    /// Calendar days in the window, both ends included
    #[serde(default = "default_window_days")]
    pub window_days: u32,
}

#[allow(clippy::missing_const_for_fn)]
fn default_upstream_base_url() -> String {
    "https://api.frankfurter.dev/v1".to_string()
}

#[allow(clippy::missing_const_for_fn)]
fn default_base_currency() -> String {
    DEFAULT_BASE.to_string()
}

const fn default_cutoff_hour() -> u32 {
    DEFAULT_CUTOFF_HOUR
}

const fn default_window_days() -> u32 {
    DEFAULT_WINDOW_DAYS
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            base_url: default_upstream_base_url(),
            default_base: default_base_currency(),
            cutoff_hour: default_cutoff_hour(),
            window_days: default_window_days(),
        }
    }
}
