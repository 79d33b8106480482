// Configuration module entry point
// Loads layered configuration and holds per-process runtime state

mod state;
mod types;

use config::builder::{ConfigBuilder, DefaultState};
use config::ConfigError;
use std::net::SocketAddr;

// Re-export public types
pub use state::AppState;
pub use types::{Config, HttpConfig, PerformanceConfig, UpstreamConfig};

/// Default config file (without extension)
pub const DEFAULT_CONFIG_PATH: &str = "config";

impl Config {
    /// Load configuration from specified file path (without extension)
    /// Missing file is fine, defaults and `RATES_*` env vars still apply
    pub fn load_from(config_path: &str) -> Result<Self, ConfigError> {
        let settings = with_defaults(config::Config::builder())?
            .add_source(config::File::with_name(config_path).required(false))
            .add_source(
                config::Environment::with_prefix("RATES")
                    .prefix_separator("_")
                    .separator("__"),
            )
            .build()?;

        let cfg: Self = settings.try_deserialize()?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Reject values the handler cannot work with
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.upstream.cutoff_hour > 23 {
            return Err(ConfigError::Message(format!(
                "upstream.cutoff_hour must be 0-23, got {}",
                self.upstream.cutoff_hour
            )));
        }
        if self.upstream.window_days == 0 {
            return Err(ConfigError::Message(
                "upstream.window_days must be at least 1".to_string(),
            ));
        }
        if self.upstream.base_url.trim().is_empty() {
            return Err(ConfigError::Message(
                "upstream.base_url must not be empty".to_string(),
            ));
        }
        Ok(())
    }

    pub fn get_socket_addr(&self) -> Result<SocketAddr, String> {
        format!("{}:{}", self.server.host, self.server.port)
            .parse()
            .map_err(|e| format!("Invalid address: {e}"))
    }
}

fn with_defaults(
    builder: ConfigBuilder<DefaultState>,
) -> Result<ConfigBuilder<DefaultState>, ConfigError> {
    builder
        .set_default("server.host", "127.0.0.1")?
        .set_default("server.port", 8080)?
        .set_default("logging.level", "info")?
        .set_default("logging.access_log", true)?
        .set_default("logging.access_log_format", "combined")?
        .set_default("performance.keep_alive_timeout", 75)?
        .set_default("performance.read_timeout", 30)?
        .set_default("performance.write_timeout", 30)?
        .set_default("http.server_name", "rates-window")?
        .set_default("http.answer_preflight", false)?
        .set_default("upstream.base_url", "https://api.frankfurter.dev/v1")?
        .set_default("upstream.default_base", "USD")?
        .set_default("upstream.cutoff_hour", 14)?
        .set_default("upstream.window_days", 7)
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use config::{File, FileFormat};

    /// Build a config from inline TOML layered over the defaults
    pub fn config_from_toml(toml: &str) -> Result<Config, ConfigError> {
        let cfg: Config = with_defaults(config::Config::builder())?
            .add_source(File::from_str(toml, FileFormat::Toml))
            .build()?
            .try_deserialize()?;
        cfg.validate()?;
        Ok(cfg)
    }

    #[test]
    fn test_defaults_without_file() {
        let cfg = config_from_toml("").unwrap();
        assert_eq!(cfg.server.host, "127.0.0.1");
        assert_eq!(cfg.server.port, 8080);
        assert!(cfg.server.workers.is_none());
        assert_eq!(cfg.logging.access_log_format, "combined");
        assert!(!cfg.http.answer_preflight);
        assert!(cfg.http.health.enabled);
        assert_eq!(cfg.http.health.liveness_path, "/healthz");
        assert_eq!(cfg.upstream, UpstreamConfig::default());
        assert_eq!(cfg.upstream.cutoff_hour, 14);
        assert_eq!(cfg.upstream.window_days, 7);
    }

    #[test]
    fn test_file_overrides_defaults() {
        let cfg = config_from_toml(
            r#"
            [server]
            port = 9090
            workers = 2

            [upstream]
            base_url = "http://localhost:1234/v1"
            cutoff_hour = 15

            [http.health]
            liveness_path = "/live"
            "#,
        )
        .unwrap();

        assert_eq!(cfg.server.port, 9090);
        assert_eq!(cfg.server.workers, Some(2));
        assert_eq!(cfg.upstream.base_url, "http://localhost:1234/v1");
        assert_eq!(cfg.upstream.cutoff_hour, 15);
        assert_eq!(cfg.upstream.default_base, "USD");
        assert_eq!(cfg.http.health.liveness_path, "/live");
        assert_eq!(cfg.http.health.readiness_path, "/readyz");
        assert_eq!(
            cfg.get_socket_addr().unwrap(),
            "127.0.0.1:9090".parse().unwrap()
        );
    }

    #[test]
    fn test_invalid_cutoff_rejected() {
        let err = config_from_toml("[upstream]\ncutoff_hour = 24\n").unwrap_err();
        assert!(err.to_string().contains("cutoff_hour"));
    }

    #[test]
    fn test_zero_window_rejected() {
        let err = config_from_toml("[upstream]\nwindow_days = 0\n").unwrap_err();
        assert!(err.to_string().contains("window_days"));
    }

    #[test]
    fn test_bad_host_is_reported() {
        let cfg = config_from_toml("[server]\nhost = \"not a host\"\n").unwrap();
        assert!(cfg.get_socket_addr().is_err());
    }
}
