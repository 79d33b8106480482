// Application state module
// Immutable per-process state shared by every connection

use std::sync::Arc;

use super::types::Config;
use crate::rates::{HttpRateSource, RateError, RateSource};

/// Application state
pub struct AppState {
    pub config: Config,
    /// Where rate windows are fetched from
    pub source: Arc<dyn RateSource>,
}

impl AppState {
    /// Create state with the HTTP-backed rate source
    pub fn new(config: &Config) -> Result<Self, RateError> {
        let source = HttpRateSource::new(&config.http.server_name)?;
        Ok(Self::with_source(config, Arc::new(source)))
    }

    /// Create state around an arbitrary rate source
    pub fn with_source(config: &Config, source: Arc<dyn RateSource>) -> Self {
        Self {
            config: config.clone(),
            source,
        }
    }

    pub const fn access_log_enabled(&self) -> bool {
        self.config.logging.access_log
    }
}
