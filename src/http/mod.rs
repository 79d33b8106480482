//! HTTP protocol layer module
//!
//! Response construction shared by the router and the rate handler.

pub mod response;

// Re-export commonly used types
pub use response::{
    build_error_response, build_health_response, build_preflight_response, build_rates_response,
};
