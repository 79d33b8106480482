//! Request handler module
//!
//! Request routing and the rate window endpoint.

pub mod rates;
pub mod router;

// Re-export main entry point
pub use router::handle_request;
