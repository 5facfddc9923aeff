//! Request handler module
//!
//! Routing dispatch plus the page controllers.

pub mod router;
pub mod urls;

// Re-export main entry point
pub use router::handle_request;
