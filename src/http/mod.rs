//! HTTP protocol layer module
//!
//! Response builders, request data parsing and the flash cookie, decoupled
//! from the analyzer's pages.

pub mod flash;
pub mod form;
pub mod response;

pub use flash::Flash;
pub use response::{
    build_400_response, build_405_response, build_413_response, build_500_response,
    build_health_response, build_html_response, build_redirect_response, with_cookie,
};
