//! HTTP layer: handlers, extractors and middleware

pub mod extract;
pub mod handlers;
pub mod middleware;

pub use extract::ApiJson;
pub use middleware::{require_api_key, API_KEY_HEADER};
