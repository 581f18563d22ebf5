//! Webserver library for the text and image optimization backend
//!
//! Exposes the text generation and image upscaling services over HTTP, with
//! API-key authentication and a uniform `{detail}` error body.

pub mod config;
pub mod error;
pub mod services;
pub mod state;
pub mod traits;
pub mod web;
pub mod webserver_impl;

// Re-export main types
pub use config::WebServerConfig;
pub use error::{WebServerError, WebServerResult};
pub use state::AppState;
pub use webserver_impl::WebServer;

// Re-export trait definitions
pub use traits::{ImageOptimizationService, ImageUpscaler};

// Re-export service implementations
pub use services::{ClaidClient, ImageOptimizer, StoredImage};
