//! Generator library for multi-provider text generation
//!
//! This library turns a short caller text into rewritten candidates using one of
//! several generative-AI providers, with admission control on prompt size, a
//! shared finish-status taxonomy and a bounded retry loop.

pub mod config;
pub mod core;
pub mod error;
pub mod services;
pub mod traits;
pub mod types;

// Re-export main types
pub use config::{Credentials, GeneratorConfig, InputLimits, ProviderSettings};
pub use error::{GenerationError, GenerationResult};
pub use traits::*;
pub use types::*;
pub use crate::core::{Dispatcher, RetryController, RetryPolicy, TokenBudgetChecker};
pub use services::*;
