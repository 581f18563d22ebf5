//! Shared request state

use std::sync::Arc;

use generator::TextGenerationService;

use crate::traits::ImageOptimizationService;

/// Handles every request handler needs; cheap to clone
#[derive(Clone)]
pub struct AppState {
    pub text_generation: Arc<dyn TextGenerationService>,
    pub image_optimization: Arc<dyn ImageOptimizationService>,
    /// Expected `X-API-KEY`; `None` when authentication is disabled
    pub api_key: Option<Arc<str>>,
}

impl AppState {
    pub fn new(
        text_generation: Arc<dyn TextGenerationService>,
        image_optimization: Arc<dyn ImageOptimizationService>,
        api_key: Option<String>,
    ) -> Self {
        Self {
            text_generation,
            image_optimization,
            api_key: api_key.map(Arc::from),
        }
    }
}
