//! `POST /api/v1/image-optimization/upscale`

use axum::extract::State;
use axum::Json;
use shared::{ImageOptimizationInput, ImageOptimizationOutput};

use crate::error::WebServerResult;
use crate::state::AppState;
use crate::web::ApiJson;

pub async fn upscale(
    State(state): State<AppState>,
    ApiJson(input): ApiJson<ImageOptimizationInput>,
) -> WebServerResult<Json<ImageOptimizationOutput>> {
    let image_output = state.image_optimization.upscale(input).await?;
    Ok(Json(ImageOptimizationOutput { image_output }))
}
