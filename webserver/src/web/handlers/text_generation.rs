//! `POST /api/v1/text-generation/generate`

use axum::extract::State;
use axum::Json;
use shared::{TextGenerationInput, TextGenerationOutput};
use tracing::info;

use crate::error::WebServerResult;
use crate::state::AppState;
use crate::web::ApiJson;

pub async fn generate(
    State(state): State<AppState>,
    ApiJson(input): ApiJson<TextGenerationInput>,
) -> WebServerResult<Json<TextGenerationOutput>> {
    let provider = input.provider;
    let generated_texts = state.text_generation.generate(input).await?;

    info!(provider = ?provider, candidates = generated_texts.len(), "Text generation served");
    Ok(Json(TextGenerationOutput { generated_texts }))
}
