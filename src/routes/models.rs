use axum::{Json, extract::State, http::StatusCode};
use tracing::error;

use crate::{
    AppState,
    models::{
        analysis::{ModelsConfigView, ModelsResponse},
        common::ErrorMessage,
    },
};

#[utoipa::path(
    get,
    path = "/api/models",
    tag = "analysis",
    responses(
        (status = 200, description = "Provider model catalog and active configuration", body = ModelsResponse),
        (status = 500, description = "Catalog could not be fetched", body = ErrorMessage)
    )
)]
pub async fn list_models(
    State(state): State<AppState>,
) -> Result<Json<ModelsResponse>, (StatusCode, Json<ErrorMessage>)> {
    let models = state.gemini.list_models().await.map_err(|err| {
        error!("listing models failed: {err}");
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ErrorMessage::new(format!("Failed to list models: {err}"))),
        )
    })?;

    let cfg = &state.cfg.gemini;
    Ok(Json(ModelsResponse {
        success: true,
        models,
        config: ModelsConfigView {
            base_url: cfg.base_url.to_string(),
            api_version: cfg.api_version.clone(),
            model: cfg.model.clone(),
            fallback_models: cfg.fallback_models.clone(),
            max_retries: cfg.max_retries,
        },
    }))
}
