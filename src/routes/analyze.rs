use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
    http::StatusCode,
};
use serde_json::Value as JsonValue;
use tracing::{error, info};

use crate::{
    AppState,
    handlers::{self, HandleError},
    models::{
        analysis::{AnalysisRequest, AnalyzeResponse},
        common::ErrorMessage,
    },
};

#[utoipa::path(
    post,
    path = "/api/analyze",
    tag = "analysis",
    request_body = AnalysisRequest,
    responses(
        (status = 200, description = "Analysis produced", body = AnalyzeResponse),
        (status = 400, description = "Empty text, text over 10000 characters, or malformed body", body = ErrorMessage),
        (status = 500, description = "Remote model call failed", body = ErrorMessage)
    )
)]
pub async fn analyze(
    State(state): State<AppState>,
    payload: Result<Json<JsonValue>, JsonRejection>,
) -> Result<Json<AnalyzeResponse>, (StatusCode, Json<ErrorMessage>)> {
    let Json(payload) = payload.map_err(|rejection| {
        (
            StatusCode::BAD_REQUEST,
            Json(ErrorMessage::new(format!(
                "Invalid request body: {}",
                rejection.body_text()
            ))),
        )
    })?;
    let req: AnalysisRequest = serde_json::from_value(payload).map_err(|err| {
        (
            StatusCode::BAD_REQUEST,
            Json(ErrorMessage::new(format!("Invalid request body: {err}"))),
        )
    })?;

    match handlers::handle_analyze(&state, req).await {
        Ok(analysis) => {
            info!(sentiment = %analysis.sentiment, themes = analysis.themes.len(), "analysis returned");
            Ok(Json(AnalyzeResponse {
                success: true,
                analysis,
            }))
        }
        Err(HandleError::Validation(err)) => {
            info!("rejected analysis request: {err}");
            Err((StatusCode::BAD_REQUEST, Json(ErrorMessage::new(err.to_string()))))
        }
        Err(HandleError::Analysis(err)) => {
            error!("analysis failed: {err}");
            Err((
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorMessage::new(err.to_string())),
            ))
        }
    }
}
