use thiserror::Error;
use tracing::info;

use crate::{
    AppState,
    models::analysis::{AnalysisRequest, AnalysisResult},
    services::{fallback::analyze_with_fallback, gemini::AnalysisError},
};
use validation::{ValidationError, validate_text};

pub mod validation;

#[derive(Debug, Error)]
pub enum HandleError {
    // Lets `?` lift both error kinds into HandleError
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Analysis(#[from] AnalysisError),
}

pub async fn handle_analyze(
    state: &AppState,
    req: AnalysisRequest,
) -> Result<AnalysisResult, HandleError> {
    validate_text(&req.text)?;

    info!(chars = req.text.chars().count(), "analyzing text");
    let result = analyze_with_fallback(&state.gemini, &req.text).await?;
    Ok(result)
}
