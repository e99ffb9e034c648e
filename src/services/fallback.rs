use tracing::{info, warn};

use crate::{
    models::analysis::AnalysisResult,
    services::gemini::{AnalysisError, GeminiClient},
};

/// Runs the analysis on the configured model. When that model is reported
/// as not found, the fallback list is scanned in order (skipping the
/// primary) and the first successful answer wins. Other failures of the
/// primary model are returned as-is.
pub async fn analyze_with_fallback(
    client: &GeminiClient,
    text: &str,
) -> Result<AnalysisResult, AnalysisError> {
    let cfg = client.config();
    let primary = cfg.model.as_str();

    match client.call_model(text, primary).await {
        Ok(result) => return Ok(result),
        Err(err) if err.is_model_not_found() => {
            warn!(model = primary, "model not found, trying fallbacks: {err}");
        }
        Err(err) => return Err(err),
    }

    let mut tried = vec![primary.to_string()];
    for model in cfg.fallback_models.iter().filter(|m| m.as_str() != primary) {
        match client.call_model(text, model).await {
            Ok(result) => {
                info!(model = model.as_str(), "fallback model succeeded");
                return Ok(result);
            }
            Err(err) => {
                warn!(model = model.as_str(), "fallback model failed: {err}");
                tried.push(model.clone());
            }
        }
    }

    Err(AnalysisError::AllModelsFailed { tried })
}
