use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Sentiment Gateway",
        version = "0.1.0",
        description = "Relays text to a generative-language model and returns a normalized sentiment and theme analysis."
    ),
    servers(
        (url = "http://localhost:3000", description = "Local dev")
    ),
    tags(
        (name = "analysis", description = "Text analysis and provider diagnostics")
    ),
    paths(
        crate::routes::analyze::analyze,
        crate::routes::models::list_models,
    ),
    components(
        schemas(
            crate::models::analysis::AnalysisRequest,
            crate::models::analysis::AnalysisResult,
            crate::models::analysis::AnalyzeResponse,
            crate::models::analysis::ModelInfo,
            crate::models::analysis::ModelsConfigView,
            crate::models::analysis::ModelsResponse,
            crate::models::common::ErrorMessage
        )
    )
)]
pub struct ApiDoc;
