pub mod apidoc;
pub mod config;
pub mod handlers;
pub mod models;
pub mod routes;
pub mod services;
pub mod utils;

use axum::{
    Router,
    routing::{get, post},
};
use config::Config;
use services::gemini::GeminiClient;
use tower_http::{services::ServeDir, trace::TraceLayer};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

#[derive(Clone)]
pub struct AppState {
    pub cfg: Config,
    pub gemini: GeminiClient,
}

impl AppState {
    pub fn new(cfg: Config, http: reqwest::Client) -> Self {
        let gemini = GeminiClient::new(cfg.gemini.clone(), http);
        Self { cfg, gemini }
    }
}

/// API routes, the Swagger UI, and the static client shell for every
/// other path.
pub fn build_app(state: AppState) -> Router {
    let static_files = ServeDir::new(&state.cfg.static_dir);

    Router::new()
        .route("/api/analyze", post(routes::analyze::analyze))
        .route("/api/models", get(routes::models::list_models))
        .merge(SwaggerUi::new("/docs").url("/api-docs/openapi.json", apidoc::ApiDoc::openapi()))
        .fallback_service(static_files)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
