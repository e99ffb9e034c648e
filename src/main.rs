use sentiment_gateway::{AppState, build_app, config::Config, services::gemini::GeminiClient};
use tokio::net::TcpListener;
use tracing::{error, info, warn};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cfg = match Config::from_env() {
        Ok(cfg) => cfg,
        Err(err) => {
            error!("Refusing to start: {err}");
            std::process::exit(1);
        }
    };
    let http = match GeminiClient::http_client(&cfg.gemini) {
        Ok(http) => http,
        Err(err) => {
            error!("Failed to build HTTP client: {err}");
            std::process::exit(1);
        }
    };
    let addr = format!("{}:{}", cfg.app_host, cfg.app_port);

    let state = AppState::new(cfg, http);
    report_models(&state).await;

    let app = build_app(state);
    let listener = match TcpListener::bind(&addr).await {
        Ok(listener) => listener,
        Err(err) => {
            error!("Failed to bind {addr}: {err}");
            std::process::exit(1);
        }
    };

    info!("Sentiment gateway listening on http://{addr}");
    if let Err(err) = axum::serve(listener, app).await {
        error!("Server error: {err}");
        std::process::exit(1);
    }
}

/// Startup diagnostic: logs what the provider offers. Never fatal.
async fn report_models(state: &AppState) {
    let cfg = &state.cfg.gemini;
    info!(
        model = %cfg.model,
        api_version = %cfg.api_version,
        max_retries = cfg.max_retries,
        "Using provider {}",
        cfg.base_url
    );

    match state.gemini.list_models().await {
        Ok(models) => {
            info!("Provider lists {} models", models.len());
            let wanted = format!("models/{}", cfg.model);
            if !models.iter().any(|m| m.name == wanted || m.name == cfg.model) {
                warn!(
                    "Configured model {} is not in the catalog; fallbacks may be used",
                    cfg.model
                );
            }
        }
        Err(err) => warn!("Could not list models: {err}"),
    }
}
