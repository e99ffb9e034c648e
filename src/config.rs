use std::env;
use std::str::FromStr;

use dotenvy::dotenv;
use thiserror::Error;
use url::Url;

pub const DEFAULT_FALLBACK_MODELS: &[&str] = &[
    "gemini-2.0-flash",
    "gemini-1.5-flash",
    "gemini-1.5-flash-latest",
    "gemini-1.5-pro",
    "gemini-pro",
];

#[derive(Debug, Clone)]
pub struct Config {
    /// HTTP bind host (e.g., 0.0.0.0)
    pub app_host: String,
    /// HTTP bind port (e.g., 3000)
    pub app_port: u16,
    /// Directory holding the browser client (index.html and assets)
    pub static_dir: String,

    pub gemini: GeminiConfig,
}

#[derive(Debug, Clone)]
pub struct GeminiConfig {
    pub api_key: String,
    /// Provider base URL (e.g., https://generativelanguage.googleapis.com)
    pub base_url: Url,
    /// Path segment placed before `/models`, usually "v1beta"
    pub api_version: String,
    /// Primary model name
    pub model: String,
    /// Tried in order when the primary model is not found
    pub fallback_models: Vec<String>,
    pub max_retries: u32,                // default 3
    pub default_retry_delay_secs: u64,   // default 30
    pub request_timeout_secs: u64,       // default 60
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    MissingVar(&'static str),
    #[error("Invalid URL for {name}: {value}")]
    InvalidUrl { name: &'static str, value: String },
    #[error("Invalid number for {name}: {value}")]
    InvalidNumber { name: &'static str, value: String },
    #[error("General error: {0}")]
    Other(String),
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env if present
        let _ = dotenv();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the config from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let vars = Vars(lookup);

        let app_host = vars.or_default("APP_HOST", "0.0.0.0");
        let app_port = vars.parse_or_default::<u16>("APP_PORT", 3000)?;
        let static_dir = vars.or_default("STATIC_DIR", "public");

        let api_key = vars
            .required("GEMINI_API_KEY")?
            .trim()
            .to_string();
        if api_key.is_empty() {
            return Err(ConfigError::MissingVar("GEMINI_API_KEY"));
        }

        let base_url =
            vars.url_or_default("GEMINI_BASE_URL", "https://generativelanguage.googleapis.com")?;
        let api_version = vars
            .or_default("GEMINI_API_VERSION", "v1beta")
            .trim_matches('/')
            .to_string();
        if api_version.is_empty() {
            return Err(ConfigError::Other(
                "GEMINI_API_VERSION must not be empty".to_string(),
            ));
        }
        let model = vars.or_default("GEMINI_MODEL", "gemini-1.5-flash");
        let fallback_models = vars.list_or_default("GEMINI_FALLBACK_MODELS", DEFAULT_FALLBACK_MODELS);

        let max_retries = vars.parse_or_default::<u32>("MAX_RETRIES", 3)?;
        let default_retry_delay_secs = vars.parse_or_default::<u64>("DEFAULT_RETRY_DELAY_SECS", 30)?;
        let request_timeout_secs = vars.parse_or_default::<u64>("REQUEST_TIMEOUT_SECS", 60)?;

        Ok(Self {
            app_host,
            app_port,
            static_dir,
            gemini: GeminiConfig {
                api_key,
                base_url,
                api_version,
                model,
                fallback_models,
                max_retries,
                default_retry_delay_secs,
                request_timeout_secs,
            },
        })
    }
}

/* --------------------------- helpers --------------------------- */

struct Vars<F>(F);

impl<F> Vars<F>
where
    F: Fn(&str) -> Option<String>,
{
    fn get(&self, key: &str) -> Option<String> {
        (self.0)(key).filter(|v| !v.trim().is_empty())
    }

    fn required(&self, key: &'static str) -> Result<String, ConfigError> {
        self.get(key).ok_or(ConfigError::MissingVar(key))
    }

    fn or_default(&self, key: &'static str, default: &'static str) -> String {
        self.get(key).unwrap_or_else(|| default.to_string())
    }

    fn parse_or_default<T: FromStr>(&self, key: &'static str, default: T) -> Result<T, ConfigError> {
        match self.get(key) {
            Some(v) => v.trim().parse::<T>().map_err(|_| ConfigError::InvalidNumber {
                name: key,
                value: v,
            }),
            None => Ok(default),
        }
    }

    fn url_or_default(&self, key: &'static str, default: &'static str) -> Result<Url, ConfigError> {
        let raw = self.or_default(key, default);
        Url::parse(&raw).map_err(|_| ConfigError::InvalidUrl {
            name: key,
            value: raw,
        })
    }

    fn list_or_default(&self, key: &'static str, default: &[&str]) -> Vec<String> {
        match self.get(key) {
            Some(v) => v
                .split(',')
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect(),
            None => default.iter().map(|s| s.to_string()).collect(),
        }
    }
}
