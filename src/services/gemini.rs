use std::time::Duration;

use reqwest::{StatusCode, Url};
use serde_json::Value;
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::{
    config::GeminiConfig,
    models::{
        analysis::{AnalysisResult, ModelInfo},
        gemini::{ErrorEnvelope, GenerateContentRequest, ListModelsResponse},
    },
    services::{normalize::parse_model_text, prompt::build_prompt},
};

#[derive(Debug, Error)]
pub enum AnalysisError {
    #[error("rate limit exceeded for model {model} after {attempts} attempts")]
    RateLimitExceeded { model: String, attempts: u32 },

    #[error("remote API error ({status}): {message}")]
    RemoteApiError {
        status: u16,
        code: Option<i64>,
        message: String,
    },

    #[error("invalid response from remote API: {0}")]
    InvalidResponseShape(String),

    #[error("request to remote API failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("all models failed (tried: {})", .tried.join(", "))]
    AllModelsFailed { tried: Vec<String> },

    #[error("could not build remote URL: {0}")]
    Url(#[from] url::ParseError),
}

impl AnalysisError {
    /// True when the remote side reports the requested model does not exist.
    pub fn is_model_not_found(&self) -> bool {
        match self {
            AnalysisError::RemoteApiError {
                status, message, ..
            } => *status == StatusCode::NOT_FOUND.as_u16()
                || message.to_lowercase().contains("not found"),
            _ => false,
        }
    }
}

/// Backoff bookkeeping for one call chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryState {
    pub attempt: u32,
    pub max_retries: u32,
    pub delay_secs: u64,
}

impl RetryState {
    pub fn new(max_retries: u32) -> Self {
        Self {
            attempt: 0,
            max_retries,
            delay_secs: 0,
        }
    }

    /// Moves to the next attempt after a rate-limit response, or returns
    /// `None` once the retry budget is spent.
    pub fn next(self, delay_secs: u64) -> Option<Self> {
        if self.attempt >= self.max_retries {
            return None;
        }
        Some(Self {
            attempt: self.attempt + 1,
            max_retries: self.max_retries,
            delay_secs,
        })
    }
}

/// Result of a single generateContent request.
enum Attempt {
    Done(AnalysisResult),
    RateLimited { retry_delay: Option<u64> },
}

#[derive(Clone)]
pub struct GeminiClient {
    http: reqwest::Client,
    cfg: GeminiConfig,
}

impl GeminiClient {
    pub fn new(cfg: GeminiConfig, http: reqwest::Client) -> Self {
        Self { http, cfg }
    }

    /// Builds the shared HTTP client with the configured request timeout.
    pub fn http_client(cfg: &GeminiConfig) -> Result<reqwest::Client, reqwest::Error> {
        reqwest::Client::builder()
            .timeout(Duration::from_secs(cfg.request_timeout_secs))
            .build()
    }

    pub fn config(&self) -> &GeminiConfig {
        &self.cfg
    }

    /// Analyzes `text` with `model`, sleeping and retrying on 429 until
    /// `max_retries` is reached.
    pub async fn call_model(&self, text: &str, model: &str) -> Result<AnalysisResult, AnalysisError> {
        let url = self.endpoint(&format!("models/{model}:generateContent"))?;
        let body = GenerateContentRequest::from_prompt(build_prompt(text));
        let mut state = RetryState::new(self.cfg.max_retries);

        loop {
            match self.generate_once(url.clone(), &body).await? {
                Attempt::Done(result) => {
                    info!(model, attempt = state.attempt, "analysis completed");
                    return Ok(result);
                }
                Attempt::RateLimited { retry_delay } => {
                    let delay = retry_delay.unwrap_or(self.cfg.default_retry_delay_secs);
                    state = state.next(delay).ok_or_else(|| AnalysisError::RateLimitExceeded {
                        model: model.to_string(),
                        attempts: state.attempt + 1,
                    })?;
                    warn!(
                        model,
                        attempt = state.attempt,
                        max_retries = state.max_retries,
                        "rate limited, retrying in {}s",
                        state.delay_secs
                    );
                    tokio::time::sleep(Duration::from_secs(state.delay_secs)).await;
                }
            }
        }
    }

    async fn generate_once(
        &self,
        url: Url,
        body: &GenerateContentRequest,
    ) -> Result<Attempt, AnalysisError> {
        let res = self
            .http
            .post(url)
            .query(&[("key", self.cfg.api_key.as_str())])
            .json(body)
            .send()
            .await?;

        let status = res.status();
        let bytes = res.bytes().await?;

        if status == StatusCode::TOO_MANY_REQUESTS {
            let envelope: ErrorEnvelope = serde_json::from_slice(&bytes).unwrap_or_default();
            return Ok(Attempt::RateLimited {
                retry_delay: retry_delay_secs(&envelope),
            });
        }
        if status != StatusCode::OK {
            return Err(remote_error(status, &bytes));
        }

        let payload: Value = serde_json::from_slice(&bytes)
            .map_err(|err| AnalysisError::InvalidResponseShape(format!("body is not JSON: {err}")))?;
        let raw = candidate_text(&payload)?;
        let finish_reason = payload
            .pointer("/candidates/0/finishReason")
            .and_then(Value::as_str)
            .unwrap_or("unknown");
        debug!(finish_reason, chars = raw.chars().count(), "received candidate");

        Ok(Attempt::Done(parse_model_text(raw)))
    }

    /// Fetches the provider's model catalog.
    pub async fn list_models(&self) -> Result<Vec<ModelInfo>, AnalysisError> {
        let url = self.endpoint("models")?;
        let res = self
            .http
            .get(url)
            .query(&[("key", self.cfg.api_key.as_str())])
            .send()
            .await?;

        let status = res.status();
        let bytes = res.bytes().await?;
        if status != StatusCode::OK {
            return Err(remote_error(status, &bytes));
        }

        let list: ListModelsResponse = serde_json::from_slice(&bytes).map_err(|err| {
            AnalysisError::InvalidResponseShape(format!("model list is not valid: {err}"))
        })?;
        Ok(list.models)
    }

    fn endpoint(&self, path: &str) -> Result<Url, url::ParseError> {
        let mut base = self.cfg.base_url.clone();
        if !base.path().ends_with('/') {
            let with_slash = format!("{}/", base.path());
            base.set_path(&with_slash);
        }
        base.join(&format!("{}/{}", self.cfg.api_version, path))
    }
}

/// First candidate's first text part, if it carries any non-blank text.
fn candidate_text(payload: &Value) -> Result<&str, AnalysisError> {
    let candidate = payload
        .get("candidates")
        .and_then(Value::as_array)
        .and_then(|c| c.first())
        .ok_or_else(|| AnalysisError::InvalidResponseShape("no candidates".to_string()))?;

    let parts = candidate
        .pointer("/content/parts")
        .and_then(Value::as_array)
        .ok_or_else(|| AnalysisError::InvalidResponseShape("candidate has no content.parts".to_string()))?;

    parts
        .first()
        .and_then(|p| p.get("text"))
        .and_then(Value::as_str)
        .filter(|t| !t.trim().is_empty())
        .ok_or_else(|| AnalysisError::InvalidResponseShape("candidate has no text".to_string()))
}

fn remote_error(status: StatusCode, bytes: &[u8]) -> AnalysisError {
    let envelope: ErrorEnvelope = serde_json::from_slice(bytes).unwrap_or_default();
    let body = envelope.error.unwrap_or_default();
    AnalysisError::RemoteApiError {
        status: status.as_u16(),
        code: body.code,
        message: body
            .message
            .filter(|m| !m.trim().is_empty())
            .unwrap_or_else(|| format!("status {}", status.as_u16())),
    }
}

/// Reads `retryDelay` (e.g. "37s") from the first detail entry carrying one.
pub fn retry_delay_secs(envelope: &ErrorEnvelope) -> Option<u64> {
    envelope
        .error
        .as_ref()?
        .details
        .iter()
        .find_map(|d| d.get("retryDelay"))
        .and_then(|v| match v {
            Value::String(s) => parse_leading_secs(s),
            Value::Number(n) => n.as_u64(),
            _ => None,
        })
}

fn parse_leading_secs(s: &str) -> Option<u64> {
    let trimmed = s.trim();
    let end = trimmed
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(trimmed.len());
    trimmed[..end].parse().ok()
}
