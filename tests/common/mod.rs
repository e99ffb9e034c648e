//! Scripted stand-in for the generative-language provider.
#![allow(dead_code)]

use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};

use axum::{
    Router,
    extract::State,
    http::{StatusCode, Uri},
};
use sentiment_gateway::{AppState, config::Config, services::gemini::GeminiClient};
use serde_json::{Value, json};
use tokio::net::TcpListener;

pub const API_KEY: &str = "test-key";

#[derive(Debug, Clone)]
pub struct Recorded {
    pub path: String,
    pub query: String,
    pub body: String,
}

#[derive(Clone, Default)]
pub struct FakeGemini {
    inner: Arc<Mutex<Inner>>,
}

#[derive(Default)]
struct Inner {
    scripted: VecDeque<(u16, Value)>,
    requests: Vec<Recorded>,
}

impl FakeGemini {
    pub fn requests(&self) -> Vec<Recorded> {
        self.inner.lock().unwrap().requests.clone()
    }

    /// Model names of every generateContent call, in order.
    pub fn models_called(&self) -> Vec<String> {
        self.requests()
            .iter()
            .filter_map(|r| {
                r.path
                    .rsplit('/')
                    .next()
                    .and_then(|last| last.strip_suffix(":generateContent"))
                    .map(str::to_string)
            })
            .collect()
    }

    pub fn remaining(&self) -> usize {
        self.inner.lock().unwrap().scripted.len()
    }
}

async fn handle(State(fake): State<FakeGemini>, uri: Uri, body: String) -> (StatusCode, String) {
    let mut inner = fake.inner.lock().unwrap();
    inner.requests.push(Recorded {
        path: uri.path().to_string(),
        query: uri.query().unwrap_or_default().to_string(),
        body,
    });
    let (status, payload) = inner.scripted.pop_front().unwrap_or_else(|| {
        (500, json!({ "error": { "message": "no scripted response" } }))
    });
    let text = match payload {
        // Raw strings are sent as-is to simulate non-JSON bodies
        Value::String(s) => s,
        other => other.to_string(),
    };
    (StatusCode::from_u16(status).unwrap(), text)
}

/// Starts the fake provider on an ephemeral port and returns its base URL.
pub async fn spawn(responses: Vec<(u16, Value)>) -> (String, FakeGemini) {
    let fake = FakeGemini::default();
    fake.inner.lock().unwrap().scripted = responses.into();

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let app = Router::new().fallback(handle).with_state(fake.clone());
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    (format!("http://{addr}"), fake)
}

pub fn config(base_url: &str, extra: &[(&str, &str)]) -> Config {
    let mut vars: HashMap<String, String> = HashMap::from([
        ("GEMINI_API_KEY".to_string(), API_KEY.to_string()),
        ("GEMINI_BASE_URL".to_string(), base_url.to_string()),
        ("GEMINI_MODEL".to_string(), "gemini-test".to_string()),
        ("GEMINI_FALLBACK_MODELS".to_string(), "alt-one,gemini-test,alt-two,alt-three".to_string()),
        ("MAX_RETRIES".to_string(), "3".to_string()),
        ("DEFAULT_RETRY_DELAY_SECS".to_string(), "0".to_string()),
        ("REQUEST_TIMEOUT_SECS".to_string(), "10".to_string()),
        (
            "STATIC_DIR".to_string(),
            concat!(env!("CARGO_MANIFEST_DIR"), "/public").to_string(),
        ),
    ]);
    for (k, v) in extra {
        vars.insert(k.to_string(), v.to_string());
    }
    Config::from_lookup(|key| vars.get(key).cloned()).unwrap()
}

pub fn client(cfg: &Config) -> GeminiClient {
    let http = GeminiClient::http_client(&cfg.gemini).unwrap();
    GeminiClient::new(cfg.gemini.clone(), http)
}

pub fn state(cfg: Config) -> AppState {
    let http = GeminiClient::http_client(&cfg.gemini).unwrap();
    AppState::new(cfg, http)
}

/// A 200 body whose single candidate carries `text`.
pub fn candidate(text: &str) -> (u16, Value) {
    (
        200,
        json!({
            "candidates": [{
                "content": { "parts": [{ "text": text }], "role": "model" },
                "finishReason": "STOP"
            }]
        }),
    )
}

pub fn rate_limited(retry_delay: Option<&str>) -> (u16, Value) {
    let details = match retry_delay {
        Some(d) => json!([
            { "@type": "type.googleapis.com/google.rpc.RetryInfo", "retryDelay": d }
        ]),
        None => json!([]),
    };
    (
        429,
        json!({
            "error": {
                "code": 429,
                "message": "Resource has been exhausted (e.g. check quota).",
                "status": "RESOURCE_EXHAUSTED",
                "details": details
            }
        }),
    )
}

pub fn model_not_found(model: &str) -> (u16, Value) {
    (
        404,
        json!({
            "error": {
                "code": 404,
                "message": format!("models/{model} is not found for API version v1beta, or is not supported for generateContent."),
                "status": "NOT_FOUND"
            }
        }),
    )
}

pub const LOVE_MY_JOB: &str =
    r#"{"sentiment":"positive","themes":["work"],"tone":"upbeat","summary":"Expresses enjoyment of work."}"#;
