//! Backend for the Google Gemini `generateContent` API.
//!
//! Endpoint: `{base_url}/models/{model}:generateContent`.
//! Authentication: `x-goog-api-key` header.
//! Response text: `candidates[0].content.parts[0].text`.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use super::{Backend, GenerationRequest, GeneratorOutcome};
use crate::error::Result;
use crate::PipelineError;

/// Environment variable read by [`GeminiConfig::from_env`].
pub const API_KEY_ENV: &str = "GOOGLE_GEMINI_API_KEY";

/// Connection settings for [`GeminiBackend`].
#[derive(Clone, Serialize, Deserialize)]
pub struct GeminiConfig {
    pub api_key: String,
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default = "default_model")]
    pub model: String,
    /// Per-request HTTP timeout. Keep it above the orchestrator's attempt
    /// timeout so a slow call is reported as a timeout, not a transport error.
    #[serde(default = "default_timeout", with = "duration_secs")]
    pub timeout: Duration,
}

fn default_base_url() -> String {
    "https://generativelanguage.googleapis.com/v1beta".to_string()
}

fn default_model() -> String {
    "gemini-2.0-flash".to_string()
}

fn default_timeout() -> Duration {
    Duration::from_secs(35)
}

mod duration_secs {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S: Serializer>(d: &Duration, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_u64(d.as_secs())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Duration, D::Error> {
        u64::deserialize(d).map(Duration::from_secs)
    }
}

impl std::fmt::Debug for GeminiConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GeminiConfig")
            .field("api_key", &redact(&self.api_key))
            .field("base_url", &self.base_url)
            .field("model", &self.model)
            .field("timeout", &self.timeout)
            .finish()
    }
}

fn redact(key: &str) -> String {
    match key.get(..6) {
        Some(prefix) if key.len() > 6 => format!("{}***", prefix),
        _ => "***".to_string(),
    }
}

impl GeminiConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: default_base_url(),
            model: default_model(),
            timeout: default_timeout(),
        }
    }

    /// Read the API key from `GOOGLE_GEMINI_API_KEY`.
    pub fn from_env() -> Result<Self> {
        match std::env::var(API_KEY_ENV) {
            Ok(key) if !key.trim().is_empty() => Ok(Self::new(key)),
            _ => Err(PipelineError::InvalidConfig(format!(
                "{} environment variable is not set",
                API_KEY_ENV
            ))),
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    fn validate(&self) -> Result<()> {
        if self.api_key.trim().is_empty() {
            return Err(PipelineError::InvalidConfig("Gemini API key is empty".into()));
        }
        if self.model.trim().is_empty() {
            return Err(PipelineError::InvalidConfig("Gemini model is empty".into()));
        }
        reqwest::Url::parse(&self.base_url).map_err(|e| {
            PipelineError::InvalidConfig(format!("invalid base URL '{}': {}", self.base_url, e))
        })?;
        Ok(())
    }
}

/// Backend for the Gemini `generateContent` endpoint.
///
/// # Example
///
/// ```
/// use article_pipeline::backend::{GeminiBackend, GeminiConfig};
///
/// let backend = GeminiBackend::new(GeminiConfig::new("AIza-example")).unwrap();
/// assert!(GeminiBackend::new(GeminiConfig::new("")).is_err());
/// ```
#[derive(Debug, Clone)]
pub struct GeminiBackend {
    client: Client,
    config: GeminiConfig,
}

impl GeminiBackend {
    /// Build the backend, failing fast on missing or malformed configuration.
    pub fn new(config: GeminiConfig) -> Result<Self> {
        config.validate()?;
        let client = Client::builder().timeout(config.timeout).build()?;
        Ok(Self { client, config })
    }

    /// Build the backend around an existing HTTP client.
    ///
    /// The client's own timeout applies; `config.timeout` is ignored.
    pub fn with_client(client: Client, config: GeminiConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { client, config })
    }

    pub fn config(&self) -> &GeminiConfig {
        &self.config
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/models/{}:generateContent",
            self.config.base_url.trim_end_matches('/'),
            self.config.model
        )
    }

    /// Build the request body.
    fn build_body(request: &GenerationRequest) -> Value {
        let mut body = json!({
            "contents": [{ "parts": [{ "text": request.prompt }] }],
        });

        if !request.sampling.is_empty() {
            let mut generation_config = serde_json::Map::new();
            if let Some(t) = request.sampling.temperature {
                generation_config.insert("temperature".into(), json!(t));
            }
            if let Some(n) = request.sampling.max_output_tokens {
                generation_config.insert("maxOutputTokens".into(), json!(n));
            }
            body["generationConfig"] = Value::Object(generation_config);
        }

        body
    }

    /// Parse a `Retry-After` header value as seconds.
    fn parse_retry_after(value: &str) -> Option<Duration> {
        value.trim().parse::<u64>().ok().map(Duration::from_secs)
    }

    /// Pull the first candidate's text out of a response.
    fn extract_text(json_resp: &Value) -> String {
        json_resp
            .pointer("/candidates/0/content/parts/0/text")
            .and_then(|v| v.as_str())
            .unwrap_or("")
            .to_string()
    }

    async fn send(&self, request: &GenerationRequest) -> Result<String> {
        let url = self.endpoint();
        let body = Self::build_body(request);

        let resp = self
            .client
            .post(&url)
            .header("x-goog-api-key", &self.config.api_key)
            .json(&body)
            .send()
            .await?;

        let status = resp.status().as_u16();

        if !resp.status().is_success() {
            let retry_after = resp
                .headers()
                .get(reqwest::header::RETRY_AFTER)
                .and_then(|v| v.to_str().ok())
                .and_then(Self::parse_retry_after);
            let text = resp.text().await.unwrap_or_default();
            return Err(PipelineError::HttpError {
                status,
                body: text,
                retry_after,
            });
        }

        let json_resp: Value = resp.json().await?;
        Ok(Self::extract_text(&json_resp))
    }
}

#[async_trait]
impl Backend for GeminiBackend {
    async fn generate(&self, request: &GenerationRequest) -> GeneratorOutcome {
        match self.send(request).await {
            Ok(text) => GeneratorOutcome::Success { text },
            Err(err) => GeneratorOutcome::from(err),
        }
    }

    fn name(&self) -> &'static str {
        "gemini"
    }
}
